//! Column-level fill values for imputation strategies.

use std::collections::BTreeMap;

use wave_core::MissingStrategy;

use crate::error::{Result, TransitionError};

/// Compute the fill value for one imputation strategy over the non-missing
/// cleaned values of a column.
///
/// Returns `Ok(None)` when the column has no values to derive a fill from.
///
/// # Errors
///
/// Returns [`TransitionError::NonNumericImputation`] when an arithmetic
/// strategy meets a value that does not parse as a number.
pub fn fill_value(
    variable: &str,
    strategy: MissingStrategy,
    custom: Option<&str>,
    values: &[&str],
) -> Result<Option<String>> {
    match strategy {
        MissingStrategy::ImputeCustom => Ok(custom.map(str::to_string)),
        MissingStrategy::ImputeMode => Ok(mode(values)),
        MissingStrategy::ImputeMean
        | MissingStrategy::ImputeMedian
        | MissingStrategy::ImputeMin
        | MissingStrategy::ImputeMax => {
            let numbers = parse_numbers(variable, strategy, values)?;
            Ok(numeric_fill(strategy, numbers).map(format_number))
        }
        MissingStrategy::MarkUnknown | MissingStrategy::DropRows => Ok(None),
    }
}

/// Most frequent value; ties go to the lexicographically smallest.
fn mode(values: &[&str]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(*value).or_insert(0) += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

fn parse_numbers(variable: &str, strategy: MissingStrategy, values: &[&str]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|value| {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| TransitionError::NonNumericImputation {
                    variable: variable.to_string(),
                    strategy,
                    value: (*value).to_string(),
                })
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn numeric_fill(strategy: MissingStrategy, mut numbers: Vec<f64>) -> Option<f64> {
    if numbers.is_empty() {
        return None;
    }
    numbers.sort_by(f64::total_cmp);
    let len = numbers.len();
    match strategy {
        MissingStrategy::ImputeMean => Some(numbers.iter().sum::<f64>() / len as f64),
        MissingStrategy::ImputeMedian => Some(if len % 2 == 1 {
            numbers[len / 2]
        } else {
            (numbers[len / 2 - 1] + numbers[len / 2]) / 2.0
        }),
        MissingStrategy::ImputeMin => numbers.first().copied(),
        MissingStrategy::ImputeMax => numbers.last().copied(),
        _ => None,
    }
}

/// Integral values render without a decimal point, so a fill of `2.0`
/// matches a category written as `2`.
#[allow(clippy::cast_possible_truncation)]
fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        format!("{number}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MissingStrategy::ImputeMean, &["1", "2", "2", "5"], Some("2.5"))]
    #[case(MissingStrategy::ImputeMedian, &["1", "2", "2", "5"], Some("2"))]
    #[case(MissingStrategy::ImputeMedian, &["3", "1", "9"], Some("3"))]
    #[case(MissingStrategy::ImputeMin, &["3", "1.5", "9"], Some("1.5"))]
    #[case(MissingStrategy::ImputeMax, &["3", "1.5", "9"], Some("9"))]
    #[case(MissingStrategy::ImputeMode, &["b", "a", "b", "a", "c"], Some("a"))]
    #[case(MissingStrategy::ImputeMode, &["x", "y", "y"], Some("y"))]
    #[case(MissingStrategy::ImputeMean, &[], None)]
    #[case(MissingStrategy::ImputeMode, &[], None)]
    fn computes_fill(
        #[case] strategy: MissingStrategy,
        #[case] values: &[&str],
        #[case] expected: Option<&str>,
    ) {
        let fill = fill_value("AGE", strategy, None, values).unwrap();
        assert_eq!(fill.as_deref(), expected);
    }

    #[test]
    fn custom_uses_given_value() {
        let fill = fill_value("PID", MissingStrategy::ImputeCustom, Some("Other"), &["a"]).unwrap();
        assert_eq!(fill.as_deref(), Some("Other"));
    }

    #[test]
    fn arithmetic_on_labels_fails() {
        let err = fill_value("PID", MissingStrategy::ImputeMean, None, &["1", "Democrat"]).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::NonNumericImputation { ref value, .. } if value == "Democrat"
        ));
    }
}
