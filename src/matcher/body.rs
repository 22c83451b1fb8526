//! Request-body stage of request matching.
//!
//! An expected key may appear anywhere in the observed body tree. Entries are
//! visited in body order and an object value is searched before its own key
//! is compared. A satisfied constraint stops the search; a local mismatch is
//! noted while the search goes on.

use serde_json::{Map, Value};

use crate::error::{EvalError, Result};
use crate::task::Expectation;
use crate::trace::kind_of;

/// Searches `body` for a value under `key` that satisfies `expectation`.
///
/// Values found under `key` that do not satisfy it are described in `mismatches`.
///
/// # Errors
///
/// Returns an error when an operator meets a value of the wrong shape; the
/// ground truth itself is malformed in that case.
pub(super) fn check(
    body: &Map<String, Value>,
    key: &str,
    expectation: &Expectation,
    mismatches: &mut Vec<String>,
) -> Result<bool> {
    for (name, value) in body {
        if let Value::Object(nested) = value {
            if check(nested, key, expectation, mismatches)? {
                return Ok(true);
            }
        }
        if name == key {
            if satisfies(key, value, expectation)? {
                return Ok(true);
            }
            mismatches.push(format!("found {value}"));
        }
    }
    Ok(false)
}

fn satisfies(key: &str, observed: &Value, expectation: &Expectation) -> Result<bool> {
    let operator = expectation.operator_name();
    match expectation {
        Expectation::Any => Ok(true),
        Expectation::Literal(expected) => Ok(observed == expected),
        Expectation::ArrayContains(operand) => {
            let items = array(operator, key, observed)?;
            contains(operator, items, operand)
        }
        Expectation::ArrayNotContains(operand) => {
            let items = array(operator, key, observed)?;
            Ok(items.is_empty() || !contains(operator, items, operand)?)
        }
        Expectation::StartsWith(operand) => match observed {
            Value::String(s) => Ok(s.starts_with(operand.as_str())),
            other => Err(shape(operator, key, "a string", other)),
        },
        Expectation::Includes(operand) => match observed {
            Value::String(s) => Ok(s.contains(operand.as_str())),
            Value::Array(items) => {
                let mut found = false;
                for item in items {
                    let text = item
                        .as_str()
                        .ok_or_else(|| shape(operator, key, "an array of strings", item))?;
                    found |= text.contains(operand.as_str());
                }
                Ok(found)
            }
            other => Err(shape(operator, key, "a string or array of strings", other)),
        },
    }
}

fn array<'v>(operator: &'static str, key: &str, observed: &'v Value) -> Result<&'v [Value]> {
    observed.as_array().map(Vec::as_slice).ok_or_else(|| shape(operator, key, "an array", observed))
}

/// Membership test; the operand is read as an integer when the array holds integers.
fn contains(operator: &'static str, items: &[Value], operand: &str) -> Result<bool> {
    match items.first() {
        None => Ok(false),
        Some(first) if first.is_i64() || first.is_u64() => {
            let wanted: i64 = operand.trim().parse().map_err(|_| EvalError::OperandCoercion {
                operator,
                operand: operand.to_string(),
            })?;
            Ok(items.iter().any(|item| item.as_i64() == Some(wanted)))
        }
        Some(_) => Ok(items.iter().any(|item| match item {
            Value::String(s) => s == operand,
            Value::Number(n) => n.to_string() == operand,
            Value::Bool(b) => b.to_string() == operand,
            _ => false,
        })),
    }
}

fn shape(operator: &'static str, key: &str, expected: &'static str, found: &Value) -> EvalError {
    EvalError::OperatorShape { operator, key: key.to_string(), expected, found: kind_of(found) }
}
