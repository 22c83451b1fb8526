//! The `[[...]]` expectation grammar used in ground-truth request values.
//!
//! A request-value constraint is either a literal JSON value or one of a
//! small set of dynamic operators encoded in a string:
//!
//! ```text
//! [[ANY]]
//! [[_array_contains=X]]
//! [[_array_not_contains=X]]
//! [[_starts_with=X]]
//! [[_includes=X]]
//! ```
//!
//! Tokens are parsed once when the ground truth is loaded.

use std::fmt;

use serde_json::Value;

use crate::error::{EvalError, Result};

/// The wildcard token, also valid inside path patterns.
pub const ANY_TOKEN: &str = "[[ANY]]";

/// A parsed constraint on a single request value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// Any present value satisfies the constraint.
    Any,
    /// The observed value is an array containing the operand.
    ArrayContains(String),
    /// The observed value is an array that does not contain the operand.
    ArrayNotContains(String),
    /// The observed value is a string beginning with the operand.
    StartsWith(String),
    /// The observed value is a string, or array of strings, containing the operand.
    Includes(String),
    /// The observed value equals this literal.
    Literal(Value),
}

impl Expectation {
    /// Parses a ground-truth value into an expectation.
    ///
    /// Non-string values and strings that are not `[[...]]` tokens become
    /// [`Expectation::Literal`].
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownOperator`] when the value is a `[[...]]`
    /// token that names no known operator.
    pub fn parse(value: &Value) -> Result<Self> {
        let Value::String(raw) = value else {
            return Ok(Self::Literal(value.clone()));
        };
        let Some(inner) = raw.strip_prefix("[[").and_then(|s| s.strip_suffix("]]")) else {
            return Ok(Self::Literal(value.clone()));
        };

        if inner == "ANY" {
            return Ok(Self::Any);
        }

        let unknown = || EvalError::UnknownOperator { token: raw.clone() };
        let (name, operand) = inner.split_once('=').ok_or_else(unknown)?;
        let operand = unquote(operand).to_string();
        match name {
            "_array_contains" => Ok(Self::ArrayContains(operand)),
            "_array_not_contains" => Ok(Self::ArrayNotContains(operand)),
            "_starts_with" => Ok(Self::StartsWith(operand)),
            "_includes" => Ok(Self::Includes(operand)),
            _ => Err(unknown()),
        }
    }

    /// Operator name as written in ground truth, used in diagnostics.
    #[must_use]
    pub fn operator_name(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::ArrayContains(_) => "_array_contains",
            Self::ArrayNotContains(_) => "_array_not_contains",
            Self::StartsWith(_) => "_starts_with",
            Self::Includes(_) => "_includes",
            Self::Literal(_) => "literal",
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ANY_TOKEN),
            Self::ArrayContains(x)
            | Self::ArrayNotContains(x)
            | Self::StartsWith(x)
            | Self::Includes(x) => write!(f, "[[{}='{x}']]", self.operator_name()),
            Self::Literal(v) => write!(f, "{v}"),
        }
    }
}

/// Strips one layer of matching single or double quotes.
fn unquote(operand: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = operand.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return inner;
        }
    }
    operand
}
