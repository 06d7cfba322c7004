//! Expression evaluation against the restricted namespace.
//!
//! Expressions are parsed by our own grammar and walked here. A name can only
//! reach what [`Namespace`] hands out, so there is nothing else to escape to.

use super::error::{CalcError, Result};
use super::format::NumberFormat;
use super::namespace::{Binding, Namespace, checked_power};
use super::operations as ops;
use super::parser::{BinaryOp, Expr, UnaryOp, parse};
use super::phrase::normalize;
use serde::Serialize;

/// Intermediate value while walking the tree.
#[derive(Clone, Copy, Debug)]
enum Value {
    Number(f64),
    /// The memory slot before anything was stored in it.
    Empty,
    /// A function named without calling it.
    Function(&'static str),
}

impl Value {
    fn number(self, context: &str) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Empty => Err(CalcError::invalid_expression(format!(
                "Error evaluating expression: memory is empty, cannot use it in {}",
                context
            ))),
            Self::Function(name) => Err(CalcError::invalid_expression(format!(
                "Error evaluating expression: function '{}' used as a number in {}",
                name, context
            ))),
        }
    }
}

/// Evaluate `expression` with `memory` bound to the memory token.
///
/// Each call builds a fresh namespace, so the same input and memory always
/// produce the same outcome.
pub fn evaluate(expression: &str, memory: Option<f64>) -> Result<f64> {
    if expression.trim().is_empty() {
        return Err(CalcError::invalid_expression("Empty expression"));
    }

    let tree = parse(expression)?;
    let namespace = Namespace::new(memory);

    match eval(&tree, &namespace).map_err(CalcError::evaluation)? {
        Value::Number(n) if n.is_nan() => Err(CalcError::NonNumericResult),
        Value::Number(n) => {
            tracing::debug!(expression, value = n, "evaluated");
            Ok(n)
        }
        Value::Empty | Value::Function(_) => Err(CalcError::NonNumericResult),
    }
}

/// Normalize an informal phrase, then evaluate it.
///
/// Returns the expression that was actually evaluated alongside the value.
pub fn evaluate_phrase(text: &str, memory: Option<f64>) -> Result<(String, f64)> {
    let expression = normalize(text);
    let value = evaluate(&expression, memory)?;
    Ok((expression, value))
}

fn eval(expr: &Expr, ns: &Namespace) -> Result<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Name(name) => Ok(match ns.resolve(name)? {
            Binding::Constant(v) => Value::Number(v),
            Binding::Memory(Some(v)) => Value::Number(v),
            Binding::Memory(None) => Value::Empty,
            Binding::Function(f) => Value::Function(f.name),
        }),
        Expr::Unary(op, operand) => {
            let x = eval(operand, ns)?.number("unary operator")?;
            Ok(Value::Number(match op {
                UnaryOp::Neg => -x,
                UnaryOp::Pos => x,
            }))
        }
        Expr::Chain(first, rest) => {
            let mut acc = eval(first, ns)?.number("arithmetic")?;
            for (op, operand) in rest {
                let y = eval(operand, ns)?.number("arithmetic")?;
                acc = binary(*op, acc, y)?;
            }
            Ok(Value::Number(acc))
        }
        Expr::Power(base, exponent) => {
            let x = eval(base, ns)?.number("arithmetic")?;
            let y = eval(exponent, ns)?.number("arithmetic")?;
            checked_power(x, y).map(Value::Number)
        }
        Expr::Call(name, args) => {
            let function = match ns.resolve(name)? {
                Binding::Function(f) => f,
                _ => {
                    return Err(CalcError::invalid_expression(format!(
                        "Error evaluating expression: '{}' is not callable",
                        name
                    )));
                }
            };
            let values = args
                .iter()
                .map(|arg| eval(arg, ns)?.number("a function argument"))
                .collect::<Result<Vec<f64>>>()?;
            function.call(&values).map(Value::Number)
        }
    }
}

fn binary(op: BinaryOp, x: f64, y: f64) -> Result<f64> {
    match op {
        BinaryOp::Add => Ok(ops::add(x, y)),
        BinaryOp::Sub => Ok(ops::subtract(x, y)),
        BinaryOp::Mul => Ok(ops::multiply(x, y)),
        BinaryOp::Div => ops::divide(x, y),
        BinaryOp::FloorDiv => ops::floor_divide(x, y),
        BinaryOp::Mod => ops::modulus(x, y),
    }
}

/// Outcome of evaluating user input, ready for display.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalcResult {
    /// Successful calculation with a valid numeric result.
    Success {
        /// The input as the user typed it.
        input: String,
        /// The expression that was evaluated after normalization.
        expression: String,
        /// The numeric value.
        value: f64,
        /// Formatted for display.
        display_result: String,
        /// Formatted for re-entry and the clipboard (no separators).
        clipboard_result: String,
    },
    /// Evaluation failed.
    Error {
        input: String,
        kind: &'static str,
        message: String,
    },
}

impl CalcResult {
    /// Evaluate `input`, optionally through the phrase normalizer, and format
    /// the outcome with `format`.
    pub fn evaluate(
        input: &str,
        memory: Option<f64>,
        phrases: bool,
        format: &NumberFormat,
    ) -> Self {
        let input = input.trim().to_string();
        let outcome = if phrases {
            evaluate_phrase(&input, memory)
        } else {
            evaluate(&input, memory).map(|value| (input.clone(), value))
        };

        match outcome {
            Ok((expression, value)) => Self::Success {
                display_result: format.display(value),
                clipboard_result: format.raw(value),
                input,
                expression,
                value,
            },
            Err(err) => {
                tracing::debug!(input = %input, error = %err, "evaluation failed");
                Self::Error {
                    kind: err.kind(),
                    message: err.to_string(),
                    input,
                }
            }
        }
    }

    /// The original input.
    pub fn input(&self) -> &str {
        match self {
            Self::Success { input, .. } => input,
            Self::Error { input, .. } => input,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The numeric value of a successful result.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            Self::Error { .. } => None,
        }
    }

    /// Get the display string (result or error message).
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { message, .. } => message,
        }
    }

    /// Get the clipboard string (only for successful results).
    pub fn clipboard(&self) -> Option<&str> {
        match self {
            Self::Success {
                clipboard_result, ..
            } => Some(clipboard_result),
            Self::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_basic_evaluation() {
        assert_eq!(evaluate("2 + 2", None), Ok(4.0));
        assert!(approx(
            evaluate("5 * 4 + 2 + 3 / 4 + 5 - 7", None).unwrap(),
            5.0 * 4.0 + 2.0 + 3.0 / 4.0 + 5.0 - 7.0
        ));
        assert_eq!(evaluate("-2 ** 2", None), Ok(-4.0));
        assert_eq!(evaluate("2 ** 3 ** 2", None), Ok(512.0));
        assert_eq!(evaluate("2 ^ 8", None), Ok(256.0));
        assert_eq!(evaluate("7 // 2", None), Ok(3.0));
        assert_eq!(evaluate("-7 % 3", None), Ok(2.0));
    }

    #[test]
    fn test_math_functions_use_degrees() {
        let expected = 30f64.to_radians().sin() + 2.0 - 4.0;
        let value = evaluate("sin(30) + log10(100) - sqrt(16)", None).unwrap();
        assert!(approx(value, expected));
        assert!(approx(evaluate("asin(1)", None).unwrap(), 90.0));
        assert!(approx(evaluate("cos(60)", None).unwrap(), 0.5));
        // `pi` is just a number here, so it is read as pi degrees.
        assert!(approx(
            evaluate("cos(pi)", None).unwrap(),
            std::f64::consts::PI.to_radians().cos()
        ));
    }

    #[test]
    fn test_memory_round_trip() {
        let m = evaluate("2 + 2", None).unwrap();
        assert_eq!(evaluate("M * 3", Some(m)), Ok(12.0));
    }

    #[test]
    fn test_empty_memory() {
        assert!(matches!(
            evaluate("M * 3", None),
            Err(CalcError::InvalidExpression { .. })
        ));
        assert_eq!(evaluate("M", None), Err(CalcError::NonNumericResult));
    }

    #[test]
    fn test_empty_input() {
        for input in ["", "   ", "\t\n"] {
            let err = evaluate(input, None).unwrap_err();
            assert_eq!(err.to_string(), "Empty expression");
        }
    }

    #[test]
    fn test_unknown_identifiers_are_rejected() {
        for input in [
            "__import__('os')",
            "__import__",
            "x + 1",
            "open(1)",
            "sin.__class__",
            "M.__dict__",
            "exit()",
            "().__class__",
        ] {
            assert!(
                matches!(evaluate(input, Some(1.0)), Err(CalcError::InvalidExpression { .. })),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_domain_errors_are_wrapped() {
        let err = evaluate("sqrt(-1)", None).unwrap_err();
        assert!(matches!(err, CalcError::InvalidExpression { .. }));
        assert!(matches!(err.cause(), Some(CalcError::DomainError(_))));
        assert!(err.to_string().contains("Square root of negative number"));

        let err = evaluate("1 / 0", None).unwrap_err();
        assert!(matches!(err.cause(), Some(CalcError::DivisionByZero(_))));
    }

    #[test]
    fn test_non_numeric_results() {
        assert_eq!(evaluate("sqrt", None), Err(CalcError::NonNumericResult));
        assert_eq!(evaluate("inf - inf", None), Err(CalcError::NonNumericResult));
        assert!(matches!(
            evaluate("sqrt + 1", None),
            Err(CalcError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_calling_a_constant_fails() {
        assert!(matches!(
            evaluate("pi(2)", None),
            Err(CalcError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_power_overflow() {
        assert!(evaluate("10 ** 400", None).is_err());
        assert!(evaluate("0 ** -1", None).is_err());
    }

    #[test]
    fn test_idempotent() {
        let first = evaluate("sin(45) * M + round(2.5)", Some(3.0));
        let second = evaluate("sin(45) * M + round(2.5)", Some(3.0));
        assert_eq!(first, second);

        for input in ["sqrt(-1) + M", "x * 2", "1 / (M - 3)"] {
            let first = evaluate(input, Some(3.0));
            assert!(first.is_err(), "{:?} should fail", input);
            assert_eq!(first, evaluate(input, Some(3.0)));
        }
    }

    #[test]
    fn test_long_flat_expressions() {
        let sum = vec!["1"; 100_000].join("+");
        assert_eq!(evaluate(&sum, None), Ok(100_000.0));

        let product = vec!["1"; 100_000].join(" * ");
        assert_eq!(evaluate(&product, None), Ok(1.0));

        let mixed = vec!["2 * 3 - 1"; 50_000].join(" + ");
        assert_eq!(evaluate(&mixed, None), Ok(250_000.0));

        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(
            evaluate(&deep, None),
            Err(CalcError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_phrases() {
        assert_eq!(evaluate_phrase("add 4 and 5", None).unwrap().1, 9.0);
        assert_eq!(evaluate_phrase("subtract 9 from 20", None).unwrap().1, 11.0);
        assert_eq!(evaluate_phrase("multiply 7 by 8", None).unwrap().1, 56.0);
        assert_eq!(evaluate_phrase("what is 2^10", None).unwrap().1, 1024.0);
        assert_eq!(evaluate_phrase("power 2 to 5", None).unwrap().1, 32.0);
        assert_eq!(evaluate_phrase("power 2 and 3", None).unwrap().1, 8.0);
        assert_eq!(evaluate_phrase("power 3 by 2", None).unwrap().1, 9.0);
        assert_eq!(evaluate_phrase("15 percent of 200", None).unwrap().1, 30.0);
        assert_eq!(evaluate_phrase("M times 2", Some(21.0)).unwrap().1, 42.0);
    }

    #[test]
    fn test_calc_result_success() {
        let result = CalcResult::evaluate("1000 * 1000", None, false, &NumberFormat {
            thousand_separators: true,
            ..NumberFormat::default()
        });
        assert!(result.is_success());
        assert_eq!(result.display(), "1,000,000");
        assert_eq!(result.clipboard(), Some("1000000"));
        assert_eq!(result.value(), Some(1_000_000.0));
    }

    #[test]
    fn test_calc_result_error() {
        let result = CalcResult::evaluate("2 +* 2", None, false, &NumberFormat::default());
        assert!(!result.is_success());
        assert_eq!(result.clipboard(), None);
        assert_eq!(result.input(), "2 +* 2");
        assert!(matches!(
            result,
            CalcResult::Error {
                kind: "invalid_expression",
                ..
            }
        ));
    }

    #[test]
    fn test_calc_result_with_phrases() {
        let result =
            CalcResult::evaluate("divide 10 by 4", None, true, &NumberFormat::default());
        assert_eq!(result.display(), "2.5");
        assert!(matches!(
            result,
            CalcResult::Success { ref expression, .. } if expression == "(10 / 4)"
        ));
    }
}
