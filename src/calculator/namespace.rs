//! The closed set of names an expression can refer to.
//!
//! Builtins live in a static table; a [`Namespace`] adds the caller's memory
//! slot on top. Nothing outside this table is reachable from an expression.

use super::error::{CalcError, Result};
use super::operations as ops;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Identifier bound to the memory slot.
pub const MEMORY_TOKEN: &str = "M";

/// A builtin function with an inclusive argument count range.
#[derive(Clone, Copy)]
pub struct Function {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    apply: fn(&[f64]) -> Result<f64>,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

impl Function {
    pub fn call(&self, args: &[f64]) -> Result<f64> {
        if args.len() < self.min_args || args.len() > self.max_args {
            let expected = if self.min_args == self.max_args {
                self.min_args.to_string()
            } else {
                format!("{} to {}", self.min_args, self.max_args)
            };
            return Err(CalcError::invalid_expression(format!(
                "Error evaluating expression: {}() takes {} argument(s) ({} given)",
                self.name,
                expected,
                args.len()
            )));
        }
        (self.apply)(args)
    }
}

/// What a name resolves to.
#[derive(Clone, Copy, Debug)]
pub enum Binding {
    Constant(f64),
    Function(Function),
    /// The memory slot; `None` until a first successful result.
    Memory(Option<f64>),
}

macro_rules! unary {
    ($name:literal, $f:expr) => {
        Function { name: $name, min_args: 1, max_args: 1, apply: |a| $f(a[0]) }
    };
}

macro_rules! binary {
    ($name:literal, $f:expr) => {
        Function { name: $name, min_args: 2, max_args: 2, apply: |a| $f(a[0], a[1]) }
    };
}

fn total(x: f64) -> Result<f64> {
    Ok(x)
}

fn to_integer(x: f64, rounded: f64) -> Result<f64> {
    if x.is_nan() {
        return Err(CalcError::domain("cannot convert float NaN to integer"));
    }
    if x.is_infinite() {
        return Err(CalcError::domain("cannot convert float infinity to integer"));
    }
    Ok(rounded)
}

fn asinh_checked(x: f64) -> Result<f64> {
    Ok(x.asinh())
}

fn acosh_checked(x: f64) -> Result<f64> {
    if x < 1.0 {
        return Err(CalcError::domain("acosh input must be >= 1"));
    }
    Ok(x.acosh())
}

fn atanh_checked(x: f64) -> Result<f64> {
    if x <= -1.0 || x >= 1.0 {
        return Err(CalcError::domain("atanh input must be in (-1, 1)"));
    }
    Ok(x.atanh())
}

fn log(args: &[f64]) -> Result<f64> {
    match args {
        [x] => ops::natural_log(*x),
        [x, base] => ops::log_custom(*x, *base),
        _ => unreachable!("arity checked by Function::call"),
    }
}

fn log2(x: f64) -> Result<f64> {
    if x <= 0.0 {
        return Err(CalcError::domain("log2 undefined for non-positive numbers"));
    }
    Ok(x.log2())
}

/// `round(x)` or `round(x, ndigits)`, ties to even.
fn round(args: &[f64]) -> Result<f64> {
    match args {
        [x] => to_integer(*x, x.round_ties_even()),
        [x, digits] => {
            if digits.fract() != 0.0 || !digits.is_finite() {
                return Err(CalcError::domain("round() ndigits must be an integer"));
            }
            if !x.is_finite() {
                return Ok(*x);
            }
            let digits = digits.clamp(-400.0, 400.0) as i32;
            let factor = 10f64.powi(digits.abs());
            if !factor.is_finite() {
                // Beyond f64 precision either way.
                return Ok(if digits < 0 { 0.0 } else { *x });
            }
            if digits >= 0 {
                let scaled = x * factor;
                if !scaled.is_finite() {
                    // Already has fewer fractional digits than requested.
                    return Ok(*x);
                }
                Ok(scaled.round_ties_even() / factor)
            } else {
                Ok((x / factor).round_ties_even() * factor)
            }
        }
        _ => unreachable!("arity checked by Function::call"),
    }
}

fn hypot(x: f64, y: f64) -> Result<f64> {
    Ok(x.hypot(y))
}

fn pow(x: f64, y: f64) -> Result<f64> {
    checked_power(x, y)
}

/// `x ** y`, rejecting results that leave the finite range from finite inputs.
pub fn checked_power(x: f64, y: f64) -> Result<f64> {
    let value = ops::exponent(x, y);
    if value.is_infinite() && x.is_finite() && y.is_finite() {
        if x == 0.0 {
            return Err(CalcError::DivisionByZero(
                "0.0 cannot be raised to a negative power",
            ));
        }
        return Err(CalcError::domain("numerical result out of range"));
    }
    Ok(value)
}

/// Every builtin, in the order listed by [`names`].
static FUNCTIONS: &[Function] = &[
    unary!("sin", |x| total(ops::sine(x))),
    unary!("cos", |x| total(ops::cosine(x))),
    unary!("tan", |x| total(ops::tangent(x))),
    unary!("asin", ops::asin),
    unary!("acos", ops::acos),
    unary!("atan", |x| total(ops::atan(x))),
    unary!("sinh", |x| total(ops::sinh(x))),
    unary!("cosh", |x| total(ops::cosh(x))),
    unary!("tanh", |x| total(ops::tanh(x))),
    unary!("asinh", asinh_checked),
    unary!("acosh", acosh_checked),
    unary!("atanh", atanh_checked),
    unary!("sqrt", ops::square_root),
    Function { name: "log", min_args: 1, max_args: 2, apply: log },
    unary!("log10", ops::log10),
    unary!("log2", log2),
    unary!("exp", |x: f64| total(x.exp())),
    unary!("abs", |x| total(ops::absolute(x))),
    unary!("fabs", |x| total(ops::absolute(x))),
    Function { name: "round", min_args: 1, max_args: 2, apply: round },
    binary!("pow", pow),
    unary!("floor", |x: f64| to_integer(x, x.floor())),
    unary!("ceil", |x: f64| to_integer(x, x.ceil())),
    unary!("trunc", |x: f64| to_integer(x, x.trunc())),
    unary!("factorial", ops::factorial),
    binary!("gcd", ops::gcd),
    binary!("lcm", ops::lcm),
    binary!("hypot", hypot),
    unary!("degrees", |x| total(ops::to_degrees(x))),
    unary!("radians", |x| total(ops::to_radians(x))),
];

static CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
    ("inf", f64::INFINITY),
];

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Binding> = {
        let mut map = HashMap::new();
        for function in FUNCTIONS {
            map.insert(function.name, Binding::Function(*function));
        }
        for (name, value) in CONSTANTS {
            map.insert(*name, Binding::Constant(*value));
        }
        map
    };
}

/// Names visible to one evaluation: the builtins plus the memory slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct Namespace {
    memory: Option<f64>,
}

impl Namespace {
    pub fn new(memory: Option<f64>) -> Self {
        Self { memory }
    }

    pub fn memory(&self) -> Option<f64> {
        self.memory
    }

    /// Resolve `name`, or fail the way an undefined name fails.
    ///
    /// The memory token also answers in lower case because phrase
    /// normalization lowercases its input.
    pub fn resolve(&self, name: &str) -> Result<Binding> {
        if name.contains("__") {
            return Err(CalcError::invalid_expression(format!(
                "Error evaluating expression: name '{}' is not allowed",
                name
            )));
        }
        if name.eq_ignore_ascii_case(MEMORY_TOKEN) {
            return Ok(Binding::Memory(self.memory));
        }
        BUILTINS.get(name).copied().ok_or_else(|| {
            CalcError::invalid_expression(format!(
                "Error evaluating expression: name '{}' is not defined",
                name
            ))
        })
    }
}

/// Every identifier an expression may use, memory token included.
pub fn names() -> Vec<&'static str> {
    FUNCTIONS
        .iter()
        .map(|f| f.name)
        .chain(CONSTANTS.iter().map(|(name, _)| *name))
        .chain(std::iter::once(MEMORY_TOKEN))
        .collect()
}
