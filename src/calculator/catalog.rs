//! The fixed catalog of menu operations.
//!
//! Menu positions 1 through 30 select an operation, 31 exits and 32 opens the
//! expression evaluator. The catalog is a static table and never changes.

use super::error::Result;
use super::operations as ops;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

/// Menu position that ends the console session.
pub const EXIT_CHOICE: u8 = 31;
/// Menu position that evaluates a free-form expression.
pub const EVALUATE_CHOICE: u8 = 32;

/// Callable behind a catalog entry, tagged by arity.
#[derive(Clone, Copy)]
pub enum OpFn {
    Unary(fn(f64) -> Result<f64>),
    Binary(fn(f64, f64) -> Result<f64>),
    Ternary(fn(f64, f64, f64) -> Result<f64>),
}

/// A named operation reachable from the console menu.
#[derive(Clone, Copy)]
pub struct Operation {
    /// Menu position, stable across releases.
    pub key: u8,
    /// Short name used in history entries and prompts.
    pub name: &'static str,
    /// Text shown in the menu.
    pub label: &'static str,
    /// One prompt fragment per argument.
    pub params: &'static [&'static str],
    pub func: OpFn,
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("arity", &self.arity())
            .finish()
    }
}

impl Operation {
    pub fn arity(&self) -> usize {
        match self.func {
            OpFn::Unary(_) => 1,
            OpFn::Binary(_) => 2,
            OpFn::Ternary(_) => 3,
        }
    }

    /// Invoke the operation. `args` must hold exactly `arity()` values.
    pub fn call(&self, args: &[f64]) -> Result<f64> {
        match (self.func, args) {
            (OpFn::Unary(f), [x]) => f(*x),
            (OpFn::Binary(f), [x, y]) => f(*x, *y),
            (OpFn::Ternary(f), [x, y, z]) => f(*x, *y, *z),
            _ => Err(super::CalcError::invalid_expression(format!(
                "{} expects {} argument(s), got {}",
                self.name,
                self.arity(),
                args.len()
            ))),
        }
    }

    /// Prompt text for each argument, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.params
            .iter()
            .map(|param| format!("Enter {} for {}: ", param, self.name))
            .collect()
    }

    /// Call description for history, e.g. `gcd(12, 18)`.
    pub fn describe(&self, args: &[String]) -> String {
        format!("{}({})", self.name, args.join(", "))
    }

    pub fn summary(&self) -> OperationSummary {
        OperationSummary {
            key: self.key,
            name: self.name,
            label: self.label,
            arity: self.arity(),
        }
    }
}

/// Serializable view of a catalog entry.
#[derive(Clone, Debug, Serialize)]
pub struct OperationSummary {
    pub key: u8,
    pub name: &'static str,
    pub label: &'static str,
    pub arity: usize,
}

const ONE: &[&str] = &["number"];
const TWO: &[&str] = &["first number", "second number"];

/// All menu operations, ordered by menu position.
pub static OPERATIONS: [Operation; 30] = [
    Operation {
        key: 1,
        name: "add",
        label: "Add",
        params: TWO,
        func: OpFn::Binary(|x, y| Ok(ops::add(x, y))),
    },
    Operation {
        key: 2,
        name: "subtract",
        label: "Subtract",
        params: TWO,
        func: OpFn::Binary(|x, y| Ok(ops::subtract(x, y))),
    },
    Operation {
        key: 3,
        name: "multiply",
        label: "Multiply",
        params: TWO,
        func: OpFn::Binary(|x, y| Ok(ops::multiply(x, y))),
    },
    Operation {
        key: 4,
        name: "divide",
        label: "Divide",
        params: TWO,
        func: OpFn::Binary(ops::divide),
    },
    Operation {
        key: 5,
        name: "exponent",
        label: "Exponent",
        params: TWO,
        func: OpFn::Binary(|x, y| Ok(ops::exponent(x, y))),
    },
    Operation {
        key: 6,
        name: "modulus",
        label: "Modulus",
        params: TWO,
        func: OpFn::Binary(ops::modulus),
    },
    Operation {
        key: 7,
        name: "square_root",
        label: "Square root",
        params: ONE,
        func: OpFn::Unary(ops::square_root),
    },
    Operation {
        key: 8,
        name: "floor_divide",
        label: "Floor divide (x // y)",
        params: TWO,
        func: OpFn::Binary(ops::floor_divide),
    },
    Operation {
        key: 9,
        name: "log10",
        label: "Log base 10",
        params: ONE,
        func: OpFn::Unary(ops::log10),
    },
    Operation {
        key: 10,
        name: "ln",
        label: "Natural log (ln)",
        params: ONE,
        func: OpFn::Unary(ops::natural_log),
    },
    Operation {
        key: 11,
        name: "sin (deg)",
        label: "Sine (degrees)",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::sine(x))),
    },
    Operation {
        key: 12,
        name: "cos (deg)",
        label: "Cosine (degrees)",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::cosine(x))),
    },
    Operation {
        key: 13,
        name: "tan (deg)",
        label: "Tangent (degrees)",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::tangent(x))),
    },
    Operation {
        key: 14,
        name: "factorial",
        label: "Factorial",
        params: ONE,
        func: OpFn::Unary(ops::factorial),
    },
    Operation {
        key: 15,
        name: "abs",
        label: "Absolute value",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::absolute(x))),
    },
    Operation {
        key: 16,
        name: "10^x",
        label: "Power of 10 (10^x)",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::power_of_ten(x))),
    },
    Operation {
        key: 17,
        name: "to radians",
        label: "Convert to radians",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::to_radians(x))),
    },
    Operation {
        key: 18,
        name: "to degrees",
        label: "Convert to degrees",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::to_degrees(x))),
    },
    Operation {
        key: 19,
        name: "sign",
        label: "Sign function",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::sign(x))),
    },
    Operation {
        key: 20,
        name: "clamp",
        label: "Clamp value",
        params: &["number to be clamped", "minimum value", "maximum value"],
        func: OpFn::Ternary(ops::clamp),
    },
    Operation {
        key: 21,
        name: "percentage",
        label: "Percentage",
        params: &["number", "percent"],
        func: OpFn::Binary(|x, p| Ok(ops::percentage(x, p))),
    },
    Operation {
        key: 22,
        name: "gcd",
        label: "GCD",
        params: TWO,
        func: OpFn::Binary(ops::gcd),
    },
    Operation {
        key: 23,
        name: "lcm",
        label: "LCM",
        params: TWO,
        func: OpFn::Binary(ops::lcm),
    },
    Operation {
        key: 24,
        name: "log base",
        label: "Log with custom base",
        params: &["number", "base"],
        func: OpFn::Binary(ops::log_custom),
    },
    Operation {
        key: 25,
        name: "sinh",
        label: "Sinh",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::sinh(x))),
    },
    Operation {
        key: 26,
        name: "cosh",
        label: "Cosh",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::cosh(x))),
    },
    Operation {
        key: 27,
        name: "tanh",
        label: "Tanh",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::tanh(x))),
    },
    Operation {
        key: 28,
        name: "asin (return deg)",
        label: "Asin (input -1..1, returns degrees)",
        params: ONE,
        func: OpFn::Unary(ops::asin),
    },
    Operation {
        key: 29,
        name: "acos (return deg)",
        label: "Acos (input -1..1, returns degrees)",
        params: ONE,
        func: OpFn::Unary(ops::acos),
    },
    Operation {
        key: 30,
        name: "atan (return deg)",
        label: "Atan (returns degrees)",
        params: ONE,
        func: OpFn::Unary(|x| Ok(ops::atan(x))),
    },
];

/// Look up an operation by its menu position.
pub fn by_key(key: u8) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.key == key)
}

/// Exact, case-insensitive match against an operation's name or label.
pub fn by_name(name: &str) -> Option<&'static Operation> {
    let name = name.trim();
    OPERATIONS
        .iter()
        .find(|op| op.name.eq_ignore_ascii_case(name) || op.label.eq_ignore_ascii_case(name))
}

/// Best fuzzy match of `query` against operation names and labels.
pub fn search(query: &str) -> Option<&'static Operation> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    OPERATIONS
        .iter()
        .filter_map(|op| {
            let by_name = matcher.fuzzy_match(op.name, query);
            let by_label = matcher.fuzzy_match(op.label, query);
            by_name.max(by_label).map(|score| (op, score))
        })
        // Earlier menu entries win ties.
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.key.cmp(&a.0.key)))
        .map(|(op, _)| op)
}

/// Menu text, one line per choice.
pub fn menu_lines() -> Vec<String> {
    let mut lines: Vec<String> = OPERATIONS
        .iter()
        .map(|op| format!("{}. {}", op.key, op.label))
        .collect();
    lines.push(format!("{}. Exit", EXIT_CHOICE));
    lines.push(format!("{}. Evaluate full expression", EVALUATE_CHOICE));
    lines
}
