//! Pure numeric operations with validated domains.
//!
//! Angles for `sine`/`cosine`/`tangent` are taken in degrees, and the inverse
//! trigonometric functions return degrees. Hyperbolic functions work on plain
//! values without any unit conversion.

use super::error::{CalcError, Result};

pub fn add(x: f64, y: f64) -> f64 {
    x + y
}

pub fn subtract(x: f64, y: f64) -> f64 {
    x - y
}

pub fn multiply(x: f64, y: f64) -> f64 {
    x * y
}

pub fn divide(x: f64, y: f64) -> Result<f64> {
    if y == 0.0 {
        return Err(CalcError::DivisionByZero("Division by zero"));
    }
    Ok(x / y)
}

/// Remainder taking the sign of the divisor, so `-7 mod 3 == 2`.
pub fn modulus(x: f64, y: f64) -> Result<f64> {
    if y == 0.0 {
        return Err(CalcError::DivisionByZero("Modulus by zero"));
    }
    let r = x % y;
    if r != 0.0 && (r < 0.0) != (y < 0.0) {
        Ok(r + y)
    } else {
        Ok(r)
    }
}

/// Integer floor of `x / y`.
pub fn floor_divide(x: f64, y: f64) -> Result<f64> {
    if y == 0.0 {
        return Err(CalcError::DivisionByZero("Floor division by zero"));
    }
    Ok((x / y).floor())
}

pub fn exponent(x: f64, y: f64) -> f64 {
    x.powf(y)
}

pub fn power_of_ten(x: f64) -> f64 {
    10f64.powf(x)
}

pub fn square_root(x: f64) -> Result<f64> {
    if x < 0.0 {
        return Err(CalcError::domain("Square root of negative number"));
    }
    Ok(x.sqrt())
}

pub fn log10(x: f64) -> Result<f64> {
    if x <= 0.0 {
        return Err(CalcError::domain("log10 undefined for non-positive numbers"));
    }
    Ok(x.log10())
}

pub fn natural_log(x: f64) -> Result<f64> {
    if x <= 0.0 {
        return Err(CalcError::domain("ln undefined for non-positive numbers"));
    }
    Ok(x.ln())
}

pub fn log_custom(x: f64, base: f64) -> Result<f64> {
    if x <= 0.0 || base <= 0.0 || base == 1.0 {
        return Err(CalcError::domain("log undefined for given x/base"));
    }
    Ok(x.ln() / base.ln())
}

pub fn sine(x: f64) -> f64 {
    x.to_radians().sin()
}

pub fn cosine(x: f64) -> f64 {
    x.to_radians().cos()
}

pub fn tangent(x: f64) -> f64 {
    x.to_radians().tan()
}

pub fn asin(x: f64) -> Result<f64> {
    if !(-1.0..=1.0).contains(&x) {
        return Err(CalcError::domain("asin input must be in [-1, 1]"));
    }
    Ok(x.asin().to_degrees())
}

pub fn acos(x: f64) -> Result<f64> {
    if !(-1.0..=1.0).contains(&x) {
        return Err(CalcError::domain("acos input must be in [-1, 1]"));
    }
    Ok(x.acos().to_degrees())
}

pub fn atan(x: f64) -> f64 {
    x.atan().to_degrees()
}

pub fn sinh(x: f64) -> f64 {
    x.sinh()
}

pub fn cosh(x: f64) -> f64 {
    x.cosh()
}

pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// Largest `n` whose factorial is still finite as an `f64`.
const MAX_FACTORIAL: u32 = 170;

pub fn factorial(x: f64) -> Result<f64> {
    if !x.is_finite() || x.fract() != 0.0 {
        return Err(CalcError::domain("factorial requires an integer value"));
    }
    if x < 0.0 {
        return Err(CalcError::domain(
            "factorial not defined for negative integers",
        ));
    }
    if x > MAX_FACTORIAL as f64 {
        return Err(CalcError::domain("factorial result too large"));
    }
    Ok((2..=x as u32).fold(1.0, |acc, n| acc * n as f64))
}

pub fn absolute(x: f64) -> f64 {
    x.abs()
}

pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub fn to_radians(x: f64) -> f64 {
    x.to_radians()
}

pub fn to_degrees(x: f64) -> f64 {
    x.to_degrees()
}

pub fn clamp(x: f64, min_value: f64, max_value: f64) -> Result<f64> {
    if min_value > max_value {
        return Err(CalcError::InvalidRange(
            "min_value cannot be greater than max_value".to_string(),
        ));
    }
    Ok(x.min(max_value).max(min_value))
}

pub fn percentage(x: f64, percent: f64) -> f64 {
    x * percent / 100.0
}

/// Truncate toward zero into an integer, the way `gcd`/`lcm` see their inputs.
fn truncate(x: f64, op: &str) -> Result<i64> {
    if !x.is_finite() {
        return Err(CalcError::domain(format!("{} requires finite values", op)));
    }
    let t = x.trunc();
    if t < i64::MIN as f64 || t > i64::MAX as f64 {
        return Err(CalcError::domain(format!("{} input out of range", op)));
    }
    Ok(t as i64)
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Greatest common divisor of the truncated inputs, always non-negative.
pub fn gcd(x: f64, y: f64) -> Result<f64> {
    let a = truncate(x, "gcd")?;
    let b = truncate(y, "gcd")?;
    Ok(gcd_u64(a.unsigned_abs(), b.unsigned_abs()) as f64)
}

/// Least common multiple of the truncated inputs; 0 when either is 0.
pub fn lcm(x: f64, y: f64) -> Result<f64> {
    let a = truncate(x, "lcm")?.unsigned_abs();
    let b = truncate(y, "lcm")?.unsigned_abs();
    if a == 0 || b == 0 {
        return Ok(0.0);
    }
    (a / gcd_u64(a, b))
        .checked_mul(b)
        .map(|v| v as f64)
        .ok_or_else(|| CalcError::domain("lcm result too large"))
}
