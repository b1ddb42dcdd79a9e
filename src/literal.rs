//! Canonical text forms for every singleton kind.
//!
//! The same parsers back CLI coercion and the decoding of tagged JSON
//! values, and [`Value`]'s `Display` is their inverse, so text written by
//! one side is always accepted by the other.

use std::path::PathBuf;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::Zero;

use crate::types::{Kind, Value};

/// Parse `text` as a value of `kind`.
pub fn parse(kind: Kind, text: &str) -> Result<Value, String> {
    match kind {
        Kind::Integer => text
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| malformed(kind, text)),
        Kind::Rational => parse_rational(text).map(Value::Rational),
        Kind::Decimal => BigDecimal::from_str(text.trim())
            .map(Value::Decimal)
            .map_err(|_| malformed(kind, text)),
        Kind::Float => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| malformed(kind, text)),
        Kind::Complex => parse_complex(text).map(Value::Complex),
        Kind::Text => Ok(Value::Text(text.to_string())),
        Kind::Boolean => parse_bool(text).map(Value::Boolean),
        Kind::Path => Ok(Value::Path(PathBuf::from(text))),
    }
}

/// Strict boolean literal: `true` or `false`, case-insensitive.
pub fn parse_bool(text: &str) -> Result<bool, String> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("`{text}` is a malformed boolean string"))
    }
}

/// Parse `n/d`, an integer, or a finite decimal literal into an exact rational.
pub fn parse_rational(text: &str) -> Result<BigRational, String> {
    let s = text.trim();
    if let Some((numer, denom)) = s.split_once('/') {
        let numer = BigInt::from_str(numer).map_err(|_| malformed(Kind::Rational, text))?;
        let denom = BigInt::from_str(denom).map_err(|_| malformed(Kind::Rational, text))?;
        if denom.is_zero() {
            return Err(format!("`{text}` has a zero denominator"));
        }
        return Ok(BigRational::new(numer, denom));
    }

    let decimal = BigDecimal::from_str(s).map_err(|_| malformed(Kind::Rational, text))?;
    let (digits, scale) = decimal.as_bigint_and_exponent();
    let ten = BigInt::from(10u32);
    if scale >= 0 {
        let denom = num_traits::pow(ten, scale as usize);
        Ok(BigRational::new(digits, denom))
    } else {
        let factor = num_traits::pow(ten, scale.unsigned_abs() as usize);
        Ok(BigRational::from_integer(digits * factor))
    }
}

/// Parse `a+bj`-style complex text.
///
/// Accepts an optional surrounding pair of parentheses, `j` or `J` as the
/// imaginary unit, a bare real part (`2.5`), or a bare imaginary part
/// (`-3j`, `j`).
pub fn parse_complex(text: &str) -> Result<Complex64, String> {
    let mut s = text.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        s = inner.trim();
    }
    if s.is_empty() {
        return Err(malformed(Kind::Complex, text));
    }

    let Some(body) = s.strip_suffix(['j', 'J']) else {
        let re = s.parse::<f64>().map_err(|_| malformed(Kind::Complex, text))?;
        return Ok(Complex64::new(re, 0.0));
    };

    // The split point is the last sign that is not part of an exponent.
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

    let (re, im) = match split {
        Some(i) => {
            let re = body[..i]
                .parse::<f64>()
                .map_err(|_| malformed(Kind::Complex, text))?;
            (re, parse_imaginary(&body[i..], text)?)
        }
        None => (0.0, parse_imaginary(body, text)?),
    };
    Ok(Complex64::new(re, im))
}

fn parse_imaginary(coefficient: &str, text: &str) -> Result<f64, String> {
    match coefficient {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        c => c.parse::<f64>().map_err(|_| malformed(Kind::Complex, text)),
    }
}

/// Format a complex number as `(a+bj)`, or `bj` when the real part is `+0`.
pub fn format_complex(c: &Complex64) -> String {
    let im = if c.im.is_sign_negative() && !c.im.is_nan() {
        format!("-{}", format_component(-c.im))
    } else {
        format!("+{}", format_component(c.im))
    };
    if c.re == 0.0 && c.re.is_sign_positive() {
        return format!("{}j", im.trim_start_matches('+'));
    }
    format!("({}{im}j)", format_component(c.re))
}

fn format_component(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else {
        x.to_string()
    }
}

fn malformed(kind: Kind, text: &str) -> String {
    format!("`{text}` is not a valid {kind}")
}
