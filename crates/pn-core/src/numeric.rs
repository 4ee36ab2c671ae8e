/// Floating point type used throughout the system.
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Parse a number typed by a human into a field meant for one.
///
/// The first comma is read as a decimal separator, every character that
/// cannot belong to a number is dropped (`"DN 160"` reads as 160), and the
/// longest numeric prefix of what remains is parsed. Returns `None` for
/// blank or non-finite input.
pub fn parse_lenient(text: &str) -> Option<Real> {
    let cleaned: String = text
        .trim()
        .replacen(',', ".", 1)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let prefix = numeric_prefix(&cleaned);
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<Real>().ok().filter(|v| v.is_finite())
}

/// Longest `-?digits(.digits)?` prefix.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let mut seen_dot = false;
    let mut seen_digit = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if seen_digit { &s[..end] } else { "" }
}

/// A numeric field that may arrive either as a number or as text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum LenientNumber {
    Number(Real),
    Text(String),
}

impl LenientNumber {
    /// Finite numeric value, if any.
    pub fn value(&self) -> Option<Real> {
        match self {
            LenientNumber::Number(v) if v.is_finite() => Some(*v),
            LenientNumber::Number(_) => None,
            LenientNumber::Text(text) => parse_lenient(text),
        }
    }
}

impl From<Real> for LenientNumber {
    fn from(v: Real) -> Self {
        LenientNumber::Number(v)
    }
}

impl From<&str> for LenientNumber {
    fn from(text: &str) -> Self {
        LenientNumber::Text(text.to_string())
    }
}
