//! Per-parameter validators.
//!
//! A parameter has at most one validator: either a custom function or one of
//! the builtin constraints. Validators only ever see successfully coerced,
//! non-null values.
//!
//! # Builtins
//!
//! | Builtin | Applies to | Message |
//! |---------|-----------|---------|
//! | `numericality` | integers, floats, decimals | `must be > 10` |
//! | `length` | string codepoint count | `length must be <= 20` |
//! | `size` | list (or map) length | `size must be >= 1` |
//! | `in` | any value | `must be one of: a, b` |
//! | `format` | strings | `invalid format` |
//!
//! Bounds are checked in the fixed order `gt`, `gte`, `lt`, `lte`, `eq`; the
//! first violated bound is reported.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use veritas_core::Value;

/// A custom validator function.
pub type CustomFn = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// A resolved validator attached to a parameter.
#[derive(Clone)]
pub enum Validator {
    /// User supplied function.
    Custom(CustomFn),
    /// One of the builtin constraints.
    Builtin(Builtin),
}

impl Validator {
    /// Checks a coerced value.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::Custom(f) => f(value),
            Self::Builtin(builtin) => builtin.check(value),
        }
    }

    /// Returns a short name, used in logs and configuration errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Custom(_) => "custom",
            Self::Builtin(builtin) => builtin.kind(),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(_) => write!(f, "Validator::Custom"),
            Self::Builtin(builtin) => write!(f, "Validator::Builtin({builtin:?})"),
        }
    }
}

/// A builtin constraint.
#[derive(Debug, Clone)]
pub enum Builtin {
    /// Numeric bounds on the value itself.
    Numericality(Bounds),
    /// Bounds on a string's codepoint count.
    Length(Bounds),
    /// Bounds on a collection's element count.
    Size(Bounds),
    /// Membership in an allowed list.
    In(Vec<Value>),
    /// Regular expression match (unanchored).
    Format(Regex),
}

impl Builtin {
    /// Returns the builtin's name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Numericality(_) => "numericality",
            Self::Length(_) => "length",
            Self::Size(_) => "size",
            Self::In(_) => "in",
            Self::Format(_) => "format",
        }
    }

    /// Checks a coerced value.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::Numericality(bounds) => {
                let n = Number::of(value).ok_or_else(|| "not a number".to_string())?;
                bounds.check(n, "")
            }
            Self::Length(bounds) => {
                let s = value.as_str().ok_or_else(|| "not a string".to_string())?;
                bounds.check(Number::count(s.chars().count()), "length ")
            }
            Self::Size(bounds) => {
                let count = match value {
                    Value::List(items) => items.len(),
                    Value::Map(map) => map.len(),
                    _ => return Err("not a collection".to_string()),
                };
                bounds.check(Number::count(count), "size ")
            }
            Self::In(allowed) => {
                if allowed.iter().any(|candidate| same_value(candidate, value)) {
                    Ok(())
                } else {
                    let list: Vec<String> = allowed.iter().map(ToString::to_string).collect();
                    Err(format!("must be one of: {}", list.join(", ")))
                }
            }
            Self::Format(pattern) => match value.as_str() {
                Some(s) if pattern.is_match(s) => Ok(()),
                _ => Err("invalid format".to_string()),
            },
        }
    }
}

/// A numeric value prepared for comparison.
///
/// Integers, decimals and floats within the decimal range compare exactly.
/// Floats beyond it fall back to `f64` comparison.
#[derive(Debug, Clone, Copy)]
enum Number {
    Exact(Decimal),
    Approx(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(Self::Exact(Decimal::from(*n))),
            Value::Decimal(d) => Some(Self::Exact(*d)),
            Value::Float(x) => Some(
                Decimal::try_from(*x)
                    .map(Self::Exact)
                    .unwrap_or(Self::Approx(*x)),
            ),
            _ => None,
        }
    }

    fn count(n: usize) -> Self {
        Self::Exact(Decimal::from(n as u64))
    }

    fn to_f64(self) -> Option<f64> {
        match self {
            Self::Exact(d) => d.to_f64(),
            Self::Approx(x) => Some(x),
        }
    }

    /// Orders `self` against `other`; `None` for NaN.
    fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Some(a.cmp(&b)),
            _ => self.to_f64()?.partial_cmp(&other.to_f64()?),
        }
    }
}

/// Membership equality: numbers compare by value regardless of kind.
fn same_value(allowed: &Value, value: &Value) -> bool {
    match (Number::of(allowed), Number::of(value)) {
        (Some(a), Some(b)) => a.compare(b) == Some(Ordering::Equal),
        _ => allowed == value,
    }
}

/// Comparison bounds shared by `numericality`, `length` and `size`.
///
/// # Example
///
/// ```
/// use veritas_schema::Bounds;
///
/// let bounds = Bounds::new().gt(10).lt(5);
/// assert!(!bounds.is_empty());
/// assert!(Bounds::new().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    gt: Option<Decimal>,
    gte: Option<Decimal>,
    lt: Option<Decimal>,
    lte: Option<Decimal>,
    eq: Option<Decimal>,
}

impl Bounds {
    /// Creates empty bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value must be strictly greater than `bound`.
    #[must_use]
    pub fn gt(mut self, bound: impl Into<Decimal>) -> Self {
        self.gt = Some(bound.into());
        self
    }

    /// Value must be greater than or equal to `bound`.
    #[must_use]
    pub fn gte(mut self, bound: impl Into<Decimal>) -> Self {
        self.gte = Some(bound.into());
        self
    }

    /// Value must be strictly less than `bound`.
    #[must_use]
    pub fn lt(mut self, bound: impl Into<Decimal>) -> Self {
        self.lt = Some(bound.into());
        self
    }

    /// Value must be less than or equal to `bound`.
    #[must_use]
    pub fn lte(mut self, bound: impl Into<Decimal>) -> Self {
        self.lte = Some(bound.into());
        self
    }

    /// Value must equal `bound`.
    #[must_use]
    pub fn eq(mut self, bound: impl Into<Decimal>) -> Self {
        self.eq = Some(bound.into());
        self
    }

    /// Returns true if no bound is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gt.is_none()
            && self.gte.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
            && self.eq.is_none()
    }

    fn check(&self, n: Number, subject: &str) -> Result<(), String> {
        let checks: [(Option<Decimal>, &str, fn(Ordering) -> bool); 5] = [
            (self.gt, ">", |o| o == Ordering::Greater),
            (self.gte, ">=", |o| o != Ordering::Less),
            (self.lt, "<", |o| o == Ordering::Less),
            (self.lte, "<=", |o| o != Ordering::Greater),
            (self.eq, "==", |o| o == Ordering::Equal),
        ];

        for (bound, op, holds) in checks {
            if let Some(bound) = bound {
                let ordering = n
                    .compare(Number::Exact(bound))
                    .ok_or_else(|| "not a number".to_string())?;
                if !holds(ordering) {
                    return Err(format!("{subject}must be {op} {bound}"));
                }
            }
        }
        Ok(())
    }
}

/// Applies `validator` to each element in order, stopping at the first failure.
///
/// It only inspects the sequence and never changes it. Call it
/// from a custom validator to check list elements individually.
///
/// # Example
///
/// ```
/// use veritas_core::Value;
/// use veritas_schema::validate_each;
///
/// let items = vec![Value::from(1), Value::from(-2), Value::from(-3)];
/// let outcome = validate_each(&items, |v| match v.as_i64() {
///     Some(n) if n > 0 => Ok(()),
///     _ => Err("must be positive".to_string()),
/// });
/// assert_eq!(outcome, Err("element at index 1: must be positive".to_string()));
/// ```
pub fn validate_each<F>(items: &[Value], validator: F) -> Result<(), String>
where
    F: Fn(&Value) -> Result<(), String>,
{
    for (index, item) in items.iter().enumerate() {
        validator(item).map_err(|reason| format!("element at index {index}: {reason}"))?;
    }
    Ok(())
}
