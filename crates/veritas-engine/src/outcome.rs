//! The result of one validation call.

use veritas_core::{ErrorEntry, ErrorPayload, Params};

/// Either the typed parameters or the path-qualified errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every parameter and global check passed.
    Valid(Params),
    /// At least one error, per-parameter entries first and globals last.
    Invalid(Vec<ErrorEntry>),
}

impl Outcome {
    /// Returns true on success.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the typed parameters on success.
    #[must_use]
    pub fn params(&self) -> Option<&Params> {
        match self {
            Self::Valid(params) => Some(params),
            Self::Invalid(_) => None,
        }
    }

    /// Returns the errors; empty on success.
    #[must_use]
    pub fn errors(&self) -> &[ErrorEntry] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<Params, Vec<ErrorEntry>> {
        match self {
            Self::Valid(params) => Ok(params),
            Self::Invalid(errors) => Err(errors),
        }
    }

    /// Returns the failure body, or `None` on success.
    ///
    /// With `collapse_single` a lone error is returned as a bare record.
    #[must_use]
    pub fn into_payload(self, collapse_single: bool) -> Option<ErrorPayload> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(ErrorPayload::from_entries(errors, collapse_single)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::Value;

    #[test]
    fn test_valid_outcome() {
        let mut params = Params::new();
        params.insert("age".to_string(), Value::Integer(42));
        let outcome = Outcome::Valid(params.clone());

        assert!(outcome.is_valid());
        assert!(outcome.errors().is_empty());
        assert_eq!(outcome.params(), Some(&params));
        assert_eq!(outcome.clone().into_payload(true), None);
        assert_eq!(outcome.into_result(), Ok(params));
    }

    #[test]
    fn test_invalid_outcome_payload() {
        let outcome = Outcome::Invalid(vec![ErrorEntry::for_param("age", "required")]);

        assert!(!outcome.is_valid());
        assert!(matches!(
            outcome.clone().into_payload(true),
            Some(ErrorPayload::One(_))
        ));
        assert!(matches!(
            outcome.into_payload(false),
            Some(ErrorPayload::Many(ref v)) if v.len() == 1
        ));
    }
}
