// Error kinds shared by the registry and the classifier

use thiserror::Error;

/// Every failure the library can report.
///
/// All operations are deterministic and do no I/O, so none of these are
/// worth retrying: the same input reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    /// Structural problem in a taxonomy definition (unknown group, duplicate
    /// id, category without triggers). Halts registry construction.
    #[error("Malformed taxonomy: {0}")]
    MalformedTaxonomy(String),

    /// Lookup of an id the registry does not know.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller passed an out-of-range argument (e.g. a threshold above 1.0).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, TaxonomyError>;

/// Reject values outside the closed unit interval (NaN included).
pub fn ensure_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TaxonomyError::InvalidArgument(format!(
            "{} must be between 0.0 and 1.0, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_interval_bounds_are_inclusive() {
        assert!(ensure_unit_interval("threshold", 0.0).is_ok());
        assert!(ensure_unit_interval("threshold", 1.0).is_ok());
        assert!(ensure_unit_interval("threshold", 0.42).is_ok());
    }

    #[test]
    fn test_unit_interval_rejects_out_of_range() {
        let err = ensure_unit_interval("threshold", 1.5).unwrap_err();
        assert_eq!(
            err,
            TaxonomyError::InvalidArgument("threshold must be between 0.0 and 1.0, got 1.5".to_string())
        );
        assert!(ensure_unit_interval("threshold", -0.01).is_err());
        assert!(ensure_unit_interval("threshold", f64::NAN).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = TaxonomyError::NotFound("category Z9".to_string());
        assert_eq!(err.to_string(), "Not found: category Z9");
    }
}
