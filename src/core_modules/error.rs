// THEORY:
// Every failure an interference can raise falls into one of two buckets: the
// interference was configured with bounds that can never work, or the frame it
// was handed cannot satisfy the transform. Both are reported synchronously and
// neither leaves a half-transformed frame behind. Configuration parsing adds a
// third bucket for malformed pipeline records.

use thiserror::Error;

/// Errors raised while building or applying interferences.
#[derive(Error, Debug)]
pub enum InterferenceError {
    /// A construction-time bound is inconsistent (min > max, p outside [0, 1], ...).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The frame cannot satisfy the requested transform.
    #[error("Incompatible input: {0}")]
    IncompatibleInput(String),

    /// The pipeline configuration could not be parsed or serialized.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InterferenceError>;

/// Shorthand for building an `InvalidParameter` error from a format string.
macro_rules! invalid_parameter {
    ($($arg:tt)*) => {
        $crate::core_modules::error::InterferenceError::InvalidParameter(format!($($arg)*))
    };
}

/// Shorthand for building an `IncompatibleInput` error from a format string.
macro_rules! incompatible_input {
    ($($arg:tt)*) => {
        $crate::core_modules::error::InterferenceError::IncompatibleInput(format!($($arg)*))
    };
}

pub(crate) use incompatible_input;
pub(crate) use invalid_parameter;

/// Fails with `InvalidParameter` unless `min <= max`. NaN bounds fail too.
pub(crate) fn ensure_ordered<T: PartialOrd + std::fmt::Display>(
    name: &str,
    min: T,
    max: T,
) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(invalid_parameter!(
            "{name}: minimum {min} is greater than maximum {max}"
        ))
    }
}

/// Fails with `InvalidParameter` unless both bounds are finite, ordered, and
/// `max - min` is itself finite, so a uniform draw over `[min, max]` is defined.
pub(crate) fn ensure_finite_range(name: &str, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(invalid_parameter!(
            "{name} bounds must be finite, got [{min}, {max}]"
        ));
    }
    ensure_ordered(name, min, max)?;
    if !(max - min).is_finite() {
        return Err(invalid_parameter!(
            "{name}: span of [{min}, {max}] overflows"
        ));
    }
    Ok(())
}

/// Fails with `InvalidParameter` unless `value` lies in `[low, high]`.
pub(crate) fn ensure_within(name: &str, value: f64, low: f64, high: f64) -> Result<()> {
    if (low..=high).contains(&value) {
        Ok(())
    } else {
        Err(invalid_parameter!(
            "{name} must lie in [{low}, {high}], got {value}"
        ))
    }
}
