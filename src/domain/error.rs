use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("`{field}` must not be blank")]
    Blank { field: &'static str },
    #[error("`{field}` value {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("`{slug}` is not a valid slug")]
    InvalidSlug { slug: String },
    #[error("domain validation failed: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn blank(field: &'static str) -> Self {
        Self::Blank { field }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Reject empty or whitespace-only text for a required field.
pub fn ensure_non_blank(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::blank(field));
    }
    Ok(())
}

/// Reject values outside the closed range `[min, max]`.
pub fn ensure_in_range(
    value: f64,
    field: &'static str,
    min: f64,
    max: f64,
) -> Result<(), DomainError> {
    if !value.is_finite() || value < min || value > max {
        return Err(DomainError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            ensure_non_blank("   ", "name"),
            Err(DomainError::Blank { field: "name" })
        );
        assert!(ensure_non_blank("Taj Mahal", "name").is_ok());
    }

    #[test]
    fn range_is_inclusive() {
        assert!(ensure_in_range(0.0, "rating", 0.0, 9.99).is_ok());
        assert!(ensure_in_range(9.99, "rating", 0.0, 9.99).is_ok());
        assert!(ensure_in_range(10.0, "rating", 0.0, 9.99).is_err());
        assert!(ensure_in_range(f64::NAN, "rating", 0.0, 9.99).is_err());
    }
}
