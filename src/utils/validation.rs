use crate::utils::error::{QueryError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(QueryError::Config {
            field: field_name.to_string(),
            message: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Identifiers end up inside generated SQL, so the character set is strict:
/// ASCII letters, digits and underscores, not starting with a digit.
pub fn validate_identifier(value: &str) -> Result<()> {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier(value.to_string()))
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(QueryError::Config {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }
    if path.contains('\0') {
        return Err(QueryError::Config {
            field: field_name.to_string(),
            message: "Path contains null bytes".to_string(),
        });
    }
    Ok(())
}
