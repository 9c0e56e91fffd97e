use crate::utils::error::{FetchError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.to_string_lossy();

    if display.trim().is_empty() {
        return Err(FetchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if display.contains('\0') {
        return Err(FetchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(FetchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Names that end up as a single path component (conda env names, accessions).
pub fn validate_file_stem(field_name: &str, value: &str) -> Result<()> {
    let reason = if value.trim().is_empty() {
        Some("Value cannot be empty or whitespace-only")
    } else if value.chars().any(char::is_whitespace) {
        Some("Value cannot contain whitespace")
    } else if value.contains(['/', '\\']) {
        Some("Value cannot contain path separators")
    } else if value.contains('\0') {
        Some("Value contains null bytes")
    } else if value == "." || value == ".." {
        Some("Value cannot be a relative directory marker")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(FetchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("out_dir", Path::new("data/fastq")).is_ok());
        assert!(validate_path("out_dir", Path::new("")).is_err());
        assert!(validate_path("out_dir", Path::new("  ")).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("threads", 4usize, 1, 64).is_ok());
        assert!(validate_range("threads", 0usize, 1, 64).is_err());
        assert!(validate_range("threads", 65usize, 1, 64).is_err());
    }

    #[test]
    fn test_validate_file_stem() {
        assert!(validate_file_stem("name", "rnaseq").is_ok());
        assert!(validate_file_stem("name", "rna-seq_2").is_ok());
        assert!(validate_file_stem("name", "").is_err());
        assert!(validate_file_stem("name", "my env").is_err());
        assert!(validate_file_stem("name", "../etc").is_err());
        assert!(validate_file_stem("name", "..").is_err());
    }
}
