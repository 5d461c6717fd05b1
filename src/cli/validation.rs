//! CLI argument validation functions
//!
//! Value parsers for arguments clap cannot check on its own.

use std::fs;
use std::path::PathBuf;

/// Upper bound for the due-date window
const MAX_DAYS: i32 = 365;

/// Validate that a configuration file exists and is readable
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    validate_readable_file(path_str, "Configuration file")
}

/// Validate that an input file exists and is readable
pub fn validate_input_file(path_str: &str) -> Result<PathBuf, String> {
    validate_readable_file(path_str, "Input file")
}

fn validate_readable_file(path_str: &str, what: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("{} does not exist: '{}'", what, path_str));
    }

    if !path.is_file() {
        return Err(format!("{} path is not a file: '{}'", what, path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read {} '{}': {}", what.to_lowercase(), path_str, e)),
    }
}

/// Validate the number of days ahead (0-365)
pub fn validate_days(days_str: &str) -> Result<i32, String> {
    let days: i32 = days_str
        .parse()
        .map_err(|_| format!("Days must be a whole number, got: '{}'", days_str))?;

    if !(0..=MAX_DAYS).contains(&days) {
        return Err(format!("Days must be between 0 and {}, got: {}", MAX_DAYS, days));
    }

    Ok(days)
}

/// Validate the record limit (0 means unlimited)
pub fn validate_limit(limit_str: &str) -> Result<i64, String> {
    let limit: i64 = limit_str
        .parse()
        .map_err(|_| format!("Limit must be a whole number, got: '{}'", limit_str))?;

    if limit < 0 {
        return Err("Limit cannot be negative. Use 0 for no limit.".to_string());
    }

    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_days_validation_valid() {
        for days_str in ["0", "1", "7", "30", "365"] {
            let result = validate_days(days_str);
            assert!(result.is_ok(), "Days {} should be valid", days_str);
        }
    }

    #[test]
    fn test_days_validation_invalid() {
        for days_str in ["-1", "366", "abc", "", "1.5"] {
            let result = validate_days(days_str);
            assert!(result.is_err(), "Days '{}' should be invalid", days_str);
        }
    }

    #[test]
    fn test_limit_validation() {
        assert_eq!(validate_limit("0"), Ok(0));
        assert_eq!(validate_limit("25"), Ok(25));
        assert!(validate_limit("-3").is_err());
        assert!(validate_limit("ten").is_err());
    }

    #[test]
    fn test_file_validation() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(validate_input_file(path).unwrap(), file.path());

        let dir = file.path().parent().unwrap().to_str().unwrap();
        assert!(validate_config_file_path(dir).unwrap_err().contains("not a file"));
        assert!(
            validate_config_file_path("/definitely/not/here.toml")
                .unwrap_err()
                .contains("does not exist")
        );
    }
}
