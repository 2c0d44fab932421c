use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Arguments
/// * `data_base_url` - The primary data source base URL to validate
/// * `fallback_base_url` - Optional secondary base URL to validate
/// * `log_file_path` - Optional log file path to validate
///
/// # Returns
/// * `Ok(())` - Configuration is valid
/// * `Err(AppError)` - Configuration validation failed
///
/// # Validation Rules
/// - Base URLs cannot be empty and must look like a URL or domain name
/// - If log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
pub fn validate_config(
    data_base_url: &str,
    fallback_base_url: &Option<String>,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    validate_base_url(data_base_url, "data base URL")?;

    if let Some(fallback) = fallback_base_url {
        validate_base_url(fallback, "fallback base URL")?;
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

fn validate_base_url(url: &str, label: &str) -> Result<(), AppError> {
    if url.is_empty() {
        return Err(AppError::config_error(format!("{label} cannot be empty")));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        // If it doesn't start with a protocol, it should at least look like a domain
        if !url.contains('.') && !url.starts_with("localhost") {
            return Err(AppError::config_error(format!(
                "{label} must be a valid URL or domain name"
            )));
        }
    }

    Ok(())
}
