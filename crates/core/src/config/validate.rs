use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Browse page size is at least 1
/// - Upload limits leave room for the exam file next to the previews
/// - Extension lists are non-empty and dot-prefixed
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.browse.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "browse.page_size must be at least 1".to_string(),
        ));
    }

    let upload = &config.upload;
    if upload.max_files == 0 {
        return Err(ConfigError::ValidationError(
            "upload.max_files must be at least 1".to_string(),
        ));
    }
    if upload.max_previews >= upload.max_files {
        return Err(ConfigError::ValidationError(format!(
            "upload.max_previews ({}) must be below upload.max_files ({})",
            upload.max_previews, upload.max_files
        )));
    }

    for (key, extensions) in [
        ("upload.exam_extensions", &upload.exam_extensions),
        ("upload.preview_extensions", &upload.preview_extensions),
    ] {
        if extensions.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                key
            )));
        }
        if let Some(bad) = extensions.iter().find(|ext| !ext.starts_with('.')) {
            return Err(ConfigError::ValidationError(format!(
                "{} entry '{}' must start with '.'",
                key, bad
            )));
        }
    }

    Ok(())
}
