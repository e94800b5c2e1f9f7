//! Configuration validation functions

use super::ValidationError;

/// Largest number of sibling listings allowed in flight
pub const MAX_REMOTE_CONCURRENCY: usize = 64;

/// Validate that a required setting is present
///
/// # Arguments
/// * `key` - Settings key, used in the error message
/// * `value` - Value as loaded
pub fn validate_required(key: &str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::ConfigError(format!("{} must be set", key)));
	}
	Ok(())
}

/// Validate that a remote root is an absolute `/`-separated path
pub fn validate_remote_root(key: &str, value: &str) -> Result<(), ValidationError> {
	validate_required(key, value)?;
	if !value.starts_with('/') {
		return Err(ValidationError::ConfigError(format!(
			"{} must be an absolute path, got {:?}",
			key, value
		)));
	}
	Ok(())
}

/// Validate the RPC port
pub fn validate_port(port: u16) -> Result<(), ValidationError> {
	if port == 0 {
		return Err(ValidationError::ConfigError("rpcPort must be greater than 0".to_string()));
	}
	Ok(())
}

/// Validate timeout in seconds
pub fn validate_timeout_secs(timeout_secs: u32) -> Result<(), ValidationError> {
	if timeout_secs == 0 {
		return Err(ValidationError::ConfigError("Timeout must be greater than 0".to_string()));
	}
	if timeout_secs > 3600 {
		return Err(ValidationError::ConfigError(format!(
			"Timeout too large: {} seconds (max 3600)",
			timeout_secs
		)));
	}
	Ok(())
}

/// Validate the number of concurrent remote listings
pub fn validate_concurrency(concurrency: usize) -> Result<(), ValidationError> {
	if concurrency == 0 {
		return Err(ValidationError::ConfigError(
			"remoteConcurrency must be at least 1".to_string(),
		));
	}
	if concurrency > MAX_REMOTE_CONCURRENCY {
		return Err(ValidationError::ConfigError(format!(
			"remoteConcurrency too high: {} (max {})",
			concurrency, MAX_REMOTE_CONCURRENCY
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validate_required() {
		assert!(validate_required("localRoot", "/mnt/tsl").is_ok());
		let result = validate_required("localRoot", "  ");
		assert!(result.unwrap_err().to_string().contains("localRoot must be set"));
	}

	#[test]
	fn test_validate_remote_root_relative() {
		let result = validate_remote_root("mountRoot", "Library");
		assert!(result.unwrap_err().to_string().contains("absolute"));
		assert!(validate_remote_root("mountRoot", "/Library").is_ok());
	}

	#[test]
	fn test_validate_port() {
		assert!(validate_port(5001).is_ok());
		assert!(validate_port(0).is_err());
	}

	#[test]
	fn test_validate_timeout_secs_valid() {
		assert!(validate_timeout_secs(1).is_ok());
		assert!(validate_timeout_secs(60).is_ok());
		assert!(validate_timeout_secs(3600).is_ok());
	}

	#[test]
	fn test_validate_timeout_secs_zero() {
		assert!(validate_timeout_secs(0).is_err());
	}

	#[test]
	fn test_validate_timeout_secs_too_large() {
		let result = validate_timeout_secs(3601);
		assert!(result.unwrap_err().to_string().contains("too large"));
	}

	#[test]
	fn test_validate_concurrency() {
		assert!(validate_concurrency(1).is_ok());
		assert!(validate_concurrency(MAX_REMOTE_CONCURRENCY).is_ok());
		assert!(validate_concurrency(0).is_err());
		let result = validate_concurrency(MAX_REMOTE_CONCURRENCY + 1);
		assert!(result.unwrap_err().to_string().contains("too high"));
	}
}
