//! Configuration validation
//!
//! Code that builds analyzers depends on `Validatable`, not on concrete
//! configuration types.

use super::error::ConfigResult;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use codegraph_dfa::config::Validatable;
///
/// fn build<C: Validatable>(config: C) -> Result<Analyzer, ConfigError> {
///     config.validate()?;
///     // ... build analyzer
/// }
/// ```
pub trait Validatable {
    /// Validate the configuration
    ///
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}
