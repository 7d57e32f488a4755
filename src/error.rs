//!
//! Error types for the permission calculator.

/// Errors raised by the strict resolution path (`parse_permission` and
/// everything built on it). The lenient `parse` never produces these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// A flag name that is not present in the registry.
    #[error("Invalid permission key: {0}")]
    InvalidKey(String),
    /// An input that is neither raw bits nor a flag name.
    #[error("Invalid permission type: {0}")]
    InvalidType(&'static str),
}
