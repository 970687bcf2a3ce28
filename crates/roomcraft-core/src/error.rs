//! Error types for the Roomcraft workflow engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Roomcraft workspace.
///
/// The first six variants form the workflow taxonomy surfaced to callers.
/// The remaining ones cover the ambient concerns (configuration, IO,
/// serialization) of the adapters around the core.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomcraftError {
    /// Operation invoked out of workflow order
    #[error("Cannot {operation}: {missing} must be set first")]
    Precondition {
        operation: &'static str,
        missing: &'static str,
    },

    /// Unknown session, furniture type, or subtype
    #[error("{entity_type} not found: '{id}'{}", format_suggestions(.suggestions))]
    NotFound {
        entity_type: &'static str,
        id: String,
        suggestions: Vec<String>,
    },

    /// Malformed input (bad ranges, bad indices, unknown options)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Space budget exceeded; the item was not committed
    #[error(
        "Room too crowded: usage would be {usage_percent:.1}% of {room_area:.1} sqft \
         ({total_area:.1} sqft used), exceeding the {max_usage_percent:.1}% cap"
    )]
    Capacity {
        usage_percent: f64,
        max_usage_percent: f64,
        total_area: f64,
        room_area: f64,
    },

    /// Dimension estimate missing fields or outside sanity bounds
    #[error("Dimension estimation failed: {0}")]
    Estimation(String),

    /// Composition or network failure in an external service
    #[error("Upstream service failed: {0}")]
    Upstream(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(". Did you mean: {}?", suggestions.join(", "))
    }
}

impl RoomcraftError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Precondition error naming the missing prerequisite
    pub fn precondition(operation: &'static str, missing: &'static str) -> Self {
        Self::Precondition { operation, missing }
    }

    /// Creates a NotFound error without suggestions
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
            suggestions: Vec::new(),
        }
    }

    /// Creates a NotFound error carrying "did you mean" candidates
    pub fn not_found_with_suggestions(
        entity_type: &'static str,
        id: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
            suggestions,
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Estimation error
    pub fn estimation(message: impl Into<String>) -> Self {
        Self::Estimation(message.into())
    }

    /// Creates an Upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Capacity error
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity { .. })
    }

    /// Check if this is an Estimation error
    pub fn is_estimation(&self) -> bool {
        matches!(self, Self::Estimation(_))
    }

    /// Check if this is an Upstream error
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RoomcraftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for RoomcraftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RoomcraftError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for RoomcraftError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, RoomcraftError>`.
pub type Result<T> = std::result::Result<T, RoomcraftError>;
