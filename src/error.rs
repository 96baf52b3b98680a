//! Error types for parity checks

use thiserror::Error;

/// Which side of the comparison an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// Main error type for parity checks
#[derive(Error, Debug)]
pub enum ParityError {
    /// Connecting to or querying a data source failed. The message is the
    /// driver's own text.
    #[error("{message}")]
    Fetch { side: Option<Side>, message: String },

    /// The engine family is unknown or not compiled in
    #[error("Unsupported engine: {0}")]
    UnsupportedEngine(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the spreadsheet export failed
    #[error("Export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParityError {
    /// Create a Fetch error not yet attributed to a side
    pub fn fetch(message: impl Into<String>) -> Self {
        ParityError::Fetch {
            side: None,
            message: message.into(),
        }
    }

    /// Attribute a Fetch error to the side it happened on
    pub fn on_side(self, side: Side) -> Self {
        match self {
            ParityError::Fetch { message, .. } => ParityError::Fetch {
                side: Some(side),
                message,
            },
            other => other,
        }
    }

    /// Side a Fetch error was attributed to
    pub fn side(&self) -> Option<Side> {
        match self {
            ParityError::Fetch { side, .. } => *side,
            _ => None,
        }
    }

    /// True for connectivity and query failures, which are shown verbatim
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            ParityError::Fetch { .. } | ParityError::UnsupportedEngine(_)
        )
    }
}

/// Result type alias for parity checks
pub type Result<T> = std::result::Result<T, ParityError>;
