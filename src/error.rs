//! Error types for panel operations
//!
//! Configuration errors (bad percentages, anchors, dimensions) are fatal to
//! the operation that computed geometry and always reach the caller. Host
//! failures are wrapped so the caller can tell which primitive refused.
//! Stale handles are not errors at all: operations on dead windows or
//! contents quietly become no-ops.

use crate::host::HostError;

/// Result type alias for panel operations
pub type PanelResult<T> = Result<T, PanelError>;

/// Errors that can occur while operating panels
#[derive(Debug, Clone, PartialEq)]
pub enum PanelError {
    /// A width/height string that is neither a number nor `N%`
    InvalidPercentage(String),
    /// An anchor outside {N,C,S} x {W,C,E}
    InvalidAnchor(String),
    /// A dimension that resolves to a non-positive or out-of-range size
    InvalidDimension(String),
    /// No registered panel with this name
    UnknownPanel(String),
    /// A host primitive failed
    Host(HostError),
}

impl std::fmt::Display for PanelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelError::InvalidPercentage(s) => write!(f, "Invalid percentage: {:?}", s),
            PanelError::InvalidAnchor(s) => write!(f, "Invalid anchor: {:?}", s),
            PanelError::InvalidDimension(s) => write!(f, "Invalid dimension: {}", s),
            PanelError::UnknownPanel(name) => write!(f, "Unknown panel: {}", name),
            PanelError::Host(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::Host(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HostError> for PanelError {
    fn from(e: HostError) -> Self {
        PanelError::Host(e)
    }
}

impl PanelError {
    /// Whether this error comes from panel configuration rather than the host
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PanelError::InvalidPercentage(_)
                | PanelError::InvalidAnchor(_)
                | PanelError::InvalidDimension(_)
        )
    }
}
