//! Panel configuration
//!
//! Plain data describing a panel, fixed at registration time. Everything
//! here deserializes from the YAML panel definitions file; closures (hooks,
//! ownership predicates) live in [`super::hooks`] instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::host::{Axis, WindowFlags};

/// Where a panel window is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Right,
    Above,
    Below,
    Float,
}

impl Position {
    /// Axis along which `size` is measured (None for floating panels)
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Position::Left | Position::Right => Some(Axis::Horizontal),
            Position::Above | Position::Below => Some(Axis::Vertical),
            Position::Float => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Position::Float)
    }

    /// Rank used by position-based startup ordering
    pub fn startup_rank(&self) -> u8 {
        match self {
            Position::Left => 0,
            Position::Right => 1,
            Position::Above => 2,
            Position::Below => 3,
            Position::Float => 4,
        }
    }

    /// All positions for iteration
    pub const ALL: [Position; 5] = [
        Position::Left,
        Position::Right,
        Position::Above,
        Position::Below,
        Position::Float,
    ];
}

/// Width or height of a floating window
///
/// Integers are absolute cell counts. Floats and strings are relative to the
/// screen and are resolved (and validated) when geometry is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Cells(i64),
    Fraction(f64),
    Text(String),
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Fraction(0.5)
    }
}

/// Geometry parameters for floating panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WindowConfig {
    /// Two-letter vertical/horizontal code (e.g. "NE"), or a single letter
    #[serde(default)]
    pub anchor: Option<String>,

    #[serde(default)]
    pub margin: Option<u32>,

    #[serde(default)]
    pub width: Option<Dimension>,

    #[serde(default)]
    pub height: Option<Dimension>,

    /// Border style; absent or "none" means no border
    #[serde(default)]
    pub border: Option<String>,

    /// Pass-through decorations handed to the host untouched (title, …)
    #[serde(flatten)]
    pub decorations: BTreeMap<String, serde_json::Value>,
}

impl WindowConfig {
    pub fn has_border(&self) -> bool {
        self.border
            .as_deref()
            .map(|b| !b.eq_ignore_ascii_case("none") && !b.is_empty())
            .unwrap_or(false)
    }
}

/// Immutable configuration of one panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Display name, also used to address the panel from scripts
    pub name: String,

    /// Initial extent along the split axis
    #[serde(default = "default_size")]
    pub size: u32,

    #[serde(default = "default_position")]
    pub position: Position,

    /// Floating geometry (ignored for split positions)
    #[serde(default)]
    pub window: WindowConfig,

    /// Reopen the last shown content instead of the window's own
    #[serde(default = "default_true")]
    pub reuse_previous_buffer: bool,

    /// Claim windows the host surfaces when the ownership predicate matches
    #[serde(default)]
    pub claim_new_window: bool,

    /// Open (without focus) right after the startup hook runs
    #[serde(default)]
    pub open_on_startup: bool,
}

fn default_size() -> u32 {
    20
}

fn default_position() -> Position {
    Position::Below
}

fn default_true() -> bool {
    true
}

impl PanelConfig {
    pub fn new(name: impl Into<String>, position: Position, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
            position,
            window: WindowConfig::default(),
            reuse_previous_buffer: true,
            claim_new_window: false,
            open_on_startup: false,
        }
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_reuse(mut self, reuse: bool) -> Self {
        self.reuse_previous_buffer = reuse;
        self
    }

    pub fn with_claim(mut self, claim: bool) -> Self {
        self.claim_new_window = claim;
        self
    }

    pub fn with_open_on_startup(mut self, open: bool) -> Self {
        self.open_on_startup = open;
        self
    }

    /// Display flags applied to every window this panel owns
    ///
    /// The size along the split axis is pinned so that neighbouring splits
    /// opening or closing do not resize the panel.
    pub fn window_flags(&self) -> WindowFlags {
        WindowFlags {
            hide_on_close: true,
            unlisted: true,
            fixed_width: self.position.axis() == Some(Axis::Horizontal),
            fixed_height: self.position.axis() == Some(Axis::Vertical),
        }
    }
}
