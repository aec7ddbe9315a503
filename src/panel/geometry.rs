//! Geometry engine
//!
//! Pure functions from panel configuration, screen size and zoom flag to a
//! window placement. No state is kept here: identical inputs always produce
//! identical placements, which is what makes zoom reversible.
//!
//! ## Floating windows
//!
//! - `width`/`height` are absolute cells or relative to the screen
//!   (`"40%"`, `0.4`, `"0.4"`); height is relative to the lines left above
//!   the command line
//! - `margin` cells are kept free on every side of the visible box
//! - a border adds one cell of inset on each side; the returned `width` and
//!   `height` are the content box, `row`/`col` the visible box's corner

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use super::config::{Dimension, PanelConfig, Position, WindowConfig};
use crate::error::{PanelError, PanelResult};
use crate::host::ScreenSize;

/// Screen edge a split panel attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Above,
    Below,
}

/// Floating window geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatPlacement {
    pub row: u32,
    pub col: u32,
    pub width: u32,
    pub height: u32,
    pub border: Option<String>,
    pub decorations: BTreeMap<String, serde_json::Value>,
}

/// Host window-placement descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    /// Ordinary split attached to a screen edge
    Split { edge: Edge, size: u32 },
    /// Free-standing window over the layout
    Float(FloatPlacement),
}

impl Placement {
    pub fn is_float(&self) -> bool {
        matches!(self, Placement::Float(_))
    }
}

// ============================================================================
// Anchors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    North,
    Center,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    West,
    Center,
    East,
}

/// Corner/edge a floating window is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
}

impl Default for Anchor {
    fn default() -> Self {
        Self {
            vertical: VerticalAnchor::Center,
            horizontal: HorizontalAnchor::Center,
        }
    }
}

impl FromStr for Anchor {
    type Err = PanelError;

    /// Parse "NE", "SC", … or a single-letter shorthand ("N" means "NC")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let expanded = match code.as_str() {
            "N" => "NC",
            "S" => "SC",
            "E" => "CE",
            "W" => "CW",
            "C" => "CC",
            other => other,
        };

        let mut chars = expanded.chars();
        let (Some(v), Some(h), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(PanelError::InvalidAnchor(s.to_string()));
        };

        let vertical = match v {
            'N' => VerticalAnchor::North,
            'C' => VerticalAnchor::Center,
            'S' => VerticalAnchor::South,
            _ => return Err(PanelError::InvalidAnchor(s.to_string())),
        };
        let horizontal = match h {
            'W' => HorizontalAnchor::West,
            'C' => HorizontalAnchor::Center,
            'E' => HorizontalAnchor::East,
            _ => return Err(PanelError::InvalidAnchor(s.to_string())),
        };

        Ok(Self {
            vertical,
            horizontal,
        })
    }
}

// ============================================================================
// Percentages
// ============================================================================

/// Parse a relative size into a fraction of the screen
///
/// `"40%"` is forty percent; a bare number (`"0.4"`) is already a fraction.
pub fn parse_percentage(input: &str) -> PanelResult<f64> {
    let trimmed = input.trim();
    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim_end(), 100.0),
        None => (trimmed, 1.0),
    };

    number
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| n / scale)
        .ok_or_else(|| PanelError::InvalidPercentage(input.to_string()))
}

/// Resolve a configured dimension against the available cells
fn resolve_dimension(dimension: &Dimension, available: u32) -> PanelResult<i64> {
    let fraction = match dimension {
        Dimension::Cells(n) if *n > 0 && u32::try_from(*n).is_ok() => return Ok(*n),
        Dimension::Cells(n) => {
            return Err(PanelError::InvalidDimension(format!(
                "{} cells is not a positive size that fits the screen grid",
                n
            )))
        }
        Dimension::Fraction(f) => *f,
        Dimension::Text(s) => parse_percentage(s)?,
    };

    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(PanelError::InvalidDimension(format!(
            "{} is not a fraction of the screen in (0, 1]",
            fraction
        )));
    }

    Ok((available as f64 * fraction).floor() as i64)
}

// ============================================================================
// Placement
// ============================================================================

/// Compute where a panel window goes
///
/// `size` is the panel's current extent along its split axis (the shared
/// panel state, not the configured initial size). Zoomed panels fill the
/// screen: split panels take the full dimension of their axis, floating
/// panels fill everything inside the margins.
pub fn compute_window_placement(
    config: &PanelConfig,
    size: u32,
    screen: ScreenSize,
    is_zoomed: bool,
) -> PanelResult<Placement> {
    let edge = match config.position {
        Position::Left => Edge::Left,
        Position::Right => Edge::Right,
        Position::Above => Edge::Above,
        Position::Below => Edge::Below,
        Position::Float => {
            return compute_float_placement(&config.window, screen, is_zoomed).map(Placement::Float)
        }
    };

    let size = if is_zoomed {
        match edge {
            Edge::Left | Edge::Right => screen.columns,
            Edge::Above | Edge::Below => screen.editor_lines(),
        }
    } else {
        size
    };

    Ok(Placement::Split { edge, size })
}

fn compute_float_placement(
    window: &WindowConfig,
    screen: ScreenSize,
    is_zoomed: bool,
) -> PanelResult<FloatPlacement> {
    let anchor = match window.anchor.as_deref() {
        Some(code) => code.parse::<Anchor>()?,
        None => Anchor::default(),
    };
    let margin = i64::from(window.margin.unwrap_or(0));
    let inset = if window.has_border() { 1 } else { 0 };

    let screen_w = i64::from(screen.columns);
    let screen_h = i64::from(screen.editor_lines());

    // Validate configured sizes even when zoom overrides them
    let fallback = Dimension::default();
    let total_w = resolve_dimension(window.width.as_ref().unwrap_or(&fallback), screen.columns)?;
    let total_h = resolve_dimension(
        window.height.as_ref().unwrap_or(&fallback),
        screen.editor_lines(),
    )?;

    let (row, col, width, height) = if is_zoomed {
        (
            margin,
            margin,
            screen_w - 2 * margin - 2 * inset,
            screen_h - 2 * margin - 2 * inset,
        )
    } else {
        let width = (total_w - 2 * margin - 2 * inset).max(1);
        let height = (total_h - 2 * margin - 2 * inset).max(1);
        let visible_w = width + 2 * inset;
        let visible_h = height + 2 * inset;

        let row = match anchor.vertical {
            VerticalAnchor::North => margin,
            VerticalAnchor::Center => (screen_h - visible_h) / 2,
            VerticalAnchor::South => screen_h - margin - visible_h,
        };
        let col = match anchor.horizontal {
            HorizontalAnchor::West => margin,
            HorizontalAnchor::Center => (screen_w - visible_w) / 2,
            HorizontalAnchor::East => screen_w - margin - visible_w,
        };
        (row, col, width, height)
    };

    Ok(FloatPlacement {
        row: row.max(0) as u32,
        col: col.max(0) as u32,
        width: width.max(1) as u32,
        height: height.max(1) as u32,
        border: window.border.clone(),
        decorations: window.decorations.clone(),
    })
}
