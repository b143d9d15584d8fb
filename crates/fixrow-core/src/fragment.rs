//! Positioned text fragments as produced by a document text extractor.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Hashable, totally ordered page coordinate.
///
/// Signatures are matched by exact equality and repair groups are keyed by
/// coordinate, so coordinates need `Eq + Hash + Ord`.
pub type Coord = OrderedFloat<f64>;

/// One extracted text run with its page coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Text value of the run
    pub text: String,
    /// Horizontal position (text matrix `e`)
    pub x: f64,
    /// Vertical position (text matrix `f`)
    pub y: f64,
}

impl Fragment {
    /// Create a new fragment
    #[inline]
    #[must_use = "returns a new Fragment"]
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }

    /// Coordinate of this fragment along `axis`
    #[inline]
    #[must_use = "returns the coordinate along the axis"]
    pub fn coord(&self, axis: Axis) -> Coord {
        match axis {
            Axis::X => OrderedFloat(self.x),
            Axis::Y => OrderedFloat(self.y),
        }
    }
}

/// Page axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal axis
    #[default]
    X,
    /// Vertical axis
    Y,
}

impl Axis {
    /// The perpendicular axis
    #[inline]
    #[must_use = "returns the other axis"]
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}
