//! Planar coordinates and axis-aligned cell bounds.
//!
//! The simulated area is a flat rectangle anchored at the origin, measured in
//! metres.  `f64` is used throughout because propagation delays are derived
//! from distances divided by sub-microsecond tick durations.

/// A point inside the simulated area.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// `true` if both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle with half-open bounds `[min, max)`.
///
/// Cells on the outer edge of a partition close their outer side with
/// [`closed_max_x`](Self::closed_max_x) / [`closed_max_y`](Self::closed_max_y)
/// so that a point lying exactly on the area's far edge still belongs to
/// exactly one cell.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub closed_max_x: bool,
    pub closed_max_y: bool,
}

impl Rect {
    /// A closed rectangle `[0, width] × [0, height]` covering a whole area.
    pub fn area(width: f64, height: f64) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: width,
            max_y: height,
            closed_max_x: true,
            closed_max_y: true,
        }
    }

    /// A half-open rectangle `[min_x, max_x) × [min_y, max_y)`.
    pub fn half_open(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y, closed_max_x: false, closed_max_y: false }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn surface(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Membership test honouring the half-open / closed-edge convention.
    pub fn contains(&self, p: Position) -> bool {
        let in_x = p.x >= self.min_x
            && (p.x < self.max_x || (self.closed_max_x && p.x == self.max_x));
        let in_y = p.y >= self.min_y
            && (p.y < self.max_y || (self.closed_max_y && p.y == self.max_y));
        in_x && in_y
    }

    /// Shortest distance from `p` to any point of the rectangle (0 inside).
    ///
    /// Used to skip whole cells during signal propagation.
    pub fn distance_to(&self, p: Position) -> f64 {
        let dx = (self.min_x - p.x).max(0.0).max(p.x - self.max_x);
        let dy = (self.min_y - p.y).max(0.0).max(p.y - self.max_y);
        dx.hypot(dy)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}{} × [{:.3}, {:.3}{}",
            self.min_x,
            self.max_x,
            if self.closed_max_x { "]" } else { ")" },
            self.min_y,
            self.max_y,
            if self.closed_max_y { "]" } else { ")" },
        )
    }
}
