//! Layout geometry for drop-target resolution.

use serde::{Deserialize, Serialize};

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Swap the axes, so horizontal rows can reuse vertical logic.
    pub fn transposed(&self) -> Point {
        Point::new(self.y, self.x)
    }
}

/// An axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top() && y < self.bottom()
    }

    pub fn transposed(&self) -> Rect {
        Rect::new(self.y, self.x, self.height, self.width)
    }

    /// The rectangle grown by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

/// Rendered bounds of a container and of its items, in presentation order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerGeometry {
    pub bounds: Rect,
    pub items: Vec<Rect>,
}

impl ContainerGeometry {
    pub fn new(bounds: Rect, items: Vec<Rect>) -> Self {
        Self { bounds, items }
    }

    pub fn transposed(&self) -> ContainerGeometry {
        ContainerGeometry {
            bounds: self.bounds.transposed(),
            items: self.items.iter().map(Rect::transposed).collect(),
        }
    }

    /// Whether `p` is a valid drop point. An empty container accepts points
    /// up to `empty_tolerance` outside its bounds.
    pub fn accepts(&self, p: Point, empty_tolerance: f64) -> bool {
        if self.items.is_empty() {
            self.bounds.inflate(empty_tolerance).contains(p)
        } else {
            self.bounds.contains(p)
        }
    }
}

/// Tuning for `insertion_index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapRule {
    pub threshold: f64,
    pub invert: bool,
}

/// Resolve where a dragged item lands among `siblings` (the container's items
/// without the dragged one) for a pointer at `y`.
///
/// `current` is the dragged item's current index among the siblings when it
/// is already in this container; it supplies the direction of travel.
pub fn insertion_index(y: f64, siblings: &[Rect], current: Option<usize>, rule: SwapRule) -> usize {
    let Some(hit) = siblings.iter().position(|r| r.contains_y(y)) else {
        return siblings.iter().filter(|r| r.center_y() < y).count();
    };
    let rect = siblings[hit];
    let fraction = if rect.height > 0.0 {
        ((y - rect.top()) / rect.height).clamp(0.0, 1.0)
    } else {
        0.5
    };

    let after = if rule.invert {
        match current {
            // Dragged item sits above the sibling: moving down.
            Some(pos) if pos <= hit => fraction > rule.threshold,
            // Moving up, or arriving from another container (treated as moving up).
            _ => 1.0 - fraction <= rule.threshold,
        }
    } else {
        fraction > rule.threshold
    };

    if after { hit + 1 } else { hit }
}
