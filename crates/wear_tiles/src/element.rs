//! Per-view visual properties and computed bounds

use taffy::Layout;

use crate::proto::Argb;

/// Computed layout bounds of a view, in absolute pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementBounds {
    /// Create bounds from a Taffy Layout with parent offset
    pub fn from_layout(layout: &Layout, parent_offset: (f32, f32)) -> Self {
        Self {
            x: parent_offset.0 + layout.location.x,
            y: parent_offset.1 + layout.location.y,
            width: layout.size.width,
            height: layout.size.height,
        }
    }

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Background fill and border of a view, merged into one drawable
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackgroundDrawable {
    pub color: Option<Argb>,
    pub corner_radius_px: f32,
    pub border: Option<BorderStroke>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderStroke {
    pub width_px: f32,
    pub color: Argb,
}

impl BackgroundDrawable {
    pub fn with_color(mut self, color: Argb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_rounded(mut self, radius_px: f32) -> Self {
        self.corner_radius_px = radius_px;
        self
    }

    pub fn with_border(mut self, width_px: f32, color: Argb) -> Self {
        self.border = Some(BorderStroke { width_px, color });
        self
    }
}

/// Padding in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl EdgeInsets {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}
