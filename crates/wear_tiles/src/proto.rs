//! Tile layout protocol
//!
//! The declarative layout tree a tile provider sends to the host. The host
//! only reads it; every element is a plain value and the whole tree can be
//! deserialized from JSON.
//!
//! # Example
//!
//! ```rust
//! use wear_tiles::proto::{Layout, LayoutElement};
//!
//! let layout = Layout::from_json(
//!     r#"{ "root": { "type": "column", "width": "expand", "children": [
//!         { "type": "text", "text": "12:30" },
//!         { "type": "spacer", "height": { "dp": 4 } }
//!     ] } }"#,
//! )
//! .unwrap();
//! assert!(matches!(layout.root, LayoutElement::Column(_)));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Primitives
// ============================================================================

/// A packed 0xAARRGGBB colour
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argb(pub u32);

impl Argb {
    pub const TRANSPARENT: Argb = Argb(0x0000_0000);
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);
    pub const BLACK: Argb = Argb(0xFF00_0000);

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn is_transparent(self) -> bool {
        self.alpha() == 0
    }
}

impl fmt::Debug for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Size of a container along one axis
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerDimension {
    /// Fixed size in density-independent pixels
    Dp(f32),
    /// Fill the space the parent offers
    Expand,
    /// Size to content
    #[default]
    Wrap,
}

/// Size of a spacer along one axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacerDimension {
    Dp(f32),
    Expand,
}

impl Default for SpacerDimension {
    fn default() -> Self {
        SpacerDimension::Dp(0.0)
    }
}

/// Size of an image along one axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageDimension {
    Dp(f32),
    Expand,
    /// Derived from the other axis using `width:height`
    Proportional {
        aspect_ratio_width: u32,
        aspect_ratio_height: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Where an arc's children sit relative to its anchor angle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcAnchorType {
    /// The first child starts at the anchor
    Start,
    /// The children are centred on the anchor
    #[default]
    Center,
    /// The last child ends at the anchor
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Medium,
    Bold,
}

/// Text styling. Unset fields fall back to the host defaults.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    pub size_sp: Option<f32>,
    pub weight: FontWeight,
    pub italic: bool,
    pub underline: bool,
    pub letter_spacing_em: f32,
    pub color: Option<Argb>,
}

// ============================================================================
// Actions and modifiers
// ============================================================================

/// What happens when a clickable element is tapped
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Launch an activity of the providing app
    LaunchActivity {
        package_name: String,
        class_name: String,
        #[serde(default)]
        extras: BTreeMap<String, String>,
    },
    /// Ask the provider for a fresh layout
    Load {
        #[serde(default)]
        state: BTreeMap<String, String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clickable {
    pub id: String,
    pub on_click: Action,
}

/// Padding in dp, start/end assume left-to-right
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub start: f32,
    pub end: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    pub fn all(dp: f32) -> Self {
        Self {
            start: dp,
            end: dp,
            top: dp,
            bottom: dp,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub color: Option<Argb>,
    pub corner_radius_dp: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub width_dp: f32,
    pub color: Argb,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semantics {
    pub content_description: String,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub clickable: Option<Clickable>,
    pub padding: Option<Padding>,
    pub background: Option<Background>,
    pub border: Option<Border>,
    pub semantics: Option<Semantics>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcModifiers {
    pub clickable: Option<Clickable>,
    pub semantics: Option<Semantics>,
}

// ============================================================================
// Layout elements
// ============================================================================

/// A node of the layout tree.
///
/// Element types this host does not know deserialize as [`LayoutElement::Unknown`]
/// and are skipped during inflation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutElement {
    Box(BoxElement),
    Row(RowElement),
    Column(ColumnElement),
    Spacer(SpacerElement),
    Text(TextElement),
    Image(ImageElement),
    Arc(ArcElement),
    Spannable(SpannableElement),
    #[serde(other)]
    Unknown,
}

impl LayoutElement {
    /// Short name for log messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            LayoutElement::Box(_) => "box",
            LayoutElement::Row(_) => "row",
            LayoutElement::Column(_) => "column",
            LayoutElement::Spacer(_) => "spacer",
            LayoutElement::Text(_) => "text",
            LayoutElement::Image(_) => "image",
            LayoutElement::Arc(_) => "arc",
            LayoutElement::Spannable(_) => "spannable",
            LayoutElement::Unknown => "unknown",
        }
    }
}

/// Children stacked on top of each other
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxElement {
    pub children: Vec<LayoutElement>,
    pub width: ContainerDimension,
    pub height: ContainerDimension,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub modifiers: Modifiers,
}

/// Children laid out left to right
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RowElement {
    pub children: Vec<LayoutElement>,
    pub width: ContainerDimension,
    pub height: ContainerDimension,
    pub vertical_alignment: VerticalAlignment,
    pub modifiers: Modifiers,
}

/// Children laid out top to bottom
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnElement {
    pub children: Vec<LayoutElement>,
    pub width: ContainerDimension,
    pub height: ContainerDimension,
    pub horizontal_alignment: HorizontalAlignment,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerElement {
    pub width: SpacerDimension,
    pub height: SpacerDimension,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub max_lines: Option<u32>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    pub resource_id: String,
    #[serde(default)]
    pub width: Option<ImageDimension>,
    #[serde(default)]
    pub height: Option<ImageDimension>,
    #[serde(default)]
    pub tint: Option<Argb>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Children placed along a circle, clockwise from 12 o'clock
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcElement {
    pub contents: Vec<ArcLayoutElement>,
    pub anchor_angle_degrees: f32,
    pub anchor_type: ArcAnchorType,
    pub modifiers: Modifiers,
}

/// A run of styled text with inline images
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpannableElement {
    pub spans: Vec<Span>,
    pub max_lines: Option<u32>,
    pub alignment: HorizontalAlignment,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Span {
    Text(SpanText),
    Image(SpanImage),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpanText {
    pub text: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub clickable: Option<Clickable>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpanImage {
    pub resource_id: String,
    pub width_dp: f32,
    pub height_dp: f32,
    #[serde(default)]
    pub clickable: Option<Clickable>,
}

// ============================================================================
// Arc elements
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArcLayoutElement {
    Text(ArcText),
    Line(ArcLine),
    Spacer(ArcSpacer),
    /// A regular element placed on the arc
    Adapter(ArcAdapter),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcText {
    pub text: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub modifiers: ArcModifiers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcLine {
    pub length_degrees: f32,
    #[serde(default)]
    pub thickness_dp: Option<f32>,
    #[serde(default)]
    pub color: Option<Argb>,
    #[serde(default)]
    pub modifiers: ArcModifiers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcSpacer {
    pub length_degrees: f32,
    #[serde(default)]
    pub thickness_dp: Option<f32>,
    #[serde(default)]
    pub modifiers: ArcModifiers,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcAdapter {
    pub content: Box<LayoutElement>,
    #[serde(default)]
    pub rotate_contents: bool,
}

// ============================================================================
// Document
// ============================================================================

/// A complete tile layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub root: LayoutElement,
}

impl Layout {
    pub fn new(root: LayoutElement) -> Self {
        Self { root }
    }

    /// Parse a layout document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_element_parses() {
        let layout = Layout::from_json(
            r#"{ "root": { "type": "row", "children": [
                { "type": "hologram", "intensity": 3 },
                { "type": "text", "text": "ok" }
            ] } }"#,
        )
        .unwrap();
        let LayoutElement::Row(row) = layout.root else {
            panic!("expected row");
        };
        assert_eq!(row.children[0], LayoutElement::Unknown);
        assert_eq!(row.children[1].kind_name(), "text");
    }

    #[test]
    fn test_dimensions_parse() {
        let image: ImageElement = serde_json::from_str(
            r#"{ "resource_id": "icon",
                 "width": { "dp": 24 },
                 "height": { "proportional": { "aspect_ratio_width": 16, "aspect_ratio_height": 9 } } }"#,
        )
        .unwrap();
        assert_eq!(image.width, Some(ImageDimension::Dp(24.0)));
        assert_eq!(
            image.height,
            Some(ImageDimension::Proportional {
                aspect_ratio_width: 16,
                aspect_ratio_height: 9
            })
        );

        let b: BoxElement = serde_json::from_str(r#"{ "width": "expand" }"#).unwrap();
        assert_eq!(b.width, ContainerDimension::Expand);
        assert_eq!(b.height, ContainerDimension::Wrap);
    }

    #[test]
    fn test_argb() {
        assert!(Argb::TRANSPARENT.is_transparent());
        assert_eq!(Argb(0x80FF0000).alpha(), 0x80);
        assert_eq!(format!("{:?}", Argb::WHITE), "#FFFFFFFF");
    }
}
