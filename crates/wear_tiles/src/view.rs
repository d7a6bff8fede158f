//! Inflated view tree
//!
//! Views live in a slotmap arena and reference their children by [`ViewId`].
//! Each view carries per-axis [`ViewSize`]s in pixels; [`ViewTree::compute_layout`]
//! maps them onto Taffy styles and measures the whole tree.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use taffy::geometry::Line;
use taffy::prelude::*;
use taffy::style::Position;
use tracing::{debug, trace, warn};

use crate::action::ClickAction;
use crate::arc::{layout_arc, sweep_for_length, ArcPlacement, ArcSegment};
use crate::element::{BackgroundDrawable, EdgeInsets, ElementBounds};
use crate::error::{ResourceAccessError, Result};
use crate::proto::{ArcAnchorType, Argb};
use crate::resources::{Drawable, DrawableResult};
use crate::spannable::StyledTextRun;
use crate::text_measure::{ResolvedFontStyle, TextMetrics};
use crate::tree::LayoutTree;

new_key_type! {
    pub struct ViewId;
}

// ============================================================================
// Sizing
// ============================================================================

/// Size of a view along one axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewSize {
    Px(f32),
    /// Take the parent's full size on this axis
    MatchParent,
    WrapContent,
    /// Share of the space left on a linear container's main axis
    Weight(f32),
}

impl ViewSize {
    pub fn is_match_parent(self) -> bool {
        matches!(self, ViewSize::MatchParent)
    }

    pub fn is_wrap(self) -> bool {
        matches!(self, ViewSize::WrapContent)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Gravity {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub width: ViewSize,
    pub height: ViewSize,
    /// width / height, applied when one axis is wrap-sized
    pub aspect_ratio: Option<f32>,
    pub horizontal_gravity: Gravity,
    pub vertical_gravity: Gravity,
}

impl LayoutParams {
    pub fn new(width: ViewSize, height: ViewSize) -> Self {
        Self {
            width,
            height,
            aspect_ratio: None,
            horizontal_gravity: Gravity::Center,
            vertical_gravity: Gravity::Center,
        }
    }

    pub fn match_parent() -> Self {
        Self::new(ViewSize::MatchParent, ViewSize::MatchParent)
    }

    pub fn wrap_content() -> Self {
        Self::new(ViewSize::WrapContent, ViewSize::WrapContent)
    }

    pub fn with_gravity(mut self, horizontal: Gravity, vertical: Gravity) -> Self {
        self.horizontal_gravity = horizontal;
        self.vertical_gravity = vertical;
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }
}

// ============================================================================
// View kinds
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// Children stacked on top of each other
    Frame,
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextView {
    pub text: String,
    pub style: ResolvedFontStyle,
    pub max_lines: Option<u32>,
    pub metrics: TextMetrics,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpannableView {
    pub run: StyledTextRun,
    pub max_lines: Option<u32>,
    pub alignment: Gravity,
    pub metrics: TextMetrics,
}

/// What an image view currently shows
#[derive(Clone, Debug, PartialEq)]
pub enum ImageContent {
    Empty,
    Placeholder(Drawable),
    Loaded(Drawable),
    Failed(ResourceAccessError),
}

impl ImageContent {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageContent::Loaded(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageView {
    pub resource_id: String,
    pub content: ImageContent,
    pub tint: Option<Argb>,
}

/// How far an arc child reaches along the arc
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcSweep {
    Degrees(f32),
    /// A straight length in pixels laid along the circle
    Length(f32),
    /// The child's measured width, known after layout
    Measured,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcChild {
    pub view: ViewId,
    pub sweep: ArcSweep,
    pub thickness_px: f32,
    pub rotate_contents: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArcView {
    pub anchor_angle_degrees: f32,
    pub anchor_type: ArcAnchorType,
    pub children: Vec<ArcChild>,
}

/// A stroked arc segment. Without a colour it only takes up room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvedLineView {
    pub sweep_degrees: f32,
    pub thickness_px: f32,
    pub color: Option<Argb>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CurvedTextView {
    pub text: String,
    pub style: ResolvedFontStyle,
    pub metrics: TextMetrics,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewKind {
    Container(ContainerKind),
    Text(TextView),
    Spannable(SpannableView),
    Image(ImageView),
    Spacer,
    Arc(ArcView),
    CurvedLine(CurvedLineView),
    CurvedText(CurvedTextView),
    /// Invisible sibling that forces a lone match-parent child to the
    /// container's size
    Filler,
}

impl ViewKind {
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Container(ContainerKind::Frame) => "frame",
            ViewKind::Container(ContainerKind::Horizontal) => "horizontal",
            ViewKind::Container(ContainerKind::Vertical) => "vertical",
            ViewKind::Text(_) => "text",
            ViewKind::Spannable(_) => "spannable",
            ViewKind::Image(_) => "image",
            ViewKind::Spacer => "spacer",
            ViewKind::Arc(_) => "arc",
            ViewKind::CurvedLine(_) => "curved_line",
            ViewKind::CurvedText(_) => "curved_text",
            ViewKind::Filler => "filler",
        }
    }
}

// ============================================================================
// Nodes
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    pub kind: ViewKind,
    pub params: LayoutParams,
    pub padding: EdgeInsets,
    pub background: Option<BackgroundDrawable>,
    pub click: Option<ClickAction>,
    pub content_description: Option<String>,
    pub children: SmallVec<[ViewId; 4]>,
}

impl ViewNode {
    pub fn new(kind: ViewKind, params: LayoutParams) -> Self {
        Self {
            kind,
            params,
            padding: EdgeInsets::default(),
            background: None,
            click: None,
            content_description: None,
            children: SmallVec::new(),
        }
    }

    pub fn filler() -> Self {
        Self::new(ViewKind::Filler, LayoutParams::match_parent())
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ViewId>) -> Self {
        self.children.extend(children);
        self
    }

    /// Content size of leaves that measure themselves, padding included
    fn intrinsic_size(&self) -> Option<(f32, f32)> {
        let metrics = match &self.kind {
            ViewKind::Text(text) => text.metrics,
            ViewKind::Spannable(spannable) => spannable.metrics,
            _ => return None,
        };
        Some((
            metrics.width + self.padding.horizontal(),
            metrics.height + self.padding.vertical(),
        ))
    }
}

/// How a parent lays out its children
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParentLayout {
    Root,
    Frame,
    Row,
    Column,
    Arc,
}

impl ParentLayout {
    fn of(kind: &ViewKind) -> Self {
        match kind {
            ViewKind::Container(ContainerKind::Horizontal) => ParentLayout::Row,
            ViewKind::Container(ContainerKind::Vertical) => ParentLayout::Column,
            ViewKind::Arc(_) => ParentLayout::Arc,
            _ => ParentLayout::Frame,
        }
    }
}

fn align(gravity: Gravity) -> AlignSelf {
    match gravity {
        Gravity::Start => AlignSelf::Start,
        Gravity::Center => AlignSelf::Center,
        Gravity::End => AlignSelf::End,
    }
}

fn dimension(
    size: ViewSize,
    intrinsic: Option<f32>,
    parent: ParentLayout,
    viewport: f32,
) -> Dimension {
    match size {
        ViewSize::Px(px) => length(px),
        ViewSize::MatchParent if parent == ParentLayout::Root => length(viewport),
        ViewSize::MatchParent => percent(1.0),
        // Main-axis weights grow from a zero basis
        ViewSize::Weight(_) => auto(),
        ViewSize::WrapContent => match intrinsic {
            Some(px) => length(px),
            None => auto(),
        },
    }
}

fn taffy_style(node: &ViewNode, parent: ParentLayout, viewport: (f32, f32)) -> Style {
    let params = &node.params;
    let intrinsic = node.intrinsic_size();

    let mut style = Style {
        size: Size {
            width: dimension(params.width, intrinsic.map(|s| s.0), parent, viewport.0),
            height: dimension(params.height, intrinsic.map(|s| s.1), parent, viewport.1),
        },
        padding: Rect {
            left: length(node.padding.left),
            right: length(node.padding.right),
            top: length(node.padding.top),
            bottom: length(node.padding.bottom),
        },
        aspect_ratio: params.aspect_ratio,
        flex_shrink: 0.0,
        ..Default::default()
    };

    match &node.kind {
        ViewKind::Container(ContainerKind::Frame) => {
            style.display = Display::Grid;
            style.grid_template_columns = vec![fr(1.0)];
            style.grid_template_rows = vec![fr(1.0)];
        }
        ViewKind::Container(ContainerKind::Horizontal) => {
            style.display = Display::Flex;
            style.flex_direction = FlexDirection::Row;
        }
        ViewKind::Container(ContainerKind::Vertical) | ViewKind::Arc(_) => {
            style.display = Display::Flex;
            style.flex_direction = FlexDirection::Column;
        }
        _ => {}
    }

    let main_weight = match parent {
        ParentLayout::Row => params.width,
        ParentLayout::Column => params.height,
        _ => ViewSize::WrapContent,
    };
    if let ViewSize::Weight(weight) = main_weight {
        style.flex_grow = weight;
        style.flex_shrink = 1.0;
        style.flex_basis = length(0.0);
    }

    match parent {
        ParentLayout::Root => {}
        ParentLayout::Frame => {
            style.grid_row = Line {
                start: line(1),
                end: auto(),
            };
            style.grid_column = Line {
                start: line(1),
                end: auto(),
            };
            style.justify_self = Some(align(params.horizontal_gravity));
            style.align_self = Some(align(params.vertical_gravity));
        }
        ParentLayout::Row => style.align_self = Some(align(params.vertical_gravity)),
        ParentLayout::Column => style.align_self = Some(align(params.horizontal_gravity)),
        // Arc children are measured on their own and placed by angle
        ParentLayout::Arc => style.position = Position::Absolute,
    }

    style
}

// ============================================================================
// Layout result
// ============================================================================

/// Absolute bounds of every view after layout
#[derive(Clone, Debug, Default)]
pub struct LayoutResult {
    bounds: FxHashMap<ViewId, ElementBounds>,
}

impl LayoutResult {
    pub fn get(&self, id: ViewId) -> Option<ElementBounds> {
        self.bounds.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

// ============================================================================
// Tree
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewNode>,
    root: Option<ViewId>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: ViewNode) -> ViewId {
        self.nodes.insert(node)
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<ViewId>) {
        self.root = root;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ViewId, &ViewNode)> {
        self.nodes.iter()
    }

    /// First view, in insertion order, matching `predicate`
    pub fn find(&self, predicate: impl Fn(&ViewNode) -> bool) -> Option<ViewId> {
        self.nodes
            .iter()
            .find(|(_, node)| predicate(node))
            .map(|(id, _)| id)
    }

    /// Remove a view and its descendants
    pub fn remove(&mut self, id: ViewId) {
        if let Some(node) = self.nodes.remove(id) {
            for child in node.children {
                self.remove(child);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
    }

    /// Apply a finished image load to an image view.
    ///
    /// Returns false if the view is gone or is no longer an image.
    pub fn set_image_result(&mut self, id: ViewId, result: DrawableResult) -> bool {
        let Some(ViewNode {
            kind: ViewKind::Image(image),
            ..
        }) = self.nodes.get_mut(id)
        else {
            trace!("ViewTree::set_image_result - view {:?} no longer exists", id);
            return false;
        };

        image.content = match result {
            Ok(drawable) => {
                debug!("ViewTree::set_image_result - {} loaded", image.resource_id);
                ImageContent::Loaded(drawable)
            }
            Err(err) => {
                warn!("Failed to load image {}: {}", image.resource_id, err);
                ImageContent::Failed(err)
            }
        };
        true
    }

    /// Swap an inline image placeholder of a spannable view.
    ///
    /// A failed load keeps the placeholder.
    pub fn swap_span_image(&mut self, id: ViewId, span: usize, result: DrawableResult) -> bool {
        let Some(ViewNode {
            kind: ViewKind::Spannable(spannable),
            ..
        }) = self.nodes.get_mut(id)
        else {
            trace!("ViewTree::swap_span_image - view {:?} no longer exists", id);
            return false;
        };

        match result {
            Ok(drawable) => spannable.run.swap_image(span, drawable),
            Err(err) => {
                warn!("Failed to load inline image: {}", err);
                false
            }
        }
    }

    /// Measure the tree inside a `width` x `height` viewport
    pub fn compute_layout(&self, width: f32, height: f32) -> Result<LayoutResult> {
        let mut result = LayoutResult::default();
        let Some(root) = self.root else {
            return Ok(result);
        };

        let mut tree = LayoutTree::new();
        self.build_layout_node(&mut tree, root, ParentLayout::Root, (width, height))?;
        tree.compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::Definite(height),
            },
        )?;
        self.collect_bounds(&tree, root, (0.0, 0.0), &mut result);
        Ok(result)
    }

    fn build_layout_node(
        &self,
        tree: &mut LayoutTree,
        id: ViewId,
        parent: ParentLayout,
        viewport: (f32, f32),
    ) -> Result<bool> {
        let Some(node) = self.nodes.get(id) else {
            return Ok(false);
        };
        tree.create_node(id, taffy_style(node, parent, viewport))?;

        let child_parent = ParentLayout::of(&node.kind);
        for &child in &node.children {
            if self.build_layout_node(tree, child, child_parent, viewport)? {
                tree.add_child(id, child)?;
            }
        }
        Ok(true)
    }

    fn collect_bounds(
        &self,
        tree: &LayoutTree,
        id: ViewId,
        parent_offset: (f32, f32),
        result: &mut LayoutResult,
    ) {
        let Some(layout) = tree.get_layout(id) else {
            return;
        };
        let bounds = ElementBounds::from_layout(layout, parent_offset);
        result.bounds.insert(id, bounds);
        for &child in self.children(id) {
            self.collect_bounds(tree, child, (bounds.x, bounds.y), result);
        }
    }

    /// Angular placement of an arc's children, paired with their view ids.
    ///
    /// `None` if `arc` is not a measured arc view.
    pub fn arc_layout(
        &self,
        arc: ViewId,
        layout: &LayoutResult,
    ) -> Option<Vec<(ViewId, Option<ArcPlacement>)>> {
        let ViewKind::Arc(arc_view) = &self.nodes.get(arc)?.kind else {
            return None;
        };
        let bounds = layout.get(arc)?;
        let outer_radius = bounds.width.min(bounds.height) / 2.0;

        // Straight lengths wrap around the circle through the child's midline
        let along_circle = |length_px: f32, thickness_px: f32| ArcSegment {
            sweep_degrees: sweep_for_length(length_px, outer_radius - thickness_px / 2.0),
            thickness_px,
        };
        let segments: SmallVec<[ArcSegment; 8]> = arc_view
            .children
            .iter()
            .map(|child| match child.sweep {
                ArcSweep::Degrees(degrees) => ArcSegment {
                    sweep_degrees: degrees,
                    thickness_px: child.thickness_px,
                },
                ArcSweep::Length(px) => along_circle(px, child.thickness_px),
                ArcSweep::Measured => {
                    let measured = layout.get(child.view).unwrap_or_default();
                    along_circle(measured.width, measured.height)
                }
            })
            .collect();

        let placements = layout_arc(
            outer_radius,
            arc_view.anchor_angle_degrees,
            arc_view.anchor_type,
            &segments,
        );
        Some(
            arc_view
                .children
                .iter()
                .map(|child| child.view)
                .zip(placements)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacer(width: ViewSize, height: ViewSize) -> ViewNode {
        ViewNode::new(ViewKind::Spacer, LayoutParams::new(width, height))
    }

    #[test]
    fn test_frame_match_parent_child() {
        let mut tree = ViewTree::new();
        let child = tree.insert(spacer(ViewSize::MatchParent, ViewSize::MatchParent));
        let small = tree.insert(spacer(ViewSize::Px(10.0), ViewSize::Px(10.0)));
        let root = tree.insert(
            ViewNode::new(
                ViewKind::Container(ContainerKind::Frame),
                LayoutParams::new(ViewSize::Px(100.0), ViewSize::Px(80.0)),
            )
            .with_children([child, small]),
        );
        tree.set_root(Some(root));

        let layout = tree.compute_layout(200.0, 200.0).unwrap();
        assert_eq!(layout.get(child).unwrap(), ElementBounds::new(0.0, 0.0, 100.0, 80.0));
        // Centred by default gravity
        assert_eq!(layout.get(small).unwrap(), ElementBounds::new(45.0, 35.0, 10.0, 10.0));
    }

    #[test]
    fn test_row_weight_fills_remaining() {
        let mut tree = ViewTree::new();
        let fixed = tree.insert(spacer(ViewSize::Px(30.0), ViewSize::Px(10.0)));
        let weighted = tree.insert(spacer(ViewSize::Weight(1.0), ViewSize::Px(10.0)));
        let root = tree.insert(
            ViewNode::new(
                ViewKind::Container(ContainerKind::Horizontal),
                LayoutParams::new(ViewSize::Px(100.0), ViewSize::Px(10.0)),
            )
            .with_children([fixed, weighted]),
        );
        tree.set_root(Some(root));

        let layout = tree.compute_layout(200.0, 200.0).unwrap();
        assert_eq!(layout.get(weighted).unwrap(), ElementBounds::new(30.0, 0.0, 70.0, 10.0));
    }

    #[test]
    fn test_removed_view_ignores_image_result() {
        let mut tree = ViewTree::new();
        let image = tree.insert(ViewNode::new(
            ViewKind::Image(ImageView {
                resource_id: "icon".to_string(),
                content: ImageContent::Empty,
                tint: None,
            }),
            LayoutParams::new(ViewSize::Px(4.0), ViewSize::Px(4.0)),
        ));
        tree.remove(image);
        assert!(!tree.set_image_result(image, Ok(Drawable::Solid(Argb::BLACK))));
    }

    #[test]
    fn test_empty_tree_layout() {
        let tree = ViewTree::new();
        assert!(tree.compute_layout(100.0, 100.0).unwrap().is_empty());
    }
}
