//! Layout inflation
//!
//! [`TileInflater`] walks a [`Layout`] once, top-down, and builds a
//! [`ViewTree`]. Sizing follows the protocol rather than the host toolkit:
//!
//! - `dp` sizes are converted with the display density
//! - `expand` fills the parent, or shares the main axis of a row/column; on
//!   the main axis of a wrap-sized row/column, and inside arc adapters, it is
//!   treated as `wrap`
//! - a wrap-sized container with nothing measurable inside is dropped
//! - a box with a single match-parent child gets an invisible filler sibling
//!
//! Anything malformed is logged and skipped so the rest of the tile still
//! renders.
//!
//! Image resources that are still loading show their placeholder; the real
//! drawable is swapped in by a task queued on the UI executor.

use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::action::{ActionDispatcher, ClickAction};
use crate::config::InflaterConfig;
use crate::element::{BackgroundDrawable, EdgeInsets};
use crate::error::{ResourceAccessError, Result};
use crate::proto::{
    ArcElement, ArcLayoutElement, ArcModifiers, Argb, BoxElement, Clickable, ColumnElement,
    ContainerDimension, HorizontalAlignment, ImageDimension, ImageElement, Layout, LayoutElement,
    Modifiers, RowElement, Semantics, Span, SpacerDimension, SpacerElement, SpannableElement,
    TextElement, VerticalAlignment,
};
use crate::resources::{DrawableFuture, ResourceResolver};
use crate::spannable::{SpanKind, StyledTextRun};
use crate::text_measure::{EstimatingTextMeasurer, ResolvedFontStyle, TextMeasurer};
use crate::view::{
    ArcChild, ArcSweep, ArcView, ContainerKind, CurvedLineView, CurvedTextView, Gravity,
    ImageContent, ImageView, LayoutParams, LayoutResult, SpannableView, TextView, ViewId,
    ViewKind, ViewNode, ViewSize, ViewTree,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParentKind {
    Root,
    Box,
    Row,
    Column,
    Arc,
}

/// What a child needs to know about the container it is inflated into
#[derive(Clone, Copy, Debug)]
struct ParentContext {
    kind: ParentKind,
    wrap_width: bool,
    wrap_height: bool,
    horizontal_gravity: Gravity,
    vertical_gravity: Gravity,
}

impl ParentContext {
    fn root() -> Self {
        Self {
            kind: ParentKind::Root,
            wrap_width: false,
            wrap_height: false,
            horizontal_gravity: Gravity::Center,
            vertical_gravity: Gravity::Center,
        }
    }

    /// Arc adapters measure their content freely
    fn arc() -> Self {
        Self {
            kind: ParentKind::Arc,
            wrap_width: true,
            wrap_height: true,
            ..Self::root()
        }
    }

    fn is_wrap(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.wrap_width,
            Axis::Vertical => self.wrap_height,
        }
    }

    fn params(&self, width: ViewSize, height: ViewSize) -> LayoutParams {
        LayoutParams::new(width, height)
            .with_gravity(self.horizontal_gravity, self.vertical_gravity)
    }
}

fn horizontal_gravity(alignment: HorizontalAlignment) -> Gravity {
    match alignment {
        HorizontalAlignment::Start => Gravity::Start,
        HorizontalAlignment::Center => Gravity::Center,
        HorizontalAlignment::End => Gravity::End,
    }
}

fn vertical_gravity(alignment: VerticalAlignment) -> Gravity {
    match alignment {
        VerticalAlignment::Top => Gravity::Start,
        VerticalAlignment::Center => Gravity::Center,
        VerticalAlignment::Bottom => Gravity::End,
    }
}

// ============================================================================
// Measurability
// ============================================================================

fn on_axis<T>(axis: Axis, width: T, height: T) -> T {
    match axis {
        Axis::Horizontal => width,
        Axis::Vertical => height,
    }
}

fn container_measurable(
    dimension: ContainerDimension,
    children: &[LayoutElement],
    axis: Axis,
) -> bool {
    match dimension {
        ContainerDimension::Dp(_) => true,
        ContainerDimension::Expand | ContainerDimension::Wrap => {
            children.iter().any(|child| is_measurable(child, axis))
        }
    }
}

/// Whether `element` has a size of its own on `axis` when its parent wraps
/// its content
fn is_measurable(element: &LayoutElement, axis: Axis) -> bool {
    match element {
        LayoutElement::Box(b) => {
            container_measurable(on_axis(axis, b.width, b.height), &b.children, axis)
        }
        LayoutElement::Row(r) => {
            container_measurable(on_axis(axis, r.width, r.height), &r.children, axis)
        }
        LayoutElement::Column(c) => {
            container_measurable(on_axis(axis, c.width, c.height), &c.children, axis)
        }
        LayoutElement::Spacer(s) => {
            matches!(on_axis(axis, s.width, s.height), SpacerDimension::Dp(_))
        }
        LayoutElement::Text(_) | LayoutElement::Spannable(_) => true,
        LayoutElement::Image(image) => {
            let own = on_axis(axis, image.width, image.height);
            let other = on_axis(axis, image.height, image.width);
            match own {
                Some(ImageDimension::Dp(_)) => true,
                Some(ImageDimension::Proportional { .. }) => {
                    matches!(other, Some(ImageDimension::Dp(_)))
                }
                Some(ImageDimension::Expand) | None => false,
            }
        }
        LayoutElement::Arc(_) | LayoutElement::Unknown => false,
    }
}

// ============================================================================
// Inflated tile
// ============================================================================

/// Result of inflating a layout
pub struct InflatedTile {
    tree: Rc<RefCell<ViewTree>>,
    dispatcher: Rc<dyn ActionDispatcher>,
    viewport: (f32, f32),
}

impl InflatedTile {
    pub fn tree(&self) -> Ref<'_, ViewTree> {
        self.tree.borrow()
    }

    /// Shared handle to the view tree, also held by pending resource tasks
    pub fn shared_tree(&self) -> Rc<RefCell<ViewTree>> {
        self.tree.clone()
    }

    pub fn root(&self) -> Option<ViewId> {
        self.tree.borrow().root()
    }

    /// True if nothing in the layout could be rendered
    pub fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    /// Measure the tile against the configured screen size
    pub fn compute_layout(&self) -> Result<LayoutResult> {
        self.tree
            .borrow()
            .compute_layout(self.viewport.0, self.viewport.1)
    }

    /// Dispatch the click action bound to `view`.
    ///
    /// Returns false if the view has none.
    pub fn click(&self, view: ViewId) -> bool {
        let click = self.tree.borrow().get(view).and_then(|node| node.click.clone());
        self.dispatch(click)
    }

    /// Dispatch the click region covering byte `offset` of a spannable view
    pub fn click_span(&self, view: ViewId, offset: usize) -> bool {
        let click = {
            let tree = self.tree.borrow();
            let click = match tree.get(view).map(|node| &node.kind) {
                Some(ViewKind::Spannable(spannable)) => {
                    spannable.run.spans_at(offset).find_map(|span| match &span.kind {
                        SpanKind::Click(click) => Some(click.clone()),
                        _ => None,
                    })
                }
                _ => None,
            };
            click
        };
        self.dispatch(click)
    }

    fn dispatch(&self, click: Option<ClickAction>) -> bool {
        match click {
            Some(click) => {
                self.dispatcher.dispatch(&click);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Inflater
// ============================================================================

/// Turns tile layouts into view trees
pub struct TileInflater {
    config: InflaterConfig,
    resolver: Rc<dyn ResourceResolver>,
    dispatcher: Rc<dyn ActionDispatcher>,
    measurer: Box<dyn TextMeasurer>,
    spawner: LocalSpawner,
}

impl TileInflater {
    /// `spawner` queues resource callbacks; it usually comes from
    /// [`UiExecutor::spawner`](crate::executor::UiExecutor::spawner)
    pub fn new(
        config: InflaterConfig,
        resolver: Rc<dyn ResourceResolver>,
        dispatcher: Rc<dyn ActionDispatcher>,
        spawner: LocalSpawner,
    ) -> Self {
        let measurer = Box::new(EstimatingTextMeasurer::from_config(&config));
        Self {
            config,
            resolver,
            dispatcher,
            measurer,
            spawner,
        }
    }

    /// Replace the default text size estimate
    pub fn with_text_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn config(&self) -> &InflaterConfig {
        &self.config
    }

    pub fn inflate(&self, layout: &Layout) -> InflatedTile {
        let tree = Rc::new(RefCell::new(ViewTree::new()));
        let root = self.inflate_element(&tree, &layout.root, ParentContext::root());
        if root.is_none() {
            warn!("Tile layout produced no views");
        }
        tree.borrow_mut().set_root(root);
        debug!("TileInflater::inflate - {} views", tree.borrow().len());

        let metrics = &self.config.metrics;
        InflatedTile {
            tree,
            dispatcher: self.dispatcher.clone(),
            viewport: (metrics.width_px as f32, metrics.height_px as f32),
        }
    }

    fn inflate_element(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &LayoutElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        match element {
            LayoutElement::Box(b) => self.inflate_box(tree, b, parent),
            LayoutElement::Row(r) => self.inflate_row(tree, r, parent),
            LayoutElement::Column(c) => self.inflate_column(tree, c, parent),
            LayoutElement::Spacer(s) => self.inflate_spacer(tree, s, parent),
            LayoutElement::Text(t) => self.inflate_text(tree, t, parent),
            LayoutElement::Image(i) => self.inflate_image(tree, i, parent),
            LayoutElement::Arc(a) => self.inflate_arc(tree, a, parent),
            LayoutElement::Spannable(s) => self.inflate_spannable(tree, s, parent),
            LayoutElement::Unknown => {
                warn!("Unknown layout element type, skipping");
                None
            }
        }
    }

    // ------------------------------------------------------------------------
    // Sizing
    // ------------------------------------------------------------------------

    fn dp(&self, dp: f32) -> f32 {
        self.config.metrics.dp_to_px(dp)
    }

    /// Box children stay match-parent even when the box wraps its content
    fn expand(&self, axis: Axis, parent: &ParentContext) -> ViewSize {
        let main_axis = matches!(
            (parent.kind, axis),
            (ParentKind::Row, Axis::Horizontal) | (ParentKind::Column, Axis::Vertical)
        );
        if parent.is_wrap(axis) && (main_axis || parent.kind == ParentKind::Arc) {
            trace!("expand inside a wrap-sized {:?} on {:?} axis, using wrap", parent.kind, axis);
            return ViewSize::WrapContent;
        }
        if main_axis {
            ViewSize::Weight(1.0)
        } else {
            ViewSize::MatchParent
        }
    }

    fn container_size(
        &self,
        dimension: ContainerDimension,
        axis: Axis,
        parent: &ParentContext,
    ) -> ViewSize {
        match dimension {
            ContainerDimension::Dp(dp) => ViewSize::Px(self.dp(dp.max(0.0))),
            ContainerDimension::Expand => self.expand(axis, parent),
            ContainerDimension::Wrap => ViewSize::WrapContent,
        }
    }

    fn spacer_size(
        &self,
        dimension: SpacerDimension,
        axis: Axis,
        parent: &ParentContext,
    ) -> ViewSize {
        match dimension {
            SpacerDimension::Dp(dp) => ViewSize::Px(self.dp(dp.max(0.0))),
            SpacerDimension::Expand => self.expand(axis, parent),
        }
    }

    fn image_size(
        &self,
        dimension: ImageDimension,
        axis: Axis,
        parent: &ParentContext,
        resource_id: &str,
    ) -> Option<ViewSize> {
        match dimension {
            ImageDimension::Dp(dp) if dp <= 0.0 => {
                warn!("Image {} has a non-positive {:?} size, skipping", resource_id, axis);
                None
            }
            ImageDimension::Dp(dp) => Some(ViewSize::Px(self.dp(dp))),
            ImageDimension::Expand => Some(self.expand(axis, parent)),
            ImageDimension::Proportional {
                aspect_ratio_width,
                aspect_ratio_height,
            } if aspect_ratio_width == 0 || aspect_ratio_height == 0 => {
                warn!(
                    "Image {} has an invalid aspect ratio {}:{}, skipping",
                    resource_id, aspect_ratio_width, aspect_ratio_height
                );
                None
            }
            ImageDimension::Proportional { .. } => Some(ViewSize::WrapContent),
        }
    }

    // ------------------------------------------------------------------------
    // Modifiers
    // ------------------------------------------------------------------------

    fn apply_modifiers(&self, node: &mut ViewNode, modifiers: &Modifiers) {
        if let Some(padding) = &modifiers.padding {
            node.padding = EdgeInsets {
                left: self.dp(padding.start),
                right: self.dp(padding.end),
                top: self.dp(padding.top),
                bottom: self.dp(padding.bottom),
            };
        }

        if modifiers.background.is_some() || modifiers.border.is_some() {
            let mut background = BackgroundDrawable::default();
            if let Some(fill) = &modifiers.background {
                if let Some(color) = fill.color {
                    background = background.with_color(color);
                }
                background = background.with_rounded(self.dp(fill.corner_radius_dp));
            }
            if let Some(border) = &modifiers.border {
                background = background.with_border(self.dp(border.width_dp), border.color);
            }
            node.background = Some(background);
        }

        apply_interaction(
            node,
            modifiers.clickable.as_ref(),
            modifiers.semantics.as_ref(),
        );
    }

    // ------------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------------

    fn inflate_box(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &BoxElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        self.inflate_container(
            tree,
            ContainerKind::Frame,
            &element.children,
            (element.width, element.height),
            (
                horizontal_gravity(element.horizontal_alignment),
                vertical_gravity(element.vertical_alignment),
            ),
            &element.modifiers,
            parent,
        )
    }

    fn inflate_row(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &RowElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        self.inflate_container(
            tree,
            ContainerKind::Horizontal,
            &element.children,
            (element.width, element.height),
            (Gravity::Start, vertical_gravity(element.vertical_alignment)),
            &element.modifiers,
            parent,
        )
    }

    fn inflate_column(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &ColumnElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        self.inflate_container(
            tree,
            ContainerKind::Vertical,
            &element.children,
            (element.width, element.height),
            (horizontal_gravity(element.horizontal_alignment), Gravity::Start),
            &element.modifiers,
            parent,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn inflate_container(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        kind: ContainerKind,
        children: &[LayoutElement],
        (width, height): (ContainerDimension, ContainerDimension),
        (child_horizontal, child_vertical): (Gravity, Gravity),
        modifiers: &Modifiers,
        parent: ParentContext,
    ) -> Option<ViewId> {
        let width = self.container_size(width, Axis::Horizontal, &parent);
        let height = self.container_size(height, Axis::Vertical, &parent);

        for (axis, size) in [(Axis::Horizontal, width), (Axis::Vertical, height)] {
            if size.is_wrap() && !children.iter().any(|child| is_measurable(child, axis)) {
                warn!(
                    "Wrap-sized {:?} container has nothing measurable on its {:?} axis, skipping",
                    kind, axis
                );
                return None;
            }
        }

        let context = ParentContext {
            kind: match kind {
                ContainerKind::Frame => ParentKind::Box,
                ContainerKind::Horizontal => ParentKind::Row,
                ContainerKind::Vertical => ParentKind::Column,
            },
            wrap_width: width.is_wrap(),
            wrap_height: height.is_wrap(),
            horizontal_gravity: child_horizontal,
            vertical_gravity: child_vertical,
        };

        let mut child_ids: SmallVec<[ViewId; 4]> = children
            .iter()
            .filter_map(|child| self.inflate_element(tree, child, context))
            .collect();

        let mut tree = tree.borrow_mut();
        if kind == ContainerKind::Frame {
            let match_parent = child_ids
                .iter()
                .filter_map(|&id| tree.get(id))
                .filter(|node| {
                    node.params.width.is_match_parent() || node.params.height.is_match_parent()
                })
                .count();
            if match_parent == 1 {
                trace!("box has a single match-parent child, adding filler");
                child_ids.push(tree.insert(ViewNode::filler()));
            }
        }

        let mut node = ViewNode::new(ViewKind::Container(kind), parent.params(width, height))
            .with_children(child_ids);
        self.apply_modifiers(&mut node, modifiers);
        Some(tree.insert(node))
    }

    // ------------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------------

    fn inflate_spacer(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &SpacerElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        let width = self.spacer_size(element.width, Axis::Horizontal, &parent);
        let height = self.spacer_size(element.height, Axis::Vertical, &parent);
        let mut node = ViewNode::new(ViewKind::Spacer, parent.params(width, height));
        self.apply_modifiers(&mut node, &element.modifiers);
        Some(tree.borrow_mut().insert(node))
    }

    fn inflate_text(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &TextElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        let style = ResolvedFontStyle::resolve(&element.font_style, &self.config);
        let metrics = self.measurer.measure(&element.text, &style, element.max_lines);
        let text = TextView {
            text: element.text.clone(),
            style,
            max_lines: element.max_lines,
            metrics,
        };

        let mut node = ViewNode::new(
            ViewKind::Text(text),
            parent.params(ViewSize::WrapContent, ViewSize::WrapContent),
        );
        self.apply_modifiers(&mut node, &element.modifiers);
        Some(tree.borrow_mut().insert(node))
    }

    fn inflate_image(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &ImageElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        let resource_id = element.resource_id.as_str();
        let (Some(width), Some(height)) = (element.width, element.height) else {
            warn!("Image {} is missing a width or height, skipping", resource_id);
            return None;
        };

        let aspect_ratio = match (width, height) {
            (ImageDimension::Proportional { .. }, ImageDimension::Proportional { .. }) => {
                warn!("Image {} has two proportional dimensions, skipping", resource_id);
                return None;
            }
            (
                ImageDimension::Proportional {
                    aspect_ratio_width,
                    aspect_ratio_height,
                },
                _,
            )
            | (
                _,
                ImageDimension::Proportional {
                    aspect_ratio_width,
                    aspect_ratio_height,
                },
            ) => Some((aspect_ratio_width, aspect_ratio_height)),
            _ => None,
        };

        let width = self.image_size(width, Axis::Horizontal, &parent, resource_id)?;
        let height = self.image_size(height, Axis::Vertical, &parent, resource_id)?;
        let mut params = parent.params(width, height);
        if let Some((w, h)) = aspect_ratio {
            params = params.with_aspect_ratio(w as f32 / h as f32);
        }

        let tint = element.tint.filter(|_| {
            let tintable = self.resolver.can_be_tinted(resource_id);
            if !tintable {
                debug!("Image {} cannot be tinted, ignoring tint", resource_id);
            }
            tintable
        });

        let (content, pending) = match self.resolver.drawable(resource_id) {
            None => {
                warn!("Unknown image resource {}", resource_id);
                let err = ResourceAccessError::Unknown(resource_id.to_string());
                (ImageContent::Failed(err), None)
            }
            Some(future) => match future.peek() {
                Some(Ok(drawable)) => (ImageContent::Loaded(drawable), None),
                Some(Err(err)) => {
                    warn!("Failed to load image {}: {}", resource_id, err);
                    (ImageContent::Failed(err), None)
                }
                None => {
                    let placeholder = self
                        .resolver
                        .placeholder(resource_id)
                        .map(ImageContent::Placeholder)
                        .unwrap_or(ImageContent::Empty);
                    (placeholder, Some(future))
                }
            },
        };

        let image = ImageView {
            resource_id: resource_id.to_string(),
            content,
            tint,
        };
        let mut node = ViewNode::new(ViewKind::Image(image), params);
        self.apply_modifiers(&mut node, &element.modifiers);
        let id = tree.borrow_mut().insert(node);

        if let Some(future) = pending {
            let weak = Rc::downgrade(tree);
            self.spawn(async move {
                let result = future.resolve().await;
                match weak.upgrade() {
                    Some(tree) => {
                        tree.borrow_mut().set_image_result(id, result);
                    }
                    None => trace!("image resolved after its tile was dropped"),
                }
            });
        }
        Some(id)
    }

    fn inflate_spannable(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &SpannableElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        let mut run = StyledTextRun::new();
        let mut pending: SmallVec<[(usize, DrawableFuture); 2]> = SmallVec::new();

        for span in &element.spans {
            match span {
                Span::Text(text) => {
                    let style = ResolvedFontStyle::resolve(&text.font_style, &self.config);
                    run.append_text(&text.text, &style, text.clickable.as_ref().map(Into::into));
                }
                Span::Image(image) => {
                    if image.width_dp <= 0.0 || image.height_dp <= 0.0 {
                        warn!(
                            "Inline image {} has a non-positive size, skipping",
                            image.resource_id
                        );
                        continue;
                    }
                    let Some(future) = self.resolver.drawable(&image.resource_id) else {
                        warn!("Unknown inline image resource {}", image.resource_id);
                        continue;
                    };

                    let width = self.dp(image.width_dp);
                    let height = self.dp(image.height_dp);
                    let click = image.clickable.as_ref().map(Into::into);
                    match future.peek() {
                        Some(Ok(drawable)) => {
                            run.append_image(&image.resource_id, width, height, drawable, click);
                        }
                        Some(Err(err)) => {
                            warn!("Failed to load inline image {}: {}", image.resource_id, err);
                        }
                        None => {
                            let placeholder = self.resolver.placeholder(&image.resource_id);
                            let index = run.append_image_placeholder(
                                &image.resource_id,
                                width,
                                height,
                                placeholder,
                                click,
                            );
                            pending.push((index, future));
                        }
                    }
                }
            }
        }

        let mut style = ResolvedFontStyle::resolve(&Default::default(), &self.config);
        if let Some(size) = run.max_font_size() {
            style.size_px = size;
        }
        let mut metrics = self.measurer.measure(run.text(), &style, element.max_lines);
        metrics.height = metrics.height.max(run.max_image_size().1);

        let spannable = SpannableView {
            run,
            max_lines: element.max_lines,
            alignment: horizontal_gravity(element.alignment),
            metrics,
        };
        let mut node = ViewNode::new(
            ViewKind::Spannable(spannable),
            parent.params(ViewSize::WrapContent, ViewSize::WrapContent),
        );
        self.apply_modifiers(&mut node, &element.modifiers);
        let id = tree.borrow_mut().insert(node);

        for (index, future) in pending {
            let weak = Rc::downgrade(tree);
            self.spawn(async move {
                let result = future.resolve().await;
                match weak.upgrade() {
                    Some(tree) => {
                        tree.borrow_mut().swap_span_image(id, index, result);
                    }
                    None => trace!("inline image resolved after its tile was dropped"),
                }
            });
        }
        Some(id)
    }

    // ------------------------------------------------------------------------
    // Arcs
    // ------------------------------------------------------------------------

    fn inflate_arc(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &ArcElement,
        parent: ParentContext,
    ) -> Option<ViewId> {
        let children: Vec<ArcChild> = element
            .contents
            .iter()
            .filter_map(|content| self.inflate_arc_element(tree, content))
            .collect();

        let arc = ArcView {
            anchor_angle_degrees: element.anchor_angle_degrees,
            anchor_type: element.anchor_type,
            children,
        };
        let child_ids: SmallVec<[ViewId; 4]> = arc.children.iter().map(|c| c.view).collect();
        let params = parent.params(
            self.expand(Axis::Horizontal, &parent),
            self.expand(Axis::Vertical, &parent),
        );

        let mut node = ViewNode::new(ViewKind::Arc(arc), params).with_children(child_ids);
        self.apply_modifiers(&mut node, &element.modifiers);
        Some(tree.borrow_mut().insert(node))
    }

    fn arc_thickness(&self, thickness_dp: Option<f32>) -> Option<f32> {
        let thickness_dp = thickness_dp.unwrap_or(self.config.default_arc_thickness_dp);
        if thickness_dp < 0.0 {
            warn!("Arc element has a negative thickness, skipping");
            return None;
        }
        Some(self.dp(thickness_dp))
    }

    fn inflate_arc_element(
        &self,
        tree: &Rc<RefCell<ViewTree>>,
        element: &ArcLayoutElement,
    ) -> Option<ArcChild> {
        // Curved primitives are drawn by the arc, they take no room in layout
        let curved_params = LayoutParams::new(ViewSize::Px(0.0), ViewSize::Px(0.0));

        let (node, sweep, thickness_px, rotate_contents) = match element {
            ArcLayoutElement::Line(line) => {
                let thickness_px = self.arc_thickness(line.thickness_dp)?;
                if line.length_degrees < 0.0 {
                    warn!("Arc line has a negative length, skipping");
                    return None;
                }
                let curved = CurvedLineView {
                    sweep_degrees: line.length_degrees,
                    thickness_px,
                    color: Some(line.color.unwrap_or(Argb::WHITE)),
                };
                let mut node = ViewNode::new(ViewKind::CurvedLine(curved), curved_params);
                apply_arc_modifiers(&mut node, &line.modifiers);
                (node, ArcSweep::Degrees(line.length_degrees), thickness_px, false)
            }
            ArcLayoutElement::Spacer(spacer) => {
                let thickness_px = self.arc_thickness(spacer.thickness_dp)?;
                if spacer.length_degrees < 0.0 {
                    warn!("Arc spacer has a negative length, skipping");
                    return None;
                }
                let curved = CurvedLineView {
                    sweep_degrees: spacer.length_degrees,
                    thickness_px,
                    color: None,
                };
                let mut node = ViewNode::new(ViewKind::CurvedLine(curved), curved_params);
                apply_arc_modifiers(&mut node, &spacer.modifiers);
                (node, ArcSweep::Degrees(spacer.length_degrees), thickness_px, false)
            }
            ArcLayoutElement::Text(text) => {
                let style = ResolvedFontStyle::resolve(&text.font_style, &self.config);
                let metrics = self.measurer.measure(&text.text, &style, Some(1));
                let curved = CurvedTextView {
                    text: text.text.clone(),
                    style,
                    metrics,
                };
                let mut node = ViewNode::new(ViewKind::CurvedText(curved), curved_params);
                apply_arc_modifiers(&mut node, &text.modifiers);
                (node, ArcSweep::Length(metrics.width), metrics.height, false)
            }
            ArcLayoutElement::Adapter(adapter) => {
                let view = self.inflate_element(tree, &adapter.content, ParentContext::arc())?;
                return Some(ArcChild {
                    view,
                    sweep: ArcSweep::Measured,
                    thickness_px: 0.0,
                    rotate_contents: adapter.rotate_contents,
                });
            }
        };

        let view = tree.borrow_mut().insert(node);
        Some(ArcChild {
            view,
            sweep,
            thickness_px,
            rotate_contents,
        })
    }

    fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.spawner.spawn_local(task) {
            warn!("Failed to queue resource callback: {}", err);
        }
    }
}

fn apply_interaction(
    node: &mut ViewNode,
    clickable: Option<&Clickable>,
    semantics: Option<&Semantics>,
) {
    node.click = clickable.map(ClickAction::from);
    node.content_description = semantics.map(|s| s.content_description.clone());
}

fn apply_arc_modifiers(node: &mut ViewNode, modifiers: &ArcModifiers) {
    apply_interaction(
        node,
        modifiers.clickable.as_ref(),
        modifiers.semantics.as_ref(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> LayoutElement {
        LayoutElement::Text(TextElement {
            text: s.to_string(),
            font_style: Default::default(),
            max_lines: None,
            modifiers: Default::default(),
        })
    }

    fn spacer(width: SpacerDimension, height: SpacerDimension) -> LayoutElement {
        LayoutElement::Spacer(SpacerElement {
            width,
            height,
            modifiers: Default::default(),
        })
    }

    #[test]
    fn test_measurability() {
        assert!(is_measurable(&text("a"), Axis::Horizontal));
        assert!(!is_measurable(
            &spacer(SpacerDimension::Expand, SpacerDimension::Dp(1.0)),
            Axis::Horizontal
        ));
        assert!(is_measurable(
            &spacer(SpacerDimension::Expand, SpacerDimension::Dp(1.0)),
            Axis::Vertical
        ));

        let column = LayoutElement::Column(ColumnElement {
            width: ContainerDimension::Expand,
            children: vec![text("a")],
            ..Default::default()
        });
        assert!(is_measurable(&column, Axis::Horizontal));

        let empty = LayoutElement::Box(BoxElement::default());
        assert!(!is_measurable(&empty, Axis::Vertical));
        assert!(!is_measurable(&LayoutElement::Unknown, Axis::Vertical));
    }

    #[test]
    fn test_proportional_image_measurability() {
        let image = LayoutElement::Image(ImageElement {
            resource_id: "icon".to_string(),
            width: Some(ImageDimension::Dp(20.0)),
            height: Some(ImageDimension::Proportional {
                aspect_ratio_width: 1,
                aspect_ratio_height: 1,
            }),
            tint: None,
            modifiers: Default::default(),
        });
        assert!(is_measurable(&image, Axis::Horizontal));
        assert!(is_measurable(&image, Axis::Vertical));
    }

    #[test]
    fn test_expand_demotion() {
        let config = InflaterConfig::default();
        let pool = futures::executor::LocalPool::new();
        let inflater = TileInflater::new(
            config,
            Rc::new(crate::resources::StaticResourceResolver::new()),
            Rc::new(crate::action::RecordingDispatcher::new()),
            pool.spawner(),
        );

        let wrap_row = ParentContext {
            kind: ParentKind::Row,
            wrap_width: true,
            ..ParentContext::root()
        };
        assert_eq!(
            inflater.expand(Axis::Horizontal, &wrap_row),
            ViewSize::WrapContent
        );
        assert_eq!(
            inflater.expand(Axis::Vertical, &wrap_row),
            ViewSize::MatchParent
        );

        let fixed_row = ParentContext {
            kind: ParentKind::Row,
            ..ParentContext::root()
        };
        assert_eq!(
            inflater.expand(Axis::Horizontal, &fixed_row),
            ViewSize::Weight(1.0)
        );

        let wrap_box = ParentContext {
            kind: ParentKind::Box,
            wrap_width: true,
            wrap_height: true,
            ..ParentContext::root()
        };
        assert_eq!(
            inflater.expand(Axis::Horizontal, &wrap_box),
            ViewSize::MatchParent
        );
        assert_eq!(
            inflater.expand(Axis::Vertical, &wrap_box),
            ViewSize::MatchParent
        );
        assert_eq!(
            inflater.expand(Axis::Vertical, &ParentContext::arc()),
            ViewSize::WrapContent
        );
    }
}
