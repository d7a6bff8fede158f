//! Wear Tiles
//!
//! Inflates declarative tile layouts into a measurable view tree.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use wear_tiles::{
//!     InflaterConfig, Layout, RecordingDispatcher, StaticResourceResolver, TileInflater,
//!     UiExecutor,
//! };
//!
//! let layout = Layout::from_json(
//!     r#"{ "root": { "type": "box", "width": "expand", "height": "expand", "children": [
//!         { "type": "text", "text": "Good morning" }
//!     ] } }"#,
//! )
//! .unwrap();
//!
//! let mut executor = UiExecutor::new();
//! let inflater = TileInflater::new(
//!     InflaterConfig::default(),
//!     Rc::new(StaticResourceResolver::new()),
//!     Rc::new(RecordingDispatcher::new()),
//!     executor.spawner(),
//! );
//! let tile = inflater.inflate(&layout);
//! executor.run_until_stalled();
//!
//! let bounds = tile.compute_layout().unwrap();
//! let root = tile.root().unwrap();
//! assert_eq!(bounds.get(root).unwrap().width, 384.0);
//! ```

pub mod action;
pub mod arc;
pub mod config;
pub mod element;
pub mod error;
pub mod executor;
pub mod inflater;
pub mod proto;
pub mod resources;
pub mod spannable;
pub mod text_measure;
pub mod tree;
pub mod view;

pub use action::{ActionDispatcher, ClickAction, RecordingDispatcher};
pub use arc::{ArcPlacement, ArcSegment};
pub use config::{DisplayMetrics, InflaterConfig};
pub use element::{BackgroundDrawable, BorderStroke, EdgeInsets, ElementBounds};
pub use error::{ResourceAccessError, Result, TileError};
pub use executor::UiExecutor;
pub use inflater::{InflatedTile, TileInflater};
pub use proto::{Argb, Layout, LayoutElement};
pub use resources::{
    Bitmap, Drawable, DrawableFuture, ImageFormat, InlineImageResource, ResourceCompleter,
    ResourceResolver, StaticResourceResolver,
};
pub use spannable::{SpanKind, StyledTextRun, TextSpan};
pub use text_measure::{EstimatingTextMeasurer, ResolvedFontStyle, TextMeasurer, TextMetrics};
pub use view::{
    ContainerKind, Gravity, ImageContent, LayoutParams, LayoutResult, ViewId, ViewKind, ViewNode,
    ViewSize, ViewTree,
};
