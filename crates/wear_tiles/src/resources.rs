//! Drawable resource resolution
//!
//! Resources are resolved through a [`ResourceResolver`] supplied by the
//! host. Every lookup hands back a [`DrawableFuture`]: a cloneable handle that
//! may already be complete (inline images) or complete later (pending
//! downloads). The inflater takes the synchronous path whenever
//! [`DrawableFuture::peek`] returns a value and otherwise awaits the handle on
//! the UI executor.

use std::future::Future;
use std::sync::Arc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ResourceAccessError;
use crate::proto::Argb;

/// Decoded RGBA8 pixels
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Something the host can draw into an image slot
#[derive(Clone, Debug, PartialEq)]
pub enum Drawable {
    Bitmap(Arc<Bitmap>),
    Solid(Argb),
}

impl Drawable {
    pub fn bitmap(bitmap: Bitmap) -> Self {
        Drawable::Bitmap(Arc::new(bitmap))
    }
}

pub type DrawableResult = std::result::Result<Drawable, ResourceAccessError>;

// ============================================================================
// Inline images
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// 16-bit little-endian 5-6-5
    Rgb565,
    #[default]
    Undefined,
}

/// Raw image bytes carried inside the resource bundle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImageResource {
    pub data: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    #[serde(default)]
    pub format: ImageFormat,
}

impl InlineImageResource {
    pub fn rgb565(data: Vec<u8>, width_px: u32, height_px: u32) -> Self {
        Self {
            data,
            width_px,
            height_px,
            format: ImageFormat::Rgb565,
        }
    }

    /// Decode into RGBA8 pixels
    pub fn decode(&self) -> Result<Bitmap, ResourceAccessError> {
        if self.width_px == 0 || self.height_px == 0 {
            return Err(ResourceAccessError::InvalidDimensions {
                width: self.width_px,
                height: self.height_px,
            });
        }

        match self.format {
            ImageFormat::Rgb565 => self.decode_rgb565(),
            ImageFormat::Undefined => Err(ResourceAccessError::UnsupportedFormat(
                "undefined".to_string(),
            )),
        }
    }

    fn decode_rgb565(&self) -> Result<Bitmap, ResourceAccessError> {
        let expected = self.width_px as usize * self.height_px as usize * 2;
        if self.data.len() != expected {
            return Err(ResourceAccessError::SizeMismatch {
                width: self.width_px,
                height: self.height_px,
                expected,
                actual: self.data.len(),
            });
        }

        let mut pixels = Vec::with_capacity(expected * 2);
        for chunk in self.data.chunks_exact(2) {
            let value = u16::from_le_bytes([chunk[0], chunk[1]]);
            let r = ((value >> 11) & 0x1F) as u8;
            let g = ((value >> 5) & 0x3F) as u8;
            let b = (value & 0x1F) as u8;
            pixels.extend_from_slice(&[
                (r << 3) | (r >> 2),
                (g << 2) | (g >> 4),
                (b << 3) | (b >> 2),
                0xFF,
            ]);
        }

        Ok(Bitmap {
            width: self.width_px,
            height: self.height_px,
            pixels,
        })
    }
}

// ============================================================================
// Futures
// ============================================================================

/// Shared handle to a drawable that may still be loading
#[derive(Clone)]
pub struct DrawableFuture {
    inner: Shared<LocalBoxFuture<'static, DrawableResult>>,
}

impl DrawableFuture {
    pub fn from_future(future: impl Future<Output = DrawableResult> + 'static) -> Self {
        Self {
            inner: future.boxed_local().shared(),
        }
    }

    /// A handle that is already complete
    pub fn ready(result: DrawableResult) -> Self {
        Self::from_future(future::ready(result))
    }

    /// A handle completed later through the returned [`ResourceCompleter`].
    ///
    /// Dropping the completer resolves the handle to
    /// [`ResourceAccessError::Abandoned`].
    pub fn pending(resource_id: impl Into<String>) -> (Self, ResourceCompleter) {
        let resource_id = resource_id.into();
        let (tx, rx) = oneshot::channel();
        let future = rx.map(move |received| {
            received.unwrap_or_else(|_| Err(ResourceAccessError::Abandoned(resource_id)))
        });
        (Self::from_future(future), ResourceCompleter { tx })
    }

    /// The result, if it is available without waiting
    pub fn peek(&self) -> Option<DrawableResult> {
        self.inner.clone().now_or_never()
    }

    pub async fn resolve(self) -> DrawableResult {
        self.inner.await
    }
}

impl std::fmt::Debug for DrawableFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawableFuture")
            .field("complete", &self.peek().is_some())
            .finish()
    }
}

/// Completes a [`DrawableFuture`] created with [`DrawableFuture::pending`]
#[derive(Debug)]
pub struct ResourceCompleter {
    tx: oneshot::Sender<DrawableResult>,
}

impl ResourceCompleter {
    pub fn complete(self, result: DrawableResult) {
        // The receiver is gone only if every handle was dropped
        let _ = self.tx.send(result);
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves resource ids to drawables
pub trait ResourceResolver {
    /// `None` when the resource id is unknown
    fn drawable(&self, resource_id: &str) -> Option<DrawableFuture>;

    /// Drawable shown while the resource is loading
    fn placeholder(&self, resource_id: &str) -> Option<Drawable>;

    fn has_placeholder(&self, resource_id: &str) -> bool {
        self.placeholder(resource_id).is_some()
    }

    /// Whether a tint may be applied to the resource
    fn can_be_tinted(&self, resource_id: &str) -> bool;
}

struct ResourceEntry {
    drawable: DrawableFuture,
    placeholder: Option<Drawable>,
    tintable: bool,
}

/// Map-backed resolver
#[derive(Default)]
pub struct StaticResourceResolver {
    entries: FxHashMap<String, ResourceEntry>,
}

impl StaticResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an inline image. Decoding happens now; a decode failure is
    /// reported through the resource's future.
    pub fn insert_inline(&mut self, resource_id: impl Into<String>, image: &InlineImageResource) {
        let resource_id = resource_id.into();
        let result = image.decode().map(Drawable::bitmap);
        if let Err(err) = &result {
            debug!("StaticResourceResolver::insert_inline - {}: {}", resource_id, err);
        }
        self.entries.insert(
            resource_id,
            ResourceEntry {
                drawable: DrawableFuture::ready(result),
                placeholder: None,
                tintable: true,
            },
        );
    }

    pub fn insert_drawable(&mut self, resource_id: impl Into<String>, drawable: Drawable) {
        self.entries.insert(
            resource_id.into(),
            ResourceEntry {
                drawable: DrawableFuture::ready(Ok(drawable)),
                placeholder: None,
                tintable: true,
            },
        );
    }

    /// Register a resource that will be delivered later
    pub fn insert_pending(
        &mut self,
        resource_id: impl Into<String>,
        placeholder: Option<Drawable>,
    ) -> ResourceCompleter {
        let resource_id = resource_id.into();
        let (drawable, completer) = DrawableFuture::pending(resource_id.clone());
        self.entries.insert(
            resource_id,
            ResourceEntry {
                drawable,
                placeholder,
                tintable: true,
            },
        );
        completer
    }

    /// Mark a resource as not tintable (e.g. a full-colour photo)
    pub fn set_tintable(&mut self, resource_id: &str, tintable: bool) {
        if let Some(entry) = self.entries.get_mut(resource_id) {
            entry.tintable = tintable;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceResolver for StaticResourceResolver {
    fn drawable(&self, resource_id: &str) -> Option<DrawableFuture> {
        self.entries.get(resource_id).map(|e| e.drawable.clone())
    }

    fn placeholder(&self, resource_id: &str) -> Option<Drawable> {
        self.entries.get(resource_id).and_then(|e| e.placeholder.clone())
    }

    fn can_be_tinted(&self, resource_id: &str) -> bool {
        self.entries.get(resource_id).is_some_and(|e| e.tintable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rgb565() {
        // Pure red, pure white
        let image = InlineImageResource::rgb565(vec![0x00, 0xF8, 0xFF, 0xFF], 2, 1);
        let bitmap = image.decode().unwrap();
        assert_eq!(bitmap.pixels, vec![255, 0, 0, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_decode_size_mismatch() {
        let image = InlineImageResource::rgb565(vec![0; 6], 2, 2);
        assert_eq!(
            image.decode(),
            Err(ResourceAccessError::SizeMismatch {
                width: 2,
                height: 2,
                expected: 8,
                actual: 6
            })
        );
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let empty = InlineImageResource::rgb565(vec![], 0, 4);
        assert!(matches!(
            empty.decode(),
            Err(ResourceAccessError::InvalidDimensions { .. })
        ));

        let undefined = InlineImageResource {
            format: ImageFormat::Undefined,
            ..InlineImageResource::rgb565(vec![0; 2], 1, 1)
        };
        assert!(matches!(
            undefined.decode(),
            Err(ResourceAccessError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_ready_future_peeks() {
        let future = DrawableFuture::ready(Ok(Drawable::Solid(Argb::BLACK)));
        assert_eq!(future.peek(), Some(Ok(Drawable::Solid(Argb::BLACK))));
    }

    #[test]
    fn test_pending_future() {
        let (future, completer) = DrawableFuture::pending("photo");
        assert_eq!(future.peek(), None);
        completer.complete(Ok(Drawable::Solid(Argb::WHITE)));
        assert_eq!(future.peek(), Some(Ok(Drawable::Solid(Argb::WHITE))));
    }

    #[test]
    fn test_abandoned_future() {
        let (future, completer) = DrawableFuture::pending("photo");
        drop(completer);
        assert_eq!(
            future.peek(),
            Some(Err(ResourceAccessError::Abandoned("photo".to_string())))
        );
    }

    #[test]
    fn test_static_resolver() {
        let mut resolver = StaticResourceResolver::new();
        resolver.insert_inline("bad", &InlineImageResource::rgb565(vec![1], 1, 1));
        let _completer = resolver.insert_pending("late", Some(Drawable::Solid(Argb::BLACK)));
        resolver.set_tintable("late", false);

        assert!(resolver.drawable("missing").is_none());
        assert!(matches!(
            resolver.drawable("bad").unwrap().peek(),
            Some(Err(ResourceAccessError::SizeMismatch { .. }))
        ));
        assert!(resolver.has_placeholder("late"));
        assert!(!resolver.has_placeholder("bad"));
        assert!(!resolver.can_be_tinted("late"));
        assert!(resolver.can_be_tinted("bad"));
    }
}
