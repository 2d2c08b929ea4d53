//! Shared handles to decoded design images.
//!
//! An [`ImageRef`] is what the store keeps instead of pixel data. Clones share
//! one slot, and two handles are "the same image" only when they point at the
//! same slot, which is what upload deduplication relies on. The slot starts
//! `Pending` when the host hands over an image that is still decoding and is
//! resolved later; the baker skips pending images until then.

use garmentkit_core::types::{shared, Shared};
use garmentkit_core::{CustomizerError, Result};
use image::RgbaImage;
use std::fmt;
use std::rc::Rc;
use tiny_skia::{ColorU8, Pixmap};

/// Decode state of an image, as shown to list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    Pending,
    Ready,
    Failed(String),
}

enum ImageState {
    Pending,
    Ready(Rc<Pixmap>),
    Failed(String),
}

/// Cheap-clone handle to one decoded (or decoding) image.
#[derive(Clone)]
pub struct ImageRef {
    slot: Shared<ImageState>,
}

impl ImageRef {
    /// A handle whose pixels arrive later through [`ImageRef::resolve`].
    pub fn pending() -> Self {
        Self::with_state(ImageState::Pending)
    }

    /// Wraps an already premultiplied pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self::with_state(ImageState::Ready(Rc::new(pixmap)))
    }

    /// Builds a handle from straight-alpha RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let image = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            CustomizerError::ImageDecode(format!(
                "pixel buffer does not match {width}x{height} RGBA"
            ))
        })?;
        Ok(Self::from_pixmap(rgba_to_pixmap(&image)?))
    }

    /// Decodes an encoded image (PNG, JPEG, ...) into a ready handle.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_pixmap(decode(bytes)?))
    }

    fn with_state(state: ImageState) -> Self {
        Self {
            slot: shared(state),
        }
    }

    /// Marks a pending image as decoded.
    pub fn resolve(&self, pixmap: Pixmap) {
        *self.slot.borrow_mut() = ImageState::Ready(Rc::new(pixmap));
    }

    /// Decodes `bytes` into this handle, recording a failure on error.
    pub fn resolve_encoded(&self, bytes: &[u8]) -> Result<()> {
        match decode(bytes) {
            Ok(pixmap) => {
                self.resolve(pixmap);
                Ok(())
            }
            Err(e) => {
                self.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Marks the image as permanently undecodable.
    pub fn fail(&self, reason: impl Into<String>) {
        *self.slot.borrow_mut() = ImageState::Failed(reason.into());
    }

    pub fn status(&self) -> ImageStatus {
        match &*self.slot.borrow() {
            ImageState::Pending => ImageStatus::Pending,
            ImageState::Ready(_) => ImageStatus::Ready,
            ImageState::Failed(reason) => ImageStatus::Failed(reason.clone()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.slot.borrow(), ImageState::Ready(_))
    }

    /// The decoded pixels, if ready.
    pub fn pixmap(&self) -> Option<Rc<Pixmap>> {
        match &*self.slot.borrow() {
            ImageState::Ready(pixmap) => Some(Rc::clone(pixmap)),
            _ => None,
        }
    }

    /// Pixel size of the decoded image, if ready.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.pixmap().map(|p| (p.width(), p.height()))
    }

    /// True when both handles refer to the same image slot.
    pub fn ptr_eq(&self, other: &ImageRef) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef")
            .field("slot", &Rc::as_ptr(&self.slot))
            .field("status", &self.status())
            .finish()
    }
}

fn decode(bytes: &[u8]) -> Result<Pixmap> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| CustomizerError::ImageDecode(e.to_string()))?
        .to_rgba8();
    rgba_to_pixmap(&image)
}

fn rgba_to_pixmap(image: &RgbaImage) -> Result<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        CustomizerError::ImageDecode(format!("cannot allocate a {width}x{height} pixmap"))
    })?;
    // tiny-skia stores premultiplied alpha
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
