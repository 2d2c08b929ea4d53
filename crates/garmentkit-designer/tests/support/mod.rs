//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use garmentkit_core::types::{shared, Shared};
use garmentkit_core::{PixelRect, TextureTarget};
use garmentkit_designer::{
    CustomizerSession, ImageRef, PublishOptions, RenderBackend, SelectionChange,
    SelectionListener, UploadedImage,
};
use std::rc::Rc;
use tiny_skia::Pixmap;

pub const PANEL: PixelRect = PixelRect::new(0.0, 0.0, 400.0, 700.0);

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Publish {
        target: TextureTarget,
        width: u32,
        needs_alpha: bool,
    },
    Clear(TextureTarget),
    Render,
}

#[derive(Debug, Default)]
pub struct RendererLog {
    pub calls: Vec<RenderCall>,
    pub last_raster: Option<(TextureTarget, Pixmap)>,
}

impl RendererLog {
    pub fn publishes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Publish { .. }))
            .count()
    }

    pub fn renders(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Render))
            .count()
    }
}

/// Renderer double that hands out small surfaces and records every call.
pub struct MockRenderer {
    pub log: Shared<RendererLog>,
    /// Side length of surfaces handed out; `None` simulates an unready renderer.
    pub surface_size: Option<u32>,
}

impl MockRenderer {
    pub fn new() -> (Self, Shared<RendererLog>) {
        let log = shared(RendererLog::default());
        (
            Self {
                log: Rc::clone(&log),
                surface_size: Some(64),
            },
            log,
        )
    }

    pub fn unavailable() -> (Self, Shared<RendererLog>) {
        let (mut renderer, log) = Self::new();
        renderer.surface_size = None;
        (renderer, log)
    }
}

impl RenderBackend for MockRenderer {
    fn render_surface(&mut self, _target: TextureTarget, _w: u32, _h: u32) -> Option<Pixmap> {
        self.surface_size.and_then(|s| Pixmap::new(s, s))
    }

    fn publish_texture(&mut self, target: TextureTarget, raster: Pixmap, options: PublishOptions) {
        let mut log = self.log.borrow_mut();
        log.calls.push(RenderCall::Publish {
            target,
            width: raster.width(),
            needs_alpha: options.needs_alpha,
        });
        log.last_raster = Some((target, raster));
    }

    fn clear_texture(&mut self, target: TextureTarget) {
        self.log.borrow_mut().calls.push(RenderCall::Clear(target));
    }

    fn request_render(&mut self) {
        self.log.borrow_mut().calls.push(RenderCall::Render);
    }
}

/// View double that records what it was told and tracks its own highlight.
pub struct RecordingView {
    pub name: &'static str,
    pub order: Shared<Vec<&'static str>>,
    pub highlighted: Shared<Option<garmentkit_designer::DesignId>>,
}

impl SelectionListener for RecordingView {
    fn selection_changed(&mut self, change: SelectionChange) {
        self.order.borrow_mut().push(self.name);
        *self.highlighted.borrow_mut() = change.current;
    }
}

pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> ImageRef {
    ImageRef::from_rgba(width, height, rgba.repeat((width * height) as usize)).unwrap()
}

pub fn upload(width: u32, height: u32) -> UploadedImage {
    UploadedImage::ready(solid_image(width, height, [20, 40, 60, 255]), Some("art.png".into()))
        .unwrap()
}

pub fn session() -> (CustomizerSession, Shared<RendererLog>) {
    let (renderer, log) = MockRenderer::new();
    let mut session = CustomizerSession::new(Box::new(renderer));
    session.set_panel_rect(PANEL);
    (session, log)
}
