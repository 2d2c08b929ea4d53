//! Texture baker for garment textures
//! Renders every design element of a texture target onto an offscreen raster
//! using tiny-skia, then hands the raster to the 3D renderer.
//!
//! Features:
//! - Raster resolution fixed per target, independent of the on-screen panel
//! - Rotation around the element center, fractional opacity
//! - Optional bicubic sampling, multiply compositing and a shading overlay
//! - Pending images are skipped (and logged once) instead of stalling the pass

use crate::design_store::DesignStore;
use crate::image_source::ImageStatus;
use crate::model::{DesignElement, DesignId};
use garmentkit_core::constants::SHADING_STRENGTH;
use garmentkit_core::{CustomizerError, TextureTarget};
use garmentkit_settings::BakingSettings;
use std::collections::HashSet;
use tiny_skia::{BlendMode, Color, FilterQuality, Pixmap, PixmapPaint, Transform};

/// Options passed along with a published texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishOptions {
    /// `false` lets the renderer treat the texture as fully opaque.
    pub needs_alpha: bool,
}

/// The 3D renderer, as seen by the baker.
pub trait RenderBackend {
    /// A drawable raster for `target`, or `None` while the renderer is not ready.
    ///
    /// `width`/`height` are the configured resolution; a backend may return a
    /// different size, and the bake follows the returned raster.
    fn render_surface(&mut self, target: TextureTarget, width: u32, height: u32) -> Option<Pixmap>;

    /// Replaces the material texture for `target`.
    fn publish_texture(&mut self, target: TextureTarget, raster: Pixmap, options: PublishOptions);

    /// Unsets the material texture for `target`.
    fn clear_texture(&mut self, target: TextureTarget);

    /// Asks for a new frame. Fire and forget.
    fn request_render(&mut self);
}

/// What one bake pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BakeReport {
    pub targets_published: Vec<TextureTarget>,
    pub targets_cleared: Vec<TextureTarget>,
    pub elements_drawn: usize,
    /// Elements whose image was not ready (or failed) during this pass.
    pub elements_skipped: Vec<DesignId>,
    pub unavailable_targets: Vec<TextureTarget>,
}

impl BakeReport {
    /// True when the pass changed anything visible in the 3D view.
    pub fn touched_renderer(&self) -> bool {
        !self.targets_published.is_empty() || !self.targets_cleared.is_empty()
    }
}

/// Result of drawing one target raster.
#[derive(Debug)]
pub struct TargetRaster {
    pub pixmap: Pixmap,
    pub needs_alpha: bool,
    pub drawn: usize,
    pub skipped: Vec<DesignId>,
}

/// Bakes design elements into per-target textures.
#[derive(Debug, Clone)]
pub struct TextureBaker {
    base_color: [u8; 3],
    shading_strength: f32,
    /// Elements already reported as not ready, to log once per id.
    reported: HashSet<DesignId>,
}

impl TextureBaker {
    pub fn new(base_color: [u8; 3], shading_strength: f32) -> Self {
        Self {
            base_color,
            shading_strength,
            reported: HashSet::new(),
        }
    }

    pub fn from_settings(settings: &BakingSettings) -> Self {
        Self::new(settings.base_color, settings.shading_strength)
    }

    pub fn base_color(&self) -> [u8; 3] {
        self.base_color
    }

    pub fn set_base_color(&mut self, color: [u8; 3]) {
        self.base_color = color;
    }

    /// Forgets the once-per-id log state for an element.
    pub fn forget(&mut self, id: DesignId) {
        self.reported.remove(&id);
    }

    /// Runs one full pass over every texture target.
    ///
    /// The store is read once per target at the start of its draw, and the
    /// raster is only published after every element was drawn or skipped.
    pub fn bake(&mut self, store: &DesignStore, backend: &mut dyn RenderBackend) -> BakeReport {
        self.reported.retain(|id| store.contains(*id));
        let mut report = BakeReport::default();

        for target in TextureTarget::ALL {
            let elements: Vec<&DesignElement> = store.list_by_target(target).collect();
            if elements.is_empty() {
                backend.clear_texture(target);
                report.targets_cleared.push(target);
                continue;
            }

            let (width, height) = store.rules().raster_size(target);
            let Some(surface) = backend.render_surface(target, width, height) else {
                tracing::warn!(
                    "{}",
                    CustomizerError::RendererUnavailable {
                        target: target.name().to_string()
                    }
                );
                report.unavailable_targets.push(target);
                continue;
            };

            let raster = self.draw_target(surface, &elements);
            report.elements_drawn += raster.drawn;
            report.elements_skipped.extend(raster.skipped);
            backend.publish_texture(
                target,
                raster.pixmap,
                PublishOptions {
                    needs_alpha: raster.needs_alpha,
                },
            );
            report.targets_published.push(target);
        }

        if report.touched_renderer() {
            backend.request_render();
        }
        tracing::debug!(
            "Bake: {} published, {} cleared, {} drawn, {} skipped",
            report.targets_published.len(),
            report.targets_cleared.len(),
            report.elements_drawn,
            report.elements_skipped.len()
        );
        report
    }

    /// Draws `elements` in order onto `surface`, over the base color.
    pub fn draw_target(&mut self, mut surface: Pixmap, elements: &[&DesignElement]) -> TargetRaster {
        let [r, g, b] = self.base_color;
        surface.fill(Color::from_rgba8(r, g, b, 255));

        let mut needs_alpha = false;
        let mut drawn = 0;
        let mut skipped = Vec::new();
        for element in elements {
            let Some(source) = element.image.pixmap() else {
                self.report_not_ready(element);
                skipped.push(element.id);
                continue;
            };
            self.reported.remove(&element.id);
            self.draw_element(&mut surface, element, &source);
            needs_alpha |= element.needs_alpha();
            drawn += 1;
        }

        TargetRaster {
            pixmap: surface,
            needs_alpha,
            drawn,
            skipped,
        }
    }

    fn report_not_ready(&mut self, element: &DesignElement) {
        if !self.reported.insert(element.id) {
            return;
        }
        match element.image.status() {
            ImageStatus::Failed(reason) => {
                tracing::warn!("Skipping design {}: image failed to decode ({})", element.id, reason)
            }
            _ => tracing::warn!(
                "{}, skipping",
                CustomizerError::DecodeNotReady {
                    id: element.id.raw()
                }
            ),
        }
    }

    fn draw_element(&self, surface: &mut Pixmap, element: &DesignElement, source: &Pixmap) {
        let transform = element_transform(element, source, surface.width(), surface.height());
        let opacity = element.opacity as f32 / 100.0;

        let paint = PixmapPaint {
            opacity,
            blend_mode: if element.flags.fabric_blend {
                BlendMode::Multiply
            } else {
                BlendMode::SourceOver
            },
            quality: if element.flags.supersample {
                FilterQuality::Bicubic
            } else {
                FilterQuality::Bilinear
            },
        };
        surface.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

        if element.flags.shading {
            let shading = PixmapPaint {
                opacity: (opacity * self.shading_strength).clamp(0.0, 1.0),
                blend_mode: BlendMode::SoftLight,
                quality: paint.quality,
            };
            surface.draw_pixmap(0, 0, source.as_ref(), &shading, transform, None);
        }
    }
}

impl Default for TextureBaker {
    fn default() -> Self {
        Self::new([255, 255, 255], SHADING_STRENGTH)
    }
}

/// Maps source pixels onto the element's rotated destination rectangle.
///
/// Transform: Source -> Raster
/// scale to the destination size, move to the destination's top-left, then
/// rotate around the destination center.
pub fn element_transform(
    element: &DesignElement,
    source: &Pixmap,
    raster_width: u32,
    raster_height: u32,
) -> Transform {
    let (w, h) = (raster_width as f64, raster_height as f64);
    let (hu, hv) = element.half_extent;
    let dst_w = 2.0 * hu * w;
    let dst_h = 2.0 * hv * h;
    let cx = element.position.x * w;
    let cy = element.position.y * h;

    let sx = dst_w / source.width() as f64;
    let sy = dst_h / source.height() as f64;
    Transform::from_scale(sx as f32, sy as f32)
        .post_translate((cx - dst_w / 2.0) as f32, (cy - dst_h / 2.0) as f32)
        .post_rotate_at(element.rotation as f32, cx as f32, cy as f32)
}
