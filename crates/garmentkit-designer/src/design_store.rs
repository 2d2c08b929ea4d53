//! Per-zone storage of placed design elements.
//!
//! The store is the only place elements are mutated. Every mutating call
//! ends by re-normalizing the touched element (scale capped to what fits,
//! rotation wrap, opacity cap, extent refresh, position clamp), so callers
//! never observe a placement outside its printable rectangle.

use crate::image_source::ImageRef;
use crate::model::{DesignElement, DesignId, ElementChanges, ProcessingFlags};
use crate::transform::{clamp_scale, clamp_to_printable, half_extent_uv, normalize_rotation};
use garmentkit_core::constants::{
    BODY_TEXTURE_RESOLUTION, DEFAULT_OPACITY, DEFAULT_SCALE, DUPLICATE_OFFSET,
    MAX_EXTENT_FRACTION, MAX_SCALE, MIN_SCALE, SLEEVE_TEXTURE_RESOLUTION,
};
use garmentkit_core::{CustomizerError, Point, Result, TextureTarget, Zone, ZoneLayout};
use garmentkit_settings::Config;
use std::collections::HashMap;

/// Geometry and limits the store enforces on every element.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRules {
    pub layout: ZoneLayout,
    pub min_scale: f64,
    pub max_scale: f64,
    pub default_scale: f64,
    pub max_extent_fraction: f64,
    pub duplicate_offset: f64,
    pub body_resolution: u32,
    pub sleeve_resolution: u32,
}

impl PlacementRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            layout: config.layout,
            min_scale: config.interaction.min_scale,
            max_scale: config.interaction.max_scale,
            default_scale: config.interaction.default_scale,
            max_extent_fraction: config.interaction.max_extent_fraction,
            duplicate_offset: config.interaction.duplicate_offset,
            body_resolution: config.baking.body_resolution,
            sleeve_resolution: config.baking.sleeve_resolution,
        }
    }

    /// Pixel size of the raster backing a texture target.
    pub fn raster_size(&self, target: TextureTarget) -> (u32, u32) {
        match target {
            TextureTarget::Body => (self.body_resolution, self.body_resolution),
            TextureTarget::LeftSleeve | TextureTarget::RightSleeve => {
                (self.sleeve_resolution, self.sleeve_resolution)
            }
        }
    }

    /// UV half-extent of an element of the given natural size and scale.
    pub fn half_extent(&self, zone: Zone, natural: (u32, u32), scale: f64) -> Result<(f64, f64)> {
        half_extent_uv(
            natural.0 as f64,
            natural.1 as f64,
            scale,
            &self.layout.printable(zone),
            self.raster_size(zone.texture_target()),
            self.max_extent_fraction,
        )
    }

    /// Largest scale at which an element still fits inside its printable rect.
    ///
    /// This is `max_scale` unless the zone is too small for it. The fit limit
    /// then wins over both configured bounds.
    pub fn scale_limit(&self, zone: Zone, natural: (u32, u32)) -> Result<f64> {
        let (hu, hv) = self.half_extent(zone, natural, 1.0)?;
        let rect = self.layout.printable(zone);
        let fit = (rect.width() / (2.0 * hu)).min(rect.height() / (2.0 * hv));
        Ok(self.max_scale.min(fit))
    }
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            layout: ZoneLayout::default(),
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            default_scale: DEFAULT_SCALE,
            max_extent_fraction: MAX_EXTENT_FRACTION,
            duplicate_offset: DUPLICATE_OFFSET,
            body_resolution: BODY_TEXTURE_RESOLUTION,
            sleeve_resolution: SLEEVE_TEXTURE_RESOLUTION,
        }
    }
}

/// Outcome of [`DesignStore::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Created(DesignId),
    /// The zone already held an element for the same image.
    Existing(DesignId),
}

impl Insertion {
    pub fn id(self) -> DesignId {
        match self {
            Self::Created(id) | Self::Existing(id) => id,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Ordered element collections for all four zones.
#[derive(Debug, Clone)]
pub struct DesignStore {
    zones: HashMap<Zone, Vec<DesignElement>>,
    index: HashMap<DesignId, Zone>,
    next_id: u64,
    rules: PlacementRules,
}

impl DesignStore {
    pub fn new(rules: PlacementRules) -> Self {
        let zones = Zone::ALL.iter().map(|z| (*z, Vec::new())).collect();
        Self {
            zones,
            index: HashMap::new(),
            next_id: 1,
            rules,
        }
    }

    pub fn rules(&self) -> &PlacementRules {
        &self.rules
    }

    fn generate_id(&mut self) -> DesignId {
        let id = DesignId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Places an image in a zone with default placement.
    ///
    /// If the zone already holds an element referencing the same image
    /// handle, that element is returned untouched.
    pub fn create(
        &mut self,
        zone: Zone,
        image: ImageRef,
        natural_width: u32,
        natural_height: u32,
        name: impl Into<String>,
    ) -> Result<Insertion> {
        if let Some(existing) = self.list_by_zone(zone).iter().find(|e| e.image.ptr_eq(&image)) {
            tracing::debug!("Image already placed in {} as design {}", zone, existing.id);
            return Ok(Insertion::Existing(existing.id));
        }
        if natural_width == 0 || natural_height == 0 {
            return Err(CustomizerError::invalid_geometry(
                natural_width as f64,
                natural_height as f64,
            ));
        }

        let scale = self.rules.default_scale;
        let half_extent = self
            .rules
            .half_extent(zone, (natural_width, natural_height), scale)?;
        let id = self.generate_id();
        let mut element = DesignElement {
            id,
            name: name.into(),
            image,
            zone,
            position: self.rules.layout.printable(zone).center(),
            scale,
            rotation: 0.0,
            opacity: DEFAULT_OPACITY,
            natural_width,
            natural_height,
            half_extent,
            flags: ProcessingFlags::default(),
        };
        normalize(&self.rules, &mut element);

        tracing::debug!("Created design {} in {}", id, zone);
        self.zones.entry(zone).or_default().push(element);
        self.index.insert(id, zone);
        Ok(Insertion::Created(id))
    }

    /// Applies a partial update. Unknown ids are logged and ignored.
    pub fn update(&mut self, id: DesignId, changes: ElementChanges) -> bool {
        let rules = &self.rules;
        let Some(element) = find_mut(&mut self.zones, &self.index, id) else {
            tracing::warn!("{}", CustomizerError::StaleReference { id: id.raw() });
            return false;
        };

        if let Some(name) = changes.name {
            element.name = name;
        }
        if let Some(flags) = changes.flags {
            element.flags = flags;
        }
        if let Some(opacity) = changes.opacity {
            element.opacity = opacity;
        }
        if let Some(rotation) = changes.rotation {
            element.rotation = rotation;
        }
        if let Some(scale) = changes.scale {
            element.scale = scale;
        }
        if let Some(position) = changes.position {
            element.position = position;
        }
        normalize(rules, element);
        true
    }

    /// Removes an element. Returns whether anything was removed.
    pub fn remove(&mut self, id: DesignId) -> bool {
        let Some(zone) = self.index.remove(&id) else {
            tracing::warn!("{}", CustomizerError::StaleReference { id: id.raw() });
            return false;
        };
        if let Some(elements) = self.zones.get_mut(&zone) {
            elements.retain(|e| e.id != id);
        }
        tracing::debug!("Removed design {} from {}", id, zone);
        true
    }

    /// Removes every element of a zone, returning the removed ids.
    pub fn clear_zone(&mut self, zone: Zone) -> Vec<DesignId> {
        let removed: Vec<DesignId> = self
            .zones
            .get_mut(&zone)
            .map(|elements| elements.drain(..).map(|e| e.id).collect())
            .unwrap_or_default();
        for id in &removed {
            self.index.remove(id);
        }
        removed
    }

    /// Copies an element on top of its zone, nudged by the duplicate offset.
    ///
    /// Duplicates share the image handle, so they bypass deduplication.
    pub fn duplicate(&mut self, id: DesignId) -> Option<DesignId> {
        let Some(source) = self.get(id) else {
            tracing::warn!("{}", CustomizerError::StaleReference { id: id.raw() });
            return None;
        };
        let mut copy = source.clone();
        copy.name = format!("{} (copy)", copy.name);
        let new_id = self.generate_id();
        copy.id = new_id;
        copy.position = Point::new(
            copy.position.x + self.rules.duplicate_offset,
            copy.position.y + self.rules.duplicate_offset,
        );
        normalize(&self.rules, &mut copy);

        let zone = copy.zone;
        self.zones.entry(zone).or_default().push(copy);
        self.index.insert(new_id, zone);
        Some(new_id)
    }

    pub fn get(&self, id: DesignId) -> Option<&DesignElement> {
        let zone = self.index.get(&id)?;
        self.zones.get(zone)?.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: DesignId) -> bool {
        self.index.contains_key(&id)
    }

    /// Zone of an element, if it exists.
    pub fn zone_of(&self, id: DesignId) -> Option<Zone> {
        self.index.get(&id).copied()
    }

    /// Elements of a zone in insertion (z) order.
    pub fn list_by_zone(&self, zone: Zone) -> &[DesignElement] {
        self.zones.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Elements drawn onto a texture target, zone by zone in z order.
    pub fn list_by_target(&self, target: TextureTarget) -> impl Iterator<Item = &DesignElement> {
        target
            .zones()
            .iter()
            .flat_map(move |zone| self.list_by_zone(*zone).iter())
    }

    /// Topmost element whose rotated rectangle contains `uv`.
    pub fn hit_test(&self, zone: Zone, uv: Point) -> Option<DesignId> {
        self.list_by_zone(zone)
            .iter()
            .rev()
            .find(|e| e.contains(uv))
            .map(|e| e.id)
    }

    /// Total number of elements across all zones.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for DesignStore {
    fn default() -> Self {
        Self::new(PlacementRules::default())
    }
}

fn find_mut<'a>(
    zones: &'a mut HashMap<Zone, Vec<DesignElement>>,
    index: &HashMap<DesignId, Zone>,
    id: DesignId,
) -> Option<&'a mut DesignElement> {
    let zone = index.get(&id)?;
    zones.get_mut(zone)?.iter_mut().find(|e| e.id == id)
}

/// Re-establishes every element invariant.
fn normalize(rules: &PlacementRules, element: &mut DesignElement) {
    let natural = (element.natural_width, element.natural_height);
    let max_scale = rules
        .scale_limit(element.zone, natural)
        .unwrap_or(rules.max_scale);
    element.scale = clamp_scale(element.scale, rules.min_scale.min(max_scale), max_scale);
    element.rotation = normalize_rotation(element.rotation);
    element.opacity = element.opacity.min(100);

    match rules.half_extent(element.zone, natural, element.scale) {
        Ok(extent) => element.half_extent = extent,
        Err(e) => tracing::warn!("Keeping previous extent for design {}: {}", element.id, e),
    }

    let (hu, hv) = element.half_extent;
    let zone_rect = rules.layout.printable(element.zone);
    element.position = clamp_to_printable(element.position.x, element.position.y, hu, hv, &zone_rect);
}
