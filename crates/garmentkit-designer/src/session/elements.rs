//! Element lifecycle operations (upload, edit, delete, duplicate, zones) for the session.

use super::{log_failure, CustomizerSession};
use crate::image_source::ImageRef;
use crate::model::{DesignId, ElementProperty, ElementSummary};
use garmentkit_core::{Result, Zone};

/// An image handed over by the upload collaborator.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub image: ImageRef,
    pub natural_width: u32,
    pub natural_height: u32,
    pub file_name: Option<String>,
}

impl UploadedImage {
    /// Wraps a ready image, taking its natural size from the pixels.
    pub fn ready(image: ImageRef, file_name: Option<String>) -> Option<Self> {
        let (natural_width, natural_height) = image.dimensions()?;
        Some(Self {
            image,
            natural_width,
            natural_height,
            file_name,
        })
    }

    fn display_name(&self) -> String {
        self.file_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Untitled design")
            .to_string()
    }
}

impl CustomizerSession {
    /// Places an uploaded image in the current zone and selects it.
    ///
    /// Uploading the same image handle twice into one zone selects the
    /// existing element instead of adding another.
    pub fn image_uploaded(&mut self, upload: UploadedImage) -> Option<DesignId> {
        let zone = self.current_zone;
        let name = upload.display_name();
        let insertion = match self.store.create(
            zone,
            upload.image,
            upload.natural_width,
            upload.natural_height,
            name,
        ) {
            Ok(insertion) => insertion,
            Err(e) => {
                log_failure(&format!("Could not place uploaded image in {}", zone), &e);
                return None;
            }
        };

        let id = insertion.id();
        if insertion.is_new() {
            tracing::info!("Added design {} to {}", id, zone);
            self.scheduler.request_bake_now();
        }
        self.select(Some(id));
        self.scheduler.request_preview();
        Some(id)
    }

    /// Called when a pending image finished decoding (or failed).
    pub fn image_ready(&mut self, image: &ImageRef) {
        let ids: Vec<DesignId> = Zone::ALL
            .iter()
            .flat_map(|z| self.store.list_by_zone(*z))
            .filter(|e| e.image.ptr_eq(image))
            .map(|e| e.id)
            .collect();
        if ids.is_empty() {
            return;
        }
        for id in ids {
            self.baker.forget(id);
        }
        self.scheduler.request_bake_now();
        self.scheduler.request_preview();
    }

    /// Applies one property-panel edit, e.g. `("opacity", "60")`.
    ///
    /// Malformed input is returned as an error; an unknown id is logged and
    /// ignored like any other stale UI event.
    pub fn set_element_property(&mut self, id: DesignId, name: &str, value: &str) -> Result<()> {
        let property = ElementProperty::parse(name, value)?;
        self.apply_property(id, property);
        Ok(())
    }

    /// Typed variant of [`CustomizerSession::set_element_property`].
    pub fn apply_property(&mut self, id: DesignId, property: ElementProperty) -> bool {
        let Some(current) = self.store.get(id) else {
            tracing::warn!("Ignoring {:?} for unknown design {}", property, id);
            return false;
        };
        let changes = property.to_changes(current);
        if !self.store.update(id, changes) {
            return false;
        }
        self.scheduler.request_bake_now();
        self.scheduler.request_preview();
        true
    }

    /// Deletes an element, clearing the selection first if it was selected.
    pub fn delete_element(&mut self, id: DesignId) -> bool {
        if !self.store.contains(id) {
            tracing::warn!("Ignoring delete of unknown design {}", id);
            return false;
        }
        if self.selection.is_selected(id) {
            self.selection.select(None);
        }
        let removed = self.store.remove(id);
        self.baker.forget(id);
        self.scheduler.request_bake_now();
        self.scheduler.request_preview();
        removed
    }

    /// Duplicates an element on top of its zone and selects the copy.
    pub fn duplicate_element(&mut self, id: DesignId) -> Option<DesignId> {
        let copy = self.store.duplicate(id)?;
        self.select(Some(copy));
        self.scheduler.request_bake_now();
        self.scheduler.request_preview();
        Some(copy)
    }

    /// Switches the editing panel to the named zone.
    pub fn switch_zone(&mut self, name: &str) -> Result<()> {
        self.switch_to(name.parse()?);
        Ok(())
    }

    pub fn switch_to(&mut self, zone: Zone) {
        if zone == self.current_zone {
            return;
        }
        if self.interaction.is_dragging() {
            self.interaction.reset();
            self.scheduler.end_gesture();
        }
        let selected_elsewhere = self
            .selection
            .selected_id()
            .and_then(|id| self.store.zone_of(id))
            .is_some_and(|z| z != zone);
        if selected_elsewhere {
            self.selection.select(None);
        }
        tracing::debug!("Switched zone {} -> {}", self.current_zone, zone);
        self.current_zone = zone;
        self.scheduler.request_preview();
    }

    /// Removes every element of the named zone. Returns how many were removed.
    pub fn clear_zone(&mut self, name: &str) -> Result<usize> {
        let zone: Zone = name.parse()?;
        Ok(self.clear(zone))
    }

    pub fn clear(&mut self, zone: Zone) -> usize {
        let removed = self.store.clear_zone(zone);
        self.selection.deselect_if_any(&removed);
        for id in &removed {
            self.baker.forget(*id);
        }
        self.scheduler.request_bake_now();
        self.scheduler.request_preview();
        removed.len()
    }

    /// Summaries of the named zone's elements, bottom to top.
    pub fn list_elements(&self, name: &str) -> Result<Vec<ElementSummary>> {
        let zone: Zone = name.parse()?;
        Ok(self.summaries(zone))
    }

    pub fn summaries(&self, zone: Zone) -> Vec<ElementSummary> {
        self.store
            .list_by_zone(zone)
            .iter()
            .map(|e| ElementSummary {
                id: e.id,
                name: e.name.clone(),
                thumbnail: e.image.clone(),
                image_status: e.image.status(),
                opacity: e.opacity,
                selected: self.selection.is_selected(e.id),
            })
            .collect()
    }
}
