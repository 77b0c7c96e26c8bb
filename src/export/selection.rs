//! Batch export selection state
//!
//! One `BatchExportItem` per catalog preset, recreated for each export
//! session.

use super::presets::{Platform, PlatformExportPreset, PLATFORM_PRESETS};

/// A catalog preset and whether it is part of the next batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchExportItem {
    pub preset: &'static PlatformExportPreset,
    pub selected: bool,
}

/// Selection over the full preset catalog.
#[derive(Debug, Clone)]
pub struct PresetSelection {
    items: Vec<BatchExportItem>,
}

impl Default for PresetSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetSelection {
    /// Fresh selection with nothing selected.
    pub fn new() -> Self {
        Self {
            items: PLATFORM_PRESETS
                .iter()
                .map(|preset| BatchExportItem {
                    preset,
                    selected: false,
                })
                .collect(),
        }
    }

    pub fn items(&self) -> &[BatchExportItem] {
        &self.items
    }

    /// Flip one preset. Unknown ids are ignored.
    pub fn toggle(&mut self, preset_id: &str) {
        if let Some(item) = self.items.iter_mut().find(|i| i.preset.id == preset_id) {
            item.selected = !item.selected;
        }
    }

    /// Select or deselect one preset. Unknown ids are ignored.
    pub fn set(&mut self, preset_id: &str, selected: bool) {
        if let Some(item) = self.items.iter_mut().find(|i| i.preset.id == preset_id) {
            item.selected = selected;
        }
    }

    /// Select or deselect every preset of a platform.
    pub fn set_platform(&mut self, platform: Platform, selected: bool) {
        for item in self.items.iter_mut().filter(|i| i.preset.platform == platform) {
            item.selected = selected;
        }
    }

    pub fn select_all(&mut self) {
        self.items.iter_mut().for_each(|i| i.selected = true);
    }

    pub fn clear(&mut self) {
        self.items.iter_mut().for_each(|i| i.selected = false);
    }

    /// Selected presets in catalog order.
    pub fn selected_presets(&self) -> Vec<&'static PlatformExportPreset> {
        self.items
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.preset)
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|i| i.selected).count()
    }
}
