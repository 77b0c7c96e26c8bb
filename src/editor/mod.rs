//! Text overlay editor
//!
//! `TextEditor` owns the layer data store, the render surface that projects
//! it and the undo/redo history. The layer list is the source of truth for
//! persistence and export; surface objects are rebuilt from it on load.
//!
//! Unknown layer ids are never errors: mutations against them do nothing and
//! `duplicate_layer` returns `None`.

mod observer;

use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::error::Result;
use crate::export::ImageExportOptions;
use crate::history::HistoryManager;
use crate::layers::{
    generate_layer_name, CanvasState, TextLayer, TextLayerUpdate, CANVAS_STATE_VERSION,
};
use crate::surface::{
    apply_layer_to_object, new_object_for_layer, read_object_into_layer, RasterRequest,
    RenderSurface,
};

pub use observer::{EditorObserver, LoggingObserver, RecordingObserver};

/// Where to move a layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMove {
    Up,
    Down,
    ToFront,
    ToBack,
}

/// Text overlay editor over a render surface.
pub struct TextEditor<S: RenderSurface> {
    surface: S,
    layers: Vec<TextLayer>,
    selected: Option<String>,
    history: HistoryManager,
    config: EditorConfig,
    observers: Vec<Box<dyn EditorObserver>>,
}

impl<S: RenderSurface> TextEditor<S> {
    /// Create an editor on an empty surface and record the initial state.
    pub fn new(surface: S, config: EditorConfig) -> Self {
        let mut editor = Self {
            surface,
            layers: Vec::new(),
            selected: None,
            history: HistoryManager::new(config.max_history),
            config,
            observers: Vec::new(),
        };
        editor.save_history();
        editor
    }

    /// Create an editor and open `state` in it.
    pub fn with_state(surface: S, config: EditorConfig, state: &CanvasState) -> Self {
        let mut editor = Self::new(surface, config);
        editor.open_state(state);
        editor
    }

    pub fn add_observer(&mut self, observer: Box<dyn EditorObserver>) {
        self.observers.push(observer);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access to the surface, e.g. to apply interactive edits.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Layers bottom first
    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn selected_layer(&self) -> Option<&TextLayer> {
        self.selected.as_deref().and_then(|id| self.layer(id))
    }

    fn layer_mut(&mut self, id: &str) -> Option<&mut TextLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    fn notify_layers(&mut self) {
        for observer in self.observers.iter_mut() {
            observer.layers_changed(&self.layers);
        }
    }

    fn notify_selection(&mut self) {
        let selected = self
            .selected
            .as_deref()
            .and_then(|id| self.layers.iter().find(|l| l.id == id));
        for observer in self.observers.iter_mut() {
            observer.selection_changed(selected);
        }
    }

    /// Full snapshot of the current canvas.
    pub fn canvas_state(&self) -> Result<CanvasState> {
        Ok(CanvasState {
            version: CANVAS_STATE_VERSION.to_string(),
            width: self.surface.width(),
            height: self.surface.height(),
            background_color: self.surface.background_color().to_string(),
            background_image: self.surface.background_image().map(str::to_string),
            layers: self.layers.clone(),
            objects: self.surface.to_records()?,
        })
    }

    /// Record the current canvas in the history.
    pub fn save_history(&mut self) {
        match self.canvas_state() {
            Ok(state) => self.history.push_state(state),
            Err(e) => warn!("Could not snapshot canvas for history: {}", e),
        }
    }

    /// Add a text layer at the canvas center, select it and record history.
    pub fn add_text_layer(&mut self, text: Option<&str>) -> TextLayer {
        let mut layer = TextLayer::new(
            generate_layer_name(&self.layers),
            text.unwrap_or(&self.config.default_text),
        );
        layer.font_family = self.config.font_family.clone();
        layer.font_size = self.config.font_size;
        layer.fill = self.config.fill.clone();
        layer.left = f64::from(self.surface.width()) / 2.0;
        layer.top = f64::from(self.surface.height()) / 2.0;

        debug!("Adding layer {} ({})", layer.id, layer.name);
        self.surface.add_object(new_object_for_layer(&layer));
        self.layers.push(layer.clone());
        self.surface.request_render();
        self.notify_layers();
        self.select_layer(Some(&layer.id));
        self.save_history();
        layer
    }

    /// Remove a layer and its surface object.
    pub fn remove_layer(&mut self, id: &str) {
        let Some(index) = self.layers.iter().position(|l| l.id == id) else {
            return;
        };
        debug!("Removing layer {}", id);
        self.surface.remove_object(id);
        self.layers.remove(index);
        self.surface.request_render();
        self.notify_layers();
        if self.selected.as_deref() == Some(id) {
            self.select_layer(None);
        }
        self.save_history();
    }

    /// Clone a layer under a new id, offset by +20/+20, and select the copy.
    pub fn duplicate_layer(&mut self, id: &str) -> Option<TextLayer> {
        let copy = self.layer(id)?.duplicate();
        debug!("Duplicating layer {} as {}", id, copy.id);
        self.surface.add_object(new_object_for_layer(&copy));
        self.layers.push(copy.clone());
        self.surface.request_render();
        self.notify_layers();
        self.select_layer(Some(&copy.id));
        self.save_history();
        Some(copy)
    }

    /// Apply a partial update to a layer and its surface object.
    ///
    /// Not recorded in history on its own; call [`Self::save_history`] once
    /// the edit is complete.
    pub fn update_layer(&mut self, id: &str, update: &TextLayerUpdate) {
        let Some(layer) = self.layer_mut(id) else {
            return;
        };
        layer.apply_update(update);

        if let Some(object) = self.surface.object_mut(id) {
            apply_layer_to_object(object, update);
        }
        if update.locked == Some(true) && self.surface.active_object() == Some(id) {
            self.surface.set_active_object(None);
        }
        self.surface.request_render();
        self.notify_layers();
    }

    pub fn toggle_visibility(&mut self, id: &str) {
        if let Some(visible) = self.layer(id).map(|l| l.visible) {
            self.update_layer(
                id,
                &TextLayerUpdate {
                    visible: Some(!visible),
                    ..Default::default()
                },
            );
        }
    }

    pub fn toggle_lock(&mut self, id: &str) {
        if let Some(locked) = self.layer(id).map(|l| l.locked) {
            self.update_layer(
                id,
                &TextLayerUpdate {
                    locked: Some(!locked),
                    ..Default::default()
                },
            );
        }
    }

    /// Reorder a layer. Returns false for unknown ids and for moves past the
    /// ends of the stack.
    pub fn move_layer(&mut self, id: &str, direction: LayerMove) -> bool {
        let ids = self.surface.object_ids();
        let Some(index) = ids.iter().position(|o| o == id) else {
            return false;
        };
        let top = ids.len() - 1;
        let target = match direction {
            LayerMove::Up if index < top => index + 1,
            LayerMove::Down if index > 0 => index - 1,
            LayerMove::ToFront if index < top => top,
            LayerMove::ToBack if index > 0 => 0,
            _ => return false,
        };

        self.surface.move_object(id, target);
        self.sync_layer_order();
        self.surface.request_render();
        self.notify_layers();
        self.save_history();
        true
    }

    pub fn move_layer_up(&mut self, id: &str) -> bool {
        self.move_layer(id, LayerMove::Up)
    }

    pub fn move_layer_down(&mut self, id: &str) -> bool {
        self.move_layer(id, LayerMove::Down)
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.move_layer(id, LayerMove::ToFront)
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.move_layer(id, LayerMove::ToBack)
    }

    // Layers follow the surface stacking order.
    fn sync_layer_order(&mut self) {
        let ids = self.surface.object_ids();
        self.layers
            .sort_by_key(|l| ids.iter().position(|o| *o == l.id).unwrap_or(usize::MAX));
    }

    /// Select a layer (or clear the selection with `None`).
    ///
    /// Locked layers can be selected in the layer list but are never made
    /// active on the surface.
    pub fn select_layer(&mut self, id: Option<&str>) {
        match id {
            Some(id) => {
                let known = self.layer(id).is_some();
                let selectable = self.surface.object(id).is_some_and(|o| o.selectable);
                self.selected = known.then(|| id.to_string());
                self.surface
                    .set_active_object(if selectable { Some(id) } else { None });
            }
            None => {
                self.selected = None;
                self.surface.set_active_object(None);
            }
        }
        self.surface.request_render();
        self.notify_selection();
    }

    /// The surface reports an interactive modification (move, scale, rotate)
    /// of an object. Reads it back and records history.
    pub fn handle_object_modified(&mut self, id: &str) {
        if self.read_back(id) {
            self.save_history();
        }
    }

    /// The surface reports edited text content of an object.
    pub fn handle_text_changed(&mut self, id: &str) {
        self.read_back(id);
    }

    fn read_back(&mut self, id: &str) -> bool {
        let Some(object) = self.surface.object(id) else {
            return false;
        };
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        read_object_into_layer(object, layer);
        debug!("Synced layer {} from surface", id);
        self.notify_layers();
        true
    }

    pub fn set_background_color(&mut self, color: &str) {
        self.surface.set_background_color(color);
        self.surface.request_render();
        self.save_history();
    }

    /// Load (or clear) the background image. On failure the previous image
    /// stays and the error is returned.
    pub fn set_background_image(&mut self, url: Option<&str>) -> Result<()> {
        self.surface.load_background_image(url)?;
        self.surface.request_render();
        self.save_history();
        Ok(())
    }

    /// Replace the whole canvas with `state` without touching history.
    ///
    /// The surface takes the snapshot's size and every layer is rebuilt as a
    /// fresh surface object. A background image
    /// that fails to load is logged and skipped.
    pub fn load_state(&mut self, state: &CanvasState) {
        self.surface.clear();
        self.surface.set_size(state.width, state.height);
        self.surface.set_background_color(&state.background_color);
        if let Err(e) = self
            .surface
            .load_background_image(state.background_image.as_deref())
        {
            warn!("Background image not restored: {}", e);
        }
        for layer in &state.layers {
            self.surface.add_object(new_object_for_layer(layer));
        }
        self.layers = state.layers.clone();
        self.selected = None;
        self.surface.request_render();
        self.notify_layers();
        self.notify_selection();
    }

    /// Open a saved canvas as a new editing session with fresh history.
    pub fn open_state(&mut self, state: &CanvasState) {
        self.load_state(state);
        self.history.clear_history();
        self.save_history();
    }

    /// Restore the previous state. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(state) = self.history.undo().cloned() else {
            return false;
        };
        self.load_state(&state);
        // Swallowed by the history right after a restore.
        self.save_history();
        true
    }

    /// Re-apply an undone state. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(state) = self.history.redo().cloned() else {
            return false;
        };
        self.load_state(&state);
        self.save_history();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Render the canvas at an arbitrary pixel size. This is the render
    /// function handed to batch export.
    pub fn render_to_size(&self, request: &RasterRequest) -> Result<String> {
        self.surface.export_raster(request)
    }

    /// Export the canvas at its own size times the multiplier, as a data URL.
    pub fn export_image(&self, options: &ImageExportOptions) -> Result<String> {
        let options = options.validated();
        self.render_to_size(&RasterRequest {
            width: self.surface.width() * options.multiplier,
            height: self.surface.height() * options.multiplier,
            format: options.format,
            quality: options.quality,
            transparent_background: options.transparent_background,
        })
    }

    /// Tear down the surface.
    pub fn dispose(&mut self) {
        self.surface.dispose();
        self.layers.clear();
        self.selected = None;
    }
}
