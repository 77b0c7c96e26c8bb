//! Editor change notifications

use std::cell::RefCell;
use std::rc::Rc;

use crate::layers::TextLayer;

/// Receives layer and selection changes from a `TextEditor`.
pub trait EditorObserver {
    /// The layer list changed (content, order or membership)
    fn layers_changed(&mut self, _layers: &[TextLayer]) {}

    /// The selected layer changed; `None` means nothing is selected
    fn selection_changed(&mut self, _layer: Option<&TextLayer>) {}
}

/// Observer that records every notification into shared buffers.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub layer_updates: Rc<RefCell<Vec<Vec<TextLayer>>>>,
    pub selections: Rc<RefCell<Vec<Option<String>>>>,
}

impl EditorObserver for RecordingObserver {
    fn layers_changed(&mut self, layers: &[TextLayer]) {
        self.layer_updates.borrow_mut().push(layers.to_vec());
    }

    fn selection_changed(&mut self, layer: Option<&TextLayer>) {
        self.selections
            .borrow_mut()
            .push(layer.map(|l| l.id.clone()));
    }
}

/// Observer that traces changes at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl EditorObserver for LoggingObserver {
    fn layers_changed(&mut self, layers: &[TextLayer]) {
        tracing::debug!("Layers changed: {} layer(s)", layers.len());
    }

    fn selection_changed(&mut self, layer: Option<&TextLayer>) {
        match layer {
            Some(layer) => tracing::debug!("Selected {} ({})", layer.name, layer.id),
            None => tracing::debug!("Selection cleared"),
        }
    }
}
