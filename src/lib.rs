//! Canvas Forge - Text Overlay Canvas Editor Core
//!
//! Canvas Forge manages the editable state behind a text-overlay image editor
//! and exports the result for many social platforms at once.
//!
//! # Architecture
//!
//! - `layers`: serializable text layers and canvas snapshots
//! - `surface`: the render surface contract and layer <-> object sync
//! - `editor`: layer store + surface adapter with undo/redo
//! - `history`: bounded snapshot history
//! - `export`: platform presets, export options and ZIP batch export
//! - `storage`: durable key/value storage of canvases

pub mod cli;
pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod history;
pub mod layers;
pub mod storage;
pub mod surface;

pub use config::EditorConfig;
pub use editor::{EditorObserver, LayerMove, TextEditor};
pub use error::{CanvasError, Result};
pub use history::{HistoryManager, MAX_HISTORY_LENGTH};
pub use layers::{CanvasState, TextLayer, TextLayerUpdate};
pub use storage::CanvasStore;
pub use surface::{MemorySurface, RenderSurface};
