//! Editor Tests
//!
//! Layer store, surface sync, ordering, selection and undo/redo through the
//! public `TextEditor` API.

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;

use canvas_forge::editor::RecordingObserver;
use canvas_forge::export::data_url::data_url_to_bytes;
use canvas_forge::export::ImageExportOptions;
use canvas_forge::layers::{parse_canvas_state, serialize_canvas_state, Shadow};
use canvas_forge::{
    CanvasState, EditorConfig, MemorySurface, RenderSurface, TextEditor, TextLayerUpdate,
    MAX_HISTORY_LENGTH,
};

fn editor() -> TextEditor<MemorySurface> {
    TextEditor::new(
        MemorySurface::new(1080, 1080, "#ffffff"),
        EditorConfig::default(),
    )
}

fn ids(editor: &TextEditor<MemorySurface>) -> Vec<String> {
    editor.layers().iter().map(|l| l.id.clone()).collect()
}

// === Add / Remove / Duplicate ===

#[test]
fn test_add_layer_defaults() {
    let mut editor = editor();
    let layer = editor.add_text_layer(None);

    assert_eq!(layer.name, "텍스트 1");
    assert_eq!(layer.text, "텍스트를 입력하세요");
    assert_relative_eq!(layer.left, 540.0);
    assert_relative_eq!(layer.top, 540.0);
    assert_eq!(editor.selected_layer().map(|l| l.id.clone()), Some(layer.id.clone()));
    assert_eq!(editor.surface().active_object(), Some(layer.id.as_str()));
    assert!(editor.surface().object(&layer.id).is_some());
    assert!(editor.can_undo());

    let second = editor.add_text_layer(Some("두 번째"));
    assert_eq!(second.name, "텍스트 2");
    assert_eq!(second.text, "두 번째");
}

#[test]
fn test_remove_selected_layer_clears_selection() {
    let mut editor = editor();
    let layer = editor.add_text_layer(None);
    editor.remove_layer(&layer.id);

    assert!(editor.layers().is_empty());
    assert!(editor.selected_layer().is_none());
    assert!(editor.surface().object_ids().is_empty());
}

#[test]
fn test_remove_unknown_is_noop() {
    let mut editor = editor();
    editor.add_text_layer(None);
    let past = editor.history().past_len();
    editor.remove_layer("missing");
    assert_eq!(editor.layers().len(), 1);
    assert_eq!(editor.history().past_len(), past);
}

#[test]
fn test_duplicate_layer() {
    let mut editor = editor();
    let original = editor.add_text_layer(Some("원본"));
    let copy = editor.duplicate_layer(&original.id).unwrap();

    assert_ne!(copy.id, original.id);
    assert_eq!(copy.name, "텍스트 1 복사본");
    assert_relative_eq!(copy.left, original.left + 20.0);
    assert_relative_eq!(copy.top, original.top + 20.0);
    assert_eq!(editor.selected_layer().unwrap().id, copy.id);
    assert_eq!(editor.surface().object_ids().len(), 2);

    assert!(editor.duplicate_layer("missing").is_none());
}

// === Update / Sync ===

#[test]
fn test_update_layer_syncs_surface() {
    let mut editor = editor();
    let layer = editor.add_text_layer(None);

    editor.update_layer(
        &layer.id,
        &TextLayerUpdate {
            fill: Some("#ff0000".to_string()),
            opacity: Some(0.5),
            shadow: Some(Some(Shadow::default())),
            ..Default::default()
        },
    );

    let stored = editor.layer(&layer.id).unwrap();
    let object = editor.surface().object(&layer.id).unwrap();
    assert_eq!(stored.fill, "#ff0000");
    assert_eq!(object.fill, "#ff0000");
    assert_relative_eq!(object.opacity, 0.5);
    assert!(object.shadow.is_some());
    assert_eq!(object.text, layer.text);
}

#[test]
fn test_lock_deactivates_and_blocks_selection() {
    let mut editor = editor();
    let layer = editor.add_text_layer(None);
    assert_eq!(editor.surface().active_object(), Some(layer.id.as_str()));

    editor.toggle_lock(&layer.id);
    assert!(editor.layer(&layer.id).unwrap().locked);
    assert!(!editor.surface().object(&layer.id).unwrap().selectable);
    assert!(editor.surface().active_object().is_none());

    editor.select_layer(Some(&layer.id));
    assert!(editor.surface().active_object().is_none());
    assert_eq!(editor.selected_layer().unwrap().id, layer.id);
}

#[test]
fn test_interactive_edit_reads_back() {
    let mut editor = editor();
    let layer = editor.add_text_layer(None);
    let past = editor.history().past_len();

    {
        let object = editor.surface_mut().object_mut(&layer.id).unwrap();
        object.left = 100.0;
        object.angle = 30.0;
        object.scale_x = 1.5;
    }
    editor.handle_object_modified(&layer.id);

    let stored = editor.layer(&layer.id).unwrap();
    assert_relative_eq!(stored.left, 100.0);
    assert_relative_eq!(stored.angle, 30.0);
    assert_relative_eq!(stored.scale_x, 1.5);
    assert_eq!(editor.history().past_len(), past + 1);

    editor.surface_mut().object_mut(&layer.id).unwrap().text = "typed".to_string();
    editor.handle_text_changed(&layer.id);
    assert_eq!(editor.layer(&layer.id).unwrap().text, "typed");
    assert_eq!(editor.history().past_len(), past + 1);
}

#[test]
fn test_observers_notified() {
    let mut editor = editor();
    let observer = RecordingObserver::default();
    editor.add_observer(Box::new(observer.clone()));

    let layer = editor.add_text_layer(None);
    editor.select_layer(None);
    editor.select_layer(Some("missing"));

    assert_eq!(observer.layer_updates.borrow().last().unwrap().len(), 1);
    assert_eq!(
        *observer.selections.borrow(),
        vec![Some(layer.id.clone()), None, None]
    );
}

// === Ordering ===

#[test]
fn test_ordering() {
    let mut editor = editor();
    let a = editor.add_text_layer(Some("a")).id;
    let b = editor.add_text_layer(Some("b")).id;
    let c = editor.add_text_layer(Some("c")).id;

    assert!(!editor.move_layer_up(&c));
    assert!(!editor.move_layer_down(&a));
    assert!(!editor.bring_to_front(&c));
    assert!(!editor.send_to_back(&a));

    assert!(editor.move_layer_up(&a));
    assert_eq!(ids(&editor), vec![b.clone(), a.clone(), c.clone()]);

    assert!(editor.bring_to_front(&b));
    assert_eq!(ids(&editor), vec![a.clone(), c.clone(), b.clone()]);

    assert!(editor.send_to_back(&b));
    assert_eq!(ids(&editor), vec![b.clone(), a.clone(), c.clone()]);

    assert!(editor.move_layer_down(&c));
    assert_eq!(ids(&editor), vec![b.clone(), c.clone(), a.clone()]);
    assert_eq!(editor.surface().object_ids(), ids(&editor));

    assert!(!editor.move_layer_up("missing"));
}

// === Undo / Redo ===

#[test]
fn test_undo_redo_restores_layers() {
    let mut editor = editor();
    let first = editor.add_text_layer(Some("one"));
    editor.add_text_layer(Some("two"));
    assert_eq!(editor.layers().len(), 2);

    assert!(editor.undo());
    assert_eq!(ids(&editor), vec![first.id.clone()]);
    assert_eq!(editor.surface().object_ids(), vec![first.id.clone()]);
    assert!(editor.can_redo());

    assert!(editor.redo());
    assert_eq!(editor.layers().len(), 2);
    assert!(!editor.can_redo());
}

#[test]
fn test_edit_after_undo_is_recorded() {
    let mut editor = editor();
    editor.add_text_layer(Some("one"));
    editor.add_text_layer(Some("two"));

    assert!(editor.undo());
    let past = editor.history().past_len();
    editor.add_text_layer(Some("three"));

    assert_eq!(editor.history().past_len(), past + 1);
    assert!(!editor.can_redo());
    assert_eq!(editor.history().present().unwrap().layers.len(), 2);
}

#[test]
fn test_undo_on_fresh_editor() {
    let mut editor = editor();
    assert!(!editor.undo());
    assert!(!editor.redo());
    assert!(editor.history().present().is_some());
}

#[test]
fn test_history_is_bounded() {
    let mut editor = editor();
    for i in 0..(MAX_HISTORY_LENGTH + 10) {
        editor.set_background_color(&format!("#{:06x}", i));
    }
    assert_eq!(editor.history().past_len(), MAX_HISTORY_LENGTH);
}

// === Load / Snapshot ===

#[test]
fn test_snapshot_round_trip_through_json() {
    let mut editor = editor();
    let layer = editor.add_text_layer(Some("저장"));
    editor.update_layer(
        &layer.id,
        &TextLayerUpdate {
            locked: Some(true),
            visible: Some(false),
            shadow: Some(Some(Shadow::default())),
            ..Default::default()
        },
    );

    let state = editor.canvas_state().unwrap();
    assert_eq!(state.layers.len(), state.objects.len());
    let parsed = parse_canvas_state(&serialize_canvas_state(&state).unwrap()).unwrap();
    assert_eq!(parsed, state);

    let mut other = TextEditor::with_state(
        MemorySurface::new(1080, 1080, "#000000"),
        EditorConfig::default(),
        &parsed,
    );
    let restored = other.layer(&layer.id).unwrap().clone();
    assert!(restored.locked);
    assert!(!restored.visible);
    assert!(restored.shadow.is_some());

    let object = other.surface().object(&layer.id).unwrap();
    assert!(!object.selectable);
    assert!(!object.visible);
    assert_eq!(other.surface().background_color(), "#ffffff");
    assert!(!other.can_undo());

    other.dispose();
    assert!(other.layers().is_empty());
}

#[test]
fn test_load_takes_snapshot_size() {
    let story = CanvasState::new(1080, 1920, "#101010");
    let mut editor = TextEditor::with_state(
        MemorySurface::new(400, 400, "#ffffff"),
        EditorConfig::default(),
        &story,
    );

    let snapshot = editor.canvas_state().unwrap();
    assert_eq!((snapshot.width, snapshot.height), (1080, 1920));

    let layer = editor.add_text_layer(None);
    assert_relative_eq!(layer.left, 540.0);
    assert_relative_eq!(layer.top, 960.0);

    editor.load_state(&CanvasState::new(300, 200, "#ffffff"));
    assert_eq!((editor.surface().width(), editor.surface().height()), (300, 200));
    assert!(editor.undo());
    assert_eq!(editor.canvas_state().unwrap().height, 1920);
}

// === Rendering ===

#[test]
fn test_render_reflects_layers() {
    let mut editor = TextEditor::new(
        MemorySurface::new(200, 100, "#ffffff"),
        EditorConfig::default(),
    );
    let options = ImageExportOptions::default();
    let empty = editor.export_image(&options).unwrap();

    let layer = editor.add_text_layer(Some("SALE"));
    editor.update_layer(
        &layer.id,
        &TextLayerUpdate {
            background_color: Some("#ff0000".to_string()),
            font_size: Some(24.0),
            ..Default::default()
        },
    );
    let with_layer = editor.export_image(&options).unwrap();
    assert_ne!(with_layer, empty);

    let raster = image::load_from_memory(&data_url_to_bytes(&with_layer).unwrap())
        .unwrap()
        .to_rgba8();
    let center = raster.get_pixel(100, 50);
    assert!(center[0] > 250 && center[1] < 5);

    editor.toggle_visibility(&layer.id);
    assert_eq!(editor.export_image(&options).unwrap(), empty);
}
