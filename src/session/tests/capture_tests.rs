// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::super::*;
use crate::config::MemoryRecordStore;
use crate::core::{BindKind, BindUpdate, Side};

fn key(code: &str, key: &str) -> KeyEvent {
    KeyEvent::new(code, key)
}

fn empty_session() -> Session<MemoryRecordStore> {
    Session::new(MemoryRecordStore::default())
}

// ============================================================================
// KeyCapture Tests
// ============================================================================

#[test]
fn test_capture_starts_idle() {
    let capture = KeyCapture::new();
    assert_eq!(capture.state(), CaptureState::Idle);
    assert!(!capture.is_listening());
}

#[test]
fn test_resolve_prefers_code() {
    let keys = KeyCodeTable::global();

    // Layout-independent code wins over the produced character
    assert_eq!(KeyCapture::resolve(keys, &key("KeyQ", "a")), Some("Q"));
    // Falls back to the key when the code is unknown
    assert_eq!(KeyCapture::resolve(keys, &key("", "e")), Some("E"));
    assert_eq!(KeyCapture::resolve(keys, &key("Unidentified", "Dead")), None);
}

#[test]
fn test_capture_assigns_keyboard_sides() {
    let mut session = empty_session();
    let bind = session.create(Some(BindKind::Keyboard)).unwrap();

    session.begin_capture(bind.id, Side::Input).unwrap();
    assert_eq!(
        session.capture_state(),
        CaptureState::Listening {
            bind: bind.id,
            side: Side::Input
        }
    );
    assert_eq!(session.handle_key(&key("KeyQ", "q")).unwrap(), Some(bind.id));
    assert_eq!(session.capture_state(), CaptureState::Idle);

    session.begin_capture(bind.id, Side::Output).unwrap();
    session.handle_key(&key("ArrowLeft", "ArrowLeft")).unwrap();

    let updated = session.model().get(bind.id).unwrap();
    assert_eq!(updated.input, "Q");
    assert_eq!(updated.output, "LEFT");
}

#[test]
fn test_unknown_key_keeps_listening() {
    let mut session = empty_session();
    let bind = session.create(Some(BindKind::Keyboard)).unwrap();
    session.begin_capture(bind.id, Side::Input).unwrap();

    assert_eq!(session.handle_key(&key("Fn", "Fn")).unwrap(), None);

    assert!(matches!(session.capture_state(), CaptureState::Listening { .. }));
    assert!(session.model().get(bind.id).unwrap().input.is_empty());
}

#[test]
fn test_cancel_leaves_model_untouched() {
    let mut session = empty_session();
    let bind = session.create(Some(BindKind::Keyboard)).unwrap();
    session.update(bind.id, BindUpdate::Input("W".to_string())).unwrap();
    session.update(bind.id, BindUpdate::Output("E".to_string())).unwrap();
    session.save().unwrap();
    let before = session.model().clone();

    session.begin_capture(bind.id, Side::Input).unwrap();
    session.cancel_capture();

    assert_eq!(session.capture_state(), CaptureState::Idle);
    assert_eq!(session.model(), &before);
    assert!(!session.is_dirty());

    // Keys after cancel are ignored
    assert_eq!(session.handle_key(&key("KeyQ", "q")).unwrap(), None);
    assert_eq!(session.model(), &before);
}

#[test]
fn test_capture_on_socd_keeps_pair_consistent() {
    let mut session = empty_session();
    let (a, b) = session.add_socd_pair();

    session.begin_capture(b.id, Side::Input).unwrap();
    session.handle_key(&key("KeyD", "d")).unwrap();
    session.begin_capture(b.id, Side::Output).unwrap();
    session.handle_key(&key("KeyA", "a")).unwrap();

    let model = session.model();
    assert_eq!(model.get(a.id).unwrap().input, "A");
    assert_eq!(model.get(a.id).unwrap().output, "D");
    assert_eq!(model.get(b.id).unwrap().input, "D");
    assert_eq!(model.get(b.id).unwrap().output, "A");
}

#[test]
fn test_capture_on_mash_trigger_sets_both_sides() {
    let mut session = empty_session();
    let [m, _, _] = session.add_mash_trigger_group().unwrap();

    session.begin_capture(m.id, Side::Input).unwrap();
    session.handle_key(&key("KeyF", "f")).unwrap();

    let bind = session.model().get(m.id).unwrap();
    assert_eq!(bind.input, "F");
    assert_eq!(bind.output, "F");
}

#[test]
fn test_unbind_clears_captured_side() {
    let mut session = empty_session();
    let bind = session.create(Some(BindKind::Keyboard)).unwrap();
    session.update(bind.id, BindUpdate::Input("Q".to_string())).unwrap();
    session.update(bind.id, BindUpdate::Output("E".to_string())).unwrap();

    session.begin_capture(bind.id, Side::Output).unwrap();
    assert_eq!(session.unbind().unwrap(), Some(bind.id));

    let updated = session.model().get(bind.id).unwrap();
    assert_eq!(updated.input, "Q");
    assert!(updated.output.is_empty());
    assert_eq!(session.capture_state(), CaptureState::Idle);

    // Idle unbind is a no-op
    assert_eq!(session.unbind().unwrap(), None);
}

#[test]
fn test_begin_capture_errors() {
    let mut session = empty_session();
    let bind = session.create(Some(BindKind::Controller)).unwrap();

    assert!(matches!(
        session.begin_capture(42, Side::Input),
        Err(SessionError::Bind(BindError::UnknownBindId(42)))
    ));
    assert!(matches!(
        session.begin_capture(bind.id, Side::Output),
        Err(SessionError::Bind(BindError::WrongKind { .. }))
    ));
    assert_eq!(session.capture_state(), CaptureState::Idle);

    // The input of a controller bind is still a key
    session.begin_capture(bind.id, Side::Input).unwrap();
    session.handle_key(&key("KeyQ", "q")).unwrap();
    assert_eq!(session.model().get(bind.id).unwrap().input, "Q");
}

#[test]
fn test_removing_captured_bind_cancels_capture() {
    let mut session = empty_session();
    let (a, b) = session.add_socd_pair();

    session.begin_capture(b.id, Side::Input).unwrap();
    session.remove(a.id).unwrap();

    assert_eq!(session.capture_state(), CaptureState::Idle);
}

#[test]
fn test_capture_against_model_directly() {
    let mut model = BindModel::new();
    let bind = model.create(Some(BindKind::Keyboard)).unwrap();
    let mut capture = KeyCapture::new();

    capture.begin(&model, bind.id, Side::Input).unwrap();
    model.remove(bind.id).unwrap();

    // The bind vanished while listening
    assert_eq!(
        capture.handle_key(&mut model, KeyCodeTable::global(), &key("KeyQ", "q")),
        Err(BindError::UnknownBindId(bind.id))
    );
    assert_eq!(capture.state(), CaptureState::Idle);
}
