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

use std::collections::HashSet;

use crate::core::{ControllerOutputTable, ControllerResultType, KeyCodeTable};

// ============================================================================
// KeyCodeTable Tests
// ============================================================================

#[test]
fn test_key_table_is_injective() {
    let keys = KeyCodeTable::global();
    let mut seen = HashSet::new();

    for name in keys.names() {
        let code = keys.name_to_code(name).unwrap();
        assert!(seen.insert(code), "Code {:#x} used by more than one key", code);
    }

    assert_eq!(seen.len(), keys.len());
}

#[test]
fn test_key_lookup_both_directions() {
    let keys = KeyCodeTable::global();

    assert_eq!(keys.name_to_code("Q"), Some(0x51));
    assert_eq!(keys.name_to_code("E"), Some(0x45));
    assert_eq!(keys.name_to_code("LEFT"), Some(0x25));
    assert_eq!(keys.code_to_name(0x51), Some("Q"));
    assert_eq!(keys.code_to_name(0x27), Some("RIGHT"));

    for name in keys.names() {
        let code = keys.name_to_code(name).unwrap();
        assert_eq!(keys.code_to_name(code), Some(name));
    }
}

#[test]
fn test_key_lookup_not_found() {
    let keys = KeyCodeTable::global();

    assert_eq!(keys.name_to_code(""), None);
    assert_eq!(keys.name_to_code("q"), None, "Lookups are exact, normalize first");
    assert_eq!(keys.name_to_code("NOT A KEY"), None);
    assert_eq!(keys.code_to_name(0xFFFF), None);
}

#[test]
fn test_normalize_dom_codes() {
    let keys = KeyCodeTable::global();

    assert_eq!(keys.normalize("KeyQ"), Some("Q"));
    assert_eq!(keys.normalize("Digit1"), Some("1"));
    assert_eq!(keys.normalize("ArrowLeft"), Some("LEFT"));
    assert_eq!(keys.normalize("Numpad5"), Some("NUMPAD5"));
    assert_eq!(keys.normalize("ShiftLeft"), Some("LSHIFT"));
    assert_eq!(keys.normalize("Enter"), Some("ENTER"));
    assert_eq!(keys.normalize("F1"), Some("F1"));
}

#[test]
fn test_normalize_key_values() {
    let keys = KeyCodeTable::global();

    assert_eq!(keys.normalize("q"), Some("Q"));
    assert_eq!(keys.normalize(" "), Some("SPACE"));
    assert_eq!(keys.normalize("Escape"), Some("ESCAPE"));
    assert_eq!(keys.normalize("Esc"), Some("ESCAPE"));
}

#[test]
fn test_normalize_rejects_unknown() {
    let keys = KeyCodeTable::global();

    assert_eq!(keys.normalize(""), None);
    assert_eq!(keys.normalize("Unidentified"), None);
    assert_eq!(keys.normalize("KeyQQ"), None);
}

// ============================================================================
// ControllerOutputTable Tests
// ============================================================================

#[test]
fn test_controller_table_is_injective() {
    let controller = ControllerOutputTable::global();
    let mut seen = HashSet::new();

    for action in controller.actions() {
        let result = controller.action_to_result(action).unwrap();
        assert!(
            seen.insert((result.result_type, result.result_value)),
            "Result of '{}' is shared",
            action
        );
    }

    assert_eq!(seen.len(), controller.len());
}

#[test]
fn test_controller_lookup_both_directions() {
    let controller = ControllerOutputTable::global();

    let left = controller.action_to_result("LEFT STICK LEFT").unwrap();
    assert_eq!(left.result_type, ControllerResultType::ThumbLx);
    assert_eq!(left.result_value, -32767);

    let up = controller.action_to_result("RIGHT STICK UP").unwrap();
    assert_eq!(up.result_type.as_str(), "thumb_ry");
    assert_eq!(up.result_value, 32767);

    assert_eq!(controller.result_to_action("thumb_lx", 32767), Some("LEFT STICK RIGHT"));
    assert_eq!(controller.result_to_action("trigger_l", 255), Some("LEFT TRIGGER"));
    assert_eq!(controller.result_to_action("face_button", 0x1000), Some("A"));
}

#[test]
fn test_controller_lookup_not_found() {
    let controller = ControllerOutputTable::global();

    assert!(controller.action_to_result("left stick left").is_none());
    assert_eq!(controller.result_to_action("thumb_lx", 1), None);
    assert_eq!(controller.result_to_action("keyboard", 0x45), None);
}

#[test]
fn test_controller_tags() {
    let controller = ControllerOutputTable::global();

    for tag in ["face_button", "trigger_l", "trigger_r", "thumb_lx", "thumb_ly", "thumb_rx", "thumb_ry"] {
        assert!(controller.is_controller_tag(tag), "'{}' should be a controller tag", tag);
        assert_eq!(tag.parse::<ControllerResultType>().map(|t| t.as_str()), Ok(tag));
    }

    assert!(!controller.is_controller_tag("keyboard"));
    assert!(!controller.is_controller_tag("socd"));
}
