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

use crate::core::{Bind, BindError, BindKind, BindModel, Side, MASH_TRIGGER_GROUP_SIZE};

/// Asserts that every linked pair satisfies A.output == B.input and B.output == A.input
fn assert_pairs_consistent(model: &BindModel) {
    for (a, b) in model.socd_pairs() {
        let a = model.get(a).unwrap();
        let b = model.get(b).unwrap();
        assert_eq!(a.output, b.input, "Pair #{}/#{} out of sync", a.id, b.id);
        assert_eq!(b.output, a.input, "Pair #{}/#{} out of sync", a.id, b.id);
    }
}

// ============================================================================
// SOCD Pair Tests
// ============================================================================

#[test]
fn test_add_socd_pair_links_both_members() {
    let mut model = BindModel::new();
    let (a, b) = model.groups().add_socd_pair();

    assert_eq!(a.kind, Some(BindKind::Socd));
    assert_eq!(b.kind, Some(BindKind::Socd));
    assert_eq!(model.socd_partner(a.id), Some(b.id));
    assert_eq!(model.socd_partner(b.id), Some(a.id));
    assert!(a.input.is_empty() && a.output.is_empty());
}

#[test]
fn test_set_socd_side_from_either_member() {
    let mut model = BindModel::new();
    let (a, b) = model.groups().add_socd_pair();

    model.groups().set_socd_side(a.id, Side::Input, "LEFT").unwrap();
    assert_eq!(model.get(b.id).unwrap().output, "LEFT");
    assert_pairs_consistent(&model);

    model.groups().set_socd_side(b.id, Side::Input, "RIGHT").unwrap();
    assert_eq!(model.get(a.id).unwrap().output, "RIGHT");
    assert_pairs_consistent(&model);

    // Editing an output keeps the partner's input in step
    model.groups().set_socd_side(a.id, Side::Output, "D").unwrap();
    assert_eq!(model.get(b.id).unwrap().input, "D");
    assert_eq!(model.get(a.id).unwrap().input, "LEFT");
    assert_pairs_consistent(&model);
}

#[test]
fn test_set_socd_side_wrong_kind() {
    let mut model = BindModel::new();
    let bind = model.create(Some(BindKind::Keyboard)).unwrap();

    assert_eq!(
        model.groups().set_socd_side(bind.id, Side::Input, "A"),
        Err(BindError::WrongKind {
            id: bind.id,
            expected: BindKind::Socd
        })
    );
    assert_eq!(
        model.groups().set_socd_side(99, Side::Input, "A"),
        Err(BindError::UnknownBindId(99))
    );
}

#[test]
fn test_remove_socd_member_removes_pair() {
    let mut model = BindModel::new();
    let keep = model.create(Some(BindKind::Keyboard)).unwrap();
    let (a, b) = model.groups().add_socd_pair();

    let removed = model.groups().remove_group_member(b.id).unwrap();

    let removed_ids: Vec<_> = removed.iter().map(|r| r.id).collect();
    assert_eq!(removed_ids, vec![a.id, b.id]);
    assert_eq!(model.len(), 1);
    assert_eq!(model.list()[0].id, keep.id);
    assert!(model.socd_pairs().is_empty(), "No link may outlive the pair");
}

#[test]
fn test_remove_group_member_rejects_ungrouped() {
    let mut model = BindModel::new();
    let bind = model.create(Some(BindKind::Controller)).unwrap();

    assert!(matches!(
        model.groups().remove_group_member(bind.id),
        Err(BindError::WrongKind { .. })
    ));
    assert_eq!(model.len(), 1);
}

// ============================================================================
// Mash-Trigger Group Tests
// ============================================================================

#[test]
fn test_add_mash_trigger_group() {
    let mut model = BindModel::new();
    assert!(model.groups().can_add_mash_trigger_group());

    let members = model.groups().add_mash_trigger_group().unwrap();

    assert_eq!(members.len(), MASH_TRIGGER_GROUP_SIZE);
    assert!(members.iter().all(|m| m.kind == Some(BindKind::MashTrigger)));
    assert_eq!(model.mash_trigger_members().len(), 3);
    assert!(!model.groups().can_add_mash_trigger_group());
}

#[test]
fn test_second_mash_trigger_group_rejected() {
    let mut model = BindModel::new();
    model.groups().add_mash_trigger_group().unwrap();

    assert_eq!(
        model.groups().add_mash_trigger_group().unwrap_err(),
        BindError::DuplicateMashTriggerGroup
    );
    assert_eq!(model.len(), 3, "A rejected group must not add binds");
}

#[test]
fn test_set_mash_trigger_input_sets_both_sides() {
    let mut model = BindModel::new();
    let [m, _, _] = model.groups().add_mash_trigger_group().unwrap();

    model.groups().set_mash_trigger_input(m.id, "F").unwrap();

    let bind = model.get(m.id).unwrap();
    assert_eq!(bind.input, "F");
    assert_eq!(bind.output, "F");
}

#[test]
fn test_remove_mash_trigger_member_removes_group() {
    let mut model = BindModel::new();
    model.create(Some(BindKind::Keyboard)).unwrap();
    let [_, middle, _] = model.groups().add_mash_trigger_group().unwrap();

    let removed = model.groups().remove_group_member(middle.id).unwrap();

    assert_eq!(removed.len(), 3);
    assert_eq!(model.len(), 1);
    assert!(model.groups().can_add_mash_trigger_group());
}

#[test]
fn test_validate_mash_trigger_group_counts() {
    let mut model = BindModel::new();
    assert!(model.groups().validate_mash_trigger_group().is_ok());

    model.groups().add_mash_trigger_group().unwrap();
    assert!(model.groups().validate_mash_trigger_group().is_ok());
}

// ============================================================================
// SOCD Link Inference Tests
// ============================================================================

#[test]
fn test_infer_links_after_removing_them() {
    let mut model = BindModel::new();
    let (a, b) = model.groups().add_socd_pair();
    model.groups().set_socd_side(a.id, Side::Input, "LEFT").unwrap();
    model.groups().set_socd_side(a.id, Side::Output, "RIGHT").unwrap();

    model.socd_links.clear();
    let pairs = model.groups().infer_socd_links().unwrap();

    assert_eq!(pairs, 1);
    assert_eq!(model.socd_partner(a.id), Some(b.id));
}

/// Helper: SOCD bind with both sides set and no link
fn socd(id: u32, input: &str, output: &str) -> Bind {
    Bind {
        id,
        kind: Some(BindKind::Socd),
        input: input.to_string(),
        output: output.to_string(),
    }
}

#[test]
fn test_infer_links_takes_first_match_in_list_order() {
    let mut model = BindModel::from_binds(vec![
        socd(0, "LEFT", "RIGHT"),
        socd(1, "W", "S"),
        socd(2, "RIGHT", "LEFT"),
        socd(3, "S", "W"),
    ]);

    assert_eq!(model.groups().infer_socd_links(), Ok(2));
    assert_eq!(model.socd_partner(0), Some(2));
    assert_eq!(model.socd_partner(1), Some(3));
    assert_pairs_consistent(&model);
}

#[test]
fn test_infer_links_reports_orphan() {
    let mut model = BindModel::from_binds(vec![
        socd(0, "LEFT", "RIGHT"),
        socd(1, "RIGHT", "LEFT"),
        socd(2, "RIGHT", "LEFT"),
    ]);

    assert_eq!(
        model.groups().infer_socd_links(),
        Err(BindError::UnresolvedSocdLink {
            id: 2,
            input: "RIGHT".to_string(),
            output: "LEFT".to_string(),
        })
    );
}

#[test]
fn test_infer_links_accepts_asymmetric_pair() {
    // 25 → 27 and 27 → 26: B.input matches A.output, B.output does not match A.input
    let mut model = BindModel::from_binds(vec![socd(0, "LEFT", "RIGHT"), socd(1, "RIGHT", "UP")]);

    assert_eq!(model.groups().infer_socd_links(), Ok(1));
    assert_eq!(model.socd_partner(0), Some(1));

    // An edit through the pair makes it consistent again
    model.groups().set_socd_side(0, Side::Input, "LEFT").unwrap();
    assert_eq!(model.get(1).unwrap().output, "LEFT");
    assert_pairs_consistent(&model);
}
