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

use crate::core::{Bind, BindError, BindKind, BindModel, BindUpdate};

/// Helper: model with one keyboard bind Q → E
fn model_with_keyboard_bind() -> (BindModel, Bind) {
    let mut model = BindModel::new();
    let bind = model.create(Some(BindKind::Keyboard)).unwrap();
    model.update(bind.id, BindUpdate::Input("Q".to_string())).unwrap();
    model.update(bind.id, BindUpdate::Output("E".to_string())).unwrap();
    (model, bind)
}

#[test]
fn test_create_allocates_sequential_ids() {
    let mut model = BindModel::new();

    let first = model.create(None).unwrap();
    let second = model.create(Some(BindKind::Controller)).unwrap();

    assert_eq!(first.id, 0, "First id in an empty model is 0");
    assert_eq!(second.id, 1);
    assert_eq!(first.kind, None);
    assert_eq!(second.kind, Some(BindKind::Controller));
    assert!(second.input.is_empty() && second.output.is_empty());
}

#[test]
fn test_create_uses_max_id_not_count() {
    let mut model = BindModel::new();
    for _ in 0..3 {
        model.create(Some(BindKind::Keyboard)).unwrap();
    }
    model.remove(0).unwrap();
    model.remove(1).unwrap();

    let bind = model.create(None).unwrap();
    assert_eq!(bind.id, 3, "Ids are never reused while a larger id exists");
}

#[test]
fn test_create_rejects_grouped_kinds() {
    let mut model = BindModel::new();

    assert_eq!(
        model.create(Some(BindKind::Socd)),
        Err(BindError::GroupKindRequiresGroup(BindKind::Socd))
    );
    assert_eq!(
        model.create(Some(BindKind::MashTrigger)),
        Err(BindError::GroupKindRequiresGroup(BindKind::MashTrigger))
    );
    assert!(model.is_empty());
}

#[test]
fn test_update_replaces_one_field() {
    let (mut model, bind) = model_with_keyboard_bind();

    model.update(bind.id, BindUpdate::Input("LEFT".to_string())).unwrap();

    let updated = model.get(bind.id).unwrap();
    assert_eq!(updated.input, "LEFT");
    assert_eq!(updated.output, "E", "Output must be untouched");
    assert_eq!(updated.kind, Some(BindKind::Keyboard));
}

#[test]
fn test_update_kind_clears_output() {
    let (mut model, bind) = model_with_keyboard_bind();

    model.update(bind.id, BindUpdate::Kind(BindKind::Controller)).unwrap();

    let updated = model.get(bind.id).unwrap();
    assert_eq!(updated.kind, Some(BindKind::Controller));
    assert_eq!(updated.input, "Q");
    assert!(updated.output.is_empty());

    // Same kind again is a no-op
    model.update(bind.id, BindUpdate::Output("A".to_string())).unwrap();
    model.update(bind.id, BindUpdate::Kind(BindKind::Controller)).unwrap();
    assert_eq!(model.get(bind.id).unwrap().output, "A");
}

#[test]
fn test_update_unknown_id() {
    let (mut model, _) = model_with_keyboard_bind();

    assert_eq!(
        model.update(42, BindUpdate::Input("Q".to_string())),
        Err(BindError::UnknownBindId(42))
    );
}

#[test]
fn test_update_rejects_grouped_binds() {
    let mut model = BindModel::new();
    let (a, _) = model.groups().add_socd_pair();
    let [m, _, _] = model.groups().add_mash_trigger_group().unwrap();

    assert_eq!(
        model.update(a.id, BindUpdate::Input("Q".to_string())),
        Err(BindError::GroupedBind(a.id))
    );
    assert_eq!(
        model.update(m.id, BindUpdate::Output("Q".to_string())),
        Err(BindError::GroupedBind(m.id))
    );
}

#[test]
fn test_update_rejects_switch_to_grouped_kind() {
    let (mut model, bind) = model_with_keyboard_bind();

    assert_eq!(
        model.update(bind.id, BindUpdate::Kind(BindKind::Socd)),
        Err(BindError::GroupKindRequiresGroup(BindKind::Socd))
    );
    assert_eq!(model.get(bind.id).unwrap().kind, Some(BindKind::Keyboard));
}

#[test]
fn test_remove_ungrouped_bind() {
    let (mut model, bind) = model_with_keyboard_bind();

    let removed = model.remove(bind.id).unwrap();
    assert_eq!(removed.input, "Q");
    assert!(model.is_empty());
    assert_eq!(model.remove(bind.id), Err(BindError::UnknownBindId(bind.id)));
}

#[test]
fn test_remove_rejects_grouped_binds() {
    let mut model = BindModel::new();
    let (a, b) = model.groups().add_socd_pair();

    assert_eq!(model.remove(a.id), Err(BindError::GroupedBind(a.id)));
    assert_eq!(model.len(), 2, "Nothing may be removed");
    assert_eq!(model.socd_partner(a.id), Some(b.id));
}

#[test]
fn test_list_preserves_creation_order() {
    let mut model = BindModel::new();
    model.create(Some(BindKind::Keyboard)).unwrap();
    model.groups().add_socd_pair();
    model.create(Some(BindKind::Controller)).unwrap();

    let kinds: Vec<_> = model.list().iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Some(BindKind::Keyboard),
            Some(BindKind::Socd),
            Some(BindKind::Socd),
            Some(BindKind::Controller),
        ]
    );

    let ids: Vec<_> = model.list().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
}

#[test]
fn test_socd_pairs_reported_once() {
    let mut model = BindModel::new();
    let (a, b) = model.groups().add_socd_pair();
    let (c, d) = model.groups().add_socd_pair();

    assert_eq!(model.socd_pairs(), vec![(a.id, b.id), (c.id, d.id)]);
}
