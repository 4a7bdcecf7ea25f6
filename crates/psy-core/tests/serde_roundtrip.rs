use std::collections::BTreeMap;

use psy_core::provenance::{SchemaVersion, SessionProvenance};
use psy_core::{
    stable_hash_string, to_canonical_json_bytes, Condition, Dimension, ParameterGrid, Position,
    TrialResponse,
};

fn grid() -> ParameterGrid {
    let mut values = BTreeMap::new();
    values.insert(Dimension::Room, vec![40.0, 48.0, 56.0]);
    values.insert(Dimension::Voice, vec![0.98, 1.029, 1.078]);
    values.insert(Dimension::Itd, vec![0.0, 40.0]);
    ParameterGrid::new(values).expect("grid")
}

#[test]
fn provenance_round_trip_json() {
    let provenance = SessionProvenance {
        schema_version: SchemaVersion::new(1, 0, 0),
        subject: "s01".into(),
        seed: 99,
        config_hash: "abc".into(),
        created_at: "2024-03-01T10:00:00Z".into(),
        tool_versions: [("psy-core".into(), "0.1.0".into())].into_iter().collect(),
    };
    let json = serde_json::to_string_pretty(&provenance).expect("serialize");
    let decoded: SessionProvenance = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, provenance);
}

#[test]
fn reference_condition_uses_first_values() {
    let reference = grid().reference_condition().expect("reference");
    assert_eq!(reference.room, 40.0);
    assert_eq!(reference.voice, 0.98);
    assert_eq!(reference.itd, 0.0);
    assert_eq!(reference.label, "default");

    let room = reference.with_value(Dimension::Room, 56.0, "room");
    assert_eq!(room.value(Dimension::Room), 56.0);
    assert_eq!(room.value(Dimension::Voice), 0.98);
    assert_ne!(room, reference);
}

#[test]
fn grid_rejects_missing_dimension() {
    let mut values = BTreeMap::new();
    values.insert(Dimension::Room, vec![40.0]);
    values.insert(Dimension::Voice, vec![]);
    let err = ParameterGrid::new(values).unwrap_err();
    assert_eq!(err.info().code, "grid-missing-dimension");
}

#[test]
fn dimension_parses_from_tag_name() {
    assert_eq!("itd".parse::<Dimension>().unwrap(), Dimension::Itd);
    assert!("pitch".parse::<Dimension>().is_err());
}

#[test]
fn condition_keeps_float_precision() {
    let condition = Condition {
        voice: 1.029,
        room: 40.0,
        itd: 0.1 + 0.2,
        label: "voice".into(),
    };
    let json = serde_json::to_string(&condition).expect("serialize");
    let decoded: Condition = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, condition);
}

#[test]
fn trial_response_scores_target_choice() {
    let hit = TrialResponse::score(Position::Second, Position::Second);
    assert!(hit.target_chosen);
    let miss = TrialResponse::score(Position::First, Position::Second);
    assert!(!miss.target_chosen);
    assert_eq!(Position::from_key(" 1\n"), Some(Position::First));
    assert_eq!(Position::from_key("3"), None);
}

#[test]
fn canonical_hash_ignores_key_order() {
    let a = serde_json::json!({"b": 1, "a": [1, 2]});
    let b = serde_json::json!({"a": [1, 2], "b": 1});
    assert_eq!(
        to_canonical_json_bytes(&a).unwrap(),
        to_canonical_json_bytes(&b).unwrap()
    );
    assert_eq!(stable_hash_string(&a).unwrap(), stable_hash_string(&b).unwrap());
}
