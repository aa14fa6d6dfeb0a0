//! JSON shape of units as printed by `primer show --format json`.

use pretty_assertions::assert_eq;
use primer_core::{Category, Determinism, ExampleUnit};
use serde_json::json;

#[test]
fn unit_serializes_every_field() {
    let unit = ExampleUnit::new("read-json", Category::Serialization, "py", "print(1)\n")
        .expect("valid unit")
        .with_fixture("sample.json")
        .expect("relative fixture")
        .with_expected_output(["1"])
        .with_origin("serialization/read_json.py");

    let value = serde_json::to_value(&unit).expect("serialize");
    assert_eq!(
        value,
        json!({
            "name": "read-json",
            "category": "serialization",
            "language": "py",
            "source": "print(1)\n",
            "expected_output": ["1"],
            "requires_fixture": ["sample.json"],
            "stdin": null,
            "determinism": { "kind": "deterministic" },
            "origin": "serialization/read_json.py",
        })
    );
}

#[test]
fn detected_determinism_carries_marker() {
    let value = serde_json::to_value(Determinism::Detected {
        marker: "import time".to_string(),
    })
    .expect("serialize");
    assert_eq!(value, json!({ "kind": "detected", "marker": "import time" }));
}
