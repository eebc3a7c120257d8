use std::sync::{Arc, OnceLock};

use super::*;
use crate::{Deferred, Field};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use shape_ir::{CacheKey, ShapeName};

/// Hand-tied forward reference: filled in after the outer validator exists.
#[derive(Debug)]
struct Slot {
    key: CacheKey,
    target: OnceLock<Schema>,
}

impl Slot {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            key: CacheKey::bare(ShapeName::from_raw(0)),
            target: OnceLock::new(),
        })
    }
}

impl Deferred for Slot {
    fn key(&self) -> &CacheKey {
        &self.key
    }

    fn shape(&self) -> &str {
        "Node"
    }

    fn resolve(&self) -> Result<Schema, ProtocolViolation> {
        self.target
            .get()
            .cloned()
            .ok_or_else(|| ProtocolViolation::Pending {
                shape: "Node".into(),
            })
    }
}

/// `Node = array(Node)`, tied by hand.
fn node() -> Schema {
    let slot = Slot::new();
    let node = Schema::array(Schema::deferred(slot.clone()));
    slot.target.set(node.clone()).expect("slot filled once");
    node
}

fn codes(schema: &Schema, value: &serde_json::Value) -> Vec<String> {
    schema
        .validate(value)
        .expect("no protocol violation")
        .issues()
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn leaves() {
    assert!(Schema::any().accepts(&json!({"x": [1]})));
    assert!(Schema::null().accepts(&json!(null)));
    assert!(Schema::boolean().accepts(&json!(true)));
    assert!(!Schema::boolean().accepts(&json!("true")));
    assert!(Schema::number().accepts(&json!(1.5)));
    assert!(Schema::integer().accepts(&json!(3)));
    assert!(Schema::integer().accepts(&json!(3.0)));
    assert!(!Schema::integer().accepts(&json!(3.5)));
    assert!(Schema::string().accepts(&json!("final")));
    assert!(!Schema::string().accepts(&json!(7)));
}

#[test]
fn literal_and_enum() {
    let literal = Schema::literal("Patient");
    assert!(literal.accepts(&json!("Patient")));
    assert_eq!(
        codes(&literal, &json!("Person")),
        vec![r#"(root): expected literal "Patient""#]
    );

    let status = Schema::enumeration(["registered", "preliminary", "final"]);
    assert!(status.accepts(&json!("final")));
    assert_eq!(
        codes(&status, &json!("done")),
        vec!["(root): expected one of [registered, preliminary, final], received 'done'"]
    );
    assert_eq!(
        codes(&status, &json!(1)),
        vec!["(root): expected string, received number"]
    );
}

#[test]
fn optional_accepts_null() {
    let maybe = Schema::optional(Schema::string());
    assert!(maybe.accepts(&json!(null)));
    assert!(maybe.accepts(&json!("x")));
    assert!(!maybe.accepts(&json!(false)));
}

#[test]
fn object_reports_every_issue_with_paths() {
    let coding = Schema::object([
        Field::required("code", Schema::string()),
        Field::optional("display", Schema::string()),
    ]);
    let concept = Schema::object([
        Field::optional("coding", Schema::array(coding)),
        Field::optional("text", Schema::string()),
    ]);

    let value = json!({
        "coding": [{"code": "8867-4"}, {"display": 4}],
        "text": 12
    });
    assert_eq!(
        codes(&concept, &value),
        vec![
            "coding[1]: missing required field 'code'",
            "coding[1].display: expected string, received number",
            "text: expected string, received number",
        ]
    );
}

#[test]
fn strict_object_rejects_unknown_keys() {
    let period = Schema::strict_object([
        Field::optional("start", Schema::string()),
        Field::optional("end", Schema::string()),
    ]);
    assert!(period.accepts(&json!({"start": "2020"})));
    assert_eq!(
        codes(&period, &json!({"start": "2020", "duration": 3})),
        vec!["(root): unknown field 'duration'"]
    );

    let lenient = Schema::object([Field::optional("start", Schema::string())]);
    assert!(lenient.accepts(&json!({"start": "2020", "duration": 3})));
}

#[test]
fn union_accepts_any_alternative() {
    let value_x = Schema::union([Schema::string(), Schema::boolean()]);
    assert!(value_x.accepts(&json!("yes")));
    assert!(value_x.accepts(&json!(true)));
    assert_eq!(
        codes(&value_x, &json!(3)),
        vec!["(root): value matched none of 2 alternatives"]
    );
}

#[test]
fn tagged_dispatches_on_tag() {
    let patient = Schema::object([
        Field::required("resourceType", Schema::literal("Patient")),
        Field::optional("active", Schema::boolean()),
    ]);
    let resource = Schema::tagged("resourceType", [("Patient", patient)]);

    assert!(resource.accepts(&json!({"resourceType": "Patient", "active": true})));
    assert_eq!(
        codes(&resource, &json!({"resourceType": "Patient", "active": "yes"})),
        vec!["active: expected boolean, received string"]
    );
    assert_eq!(
        codes(&resource, &json!({"resourceType": "Spaceship"})),
        vec!["resourceType: unrecognized resourceType 'Spaceship'"]
    );
    assert_eq!(
        codes(&resource, &json!({"active": true})),
        vec!["(root): missing required field 'resourceType'"]
    );
}

#[test]
fn deferred_self_reference_validates_nesting() {
    let node = node();
    assert!(node.accepts(&json!([])));
    assert!(node.accepts(&json!([[]])));
    assert!(node.accepts(&json!([[[]]])));
    assert!(node.accepts(&json!([[], [[], [[]]]])));
    assert!(!node.accepts(&json!(5)));
    assert_eq!(
        codes(&node, &json!([[[1]]])),
        vec!["[0][0][0]: expected array, received number"]
    );
}

#[test]
fn unresolved_cell_is_a_protocol_violation() {
    let slot = Slot::new();
    let list = Schema::array(Schema::deferred(slot));

    // Nothing to resolve on an empty array.
    assert!(list.validate(&json!([])).is_ok());

    let err = list.validate(&json!([[]])).unwrap_err();
    assert_eq!(
        err,
        ProtocolViolation::Pending {
            shape: "Node".into()
        }
    );
}

#[test]
fn self_reference_without_descent_is_a_protocol_violation() {
    // `Node = optional(string | Node)`
    let slot = Slot::new();
    let looped = Schema::optional(Schema::union([Schema::deferred(slot.clone()), Schema::string()]));
    slot.target.set(looped.clone()).unwrap();

    assert!(looped.validate(&json!(null)).unwrap().is_valid());
    assert_eq!(
        looped.validate(&json!("x")).unwrap_err(),
        ProtocolViolation::Unproductive {
            shape: "Node".into()
        }
    );
}

#[test]
fn self_reference_through_union_and_array_still_descends() {
    // `Node = string | array(Node)`
    let slot = Slot::new();
    let tree = Schema::union([Schema::string(), Schema::array(Schema::deferred(slot.clone()))]);
    slot.target.set(tree.clone()).unwrap();

    assert!(tree.accepts(&json!(["a", ["b", []]])));
    assert!(!tree.accepts(&json!(["a", [1]])));
}

#[test]
#[should_panic(expected = "validator construction protocol violated")]
fn safe_parse_fails_loudly_on_protocol_violation() {
    let list = Schema::array(Schema::deferred(Slot::new()));
    let _ = list.safe_parse(&json!([[]]));
}

#[test]
fn depth_limit_is_an_ordinary_issue() {
    let node = node();
    let options = ValidateOptions { max_depth: 2 };

    assert!(node.validate_with(&json!([[]]), options).unwrap().is_valid());
    let report = node.validate_with(&json!([[[]]]), options).unwrap();
    assert_eq!(
        report.issues()[0].to_string(),
        "[0][0]: nesting exceeds depth limit of 2"
    );
}

#[test]
fn very_deep_documents_do_not_overflow() {
    let node = node();
    let mut value = json!([]);
    for _ in 0..5_000 {
        value = serde_json::Value::Array(vec![value]);
    }
    let options = ValidateOptions { max_depth: 10_000 };
    assert!(node.validate_with(&value, options).unwrap().is_valid());
    // serde_json drops deep values recursively; keep the drop off this stack.
    std::mem::forget(value);
}

proptest! {
    #[test]
    fn node_accepts_any_nesting_of_empty_arrays(depth in 0usize..64, width in 1usize..4) {
        let mut chain = json!([]);
        for _ in 0..depth {
            chain = json!([chain]);
        }
        let value = serde_json::Value::Array(vec![chain; width]);
        prop_assert!(node().accepts(&value));
    }
}
