use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use shape_cache::EntryState;

fn issues(schema: &Schema, value: &Value) -> Vec<String> {
    match schema.safe_parse(value) {
        Ok(()) => Vec::new(),
        Err(issues) => issues.as_slice().iter().map(ToString::to_string).collect(),
    }
}

fn example_patient() -> Value {
    json!({
        "resourceType": "Patient",
        "id": "example",
        "identifier": [{
            "use": "usual",
            "type": {"coding": [{"system": "http://terminology.hl7.org/CodeSystem/v2-0203", "code": "MR"}]},
            "system": "urn:oid:1.2.36.146.595.217.0.1",
            "value": "12345",
            "period": {"start": "2001-05-06"},
            "assigner": {"display": "Acme Healthcare"}
        }],
        "active": true,
        "name": [
            {"use": "official", "family": "Chalmers", "given": ["Peter", "James"]},
            {"use": "usual", "given": ["Jim"]}
        ],
        "gender": "male",
        "birthDate": "1974-12-25",
        "deceasedBoolean": false,
        "managingOrganization": {"reference": "Organization/1"},
        "extension": [{
            "url": "http://hl7.org/fhir/StructureDefinition/patient-birthPlace",
            "valueString": "Amsterdam"
        }]
    })
}

fn example_observation() -> Value {
    json!({
        "resourceType": "Observation",
        "id": "body-weight",
        "status": "final",
        "category": [{"coding": [{"code": "vital-signs"}]}],
        "code": {"coding": [{"system": "http://loinc.org", "code": "29463-7", "display": "Body Weight"}]},
        "subject": {"reference": "Patient/example"},
        "effectiveDateTime": "2016-03-28",
        "valueQuantity": {"value": 185, "unit": "lbs", "system": "http://unitsofmeasure.org", "code": "[lb_av]"}
    })
}

#[test]
fn patient_accepts_realistic_document() {
    let reg = Registry::new();
    let patient = patient(&reg).unwrap();
    assert_eq!(issues(&patient, &example_patient()), Vec::<String>::new());
}

#[test]
fn patient_reports_every_issue() {
    let reg = Registry::new();
    let patient = patient(&reg).unwrap();

    let mut doc = example_patient();
    doc["gender"] = json!("M");
    doc["name"][1]["given"] = json!("Jim");
    doc["identifier"][0]["assigner"]["reference"] = json!(7);

    assert_eq!(
        issues(&patient, &doc),
        vec![
            "identifier[0].assigner.reference: expected string, received number",
            "name[1].given: expected array, received string",
            "gender: expected one of [male, female, other, unknown], received 'M'",
        ]
    );
}

#[test]
fn observation_requires_status_and_code() {
    let reg = Registry::new();
    let observation = observation(&reg).unwrap();

    assert!(observation.accepts(&example_observation()));
    assert_eq!(
        issues(&observation, &json!({"resourceType": "Observation"})),
        vec![
            "(root): missing required field 'status'",
            "(root): missing required field 'code'",
        ]
    );
}

#[test]
fn questionnaire_items_nest() {
    let reg = Registry::new();
    let questionnaire = questionnaire(&reg).unwrap();

    let doc = json!({
        "resourceType": "Questionnaire",
        "status": "active",
        "title": "Cancer Quality Forum Questionnaire",
        "item": [{
            "linkId": "1",
            "type": "group",
            "item": [{
                "linkId": "1.1",
                "type": "group",
                "item": [{
                    "linkId": "1.1.1",
                    "type": "choice",
                    "text": "Sidedness",
                    "answerOption": [
                        {"valueCoding": {"code": "left"}},
                        {"valueCoding": {"code": "right"}}
                    ],
                    "item": [{"linkId": "1.1.1.1", "type": "display", "text": "Select one"}]
                }]
            }]
        }]
    });
    assert_eq!(issues(&questionnaire, &doc), Vec::<String>::new());

    let mut broken = doc.clone();
    broken["item"][0]["item"][0]["item"][0]["item"][0]["type"] = json!("slider");
    assert_eq!(
        issues(&questionnaire, &broken),
        vec![
            "item[0].item[0].item[0].item[0].type: expected one of [group, display, boolean, decimal, integer, date, dateTime, time, string, text, url, choice, open-choice, attachment, reference, quantity], received 'slider'"
        ]
    );
}

#[test]
fn resource_dispatches_on_resource_type() {
    let reg = Registry::new();
    let resource = resource(&reg).unwrap();

    assert!(resource.accepts(&example_patient()));
    assert!(resource.accepts(&example_observation()));
    assert_eq!(
        issues(&resource, &json!({"resourceType": "Encounter"})),
        vec!["resourceType: unrecognized resourceType 'Encounter'"]
    );
    assert_eq!(
        issues(&resource, &json!({"id": "x"})),
        vec!["(root): missing required field 'resourceType'"]
    );
}

#[test]
fn resource_and_any_bundle_form_one_cluster() {
    let reg = Registry::new();
    let resource = resource(&reg).unwrap();

    for shape in ["Resource", "Patient", "Observation", "Questionnaire"] {
        assert_eq!(reg.state(shape, &[]), EntryState::Ready, "{shape}");
    }

    let nested = json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": [{
            "resource": {
                "resourceType": "Bundle",
                "type": "collection",
                "entry": [{"resource": example_patient()}]
            }
        }]
    });
    assert!(resource.accepts(&nested));
}

proptest! {
    #[test]
    fn questionnaire_items_validate_at_any_depth(depth in 1usize..200) {
        let reg = Registry::new();
        let item = questionnaire_item(&reg).unwrap();

        let mut value = json!({"linkId": "leaf", "type": "string"});
        for level in 0..depth {
            value = json!({"linkId": level.to_string(), "type": "group", "item": [value]});
        }
        prop_assert!(item.accepts(&value));
    }
}
