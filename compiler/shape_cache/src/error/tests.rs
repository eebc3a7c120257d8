use super::*;
use pretty_assertions::assert_eq;

#[test]
fn msg_is_named_by_first_enclosing_shape() {
    let err = BuildError::msg("choice type has no alternatives").within("Observation".into());
    assert_eq!(
        err.to_string(),
        "failed to construct `Observation`: choice type has no alternatives"
    );
}

#[test]
fn outer_shapes_nest() {
    let err = BuildError::msg("boom")
        .within("Identifier".into())
        .within("Reference".into())
        .within("Patient".into());

    assert_eq!(err.to_string(), "while constructing `Patient`");
    assert_eq!(err.trace(), vec!["Patient", "Reference", "Identifier"]);
    assert!(matches!(
        err.root_cause(),
        BuildError::Construction { shape, .. } if shape == "Identifier"
    ));
}

#[test]
fn sealed_errors_nest_too() {
    let err = BuildError::Sealed {
        shape: "Bundle".into(),
    }
    .within("Questionnaire".into());
    assert_eq!(err.trace(), vec!["Questionnaire", "Bundle"]);
}

#[test]
fn source_chain_is_walkable() {
    use std::error::Error as _;

    let err = BuildError::msg("boom").within("A".into()).within("B".into());
    let source = err.source().expect("nested error has a source");
    assert_eq!(source.to_string(), "failed to construct `A`: boom");
}
