use super::*;
use crate::patient;
use pretty_assertions::assert_eq;
use serde_json::json;
use shape_cache::{EntryState, ParamId, RegistryConfig};

#[test]
fn catalog_is_sorted_and_unique() {
    let names: Vec<_> = shape_names().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(names, sorted);
}

#[test]
fn every_catalog_name_builds() {
    let reg = Registry::new();
    for name in shape_names() {
        build_by_name(&reg, name).unwrap();
        let params: &[ParamId] = if GENERIC.contains(&name) {
            &[ParamId::NONE]
        } else {
            &[]
        };
        assert_eq!(reg.state(name, params), EntryState::Ready, "{name}");
    }
}

#[test]
fn warm_all_builds_every_shape_and_typed_bundles() {
    let reg = Registry::with_config(RegistryConfig::service());
    let stats = reg.warm(warm_all).unwrap();

    assert!(reg.is_sealed());
    assert_eq!(stats.failures, 0);
    let mut expected: Vec<&str> = shape_names().collect();
    expected.sort_unstable();
    assert_eq!(reg.shape_names(), expected);

    // One Bundle and one BundleEntry per typed payload on top of the catalog.
    assert_eq!(stats.ready, CATALOG.len() + 2 * TYPED_BUNDLES.len());
}

#[test]
fn sealed_registry_serves_warmed_generics() {
    let reg = Registry::new();
    reg.warm(warm_all).unwrap();
    reg.seal();

    let typed = build_by_name(&reg, "Bundle<Patient>").unwrap();
    assert!(typed.accepts(&json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": [{"resource": {"resourceType": "Patient"}}]
    })));

    let err = build_by_name(&reg, "Bundle<Bundle<Patient>>").unwrap_err();
    assert!(matches!(err, CatalogError::Build(BuildError::Sealed { .. })), "{err}");
}

#[test]
fn generic_names_resolve_to_cached_entries() {
    let reg = Registry::new();
    let patient = patient(&reg).unwrap();

    let by_name = build_by_name(&reg, " Bundle<Patient> ").unwrap();
    assert!(by_name.ptr_eq(&bundle(&reg, Some(&patient)).unwrap()));
    assert!(build_by_name(&reg, "BundleEntry<Observation>").is_ok());
}

#[test]
fn build_by_name_errors() {
    let reg = Registry::new();
    assert_eq!(
        build_by_name(&reg, "Encounter").unwrap_err().to_string(),
        "unknown shape `Encounter`"
    );
    assert_eq!(
        build_by_name(&reg, "Patient<Observation>").unwrap_err().to_string(),
        "`Patient` takes no type argument"
    );
    assert_eq!(
        build_by_name(&reg, "Bundle<Encounter>").unwrap_err().to_string(),
        "unknown shape `Encounter`"
    );
}
