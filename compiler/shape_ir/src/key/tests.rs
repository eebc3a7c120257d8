use super::*;
use crate::SchemaId;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rustc_hash::FxHashSet;

#[test]
fn same_name_and_params_are_equal() {
    let interner = NameInterner::new();
    let bundle = interner.intern("Bundle");
    let payload = SchemaId::fresh();

    let a = CacheKey::new(bundle, [ParamId::of(payload)]);
    let b = CacheKey::new(interner.intern("Bundle"), [ParamId::of(payload)]);
    assert_eq!(a, b);

    let mut set = FxHashSet::default();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn differing_parameter_identity_differs() {
    let interner = NameInterner::new();
    let wrapper = interner.intern("Wrapper");
    let p1 = SchemaId::fresh();
    let p2 = SchemaId::fresh();

    assert_ne!(
        CacheKey::new(wrapper, [ParamId::of(p1)]),
        CacheKey::new(wrapper, [ParamId::of(p2)])
    );
}

#[test]
fn parameter_order_matters() {
    let interner = NameInterner::new();
    let pair = interner.intern("Pair");
    let a = ParamId::of(SchemaId::fresh());
    let b = ParamId::of(SchemaId::fresh());

    assert_ne!(CacheKey::new(pair, [a, b]), CacheKey::new(pair, [b, a]));
}

#[test]
fn none_slot_is_not_an_empty_list() {
    let interner = NameInterner::new();
    let bundle = interner.intern("Bundle");

    assert_ne!(CacheKey::bare(bundle), CacheKey::new(bundle, [ParamId::NONE]));
    assert_eq!(CacheKey::new(bundle, [ParamId::NONE]).arity(), 1);
}

#[test]
fn differing_name_differs() {
    let interner = NameInterner::new();
    assert_ne!(
        CacheKey::bare(interner.intern("Patient")),
        CacheKey::bare(interner.intern("Practitioner"))
    );
}

#[test]
fn display_resolves_names() {
    let interner = NameInterner::new();
    let payload = SchemaId::fresh();
    let key = CacheKey::new(interner.intern("Bundle"), [ParamId::of(payload), ParamId::NONE]);

    assert_eq!(
        key.display(&interner).to_string(),
        format!("Bundle<#{}, _>", payload.raw())
    );
    assert_eq!(
        CacheKey::bare(interner.intern("Node"))
            .display(&interner)
            .to_string(),
        "Node"
    );
}

proptest! {
    #[test]
    fn key_equality_matches_component_equality(
        n1 in 0u32..4,
        n2 in 0u32..4,
        p1 in proptest::collection::vec(0u64..4, 0..3),
        p2 in proptest::collection::vec(0u64..4, 0..3),
    ) {
        // Raw params stand in for identities; 0 is the NONE sentinel either way.
        let to_params = |raw: &[u64]| -> Vec<ParamId> {
            raw.iter()
                .map(|&r| if r == 0 { ParamId::NONE } else { ParamId::of(ids()[r as usize]) })
                .collect()
        };
        let k1 = CacheKey::new(ShapeName::from_raw(n1), to_params(&p1));
        let k2 = CacheKey::new(ShapeName::from_raw(n2), to_params(&p2));
        prop_assert_eq!(k1 == k2, n1 == n2 && p1 == p2);
    }
}

fn ids() -> &'static [SchemaId; 4] {
    static IDS: std::sync::OnceLock<[SchemaId; 4]> = std::sync::OnceLock::new();
    IDS.get_or_init(|| std::array::from_fn(|_| SchemaId::fresh()))
}
