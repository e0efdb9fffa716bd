//! Property-based tests for retargeting and chain remapping.
//!
//! Uses proptest to generate random configurations over the ladder fixture
//! catalog, then checks invariants that must hold for any operator input.

use proptest::prelude::*;
use replanet_core::catalog::Catalog;
use replanet_core::configuration::{Configuration, Facility, Route};
use replanet_core::decision::{Decision, DeclineAll, ScriptedOperator};
use replanet_core::id::*;
use replanet_core::remap::ChainRemapper;
use replanet_core::resolver::RecipeResolver;
use replanet_core::retarget::FacilityRetargeter;
use replanet_core::test_utils::*;
use replanet_core::ProductPolicy;

// ===========================================================================
// Generators
// ===========================================================================

const FACILITY_TYPES: [u32; 9] = [10, 11, 12, 13, 20, 21, 22, 23, 99];
const MATERIALS: [u32; 13] = [
    100, 101, 110, 111, 200, 201, 210, 211, 300, 301, 310, 320, 999,
];

fn arb_material() -> impl Strategy<Value = MaterialId> {
    prop::sample::select(MATERIALS.to_vec()).prop_map(MaterialId)
}

/// Random but structurally valid configuration on the source environment.
fn arb_config(max_facilities: usize) -> impl Strategy<Value = Configuration> {
    (1..=max_facilities).prop_flat_map(|n| {
        let facilities = prop::collection::vec(
            (
                prop::sample::select(FACILITY_TYPES.to_vec()),
                prop::option::of(arb_material()),
            ),
            n,
        );
        let routes = prop::collection::vec(
            (prop::collection::vec(1..=n, 1..4), 1u32..5000, arb_material()),
            0..10,
        );
        (facilities, routes).prop_map(|(facilities, routes)| {
            let mut config = Configuration::new(SOURCE_ENV);
            config.facilities = facilities
                .into_iter()
                .map(|(t, output)| Facility {
                    facility_type: FacilityTypeId(t),
                    output,
                })
                .collect();
            config.routes = routes
                .into_iter()
                .map(|(path, quantity, material)| Route {
                    path,
                    quantity,
                    material,
                })
                .collect();
            config
        })
    })
}

fn arb_decisions() -> impl Strategy<Value = Vec<Decision>> {
    prop::collection::vec(
        prop_oneof![
            Just(Decision::Skip),
            (0usize..4).prop_map(Decision::Pick),
            Just(Decision::Unreadable("?".to_string())),
        ],
        0..12,
    )
}

fn target_def(cat: &Catalog) -> &replanet_core::catalog::EnvironmentDef {
    cat.get_environment(TARGET_ENV).unwrap()
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every facility with a known tier ends up with that tier on the target,
    /// or is untouched.
    #[test]
    fn retarget_preserves_tier(config in arb_config(8)) {
        let cat = ladder_catalog();
        let mut after = config.clone();
        FacilityRetargeter::new(&cat).apply_to(&mut after, TARGET_ENV);

        for (before, now) in config.facilities.iter().zip(&after.facilities) {
            match cat.get_facility(before.facility_type) {
                Some(original) => {
                    let def = cat.get_facility(now.facility_type).unwrap();
                    let retargeted = def.tier == original.tier && def.environment == TARGET_ENV;
                    prop_assert!(retargeted || now.facility_type == before.facility_type);
                }
                None => prop_assert_eq!(now.facility_type, before.facility_type),
            }
            prop_assert_eq!(now.output, before.output);
        }
    }

    /// Resolution never depends on anything but the catalog.
    #[test]
    fn inputs_for_is_pure(material in arb_material()) {
        let cat = ladder_catalog();
        let resolver = RecipeResolver::new(&cat);
        prop_assert_eq!(resolver.inputs_for(material), resolver.inputs_for(material));
    }

    /// Declining every prompt leaves the configuration byte-for-byte equal.
    #[test]
    fn declining_everything_is_identity(config in arb_config(8)) {
        let cat = ladder_catalog();
        let mut after = config.clone();
        ChainRemapper::new(&cat, ProductPolicy::All).remap(
            &mut after,
            target_def(&cat),
            &mut DeclineAll,
        );
        prop_assert_eq!(after, config);
    }

    /// An accepted substitution leaves no trace of the old material, unless a
    /// later substitution brought it back.
    #[test]
    fn substitutions_are_consistent(config in arb_config(8), decisions in arb_decisions()) {
        let cat = ladder_catalog();
        let mut after = config.clone();
        let mut op = ScriptedOperator::new(decisions);
        let outcome = ChainRemapper::new(&cat, ProductPolicy::All)
            .remap(&mut after, target_def(&cat), &mut op);

        let subs = &outcome.substitutions;
        for (i, s) in subs.iter().enumerate() {
            if s.from == s.to || subs[i + 1..].iter().any(|later| later.to == s.from) {
                continue;
            }
            prop_assert!(!after.references(s.from), "{} still referenced after {:?}", s.from, s);
        }
    }

    /// Conversion only ever changes ids: counts, paths and quantities survive.
    #[test]
    fn topology_is_preserved(config in arb_config(8), decisions in arb_decisions()) {
        let cat = ladder_catalog();
        let mut after = config.clone();
        let mut op = ScriptedOperator::new(decisions);
        replanet_core::ConversionEngine::new(&cat)
            .convert(&mut after, TARGET_ENV, &mut op)
            .unwrap();

        prop_assert_eq!(after.facilities.len(), config.facilities.len());
        prop_assert_eq!(after.routes.len(), config.routes.len());
        for (a, b) in after.routes.iter().zip(&config.routes) {
            prop_assert_eq!(&a.path, &b.path);
            prop_assert_eq!(a.quantity, b.quantity);
        }
    }
}
