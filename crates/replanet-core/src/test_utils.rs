//! Shared fixtures for tests across the workspace.
//!
//! The ladder catalog models two environments with a mirrored three-rung
//! chain each:
//!
//! ```text
//! source:  100 (P0) -> 200 (P1) -> 300 (P2)      101 -> 201
//! target:  110 (P0) -> 210 (P1) -> 310 (P2)      111 -> 211, 210 + 211 -> 320
//! ```

use crate::catalog::{Catalog, CatalogBuilder, FacilityTier, MaterialTier};
use crate::configuration::{Configuration, Facility, Link, Route};
use crate::id::*;

pub const SOURCE_ENV: EnvironmentId = EnvironmentId(1);
pub const TARGET_ENV: EnvironmentId = EnvironmentId(2);
/// Only present in [`unproducible_catalog`]. Has no facilities.
pub const FRONTIER_ENV: EnvironmentId = EnvironmentId(3);

pub const SOURCE_EXTRACTOR: FacilityTypeId = FacilityTypeId(10);
pub const SOURCE_BASIC: FacilityTypeId = FacilityTypeId(11);
pub const SOURCE_ADVANCED: FacilityTypeId = FacilityTypeId(12);
pub const SOURCE_STORAGE: FacilityTypeId = FacilityTypeId(13);

pub const TARGET_EXTRACTOR: FacilityTypeId = FacilityTypeId(20);
pub const TARGET_BASIC: FacilityTypeId = FacilityTypeId(21);
pub const TARGET_ADVANCED: FacilityTypeId = FacilityTypeId(22);
pub const TARGET_STORAGE: FacilityTypeId = FacilityTypeId(23);

pub fn m(id: u32) -> MaterialId {
    MaterialId(id)
}

/// Ladder catalog without the recipe for material 210, so variants can
/// supply their own.
pub fn ladder_builder() -> CatalogBuilder {
    let mut b = CatalogBuilder::new();
    for (id, name) in [
        (100, "Base Metals"),
        (101, "Noble Metals"),
        (110, "Aqueous Liquids"),
        (111, "Microorganisms"),
    ] {
        b.register_material(m(id), MaterialTier::P0, name);
    }
    for (id, name) in [
        (200, "Reactive Metals"),
        (201, "Precious Metals"),
        (210, "Water"),
        (211, "Bacteria"),
    ] {
        b.register_material(m(id), MaterialTier::P1, name);
    }
    for (id, name) in [
        (300, "Mechanical Parts"),
        (301, "Construction Blocks"),
        (310, "Coolant"),
        (320, "Test Cultures"),
    ] {
        b.register_material(m(id), MaterialTier::P2, name);
    }

    b.register_environment(
        SOURCE_ENV,
        "Barren",
        vec![m(300), m(301)],
        vec![m(100), m(101)],
    );
    b.register_environment(
        TARGET_ENV,
        "Oceanic",
        vec![m(310), m(320)],
        vec![m(110), m(111)],
    );

    for (id, tier, env, name) in [
        (SOURCE_EXTRACTOR, FacilityTier::Extractor, SOURCE_ENV, "Barren Extractor"),
        (SOURCE_BASIC, FacilityTier::Basic, SOURCE_ENV, "Barren Basic Industry"),
        (SOURCE_ADVANCED, FacilityTier::Advanced, SOURCE_ENV, "Barren Advanced Industry"),
        (SOURCE_STORAGE, FacilityTier::Storage, SOURCE_ENV, "Barren Storage"),
        (TARGET_EXTRACTOR, FacilityTier::Extractor, TARGET_ENV, "Oceanic Extractor"),
        (TARGET_BASIC, FacilityTier::Basic, TARGET_ENV, "Oceanic Basic Industry"),
        (TARGET_ADVANCED, FacilityTier::Advanced, TARGET_ENV, "Oceanic Advanced Industry"),
        (TARGET_STORAGE, FacilityTier::Storage, TARGET_ENV, "Oceanic Storage"),
    ] {
        b.register_facility(id, tier, env, name);
    }

    b.register_simple_recipe("Reactive Metals", m(200), &[m(100)]);
    b.register_simple_recipe("Precious Metals", m(201), &[m(101)]);
    b.register_simple_recipe("Bacteria", m(211), &[m(111)]);
    b.register_simple_recipe("Mechanical Parts", m(300), &[m(200)]);
    b.register_simple_recipe("Construction Blocks", m(301), &[m(200)]);
    b.register_simple_recipe("Coolant", m(310), &[m(210)]);
    b.register_simple_recipe("Test Cultures", m(320), &[m(210), m(211)]);
    b
}

pub fn ladder_catalog() -> Catalog {
    let mut b = ladder_builder();
    b.register_simple_recipe("Water", m(210), &[m(110)]);
    b.build().expect("ladder catalog is well formed")
}

/// Ladder catalog where two recipes claim to produce 310.
pub fn ambiguous_catalog() -> Catalog {
    let mut b = ladder_builder();
    b.register_simple_recipe("Water", m(210), &[m(110)]);
    b.register_simple_recipe("Coolant (alt)", m(310), &[m(211)]);
    b.build().expect("ambiguous catalog is well formed")
}

/// Ladder catalog where 210 needs two raw inputs.
pub fn multi_raw_catalog() -> Catalog {
    let mut b = ladder_builder();
    b.register_simple_recipe("Water", m(210), &[m(110), m(111)]);
    b.build().expect("multi-raw catalog is well formed")
}

/// Ladder catalog plus a frontier environment whose products end the chain
/// early: 330 has no recipe, and 340 is made from 212, which has none.
pub fn unproducible_catalog() -> Catalog {
    let mut b = ladder_builder();
    b.register_simple_recipe("Water", m(210), &[m(110)]);
    b.register_material(m(212), MaterialTier::P1, "Plasmoids");
    b.register_material(m(330), MaterialTier::P2, "Synthetic Oil");
    b.register_material(m(340), MaterialTier::P2, "Polyaramids");
    b.register_environment(FRONTIER_ENV, "Frontier", vec![m(330), m(340)], vec![m(110)]);
    b.register_simple_recipe("Polyaramids", m(340), &[m(212)]);
    b.build().expect("unproducible catalog is well formed")
}

/// Two extractors feeding a basic facility feeding an advanced facility,
/// with the P2 output stored.
pub fn ladder_config() -> Configuration {
    let facility = |facility_type, output: Option<u32>| Facility {
        facility_type,
        output: output.map(MaterialId),
    };
    let route = |path: &[usize], quantity, material| Route {
        path: path.to_vec(),
        quantity,
        material: MaterialId(material),
    };
    let link = |source, destination| Link {
        source,
        destination,
    };

    Configuration {
        environment: SOURCE_ENV,
        level: 4,
        comment: "mech parts".to_string(),
        size: 2.5,
        facilities: vec![
            facility(SOURCE_EXTRACTOR, Some(100)),
            facility(SOURCE_EXTRACTOR, Some(100)),
            facility(SOURCE_BASIC, Some(200)),
            facility(SOURCE_ADVANCED, Some(300)),
            facility(SOURCE_STORAGE, None),
        ],
        links: vec![link(1, 3), link(2, 3), link(3, 4), link(4, 5)],
        routes: vec![
            route(&[1, 3], 3000, 100),
            route(&[2, 3], 3000, 100),
            route(&[3, 4], 20, 200),
            route(&[4, 5], 5, 300),
        ],
    }
}

/// Add a second P2 product (301) next to the ladder's 300.
pub fn add_second_product(config: &mut Configuration) {
    config.facilities.push(Facility {
        facility_type: SOURCE_ADVANCED,
        output: Some(m(301)),
    });
    let position = config.facilities.len();
    config.routes.push(Route {
        path: vec![3, position],
        quantity: 20,
        material: m(200),
    });
    config.routes.push(Route {
        path: vec![position, 5],
        quantity: 5,
        material: m(301),
    });
}

/// Ladder config plus a second P1 (201) in use, fed by its own extractor.
pub fn two_input_config() -> Configuration {
    let mut config = ladder_config();
    config.facilities.push(Facility {
        facility_type: SOURCE_EXTRACTOR,
        output: Some(m(101)),
    });
    config.facilities.push(Facility {
        facility_type: SOURCE_BASIC,
        output: Some(m(201)),
    });
    config.routes.push(Route {
        path: vec![6, 7],
        quantity: 3000,
        material: m(101),
    });
    config.routes.push(Route {
        path: vec![7, 4],
        quantity: 20,
        material: m(201),
    });
    config
}
