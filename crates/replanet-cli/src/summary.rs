//! Human-readable rendering of catalog listings and conversion reports.

use replanet_core::ConversionReport;
use replanet_core::catalog::Catalog;
use replanet_core::id::{EnvironmentId, FacilityTypeId, MaterialId};

pub fn environment_label(catalog: &Catalog, id: EnvironmentId) -> String {
    match catalog.get_environment(id) {
        Some(env) => format!("{} ({id})", env.name),
        None => id.to_string(),
    }
}

pub fn material_label(catalog: &Catalog, id: MaterialId) -> String {
    format!("{} ({id})", catalog.material_name(id))
}

fn facility_label(catalog: &Catalog, id: FacilityTypeId) -> String {
    match catalog.get_facility(id) {
        Some(def) => format!("{} ({id})", def.description),
        None => id.to_string(),
    }
}

fn material_list(catalog: &Catalog, ids: &[MaterialId]) -> String {
    let names: Vec<String> = ids.iter().map(|&id| material_label(catalog, id)).collect();
    names.join(", ")
}

/// One block per environment: basic products and raw resources.
pub fn render_environments(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (id, env) in catalog.environments() {
        out.push_str(&format!("{}\n", environment_label(catalog, id)));
        out.push_str(&format!(
            "  P2 products:   {}\n",
            material_list(catalog, &env.basic_products)
        ));
        out.push_str(&format!(
            "  raw resources: {}\n",
            material_list(catalog, &env.raw_resources)
        ));
    }
    out
}

pub fn render_report(catalog: &Catalog, report: &ConversionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Converted {} -> {}\n",
        environment_label(catalog, report.source),
        environment_label(catalog, report.target)
    ));

    let retarget = &report.retarget;
    out.push_str(&format!(
        "\nFacilities retargeted: {}\n",
        retarget.retargeted.len()
    ));
    for r in &retarget.retargeted {
        out.push_str(&format!(
            "  #{} {} -> {}\n",
            r.position,
            facility_label(catalog, r.from),
            facility_label(catalog, r.to)
        ));
    }
    if !retarget.unmatched.is_empty() {
        out.push_str(&format!(
            "Facilities left unchanged: {}\n",
            retarget.unmatched.len()
        ));
        for u in &retarget.unmatched {
            out.push_str(&format!("  #{} {}: {}\n", u.position, u.facility_type, u.error));
        }
    }

    let remap = &report.remap;
    if !remap.chain_remapped {
        out.push_str("\nNo extractor in this configuration; production chain left as is.\n");
    }
    if !report.substitutions().is_empty() {
        out.push_str("\nSubstitutions:\n");
        for s in report.substitutions() {
            out.push_str(&format!(
                "  {:?} {} -> {} ({} routes, {} facilities)\n",
                s.tier,
                material_label(catalog, s.from),
                material_label(catalog, s.to),
                s.rewrite.routes,
                s.rewrite.facilities
            ));
        }
    }
    if !remap.declined.is_empty() {
        out.push_str("\nDeclined:\n");
        for d in &remap.declined {
            out.push_str(&format!(
                "  {} for {}\n",
                d.kind,
                material_label(catalog, d.subject)
            ));
        }
    }
    if !report.issues().is_empty() {
        out.push_str("\nIssues:\n");
        for issue in report.issues() {
            out.push_str(&format!("  {issue}\n"));
        }
    }
    if !remap.raw_resources.is_empty() {
        out.push_str(&format!(
            "\nRaw resources on {}: {}\n",
            environment_label(catalog, report.target),
            material_list(catalog, &remap.raw_resources)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use replanet_core::ConversionEngine;
    use replanet_core::decision::{DeclineAll, ScriptedOperator};
    use replanet_core::test_utils::*;

    #[test]
    fn environments_listing() {
        let text = render_environments(&ladder_catalog());
        assert!(text.contains("Barren (1)"));
        assert!(text.contains("Oceanic (2)"));
        assert!(text.contains("Coolant (310), Test Cultures (320)"));
        assert!(text.contains("Aqueous Liquids (110), Microorganisms (111)"));
    }

    #[test]
    fn accepted_conversion() {
        let cat = ladder_catalog();
        let mut config = ladder_config();
        let mut op = ScriptedOperator::from_lines(["1", "1"]);
        let report = ConversionEngine::new(&cat)
            .convert(&mut config, TARGET_ENV, &mut op)
            .unwrap();

        let text = render_report(&cat, &report);
        assert!(text.starts_with("Converted Barren (1) -> Oceanic (2)"));
        assert!(text.contains("Facilities retargeted: 5"));
        assert!(text.contains("#1 Barren Extractor (10) -> Oceanic Extractor (20)"));
        assert!(text.contains(
            "P2 Mechanical Parts (300) -> Coolant (310) (1 routes, 1 facilities)"
        ));
        assert!(text.contains(
            "P0 Base Metals (100) -> Aqueous Liquids (110) (2 routes, 2 facilities)"
        ));
        assert!(!text.contains("Issues:"));
        assert!(!text.contains("Declined:"));
    }

    #[test]
    fn declined_and_issues_are_listed() {
        let cat = ladder_catalog();
        let mut config = ladder_config();
        let report = ConversionEngine::new(&cat)
            .convert(&mut config, TARGET_ENV, &mut DeclineAll)
            .unwrap();
        let text = render_report(&cat, &report);
        assert!(text.contains("Declined:\n  select replacement P2 for Mechanical Parts (300)"));

        let mut config = ladder_config();
        let mut op = ScriptedOperator::from_lines(["9"]);
        let report = ConversionEngine::new(&cat)
            .convert(&mut config, TARGET_ENV, &mut op)
            .unwrap();
        let text = render_report(&cat, &report);
        assert!(text.contains("Issues:\n  select replacement P2 for 300"));
    }

    #[test]
    fn factory_only_configuration_notes_skipped_chain() {
        let cat = ladder_catalog();
        let mut config = ladder_config();
        config.facilities.retain(|f| f.facility_type != SOURCE_EXTRACTOR);
        config.routes.clear();
        config.links.clear();
        let report = ConversionEngine::new(&cat)
            .convert(&mut config, TARGET_ENV, &mut DeclineAll)
            .unwrap();
        let text = render_report(&cat, &report);
        assert!(text.contains("No extractor"));
        assert!(text.contains(
            "Raw resources on Oceanic (2): Aqueous Liquids (110), Microorganisms (111)"
        ));
    }
}
