use crate::id::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Production stage a facility performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FacilityTier {
    Extractor,
    Basic,
    Advanced,
    HighTech,
    Storage,
    Launchpad,
    CommandCenter,
}

/// Processing depth of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaterialTier {
    /// Raw extracted resource.
    P0,
    /// First-stage processed good.
    P1,
    /// Second-stage processed good.
    P2,
}

/// A facility type definition in the catalog.
#[derive(Debug, Clone)]
pub struct FacilityDef {
    pub tier: FacilityTier,
    pub environment: EnvironmentId,
    pub description: String,
}

/// An environment (planet type) definition in the catalog.
#[derive(Debug, Clone)]
pub struct EnvironmentDef {
    pub name: String,
    pub basic_products: Vec<MaterialId>,
    pub raw_resources: Vec<MaterialId>,
}

/// A material definition in the catalog.
#[derive(Debug, Clone)]
pub struct MaterialDef {
    pub tier: MaterialTier,
    pub description: String,
}

/// One line item of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeLine {
    pub material: MaterialId,
    pub is_output: bool,
}

/// A recipe definition: one output line, any number of input lines.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub name: String,
    pub lines: Vec<RecipeLine>,
}

impl RecipeDef {
    /// The produced material. Always present once the catalog is built.
    pub fn output(&self) -> Option<MaterialId> {
        self.lines.iter().find(|l| l.is_output).map(|l| l.material)
    }

    pub fn inputs(&self) -> impl Iterator<Item = MaterialId> + '_ {
        self.lines
            .iter()
            .filter(|l| !l.is_output)
            .map(|l| l.material)
    }
}

/// Builder for constructing an immutable [`Catalog`].
///
/// Entries are registered in catalog order; integrity is checked once in
/// [`CatalogBuilder::build`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    facilities: Vec<(FacilityTypeId, FacilityDef)>,
    environments: Vec<(EnvironmentId, EnvironmentDef)>,
    materials: Vec<(MaterialId, MaterialDef)>,
    recipes: Vec<RecipeDef>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_material(
        &mut self,
        id: MaterialId,
        tier: MaterialTier,
        description: &str,
    ) -> MaterialId {
        self.materials.push((
            id,
            MaterialDef {
                tier,
                description: description.to_string(),
            },
        ));
        id
    }

    pub fn register_environment(
        &mut self,
        id: EnvironmentId,
        name: &str,
        basic_products: Vec<MaterialId>,
        raw_resources: Vec<MaterialId>,
    ) -> EnvironmentId {
        self.environments.push((
            id,
            EnvironmentDef {
                name: name.to_string(),
                basic_products,
                raw_resources,
            },
        ));
        id
    }

    pub fn register_facility(
        &mut self,
        id: FacilityTypeId,
        tier: FacilityTier,
        environment: EnvironmentId,
        description: &str,
    ) -> FacilityTypeId {
        self.facilities.push((
            id,
            FacilityDef {
                tier,
                environment,
                description: description.to_string(),
            },
        ));
        id
    }

    /// Register a recipe. Returns its position in catalog order.
    pub fn register_recipe(&mut self, name: &str, lines: Vec<RecipeLine>) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(RecipeDef {
            name: name.to_string(),
            lines,
        });
        id
    }

    /// Convenience for the common shape: one output, a list of inputs.
    pub fn register_simple_recipe(
        &mut self,
        name: &str,
        output: MaterialId,
        inputs: &[MaterialId],
    ) -> RecipeId {
        let mut lines: Vec<RecipeLine> = inputs
            .iter()
            .map(|&material| RecipeLine {
                material,
                is_output: false,
            })
            .collect();
        lines.push(RecipeLine {
            material: output,
            is_output: true,
        });
        self.register_recipe(name, lines)
    }

    /// Validate cross-references, build lookup indexes and freeze the catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut materials = HashMap::with_capacity(self.materials.len());
        for (id, def) in self.materials {
            if materials.insert(id, def).is_some() {
                return Err(CatalogError::DuplicateMaterial(id));
            }
        }

        let mut environment_index = HashMap::with_capacity(self.environments.len());
        for (pos, (id, env)) in self.environments.iter().enumerate() {
            if environment_index.insert(*id, pos).is_some() {
                return Err(CatalogError::DuplicateEnvironment(*id));
            }
            for material in env.basic_products.iter().chain(&env.raw_resources) {
                if !materials.contains_key(material) {
                    return Err(CatalogError::UnknownMaterial {
                        context: format!("environment '{}'", env.name),
                        material: *material,
                    });
                }
            }
        }

        let mut facility_index = HashMap::with_capacity(self.facilities.len());
        let mut by_placement: HashMap<(FacilityTier, EnvironmentId), Vec<FacilityTypeId>> =
            HashMap::new();
        for (pos, (id, facility)) in self.facilities.iter().enumerate() {
            if facility_index.insert(*id, pos).is_some() {
                return Err(CatalogError::DuplicateFacility(*id));
            }
            if !environment_index.contains_key(&facility.environment) {
                return Err(CatalogError::UnknownEnvironment {
                    facility: *id,
                    environment: facility.environment,
                });
            }
            let slot = by_placement
                .entry((facility.tier, facility.environment))
                .or_default();
            if let Some(first) = slot.first() {
                debug!(
                    tier = ?facility.tier,
                    environment = %facility.environment,
                    kept = %first,
                    shadowed = %id,
                    "duplicate facility placement; first in catalog order wins"
                );
            }
            slot.push(*id);
        }

        let mut recipes_by_output: HashMap<MaterialId, Vec<RecipeId>> = HashMap::new();
        for (pos, recipe) in self.recipes.iter().enumerate() {
            let outputs: Vec<MaterialId> = recipe
                .lines
                .iter()
                .filter(|l| l.is_output)
                .map(|l| l.material)
                .collect();
            if outputs.len() != 1 {
                return Err(CatalogError::MalformedRecipe {
                    recipe: recipe.name.clone(),
                    outputs: outputs.len(),
                });
            }
            let mut seen = HashSet::new();
            for line in &recipe.lines {
                if !materials.contains_key(&line.material) {
                    return Err(CatalogError::UnknownMaterial {
                        context: format!("recipe '{}'", recipe.name),
                        material: line.material,
                    });
                }
                if !seen.insert(line.material) {
                    return Err(CatalogError::RepeatedRecipeLine {
                        recipe: recipe.name.clone(),
                        material: line.material,
                    });
                }
            }
            recipes_by_output
                .entry(outputs[0])
                .or_default()
                .push(RecipeId(pos as u32));
        }

        debug!(
            materials = materials.len(),
            environments = self.environments.len(),
            facilities = self.facilities.len(),
            recipes = self.recipes.len(),
            "catalog built"
        );

        Ok(Catalog {
            facilities: self.facilities,
            facility_index,
            facilities_by_placement: by_placement,
            environments: self.environments,
            environment_index,
            materials,
            recipes: self.recipes,
            recipes_by_output,
        })
    }
}

/// Immutable reference catalog. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    facilities: Vec<(FacilityTypeId, FacilityDef)>,
    facility_index: HashMap<FacilityTypeId, usize>,
    facilities_by_placement: HashMap<(FacilityTier, EnvironmentId), Vec<FacilityTypeId>>,
    environments: Vec<(EnvironmentId, EnvironmentDef)>,
    environment_index: HashMap<EnvironmentId, usize>,
    materials: HashMap<MaterialId, MaterialDef>,
    recipes: Vec<RecipeDef>,
    recipes_by_output: HashMap<MaterialId, Vec<RecipeId>>,
}

impl Catalog {
    pub fn get_facility(&self, id: FacilityTypeId) -> Option<&FacilityDef> {
        self.facility_index
            .get(&id)
            .map(|&pos| &self.facilities[pos].1)
    }

    pub fn facility_tier(&self, id: FacilityTypeId) -> Option<FacilityTier> {
        self.get_facility(id).map(|f| f.tier)
    }

    /// Facility types with the given tier on the given environment, in catalog order.
    pub fn facilities_for(
        &self,
        tier: FacilityTier,
        environment: EnvironmentId,
    ) -> &[FacilityTypeId] {
        self.facilities_by_placement
            .get(&(tier, environment))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_environment(&self, id: EnvironmentId) -> Option<&EnvironmentDef> {
        self.environment_index
            .get(&id)
            .map(|&pos| &self.environments[pos].1)
    }

    /// All environments in catalog order.
    pub fn environments(&self) -> impl Iterator<Item = (EnvironmentId, &EnvironmentDef)> {
        self.environments.iter().map(|(id, def)| (*id, def))
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&MaterialDef> {
        self.materials.get(&id)
    }

    pub fn material_tier(&self, id: MaterialId) -> Option<MaterialTier> {
        self.get_material(id).map(|m| m.tier)
    }

    /// Human-readable material name, falling back to the bare id.
    pub fn material_name(&self, id: MaterialId) -> String {
        self.get_material(id)
            .map(|m| m.description.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(id.0 as usize)
    }

    /// Recipes whose output line is `material`, in catalog order.
    pub fn recipes_producing(&self, material: MaterialId) -> &[RecipeId] {
        self.recipes_by_output
            .get(&material)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub fn environment_count(&self) -> usize {
        self.environments.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }
}

/// Structural catalog errors. Any of these makes the whole catalog unusable.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate facility type {0}")]
    DuplicateFacility(FacilityTypeId),
    #[error("duplicate environment {0}")]
    DuplicateEnvironment(EnvironmentId),
    #[error("duplicate material {0}")]
    DuplicateMaterial(MaterialId),
    #[error("facility type {facility} references unknown environment {environment}")]
    UnknownEnvironment {
        facility: FacilityTypeId,
        environment: EnvironmentId,
    },
    #[error("{context} references unknown material {material}")]
    UnknownMaterial { context: String, material: MaterialId },
    #[error("recipe '{recipe}' has {outputs} output lines, expected exactly one")]
    MalformedRecipe { recipe: String, outputs: usize },
    #[error("recipe '{recipe}' lists material {material} more than once")]
    RepeatedRecipeLine { recipe: String, material: MaterialId },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_builder() -> CatalogBuilder {
        let mut b = CatalogBuilder::new();
        let ore = b.register_material(MaterialId(100), MaterialTier::P0, "Base Metals");
        let metal = b.register_material(MaterialId(200), MaterialTier::P1, "Reactive Metals");
        let barren = b.register_environment(EnvironmentId(1), "Barren", vec![], vec![ore]);
        b.register_facility(FacilityTypeId(10), FacilityTier::Extractor, barren, "Barren ECU");
        b.register_facility(FacilityTypeId(11), FacilityTier::Basic, barren, "Barren Basic");
        b.register_simple_recipe("Reactive Metals", metal, &[ore]);
        b
    }

    #[test]
    fn register_and_build() {
        let cat = setup_builder().build().unwrap();
        assert_eq!(cat.material_count(), 2);
        assert_eq!(cat.environment_count(), 1);
        assert_eq!(cat.facility_count(), 2);
        assert_eq!(cat.recipe_count(), 1);
    }

    #[test]
    fn lookups() {
        let cat = setup_builder().build().unwrap();
        assert_eq!(cat.facility_tier(FacilityTypeId(10)), Some(FacilityTier::Extractor));
        assert_eq!(cat.facility_tier(FacilityTypeId(99)), None);
        assert_eq!(cat.material_tier(MaterialId(200)), Some(MaterialTier::P1));
        assert_eq!(cat.material_name(MaterialId(100)), "Base Metals");
        assert_eq!(cat.material_name(MaterialId(999)), "999");
        assert_eq!(cat.get_environment(EnvironmentId(1)).unwrap().name, "Barren");
    }

    #[test]
    fn recipe_output_and_inputs() {
        let cat = setup_builder().build().unwrap();
        let recipe = cat.get_recipe(RecipeId(0)).unwrap();
        assert_eq!(recipe.output(), Some(MaterialId(200)));
        assert_eq!(recipe.inputs().collect::<Vec<_>>(), vec![MaterialId(100)]);
        assert_eq!(cat.recipes_producing(MaterialId(200)), &[RecipeId(0)]);
        assert!(cat.recipes_producing(MaterialId(100)).is_empty());
    }

    #[test]
    fn placement_index_keeps_catalog_order() {
        let mut b = setup_builder();
        b.register_facility(FacilityTypeId(12), FacilityTier::Basic, EnvironmentId(1), "Second");
        let cat = b.build().unwrap();
        assert_eq!(
            cat.facilities_for(FacilityTier::Basic, EnvironmentId(1)),
            &[FacilityTypeId(11), FacilityTypeId(12)]
        );
        assert!(cat.facilities_for(FacilityTier::Advanced, EnvironmentId(1)).is_empty());
    }

    #[test]
    fn duplicate_material_fails() {
        let mut b = setup_builder();
        b.register_material(MaterialId(100), MaterialTier::P0, "again");
        assert!(matches!(b.build(), Err(CatalogError::DuplicateMaterial(MaterialId(100)))));
    }

    #[test]
    fn duplicate_facility_fails() {
        let mut b = setup_builder();
        b.register_facility(FacilityTypeId(10), FacilityTier::Basic, EnvironmentId(1), "again");
        assert!(matches!(b.build(), Err(CatalogError::DuplicateFacility(FacilityTypeId(10)))));
    }

    #[test]
    fn facility_with_unknown_environment_fails() {
        let mut b = setup_builder();
        b.register_facility(FacilityTypeId(20), FacilityTier::Basic, EnvironmentId(7), "orphan");
        match b.build() {
            Err(CatalogError::UnknownEnvironment { facility, environment }) => {
                assert_eq!(facility, FacilityTypeId(20));
                assert_eq!(environment, EnvironmentId(7));
            }
            other => panic!("expected UnknownEnvironment, got: {other:?}"),
        }
    }

    #[test]
    fn recipe_without_output_fails() {
        let mut b = setup_builder();
        b.register_recipe(
            "broken",
            vec![RecipeLine {
                material: MaterialId(100),
                is_output: false,
            }],
        );
        match b.build() {
            Err(CatalogError::MalformedRecipe { recipe, outputs }) => {
                assert_eq!(recipe, "broken");
                assert_eq!(outputs, 0);
            }
            other => panic!("expected MalformedRecipe, got: {other:?}"),
        }
    }

    #[test]
    fn recipe_with_two_outputs_fails() {
        let mut b = setup_builder();
        b.register_recipe(
            "twin",
            vec![
                RecipeLine {
                    material: MaterialId(100),
                    is_output: true,
                },
                RecipeLine {
                    material: MaterialId(200),
                    is_output: true,
                },
            ],
        );
        let err = b.build().unwrap_err();
        assert!(format!("{err}").contains("2 output lines"), "got: {err}");
    }

    #[test]
    fn recipe_with_unknown_material_fails() {
        let mut b = setup_builder();
        b.register_simple_recipe("ghost", MaterialId(300), &[MaterialId(100)]);
        assert!(matches!(
            b.build(),
            Err(CatalogError::UnknownMaterial { material: MaterialId(300), .. })
        ));
    }

    #[test]
    fn environment_with_unknown_material_fails() {
        let mut b = setup_builder();
        b.register_environment(EnvironmentId(2), "Gas", vec![MaterialId(404)], vec![]);
        let err = b.build().unwrap_err();
        assert!(format!("{err}").contains("environment 'Gas'"), "got: {err}");
    }

    #[test]
    fn duplicate_recipe_outputs_are_kept_for_resolution() {
        let mut b = setup_builder();
        b.register_simple_recipe("Reactive Metals (alt)", MaterialId(200), &[MaterialId(100)]);
        let cat = b.build().unwrap();
        assert_eq!(cat.recipes_producing(MaterialId(200)).len(), 2);
    }

    #[test]
    fn empty_catalog_builds_successfully() {
        let cat = CatalogBuilder::new().build().unwrap();
        assert_eq!(cat.material_count(), 0);
        assert_eq!(cat.environments().count(), 0);
    }
}
