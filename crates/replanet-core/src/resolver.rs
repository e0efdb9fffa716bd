//! Recipe resolution: from a produced material back to the materials it needs.

use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::id::MaterialId;

/// Errors from looking up the recipe behind a material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No recipe outputs this material. Normal for raw (P0) materials.
    #[error("material {0} is not produced by any recipe")]
    NotProducible(MaterialId),

    /// More than one recipe claims the same output.
    #[error("material {material} is produced by {} recipes: {}", recipes.len(), recipes.join(", "))]
    AmbiguousRecipe {
        material: MaterialId,
        recipes: Vec<String>,
    },

    /// The recipe exists but does not have exactly one input.
    #[error("material {material} needs {count} inputs, expected exactly one")]
    InputCount { material: MaterialId, count: usize },
}

/// Read-only view over a catalog's recipe index.
#[derive(Debug, Clone, Copy)]
pub struct RecipeResolver<'c> {
    catalog: &'c Catalog,
}

impl<'c> RecipeResolver<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// The input materials of the unique recipe producing `material`.
    pub fn inputs_for(&self, material: MaterialId) -> Result<BTreeSet<MaterialId>, ResolveError> {
        match self.catalog.recipes_producing(material) {
            [] => Err(ResolveError::NotProducible(material)),
            [only] => Ok(self
                .catalog
                .get_recipe(*only)
                .map(|recipe| recipe.inputs().collect())
                .unwrap_or_default()),
            many => Err(ResolveError::AmbiguousRecipe {
                material,
                recipes: many
                    .iter()
                    .filter_map(|id| self.catalog.get_recipe(*id))
                    .map(|r| r.name.clone())
                    .collect(),
            }),
        }
    }

    /// The single input of the recipe producing `material`.
    ///
    /// Used for the P1 -> P0 rung, where each product is refined from exactly
    /// one raw resource.
    pub fn sole_input(&self, material: MaterialId) -> Result<MaterialId, ResolveError> {
        let inputs = self.inputs_for(material)?;
        let mut iter = inputs.iter();
        match (iter.next(), iter.next()) {
            (Some(&only), None) => Ok(only),
            _ => Err(ResolveError::InputCount {
                material,
                count: inputs.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBuilder, MaterialTier};

    fn catalog() -> Catalog {
        let mut b = CatalogBuilder::new();
        let metals = b.register_material(MaterialId(100), MaterialTier::P0, "Base Metals");
        let noble = b.register_material(MaterialId(101), MaterialTier::P0, "Noble Metals");
        let reactive = b.register_material(MaterialId(200), MaterialTier::P1, "Reactive Metals");
        let precious = b.register_material(MaterialId(201), MaterialTier::P1, "Precious Metals");
        let parts = b.register_material(MaterialId(300), MaterialTier::P2, "Mechanical Parts");
        b.register_simple_recipe("Reactive Metals", reactive, &[metals]);
        b.register_simple_recipe("Precious Metals", precious, &[noble]);
        b.register_simple_recipe("Mechanical Parts", parts, &[reactive, precious]);
        b.build().unwrap()
    }

    #[test]
    fn inputs_for_p2_returns_all_p1_inputs() {
        let cat = catalog();
        let inputs = RecipeResolver::new(&cat).inputs_for(MaterialId(300)).unwrap();
        assert_eq!(
            inputs.into_iter().collect::<Vec<_>>(),
            vec![MaterialId(200), MaterialId(201)]
        );
    }

    #[test]
    fn raw_material_is_not_producible() {
        let cat = catalog();
        let resolver = RecipeResolver::new(&cat);
        assert_eq!(
            resolver.inputs_for(MaterialId(100)),
            Err(ResolveError::NotProducible(MaterialId(100)))
        );
    }

    #[test]
    fn sole_input_for_p1() {
        let cat = catalog();
        let resolver = RecipeResolver::new(&cat);
        assert_eq!(resolver.sole_input(MaterialId(200)), Ok(MaterialId(100)));
    }

    #[test]
    fn sole_input_rejects_multiple_inputs() {
        let cat = catalog();
        let resolver = RecipeResolver::new(&cat);
        assert_eq!(
            resolver.sole_input(MaterialId(300)),
            Err(ResolveError::InputCount {
                material: MaterialId(300),
                count: 2
            })
        );
    }

    #[test]
    fn ambiguous_recipe_is_reported_with_names() {
        let mut b = CatalogBuilder::new();
        let ore = b.register_material(MaterialId(1), MaterialTier::P0, "ore");
        let alt = b.register_material(MaterialId(2), MaterialTier::P0, "alt ore");
        let out = b.register_material(MaterialId(3), MaterialTier::P1, "product");
        b.register_simple_recipe("first", out, &[ore]);
        b.register_simple_recipe("second", out, &[alt]);
        let cat = b.build().unwrap();

        let err = RecipeResolver::new(&cat).inputs_for(out).unwrap_err();
        match &err {
            ResolveError::AmbiguousRecipe { material, recipes } => {
                assert_eq!(*material, out);
                assert_eq!(recipes, &vec!["first".to_string(), "second".to_string()]);
            }
            other => panic!("expected AmbiguousRecipe, got: {other:?}"),
        }
        assert!(err.to_string().contains("first, second"));
    }

    #[test]
    fn resolution_is_repeatable() {
        let cat = catalog();
        let resolver = RecipeResolver::new(&cat);
        assert_eq!(
            resolver.inputs_for(MaterialId(300)),
            resolver.inputs_for(MaterialId(300))
        );
    }
}
