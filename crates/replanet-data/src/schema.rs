//! Serde data file structs for catalog tables.
//!
//! These structs define the on-disk format for materials, environments,
//! facilities and recipes. They are deserialized from RON, JSON, or TOML
//! data files and then resolved into a frozen catalog by the loader.

use replanet_core::catalog::{FacilityTier, MaterialTier};
use replanet_core::id::{EnvironmentId, FacilityTypeId, MaterialId};
use serde::Deserialize;

/// A material definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialData {
    pub id: MaterialId,
    pub tier: MaterialTier,
    #[serde(default)]
    pub description: String,
}

/// An environment (planet type) definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentData {
    pub id: EnvironmentId,
    pub name: String,
    #[serde(default)]
    pub basic_products: Vec<MaterialId>,
    #[serde(default)]
    pub raw_resources: Vec<MaterialId>,
}

/// A facility type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityData {
    pub id: FacilityTypeId,
    pub tier: FacilityTier,
    pub environment: EnvironmentId,
    #[serde(default)]
    pub description: String,
}

/// One line of a recipe. Lines are inputs unless marked as the output.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeLineData {
    pub material: MaterialId,
    #[serde(default)]
    pub is_output: bool,
}

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    pub lines: Vec<RecipeLineData>,
}
