//! Replanet Core -- moves a planetary-industry configuration onto a planet of
//! a different type.
//!
//! # Conversion Pipeline
//!
//! [`convert::ConversionEngine::convert`] runs in three steps:
//!
//! 1. **Validate** -- Check the target environment exists and every route
//!    and link points at a real facility. Nothing is touched on failure.
//! 2. **Retarget** -- Swap each facility for the catalog facility with the
//!    same tier on the target environment.
//! 3. **Remap** -- Walk P2 -> P1 -> P0, asking an [`decision::Operator`] at
//!    each tier and rewriting every route and facility that carries the
//!    replaced material.
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Immutable facility, environment, material and
//!   recipe tables with explicit lookup indexes (frozen at startup).
//! - [`configuration::Configuration`] -- The template under edit.
//! - [`resolver::RecipeResolver`] -- Material to recipe inputs.
//! - [`retarget::FacilityRetargeter`] -- `(tier, environment)` to facility type.
//! - [`remap::ChainRemapper`] -- Operator-driven material substitution.
//! - [`decision::Operator`] -- Where choices come from.

pub mod catalog;
pub mod configuration;
pub mod convert;
pub mod decision;
pub mod id;
pub mod remap;
pub mod resolver;
pub mod retarget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use catalog::{Catalog, CatalogBuilder, CatalogError, FacilityTier, MaterialTier};
pub use configuration::Configuration;
pub use convert::{ConversionEngine, ConversionReport, ConvertError, ConvertOptions, convert};
pub use decision::{Decision, Operator, Prompt};
pub use remap::ProductPolicy;
