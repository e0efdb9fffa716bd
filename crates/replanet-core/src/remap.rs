//! Tier-by-tier material substitution (P2 -> P1 -> P0).
//!
//! For each P2 product carried by a route the operator may pick a
//! replacement from the target environment's basic products. An accepted
//! replacement is written through every route and facility at once, then
//! the replacement's P1 inputs are offered one by one against the P1
//! materials already in use. Each accepted P1 swap drags its raw P0 input
//! along with it.
//!
//! Substitutions are applied immediately and never rolled back. Declining
//! or giving an invalid answer leaves that step untouched and moves on.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, EnvironmentDef, FacilityTier, MaterialTier};
use crate::configuration::{Configuration, Rewrite};
use crate::decision::{DecisionKind, Operator, Prompt, SelectionError, ask};
use crate::id::MaterialId;
use crate::resolver::{RecipeResolver, ResolveError};

/// Which P2 products a single conversion run offers for replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductPolicy {
    /// Every distinct P2 on a route, ascending by id.
    #[default]
    All,
    /// Only the lowest-id P2; remaining products wait for another run.
    First,
}

/// One accepted material swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub tier: MaterialTier,
    pub from: MaterialId,
    pub to: MaterialId,
    pub rewrite: Rewrite,
}

/// A prompt the operator declined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declined {
    pub kind: DecisionKind,
    pub subject: MaterialId,
}

/// A recoverable problem. The affected step was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemapIssue {
    Selection {
        kind: DecisionKind,
        subject: MaterialId,
        error: SelectionError,
    },
    Resolve(ResolveError),
}

impl std::fmt::Display for RemapIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemapIssue::Selection {
                kind,
                subject,
                error,
            } => write!(f, "{kind} for {subject}: {error}; skipped"),
            RemapIssue::Resolve(error) => write!(f, "{error}; skipped"),
        }
    }
}

/// Everything the chain remapper did to a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapOutcome {
    /// False when the configuration had no extractor and nothing was offered.
    pub chain_remapped: bool,
    pub substitutions: Vec<Substitution>,
    pub declined: Vec<Declined>,
    pub issues: Vec<RemapIssue>,
    /// Raw resources of the target environment, for display only.
    pub raw_resources: Vec<MaterialId>,
}

impl RemapOutcome {
    fn substitute(
        &mut self,
        config: &mut Configuration,
        tier: MaterialTier,
        from: MaterialId,
        to: MaterialId,
    ) {
        if from == to {
            debug!(?tier, material = %from, "already in place");
            return;
        }
        let rewrite = config.replace_material(from, to);
        info!(
            ?tier,
            from = %from,
            to = %to,
            routes = rewrite.routes,
            facilities = rewrite.facilities,
            "material substituted"
        );
        self.substitutions.push(Substitution {
            tier,
            from,
            to,
            rewrite,
        });
    }

    fn resolve_failed(&mut self, error: ResolveError) {
        warn!(%error, "resolution step skipped");
        self.issues.push(RemapIssue::Resolve(error));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChainRemapper<'c> {
    catalog: &'c Catalog,
    resolver: RecipeResolver<'c>,
    policy: ProductPolicy,
}

impl<'c> ChainRemapper<'c> {
    pub fn new(catalog: &'c Catalog, policy: ProductPolicy) -> Self {
        Self {
            catalog,
            resolver: RecipeResolver::new(catalog),
            policy,
        }
    }

    /// Walk the production chain of `config` against `target`, asking `operator`
    /// at every tier.
    pub fn remap<O: Operator + ?Sized>(
        &self,
        config: &mut Configuration,
        target: &EnvironmentDef,
        operator: &mut O,
    ) -> RemapOutcome {
        let mut outcome = RemapOutcome {
            raw_resources: target.raw_resources.clone(),
            ..RemapOutcome::default()
        };

        if !config.has_facility_tier(self.catalog, FacilityTier::Extractor) {
            info!("no extractor facility; chain remapping skipped");
            return outcome;
        }
        outcome.chain_remapped = true;

        let current_p2 = config.route_materials(self.catalog, MaterialTier::P2);
        let products: Vec<MaterialId> = match self.policy {
            ProductPolicy::All => current_p2.into_iter().collect(),
            ProductPolicy::First => current_p2.into_iter().take(1).collect(),
        };
        debug!(?products, policy = ?self.policy, "P2 products offered");

        for old_p2 in products {
            // An earlier pass may already have rewritten this product.
            if !config.references(old_p2) {
                continue;
            }
            self.remap_product(config, target, old_p2, operator, &mut outcome);
        }

        outcome
    }

    fn remap_product<O: Operator + ?Sized>(
        &self,
        config: &mut Configuration,
        target: &EnvironmentDef,
        old_p2: MaterialId,
        operator: &mut O,
        outcome: &mut RemapOutcome,
    ) {
        let candidates = target.basic_products.as_slice();
        let prompt = Prompt::ReplacementProduct {
            current: old_p2,
            candidates,
        };
        let new_p2 = match self.choose(operator, &prompt, old_p2, outcome) {
            Some(i) => candidates[i],
            None => return,
        };
        outcome.substitute(config, MaterialTier::P2, old_p2, new_p2);

        let required = match self.resolver.inputs_for(new_p2) {
            Ok(inputs) => inputs,
            Err(ResolveError::NotProducible(material)) => {
                debug!(%material, "no recipe; chain ends at P2");
                return;
            }
            Err(error) => {
                outcome.resolve_failed(error);
                return;
            }
        };

        // Snapshot before any P1 swap so freshly placed inputs are never offered.
        let mut current_p1: Vec<MaterialId> = config
            .route_materials(self.catalog, MaterialTier::P1)
            .into_iter()
            .collect();

        for new_p1 in required {
            let prompt = Prompt::ReplacedIntermediate {
                required: new_p1,
                candidates: &current_p1,
            };
            let old_p1 = match self.choose(operator, &prompt, new_p1, outcome) {
                Some(i) => current_p1.remove(i),
                None => continue,
            };
            self.substitute_intermediate(config, old_p1, new_p1, outcome);
        }
    }

    /// Swap `old_p1` for `new_p1`, then their raw inputs.
    fn substitute_intermediate(
        &self,
        config: &mut Configuration,
        old_p1: MaterialId,
        new_p1: MaterialId,
        outcome: &mut RemapOutcome,
    ) {
        outcome.substitute(config, MaterialTier::P1, old_p1, new_p1);

        let raw = self.resolver.sole_input(old_p1).and_then(|old_p0| {
            self.resolver
                .sole_input(new_p1)
                .map(|new_p0| (old_p0, new_p0))
        });
        match raw {
            Ok((old_p0, new_p0)) if old_p0 == new_p0 => {
                debug!(material = %old_p0, "raw input unchanged");
            }
            Ok((old_p0, new_p0)) => outcome.substitute(config, MaterialTier::P0, old_p0, new_p0),
            Err(ResolveError::NotProducible(material)) => {
                debug!(%material, "no recipe; raw input left as is");
            }
            Err(error) => outcome.resolve_failed(error),
        }
    }

    fn choose<O: Operator + ?Sized>(
        &self,
        operator: &mut O,
        prompt: &Prompt<'_>,
        subject: MaterialId,
        outcome: &mut RemapOutcome,
    ) -> Option<usize> {
        let kind = prompt.kind();
        if prompt.candidate_count() == 0 {
            debug!(%kind, %subject, "no candidates to offer");
            return None;
        }
        match ask(operator, prompt) {
            Ok(Some(i)) => Some(i),
            Ok(None) => {
                debug!(%kind, %subject, "declined");
                outcome.declined.push(Declined { kind, subject });
                None
            }
            Err(error) => {
                warn!(%kind, %subject, %error, "invalid selection treated as skip");
                outcome.issues.push(RemapIssue::Selection {
                    kind,
                    subject,
                    error,
                });
                None
            }
        }
    }
}
