//! Conversion engine: retarget facilities, then remap the production chain.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalog;
use crate::configuration::{Configuration, ConfigurationError};
use crate::decision::Operator;
use crate::id::EnvironmentId;
use crate::remap::{ChainRemapper, ProductPolicy, RemapIssue, RemapOutcome, Substitution};
use crate::retarget::{FacilityRetargeter, RetargetSummary};

/// Tunables for a conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub product_policy: ProductPolicy,
}

/// Structural failures. Raised before the configuration is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("target environment {0} is not in the catalog")]
    UnknownEnvironment(EnvironmentId),
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// What a conversion did, for the summary view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub source: EnvironmentId,
    pub target: EnvironmentId,
    pub retarget: RetargetSummary,
    pub remap: RemapOutcome,
}

impl ConversionReport {
    pub fn substitutions(&self) -> &[Substitution] {
        &self.remap.substitutions
    }

    pub fn issues(&self) -> &[RemapIssue] {
        &self.remap.issues
    }

    /// No unmatched facilities and no recoverable issues.
    pub fn is_clean(&self) -> bool {
        self.retarget.unmatched.is_empty() && self.remap.issues.is_empty()
    }
}

pub struct ConversionEngine<'c> {
    catalog: &'c Catalog,
    options: ConvertOptions,
}

impl<'c> ConversionEngine<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_options(catalog, ConvertOptions::default())
    }

    pub fn with_options(catalog: &'c Catalog, options: ConvertOptions) -> Self {
        Self { catalog, options }
    }

    /// Convert `config` in place to `target`.
    ///
    /// Structural checks run first, so on `Err` the configuration is exactly
    /// as it was passed in. Once mutation starts every accepted substitution
    /// stays applied.
    pub fn convert<O: Operator + ?Sized>(
        &self,
        config: &mut Configuration,
        target: EnvironmentId,
        operator: &mut O,
    ) -> Result<ConversionReport, ConvertError> {
        let environment = self
            .catalog
            .get_environment(target)
            .ok_or(ConvertError::UnknownEnvironment(target))?;
        config.validate()?;

        let source = config.environment;
        info!(from = %source, to = %target, name = %environment.name, "converting configuration");
        config.environment = target;

        let retarget = FacilityRetargeter::new(self.catalog).apply_to(config, target);
        let remap = ChainRemapper::new(self.catalog, self.options.product_policy)
            .remap(config, environment, operator);

        info!(
            retargeted = retarget.retargeted.len(),
            unmatched = retarget.unmatched.len(),
            substitutions = remap.substitutions.len(),
            issues = remap.issues.len(),
            "conversion finished"
        );

        Ok(ConversionReport {
            source,
            target,
            retarget,
            remap,
        })
    }
}

/// Convert an owned configuration, returning the updated copy and its report.
pub fn convert<O: Operator + ?Sized>(
    catalog: &Catalog,
    mut config: Configuration,
    target: EnvironmentId,
    operator: &mut O,
) -> Result<(Configuration, ConversionReport), ConvertError> {
    let report = ConversionEngine::new(catalog).convert(&mut config, target, operator)?;
    Ok((config, report))
}
