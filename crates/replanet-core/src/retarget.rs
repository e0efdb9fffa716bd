//! Facility retargeting: swap each facility for its same-tier equivalent on
//! another environment.

use tracing::{debug, warn};

use crate::catalog::{Catalog, FacilityTier};
use crate::configuration::Configuration;
use crate::id::{EnvironmentId, FacilityTypeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetargetError {
    #[error("no {tier:?} facility exists for environment {environment}")]
    NoFacilityMatch {
        tier: FacilityTier,
        environment: EnvironmentId,
    },
    #[error("facility type {0} is not in the catalog")]
    UnknownFacilityType(FacilityTypeId),
}

/// A facility whose type was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retargeted {
    pub position: usize,
    pub from: FacilityTypeId,
    pub to: FacilityTypeId,
}

/// A facility left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    pub position: usize,
    pub facility_type: FacilityTypeId,
    pub error: RetargetError,
}

/// Outcome of retargeting a whole configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetargetSummary {
    pub retargeted: Vec<Retargeted>,
    pub unmatched: Vec<Unmatched>,
}

#[derive(Debug, Clone, Copy)]
pub struct FacilityRetargeter<'c> {
    catalog: &'c Catalog,
}

impl<'c> FacilityRetargeter<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// The facility type with `tier` on `environment`. First in catalog order wins.
    pub fn retarget(
        &self,
        tier: FacilityTier,
        environment: EnvironmentId,
    ) -> Result<FacilityTypeId, RetargetError> {
        self.catalog
            .facilities_for(tier, environment)
            .first()
            .copied()
            .ok_or(RetargetError::NoFacilityMatch { tier, environment })
    }

    /// Retarget every facility of `config` onto `environment`.
    ///
    /// Facilities of unknown type, or whose tier has no equivalent on the
    /// target, are left untouched and listed in the summary.
    pub fn apply_to(
        &self,
        config: &mut Configuration,
        environment: EnvironmentId,
    ) -> RetargetSummary {
        let mut summary = RetargetSummary::default();

        for (i, facility) in config.facilities.iter_mut().enumerate() {
            let position = i + 1;
            let current = facility.facility_type;
            let outcome = self
                .catalog
                .facility_tier(current)
                .ok_or(RetargetError::UnknownFacilityType(current))
                .and_then(|tier| self.retarget(tier, environment));

            match outcome {
                Ok(to) if to == current => {}
                Ok(to) => {
                    debug!(position, from = %current, to = %to, "facility retargeted");
                    facility.facility_type = to;
                    summary.retargeted.push(Retargeted {
                        position,
                        from: current,
                        to,
                    });
                }
                Err(error) => {
                    warn!(position, facility_type = %current, %error, "facility left unchanged");
                    summary.unmatched.push(Unmatched {
                        position,
                        facility_type: current,
                        error,
                    });
                }
            }
        }

        summary
    }
}
