//! The production configuration under edit: facilities, links and routes.
//!
//! Facilities are addressed by stable 1-based positions. Conversion only
//! rewrites type and material ids in place; counts, ordering, quantities and
//! route paths never change.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, FacilityTier, MaterialTier};
use crate::id::*;

/// A facility placed in the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub facility_type: FacilityTypeId,
    /// Material currently produced. Absent for transit or unassigned facilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<MaterialId>,
}

/// A physical connection between two facilities. Opaque to conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: usize,
    pub destination: usize,
}

/// A directed multi-hop route carrying one material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Facility positions, source first.
    pub path: Vec<usize>,
    pub quantity: u32,
    pub material: MaterialId,
}

/// A production template bound to one environment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub environment: EnvironmentId,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub size: f64,
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// How many places a material rewrite touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub routes: usize,
    pub facilities: usize,
}

impl Rewrite {
    pub fn is_empty(&self) -> bool {
        self.routes == 0 && self.facilities == 0
    }
}

impl Configuration {
    /// An empty configuration on the given environment.
    pub fn new(environment: EnvironmentId) -> Self {
        Self {
            environment,
            level: 0,
            comment: String::new(),
            size: 0.0,
            facilities: Vec::new(),
            links: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Check that every route and link references an existing facility.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let count = self.facilities.len();
        for (route, r) in self.routes.iter().enumerate() {
            if r.path.is_empty() {
                return Err(ConfigurationError::EmptyRoute { route: route + 1 });
            }
            if let Some(&position) = r.path.iter().find(|&&p| p == 0 || p > count) {
                return Err(ConfigurationError::RouteOutOfRange {
                    route: route + 1,
                    position,
                    facilities: count,
                });
            }
        }
        for (link, l) in self.links.iter().enumerate() {
            for position in [l.source, l.destination] {
                if position == 0 || position > count {
                    return Err(ConfigurationError::LinkOutOfRange {
                        link: link + 1,
                        position,
                        facilities: count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Distinct route materials of the given tier, ascending.
    pub fn route_materials(&self, catalog: &Catalog, tier: MaterialTier) -> BTreeSet<MaterialId> {
        self.routes
            .iter()
            .map(|r| r.material)
            .filter(|m| catalog.material_tier(*m) == Some(tier))
            .collect()
    }

    pub fn has_facility_tier(&self, catalog: &Catalog, tier: FacilityTier) -> bool {
        self.facilities
            .iter()
            .any(|f| catalog.facility_tier(f.facility_type) == Some(tier))
    }

    /// Whether any route or facility output mentions `material`.
    pub fn references(&self, material: MaterialId) -> bool {
        self.routes.iter().any(|r| r.material == material)
            || self.facilities.iter().any(|f| f.output == Some(material))
    }

    /// Rewrite every route and facility output carrying `from` to carry `to`.
    pub fn replace_material(&mut self, from: MaterialId, to: MaterialId) -> Rewrite {
        let mut rewrite = Rewrite::default();
        if from == to {
            return rewrite;
        }
        for route in self.routes.iter_mut().filter(|r| r.material == from) {
            route.material = to;
            rewrite.routes += 1;
        }
        for facility in self.facilities.iter_mut().filter(|f| f.output == Some(from)) {
            facility.output = Some(to);
            rewrite.facilities += 1;
        }
        rewrite
    }
}

/// Structural problems with a configuration. Conversion refuses to start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("route {route} has an empty path")]
    EmptyRoute { route: usize },
    #[error("route {route} references facility {position}, but only {facilities} exist")]
    RouteOutOfRange {
        route: usize,
        position: usize,
        facilities: usize,
    },
    #[error("link {link} references facility {position}, but only {facilities} exist")]
    LinkOutOfRange {
        link: usize,
        position: usize,
        facilities: usize,
    },
}
