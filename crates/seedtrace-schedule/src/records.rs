//! Plant and harvest records consumed by the cultivation projector

use seedtrace_core::serde_helpers::{lenient_bool, lenient_number, lenient_string};
use serde::{Deserialize, Serialize};

/// A plant in cultivation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub strain: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// ISO timestamp the plant went into the ground
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub planted_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool::deserialize")]
    pub harvested: bool,
}

impl Plant {
    /// Create plant planted at `planted_at`
    #[must_use]
    pub fn new(id: impl Into<String>, planted_at: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            planted_at: Some(planted_at.into()),
            ..Self::default()
        }
    }

    /// Set strain
    #[must_use]
    pub fn with_strain(mut self, strain: impl Into<String>) -> Self {
        self.strain = Some(strain.into());
        self
    }

    /// Set location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Mark harvested
    #[must_use]
    pub fn harvested(mut self) -> Self {
        self.harvested = true;
        self
    }
}

/// Post-harvest state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarvestStatus {
    Drying,
    Dried,
    #[default]
    #[serde(other)]
    Other,
}

/// A harvested lot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Harvest {
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number::deserialize")]
    pub yield_grams: f64,
    #[serde(default)]
    pub status: HarvestStatus,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub harvested_at: Option<String>,
}

impl Harvest {
    /// Create harvest in the given state
    #[must_use]
    pub fn new(id: impl Into<String>, status: HarvestStatus) -> Self {
        Self {
            id: Some(id.into()),
            status,
            ..Self::default()
        }
    }

    /// Set source plant
    #[must_use]
    pub fn with_plant(mut self, plant_id: impl Into<String>) -> Self {
        self.plant_id = Some(plant_id.into());
        self
    }

    /// Set harvest time
    #[must_use]
    pub fn with_harvested_at(mut self, harvested_at: impl Into<String>) -> Self {
        self.harvested_at = Some(harvested_at.into());
        self
    }

    /// Set wet weight in grams
    #[must_use]
    pub fn with_yield(mut self, grams: f64) -> Self {
        self.yield_grams = grams;
        self
    }
}
