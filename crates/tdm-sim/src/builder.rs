//! Fluent builder for constructing a [`DaySimulator`].

use std::sync::Arc;

use tdm_core::{HouseholdAttributes, ModelConfig};
use tdm_schedule::{CoefficientTable, TourSchedulingModel};

use crate::sim::HouseholdMap;
use crate::{DaySimulator, SimError, SimResult};

/// Fluent builder for [`DaySimulator`].
///
/// # Required inputs
///
/// - [`ModelConfig`]: day window, cutoff, seed, fallback policy
/// - [`CoefficientTable`]: shared read-only for the whole run
///
/// # Optional inputs
///
/// | Method            | Default          |
/// |-------------------|------------------|
/// | `.households(v)`  | No households    |
/// | `.household(h)`   | (appends one)    |
///
/// Persons whose household was never supplied fail with
/// [`SimError::HouseholdNotFound`].
pub struct DaySimulatorBuilder {
    config:       ModelConfig,
    coefficients: Arc<CoefficientTable>,
    households:   Vec<HouseholdAttributes>,
}

impl DaySimulatorBuilder {
    pub fn new(config: ModelConfig, coefficients: Arc<CoefficientTable>) -> Self {
        Self { config, coefficients, households: Vec::new() }
    }

    pub fn households(mut self, households: impl IntoIterator<Item = HouseholdAttributes>) -> Self {
        self.households.extend(households);
        self
    }

    pub fn household(mut self, household: HouseholdAttributes) -> Self {
        self.households.push(household);
        self
    }

    /// Validate the configuration and coefficient shape, index households,
    /// and return a ready-to-run [`DaySimulator`].
    pub fn build(self) -> SimResult<DaySimulator> {
        self.config.validate()?;
        let model = TourSchedulingModel::new(&self.config, self.coefficients)?;

        let mut households = HouseholdMap::default();
        households.reserve(self.households.len());
        for household in self.households {
            let id = household.id;
            if households.insert(id, household).is_some() {
                return Err(SimError::DuplicateHousehold(id));
            }
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(e.to_string()))?,
            ),
            None => None,
        };

        Ok(DaySimulator {
            config: self.config,
            model,
            households,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
