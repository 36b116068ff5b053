//! Named, defaulted simulation parameters.

use std::collections::BTreeMap;

use crate::error::SimError;

/// A set of named numeric parameters.
///
/// Registered simulations carry a default set; callers supply overrides
/// that are merged on top at execution time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimParams {
    values: BTreeMap<String, f64>,
}

impl SimParams {
    /// An empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Inserts or replaces a parameter.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Looks up a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Looks up a parameter a transform cannot run without.
    pub fn require(&self, simulation: &'static str, parameter: &'static str) -> Result<f64, SimError> {
        self.get(parameter).ok_or(SimError::MissingParameter {
            simulation,
            parameter,
        })
    }

    /// Returns these parameters with `overrides` merged on top.
    #[must_use]
    pub fn merged(&self, overrides: &Self) -> Self {
        let mut values = self.values.clone();
        for (name, value) in &overrides.values {
            values.insert(name.clone(), *value);
        }
        Self { values }
    }

    /// Iterates parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Returns `true` if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
