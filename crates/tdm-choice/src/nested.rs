//! Two-level nested logit: a root split over nests, each nest a flat
//! [`ChoiceSet`] with its own log-sum scale.
//!
//! For nest `m` with scale `θ_m`:
//!
//! ```text
//! P(i | m) = exp(V_i / θ_m) / Σ_j∈m exp(V_j / θ_m)
//! I_m      = ln Σ_j∈m exp(V_j / θ_m)
//! P(m)     = exp(θ_m · I_m) / Σ_n exp(θ_n · I_n)
//! ```
//!
//! Nests without any available alternative are themselves unavailable.
//! A scale of 1 everywhere collapses to the flat logit.

use crate::set::sample_index;
use crate::{ChoiceError, ChoiceModel, ChoiceResult, ChoiceSet};

/// One nest of elemental alternatives.
#[derive(Clone, Debug)]
pub struct Nest<T> {
    pub name:  String,
    pub scale: f64,
    pub set:   ChoiceSet<T>,
}

/// A root split over [`Nest`]s.
#[derive(Clone, Debug)]
pub struct NestedChoiceSet<T> {
    nests: Vec<Nest<T>>,
}

impl<T> Default for NestedChoiceSet<T> {
    fn default() -> Self {
        Self { nests: Vec::new() }
    }
}

impl<T> NestedChoiceSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a nest; returns its index.
    ///
    /// # Errors
    ///
    /// `InvalidScale` unless `0 < scale <= 1`.
    pub fn add_nest(
        &mut self,
        name:  impl Into<String>,
        scale: f64,
        set:   ChoiceSet<T>,
    ) -> ChoiceResult<usize> {
        let name = name.into();
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(ChoiceError::InvalidScale { nest: name, scale });
        }
        self.nests.push(Nest { name, scale, set });
        Ok(self.nests.len() - 1)
    }

    pub fn nests(&self) -> &[Nest<T>] {
        &self.nests
    }

    /// Total number of elemental alternatives across all nests.
    pub fn len(&self) -> usize {
        self.nests.iter().map(|n| n.set.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marginal nest probabilities `P(m)`.
    pub fn nest_probabilities(&self) -> ChoiceResult<Vec<f64>> {
        let mut root = ChoiceSet::with_capacity(self.nests.len());
        for (i, nest) in self.nests.iter().enumerate() {
            match nest.set.scaled_logsum(nest.scale) {
                Ok(inclusive) => root.push_with(i, nest.scale * inclusive, true),
                Err(ChoiceError::NoAvailableAlternatives { .. }) => root.push_with(i, 0.0, false),
                Err(e) => return Err(e),
            };
        }
        if root.available_count() == 0 {
            return Err(ChoiceError::NoAvailableAlternatives { total: self.len() });
        }
        root.probabilities()
    }

    /// Map a flat elemental index back to `(nest, alternative)`.
    fn locate(&self, mut flat: usize) -> Option<(usize, usize)> {
        for (n, nest) in self.nests.iter().enumerate() {
            if flat < nest.set.len() {
                return Some((n, flat));
            }
            flat -= nest.set.len();
        }
        None
    }
}

impl<T> ChoiceModel for NestedChoiceSet<T> {
    /// `(nest index, alternative index within the nest)`.
    type Choice = (usize, usize);

    /// Joint probabilities `P(m) · P(i | m)`, flattened nest by nest.
    fn probabilities(&self) -> ChoiceResult<Vec<f64>> {
        let marginals = self.nest_probabilities()?;
        let mut joint = Vec::with_capacity(self.len());
        for (nest, &p_nest) in self.nests.iter().zip(&marginals) {
            if p_nest > 0.0 {
                let conditional = nest.set.scaled_probabilities(nest.scale)?;
                joint.extend(conditional.into_iter().map(|p| p * p_nest));
            } else {
                joint.extend(std::iter::repeat_n(0.0, nest.set.len()));
            }
        }
        Ok(joint)
    }

    fn logsum(&self) -> ChoiceResult<f64> {
        let mut root = ChoiceSet::with_capacity(self.nests.len());
        for nest in &self.nests {
            if nest.set.available_count() > 0 {
                root.push_with((), nest.scale * nest.set.scaled_logsum(nest.scale)?, true);
            }
        }
        root.logsum()
    }

    fn choose(&self, draw: f64) -> ChoiceResult<(usize, usize)> {
        let joint = self.probabilities()?;
        let flat = sample_index(&joint, draw)?;
        self.locate(flat)
            .ok_or(ChoiceError::IndexOutOfRange { index: flat, len: self.len() })
    }
}
