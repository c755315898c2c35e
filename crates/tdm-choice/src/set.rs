//! Flat multinomial logit over labelled alternatives.

use crate::{ChoiceError, ChoiceModel, ChoiceResult};

// ── Alternative ───────────────────────────────────────────────────────────────

/// One labelled alternative with its utility and availability.
#[derive(Clone, Debug, PartialEq)]
pub struct Alternative<T> {
    pub label:     T,
    pub utility:   f64,
    pub available: bool,
}

// ── ChoiceSet ─────────────────────────────────────────────────────────────────

/// A flat logit choice set.
///
/// Alternatives are kept in insertion order; indices returned by
/// [`push`](Self::push) stay valid for the life of the set.
#[derive(Clone, Debug)]
pub struct ChoiceSet<T> {
    alternatives: Vec<Alternative<T>>,
}

impl<T> Default for ChoiceSet<T> {
    fn default() -> Self {
        Self { alternatives: Vec::new() }
    }
}

impl<T> ChoiceSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { alternatives: Vec::with_capacity(capacity) }
    }

    /// Add an available alternative with zero utility; returns its index.
    pub fn push(&mut self, label: T) -> usize {
        self.push_with(label, 0.0, true)
    }

    /// Add an alternative with explicit utility and availability.
    pub fn push_with(&mut self, label: T, utility: f64, available: bool) -> usize {
        self.alternatives.push(Alternative { label, utility, available });
        self.alternatives.len() - 1
    }

    pub fn set_utility(&mut self, index: usize, utility: f64) -> ChoiceResult<()> {
        self.get_mut(index)?.utility = utility;
        Ok(())
    }

    pub fn set_available(&mut self, index: usize, available: bool) -> ChoiceResult<()> {
        self.get_mut(index)?.available = available;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.alternatives.iter().filter(|a| a.available).count()
    }

    /// Read-only slice of all alternatives in insertion order.
    pub fn alternatives(&self) -> &[Alternative<T>] {
        &self.alternatives
    }

    pub fn get(&self, index: usize) -> Option<&Alternative<T>> {
        self.alternatives.get(index)
    }

    /// Label of the alternative at `index`.
    pub fn label(&self, index: usize) -> Option<&T> {
        self.alternatives.get(index).map(|a| &a.label)
    }

    /// Exponentiated utilities shifted by the largest available utility,
    /// together with their sum and the shift.
    ///
    /// Shifting keeps `exp` from overflowing; the largest term is always 1,
    /// so the sum can only degenerate when utilities are NaN or infinite.
    fn shifted_exponentials(&self, scale: f64) -> ChoiceResult<(Vec<f64>, f64, f64)> {
        if self.available_count() == 0 {
            return Err(ChoiceError::NoAvailableAlternatives { total: self.len() });
        }

        let max = self
            .alternatives
            .iter()
            .filter(|a| a.available)
            .map(|a| a.utility / scale)
            .fold(f64::NEG_INFINITY, f64::max);

        let exps: Vec<f64> = self
            .alternatives
            .iter()
            .map(|a| if a.available { (a.utility / scale - max).exp() } else { 0.0 })
            .collect();
        let sum: f64 = exps.iter().sum();

        if !sum.is_finite() || sum <= 0.0 {
            return Err(ChoiceError::DegenerateProbabilities { sum });
        }
        Ok((exps, sum, max))
    }

    /// Probabilities with utilities divided by a nest `scale`.
    pub(crate) fn scaled_probabilities(&self, scale: f64) -> ChoiceResult<Vec<f64>> {
        let (mut exps, sum, _) = self.shifted_exponentials(scale)?;
        exps.iter_mut().for_each(|e| *e /= sum);
        Ok(exps)
    }

    /// `ln Σ exp(V / scale)` over available alternatives.
    pub(crate) fn scaled_logsum(&self, scale: f64) -> ChoiceResult<f64> {
        let (_, sum, max) = self.shifted_exponentials(scale)?;
        Ok(max + sum.ln())
    }

    fn get_mut(&mut self, index: usize) -> ChoiceResult<&mut Alternative<T>> {
        let len = self.alternatives.len();
        self.alternatives
            .get_mut(index)
            .ok_or(ChoiceError::IndexOutOfRange { index, len })
    }
}

impl<T> ChoiceModel for ChoiceSet<T> {
    type Choice = usize;

    fn probabilities(&self) -> ChoiceResult<Vec<f64>> {
        self.scaled_probabilities(1.0)
    }

    fn logsum(&self) -> ChoiceResult<f64> {
        self.scaled_logsum(1.0)
    }

    /// Index of the chosen alternative.
    fn choose(&self, draw: f64) -> ChoiceResult<usize> {
        let probabilities = self.probabilities()?;
        sample_index(&probabilities, draw)
    }
}

// ── Inverse-CDF sampling ──────────────────────────────────────────────────────

/// Walk the cumulative distribution and return the first index whose
/// cumulative probability exceeds `draw`.
///
/// Zero-probability entries are never selected.  If rounding leaves the
/// final cumulative value just below `draw`, the last positive entry wins.
pub(crate) fn sample_index(probabilities: &[f64], draw: f64) -> ChoiceResult<usize> {
    if !(0.0..1.0).contains(&draw) {
        return Err(ChoiceError::InvalidDraw(draw));
    }

    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, &p) in probabilities.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = Some(i);
        if draw < cumulative {
            return Ok(i);
        }
    }

    match last_positive {
        Some(i) => {
            tracing::trace!(draw, cumulative, "draw beyond cumulative total; taking last alternative");
            Ok(i)
        }
        None => Err(ChoiceError::NoAvailableAlternatives { total: probabilities.len() }),
    }
}
