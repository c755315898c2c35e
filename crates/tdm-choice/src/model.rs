//! The `ChoiceModel` trait: the seam between behavioural models and the
//! logit machinery.

use crate::ChoiceResult;

/// A set of alternatives that can be turned into probabilities and sampled.
///
/// Implemented by the flat [`ChoiceSet`](crate::ChoiceSet) and the
/// [`NestedChoiceSet`](crate::NestedChoiceSet), so a model can switch
/// structure without touching its selection code.
pub trait ChoiceModel {
    /// What a draw resolves to (an index, or a nest/alternative pair).
    type Choice;

    /// Probabilities over all elemental alternatives, in insertion order.
    /// Unavailable alternatives appear with probability zero.
    fn probabilities(&self) -> ChoiceResult<Vec<f64>>;

    /// Expected maximum utility of the whole set.
    fn logsum(&self) -> ChoiceResult<f64>;

    /// Select one alternative given a uniform `[0, 1)` draw.
    fn choose(&self, draw: f64) -> ChoiceResult<Self::Choice>;
}
