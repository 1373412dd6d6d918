use crate::labeled::LabeledArray;
use crate::pairs::label_pair::LabelPair;
use serde::Deserialize;
use serde::Serialize;

/// Statistics of the qualifying points recorded for one kept pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSummary {
  pub pair: LabelPair,
  /// Number of (time, lat, lon) locations recorded for the pair.
  pub points: usize,
  pub mean: f64,
  pub max: f64,
}

/// Ambiguity values split by the label pair in contention.
///
/// Axes are (pair, time, lat, lon). Every slice along `pair` holds the I-metric
/// where that pair is the top-2 assignment and the value reached the
/// threshold, and NaN elsewhere. Only pairs with at least one such location
/// are present, in enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairAmbiguityArray {
  pub(crate) array: LabeledArray,
  pub(crate) pairs: Vec<LabelPair>,
  pub(crate) summaries: Vec<PairSummary>,
}

impl PairAmbiguityArray {
  pub fn pairs(&self) -> &[LabelPair] {
    &self.pairs
  }

  /// Coordinates of the `pair` axis, e.g. `["1 to 2", "2 to 4"]`.
  pub fn pair_labels(&self) -> Vec<String> {
    self.pairs.iter().map(LabelPair::display_label).collect()
  }

  pub fn n_pairs(&self) -> usize {
    self.pairs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  pub fn summaries(&self) -> &[PairSummary] {
    &self.summaries
  }

  /// The (time, lat, lon) slice for a display label such as "1 to 2".
  pub fn slice(&self, label: &str) -> Option<LabeledArray> {
    let index = self.pairs.iter().position(|p| p.display_label() == label)?;
    let pair_axis = self.array.axes()[0].name.clone();
    self.array.isel(&pair_axis, index).ok()
  }

  pub fn as_labeled(&self) -> &LabeledArray {
    &self.array
  }

  pub fn into_labeled(self) -> LabeledArray {
    self.array
  }
}
