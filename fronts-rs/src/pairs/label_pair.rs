use crate::error::FrontsError;
use crate::error::Result;
use itertools::Itertools;
use ndarray::ArrayBase;
use ndarray::Data;
use ndarray::Dimension;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Largest cluster label accepted in a rank array.
pub const MAX_LABEL: f64 = u16::MAX as f64;

/// Two distinct cluster labels in contention at a location, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LabelPair {
  a: usize,
  b: usize,
}

impl LabelPair {
  /// Returns `None` unless `a < b`.
  pub fn new(a: usize, b: usize) -> Option<Self> {
    (a < b).then_some(Self { a, b })
  }

  pub fn a(&self) -> usize {
    self.a
  }

  pub fn b(&self) -> usize {
    self.b
  }

  /// 1-based label used for the `pair` coordinate, e.g. "1 to 2" for (0, 1).
  pub fn display_label(&self) -> String {
    format!("{} to {}", self.a + 1, self.b + 1)
  }

  /// Whether a sorted top-2 label vector equals this pair. Missing values never match.
  #[inline(always)]
  pub fn matches(&self, first: f64, second: f64) -> bool {
    first == self.a as f64 && second == self.b as f64
  }
}

impl fmt::Display for LabelPair {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.display_label())
  }
}

/*
  Candidate cluster labels present in a rank array.

  Scans for the largest finite value and returns `0..=floor(max)`. An array
  with no finite, non-negative value yields no labels at all. A maximum above
  `MAX_LABEL` is rejected rather than enumerated.
*/
pub fn label_universe<S, D>(sorted_ranks: &ArrayBase<S, D>) -> Result<Vec<usize>>
where
  S: Data<Elem = f64>,
  D: Dimension,
{
  let max_label = sorted_ranks
    .iter()
    .copied()
    .filter(|v| v.is_finite())
    .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));

  match max_label {
    Some(max) if max > MAX_LABEL => Err(FrontsError::LabelOutOfRange { value: max }),
    Some(max) if max >= 0.0 => Ok((0..=max.floor() as usize).collect()),
    _ => Ok(Vec::new()),
  }
}

/*
  All unordered pairs of distinct labels, drawn from the Cartesian product of
  `labels` with itself and deduplicated. For labels sorted ascending the order
  is lexicographic: (0, 1), (0, 2), ..., (1, 2), ...
*/
pub fn enumerate_pairs(labels: &[usize]) -> Vec<LabelPair> {
  labels
    .iter()
    .cartesian_product(labels.iter())
    .filter_map(|(&a, &b)| LabelPair::new(a, b))
    .unique()
    .collect()
}
