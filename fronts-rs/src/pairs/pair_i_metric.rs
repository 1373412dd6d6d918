use crate::config::AxisNames;
use crate::config::FrontsConfig;
use crate::error::FrontsError;
use crate::error::Result;
use crate::labeled::Axis;
use crate::labeled::LabeledArray;
use crate::normalize::normalize;
use crate::pairs::label_pair::enumerate_pairs;
use crate::pairs::label_pair::label_universe;
use crate::pairs::label_pair::LabelPair;
use crate::pairs::pair_output::PairAmbiguityArray;
use crate::pairs::pair_output::PairSummary;
use crate::pairs::sort_ranks::sort_ranks;
use crate::pairs::sort_ranks::top_two;
use ndarray::Array3;
use ndarray::Array4;
use ndarray::ArrayView3;
use ndarray::Axis as NdAxis;
use ndarray::Ix3;
use ndarray::Zip;
use rayon::prelude::*;
use std::borrow::Cow;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;
use typed_builder::TypedBuilder;

/*
  Split the I-metric by the pair of cluster labels in contention.

  Parameters
  ----------
  rank_array: LabeledArray with axes (time, rank, lat, lon) in any order
      The most probable cluster labels at each location, NaN where missing.

  ambiguity_array: LabeledArray with axes (time, lat, lon) in any order
      The I-metric at each location. Extra length-1 axes are dropped.

  threshold: float
      Inclusive lower bound a value must reach to be recorded.

  Returns
  -------
  A PairAmbiguityArray with axes (pair, time, lat, lon). A location whose
  sorted top-2 labels equal (a, b) and whose I-metric is >= threshold carries
  that value in the (a, b) slice and NaN in every other slice. Pairs without a
  single such location are left out.
*/
#[derive(TypedBuilder)]
pub struct PairIMetric<'a> {
  rank_array: &'a LabeledArray,
  ambiguity_array: &'a LabeledArray,
  #[builder(default = 0.05)]
  threshold: f64,
  #[builder(default)]
  axes: AxisNames,
  #[builder(default = true)]
  parallel: bool,
}

impl<'a> PairIMetric<'a> {
  pub fn exec(self) -> Result<PairAmbiguityArray> {
    let Self {
      rank_array,
      ambiguity_array,
      threshold,
      axes,
      parallel,
    } = self;

    if !threshold.is_finite() {
      return Err(FrontsError::InvalidThreshold(threshold));
    }

    let time = axes.time.as_str();
    let rank = axes.rank.as_str();
    let lat = axes.lat.as_str();
    let lon = axes.lon.as_str();

    let n_rank = rank_array.len_of(rank)?;
    if n_rank < 2 {
      return Err(FrontsError::InsufficientRank {
        name: rank.to_string(),
        len: n_rank,
      });
    }

    let ambiguity = if ambiguity_array.ndim() > 3 {
      Cow::Owned(ambiguity_array.clone().squeeze_except(&[time, lat, lon]))
    } else {
      Cow::Borrowed(ambiguity_array)
    };

    let started = Instant::now();
    let mut sorted = normalize(rank_array, &[time, rank, lat, lon])?;
    let i_metric = normalize(&ambiguity, &[time, lat, lon])?.into_dimensionality::<Ix3>()?;
    info!(
      duration_ms = started.elapsed().as_millis(),
      shape = ?sorted.shape(),
      "inputs normalized"
    );

    let mut grid_axes = Vec::with_capacity(3);
    for name in [time, lat, lon] {
      let from_ranks = rank_array.axis(name)?;
      if !from_ranks.same_coords(ambiguity.axis(name)?) {
        return Err(FrontsError::CoordinateMismatch {
          axis: name.to_string(),
        });
      }
      grid_axes.push(from_ranks.clone());
    }

    let started = Instant::now();
    sort_ranks(&mut sorted, 1);
    let labels = label_universe(&sorted)?;
    let candidates = enumerate_pairs(&labels);
    let (first, second) = top_two(sorted.view())?;
    drop(sorted);
    info!(
      duration_ms = started.elapsed().as_millis(),
      n_labels = labels.len(),
      n_candidates = candidates.len(),
      "ranks sorted"
    );

    let started = Instant::now();
    let scan = |pair: &LabelPair| {
      scan_pair(
        *pair,
        first.view(),
        second.view(),
        i_metric.view(),
        threshold,
      )
    };
    let scanned: Vec<Option<(Array3<f64>, PairSummary)>> = if parallel {
      candidates.par_iter().map(scan).collect()
    } else {
      candidates.iter().map(scan).collect()
    };
    let (slices, summaries): (Vec<_>, Vec<_>) = scanned.into_iter().flatten().unzip();
    info!(
      duration_ms = started.elapsed().as_millis(),
      kept = slices.len(),
      pruned = candidates.len() - slices.len(),
      parallel,
      "pairs scanned"
    );
    for summary in &summaries {
      debug!(
        pair = %summary.pair,
        points = summary.points,
        mean = summary.mean,
        max = summary.max,
        "pair kept"
      );
    }
    if slices.is_empty() {
      warn!(threshold, "no label pair reached the threshold; result is empty");
    }

    let (n_time, n_lat, n_lon) = i_metric.dim();
    let data = if slices.is_empty() {
      Array4::from_elem((0, n_time, n_lat, n_lon), f64::NAN)
    } else {
      let views: Vec<ArrayView3<f64>> = slices.iter().map(|s| s.view()).collect();
      ndarray::stack(NdAxis(0), &views)?
    };

    let pairs: Vec<LabelPair> = summaries.iter().map(|s| s.pair).collect();
    let mut out_axes = Vec::with_capacity(4);
    out_axes.push(Axis::labels(
      axes.pair.as_str(),
      pairs.iter().map(LabelPair::display_label),
    ));
    out_axes.extend(grid_axes);

    Ok(PairAmbiguityArray {
      array: LabeledArray::new(data.into_dyn(), out_axes)?,
      pairs,
      summaries,
    })
  }
}

/// Record the I-metric where `pair` is the top-2 assignment and reaches the threshold.
///
/// Returns `None` when no location qualifies.
fn scan_pair(
  pair: LabelPair,
  first: ArrayView3<f64>,
  second: ArrayView3<f64>,
  i_metric: ArrayView3<f64>,
  threshold: f64,
) -> Option<(Array3<f64>, PairSummary)> {
  let mut acc = Array3::from_elem(i_metric.raw_dim(), f64::NAN);
  let mut points = 0usize;
  let mut sum = 0.0;
  let mut max = f64::NEG_INFINITY;

  // NaN fails both the label equality and the threshold comparison.
  Zip::from(&mut acc)
    .and(first)
    .and(second)
    .and(i_metric)
    .for_each(|out, &r0, &r1, &value| {
      if pair.matches(r0, r1) && value >= threshold {
        *out = value;
        points += 1;
        sum += value;
        max = max.max(value);
      }
    });

  if points == 0 {
    return None;
  }
  Some((
    acc,
    PairSummary {
      pair,
      points,
      mean: sum / points as f64,
      max,
    },
  ))
}

/// Extract with the default axis names (time, rank, lat, lon).
pub fn extract(
  rank_array: &LabeledArray,
  ambiguity_array: &LabeledArray,
  threshold: f64,
) -> Result<PairAmbiguityArray> {
  PairIMetric::builder()
    .rank_array(rank_array)
    .ambiguity_array(ambiguity_array)
    .threshold(threshold)
    .build()
    .exec()
}

/// Extract using the axis names and pair parameters of a config.
///
/// Only the axis and pair sections are checked; run metadata never affects
/// the extraction.
pub fn extract_with_config(
  rank_array: &LabeledArray,
  ambiguity_array: &LabeledArray,
  config: &FrontsConfig,
) -> Result<PairAmbiguityArray> {
  config.validate_extraction()?;
  PairIMetric::builder()
    .rank_array(rank_array)
    .ambiguity_array(ambiguity_array)
    .threshold(config.pair.threshold)
    .axes(config.axes.clone())
    .parallel(config.pair.parallel)
    .build()
    .exec()
}
