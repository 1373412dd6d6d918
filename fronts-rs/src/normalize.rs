use crate::error::FrontsError;
use crate::error::Result;
use crate::labeled::LabeledArray;
use ndarray::ArrayD;
use std::time::Instant;
use tracing::debug;

/*
  Reorder a labeled array's dense storage so its axes follow `desired`.

  For every axis in the array's current storage order we look up the index of
  its name within `desired`, giving two parallel position lists (current and
  target). A single generalized transpose then moves each current axis to its
  target. Matching is strictly by name, so axes that happen to share a length
  cannot be confused.

  Parameters
  ----------
  array: LabeledArray
      The array to reorder. Values are never changed.

  desired: list of axis names
      A full permutation of the array's axis names.

  Returns
  -------
  An owned, standard-layout array whose i-th axis is `desired[i]`.
*/
pub fn normalize(array: &LabeledArray, desired: &[&str]) -> Result<ArrayD<f64>> {
  let started = Instant::now();

  for (i, name) in desired.iter().enumerate() {
    if desired[..i].contains(name) {
      return Err(FrontsError::DuplicateAxis {
        name: name.to_string(),
      });
    }
    if !array.axes().iter().any(|a| a.name == *name) {
      return Err(array.not_found(name));
    }
  }
  if desired.len() != array.ndim() {
    return Err(FrontsError::AxisCountMismatch {
      expected: array.ndim(),
      found: desired.len(),
    });
  }

  let current: Vec<usize> = (0..array.ndim()).collect();
  let target = array
    .axes()
    .iter()
    .map(|axis| {
      desired
        .iter()
        .position(|name| *name == axis.name)
        .ok_or_else(|| FrontsError::AxisNotFound {
          name: axis.name.clone(),
          available: desired.iter().map(|s| s.to_string()).collect(),
        })
    })
    .collect::<Result<Vec<usize>>>()?;

  // `permuted_axes` wants, for each output position, the input axis feeding it.
  let mut permutation = vec![0usize; current.len()];
  for (&from, &to) in current.iter().zip(target.iter()) {
    permutation[to] = from;
  }

  let values = array
    .data()
    .view()
    .permuted_axes(permutation)
    .as_standard_layout()
    .into_owned();

  debug!(
    duration_us = started.elapsed().as_micros(),
    from = ?array.axis_names(),
    to = ?desired,
    "normalized axis order"
  );
  Ok(values)
}
