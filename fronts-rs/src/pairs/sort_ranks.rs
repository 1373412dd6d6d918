use ndarray::Array3;
use ndarray::ArrayD;
use ndarray::ArrayViewD;
use ndarray::Axis;
use ndarray::Ix3;
use ndarray::ShapeError;
use ndarray::Zip;
use std::cmp::Ordering;

/// Ascending order with missing values last, matching numpy's `sort`.
#[inline]
fn nan_last(a: &f64, b: &f64) -> Ordering {
  match (a.is_nan(), b.is_nan()) {
    (true, true) => Ordering::Equal,
    (true, false) => Ordering::Greater,
    (false, true) => Ordering::Less,
    (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
  }
}

/*
  Sort every lane along `rank_axis` ascending, in place.

  Classifier output lists labels by probability; sorting by label value makes
  (3, 1) and (1, 3) identical so that pairs compare canonically. Sorting is
  idempotent.
*/
pub fn sort_ranks(ranks: &mut ArrayD<f64>, rank_axis: usize) {
  let n_rank = ranks.len_of(Axis(rank_axis));
  Zip::from(ranks.lanes_mut(Axis(rank_axis))).par_for_each(|mut lane| {
    // Lanes along a non-trailing axis are strided, so sort through a buffer.
    let mut buf: Vec<f64> = Vec::with_capacity(n_rank);
    buf.extend(lane.iter().copied());
    buf.sort_by(nan_last);
    for (dst, src) in lane.iter_mut().zip(buf) {
      *dst = src;
    }
  });
}

/// Split a (time, rank, lat, lon) array into its first and second rank planes.
pub fn top_two(sorted: ArrayViewD<'_, f64>) -> Result<(Array3<f64>, Array3<f64>), ShapeError> {
  let first = sorted
    .index_axis(Axis(1), 0)
    .into_dimensionality::<Ix3>()?
    .to_owned();
  let second = sorted
    .index_axis(Axis(1), 1)
    .into_dimensionality::<Ix3>()?
    .to_owned();
  Ok((first, second))
}
