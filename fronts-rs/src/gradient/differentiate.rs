use crate::error::FrontsError;
use crate::error::Result;
use crate::labeled::LabeledArray;
use ndarray::ArrayD;
use ndarray::Axis;
use ndarray::Zip;

/*
  Derivative of a labeled array along a numeric coordinate axis.

  Interior points use second-order central differences that account for
  non-uniform coordinate spacing; the two end points use first-order
  one-sided differences.

  Parameters
  ----------
  array: LabeledArray
      Field to differentiate, any rank.

  axis: str
      Name of the axis to differentiate along. Its coordinates must be numeric
      and it must have at least two points.

  Returns
  -------
  A LabeledArray with the same axes, holding d(array)/d(axis coordinate).
*/
pub fn differentiate(array: &LabeledArray, axis: &str) -> Result<LabeledArray> {
  let index = array.axis_index(axis)?;
  let coords = array.axes()[index]
    .numeric_values()
    .ok_or_else(|| FrontsError::NonNumericCoordinate {
      name: axis.to_string(),
    })?;
  let n = coords.len();
  if n < 2 {
    return Err(FrontsError::AxisTooShort {
      name: axis.to_string(),
      len: n,
      min: 2,
    });
  }

  let mut out = ArrayD::<f64>::zeros(array.data().raw_dim());
  Zip::from(out.lanes_mut(Axis(index)))
    .and(array.data().lanes(Axis(index)))
    .par_for_each(|mut d, f| {
      d[0] = (f[1] - f[0]) / (coords[1] - coords[0]);
      for i in 1..n - 1 {
        let hs = coords[i] - coords[i - 1];
        let hd = coords[i + 1] - coords[i];
        d[i] = (hs * hs * f[i + 1] + (hd * hd - hs * hs) * f[i] - hd * hd * f[i - 1])
          / (hs * hd * (hd + hs));
      }
      d[n - 1] = (f[n - 1] - f[n - 2]) / (coords[n - 1] - coords[n - 2]);
    });

  LabeledArray::new(out, array.axes().to_vec())
}
