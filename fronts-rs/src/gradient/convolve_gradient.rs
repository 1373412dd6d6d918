use crate::error::FrontsError;
use crate::error::Result;
use crate::labeled::LabeledArray;
use ndarray::Array2;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndarray::IxDyn;
use ndarray::Zip;
use serde::Deserialize;
use serde::Serialize;

/// 3x3 edge filter used to estimate horizontal gradients of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientKernel {
  Sobel,
  Scharr,
}

impl GradientKernel {
  /// (x, y) kernels, applied by convolution.
  pub fn weights(self) -> ([[f64; 3]; 3], [[f64; 3]; 3]) {
    match self {
      GradientKernel::Sobel => (
        [[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]],
        [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]],
      ),
      GradientKernel::Scharr => (
        [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]],
        [[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]],
      ),
    }
  }
}

/// Mirror an out-of-range index back into `0..n`, repeating the edge sample.
#[inline(always)]
fn reflect(i: isize, n: usize) -> usize {
  let n = n as isize;
  let mut i = i;
  loop {
    if i < 0 {
      i = -i - 1;
    } else if i >= n {
      i = 2 * n - i - 1;
    } else {
      return i as usize;
    }
  }
}

/*
  Convolve a 2-D field with the x and y kernels of `kernel`.

  Output has the input's shape; samples beyond the border are taken from the
  symmetric reflection of the field (edge included). Missing values propagate
  to every output cell whose stencil touches them.

  Returns
  -------
  (gx, gy): gradient estimates along the second and first axes.
*/
pub fn convolve_gradient(values: ArrayView2<f64>, kernel: GradientKernel) -> (Array2<f64>, Array2<f64>) {
  let (ny, nx) = values.dim();
  let (kx, ky) = kernel.weights();
  let mut gx = Array2::<f64>::zeros((ny, nx));
  let mut gy = Array2::<f64>::zeros((ny, nx));
  if ny == 0 || nx == 0 {
    return (gx, gy);
  }

  Zip::indexed(&mut gx)
    .and(&mut gy)
    .for_each(|(i, j), out_x, out_y| {
      let mut sx = 0.0;
      let mut sy = 0.0;
      for m in 0..3 {
        let r = reflect(i as isize + 1 - m as isize, ny);
        for n in 0..3 {
          let c = reflect(j as isize + 1 - n as isize, nx);
          let v = values[(r, c)];
          sx += kx[m][n] * v;
          sy += ky[m][n] * v;
        }
      }
      *out_x = sx;
      *out_y = sy;
    });

  (gx, gy)
}

/// Element-wise `sqrt(gx^2 + gy^2)`.
pub fn gradient_magnitude(gx: &Array2<f64>, gy: &Array2<f64>) -> Array2<f64> {
  Zip::from(gx).and(gy).map_collect(|&x, &y| x.hypot(y))
}

/// Apply `convolve_gradient` to every (y, x) plane of a labeled array.
///
/// Any other axes (time, principal component, ...) are iterated over; the
/// returned arrays keep the input's axes and coordinates.
pub fn sobel_field(
  array: &LabeledArray,
  y_axis: &str,
  x_axis: &str,
  kernel: GradientKernel,
) -> Result<(LabeledArray, LabeledArray)> {
  if y_axis == x_axis {
    return Err(FrontsError::DuplicateAxis {
      name: y_axis.to_string(),
    });
  }
  array.axis_index(y_axis)?;
  array.axis_index(x_axis)?;

  let original = array.axis_names();
  let mut order: Vec<&str> = original
    .iter()
    .copied()
    .filter(|n| *n != y_axis && *n != x_axis)
    .collect();
  order.push(y_axis);
  order.push(x_axis);

  let moved = array.transpose_to(&order)?;
  let shape = moved.shape().to_vec();
  let ny = shape[shape.len() - 2];
  let nx = shape[shape.len() - 1];
  let planes = shape[..shape.len() - 2].iter().product::<usize>();
  let (data, axes) = moved.into_parts();
  let data = data.into_shape_with_order((planes, ny, nx))?;

  let mut gx = Array3::<f64>::zeros((planes, ny, nx));
  let mut gy = Array3::<f64>::zeros((planes, ny, nx));
  Zip::from(gx.axis_iter_mut(Axis(0)))
    .and(gy.axis_iter_mut(Axis(0)))
    .and(data.axis_iter(Axis(0)))
    .par_for_each(|mut out_x, mut out_y, plane| {
      let (px, py) = convolve_gradient(plane, kernel);
      out_x.assign(&px);
      out_y.assign(&py);
    });

  let gx = LabeledArray::new(gx.into_shape_with_order(IxDyn(&shape))?, axes.clone())?;
  let gy = LabeledArray::new(gy.into_shape_with_order(IxDyn(&shape))?, axes)?;
  Ok((gx.transpose_to(&original)?, gy.transpose_to(&original)?))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::labeled::Axis as LabeledAxis;
  use ndarray::ArrayD;

  fn ramp_x(ny: usize, nx: usize, slope: f64) -> Array2<f64> {
    Array2::from_shape_fn((ny, nx), |(_, j)| slope * j as f64)
  }

  #[test]
  fn sobel_on_ramp() {
    let field = ramp_x(5, 6, 2.0);
    let (gx, gy) = convolve_gradient(field.view(), GradientKernel::Sobel);
    // Interior: 4 * (f(j+1) - f(j-1)) = 4 * 2 * slope.
    assert_eq!(gx[(2, 3)], 16.0);
    // Left edge reflects onto itself: 4 * (f(1) - f(0)).
    assert_eq!(gx[(2, 0)], 8.0);
    assert_eq!(gx[(2, 5)], 8.0);
    assert!(gy.iter().all(|&v| v == 0.0));
  }

  #[test]
  fn sobel_y_on_ramp() {
    let field = Array2::from_shape_fn((4, 4), |(i, _)| i as f64);
    let (gx, gy) = convolve_gradient(field.view(), GradientKernel::Sobel);
    assert!(gx.iter().all(|&v| v == 0.0));
    assert_eq!(gy[(1, 1)], 8.0);
  }

  #[test]
  fn scharr_has_opposite_sign_and_larger_weights() {
    let field = ramp_x(4, 5, 1.0);
    let (gx, _) = convolve_gradient(field.view(), GradientKernel::Scharr);
    // -(3 + 10 + 3) * (f(j+1) - f(j-1))
    assert_eq!(gx[(1, 2)], -32.0);
  }

  #[test]
  fn constant_field_has_no_gradient() {
    let field = Array2::from_elem((3, 3), 7.5);
    for kernel in [GradientKernel::Sobel, GradientKernel::Scharr] {
      let (gx, gy) = convolve_gradient(field.view(), kernel);
      assert!(gradient_magnitude(&gx, &gy).iter().all(|&v| v == 0.0));
    }
  }

  #[test]
  fn single_cell_field() {
    let field = Array2::from_elem((1, 1), 3.0);
    let (gx, gy) = convolve_gradient(field.view(), GradientKernel::Sobel);
    assert_eq!(gx[(0, 0)], 0.0);
    assert_eq!(gy[(0, 0)], 0.0);
  }

  #[test]
  fn missing_values_spread_to_neighbours() {
    let mut field = Array2::from_elem((5, 5), 1.0);
    field[(2, 2)] = f64::NAN;
    let (gx, _) = convolve_gradient(field.view(), GradientKernel::Sobel);
    assert!(gx[(1, 1)].is_nan());
    assert!(!gx[(0, 0)].is_nan());
  }

  #[test]
  fn field_keeps_axis_order() {
    // Stored as (lon, pca, lat) on purpose.
    let data = ArrayD::from_shape_fn(IxDyn(&[6, 2, 4]), |ix| (ix[1] + 1) as f64 * ix[0] as f64);
    let array = LabeledArray::new(
      data,
      vec![
        LabeledAxis::range("XC", 6),
        LabeledAxis::range("pca", 2),
        LabeledAxis::range("YC", 4),
      ],
    )
    .unwrap();
    let (gx, gy) = sobel_field(&array, "YC", "XC", GradientKernel::Sobel).unwrap();
    assert_eq!(gx.axis_names(), vec!["XC", "pca", "YC"]);
    assert_eq!(gx.shape(), &[6, 2, 4]);
    // Interior x-gradient is 8 * slope, slope = pca + 1.
    assert_eq!(gx.data()[[3, 0, 2]], 8.0);
    assert_eq!(gx.data()[[3, 1, 2]], 16.0);
    assert!(gy.data().iter().all(|&v| v == 0.0));
  }

  #[test]
  fn field_requires_distinct_axes() {
    let data = ArrayD::zeros(IxDyn(&[2, 2]));
    let array = LabeledArray::from_dims(data, &["YC", "XC"]).unwrap();
    assert!(sobel_field(&array, "YC", "YC", GradientKernel::Sobel).is_err());
    assert!(matches!(
      sobel_field(&array, "lat", "XC", GradientKernel::Sobel),
      Err(FrontsError::AxisNotFound { .. })
    ));
  }
}
