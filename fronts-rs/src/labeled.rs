use crate::error::FrontsError;
use crate::error::Result;
use crate::normalize::normalize;
use chrono::NaiveDateTime;
use ndarray::ArrayD;
use ndarray::Axis as NdAxis;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// A time coordinate, resolved once when the array is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeValue {
  /// Calendar timestamp, as decoded from CF time units.
  Calendar(NaiveDateTime),
  /// Raw numeric offset from an epoch the caller knows about.
  Offset(f64),
}

impl TimeValue {
  /// Short human readable label for figure titles.
  pub fn title(&self) -> String {
    match self {
      TimeValue::Calendar(t) => t.format("%Y-%m-%d").to_string(),
      TimeValue::Offset(v) => format!("{v}"),
    }
  }
}

impl fmt::Display for TimeValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.title())
  }
}

/// One entry of an axis' coordinate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoordValue {
  Number(f64),
  Label(String),
  Time(TimeValue),
}

impl CoordValue {
  pub fn as_number(&self) -> Option<f64> {
    match self {
      CoordValue::Number(v) => Some(*v),
      CoordValue::Time(TimeValue::Offset(v)) => Some(*v),
      _ => None,
    }
  }

  /// Equality that treats two NaN numbers with the same bit pattern as equal.
  pub fn same_as(&self, other: &Self) -> bool {
    match (self, other) {
      (CoordValue::Number(a), CoordValue::Number(b))
      | (CoordValue::Time(TimeValue::Offset(a)), CoordValue::Time(TimeValue::Offset(b))) => {
        a.to_bits() == b.to_bits()
      }
      _ => self == other,
    }
  }
}

impl fmt::Display for CoordValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CoordValue::Number(v) => write!(f, "{v}"),
      CoordValue::Label(s) => f.write_str(s),
      CoordValue::Time(t) => t.fmt(f),
    }
  }
}

/// A named axis and its ordered coordinate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
  pub name: String,
  pub coords: Vec<CoordValue>,
}

impl Axis {
  pub fn new(name: impl Into<String>, coords: Vec<CoordValue>) -> Self {
    Self {
      name: name.into(),
      coords,
    }
  }

  pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
    Self::new(name, values.into_iter().map(CoordValue::Number).collect())
  }

  pub fn labels<S: Into<String>>(name: impl Into<String>, labels: impl IntoIterator<Item = S>) -> Self {
    Self::new(
      name,
      labels
        .into_iter()
        .map(|s| CoordValue::Label(s.into()))
        .collect(),
    )
  }

  pub fn times(name: impl Into<String>, times: impl IntoIterator<Item = TimeValue>) -> Self {
    Self::new(name, times.into_iter().map(CoordValue::Time).collect())
  }

  /// Axis with coordinates `0..len`, used when the source carries no coordinate variable.
  pub fn range(name: impl Into<String>, len: usize) -> Self {
    Self::numeric(name, (0..len).map(|i| i as f64))
  }

  pub fn len(&self) -> usize {
    self.coords.len()
  }

  pub fn is_empty(&self) -> bool {
    self.coords.is_empty()
  }

  /// Whether both axes carry the same coordinates, compared with `CoordValue::same_as`.
  pub fn same_coords(&self, other: &Axis) -> bool {
    self.coords.len() == other.coords.len()
      && self.coords.iter().zip(&other.coords).all(|(a, b)| a.same_as(b))
  }

  /// Coordinates as numbers, if every entry is numeric.
  pub fn numeric_values(&self) -> Option<Vec<f64>> {
    self.coords.iter().map(CoordValue::as_number).collect()
  }
}

/// A dense N-dimensional array with named axes and per-axis coordinates.
///
/// The data's dimensionality always equals the number of axes, each axis'
/// coordinate count matches the data extent at its position, and axis names
/// are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledArray {
  data: ArrayD<f64>,
  axes: Vec<Axis>,
}

impl LabeledArray {
  pub fn new(data: ArrayD<f64>, axes: Vec<Axis>) -> Result<Self> {
    if data.ndim() != axes.len() {
      return Err(FrontsError::AxisCountMismatch {
        expected: data.ndim(),
        found: axes.len(),
      });
    }
    for (i, axis) in axes.iter().enumerate() {
      if axes[..i].iter().any(|other| other.name == axis.name) {
        return Err(FrontsError::DuplicateAxis {
          name: axis.name.clone(),
        });
      }
      let len = data.len_of(NdAxis(i));
      if axis.len() != len {
        return Err(FrontsError::CoordinateLength {
          name: axis.name.clone(),
          coords: axis.len(),
          len,
        });
      }
    }
    Ok(Self { data, axes })
  }

  /// Build from data and axis names, with `0..n` coordinates on every axis.
  pub fn from_dims(data: ArrayD<f64>, names: &[&str]) -> Result<Self> {
    if data.ndim() != names.len() {
      return Err(FrontsError::AxisCountMismatch {
        expected: data.ndim(),
        found: names.len(),
      });
    }
    let axes = names
      .iter()
      .zip(data.shape())
      .map(|(name, &len)| Axis::range(*name, len))
      .collect();
    Self::new(data, axes)
  }

  pub fn data(&self) -> &ArrayD<f64> {
    &self.data
  }

  pub fn into_data(self) -> ArrayD<f64> {
    self.data
  }

  pub fn into_parts(self) -> (ArrayD<f64>, Vec<Axis>) {
    (self.data, self.axes)
  }

  pub fn axes(&self) -> &[Axis] {
    &self.axes
  }

  pub fn axis_names(&self) -> Vec<&str> {
    self.axes.iter().map(|a| a.name.as_str()).collect()
  }

  pub fn shape(&self) -> &[usize] {
    self.data.shape()
  }

  pub fn ndim(&self) -> usize {
    self.data.ndim()
  }

  pub fn axis_index(&self, name: &str) -> Result<usize> {
    self
      .axes
      .iter()
      .position(|a| a.name == name)
      .ok_or_else(|| self.not_found(name))
  }

  pub fn axis(&self, name: &str) -> Result<&Axis> {
    Ok(&self.axes[self.axis_index(name)?])
  }

  pub fn len_of(&self, name: &str) -> Result<usize> {
    Ok(self.axis(name)?.len())
  }

  /// Select a single position along `name`, dropping that axis.
  pub fn isel(&self, name: &str, index: usize) -> Result<Self> {
    let i = self.axis_index(name)?;
    let len = self.axes[i].len();
    if index >= len {
      return Err(FrontsError::IndexOutOfBounds {
        name: name.to_string(),
        index,
        len,
      });
    }
    let data = self.data.index_axis(NdAxis(i), index).to_owned();
    let mut axes = self.axes.clone();
    axes.remove(i);
    Ok(Self { data, axes })
  }

  /// Drop every length-1 axis whose name is not in `keep`.
  pub fn squeeze_except(self, keep: &[&str]) -> Self {
    let Self { mut data, mut axes } = self;
    for i in (0..axes.len()).rev() {
      if axes[i].len() == 1 && !keep.contains(&axes[i].name.as_str()) {
        data = data.index_axis_move(NdAxis(i), 0);
        axes.remove(i);
      }
    }
    Self { data, axes }
  }

  /// Reorder data and axis metadata together so the axes follow `order`.
  pub fn transpose_to(&self, order: &[&str]) -> Result<Self> {
    let data = normalize(self, order)?;
    let axes = order
      .iter()
      .map(|name| self.axis(name).cloned())
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { data, axes })
  }

  /// Number of non-missing entries.
  pub fn count_finite(&self) -> usize {
    self.data.iter().filter(|v| !v.is_nan()).count()
  }

  pub(crate) fn not_found(&self, name: &str) -> FrontsError {
    FrontsError::AxisNotFound {
      name: name.to_string(),
      available: self.axes.iter().map(|a| a.name.clone()).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use ndarray::ArrayD;
  use ndarray::IxDyn;

  fn cube() -> LabeledArray {
    let data = ArrayD::from_shape_fn(IxDyn(&[2, 3, 4]), |ix| (ix[0] * 100 + ix[1] * 10 + ix[2]) as f64);
    LabeledArray::from_dims(data, &["time", "lat", "lon"]).unwrap()
  }

  #[test]
  fn rejects_wrong_axis_count() {
    let data = ArrayD::<f64>::zeros(IxDyn(&[2, 3]));
    let err = LabeledArray::from_dims(data, &["time"]).unwrap_err();
    assert!(matches!(
      err,
      FrontsError::AxisCountMismatch {
        expected: 2,
        found: 1
      }
    ));
  }

  #[test]
  fn rejects_duplicate_names() {
    let data = ArrayD::<f64>::zeros(IxDyn(&[2, 3]));
    let err = LabeledArray::from_dims(data, &["lat", "lat"]).unwrap_err();
    assert!(matches!(err, FrontsError::DuplicateAxis { .. }));
  }

  #[test]
  fn rejects_coordinate_length_mismatch() {
    let data = ArrayD::<f64>::zeros(IxDyn(&[2, 3]));
    let err = LabeledArray::new(data, vec![Axis::range("lat", 2), Axis::range("lon", 4)]).unwrap_err();
    assert!(matches!(
      err,
      FrontsError::CoordinateLength {
        coords: 4,
        len: 3,
        ..
      }
    ));
  }

  #[test]
  fn isel_drops_axis() {
    let arr = cube();
    let slice = arr.isel("lat", 2).unwrap();
    assert_eq!(slice.axis_names(), vec!["time", "lon"]);
    assert_eq!(slice.data()[[1, 3]], 123.0);
    assert!(matches!(
      arr.isel("lat", 3),
      Err(FrontsError::IndexOutOfBounds { index: 3, len: 3, .. })
    ));
    assert!(matches!(
      arr.isel("depth", 0),
      Err(FrontsError::AxisNotFound { .. })
    ));
  }

  #[test]
  fn squeeze_keeps_named_singletons() {
    let data = ArrayD::from_elem(IxDyn(&[1, 1, 3]), 0.5);
    let arr = LabeledArray::from_dims(data, &["time", "Imetric", "lon"]).unwrap();
    let squeezed = arr.squeeze_except(&["time", "lon"]);
    assert_eq!(squeezed.axis_names(), vec!["time", "lon"]);
    assert_eq!(squeezed.shape(), &[1, 3]);
  }

  #[test]
  fn transpose_moves_coordinates_with_data() {
    let arr = cube();
    let t = arr.transpose_to(&["lon", "time", "lat"]).unwrap();
    assert_eq!(t.shape(), &[4, 2, 3]);
    assert_eq!(t.axis_names(), vec!["lon", "time", "lat"]);
    assert_eq!(t.data()[[3, 1, 2]], 123.0);
    assert_eq!(t.axis("lon").unwrap().len(), 4);
  }

  #[test]
  fn time_titles() {
    let t = NaiveDate::from_ymd_opt(2010, 3, 1)
      .unwrap()
      .and_hms_opt(0, 0, 0)
      .unwrap();
    assert_eq!(TimeValue::Calendar(t).title(), "2010-03-01");
    assert_eq!(TimeValue::Offset(42.5).title(), "42.5");
    assert_eq!(CoordValue::Time(TimeValue::Offset(3.0)).as_number(), Some(3.0));
    assert_eq!(CoordValue::Label("1 to 2".into()).as_number(), None);
  }

  #[test]
  fn nan_coordinates_compare_by_bits() {
    let a = Axis::numeric("lat", [-60.0, f64::NAN]);
    assert_ne!(a, a.clone());
    assert!(a.same_coords(&a.clone()));
    assert!(!a.same_coords(&Axis::numeric("lat", [-60.0, -59.5])));
    assert!(!a.same_coords(&Axis::numeric("lat", [-60.0])));
  }

  #[test]
  fn count_finite_skips_missing() {
    let data = ArrayD::from_shape_vec(IxDyn(&[3]), vec![1.0, f64::NAN, 0.0]).unwrap();
    let arr = LabeledArray::from_dims(data, &["lon"]).unwrap();
    assert_eq!(arr.count_finite(), 2);
  }
}
