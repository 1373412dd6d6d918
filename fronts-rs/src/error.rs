use thiserror::Error;

/// Errors raised by array normalization, pair extraction and gradient helpers.
///
/// Every failure is a data-contract or programming error; nothing here is
/// transient, so callers are expected to surface these rather than retry.
#[derive(Debug, Error)]
pub enum FrontsError {
  /// A requested axis name does not exist on the array.
  #[error("axis `{name}` not found (available: {available:?})")]
  AxisNotFound { name: String, available: Vec<String> },

  /// An axis name appears more than once.
  #[error("axis `{name}` appears more than once")]
  DuplicateAxis { name: String },

  /// The number of axes does not match what the operation needs.
  #[error("expected {expected} axes but found {found}")]
  AxisCountMismatch { expected: usize, found: usize },

  /// An axis' coordinate list disagrees with the data extent at its position.
  #[error("axis `{name}` has {coords} coordinates but the data has length {len}")]
  CoordinateLength {
    name: String,
    coords: usize,
    len: usize,
  },

  /// Two arrays that must share an axis disagree on its coordinates.
  #[error("coordinates along axis `{axis}` differ between the rank and ambiguity arrays")]
  CoordinateMismatch { axis: String },

  /// An index along an axis is past its end.
  #[error("index {index} out of bounds for axis `{name}` of length {len}")]
  IndexOutOfBounds {
    name: String,
    index: usize,
    len: usize,
  },

  /// The rank axis holds fewer than the two labels needed for a pair.
  #[error("rank axis `{name}` has length {len}; at least 2 labels are required")]
  InsufficientRank { name: String, len: usize },

  /// A rank value too large to be a cluster label, usually an undecoded fill value.
  #[error("label {value} exceeds the largest supported cluster label")]
  LabelOutOfRange { value: f64 },

  #[error("threshold must be finite, got {0}")]
  InvalidThreshold(f64),

  /// Differentiation requires numeric coordinates.
  #[error("axis `{name}` does not carry numeric coordinates")]
  NonNumericCoordinate { name: String },

  #[error("axis `{name}` has length {len}; at least {min} points are required")]
  AxisTooShort { name: String, len: usize, min: usize },

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  #[error(transparent)]
  Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, FrontsError>;
