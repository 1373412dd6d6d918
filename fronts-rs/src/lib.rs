//! Pairwise I-metric extraction for oceanographic front detection.
//!
//! A Gaussian-mixture profile classifier (run elsewhere) labels every ocean
//! profile with its most probable clusters and an I-metric measuring how close
//! the top two candidates are. Fronts show up where that ambiguity is high.
//! This crate splits the I-metric by which pair of clusters is in contention,
//! giving one map per pair, and provides the gradient filters used to compare
//! those maps with horizontal gradients of the underlying fields.
//!
//! # Example
//!
//! ```ignore
//! use fronts_rs::{extract, LabeledArray};
//!
//! // ranks: axes (time, rank, lat, lon) in any storage order
//! // i_metric: axes (time, lat, lon)
//! let pairs = extract(&ranks, &i_metric, 0.05)?;
//! for (label, summary) in pairs.pair_labels().iter().zip(pairs.summaries()) {
//!     println!("{label}: {} points", summary.points);
//! }
//! ```
//!
//! # Public API
//!
//! * [`LabeledArray`] - Dense array with named axes and coordinates
//! * [`normalize`] - Reorder an array's storage to a named axis order
//! * [`PairIMetric`] / [`extract`] - Pairwise I-metric extraction
//! * [`PairAmbiguityArray`] - Extraction output with a `pair` axis
//! * [`FrontsConfig`] - Configuration parameters
//! * [`convolve_gradient`] / [`sobel_field`] / [`differentiate`] - Gradient helpers

pub mod config;
pub mod error;
pub mod labeled;
pub mod normalize;

pub use config::AxisNames;
pub use config::FrontsConfig;
pub use config::PairParams;
pub use config::RunParams;
pub use error::FrontsError;
pub use error::Result;
pub use gradient::convolve_gradient::convolve_gradient;
pub use gradient::convolve_gradient::gradient_magnitude;
pub use gradient::convolve_gradient::sobel_field;
pub use gradient::convolve_gradient::GradientKernel;
pub use gradient::differentiate::differentiate;
pub use labeled::Axis;
pub use labeled::CoordValue;
pub use labeled::LabeledArray;
pub use labeled::TimeValue;
pub use normalize::normalize;
pub use pairs::label_pair::enumerate_pairs;
pub use pairs::label_pair::label_universe;
pub use pairs::label_pair::LabelPair;
pub use pairs::label_pair::MAX_LABEL;
pub use pairs::pair_i_metric::extract;
pub use pairs::pair_i_metric::extract_with_config;
pub use pairs::pair_i_metric::PairIMetric;
pub use pairs::pair_output::PairAmbiguityArray;
pub use pairs::pair_output::PairSummary;
pub use pairs::sort_ranks::sort_ranks;

mod gradient;
mod pairs;
