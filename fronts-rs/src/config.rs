use crate::error::FrontsError;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;

/// Names of the semantic axes the extractor looks for.
///
/// Model output keeps whatever dimension names the source dataset used, so
/// these are looked up by name rather than assumed by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisNames {
  /// Time axis.
  ///
  /// Default: "time"
  pub time: String,

  /// Axis holding the most probable cluster labels at each location.
  ///
  /// Default: "rank"
  pub rank: String,

  /// North-south axis.
  ///
  /// Default: "lat"
  pub lat: String,

  /// East-west axis.
  ///
  /// Default: "lon"
  pub lon: String,

  /// Axis added to the extraction output, one entry per kept label pair.
  ///
  /// Default: "pair"
  pub pair: String,
}

impl AxisNames {
  /// Dimension names used by BSOSE-i106 monthly output.
  pub fn bsose() -> Self {
    Self {
      lat: "YC".to_string(),
      lon: "XC".to_string(),
      ..Default::default()
    }
  }
}

impl Default for AxisNames {
  fn default() -> Self {
    Self {
      time: "time".to_string(),
      rank: "rank".to_string(),
      lat: "lat".to_string(),
      lon: "lon".to_string(),
      pair: "pair".to_string(),
    }
  }
}

/// Parameters of the pairwise I-metric extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairParams {
  /// Minimum ambiguity a location needs to be recorded for its label pair.
  ///
  /// The comparison is inclusive: a value equal to the threshold qualifies.
  ///
  /// Must be in range [0.0, 1.0].
  ///
  /// Default: 0.05
  pub threshold: f64,

  /// Evaluate label pairs on the rayon pool.
  ///
  /// Pairs are independent, so the output is identical either way.
  ///
  /// Default: true
  pub parallel: bool,
}

impl Default for PairParams {
  fn default() -> Self {
    Self {
      threshold: 0.05,
      parallel: true,
    }
  }
}

/// Parameters of the upstream classification run that produced the inputs.
///
/// None of these change the extraction itself; they identify a run and seed
/// the external profile classifier explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParams {
  /// Run identifier, also the fallback seed when it parses as an integer.
  ///
  /// Default: "010"
  pub run_name: String,

  /// Explicit seed for the classifier. Takes precedence over `run_name`.
  ///
  /// Default: None
  pub seed: Option<u64>,

  /// Number of Gaussian components fitted by the classifier.
  ///
  /// Must be >= 2.
  ///
  /// Default: 5
  pub k_clusters: usize,

  /// Number of principal components kept before clustering.
  ///
  /// Default: 3
  pub n_pcs: usize,

  /// Shallowest depth (m) of the profiles used for fitting.
  ///
  /// Default: 300.0
  pub min_depth: f64,

  /// Deepest depth (m) of the profiles used for fitting.
  ///
  /// Default: 2000.0
  pub max_depth: f64,
}

impl RunParams {
  /// Seed to hand to the classifier, if one can be determined.
  pub fn seed(&self) -> Option<u64> {
    self.seed.or_else(|| self.run_name.parse().ok())
  }
}

impl Default for RunParams {
  fn default() -> Self {
    Self {
      run_name: "010".to_string(),
      seed: None,
      k_clusters: 5,
      n_pcs: 3,
      min_depth: 300.0,
      max_depth: 2000.0,
    }
  }
}

/// Complete configuration.
///
/// # Example
///
/// ```ignore
/// use fronts_rs::config::{FrontsConfig, PairParams};
///
/// let config = FrontsConfig {
///     pair: PairParams {
///         threshold: 0.2,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// config.validate()?;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontsConfig {
  /// Axis naming.
  pub axes: AxisNames,

  /// Extraction parameters.
  pub pair: PairParams,

  /// Upstream run metadata.
  pub run: RunParams,
}

impl FrontsConfig {
  /// Check every section, including the upstream run metadata.
  pub fn validate(&self) -> Result<()> {
    self.validate_extraction()?;
    if self.run.run_name.is_empty() {
      return Err(FrontsError::InvalidConfig(
        "run_name must not be empty".to_string(),
      ));
    }
    if self.run.k_clusters < 2 {
      return Err(FrontsError::InvalidConfig(
        "k_clusters must be at least 2".to_string(),
      ));
    }
    if self.run.min_depth >= self.run.max_depth {
      return Err(FrontsError::InvalidConfig(format!(
        "min_depth {} must be less than max_depth {}",
        self.run.min_depth, self.run.max_depth
      )));
    }
    Ok(())
  }

  /// Check only the sections that pair extraction reads: axis names and pair parameters.
  pub fn validate_extraction(&self) -> Result<()> {
    let threshold = self.pair.threshold;
    if !(0.0..=1.0).contains(&threshold) {
      return Err(FrontsError::InvalidConfig(format!(
        "threshold {threshold} must be between 0.0 and 1.0"
      )));
    }
    let axes = &self.axes;
    let names = [&axes.time, &axes.rank, &axes.lat, &axes.lon, &axes.pair];
    for (i, name) in names.iter().enumerate() {
      if names[..i].contains(name) {
        return Err(FrontsError::DuplicateAxis {
          name: name.to_string(),
        });
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config_is_valid() {
    FrontsConfig::default().validate().unwrap();
  }

  #[test]
  fn seed_comes_from_run_name_unless_explicit() {
    let mut run = RunParams::default();
    assert_eq!(run.seed(), Some(10));
    run.seed = Some(7);
    assert_eq!(run.seed(), Some(7));
    run.seed = None;
    run.run_name = "spring-run".to_string();
    assert_eq!(run.seed(), None);
  }

  #[test]
  fn rejects_out_of_range_threshold() {
    let mut config = FrontsConfig::default();
    config.pair.threshold = 1.5;
    assert!(matches!(
      config.validate(),
      Err(FrontsError::InvalidConfig(_))
    ));
  }

  #[test]
  fn rejects_inverted_depths() {
    let mut config = FrontsConfig::default();
    config.run.min_depth = 2500.0;
    assert!(config.validate().is_err());
  }

  #[test]
  fn extraction_check_ignores_run_metadata() {
    let mut config = FrontsConfig::default();
    config.run.k_clusters = 1;
    config.run.min_depth = 2500.0;
    assert!(config.validate().is_err());
    config.validate_extraction().unwrap();
    config.pair.threshold = -0.1;
    assert!(config.validate_extraction().is_err());
  }

  #[test]
  fn rejects_colliding_axis_names() {
    let mut config = FrontsConfig::default();
    config.axes.lat = "time".to_string();
    assert!(matches!(
      config.validate(),
      Err(FrontsError::DuplicateAxis { .. })
    ));
  }

  #[test]
  fn bsose_names() {
    let axes = AxisNames::bsose();
    assert_eq!(axes.lat, "YC");
    assert_eq!(axes.lon, "XC");
    assert_eq!(axes.time, "time");
  }
}
