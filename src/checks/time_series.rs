//! Checks over time series data layout and timing

use super::registry::CheckRegistry;
use super::trait_def::{CheckDescriptor, Finding, Importance, Severity};
use crate::core::error::InspectorResult;
use crate::model::TimeSeries;
use crate::model::neurodata::TIME_SERIES;

/// Uncompressed datasets at least this large should be compressed
const COMPRESSION_THRESHOLD_BYTES: usize = 2_000_000;

/// Relative tolerance when comparing timestamp steps
const STEP_TOLERANCE: f64 = 1e-9;

pub fn register(registry: &mut CheckRegistry) -> InspectorResult<()> {
  use Importance::{BestPracticeViolation, Critical};

  let checks = [
    CheckDescriptor::new(
      "check_regular_timestamps",
      &TIME_SERIES,
      BestPracticeViolation,
      check_regular_timestamps,
    )
    .with_description("timestamps with a constant step should be a rate"),
    CheckDescriptor::new("check_data_orientation", &TIME_SERIES, Critical, check_data_orientation)
      .with_description("time runs along the first data dimension"),
    CheckDescriptor::new(
      "check_timestamps_match_first_dimension",
      &TIME_SERIES,
      Critical,
      check_timestamps_match_first_dimension,
    )
    .with_description("one timestamp per sample"),
    CheckDescriptor::new(
      "check_dataset_compression",
      &TIME_SERIES,
      BestPracticeViolation,
      check_dataset_compression,
    )
    .with_description("large datasets are compressed"),
  ];

  for check in checks {
    registry.register(check)?;
  }
  Ok(())
}

/// The common step of `timestamps`, if every step matches it
fn constant_step(timestamps: &[f64]) -> Option<f64> {
  let (&first, &last) = (timestamps.first()?, timestamps.last()?);
  if timestamps.len() < 3 {
    return None;
  }
  let step = (last - first) / (timestamps.len() - 1) as f64;
  if step <= 0.0 {
    return None;
  }
  let tolerance = STEP_TOLERANCE * step.max(1.0);
  timestamps
    .windows(2)
    .all(|pair| ((pair[1] - pair[0]) - step).abs() <= tolerance)
    .then_some(step)
}

fn check_regular_timestamps(series: &TimeSeries) -> Option<Finding> {
  let timestamps = series.timestamps.as_deref()?;
  let step = constant_step(timestamps)?;
  Some(
    Finding::new(format!(
      "TimeSeries appears to have a constant sampling rate. Consider specifying starting_time={:?} and rate={:?} \
       instead of timestamps.",
      timestamps[0],
      1.0 / step
    ))
    .with_severity(Severity::Low),
  )
}

fn check_data_orientation(series: &TimeSeries) -> Option<Finding> {
  let (&first, rest) = series.data_shape.split_first()?;
  rest.iter().any(|&dim| dim > first).then(|| {
    Finding::new(
      "Data may be in the wrong orientation. Time should be in the first dimension, and is usually the longest \
       dimension. Here, another dimension is longer.",
    )
  })
}

fn check_timestamps_match_first_dimension(series: &TimeSeries) -> Option<Finding> {
  let timestamps = series.timestamps.as_ref()?;
  let first = series.data_shape.first().copied().unwrap_or(0);
  (first != timestamps.len()).then(|| {
    Finding::new("The length of the first dimension of data does not match the length of timestamps.")
  })
}

fn check_dataset_compression(series: &TimeSeries) -> Option<Finding> {
  (!series.compressed && series.data_nbytes() >= COMPRESSION_THRESHOLD_BYTES).then(|| {
    Finding::new("Consider enabling compression when writing a large dataset.").with_severity(Severity::Low)
  })
}
