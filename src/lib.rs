pub mod common;
pub mod detector;
pub mod service;
mod utils;

use std::sync::Arc;

use crate::common::ModelConfig;
use crate::detector::{Detector, OrtDetector};

/// Build the detection engine described by `config`.
///
/// Blocks until the ORT session is committed and warmed up. Callers bind the
/// listener only after this returns, so no request can observe a half-loaded
/// model.
pub fn init_detector(config: &ModelConfig) -> anyhow::Result<Arc<dyn Detector>> {
    tracing::info!("{}", config.summary());
    let detector = OrtDetector::new(config)?;
    Ok(Arc::new(detector))
}
