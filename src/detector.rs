mod labels;
mod ort_detector;
mod postprocess;
mod preprocess;

pub use ort_detector::OrtDetector;

use image::RgbImage;

use crate::common::{InferenceDevice, RawDetection};

/// Contract between the request pipeline and the detection engine.
///
/// Implementations return only detections meeting `confidence`; ordering is
/// engine-defined and not re-sorted downstream. Engines are immutable after
/// construction and shared read-only across concurrent requests.
pub trait Detector: Send + Sync {
    /// Run the model on one RGB image.
    fn detect(&self, image: &RgbImage, confidence: f32) -> anyhow::Result<Vec<RawDetection>>;

    /// Class-table lookup for a model class id.
    fn class_name(&self, class_id: usize) -> Option<&str>;

    /// Device the engine ended up bound to after provider registration.
    fn device(&self) -> InferenceDevice;
}
