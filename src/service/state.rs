use std::sync::Arc;

use crate::common::InferenceDevice;
use crate::detector::Detector;
use crate::service::{Annotator, ServiceError};

/// Process-wide state assembled once at startup and shared read-only with
/// every request handler. No handler mutates it; the engine serializes its
/// own device access if the backend requires that.
pub struct ServiceState {
    detector: Option<Arc<dyn Detector>>,
    pub annotator: Annotator,
    pub model_name: String,
    pub device: InferenceDevice,
    pub cuda_available: bool,
}

impl ServiceState {
    pub fn new(
        detector: Arc<dyn Detector>,
        annotator: Annotator,
        model_name: String,
        cuda_available: bool,
    ) -> Self {
        let device = detector.device();
        Self {
            detector: Some(detector),
            annotator,
            model_name,
            device,
            cuda_available,
        }
    }

    /// State for a process whose model never loaded. Handlers keep answering
    /// status probes; detection work is refused with `ModelNotReady`.
    pub fn without_detector(model_name: String) -> Self {
        Self {
            detector: None,
            annotator: Annotator::without_font(),
            model_name,
            device: InferenceDevice::CPU,
            cuda_available: false,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.detector.is_some()
    }

    pub fn detector(&self) -> Result<&Arc<dyn Detector>, ServiceError> {
        self.detector.as_ref().ok_or(ServiceError::ModelNotReady)
    }
}
