use std::path::Path;

use crate::common::InferenceDevice;

/// Startup configuration for the detection engine.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub weights_path: String,
    pub ort_lib_path: String,
    pub labels_path: Option<String>,
    pub device: InferenceDevice,
    pub input_width: u32,
    pub input_height: u32,
    pub iou_threshold: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_path: String::new(),
            ort_lib_path: String::new(),
            labels_path: None,
            device: InferenceDevice::CPU,
            input_width: 640,
            input_height: 640,
            iou_threshold: 0.45,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_weights(mut self, weights_path: &str) -> Self {
        self.weights_path = weights_path.to_string();
        self
    }

    pub fn with_ort_lib(mut self, ort_lib_path: &str) -> Self {
        self.ort_lib_path = ort_lib_path.to_string();
        self
    }

    pub fn with_labels(mut self, labels_path: &str) -> Self {
        self.labels_path = Some(labels_path.to_string());
        self
    }

    pub fn with_device(mut self, device: InferenceDevice) -> Self {
        self.device = device;
        self
    }

    pub fn with_input_size(mut self, width: u32, height: u32) -> Self {
        self.input_width = width;
        self.input_height = height;
        self
    }

    pub fn with_iou(mut self, iou_threshold: f32) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    /// Model identifier reported by the status endpoints: the weights file
    /// stem, or "unknown" when no weights are configured.
    pub fn model_name(&self) -> String {
        Path::new(&self.weights_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "Weights File Path: {}\n\
             Labels Path: {}\n\
             OnnxRuntime Lib Path: {}\n\
             Inference Device: {}\n\
             Model Input Resolution: {}x{}",
            self.weights_path,
            self.labels_path.as_deref().unwrap_or("(model metadata)"),
            self.ort_lib_path,
            self.device,
            self.input_width,
            self.input_height,
        )
    }
}
