use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InferenceDevice {
    #[default]
    CPU,
    CUDA(usize),
    TensorRT(usize),
    CoreML(usize),
}

impl InferenceDevice {
    pub fn from_str(device: &str, device_id: usize) -> Option<Self> {
        match device.to_lowercase().as_str() {
            "cpu" => Some(InferenceDevice::CPU),
            "cuda" => Some(InferenceDevice::CUDA(device_id)),
            "tensorrt" => Some(InferenceDevice::TensorRT(device_id)),
            "coreml" => Some(InferenceDevice::CoreML(device_id)),
            _ => None,
        }
    }

    /// Lowercase identifier used on the wire (health reports, logs).
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceDevice::CPU => "cpu",
            InferenceDevice::CUDA(_) => "cuda",
            InferenceDevice::TensorRT(_) => "tensorrt",
            InferenceDevice::CoreML(_) => "coreml",
        }
    }

}

impl fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceDevice::CPU => write!(f, "CPU"),
            InferenceDevice::CUDA(id) => write!(f, "CUDA({id})"),
            InferenceDevice::TensorRT(id) => write!(f, "TensorRT({id})"),
            InferenceDevice::CoreML(id) => write!(f, "CoreML({id})"),
        }
    }
}
