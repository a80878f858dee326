use anyhow::Result;
use image::RgbImage;
use ort::{
    inputs, CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider,
    ExecutionProvider, GraphOptimizationLevel, Session, SessionBuilder, SessionOutputs,
    TensorRTExecutionProvider,
};

use crate::common::{InferenceDevice, ModelConfig, RawDetection};
use crate::detector::{labels, postprocess, preprocess, Detector};
use crate::utils;

// Class count fallback when the model carries no metadata and no labels file
// is configured (COCO).
const DEFAULT_NUM_CLASSES: usize = 80;

/// ONNX Runtime detection engine. Built once during startup, immutable and
/// shared read-only afterwards; `Session::run` takes `&self`, so concurrent
/// requests need no locking.
pub struct OrtDetector {
    session: Session,
    input_name: String,
    output_name: String,
    class_names: Vec<String>,
    device: InferenceDevice,
    input_width: u32,
    input_height: u32,
    iou_threshold: f32,
}

impl OrtDetector {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        // Dynamically load the ONNX Runtime library from the configured path.
        ort::init_from(&config.ort_lib_path).commit()?;

        let builder = Session::builder()?;
        let device = Self::register_device(&builder, config.device)?;

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.weights_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| anyhow::anyhow!("model graph declares no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| anyhow::anyhow!("model graph declares no outputs"))?;

        let class_names = Self::resolve_class_names(&session, config)?;

        let detector = Self {
            session,
            input_name,
            output_name,
            class_names,
            device,
            input_width: config.input_width,
            input_height: config.input_height,
            iou_threshold: config.iou_threshold,
        };

        // Warm-up pass so the first real request does not pay first-run
        // initialization costs inside the execution provider.
        detector.detect(
            &RgbImage::new(config.input_width, config.input_height),
            1.0,
        )?;

        tracing::info!(
            device = device.as_str(),
            model = %config.model_name(),
            classes = detector.class_names.len(),
            "detection engine ready"
        );

        Ok(detector)
    }

    /// Whether a CUDA execution provider could be registered on this host.
    pub fn cuda_available() -> bool {
        CUDAExecutionProvider::default()
            .is_available()
            .unwrap_or(false)
    }

    fn register_device(
        builder: &SessionBuilder,
        requested: InferenceDevice,
    ) -> Result<InferenceDevice> {
        match Self::try_register(builder, requested) {
            Ok(()) => Ok(requested),
            Err(err) if requested != InferenceDevice::CPU => {
                tracing::warn!("{err}, using cpu");
                Self::try_register(builder, InferenceDevice::CPU)?;
                Ok(InferenceDevice::CPU)
            }
            Err(err) => Err(err),
        }
    }

    fn try_register(builder: &SessionBuilder, device: InferenceDevice) -> Result<()> {
        match device {
            InferenceDevice::CPU => {
                let ep = CPUExecutionProvider::default();
                match ep.register(builder) {
                    Ok(_) => Ok(()),
                    Err(err) => anyhow::bail!("CPU initialization failed: {err}"),
                }
            }
            InferenceDevice::CUDA(device_id) => {
                let ep = CUDAExecutionProvider::default().with_device_id(device_id as i32);
                if !ep.is_available()? {
                    anyhow::bail!("CUDA execution provider not available");
                }
                match ep.register(builder) {
                    Ok(_) => Ok(()),
                    Err(err) => anyhow::bail!("CUDA initialization failed: {err}"),
                }
            }
            InferenceDevice::TensorRT(device_id) => {
                let ep = TensorRTExecutionProvider::default().with_device_id(device_id as i32);
                if !ep.is_available()? {
                    anyhow::bail!("TensorRT execution provider not available");
                }
                match ep.register(builder) {
                    Ok(_) => Ok(()),
                    Err(err) => anyhow::bail!("TensorRT initialization failed: {err}"),
                }
            }
            InferenceDevice::CoreML(_) => {
                let ep = CoreMLExecutionProvider::default();
                if !ep.is_available()? {
                    anyhow::bail!("CoreML execution provider not available");
                }
                match ep.register(builder) {
                    Ok(_) => Ok(()),
                    Err(err) => anyhow::bail!("CoreML initialization failed: {err}"),
                }
            }
        }
    }

    /// Class table: model metadata first, then the configured labels file,
    /// then indexed placeholders.
    fn resolve_class_names(session: &Session, config: &ModelConfig) -> Result<Vec<String>> {
        if let Ok(metadata) = session.metadata() {
            if let Some(names) = metadata.custom("names").ok().flatten() {
                let parsed = labels::parse_metadata_names(&names);
                if !parsed.is_empty() {
                    return Ok(parsed);
                }
            }
        }

        if let Some(path) = &config.labels_path {
            let names = utils::file_to_vec(path)?;
            if names.is_empty() {
                anyhow::bail!("labels file {path} is empty");
            }
            return Ok(names);
        }

        tracing::warn!("no class names in model metadata or labels file, using placeholders");
        Ok(labels::placeholder_names(DEFAULT_NUM_CLASSES))
    }
}

impl Detector for OrtDetector {
    fn detect(&self, image: &RgbImage, confidence: f32) -> Result<Vec<RawDetection>> {
        let input = preprocess::image_to_tensor(image, self.input_width, self.input_height);

        let outputs: SessionOutputs =
            self.session.run(inputs![self.input_name.as_str() => input.view()]?)?;
        let output = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()?
            .into_owned();

        postprocess::decode_predictions(
            &output,
            (self.input_width, self.input_height),
            image.dimensions(),
            confidence,
            self.iou_threshold,
        )
    }

    fn class_name(&self, class_id: usize) -> Option<&str> {
        self.class_names.get(class_id).map(String::as_str)
    }

    fn device(&self) -> InferenceDevice {
        self.device
    }
}
