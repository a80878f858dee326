use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use sightline::common::{InferenceDevice, ModelConfig};
use sightline::detector::OrtDetector;
use sightline::service::{router, Annotator, ServiceState};

/// Object-detection HTTP API.
#[derive(Debug, Parser)]
#[command(name = "sightline", version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "SIGHTLINE_ADDR", default_value = "0.0.0.0:8000")]
    addr: SocketAddr,

    /// Path to the ONNX model weights.
    #[arg(long, env = "SIGHTLINE_WEIGHTS", default_value = "models/yolov8n.onnx")]
    weights: String,

    /// Path to the ONNX Runtime shared library.
    #[arg(
        long,
        env = "SIGHTLINE_ORT_LIB",
        default_value = "onnxruntime/libonnxruntime.so"
    )]
    ort_lib: String,

    /// Class-label file, one label per line. Model metadata is used if unset.
    #[arg(long, env = "SIGHTLINE_LABELS")]
    labels: Option<String>,

    /// Inference device: cpu, cuda, tensorrt or coreml.
    #[arg(long, env = "SIGHTLINE_DEVICE", default_value = "cpu")]
    device: String,

    /// Device ordinal for accelerated providers.
    #[arg(long, env = "SIGHTLINE_DEVICE_ID", default_value_t = 0)]
    device_id: usize,

    /// Model input width.
    #[arg(long, env = "SIGHTLINE_INPUT_WIDTH", default_value_t = 640)]
    input_width: u32,

    /// Model input height.
    #[arg(long, env = "SIGHTLINE_INPUT_HEIGHT", default_value_t = 640)]
    input_height: u32,

    /// TrueType font for box labels; boxes are drawn without text if unset.
    #[arg(long, env = "SIGHTLINE_FONT")]
    font: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let args = Args::parse();

    let device = InferenceDevice::from_str(&args.device, args.device_id)
        .with_context(|| format!("unknown inference device: {}", args.device))?;

    let mut config = ModelConfig::new()
        .with_weights(&args.weights)
        .with_ort_lib(&args.ort_lib)
        .with_device(device)
        .with_input_size(args.input_width, args.input_height);
    if let Some(labels) = &args.labels {
        config = config.with_labels(labels);
    }

    let annotator = match &args.font {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read font file {path}"))?;
            Annotator::new(bytes)?
        }
        None => Annotator::without_font(),
    };

    // Startup barrier: the engine must be ready (or loading must fail
    // fatally) before the listener binds.
    let detector = sightline::init_detector(&config)?;
    let cuda_available = OrtDetector::cuda_available();
    let state = Arc::new(ServiceState::new(
        detector,
        annotator,
        config.model_name(),
        cuda_available,
    ));

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
