use std::env;

use sightline::common::{InferenceDevice, ModelConfig};
use sightline::detector::{Detector, OrtDetector};

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[test]
#[ignore = "requires ONNX Runtime and model weights on disk"]
fn engine_detects_on_real_weights() {
    let config = ModelConfig::new()
        .with_weights(&env_or("SIGHTLINE_WEIGHTS", "models/yolov8n.onnx"))
        .with_ort_lib(&env_or(
            "SIGHTLINE_ORT_LIB",
            "onnxruntime/libonnxruntime.so",
        ))
        .with_device(InferenceDevice::CPU);

    let detector = OrtDetector::new(&config).expect("Failed to initialize detection engine");

    let image_path = env_or("SIGHTLINE_TEST_IMAGE", "tests/8_people.jpg");
    let image = image::open(&image_path)
        .expect("Failed to open test image")
        .to_rgb8();

    let detections = detector.detect(&image, 0.25).expect("Inference failed");
    println!("Detected {} objects", detections.len());
    for det in &detections {
        assert!(det.confidence >= 0.25);
        assert!(det.confidence <= 1.0);
        assert!(detector.class_name(det.class_id).is_some());
    }

    // Engine-side thresholding: raising the bar can only shrink the set.
    let strict = detector.detect(&image, 0.9).expect("Inference failed");
    assert!(strict.len() <= detections.len());
}
