use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, RgbImage};
use serde::Serialize;

use crate::common::{Detection, UploadImage};
use crate::service::{Annotator, DetectionResult, ServiceError};

pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Binary-mode outcome: an annotated PNG when objects were found, otherwise
/// the untouched upload with its original content type.
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryImage {
    Annotated { png: Vec<u8> },
    Original { bytes: Vec<u8>, content_type: String },
}

impl BinaryImage {
    pub fn content_type(&self) -> &str {
        match self {
            BinaryImage::Annotated { .. } => PNG_CONTENT_TYPE,
            BinaryImage::Original { content_type, .. } => content_type,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            BinaryImage::Annotated { png } => png,
            BinaryImage::Original { bytes, .. } => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            BinaryImage::Annotated { png } => png,
            BinaryImage::Original { bytes, .. } => bytes,
        }
    }
}

/// Encodes an RGB buffer as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ServiceError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|err| ServiceError::Render(err.to_string()))?;
    Ok(buffer.into_inner())
}

/// Binary renderer.
///
/// With detections: boxes and labels drawn on the original pixel buffer,
/// re-encoded as PNG. Without: the original upload bytes pass through
/// unchanged (superseding an earlier revision that returned an empty body).
pub fn render_binary(
    upload: &UploadImage,
    result: &DetectionResult,
    annotator: &Annotator,
) -> Result<BinaryImage, ServiceError> {
    if result.objects_found() {
        let annotated = annotator.annotate(&upload.image, &result.detections);
        Ok(BinaryImage::Annotated {
            png: encode_png(&annotated)?,
        })
    } else {
        Ok(BinaryImage::Original {
            bytes: upload.bytes.clone(),
            content_type: upload.content_type.clone(),
        })
    }
}

/// One detection entry of the JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDetection {
    pub class: String,
    pub confidence: f32,
    pub bbox: [f32; 4],
}

impl From<&Detection> for JsonDetection {
    fn from(detection: &Detection) -> Self {
        Self {
            class: detection.label.clone(),
            confidence: detection.confidence,
            bbox: detection.bbox.as_xyxy(),
        }
    }
}

/// Body of a `/detect-json` response.
///
/// Failures keep the transport status at 200 and report through
/// `success`/`error` instead; this asymmetry with the binary endpoint is
/// deliberate.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectJsonResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects_found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections: Option<Vec<JsonDetection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

impl DetectJsonResponse {
    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            ..Default::default()
        }
    }
}

/// JSON renderer; always yields a document. The embedded image is the
/// binary-mode body as a data URI with the matching media type.
pub fn render_json(
    result: &DetectionResult,
    image: &BinaryImage,
    processing_seconds: f64,
    filename: Option<String>,
) -> DetectJsonResponse {
    DetectJsonResponse {
        success: true,
        error: None,
        objects_found: Some(result.objects_found()),
        detection_count: Some(result.count),
        max_confidence: Some(result.max_confidence),
        processing_time_seconds: Some(round3(processing_seconds)),
        detections: Some(result.detections.iter().map(JsonDetection::from).collect()),
        filename,
        image_base64: Some(data_uri(image.content_type(), image.bytes())),
    }
}

pub fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", BASE64.encode(bytes))
}

fn round3(value: f64) -> f64 {
    (value * 1000.).round() / 1000.
}

#[cfg(test)]
mod tests {
    use crate::common::{BBox, RawDetection};
    use crate::service::aggregate;

    use super::*;

    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

    fn upload() -> UploadImage {
        let image = RgbImage::from_pixel(24, 24, image::Rgb([90, 90, 90]));
        let bytes = encode_png(&image).unwrap();
        UploadImage::decode(bytes, "image/png".to_string(), Some("cam1.png".to_string()))
            .unwrap()
    }

    fn one_detection() -> DetectionResult {
        aggregate(
            vec![RawDetection::new(BBox::new(2., 2., 12., 12.), 0, 0.91)],
            |_| Some("person".to_string()),
        )
    }

    #[test]
    fn no_detections_passes_original_bytes_through() {
        let upload = upload();
        let rendered =
            render_binary(&upload, &DetectionResult::default(), &Annotator::without_font())
                .unwrap();
        assert_eq!(rendered.bytes(), upload.bytes.as_slice());
        assert_eq!(rendered.content_type(), "image/png");
    }

    #[test]
    fn detections_produce_a_fresh_png() {
        let upload = upload();
        let rendered =
            render_binary(&upload, &one_detection(), &Annotator::without_font()).unwrap();
        assert_eq!(rendered.content_type(), PNG_CONTENT_TYPE);
        assert_eq!(&rendered.bytes()[..4], &PNG_MAGIC[..]);
        assert_ne!(rendered.bytes(), upload.bytes.as_slice());
    }

    #[test]
    fn json_document_carries_the_full_result() {
        let upload = upload();
        let result = one_detection();
        let image = render_binary(&upload, &result, &Annotator::without_font()).unwrap();
        let doc = render_json(&result, &image, 0.0521, upload.filename.clone());

        assert!(doc.success);
        assert_eq!(doc.detection_count, Some(1));
        assert_eq!(doc.objects_found, Some(true));
        assert_eq!(doc.max_confidence, Some(0.91));
        assert_eq!(doc.processing_time_seconds, Some(0.052));
        assert_eq!(doc.filename.as_deref(), Some("cam1.png"));
        let detections = doc.detections.unwrap();
        assert_eq!(detections[0].class, "person");
        assert_eq!(detections[0].bbox, [2., 2., 12., 12.]);
        assert!(doc
            .image_base64
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn json_keys_are_camel_case() {
        let upload = upload();
        let result = DetectionResult::default();
        let image = render_binary(&upload, &result, &Annotator::without_font()).unwrap();
        let doc = render_json(&result, &image, 0.01, None);
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("objectsFound").is_some());
        assert!(value.get("detectionCount").is_some());
        assert!(value.get("maxConfidence").is_some());
        assert!(value.get("processingTimeSeconds").is_some());
        assert!(value.get("imageBase64").is_some());
        assert!(value.get("error").is_none());
        assert!(value.get("filename").is_none());
    }

    #[test]
    fn failure_document_is_minimal() {
        let doc = DetectJsonResponse::failure("inference failed: shape".to_string());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "inference failed: shape");
        assert!(value.get("detections").is_none());
        assert!(value.get("imageBase64").is_none());
    }
}
