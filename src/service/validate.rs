use crate::common::UploadImage;
use crate::service::ServiceError;

pub const DEFAULT_CONFIDENCE: f32 = 0.25;

const ACCEPTED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Rejects uploads that do not declare a JPEG or PNG content type.
pub fn validate_content_type(content_type: &str) -> Result<(), ServiceError> {
    if ACCEPTED_CONTENT_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(ServiceError::InvalidContentType(content_type.to_string()))
    }
}

/// Constrains the confidence threshold to `[0, 1]` at the boundary; the
/// engine never sees an out-of-range value.
pub fn validate_confidence(confidence: f32) -> Result<f32, ServiceError> {
    if (0.0..=1.0).contains(&confidence) {
        Ok(confidence)
    } else {
        Err(ServiceError::InvalidConfidence(confidence.to_string()))
    }
}

/// Decodes the upload into an RGB buffer, keeping the original bytes for
/// binary-mode passthrough.
pub fn decode_upload(
    bytes: Vec<u8>,
    content_type: String,
    filename: Option<String>,
) -> Result<UploadImage, ServiceError> {
    UploadImage::decode(bytes, content_type, filename)
        .map_err(|err| ServiceError::ImageDecode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_jpeg_png_and_jpg() {
        assert!(validate_content_type("image/jpeg").is_ok());
        assert!(validate_content_type("image/png").is_ok());
        assert!(validate_content_type("image/jpg").is_ok());
    }

    #[test]
    fn rejects_other_content_types() {
        assert!(validate_content_type("image/gif").is_err());
        assert!(validate_content_type("application/octet-stream").is_err());
        assert!(validate_content_type("").is_err());
    }

    #[test]
    fn confidence_bounds_are_inclusive() {
        assert_eq!(validate_confidence(0.0).unwrap(), 0.0);
        assert_eq!(validate_confidence(1.0).unwrap(), 1.0);
        assert_eq!(validate_confidence(0.25).unwrap(), 0.25);
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        assert!(validate_confidence(-0.1).is_err());
        assert!(validate_confidence(1.01).is_err());
        assert!(validate_confidence(f32::NAN).is_err());
    }

    #[test]
    fn decode_failure_is_a_client_error() {
        let err = decode_upload(vec![1, 2, 3], "image/png".into(), None).unwrap_err();
        assert!(err.is_client_error());
    }
}
