use axum::http::header::ACCESS_CONTROL_EXPOSE_HEADERS;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::service::DetectionResult;

pub const OBJECTS_FOUND: &str = "x-objects-found";
pub const DETECTIONS: &str = "x-detections";
pub const CONFIDENCE_SCORE: &str = "x-confidence-score";
pub const PROCESSING_TIME: &str = "x-processing-time";

/// Fixed three-decimal wire formatting for numeric header values.
pub fn fixed3(value: f64) -> String {
    format!("{value:.3}")
}

/// Builds the binary-mode metadata header set.
///
/// Every custom header placed on the response is also named in
/// `Access-Control-Expose-Headers`: browsers hide unlisted custom headers
/// from cross-origin scripts. The confidence header is only set when at
/// least one object was found.
pub fn detection_headers(result: &DetectionResult, processing_seconds: f64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut exposed: Vec<&str> = Vec::with_capacity(4);

    insert(
        &mut headers,
        &mut exposed,
        OBJECTS_FOUND,
        result.objects_found().to_string(),
    );
    insert(&mut headers, &mut exposed, DETECTIONS, result.count.to_string());
    if result.objects_found() {
        insert(
            &mut headers,
            &mut exposed,
            CONFIDENCE_SCORE,
            fixed3(result.max_confidence as f64),
        );
    }
    insert(
        &mut headers,
        &mut exposed,
        PROCESSING_TIME,
        fixed3(processing_seconds),
    );

    let expose_list = exposed.join(", ");
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_str(&expose_list).expect("header names are valid ASCII"),
    );

    headers
}

fn insert(headers: &mut HeaderMap, exposed: &mut Vec<&str>, name: &'static str, value: String) {
    headers.insert(
        HeaderName::from_static(name),
        HeaderValue::from_str(&value).expect("formatted numeric value"),
    );
    exposed.push(name);
}

#[cfg(test)]
mod tests {
    use crate::common::{BBox, Detection, RawDetection};

    use super::*;

    fn result(confidences: &[f32]) -> DetectionResult {
        let detections: Vec<Detection> = confidences
            .iter()
            .map(|&c| {
                Detection::from_raw(
                    RawDetection::new(BBox::new(0., 0., 1., 1.), 0, c),
                    "person".to_string(),
                )
            })
            .collect();
        let max_confidence = confidences.iter().copied().fold(0.0_f32, f32::max);
        DetectionResult {
            count: detections.len(),
            detections,
            max_confidence,
        }
    }

    #[test]
    fn fixed3_pads_and_truncates() {
        assert_eq!(fixed3(0.91), "0.910");
        assert_eq!(fixed3(0.1234), "0.123");
        assert_eq!(fixed3(0.0), "0.000");
        assert_eq!(fixed3(1.0), "1.000");
    }

    #[test]
    fn detection_headers_with_objects() {
        let headers = detection_headers(&result(&[0.91]), 0.05);
        assert_eq!(headers.get(OBJECTS_FOUND).unwrap(), "true");
        assert_eq!(headers.get(DETECTIONS).unwrap(), "1");
        assert_eq!(headers.get(CONFIDENCE_SCORE).unwrap(), "0.910");
        assert_eq!(headers.get(PROCESSING_TIME).unwrap(), "0.050");
        let exposed = headers.get(ACCESS_CONTROL_EXPOSE_HEADERS).unwrap();
        assert_eq!(
            exposed,
            "x-objects-found, x-detections, x-confidence-score, x-processing-time"
        );
    }

    #[test]
    fn no_confidence_header_without_objects() {
        let headers = detection_headers(&result(&[]), 0.012);
        assert_eq!(headers.get(OBJECTS_FOUND).unwrap(), "false");
        assert_eq!(headers.get(DETECTIONS).unwrap(), "0");
        assert!(headers.get(CONFIDENCE_SCORE).is_none());
        let exposed = headers.get(ACCESS_CONTROL_EXPOSE_HEADERS).unwrap();
        assert_eq!(
            exposed,
            "x-objects-found, x-detections, x-processing-time"
        );
    }
}
