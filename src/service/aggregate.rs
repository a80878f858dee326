use serde::Serialize;

use crate::common::{Detection, RawDetection};

/// Aggregated view of one inference pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
    pub count: usize,
    pub max_confidence: f32,
}

impl DetectionResult {
    pub fn objects_found(&self) -> bool {
        self.count > 0
    }
}

/// Shapes raw engine output into a summarized result.
///
/// Engine order is preserved and no entry is added or dropped. The maximum
/// confidence is exact; rounding happens only when values are serialized.
/// A class id the resolver cannot answer gets an indexed placeholder label.
pub fn aggregate<F>(raw: Vec<RawDetection>, resolve: F) -> DetectionResult
where
    F: Fn(usize) -> Option<String>,
{
    let count = raw.len();
    let max_confidence = raw.iter().map(|d| d.confidence).fold(0.0_f32, f32::max);

    let detections = raw
        .into_iter()
        .map(|d| {
            let label = resolve(d.class_id).unwrap_or_else(|| format!("class_{}", d.class_id));
            Detection::from_raw(d, label)
        })
        .collect();

    DetectionResult {
        detections,
        count,
        max_confidence,
    }
}
