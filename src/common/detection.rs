use serde::{Deserialize, Serialize};

use crate::common::BBox;

/// A single engine-reported object, before class-name resolution.
///
/// Produced solely by the detection engine; the service pipeline never
/// invents or discards entries.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub bbox: BBox,
    pub class_id: usize,
    pub confidence: f32,
}

impl RawDetection {
    pub fn new(bbox: BBox, class_id: usize, confidence: f32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
        }
    }

    /// Sets the bounding box using `(x1, y1, x2, y2)` corner coordinates.
    pub fn with_x1y1_x2y2(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = BBox::new(x1, y1, x2, y2);
        self
    }

    /// Sets the confidence score of the detection.
    pub fn with_confidence(mut self, conf: f32) -> Self {
        self.confidence = conf;
        self
    }

    /// Sets the class ID of the detection.
    pub fn with_class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }
}

/// A detection with its class id resolved against the engine's class table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BBox,
    pub class_id: usize,
    pub confidence: f32,
    pub label: String,
}

impl Detection {
    pub fn from_raw(raw: RawDetection, label: String) -> Self {
        Self {
            bbox: raw.bbox,
            class_id: raw.class_id,
            confidence: raw.confidence,
            label,
        }
    }
}
