use anyhow::Result;
use ndarray::{Array, Axis, IxDyn};
use rayon::prelude::*;

use crate::common::{BBox, RawDetection};

/// Decode a YOLOv8-layout output tensor into detections in source-image
/// coordinates.
///
/// Expected shape is `(1, 4 + nc, num_anchors)`: per anchor a `cxcywh` box in
/// model-input space followed by one score per class. Anchors below
/// `confidence` are dropped before any scaling work; survivors are scaled to
/// the source dimensions and run through IoU suppression. The returned order
/// is confidence-descending.
pub(crate) fn decode_predictions(
    output: &Array<f32, IxDyn>,
    model_size: (u32, u32),
    image_size: (u32, u32),
    confidence: f32,
    iou_threshold: f32,
) -> Result<Vec<RawDetection>> {
    let shape = output.shape();
    if output.ndim() != 3 || shape[0] != 1 || shape[1] <= 4 {
        anyhow::bail!("unexpected model output shape {:?}", shape);
    }

    let preds = output.index_axis(Axis(0), 0);
    let preds = preds.t();

    let (model_w, model_h) = (model_size.0 as f32, model_size.1 as f32);
    let (img_w, img_h) = (image_size.0 as f32, image_size.1 as f32);

    let mut boxes: Vec<RawDetection> = preds
        .axis_iter(Axis(0))
        .into_par_iter()
        .filter_map(|row| {
            let (class_id, &score) = row
                .iter()
                .skip(4)
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))?;
            if score < confidence {
                return None;
            }

            let cx = row[0] / model_w * img_w;
            let cy = row[1] / model_h * img_h;
            let w = row[2] / model_w * img_w;
            let h = row[3] / model_h * img_h;

            Some(RawDetection::new(
                BBox::from_cxcywh(cx, cy, w, h),
                class_id,
                score,
            ))
        })
        .collect();

    boxes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    Ok(non_max_suppression(boxes, iou_threshold))
}

/// Greedy IoU suppression over a confidence-sorted list; keeps order.
fn non_max_suppression(sorted: Vec<RawDetection>, iou_threshold: f32) -> Vec<RawDetection> {
    let mut keep: Vec<RawDetection> = Vec::with_capacity(sorted.len());
    for det in sorted {
        if keep.iter().all(|k| k.bbox.iou(&det.bbox) < iou_threshold) {
            keep.push(det);
        }
    }
    keep
}
