use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::common::Detection;

const LABEL_HEIGHT: f32 = 20.;

/// Draws detection boxes and class labels onto a copy of the source image.
///
/// Boxes are clamped to the image bounds for drawing only; the detection data
/// keeps the engine's coordinates. When no font is configured, boxes are
/// drawn without label text.
pub struct Annotator {
    font: Option<FontVec>,
}

impl Annotator {
    pub fn new(font_bytes: Vec<u8>) -> anyhow::Result<Self> {
        let font = FontVec::try_from_vec(font_bytes)?;
        Ok(Self { font: Some(font) })
    }

    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn annotate(&self, image: &RgbImage, detections: &[Detection]) -> RgbImage {
        let mut canvas = image.clone();
        let (img_width, img_height) = canvas.dimensions();

        for detection in detections {
            let clamped = detection.bbox.clamped(img_width, img_height);
            let (x, y, w, h) = clamped.as_xywh_i32();
            if w <= 0 || h <= 0 {
                continue;
            }

            let draw_color = class_colour(detection.class_id);
            let rect = Rect::at(x, y).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut canvas, rect, draw_color);

            if let Some(font) = &self.font {
                let scale = PxScale {
                    x: LABEL_HEIGHT * 2.0,
                    y: LABEL_HEIGHT,
                };
                draw_text_mut(&mut canvas, draw_color, x, y, scale, font, &detection.label);
            }
        }

        canvas
    }
}

fn class_colour(class_id: usize) -> Rgb<u8> {
    match class_id {
        0 => Rgb([128, 0, 128]),     // purple (people)
        1..=8 => Rgb([0, 255, 0]),   // green (vehicles)
        14..=23 => Rgb([255, 0, 0]), // red (animals)
        _ => Rgb([0, 0, 255]),       // blue (everything else)
    }
}
