use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::{Array, Ix4};

/// Resize an image to the model input resolution and convert it to a
/// normalized NCHW float tensor.
pub(crate) fn image_to_tensor(image: &RgbImage, width: u32, height: u32) -> Array<f32, Ix4> {
    let src = DynamicImage::ImageRgb8(image.clone());

    let mut resizer = fast_image_resize::Resizer::new();
    let options = fast_image_resize::ResizeOptions {
        algorithm: fast_image_resize::ResizeAlg::Convolution(
            fast_image_resize::FilterType::Bilinear,
        ),
        ..Default::default()
    };

    let mut resized = DynamicImage::new(width, height, src.color());
    if let Err(err) = resizer.resize(&src, &mut resized, &options) {
        tracing::warn!(?err, "Failed to use `fast_image_resize`. Falling back.");
        resized = image::imageops::resize(&src, width, height, FilterType::Nearest).into();
    }

    let mut input: Array<f32, Ix4> = Array::zeros((1, 3, height as usize, width as usize));
    for (x, y, pixel) in resized.to_rgb8().enumerate_pixels() {
        let [r, g, b] = pixel.0;
        input[[0, 0, y as usize, x as usize]] = (r as f32) / 255.;
        input[[0, 1, y as usize, x as usize]] = (g as f32) / 255.;
        input[[0, 2, y as usize, x as usize]] = (b as f32) / 255.;
    }

    input
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn tensor_has_nchw_shape() {
        let image = RgbImage::new(32, 16);
        let tensor = image_to_tensor(&image, 8, 4);
        assert_eq!(tensor.shape(), &[1, 3, 4, 8]);
    }

    #[test]
    fn solid_colour_normalizes_per_channel() {
        let image = RgbImage::from_pixel(16, 16, Rgb([255, 0, 102]));
        let tensor = image_to_tensor(&image, 8, 8);
        assert!((tensor[[0, 0, 4, 4]] - 1.0).abs() < 0.02);
        assert!(tensor[[0, 1, 4, 4]].abs() < 0.02);
        assert!((tensor[[0, 2, 4, 4]] - 102. / 255.).abs() < 0.02);
    }
}
