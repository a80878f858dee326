use image::{ImageResult, RgbImage};

/// An uploaded image: the original wire bytes plus the decoded RGB buffer.
///
/// Created per request and dropped once the response is produced. The
/// original bytes are kept so binary mode can hand them back untouched when
/// nothing is detected.
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: Option<String>,
    pub image: RgbImage,
}

impl UploadImage {
    /// Decodes `bytes` into an RGB8 buffer regardless of source colour mode.
    pub fn decode(
        bytes: Vec<u8>,
        content_type: String,
        filename: Option<String>,
    ) -> ImageResult<Self> {
        let image = image::load_from_memory(&bytes)?.to_rgb8();
        Ok(Self {
            bytes,
            content_type,
            filename,
            image,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Name used in logs when the client did not send a filename.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("upload")
    }
}
