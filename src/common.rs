mod bbox;
mod detection;
mod inference_device;
mod model_config;
mod upload_image;

pub use bbox::*;
pub use detection::*;
pub use inference_device::*;
pub use model_config::*;
pub use upload_image::*;
