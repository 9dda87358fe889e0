use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat};
use log::debug;

use crate::PortraitError;

pub fn load_image(path: &Path) -> Result<DynamicImage, PortraitError> {
    let image = image::open(path)?;
    let (w, h) = image.dimensions();
    debug!("loaded source image {}x{} from {}", w, h, path.display());
    Ok(image)
}

/// Whether the file extension names a format the decoder understands.
pub fn is_supported_image(path: &Path) -> bool {
    ImageFormat::from_path(path).map(|format| format.can_read()).unwrap_or(false)
}
