//! Image preprocessing.
//!
//! Background removal is done by an external vision service. The core only
//! knows the [`BackgroundRemover`] interface and what to do when it is not
//! available: keep the original image.

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::ImagePayload;

/// External collaborator that cuts the subject out of a photo.
pub trait BackgroundRemover: Send + Sync {
    fn remove_background(&self, image: &ImagePayload) -> Result<ImagePayload>;
}

/// Run background removal if enabled and possible.
///
/// Falls back to the original image when removal is disabled, when no
/// remover is configured or when the remover fails.
pub fn prepare_image(
    remover: Option<&dyn BackgroundRemover>,
    image: ImagePayload,
    enabled: bool,
) -> ImagePayload {
    if !enabled {
        return image;
    }
    let Some(remover) = remover else {
        debug!("background removal requested but no remover is configured");
        return image;
    };
    match remover.remove_background(&image) {
        Ok(processed) => processed,
        Err(e) => {
            warn!(error = %e, "background removal failed; keeping original image");
            image
        }
    }
}
