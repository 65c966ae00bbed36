//! Interface to the rasterization collaborator.
//!
//! The normalizer never decodes image assets itself; a caller-supplied
//! [`ImageLoader`] resolves asset URIs to raster payloads. Loading happens
//! synchronously, object by object, while the AST is built.

use crate::geometry::{Bounds, Transform};

/// A loaded raster asset.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Encoded image bytes
    pub data: Vec<u8>,

    /// Image format (e.g. `png`, `jpeg`)
    pub format: String,

    /// Width in pixels
    pub pixel_width: u32,

    /// Height in pixels
    pub pixel_height: u32,
}

/// Resolves design-asset URIs to raster payloads.
///
/// `display_width`/`display_height` are the placed size in points; the
/// transforms and bounds let an implementation crop or scale the source
/// asset to what is actually visible in the frame. Returning `None` means
/// the asset could not be loaded; the normalizer records a warning and
/// emits the object without a payload.
pub trait ImageLoader {
    /// Load the asset at `uri` as placed in its frame.
    fn load_image(
        &self,
        uri: &str,
        display_width: f64,
        display_height: f64,
        image_transform: Option<&Transform>,
        frame_bounds: Option<&Bounds>,
        graphic_bounds: Option<&Bounds>,
    ) -> Option<LoadedImage>;
}

/// A loader that never resolves anything.
///
/// Used when image payloads are not wanted; every object still appears in
/// the AST with its geometry and source path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoader;

impl ImageLoader for NoopLoader {
    fn load_image(
        &self,
        _uri: &str,
        _display_width: f64,
        _display_height: f64,
        _image_transform: Option<&Transform>,
        _frame_bounds: Option<&Bounds>,
        _graphic_bounds: Option<&Bounds>,
    ) -> Option<LoadedImage> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_loader() {
        let loader = NoopLoader;
        assert!(loader
            .load_image("Links/photo.jpg", 100.0, 50.0, None, None, None)
            .is_none());
    }
}
