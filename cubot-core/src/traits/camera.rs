//! Camera and image access traits

use crate::scan::Face;

/// 8-bit RGB pixel
pub type Rgb = [u8; 3];

/// Still image capture
///
/// Each capture is stored in a slot named after the face
/// (see [`Face::slot_name`]) and read back later for classification.
pub trait StillCamera {
    /// Error type for capture failures
    type Error;

    /// Capture a still image into the slot for `face`
    fn capture(&mut self, face: Face) -> Result<(), Self::Error>;
}

/// Read-only RGB raster
pub trait Raster {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Pixel at (x, y); callers stay within `width() x height()`
    fn pixel(&self, x: u32, y: u32) -> Rgb;
}

impl<T: Raster + ?Sized> Raster for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        (**self).pixel(x, y)
    }
}
