//! Content-aware crop analysis: find the most interesting crop rectangle
//! of an image for a target size.
//!
//! The analyzer builds per-pixel feature maps (edge detail, skin tones,
//! saturation), overlays caller-supplied boost regions (e.g. detected
//! faces), then scores a grid of candidate windows and returns the best
//! one. It only picks the rectangle — decoding, cutting, and resizing the
//! output stay with the caller.
//!
//! # Example
//!
//! ```no_run
//! use smartcrop::CropAnalyzer;
//!
//! let img = image::open("photo.jpg").unwrap();
//! let crop = CropAnalyzer::new()
//!     .find_best_crop(&img, 300, 200, &[])
//!     .unwrap();
//! println!("crop at {:?}, detail score {}", crop.region, crop.score.detail);
//! ```
#![warn(missing_docs)]

mod analyze;
mod config;
mod crop;
mod error;
/// Face detection trait and boost-region conversion.
pub mod face_detector;
mod features;
/// Resize trait and built-in backend, used for the prescale step.
pub mod resizer;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;

pub use config::Tuning;
pub use crop::{BoostRegion, Crop, CropRegion, Score};
pub use error::SmartcropError;
pub use face_detector::{boost_regions, FaceBounds, FaceDetector};
pub use resizer::{FilterResizer, Resizer};
#[cfg(feature = "rustface")]
pub use rustface_backend::RustfaceDetector;

use image::DynamicImage;

/// Finds the best crop of an image for a target size.
///
/// Configure with [`tuning`](CropAnalyzer::tuning) and
/// [`resizer`](CropAnalyzer::resizer), then call
/// [`find_best_crop`](CropAnalyzer::find_best_crop) as often as needed;
/// the analyzer holds no per-image state.
pub struct CropAnalyzer {
    tuning: Tuning,
    resizer: Box<dyn Resizer>,
}

impl CropAnalyzer {
    /// Analyzer with default tuning and the built-in Lanczos resizer.
    pub fn new() -> Self {
        Self {
            tuning: Tuning::default(),
            resizer: Box::new(FilterResizer::default()),
        }
    }

    /// Replace the tuning parameters.
    ///
    /// The defaults reproduce the reference heuristics; see [`Tuning`].
    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Provide a custom resize backend for the prescale step.
    pub fn resizer(mut self, resizer: Box<dyn Resizer>) -> Self {
        self.resizer = resizer;
        self
    }

    /// Find the best crop of `image` for a `width` × `height` target.
    ///
    /// The target only fixes the aspect ratio and upper size; the returned
    /// region is the target's shape scaled up as far as the image allows.
    /// A single zero dimension leaves that axis unconstrained; both zero is
    /// an error. `boosts` are regions of interest in the original image's
    /// pixel space, applied in list order.
    ///
    /// The returned [`Crop`] is in original-image coordinates, canonical,
    /// and within bounds, with its raw channel score attached for
    /// diagnostics. Analysis is deterministic: identical inputs produce an
    /// identical crop.
    pub fn find_best_crop(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        boosts: &[BoostRegion],
    ) -> Result<Crop, SmartcropError> {
        let rgba = image.to_rgba8();
        analyze::find_best_crop(
            &rgba,
            width,
            height,
            boosts,
            &self.tuning,
            self.resizer.as_ref(),
        )
    }
}

impl Default for CropAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Square crop dimensions for an image: the smaller image dimension on
/// both axes. The conventional fallback when a caller has no target size.
pub fn square_crop_dimensions(image: &DynamicImage) -> (u32, u32) {
    let side = image.width().min(image.height());
    (side, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
                255,
            ]);
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn both_zero_dimensions_is_an_error() {
        let result = CropAnalyzer::new().find_best_crop(&gradient_image(100, 100), 0, 0, &[]);
        assert!(matches!(result, Err(SmartcropError::InvalidDimensions)));
    }

    #[test]
    fn single_zero_dimension_proceeds() {
        let crop = CropAnalyzer::new()
            .find_best_crop(&gradient_image(100, 100), 0, 50, &[])
            .unwrap();
        assert!(crop.region.width > 0);
        assert!(crop.region.height > 0);
    }

    #[test]
    fn crop_stays_within_image() {
        let crop = CropAnalyzer::new()
            .find_best_crop(&gradient_image(320, 200), 100, 100, &[])
            .unwrap();
        assert!(crop.region.right() <= 320);
        assert!(crop.region.bottom() <= 200);
    }

    #[test]
    fn tuning_can_disable_rule_of_thirds() {
        let tuning = Tuning {
            rule_of_thirds: false,
            ..Tuning::default()
        };
        let crop = CropAnalyzer::new()
            .tuning(tuning)
            .find_best_crop(&gradient_image(200, 200), 100, 100, &[])
            .unwrap();
        assert!(crop.region.width > 0);
    }

    #[test]
    fn custom_resizer_is_used_for_prescale() {
        struct Nearest;
        impl Resizer for Nearest {
            fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
                image::imageops::resize(image, width, height, image::imageops::Nearest)
            }
        }

        // 600x400 is above the prescale threshold, so the resizer runs.
        let crop = CropAnalyzer::new()
            .resizer(Box::new(Nearest))
            .find_best_crop(&gradient_image(600, 400), 100, 100, &[])
            .unwrap();
        assert!(crop.region.right() <= 600);
        assert!(crop.region.bottom() <= 400);
    }

    #[test]
    fn square_crop_dimensions_use_smaller_side() {
        assert_eq!(square_crop_dimensions(&gradient_image(300, 120)), (120, 120));
        assert_eq!(square_crop_dimensions(&gradient_image(80, 200)), (80, 80));
    }
}
