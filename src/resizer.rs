use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Pluggable resize backend, used only for the prescale step.
///
/// Implement this trait to plug in a different resampler (SIMD, GPU, a
/// service) and pass it to [`crate::CropAnalyzer::resizer`]. The analysis
/// never resizes the final output; that stays with the caller.
pub trait Resizer: Send + Sync {
    /// Resize `image` to exactly `width` × `height` pixels.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage;
}

/// Default resizer backed by `image::imageops`.
pub struct FilterResizer {
    filter: FilterType,
}

impl FilterResizer {
    /// Resizer using the given resampling filter.
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for FilterResizer {
    /// Lanczos3, a good quality/speed tradeoff for downscaling.
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl Resizer for FilterResizer {
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        imageops::resize(image, width, height, self.filter)
    }
}
