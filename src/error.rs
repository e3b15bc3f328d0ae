use thiserror::Error;

/// Error type returned by crop analysis.
#[derive(Debug, Error)]
pub enum SmartcropError {
    /// Both target dimensions were zero; at least one is required.
    #[error("expected a non-zero target width or height")]
    InvalidDimensions,

    /// The input image has a zero width or height.
    #[error("image dimensions are zero")]
    ZeroDimensions,

    /// The image downsamples to an empty feature buffer.
    #[error("image of {width}x{height} is too small to analyze")]
    ImageTooSmall {
        /// Input image width in pixels.
        width: u32,
        /// Input image height in pixels.
        height: u32,
    },

    /// A boost region has a zero or negative extent.
    #[error("boost region has non-positive size {width}x{height}")]
    InvalidBoostRegion {
        /// Offending region width.
        width: i32,
        /// Offending region height.
        height: i32,
    },

    /// No candidate window fits inside the image.
    #[error("no candidate position fits a {crop_width}x{crop_height} window")]
    NoCandidates {
        /// Requested crop window width at working resolution.
        crop_width: u32,
        /// Requested crop window height at working resolution.
        crop_height: u32,
    },

    /// A detection model could not be read or parsed.
    #[error("failed to load detection model: {0}")]
    ModelLoad(String),
}
