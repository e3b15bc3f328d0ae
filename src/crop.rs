use crate::config::Tuning;

/// Crop region within the source image.
///
/// `x`/`y` is the top-left corner; the region covers
/// `[x, x + width) × [y, y + height)`. Canonical by construction: the
/// origin is non-negative and the extent unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    /// X coordinate of the top-left corner (pixels).
    pub x: u32,
    /// Y coordinate of the top-left corner (pixels).
    pub y: u32,
    /// Width of the region (pixels).
    pub width: u32,
    /// Height of the region (pixels).
    pub height: u32,
}

impl CropRegion {
    /// One past the rightmost column of the region.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom row of the region.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the pixel at `(x, y)` lies inside the region.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Externally supplied region of interest that biases the crop toward
/// including it, e.g. a detected face.
///
/// Coordinates are in the source image's pixel space and signed: detectors
/// commonly produce boxes that extend past the image edges. Out-of-bounds
/// parts are clipped when the region is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostRegion {
    /// X coordinate of the top-left corner (pixels, may be negative).
    pub x: i32,
    /// Y coordinate of the top-left corner (pixels, may be negative).
    pub y: i32,
    /// Width of the region (pixels).
    pub width: i32,
    /// Height of the region (pixels).
    pub height: i32,
    /// Boost strength, typically in `[0.0, 1.0]`. Clamped on application.
    pub weight: f64,
}

/// Raw accumulated channel sums for one candidate, before normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Score {
    /// Accumulated edge/detail strength.
    pub detail: f64,
    /// Accumulated saturation likelihood, gated by detail.
    pub saturation: f64,
    /// Accumulated skin likelihood, gated by detail.
    pub skin: f64,
    /// Accumulated boost-region weight.
    pub boost: f64,
}

/// A candidate crop together with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crop {
    /// Where the crop sits in the analyzed coordinate space.
    pub region: CropRegion,
    /// Raw per-channel sums, kept for diagnostics.
    pub score: Score,
}

impl Crop {
    /// Weighted channel sums normalized by the region's pixel area.
    /// This is the value candidates are ranked by.
    pub fn total_score(&self, tuning: &Tuning) -> f64 {
        (self.score.detail * tuning.detail_weight
            + self.score.skin * tuning.skin_weight
            + self.score.saturation * tuning.saturation_weight
            + self.score.boost * tuning.boost_weight)
            / self.region.width as f64
            / self.region.height as f64
    }
}
