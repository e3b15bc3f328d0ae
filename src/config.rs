/// Tuning knobs for the crop analysis pipeline.
///
/// The defaults reproduce the behavior the scoring heuristics were tuned
/// against; they interact with each other, so changing one in isolation
/// (e.g. `score_down_sample` without `step`) usually degrades results.
/// Construct with `Tuning::default()` and override fields as needed.
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Weight of the detail channel in the total score.
    pub detail_weight: f64,

    /// Reference skin tone as a normalized RGB direction.
    pub skin_color: [f64; 3],

    /// Added to the detail gate when scoring skin, so skin still counts a
    /// little in flat regions.
    pub skin_bias: f64,

    /// Brightness range (luma / 255) within which skin is considered.
    pub skin_brightness_min: f64,
    /// Upper brightness bound for skin.
    pub skin_brightness_max: f64,

    /// Minimum skin likelihood before the pixel registers at all.
    pub skin_threshold: f64,

    /// Weight of the skin channel in the total score.
    pub skin_weight: f64,

    /// Brightness range within which saturation is considered.
    pub saturation_brightness_min: f64,
    /// Upper brightness bound for saturation.
    pub saturation_brightness_max: f64,

    /// Minimum saturation before the pixel registers.
    pub saturation_threshold: f64,

    /// Added to the detail gate when scoring saturation.
    pub saturation_bias: f64,

    /// Weight of the saturation channel in the total score.
    pub saturation_weight: f64,

    /// Block size used to reduce the feature buffer before scoring.
    /// `step * min_scale` rounded down to the next power of two is a good
    /// value.
    pub score_down_sample: u32,

    /// Sliding-window step in pixels for candidate positions.
    pub step: u32,

    /// Decrement between candidate window scales.
    pub scale_step: f64,

    /// Smallest candidate window scale considered.
    pub min_scale: f64,

    /// Largest candidate window scale considered.
    pub max_scale: f64,

    /// Fraction of the candidate window treated as its edge zone.
    pub edge_radius: f64,

    /// Penalty weight for content inside the edge zone.
    pub edge_weight: f64,

    /// Importance assigned to content outside the candidate window.
    /// Negative: content left out of the crop counts against it.
    pub outside_importance: f64,

    /// Weight of the boost channel in the total score.
    pub boost_weight: f64,

    /// Bias importance toward the rule-of-thirds gridlines.
    pub rule_of_thirds: bool,

    /// Downscale large images before analysis.
    pub prescale: bool,

    /// Prescale so the smaller image dimension does not exceed this.
    pub prescale_min: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            detail_weight: 0.2,
            skin_color: [0.78, 0.57, 0.44],
            skin_bias: 0.01,
            skin_brightness_min: 0.2,
            skin_brightness_max: 1.0,
            skin_threshold: 0.8,
            skin_weight: 1.8,
            saturation_brightness_min: 0.05,
            saturation_brightness_max: 0.9,
            saturation_threshold: 0.4,
            saturation_bias: 0.2,
            saturation_weight: 0.3,
            score_down_sample: 4,
            step: 8,
            scale_step: 0.1,
            min_scale: 1.0,
            max_scale: 1.0,
            edge_radius: 0.4,
            edge_weight: -20.0,
            outside_importance: -0.5,
            boost_weight: 200.0,
            rule_of_thirds: true,
            prescale: true,
            prescale_min: 256.0,
        }
    }
}
