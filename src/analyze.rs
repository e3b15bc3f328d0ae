//! The analysis pipeline: prescale, feature extraction, candidate
//! enumeration, scoring, and selection of the best crop.

use std::time::Instant;

use image::RgbaImage;
use log::{debug, trace};
use rayon::prelude::*;

use crate::config::Tuning;
use crate::crop::{BoostRegion, Crop, CropRegion, Score};
use crate::error::SmartcropError;
use crate::features::{self, CHAN_BOOST, CHAN_DETAIL, CHAN_SATURATION, CHAN_SKIN};
use crate::resizer::Resizer;

/// Truncate toward zero: ceiling for negative values, floor for positive.
fn chop(x: f64) -> f64 {
    x.trunc()
}

/// Bump function peaking at the 1/3 and 2/3 gridlines, zero elsewhere.
/// `x` is a centered-distance coordinate in `[0, 1]`.
fn thirds(x: f64) -> f64 {
    let x = ((x - 1.0 / 3.0 + 1.0) % 2.0 * 0.5 - 0.5) * 16.0;
    (1.0 - x * x).max(0.0)
}

/// Spatial weighting of the pixel at `(x, y)` relative to a candidate
/// window. Returns `(ordinary, boost)` importance.
///
/// Pixels outside the window get a flat negative weight, so content left
/// out of the crop counts against it. Inside, a center-distance S-curve is
/// dampened near the window edge and, for the ordinary term only, bumped
/// near the rule-of-thirds gridlines. The boost term deliberately skips
/// the edge falloff and thirds bump so a boosted face keeps its pull even
/// when it sits at the window border.
fn importance(region: &CropRegion, x: u32, y: u32, tuning: &Tuning) -> (f64, f64) {
    if !region.contains(x, y) {
        return (tuning.outside_importance, tuning.outside_importance);
    }

    let xf = (x - region.x) as f64 / region.width as f64;
    let yf = (y - region.y) as f64 / region.height as f64;

    // Distance from the window center, 0 at the center, 1 at the edge.
    let px = (0.5 - xf).abs() * 2.0;
    let py = (0.5 - yf).abs() * 2.0;

    let dx = (px - 1.0 + tuning.edge_radius).max(0.0);
    let dy = (py - 1.0 + tuning.edge_radius).max(0.0);
    let d = (dx * dx + dy * dy) * tuning.edge_weight;

    let mut s = 1.414 - (px * px + py * py).sqrt();
    let s_boost = s;
    if tuning.rule_of_thirds {
        s += (s + d + 0.5).max(0.0) * 1.2 * (thirds(px) + thirds(py));
    }

    (s + d, s_boost * 4.0)
}

/// Enumerate candidate windows: scales from `max_scale` down to
/// `real_min_scale` in `scale_step` decrements, positions on a `step`-pixel
/// grid wherever the window fully fits.
///
/// A zero `crop_width`/`crop_height` falls back to the buffer's smaller
/// dimension. Windows whose scaled size truncates to zero are skipped.
fn candidates(
    width: u32,
    height: u32,
    crop_width: f64,
    crop_height: f64,
    real_min_scale: f64,
    tuning: &Tuning,
) -> Vec<CropRegion> {
    let mut out = Vec::new();
    let min_dimension = width.min(height) as f64;
    let crop_w = if crop_width != 0.0 { crop_width } else { min_dimension };
    let crop_h = if crop_height != 0.0 { crop_height } else { min_dimension };

    let mut scale = tuning.max_scale;
    while scale >= real_min_scale {
        let window_w = (crop_w * scale) as u32;
        let window_h = (crop_h * scale) as u32;
        if window_w > 0 && window_h > 0 {
            let mut y = 0u32;
            while y as f64 + crop_h * scale <= height as f64 {
                let mut x = 0u32;
                while x as f64 + crop_w * scale <= width as f64 {
                    out.push(CropRegion {
                        x,
                        y,
                        width: window_w,
                        height: window_h,
                    });
                    x += tuning.step;
                }
                y += tuning.step;
            }
        }
        scale -= tuning.scale_step;
    }

    out
}

/// Score one candidate against the downsampled feature buffer.
///
/// Iterates every downsampled cell but evaluates importance at the cell's
/// origin in feature-buffer coordinates, so window geometry and feature
/// data stay in the same space. The detail channel gates the skin and
/// saturation terms: texture in an interesting region counts more than
/// flat color.
fn score_candidate(sample: &RgbaImage, region: &CropRegion, tuning: &Tuning) -> Score {
    let factor = tuning.score_down_sample;
    let mut score = Score::default();

    for dy in 0..sample.height() {
        for dx in 0..sample.width() {
            let (imp, imp_boost) = importance(region, dx * factor, dy * factor, tuning);

            let p = sample.get_pixel(dx, dy).0;
            let detail = p[CHAN_DETAIL] as f64 / 255.0;

            score.skin += p[CHAN_SKIN] as f64 / 255.0 * (detail + tuning.skin_bias) * imp;
            score.detail += detail * imp;
            score.saturation +=
                p[CHAN_SATURATION] as f64 / 255.0 * (detail + tuning.saturation_bias) * imp;
            score.boost += p[CHAN_BOOST] as f64 / 255.0 * imp_boost;
        }
    }

    score
}

/// Run the full pipeline and return the best crop in original-image
/// coordinates.
pub(crate) fn find_best_crop(
    image: &RgbaImage,
    width: u32,
    height: u32,
    boosts: &[BoostRegion],
    tuning: &Tuning,
    resizer: &dyn Resizer,
) -> Result<Crop, SmartcropError> {
    if width == 0 && height == 0 {
        return Err(SmartcropError::InvalidDimensions);
    }

    let (img_w, img_h) = image.dimensions();
    if img_w == 0 || img_h == 0 {
        return Err(SmartcropError::ZeroDimensions);
    }

    for boost in boosts {
        if boost.width <= 0 || boost.height <= 0 {
            return Err(SmartcropError::InvalidBoostRegion {
                width: boost.width,
                height: boost.height,
            });
        }
    }

    // A zero target dimension divides to +inf here, so the other side wins
    // the min and the zero side imposes no constraint.
    let scale = (img_w as f64 / width as f64).min(img_h as f64 / height as f64);

    // Work at a bounded resolution: shrink so the smaller dimension equals
    // the prescale threshold, and bring the boost coordinates along.
    let mut prescale_factor = 1.0;
    let mut scaled_boosts = boosts.to_vec();
    let mut resized: Option<RgbaImage> = None;
    if tuning.prescale {
        let f = tuning.prescale_min / img_w.min(img_h) as f64;
        if f < 1.0 {
            prescale_factor = f;
            for boost in &mut scaled_boosts {
                boost.x = chop(boost.x as f64 * f) as i32;
                boost.y = chop(boost.y as f64 * f) as i32;
                boost.width = chop(boost.width as f64 * f) as i32;
                boost.height = chop(boost.height as f64 * f) as i32;
            }
            let t = Instant::now();
            resized = Some(resizer.resize(
                image,
                (img_w as f64 * f) as u32,
                (img_h as f64 * f) as u32,
            ));
            trace!("prescale: {:?}", t.elapsed());
        }
    }
    let analysis = resized.as_ref().unwrap_or(image);
    debug!(
        "original resolution {}x{}, prescale factor {}",
        img_w, img_h, prescale_factor
    );

    let t = Instant::now();
    let mut feature_map = features::extract_features(analysis, tuning);
    trace!("feature extraction: {:?}", t.elapsed());

    let t = Instant::now();
    features::apply_boosts(&mut feature_map, &scaled_boosts);
    trace!("boost overlay: {:?}", t.elapsed());

    let t = Instant::now();
    let sample = features::down_sample(&feature_map, tuning.score_down_sample);
    trace!("downsample: {:?}", t.elapsed());
    if sample.width() == 0 || sample.height() == 0 {
        return Err(SmartcropError::ImageTooSmall {
            width: img_w,
            height: img_h,
        });
    }

    let crop_w = chop(width as f64 * scale * prescale_factor);
    let crop_h = chop(height as f64 * scale * prescale_factor);
    let real_min_scale = tuning.max_scale.min((1.0 / scale).max(tuning.min_scale));
    debug!(
        "scale {}, crop window {}x{}, min scale {}",
        scale, crop_w, crop_h, real_min_scale
    );

    let regions = candidates(
        feature_map.width(),
        feature_map.height(),
        crop_w,
        crop_h,
        real_min_scale,
        tuning,
    );
    debug!("scoring {} candidates", regions.len());

    // Candidates are independent; score them in parallel and reduce
    // deterministically: highest total wins, ties go to the earliest
    // enumerated candidate, matching a sequential strictly-greater scan.
    let t = Instant::now();
    let best = regions
        .par_iter()
        .enumerate()
        .map(|(index, region)| {
            let crop = Crop {
                region: *region,
                score: score_candidate(&sample, region, tuning),
            };
            (index, crop.total_score(tuning), crop)
        })
        .reduce_with(|a, b| {
            if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
                b
            } else {
                a
            }
        });
    trace!("scoring: {:?}", t.elapsed());

    let Some((_, _, mut best)) = best else {
        return Err(SmartcropError::NoCandidates {
            crop_width: crop_w as u32,
            crop_height: crop_h as u32,
        });
    };

    // Map the winner back to original-image coordinates. Each edge is
    // divided separately so the region stays aligned with what the caller
    // will actually cut.
    if prescale_factor < 1.0 {
        let min_x = chop(best.region.x as f64 / prescale_factor) as u32;
        let min_y = chop(best.region.y as f64 / prescale_factor) as u32;
        let max_x = chop(best.region.right() as f64 / prescale_factor) as u32;
        let max_y = chop(best.region.bottom() as f64 / prescale_factor) as u32;
        best.region = CropRegion {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        };
    }

    Ok(best)
}
