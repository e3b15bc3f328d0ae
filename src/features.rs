//! Feature-map construction: per-pixel detail, skin, and saturation
//! likelihoods plus externally supplied boost regions, packed into the four
//! channels of one scratch `RgbaImage`, then block-reduced for scoring.
//!
//! Channel layout: R = skin, G = detail, B = saturation, A = boost. The
//! channels are scratch data, not color.

use image::RgbaImage;

use crate::config::Tuning;
use crate::crop::BoostRegion;

/// Channel index for skin likelihood.
pub(crate) const CHAN_SKIN: usize = 0;
/// Channel index for detail / edge strength.
pub(crate) const CHAN_DETAIL: usize = 1;
/// Channel index for saturation likelihood.
pub(crate) const CHAN_SATURATION: usize = 2;
/// Channel index for boost weight.
pub(crate) const CHAN_BOOST: usize = 3;

/// Clamp a channel value to the representable range.
pub(crate) fn bounds(v: f64) -> f64 {
    v.clamp(0.0, 255.0)
}

/// Luma used by the detail and brightness gates.
///
/// The coefficients deliberately weigh blue heaviest and red lightest,
/// the opposite of ITU luma. The scoring heuristics were tuned against
/// this exact weighting; do not "fix" it.
pub(crate) fn cie(r: u8, g: u8, b: u8) -> f64 {
    0.5126 * b as f64 + 0.7152 * g as f64 + 0.0722 * r as f64
}

/// Similarity of a pixel's color direction to the reference skin tone.
///
/// A zero-magnitude (black) pixel divides to NaN, which fails the
/// threshold comparison at the call site and scores as no skin.
fn skin_likelihood(r: u8, g: u8, b: u8, skin_color: &[f64; 3]) -> f64 {
    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    let mag = (rf * rf + gf * gf + bf * bf).sqrt();

    let rd = rf / mag - skin_color[0];
    let gd = gf / mag - skin_color[1];
    let bd = bf / mag - skin_color[2];

    1.0 - (rd * rd + gd * gd + bd * bd).sqrt()
}

/// HSL saturation of a pixel.
fn saturation(r: u8, g: u8, b: u8) -> f64 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return 0.0;
    }

    let maximum = max as f64 / 255.0;
    let minimum = min as f64 / 255.0;
    let l = (maximum + minimum) / 2.0;
    let d = maximum - minimum;

    if l > 0.5 {
        d / (2.0 - maximum - minimum)
    } else {
        d / (maximum + minimum)
    }
}

/// Build the feature buffer for `img`: detail, skin, and saturation passes
/// each read the source image and write their own channel of a shared,
/// zero-initialized output buffer. Pass order does not matter.
pub(crate) fn extract_features(img: &RgbaImage, tuning: &Tuning) -> RgbaImage {
    let mut out = RgbaImage::new(img.width(), img.height());
    detail_detect(img, &mut out);
    skin_detect(img, &mut out, tuning);
    saturation_detect(img, &mut out, tuning);
    out
}

/// Detail pass: 4-neighbor Laplacian of luma for interior pixels, raw luma
/// on the border.
fn detail_detect(img: &RgbaImage, out: &mut RgbaImage) {
    let width = img.width();
    let height = img.height();

    // Luma cache so each value is computed once instead of five times.
    let mut lumas = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let p = img.get_pixel(x, y).0;
            lumas.push(cie(p[0], p[1], p[2]));
        }
    }

    let idx = |x: u32, y: u32| (y * width + x) as usize;
    for y in 0..height {
        for x in 0..width {
            let lightness = if x == 0 || x >= width - 1 || y == 0 || y >= height - 1 {
                lumas[idx(x, y)]
            } else {
                lumas[idx(x, y)] * 4.0
                    - lumas[idx(x, y - 1)]
                    - lumas[idx(x - 1, y)]
                    - lumas[idx(x + 1, y)]
                    - lumas[idx(x, y + 1)]
            };

            out.get_pixel_mut(x, y).0[CHAN_DETAIL] = bounds(lightness) as u8;
        }
    }
}

/// Skin pass: remap likelihood above the threshold into `[0, 255]` for
/// pixels within the brightness window.
fn skin_detect(img: &RgbaImage, out: &mut RgbaImage, tuning: &Tuning) {
    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let lightness = cie(r, g, b) / 255.0;
        let skin = skin_likelihood(r, g, b, &tuning.skin_color);

        let value = if skin > tuning.skin_threshold
            && lightness >= tuning.skin_brightness_min
            && lightness <= tuning.skin_brightness_max
        {
            (skin - tuning.skin_threshold) * (255.0 / (1.0 - tuning.skin_threshold))
        } else {
            0.0
        };

        out.get_pixel_mut(x, y).0[CHAN_SKIN] = bounds(value) as u8;
    }
}

/// Saturation pass: same shape as the skin pass with its own threshold and
/// brightness window.
fn saturation_detect(img: &RgbaImage, out: &mut RgbaImage, tuning: &Tuning) {
    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let lightness = cie(r, g, b) / 255.0;
        let sat = saturation(r, g, b);

        let value = if sat > tuning.saturation_threshold
            && lightness >= tuning.saturation_brightness_min
            && lightness <= tuning.saturation_brightness_max
        {
            (sat - tuning.saturation_threshold) * (255.0 / (1.0 - tuning.saturation_threshold))
        } else {
            0.0
        };

        out.get_pixel_mut(x, y).0[CHAN_SATURATION] = bounds(value) as u8;
    }
}

/// Write boost regions into the boost channel, in list order. Overlapping
/// regions overwrite each other (last writer wins); parts outside the
/// buffer are clipped.
pub(crate) fn apply_boosts(out: &mut RgbaImage, boosts: &[BoostRegion]) {
    for boost in boosts {
        apply_boost(out, boost);
    }
}

fn apply_boost(out: &mut RgbaImage, boost: &BoostRegion) {
    let width = out.width() as i64;
    let height = out.height() as i64;

    // Widen before adding so a region near i32::MAX cannot overflow.
    let x0 = (boost.x as i64).max(0);
    let y0 = (boost.y as i64).max(0);
    let x1 = (boost.x as i64 + boost.width as i64).min(width);
    let y1 = (boost.y as i64 + boost.height as i64).min(height);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let weight = bounds(boost.weight * 255.0) as u8;
    for y in y0..y1 {
        for x in x0..x1 {
            out.get_pixel_mut(x as u32, y as u32).0[CHAN_BOOST] = weight;
        }
    }
}

/// Block-reduce the feature buffer by `factor` in both axes. Edge pixels
/// that do not fill a whole block are dropped.
///
/// Skin and detail blend the block mean with the block max so thin
/// high-value features survive the reduction; saturation and boost are
/// plain means.
pub(crate) fn down_sample(input: &RgbaImage, factor: u32) -> RgbaImage {
    let width = input.width() / factor;
    let height = input.height() / factor;
    let mut output = RgbaImage::new(width, height);
    let inv_area = 1.0 / (factor as f64 * factor as f64);

    for y in 0..height {
        for x in 0..width {
            let mut sums = [0u32; 4];
            let mut max_skin = 0u8;
            let mut max_detail = 0u8;

            for v in 0..factor {
                for u in 0..factor {
                    let p = input.get_pixel(x * factor + u, y * factor + v).0;
                    for (sum, value) in sums.iter_mut().zip(p) {
                        *sum += value as u32;
                    }
                    max_skin = max_skin.max(p[CHAN_SKIN]);
                    max_detail = max_detail.max(p[CHAN_DETAIL]);
                }
            }

            let mean = |c: usize| sums[c] as f64 * inv_area;
            output.put_pixel(
                x,
                y,
                image::Rgba([
                    bounds(mean(CHAN_SKIN) * 0.5 + max_skin as f64 * 0.5) as u8,
                    bounds(mean(CHAN_DETAIL) * 0.7 + max_detail as f64 * 0.3) as u8,
                    bounds(mean(CHAN_SATURATION)) as u8,
                    bounds(mean(CHAN_BOOST)) as u8,
                ]),
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn cie_weighs_blue_heaviest() {
        // Inverted relative to ITU luma on purpose; pinned here so an
        // accidental "fix" shows up as a test failure.
        assert!((cie(0, 0, 255) - 130.713).abs() < 1e-9);
        assert!((cie(0, 255, 0) - 182.376).abs() < 1e-9);
        assert!((cie(255, 0, 0) - 18.411).abs() < 1e-9);
    }

    #[test]
    fn skin_pass_flags_skin_toned_pixels() {
        // (156, 114, 88) is the reference skin direction scaled by 200.
        let img = solid(2, 2, [156, 114, 88, 255]);
        let out = extract_features(&img, &Tuning::default());
        assert!(out.get_pixel(0, 0).0[CHAN_SKIN] > 100);
    }

    #[test]
    fn skin_pass_ignores_gray_and_black() {
        let tuning = Tuning::default();
        let gray = extract_features(&solid(2, 2, [128, 128, 128, 255]), &tuning);
        assert_eq!(gray.get_pixel(0, 0).0[CHAN_SKIN], 0);

        // Black has no color direction; the NaN likelihood must not panic
        // and must score zero.
        let black = extract_features(&solid(2, 2, [0, 0, 0, 255]), &tuning);
        assert_eq!(black.get_pixel(0, 0).0[CHAN_SKIN], 0);
    }

    #[test]
    fn saturation_pass_flags_pure_red() {
        // Pure red: saturation 1.0, luma 0.0722 — inside the brightness
        // window, fully above the threshold.
        let out = extract_features(&solid(2, 2, [255, 0, 0, 255]), &Tuning::default());
        assert_eq!(out.get_pixel(0, 0).0[CHAN_SATURATION], 255);
    }

    #[test]
    fn saturation_pass_ignores_gray() {
        let out = extract_features(&solid(2, 2, [90, 90, 90, 255]), &Tuning::default());
        assert_eq!(out.get_pixel(0, 0).0[CHAN_SATURATION], 0);
    }

    #[test]
    fn detail_pass_uses_raw_luma_on_borders() {
        let img = solid(3, 3, [128, 128, 128, 255]);
        let out = extract_features(&img, &Tuning::default());
        // Interior pixel of a flat image has a zero Laplacian.
        assert_eq!(out.get_pixel(1, 1).0[CHAN_DETAIL], 0);
        // Border pixels carry raw luma instead.
        let luma = bounds(cie(128, 128, 128)) as u8;
        assert_eq!(out.get_pixel(0, 0).0[CHAN_DETAIL], luma);
        assert_eq!(out.get_pixel(2, 1).0[CHAN_DETAIL], luma);
    }

    #[test]
    fn detail_pass_responds_to_contrast() {
        let mut img = solid(5, 5, [0, 0, 0, 255]);
        img.put_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let out = extract_features(&img, &Tuning::default());
        assert_eq!(out.get_pixel(2, 2).0[CHAN_DETAIL], 255);
    }

    #[test]
    fn boost_overlay_clips_to_bounds() {
        let mut buf = RgbaImage::new(4, 4);
        apply_boosts(
            &mut buf,
            &[BoostRegion {
                x: -2,
                y: -2,
                width: 4,
                height: 4,
                weight: 1.0,
            }],
        );
        assert_eq!(buf.get_pixel(0, 0).0[CHAN_BOOST], 255);
        assert_eq!(buf.get_pixel(1, 1).0[CHAN_BOOST], 255);
        assert_eq!(buf.get_pixel(2, 2).0[CHAN_BOOST], 0);
    }

    #[test]
    fn boost_overlay_last_writer_wins() {
        let mut buf = RgbaImage::new(4, 4);
        apply_boosts(
            &mut buf,
            &[
                BoostRegion {
                    x: 0,
                    y: 0,
                    width: 4,
                    height: 4,
                    weight: 1.0,
                },
                BoostRegion {
                    x: 0,
                    y: 0,
                    width: 2,
                    height: 2,
                    weight: 0.5,
                },
            ],
        );
        assert_eq!(buf.get_pixel(0, 0).0[CHAN_BOOST], 127);
        assert_eq!(buf.get_pixel(3, 3).0[CHAN_BOOST], 255);
    }

    #[test]
    fn boost_overlay_clamps_weight() {
        let mut buf = RgbaImage::new(2, 2);
        apply_boosts(
            &mut buf,
            &[
                BoostRegion {
                    x: 0,
                    y: 0,
                    width: 1,
                    height: 1,
                    weight: 7.0,
                },
                BoostRegion {
                    x: 1,
                    y: 0,
                    width: 1,
                    height: 1,
                    weight: -1.0,
                },
            ],
        );
        assert_eq!(buf.get_pixel(0, 0).0[CHAN_BOOST], 255);
        assert_eq!(buf.get_pixel(1, 0).0[CHAN_BOOST], 0);
    }

    #[test]
    fn down_sample_blends_mean_and_max() {
        // One hot pixel in a 4x4 block: mean = 255/16 = 15.9375.
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let out = down_sample(&img, 4);
        assert_eq!(out.width(), 1);
        assert_eq!(out.height(), 1);

        let p = out.get_pixel(0, 0).0;
        assert_eq!(p[CHAN_SKIN], 135); // 15.9375 * 0.5 + 255 * 0.5
        assert_eq!(p[CHAN_DETAIL], 87); // 15.9375 * 0.7 + 255 * 0.3
        assert_eq!(p[CHAN_SATURATION], 15); // plain mean
        assert_eq!(p[CHAN_BOOST], 15); // plain mean
    }

    #[test]
    fn down_sample_drops_partial_blocks() {
        let img = RgbaImage::new(10, 7);
        let out = down_sample(&img, 4);
        assert_eq!((out.width(), out.height()), (2, 1));
    }
}
