//! Face detection seam: detections become weighted boost regions that pull
//! the crop toward including them.

use crate::crop::BoostRegion;

/// Boost weight assigned to detected faces.
const FACE_BOOST_WEIGHT: f64 = 1.0;

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

/// Pluggable face detection backend.
///
/// Implement this trait to provide a custom face detector (ONNX, dlib,
/// etc.), then feed its output through [`boost_regions`] into
/// [`crate::CropAnalyzer::find_best_crop`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height`
    /// bytes. Coordinates are in the buffer's pixel space.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds>;
}

/// Convert detections at or above `min_confidence` into boost regions with
/// full weight.
///
/// Detector boxes may extend past the image edges; that is fine, the boost
/// overlay clips them.
pub fn boost_regions(faces: &[FaceBounds], min_confidence: f64) -> Vec<BoostRegion> {
    faces
        .iter()
        .filter(|face| face.confidence >= min_confidence)
        .map(|face| BoostRegion {
            x: face.x as i32,
            y: face.y as i32,
            width: face.width as i32,
            height: face.height as i32,
            weight: FACE_BOOST_WEIGHT,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(confidence: f64) -> FaceBounds {
        FaceBounds {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            confidence,
        }
    }

    #[test]
    fn low_confidence_detections_are_dropped() {
        let faces = [face(0.2), face(0.9)];
        let boosts = boost_regions(&faces, 0.4);
        assert_eq!(boosts.len(), 1);
        assert_eq!(boosts[0].weight, 1.0);
    }

    #[test]
    fn coordinates_truncate_to_pixels() {
        let faces = [FaceBounds {
            x: 10.9,
            y: -3.2,
            width: 30.5,
            height: 40.5,
            confidence: 1.0,
        }];
        let boosts = boost_regions(&faces, 0.0);
        assert_eq!(boosts[0].x, 10);
        assert_eq!(boosts[0].y, -3);
        assert_eq!(boosts[0].width, 30);
        assert_eq!(boosts[0].height, 40);
    }
}
