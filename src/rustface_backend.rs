use std::path::Path;

use crate::error::SmartcropError;
use crate::face_detector::{FaceBounds, FaceDetector};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// Loads a SeetaFace frontal-face model from a caller-supplied path; model
/// files are not bundled. The parsed model is kept and a detector instance
/// is built per call, since `rustface` detectors are not `Sync`.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace model (e.g. `seeta_fd_frontal_v1.0.bin`) from disk.
    pub fn from_model_path<P: AsRef<Path>>(path: P) -> Result<Self, SmartcropError> {
        let data = std::fs::read(path.as_ref()).map_err(|e| {
            SmartcropError::ModelLoad(format!("{}: {e}", path.as_ref().display()))
        })?;
        let model = rustface::read_model(std::io::Cursor::new(data))
            .map_err(|e| SmartcropError::ModelLoad(e.to_string()))?;
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect()
    }
}
