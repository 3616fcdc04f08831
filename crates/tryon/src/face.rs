//! Face detection results and the detector interface.
//!
//! Detection itself happens outside of this crate. A [`FaceDetector`] is plugged into a
//! [`CameraSource`][crate::camera::CameraSource], which hands the detected [`Face`]s to the
//! overlay controller once per processed frame.

use serde::{Deserialize, Serialize};
use tryon_image::{Image, Rect, Resolution};

/// A face found in a camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    bounds: Rect,
}

impl Face {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Returns the axis-aligned bounding box of the face, in frame pixel coordinates.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Detector speed/accuracy trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceMode {
    #[default]
    Fast,
    Accurate,
}

/// Whether the detector should also classify facial expressions (smiling, eyes open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationMode {
    None,
    #[default]
    All,
}

/// Options forwarded to the face detector.
///
/// The viewport is the size of the surface the overlay is drawn onto; detectors report face
/// bounds in that coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    pub performance: PerformanceMode,
    pub classification: ClassificationMode,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl DetectionOptions {
    pub fn viewport(&self) -> Resolution {
        Resolution::new(self.viewport_width, self.viewport_height)
    }

    pub fn with_viewport(self, viewport: Resolution) -> Self {
        Self {
            viewport_width: viewport.width(),
            viewport_height: viewport.height(),
            ..self
        }
    }
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            performance: PerformanceMode::Fast,
            classification: ClassificationMode::All,
            viewport_width: Resolution::RES_720P.width(),
            viewport_height: Resolution::RES_720P.height(),
        }
    }
}

/// Trait implemented by face detectors.
///
/// Implementations return zero or more faces per frame. The order of the result matters: the
/// overlay is anchored to the first face only.
pub trait FaceDetector {
    fn detect(&mut self, frame: &Image, options: &DetectionOptions) -> Vec<Face>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&mut self, frame: &Image, options: &DetectionOptions) -> Vec<Face> {
        (**self).detect(frame, options)
    }
}

/// A [`FaceDetector`] that reports the same preset faces for every frame.
///
/// Useful for replaying recorded frames whose face positions are already known.
#[derive(Debug, Clone, Default)]
pub struct FixedFaceDetector {
    faces: Vec<Face>,
}

impl FixedFaceDetector {
    pub fn new(faces: impl IntoIterator<Item = Face>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }
}

impl FaceDetector for FixedFaceDetector {
    fn detect(&mut self, frame: &Image, _options: &DetectionOptions) -> Vec<Face> {
        log::trace!("reporting {} preset face(s) for {:?}", self.faces.len(), frame);
        self.faces.clone()
    }
}
