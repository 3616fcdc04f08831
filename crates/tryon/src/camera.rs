//! Camera abstraction.
//!
//! A [`CameraSource`] produces frames together with the faces detected in them. While the source
//! is inactive it produces nothing.

use std::{collections::VecDeque, fmt, path::PathBuf};

use tryon_image::Image;

use crate::face::{DetectionOptions, Face, FaceDetector};
use crate::timer::Timer;

/// Which way a camera points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Front,
    Back,
}

/// A camera device that frames can be captured from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    name: String,
    facing: Facing,
}

impl CameraDevice {
    pub fn new<N: Into<String>>(name: N, facing: Facing) -> Self {
        Self {
            name: name.into(),
            facing,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }
}

impl fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.name, self.facing)
    }
}

/// An event produced by a [`CameraSource`].
#[derive(Debug)]
pub enum CameraEvent {
    /// A captured frame and the faces detected in it.
    Frame { frame: Image, faces: Vec<Face> },
    /// A runtime error of the camera. The stream may continue afterwards.
    Error(anyhow::Error),
}

/// Trait implemented by camera frame sources.
pub trait CameraSource {
    /// Returns the resolved camera device, or [`None`] if there is no usable camera.
    fn device(&self) -> Option<&CameraDevice>;

    fn activate(&mut self, active: bool);

    fn is_active(&self) -> bool;

    fn set_detection_options(&mut self, options: DetectionOptions);

    /// Returns the next event, or [`None`] when the source is inactive or the stream has ended.
    fn next_event(&mut self) -> Option<CameraEvent>;
}

/// Replays image files as camera frames, running a [`FaceDetector`] on each of them.
pub struct ReplayCamera<D: FaceDetector> {
    device: Option<CameraDevice>,
    frames: VecDeque<PathBuf>,
    detector: D,
    options: DetectionOptions,
    active: bool,
    t_detect: Timer,
}

impl<D: FaceDetector> ReplayCamera<D> {
    pub fn new<I, P>(frames: I, detector: D) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            device: Some(CameraDevice::new("replay", Facing::Front)),
            frames: frames.into_iter().map(Into::into).collect(),
            detector,
            options: DetectionOptions::default(),
            active: false,
            t_detect: Timer::new("detect"),
        }
    }

    /// Removes the camera device, simulating a system without a usable camera.
    pub fn without_device(mut self) -> Self {
        self.device = None;
        self
    }

    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Returns the number of frames that have not been replayed yet.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn timers(&self) -> impl IntoIterator<Item = &Timer> + '_ {
        [&self.t_detect]
    }
}

impl<D: FaceDetector> CameraSource for ReplayCamera<D> {
    fn device(&self) -> Option<&CameraDevice> {
        self.device.as_ref()
    }

    fn activate(&mut self, active: bool) {
        if self.active != active {
            log::debug!("replay camera active={}", active);
        }
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_detection_options(&mut self, options: DetectionOptions) {
        self.options = options;
    }

    fn next_event(&mut self) -> Option<CameraEvent> {
        if !self.active || self.device.is_none() {
            return None;
        }

        let path = self.frames.pop_front()?;
        let frame = match Image::load(&path) {
            Ok(frame) => frame,
            Err(e) => return Some(CameraEvent::Error(e)),
        };
        let faces = self
            .t_detect
            .time(|| self.detector.detect(&frame, &self.options));
        log::trace!("{}: {} face(s)", path.display(), faces.len());

        Some(CameraEvent::Frame { frame, faces })
    }
}
