//! Test doubles shared by the unit tests.

use std::collections::{HashMap, VecDeque};

use anyhow::anyhow;
use tryon_image::{Color, Image, Resolution};

use crate::asset::{AssetId, AssetSource};
use crate::camera::{CameraDevice, CameraEvent, CameraSource, Facing};
use crate::face::DetectionOptions;

/// An [`AssetSource`] that produces solid images of preset sizes.
#[derive(Default)]
pub struct MemorySource {
    sizes: HashMap<AssetId, Resolution>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, res: Resolution) -> Self {
        self.sizes.insert(AssetId::new(id), res);
        self
    }
}

impl AssetSource for MemorySource {
    fn load(&self, id: &AssetId) -> anyhow::Result<Image> {
        let res = self
            .sizes
            .get(id)
            .ok_or_else(|| anyhow!("no asset named '{}'", id))?;
        Ok(Image::filled(res.width(), res.height(), Color::RED))
    }
}

/// A [`CameraSource`] that replays queued events and records how it was driven.
pub struct FakeCamera {
    device: Option<CameraDevice>,
    active: bool,
    activations: u32,
    options: Option<DetectionOptions>,
    events: VecDeque<CameraEvent>,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            device: Some(CameraDevice::new("fake", Facing::Front)),
            active: false,
            activations: 0,
            options: None,
            events: VecDeque::new(),
        }
    }

    pub fn without_device() -> Self {
        Self {
            device: None,
            ..Self::new()
        }
    }

    pub fn set_device(&mut self, device: Option<CameraDevice>) {
        self.device = device;
    }

    pub fn push(&mut self, event: CameraEvent) {
        self.events.push_back(event);
    }

    /// Returns how often [`CameraSource::activate`] was called.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    pub fn options(&self) -> Option<DetectionOptions> {
        self.options
    }
}

impl CameraSource for FakeCamera {
    fn device(&self) -> Option<&CameraDevice> {
        self.device.as_ref()
    }

    fn activate(&mut self, active: bool) {
        self.activations += 1;
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_detection_options(&mut self, options: DetectionOptions) {
        self.options = Some(options);
    }

    fn next_event(&mut self) -> Option<CameraEvent> {
        if !self.active {
            return None;
        }
        self.events.pop_front()
    }
}
