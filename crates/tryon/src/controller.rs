//! The try-on screen state machine.
//!
//! [`OverlayController`] owns everything that is shared between the camera, the asset loader and
//! the renderer: the activation state, the selected asset and the current overlay placements. All
//! of its methods are called from one thread; detection results and load completions are handed
//! to it by the caller (see [`Session`][crate::session::Session]).

use std::time::{Duration, Instant};

use tryon_image::{Image, Rect};

use crate::accessory::{AccessoryKind, AccessoryStrategy};
use crate::asset::{AssetId, LoadedAsset};
use crate::camera::CameraSource;
use crate::error::Fault;
use crate::face::{DetectionOptions, Face};
use crate::geometry::Placements;
use crate::loader::{AssetLoader, LoadCompletion, SelectionToken};
use crate::permission::PermissionGate;
use crate::renderer::OverlayRenderer;

/// Banner shown above the camera preview.
pub const INSTRUCTIONS: &str =
    "Face a light source, align your face, and tuck your hair behind your ears.";

/// Whether the camera and overlay are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    #[default]
    Inactive,
    Active,
}

/// What the try-on screen should currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Camera access is missing; the user has to be sent to the permission flow.
    RequestPermission,
    /// There is no camera device to use.
    NoDevice,
    /// The camera preview with the jewelry overlay.
    Camera,
}

/// An overlay ready to be drawn: the asset image and where to draw it.
#[derive(Debug)]
pub struct Overlay<'a> {
    pub image: &'a Image,
    pub rects: Placements,
}

pub struct OverlayController {
    strategy: Box<dyn AccessoryStrategy>,
    loader: AssetLoader,
    detection: DetectionOptions,
    activation: Activation,
    permission_requested: bool,
    selected: AssetId,
    pending: Option<SelectionToken>,
    asset: Option<LoadedAsset>,
    placements: Placements,
}

impl OverlayController {
    /// Creates an inactive controller and starts loading the default asset of the strategy's
    /// accessory kind.
    pub fn new(strategy: Box<dyn AccessoryStrategy>, mut loader: AssetLoader) -> Self {
        let selected = strategy.kind().default_asset();
        let pending = Some(loader.request(selected.clone()));
        let placements = strategy.initial_placements();

        Self {
            strategy,
            loader,
            detection: DetectionOptions::default(),
            activation: Activation::Inactive,
            permission_requested: false,
            selected,
            pending,
            asset: None,
            placements,
        }
    }

    /// Sets the options passed to the camera's face detector on [`OverlayController::start`].
    pub fn with_detection_options(mut self, options: DetectionOptions) -> Self {
        self.detection = options;
        self
    }

    pub fn kind(&self) -> AccessoryKind {
        self.strategy.kind()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn is_active(&self) -> bool {
        self.activation == Activation::Active
    }

    /// Determines what the try-on screen should show, based on the current camera permission and
    /// device.
    ///
    /// If permission is missing, the gate is asked for it, once per controller.
    pub fn screen<G, C>(&mut self, gate: &mut G, camera: &C) -> Screen
    where
        G: PermissionGate + ?Sized,
        C: CameraSource + ?Sized,
    {
        if !self.ensure_permission(gate) {
            Screen::RequestPermission
        } else if camera.device().is_none() {
            Screen::NoDevice
        } else {
            Screen::Camera
        }
    }

    fn ensure_permission<G: PermissionGate + ?Sized>(&mut self, gate: &mut G) -> bool {
        if gate.has_permission() {
            return true;
        }
        if self.permission_requested {
            return false;
        }
        self.permission_requested = true;
        log::debug!("requesting camera permission");
        gate.request_permission()
    }

    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    /// Returns the most recently selected asset. It may still be loading.
    pub fn selected(&self) -> &AssetId {
        &self.selected
    }

    /// Returns the token of the selection that is still loading, if any.
    pub fn pending(&self) -> Option<SelectionToken> {
        self.pending
    }

    /// Returns the asset that is currently drawn.
    pub fn asset(&self) -> Option<&LoadedAsset> {
        self.asset.as_ref()
    }

    pub fn placements(&self) -> &Placements {
        &self.placements
    }

    /// Starts the camera and the overlay.
    ///
    /// Requires camera permission and a camera device. If permission is missing, the gate is
    /// asked for it once per controller. Starting an active controller does nothing.
    pub fn start<G, C>(&mut self, gate: &mut G, camera: &mut C) -> Result<(), Fault>
    where
        G: PermissionGate + ?Sized,
        C: CameraSource + ?Sized,
    {
        if self.is_active() {
            return Ok(());
        }

        if !self.ensure_permission(gate) {
            return Err(Fault::PermissionDenied);
        }
        let Some(device) = camera.device() else {
            return Err(Fault::DeviceUnavailable);
        };
        log::debug!("starting {} try-on with {}", self.kind(), device);

        camera.set_detection_options(self.detection);
        camera.activate(true);
        self.activation = Activation::Active;
        Ok(())
    }

    /// Stops the camera. Stopping an inactive controller does nothing.
    pub fn stop<C: CameraSource + ?Sized>(&mut self, camera: &mut C) {
        if !self.is_active() {
            return;
        }
        log::debug!("stopping {} try-on", self.kind());
        camera.activate(false);
        self.activation = Activation::Inactive;
    }

    /// Called when the screen loses focus.
    pub fn focus_lost<C: CameraSource + ?Sized>(&mut self, camera: &mut C) {
        log::trace!("focus lost");
        self.stop(camera);
    }

    /// Selects a new asset and starts loading it.
    ///
    /// The asset currently drawn stays visible until the new one has loaded. Only the latest
    /// selection is ever applied.
    pub fn select_asset(&mut self, asset: AssetId) -> Result<SelectionToken, Fault> {
        let kind = self.kind();
        if !kind.offers(&asset) {
            return Err(Fault::UnknownAsset { kind, asset });
        }

        let token = self.loader.request(asset.clone());
        self.selected = asset;
        self.pending = Some(token);
        Ok(token)
    }

    /// Applies the result of a load request.
    ///
    /// Returns `Ok(true)` if the asset was replaced and `Ok(false)` if the completion belongs to
    /// a superseded selection and was dropped. A failed load leaves the current asset in place.
    pub fn apply_completion(&mut self, completion: LoadCompletion) -> Result<bool, Fault> {
        let LoadCompletion {
            token,
            asset,
            result,
        } = completion;

        if self.loader.latest() != Some(token) {
            log::debug!("dropping superseded load of '{}' ({:?})", asset, token);
            return Ok(false);
        }
        self.pending = None;

        match result {
            Ok(loaded) => {
                log::debug!("now showing {:?}", loaded);
                self.asset = Some(loaded);
                Ok(true)
            }
            Err(source) => Err(Fault::AssetDecodeFailure { asset, source }),
        }
    }

    /// Applies all load completions that are available without blocking.
    ///
    /// Returns whether the displayed asset changed.
    pub fn poll_loads(&mut self) -> bool {
        let mut changed = false;
        for completion in self.loader.poll() {
            changed |= self.apply_logged(completion);
        }
        changed
    }

    /// Blocks until the pending selection has been loaded or `timeout` expires.
    ///
    /// Returns `true` if nothing is pending anymore.
    pub fn wait_for_load(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.loader.wait(remaining) {
                Some(completion) => {
                    self.apply_logged(completion);
                }
                None => break,
            }
        }
        self.pending.is_none()
    }

    fn apply_logged(&mut self, completion: LoadCompletion) -> bool {
        match self.apply_completion(completion) {
            Ok(changed) => changed,
            Err(fault) => {
                log::error!("{:#}", anyhow::Error::new(fault));
                false
            }
        }
    }

    /// Handles the faces detected in a camera frame.
    ///
    /// Only the first face is used. The placements are left unchanged if the controller is
    /// inactive, no face was detected, or no asset has been loaded yet. Returns whether the
    /// placements were updated.
    pub fn on_faces(&mut self, faces: &[Face]) -> bool {
        if !self.is_active() {
            log::trace!("ignoring detection while inactive");
            return false;
        }
        let Some(face) = faces.first() else {
            return false;
        };
        if faces.len() > 1 {
            log::trace!("{} faces detected, using the first", faces.len());
        }

        let intrinsic = self.asset.as_ref().map(|a| a.intrinsic()).unwrap_or_default();
        match self.strategy.place(&face.bounds(), intrinsic) {
            Some(placements) => {
                self.placements = placements;
                true
            }
            None => false,
        }
    }

    /// Handles a runtime error reported by the camera. These are never fatal.
    pub fn on_camera_error(&mut self, error: anyhow::Error) {
        log::error!("{:#}", anyhow::Error::new(Fault::CameraRuntime(error)));
    }

    /// Returns the overlay to draw, if there is one.
    ///
    /// An overlay exists only while the controller is active, an asset has been loaded and the
    /// camera has a device.
    pub fn overlay<C: CameraSource + ?Sized>(&self, camera: &C) -> Option<Overlay<'_>> {
        if !self.is_active() || camera.device().is_none() {
            return None;
        }
        let asset = self.asset.as_ref()?;

        let (dx, dy) = self.strategy.render_offset();
        let rects = self
            .placements
            .iter()
            .map(|rect: &Rect| rect.move_by(dx, dy))
            .collect();
        Some(Overlay {
            image: asset.image(),
            rects,
        })
    }

    /// Draws the overlay onto `frame`. Returns whether anything was drawn.
    pub fn draw<C, R>(&self, camera: &C, renderer: &mut R, frame: &mut Image) -> bool
    where
        C: CameraSource + ?Sized,
        R: OverlayRenderer + ?Sized,
    {
        let Some(overlay) = self.overlay(camera) else {
            return false;
        };
        for rect in overlay.rects {
            renderer.draw(frame, Some(overlay.image), rect);
        }
        true
    }
}
