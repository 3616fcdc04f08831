//! The frame loop driving a try-on screen.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use tryon_image::Image;

use crate::asset::AssetId;
use crate::camera::{CameraEvent, CameraSource};
use crate::controller::{OverlayController, Screen};
use crate::error::Fault;
use crate::permission::PermissionGate;
use crate::renderer::OverlayRenderer;
use crate::timer::{FpsCounter, Timer};

/// Receives the composited frames of a [`Session`].
pub trait FrameSink {
    fn consume(&mut self, index: usize, frame: &Image) -> anyhow::Result<()>;
}

/// Collects frames in memory.
impl FrameSink for Vec<Image> {
    fn consume(&mut self, _index: usize, frame: &Image) -> anyhow::Result<()> {
        self.push(frame.clone());
        Ok(())
    }
}

/// Writes frames to a directory as `frame_0000.png`, `frame_0001.png`, ...
pub struct DirectorySink {
    dir: PathBuf,
    written: usize,
}

impl DirectorySink {
    /// Creates the sink, creating `dir` if it does not exist.
    pub fn new<P: Into<PathBuf>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        Ok(Self { dir, written: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the number of frames written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path_of(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{:04}.png", index))
    }
}

impl FrameSink for DirectorySink {
    fn consume(&mut self, index: usize, frame: &Image) -> anyhow::Result<()> {
        frame.save(self.path_of(index))?;
        self.written += 1;
        Ok(())
    }
}

/// Scripted user interaction for a [`Session`].
///
/// Steps count camera events, including errors.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    /// Assets to select, and the step before which to select them.
    pub selections: Vec<(usize, AssetId)>,
    /// Step before which the screen loses focus.
    pub focus_lost_at: Option<usize>,
    /// How long to wait for an asset to finish loading.
    pub load_timeout: Duration,
    /// Whether to wait for every selection to load before processing the next frame.
    pub block_on_selection: bool,
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self {
            selections: Vec::new(),
            focus_lost_at: None,
            load_timeout: Duration::from_secs(5),
            block_on_selection: false,
        }
    }
}

/// What happened during a [`Session::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub screen: Screen,
    /// Number of frames handed to the sink.
    pub frames: usize,
    /// Number of frames that had the overlay drawn onto them.
    pub overlaid: usize,
    pub camera_errors: usize,
}

pub struct Session<G, C, R, S> {
    controller: OverlayController,
    gate: G,
    camera: C,
    renderer: R,
    sink: S,
    fps: FpsCounter,
    t_frame: Timer,
}

impl<G, C, R, S> Session<G, C, R, S>
where
    G: PermissionGate,
    C: CameraSource,
    R: OverlayRenderer,
    S: FrameSink,
{
    pub fn new(controller: OverlayController, gate: G, camera: C, renderer: R, sink: S) -> Self {
        Self {
            controller,
            gate,
            camera,
            renderer,
            sink,
            fps: FpsCounter::new("session"),
            t_frame: Timer::new("frame"),
        }
    }

    pub fn controller(&self) -> &OverlayController {
        &self.controller
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Starts the try-on screen and processes camera events until the camera runs dry or the
    /// screen is deactivated.
    ///
    /// A missing permission or camera device is not an error: the session ends immediately and
    /// the report names the screen to show instead.
    pub fn run(&mut self, plan: &SessionPlan) -> anyhow::Result<SessionReport> {
        let mut report = SessionReport {
            screen: Screen::Camera,
            frames: 0,
            overlaid: 0,
            camera_errors: 0,
        };

        match self.controller.start(&mut self.gate, &mut self.camera) {
            Ok(()) => {}
            Err(fault @ (Fault::PermissionDenied | Fault::DeviceUnavailable)) => {
                log::warn!("{}", fault);
                report.screen = self.controller.screen(&mut self.gate, &self.camera);
                return Ok(report);
            }
            Err(fault) => return Err(fault.into()),
        }

        if !self.controller.wait_for_load(plan.load_timeout) {
            log::warn!(
                "'{}' did not load within {:?}",
                self.controller.selected(),
                plan.load_timeout
            );
        }

        let mut step = 0;
        loop {
            for (_, asset) in plan.selections.iter().filter(|(at, _)| *at == step) {
                if let Err(fault) = self.controller.select_asset(asset.clone()) {
                    log::error!("{}", fault);
                    continue;
                }
                if plan.block_on_selection {
                    self.controller.wait_for_load(plan.load_timeout);
                }
            }
            if plan.focus_lost_at == Some(step) {
                self.controller.focus_lost(&mut self.camera);
            }

            let Some(event) = self.camera.next_event() else {
                break;
            };
            match event {
                CameraEvent::Frame { mut frame, faces } => {
                    let guard = self.t_frame.start();
                    self.controller.poll_loads();
                    self.controller.on_faces(&faces);
                    if self
                        .controller
                        .draw(&self.camera, &mut self.renderer, &mut frame)
                    {
                        report.overlaid += 1;
                    }
                    drop(guard);

                    self.sink.consume(report.frames, &frame)?;
                    report.frames += 1;
                }
                CameraEvent::Error(error) => {
                    self.controller.on_camera_error(error);
                    report.camera_errors += 1;
                }
            }

            step += 1;
            self.fps.tick_with([&self.t_frame]);
        }

        self.controller.stop(&mut self.camera);
        report.screen = self.controller.screen(&mut self.gate, &self.camera);
        log::debug!("session finished: {:?}", report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use tryon_image::{Color, Rect, Resolution};

    use super::*;
    use crate::accessory::{Earrings, Necklace};
    use crate::face::Face;
    use crate::loader::AssetLoader;
    use crate::permission::StaticPermission;
    use crate::renderer::BlendRenderer;
    use crate::test::{FakeCamera, MemorySource};

    fn frame_event(faces: Vec<Face>) -> CameraEvent {
        CameraEvent::Frame {
            frame: Image::filled(64, 64, Color::BLACK),
            faces,
        }
    }

    fn face() -> Face {
        Face::new(Rect::from_top_left(10.0, 10.0, 30.0, 30.0))
    }

    #[test]
    fn overlays_every_frame() {
        let source = MemorySource::new().with("ear9", Resolution::new(10, 20));
        let controller =
            OverlayController::new(Box::new(Earrings::default()), AssetLoader::spawn(source).unwrap());
        let mut camera = FakeCamera::new();
        camera.push(frame_event(vec![face()]));
        camera.push(CameraEvent::Error(anyhow::anyhow!("dropped frame")));
        camera.push(frame_event(vec![]));

        let mut session = Session::new(
            controller,
            StaticPermission::granted(),
            camera,
            BlendRenderer::new(),
            Vec::new(),
        );
        let report = session.run(&SessionPlan::default()).unwrap();

        assert_eq!(
            report,
            SessionReport {
                screen: Screen::Camera,
                frames: 2,
                overlaid: 2,
                camera_errors: 1,
            }
        );
        assert!(!session.camera().is_active());
        assert!(!session.controller().is_active());
        assert_eq!(session.sink().len(), 2);
    }

    #[test]
    fn focus_loss_ends_rendering() {
        let source = MemorySource::new().with("neck2", Resolution::new(10, 10));
        let controller =
            OverlayController::new(Box::new(Necklace::default()), AssetLoader::spawn(source).unwrap());
        let mut camera = FakeCamera::new();
        for _ in 0..4 {
            camera.push(frame_event(vec![face()]));
        }

        let mut session = Session::new(
            controller,
            StaticPermission::granted(),
            camera,
            BlendRenderer::new(),
            Vec::new(),
        );
        let plan = SessionPlan {
            focus_lost_at: Some(2),
            ..SessionPlan::default()
        };
        let report = session.run(&plan).unwrap();

        assert_eq!(report.frames, 2);
        assert_eq!(report.overlaid, 2);
        assert!(!session.camera().is_active());
    }

    #[test]
    fn unknown_selection_is_skipped() {
        let source = MemorySource::new().with("ear9", Resolution::new(10, 20));
        let controller =
            OverlayController::new(Box::new(Earrings::default()), AssetLoader::spawn(source).unwrap());
        let mut camera = FakeCamera::new();
        camera.push(frame_event(vec![face()]));
        camera.push(frame_event(vec![face()]));

        let mut session = Session::new(
            controller,
            StaticPermission::granted(),
            camera,
            BlendRenderer::new(),
            Vec::new(),
        );
        let plan = SessionPlan {
            selections: vec![(1, AssetId::new("neck1"))],
            ..SessionPlan::default()
        };
        let report = session.run(&plan).unwrap();

        assert_eq!(report.frames, 2);
        assert_eq!(report.overlaid, 2);
        assert_eq!(session.controller().selected().as_str(), "ear9");
    }

    #[test]
    fn denied_permission_ends_session() {
        let controller = OverlayController::new(
            Box::new(Necklace::default()),
            AssetLoader::spawn(MemorySource::new()).unwrap(),
        );
        let mut camera = FakeCamera::new();
        camera.push(frame_event(vec![face()]));

        let mut session = Session::new(
            controller,
            StaticPermission::denied(),
            camera,
            BlendRenderer::new(),
            Vec::new(),
        );
        let report = session.run(&SessionPlan::default()).unwrap();
        assert_eq!(report.screen, Screen::RequestPermission);
        assert_eq!(report.frames, 0);
    }

    #[test]
    fn directory_sink_numbers_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out")).unwrap();
        sink.consume(3, &Image::filled(2, 2, Color::GREEN)).unwrap();

        assert_eq!(sink.written(), 1);
        let image = Image::load(dir.path().join("out/frame_0003.png")).unwrap();
        assert_eq!(image.get(1, 1), Color::GREEN);
    }
}
