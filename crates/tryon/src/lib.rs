//! Face-anchored jewelry overlays for camera try-on previews.
//!
//! An [`OverlayController`] receives the faces detected in each camera frame and positions a
//! necklace or a pair of earrings relative to the first face. The jewelry image is decoded in the
//! background by an [`AssetLoader`]; when the user picks several assets in quick succession, only
//! the most recent pick is ever shown.
//!
//! Face detection, the camera and the renderer are plugged in through the [`FaceDetector`],
//! [`CameraSource`] and [`OverlayRenderer`] traits. The [`Session`] type ties everything together
//! into a frame loop.
//!
//! # Coordinates
//!
//! All placements are in frame pixel coordinates, with X pointing right and Y pointing down.
//! Placements may extend past the frame edges; only the visible part is drawn.
//!
//! # Environment Variables
//!
//! * `TRYON_ASSET_DIR`: overrides the directory jewelry images are loaded from (see
//!   [`TryOnConfig`]).
//! * `RUST_LOG`: configures logging, as usual for [`env_logger`].
//!
//! [`OverlayController`]: controller::OverlayController
//! [`AssetLoader`]: loader::AssetLoader
//! [`FaceDetector`]: face::FaceDetector
//! [`CameraSource`]: camera::CameraSource
//! [`OverlayRenderer`]: renderer::OverlayRenderer
//! [`Session`]: session::Session
//! [`TryOnConfig`]: config::TryOnConfig

use log::LevelFilter;

pub mod accessory;
pub mod asset;
pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod face;
pub mod geometry;
pub mod loader;
pub mod permission;
pub mod renderer;
pub mod session;
pub mod timer;

#[cfg(test)]
mod test;

pub use tryon_image as image;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .filter(Some("tryon_image"), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library will log at *debug* level. `RUST_LOG` takes precedence.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
