//! Mapping of face bounding boxes to overlay placements.
//!
//! Every function here is pure: the placement depends only on the face detected in the current
//! frame and on the intrinsic size of the selected asset. Nothing is carried over between frames.
//!
//! Placements are [`Rect`]s in frame pixel coordinates. They may extend past the frame edges.
//!
//! The numeric tuning values were found empirically against a front camera; they compensate for
//! the detector's bias and for the distance between the face box and the neck/ears.

use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;
use tryon_image::{Rect, Resolution};

/// Overlay placements for one accessory: one for a necklace, two (left, right) for earrings.
pub type Placements = ArrayVec<[Rect; 2]>;

/// Tuning values for necklace placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NecklaceTuning {
    /// Necklace width relative to the face width.
    pub width_scale: f32,
    /// Horizontal offset added after centering the necklace under the face.
    pub x_offset: f32,
    /// Vertical distance between the bottom of the face box and the top of the necklace.
    pub y_offset: f32,
}

impl NecklaceTuning {
    /// Placement shown before the first face has been detected.
    pub const INITIAL: Rect = Rect::from_top_left(100.0, 300.0, 150.0, 100.0);
    pub const WIDTH_SCALE: f32 = 1.2;
    pub const X_OFFSET: f32 = -50.0;
    pub const Y_OFFSET: f32 = 50.0;
}

impl Default for NecklaceTuning {
    fn default() -> Self {
        Self {
            width_scale: Self::WIDTH_SCALE,
            x_offset: Self::X_OFFSET,
            y_offset: Self::Y_OFFSET,
        }
    }
}

/// Tuning values for earring placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarringTuning {
    /// Earring height is the face height divided by this.
    pub height_divisor: f32,
    /// Offset from the left side of the face box to the left earring.
    pub x_offset: f32,
    /// Offset from the vertical center of the face box to the earrings.
    pub y_offset: f32,
    /// Extra vertical offset applied when drawing, not part of the stored placement.
    pub render_y_offset: f32,
}

impl EarringTuning {
    /// Placement of both earrings before the first face has been detected.
    pub const INITIAL: Rect = Rect::from_top_left(0.0, 0.0, 50.0, 100.0);
    pub const HEIGHT_DIVISOR: f32 = 3.0;
    pub const X_OFFSET: f32 = -90.0;
    pub const Y_OFFSET: f32 = 20.0;
    pub const RENDER_Y_OFFSET: f32 = 40.0;
}

impl Default for EarringTuning {
    fn default() -> Self {
        Self {
            height_divisor: Self::HEIGHT_DIVISOR,
            x_offset: Self::X_OFFSET,
            y_offset: Self::Y_OFFSET,
            render_y_offset: Self::RENDER_Y_OFFSET,
        }
    }
}

/// Computes the necklace placement for `face`.
///
/// The necklace is `width_scale` times as wide as the face, keeps the aspect ratio of the asset
/// exactly, and hangs centered below the face box.
///
/// Returns [`None`] if the asset has no intrinsic size yet (either dimension is 0) or if the
/// result would not be finite.
pub fn necklace(face: &Rect, intrinsic: Resolution, tuning: &NecklaceTuning) -> Option<Rect> {
    let aspect = intrinsic.aspect_ratio()?;

    let width = face.width() * tuning.width_scale;
    let height = width * aspect.inverse_f32();
    let x = face.x() + face.width() / 2.0 - width / 2.0 + tuning.x_offset;
    let y = face.y() + face.height() + tuning.y_offset;

    finite(Rect::from_top_left(x, y, width, height))
}

/// Computes the left and right earring placements for `face`.
///
/// Both earrings share the same size and vertical position; the right one is shifted by exactly
/// the face width.
///
/// Returns [`None`] if the asset has no intrinsic size yet (either dimension is 0) or if the
/// result would not be finite.
pub fn earrings(face: &Rect, intrinsic: Resolution, tuning: &EarringTuning) -> Option<[Rect; 2]> {
    let aspect = intrinsic.aspect_ratio()?;

    let height = face.height() / tuning.height_divisor;
    let width = height * aspect.as_f32();
    let left_x = face.x() + tuning.x_offset;
    let y = face.y() + face.height() / 2.0 + tuning.y_offset;

    let left = finite(Rect::from_top_left(left_x, y, width, height))?;
    let right = left.move_to(left_x + face.width(), y);
    Some([left, finite(right)?])
}

fn finite(rect: Rect) -> Option<Rect> {
    if rect.is_finite() {
        Some(rect)
    } else {
        log::warn!("discarding non-finite placement {:?}", rect);
        None
    }
}
