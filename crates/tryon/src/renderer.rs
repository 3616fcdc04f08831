//! Overlay compositing.

use tryon_image::{BlendMode, Image, Rect};

use crate::timer::Timer;

/// Trait implemented by overlay renderers.
pub trait OverlayRenderer {
    /// Draws `image` stretched to `rect` onto `frame`. Draws nothing if `image` is [`None`].
    fn draw(&mut self, frame: &mut Image, image: Option<&Image>, rect: Rect);
}

/// Alpha-blends overlays on the CPU.
pub struct BlendRenderer {
    mode: BlendMode,
    t_blend: Timer,
}

impl BlendRenderer {
    pub fn new() -> Self {
        Self {
            mode: BlendMode::Alpha,
            t_blend: Timer::new("blend"),
        }
    }

    pub fn mode(mut self, mode: BlendMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn timers(&self) -> impl IntoIterator<Item = &Timer> + '_ {
        [&self.t_blend]
    }
}

impl Default for BlendRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayRenderer for BlendRenderer {
    fn draw(&mut self, frame: &mut Image, image: Option<&Image>, rect: Rect) {
        let Some(image) = image else { return };
        let mode = self.mode;
        self.t_blend.time(|| {
            frame.view_mut(rect).blend_from(image).mode(mode);
        });
    }
}
