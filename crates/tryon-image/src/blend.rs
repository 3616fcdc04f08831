use crate::{Color, ImageView, ImageViewMut};

/// Describes how to blend pixels together in a [`Blend`] operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// All destination pixels will be overwritten with the corresponding source pixel.
    Overwrite,

    /// Performs alpha blending between source and destination pixels to make the source image
    /// appear in front of the destination image.
    Alpha,
}

/// A blending operation between two images.
///
/// The operation is performed when the [`Blend`] is dropped.
///
/// Returned by [`Image::blend_from`][crate::Image::blend_from] or [`ImageViewMut::blend_from`].
pub struct Blend<'a> {
    dest: ImageViewMut<'a>,
    src: ImageView<'a>,
    mode: BlendMode,
}

impl<'a> Blend<'a> {
    pub(crate) fn new(dest: ImageViewMut<'a>, src: ImageView<'a>) -> Self {
        Self {
            dest,
            src,
            mode: BlendMode::Alpha,
        }
    }

    /// Sets the blend mode to use.
    pub fn mode(&mut self, mode: BlendMode) -> &mut Self {
        self.mode = mode;
        self
    }
}

impl Drop for Blend<'_> {
    fn drop(&mut self) {
        if self.src.width() == 0 || self.src.height() == 0 {
            return;
        }
        let Some((xs, ys)) = self.dest.visible_range() else {
            return;
        };

        for dest_y in ys {
            for dest_x in xs.clone() {
                if !self.dest.is_visible(dest_x, dest_y) {
                    continue;
                }

                // Nearest-neighbor sampling of the pixel center, relative to the whole view.
                let src_x = ((dest_x as f32 + 0.5) / self.dest.width() as f32
                    * self.src.width() as f32) as u32;
                let src_y = ((dest_y as f32 + 0.5) / self.dest.height() as f32
                    * self.src.height() as f32) as u32;

                let src_pix = self.src.get(src_x, src_y);
                let dest_pix = self.dest.get(dest_x, dest_y);
                let result = match self.mode {
                    BlendMode::Overwrite => src_pix,
                    BlendMode::Alpha => blend_alpha(dest_pix, src_pix),
                };
                self.dest.set(dest_x, dest_y, result);
            }
        }
    }
}

fn blend_alpha(dest: Color, src: Color) -> Color {
    fn blend_color(dest: f32, src: f32, dest_alpha: f32, src_alpha: f32, result_alpha: f32) -> f32 {
        (src * src_alpha + dest * dest_alpha * (1.0 - src_alpha)) / result_alpha
    }

    if src.a() == 0 {
        return dest;
    }

    let dest = LinearColor::new(dest);
    let src = LinearColor::new(src);

    let result_alpha = src.a() + dest.a() * (1.0 - src.a());
    let r = blend_color(dest.r(), src.r(), dest.a(), src.a(), result_alpha);
    let g = blend_color(dest.g(), src.g(), dest.a(), src.a(), result_alpha);
    let b = blend_color(dest.b(), src.b(), dest.a(), src.a(), result_alpha);

    LinearColor([r, g, b, result_alpha]).to_color()
}

struct LinearColor([f32; 4]);

impl LinearColor {
    fn new(color: Color) -> Self {
        fn to_rgb(srgb: f32) -> f32 {
            if srgb <= 0.04045 {
                srgb / 12.92
            } else {
                ((srgb + 0.055) / 1.055).powf(2.4)
            }
        }

        let [r, g, b, a] = color.0.map(|c| f32::from(c) / 255.0);
        Self([to_rgb(r), to_rgb(g), to_rgb(b), a])
    }

    fn to_color(&self) -> Color {
        fn to_srgb(rgb: f32) -> f32 {
            if rgb <= 0.0031308 {
                rgb * 12.92
            } else {
                1.055 * rgb.powf(1.0 / 2.4) - 0.055
            }
        }

        let [r, g, b, a] = self.0;
        let [r, g, b] = [to_srgb(r), to_srgb(g), to_srgb(b)];
        let [r, g, b, a] = [r, g, b, a].map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8);

        Color([r, g, b, a])
    }

    fn r(&self) -> f32 {
        self.0[0]
    }

    fn g(&self) -> f32 {
        self.0[1]
    }

    fn b(&self) -> f32 {
        self.0[2]
    }

    fn a(&self) -> f32 {
        self.0[3]
    }
}
