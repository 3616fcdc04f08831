use std::{fmt, ops::Range, path::Path};

use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};

use crate::{Blend, Color, Rect, Resolution};

/// Enumeration of image formats supported by this library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageFormat {
    /// JFIF JPEG or Motion JPEG.
    Jpeg,
    /// Portable Network Graphics.
    Png,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => anyhow::bail!(
                "invalid image path '{}' (must have one of the supported extensions)",
                path.display()
            ),
        }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// An 8-bit sRGB image with alpha channel.
#[derive(Clone)]
pub struct Image {
    buf: RgbaImage,
}

impl Image {
    /// Loads an image from the filesystem.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let format = ImageFormat::from_path(path)?;
        let data = std::fs::read(path)?;
        Self::decode(&data, format)
    }

    /// Decodes an encoded image of the given format from a byte slice.
    pub fn decode(data: &[u8], format: ImageFormat) -> anyhow::Result<Self> {
        let buf = image::load_from_memory_with_format(data, format.to_image_format())?.to_rgba8();
        log::trace!("decoded {:?} image ({}x{})", format, buf.width(), buf.height());
        Ok(Self { buf })
    }

    /// Encodes this image in the given format.
    pub fn encode(&self, format: ImageFormat) -> anyhow::Result<Vec<u8>> {
        let mut out = std::io::Cursor::new(Vec::new());
        let dynamic = DynamicImage::ImageRgba8(self.buf.clone());
        let dynamic = match format {
            // JPEG has no alpha channel.
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
            ImageFormat::Png => dynamic,
        };
        dynamic.write_to(&mut out, format.to_image_format())?;
        Ok(out.into_inner())
    }

    /// Saves an image to the file system.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let data = self.encode(ImageFormat::from_path(path)?)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Creates an empty image of a specified size.
    ///
    /// The image will start out black and fully transparent.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageBuffer::new(width, height),
        }
    }

    /// Returns a new [`Image`] of the given size, with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut this = Self::new(width, height);
        this.clear(color);
        this
    }

    /// Returns the width of this image, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this image, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns the size of this image.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Returns a [`Rect`] covering this image.
    ///
    /// The rectangle will be positioned at `(0, 0)` and have the width and height of the image.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(0.0, 0.0, self.width() as f32, self.height() as f32)
    }

    /// Gets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf[(x, y)].0)
    }

    /// Sets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.buf[(x, y)] = Rgba(color.0);
    }

    /// Creates an immutable view into an area of this image, specified by `rect`.
    ///
    /// If `rect` lies partially outside of `self`, the pixels that are outside of `self` will have
    /// the value [`Color::NULL`]. The returned view always has the size of `rect`.
    pub fn view(&self, rect: Rect) -> ImageView<'_> {
        ImageView {
            image: self,
            data: ViewData::full(self).view(rect),
        }
    }

    /// Creates a mutable view into an area of this image, specified by `rect`.
    ///
    /// If `rect` lies partially outside of `self`, the pixels that are outside of `self` will have
    /// the value [`Color::NULL`] and ignore writes. The returned view always has the size of
    /// `rect`.
    pub fn view_mut(&mut self, rect: Rect) -> ImageViewMut<'_> {
        ImageViewMut {
            data: ViewData::full(self).view(rect),
            image: self,
        }
    }

    /// Overwrites the data in `self` with a `src` image, stretching or shrinking `src` as
    /// necessary.
    ///
    /// Note that this always blends the *entire* `src` with the *entire* destination. A smaller
    /// destination area can be selected by creating a sub-view first.
    ///
    /// By default, this performs alpha blending.
    pub fn blend_from<'b, V: AsImageView>(&'b mut self, src: &'b V) -> Blend<'b> {
        Blend::new(self.as_view_mut(), src.as_view())
    }

    /// Clears the image, setting every pixel value to `color`.
    pub fn clear(&mut self, color: Color) {
        self.buf.pixels_mut().for_each(|pix| pix.0 = color.0);
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} Image", self.width(), self.height())
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ViewData {
    /// Rectangle in the root image's coordinates.
    pub(crate) rect: Rect,
}

impl ViewData {
    pub(crate) fn full(image: &Image) -> Self {
        Self { rect: image.rect() }
    }

    pub(crate) fn view(&self, rect: Rect) -> Self {
        Self {
            rect: rect.move_by(self.rect.x(), self.rect.y()),
        }
    }

    fn width(&self) -> u32 {
        self.rect.width().max(0.0) as u32
    }

    fn height(&self) -> u32 {
        self.rect.height().max(0.0) as u32
    }

    fn image_coord(&self, x: u32, y: u32, image: &Image) -> Option<(u32, u32)> {
        let x = (self.rect.x() + x as f32).round();
        let y = (self.rect.y() + y as f32).round();

        if x < 0.0 || y < 0.0 || x >= image.width() as f32 || y >= image.height() as f32 {
            return None;
        }

        Some((x as u32, y as u32))
    }

    fn get(&self, x: u32, y: u32, image: &Image) -> Color {
        match self.image_coord(x, y, image) {
            Some((x, y)) => image.get(x, y),
            None => Color::NULL,
        }
    }
}

/// An immutable view of a rectangular section of an [`Image`].
#[derive(Clone, Copy)]
pub struct ImageView<'a> {
    image: &'a Image,
    data: ViewData,
}

impl<'a> ImageView<'a> {
    /// Returns the width of this view, in pixels.
    pub fn width(&self) -> u32 {
        self.data.width()
    }

    /// Returns the height of this view, in pixels.
    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Gets the image color at the given pixel coordinates.
    ///
    /// Pixels outside of the underlying [`Image`] read as [`Color::NULL`].
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.data.get(x, y, self.image)
    }
}

impl fmt::Debug for ImageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ImageView", self.width(), self.height())
    }
}

/// A mutable view of a rectangular section of an [`Image`].
pub struct ImageViewMut<'a> {
    image: &'a mut Image,
    data: ViewData,
}

impl<'a> ImageViewMut<'a> {
    /// Returns the width of this view, in pixels.
    pub fn width(&self) -> u32 {
        self.data.width()
    }

    /// Returns the height of this view, in pixels.
    pub fn height(&self) -> u32 {
        self.data.height()
    }

    #[inline]
    pub(crate) fn get(&self, x: u32, y: u32) -> Color {
        self.data.get(x, y, self.image)
    }

    /// Sets the color at the given view coordinates. Writes outside the image are ignored.
    #[inline]
    pub(crate) fn set(&mut self, x: u32, y: u32, color: Color) {
        if let Some((x, y)) = self.data.image_coord(x, y, self.image) {
            self.image.set(x, y, color);
        }
    }

    /// Returns whether the pixel at the given view coordinates lies inside the image.
    #[inline]
    pub(crate) fn is_visible(&self, x: u32, y: u32) -> bool {
        self.data.image_coord(x, y, self.image).is_some()
    }

    /// Returns the ranges of view coordinates that can map into the underlying image.
    ///
    /// The ranges are conservative: they may include a row or column of invisible pixels at each
    /// edge, which [`ImageViewMut::is_visible`] filters out. Returns [`None`] if the view does not
    /// overlap the image at all.
    pub(crate) fn visible_range(&self) -> Option<(Range<u32>, Range<u32>)> {
        let view = self.data.rect;
        let clipped = view.intersection(&self.image.rect())?;

        let range = |start: f32, len: f32, size: u32| {
            let min = ((start - 1.0).floor().max(0.0) as u32).min(size);
            let max = ((start + len + 1.0).ceil().max(0.0) as u32).min(size);
            min..max
        };
        Some((
            range(clipped.x() - view.x(), clipped.width(), self.width()),
            range(clipped.y() - view.y(), clipped.height(), self.height()),
        ))
    }

    /// Borrows an identical [`ImageViewMut`] from `self` that may have a shorter lifetime.
    ///
    /// This is equivalent to the implicit "reborrowing" that happens on Rust references. It needs
    /// to be a method call here because user-defined types cannot opt into making this happen
    /// automatically.
    pub fn reborrow(&mut self) -> ImageViewMut<'_> {
        ImageViewMut {
            image: self.image,
            data: self.data,
        }
    }

    /// Overwrites the data in `self` with a `src` image, stretching or shrinking `src` as
    /// necessary.
    ///
    /// By default, this performs alpha blending.
    pub fn blend_from<'b, V: AsImageView>(&'b mut self, src: &'b V) -> Blend<'b> {
        Blend::new(self.as_view_mut(), src.as_view())
    }
}

impl fmt::Debug for ImageViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ImageViewMut", self.width(), self.height())
    }
}

/// Trait for types that can be treated as read-only views of image data.
///
/// This allows abstracting over [`Image`] and [`ImageView`] and should be used by any code that
/// takes immutable image data as input.
pub trait AsImageView {
    /// Returns an [`ImageView`] covering `self`.
    fn as_view(&self) -> ImageView<'_>;
}

/// Trait for types that can be treated as mutable views of image data.
pub trait AsImageViewMut: AsImageView {
    /// Returns an [`ImageViewMut`] covering `self`.
    fn as_view_mut(&mut self) -> ImageViewMut<'_>;
}

impl AsImageView for Image {
    fn as_view(&self) -> ImageView<'_> {
        self.view(self.rect())
    }
}

impl<'a> AsImageView for ImageView<'a> {
    fn as_view(&self) -> ImageView<'_> {
        *self
    }
}

impl AsImageViewMut for Image {
    fn as_view_mut(&mut self) -> ImageViewMut<'_> {
        let rect = self.rect();
        self.view_mut(rect)
    }
}

impl<'a> AsImageView for ImageViewMut<'a> {
    fn as_view(&self) -> ImageView<'_> {
        ImageView {
            data: self.data,
            image: self.image,
        }
    }
}

impl<'a> AsImageViewMut for ImageViewMut<'a> {
    fn as_view_mut(&mut self) -> ImageViewMut<'_> {
        self.reborrow()
    }
}
