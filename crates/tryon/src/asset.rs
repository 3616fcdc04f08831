//! Jewelry images and where they come from.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use tryon_image::{Image, Resolution};

/// Identifies a bundled jewelry image, eg. `neck2` or `ear9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId(String);

impl AssetId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A decoded asset, ready to be drawn.
#[derive(Clone)]
pub struct LoadedAsset {
    id: AssetId,
    image: Image,
}

impl LoadedAsset {
    /// Wraps a decoded image.
    ///
    /// Fails if the image has no pixels, since it could not be used to derive placement sizes.
    pub fn new(id: AssetId, image: Image) -> anyhow::Result<Self> {
        if image.resolution().is_empty() {
            bail!("asset '{}' has empty resolution {}", id, image.resolution());
        }
        Ok(Self { id, image })
    }

    pub fn id(&self) -> &AssetId {
        &self.id
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Returns the pixel size of the asset, which determines the overlay aspect ratio.
    pub fn intrinsic(&self) -> Resolution {
        self.image.resolution()
    }
}

impl fmt::Debug for LoadedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoadedAsset({} @ {})", self.id, self.intrinsic())
    }
}

/// Trait implemented by stores of jewelry images.
///
/// Sources are moved to the loader thread, so loading may block.
pub trait AssetSource: Send + 'static {
    fn load(&self, id: &AssetId) -> anyhow::Result<Image>;
}

/// Loads assets from `<dir>/<id>.png`.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    dir: PathBuf,
}

impl FsAssetSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, id: &AssetId) -> PathBuf {
        self.dir.join(format!("{}.png", id))
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, id: &AssetId) -> anyhow::Result<Image> {
        let path = self.path_of(id);
        Image::load(&path).with_context(|| format!("failed to load '{}'", path.display()))
    }
}
