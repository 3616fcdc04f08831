//! Accessory overlay strategies.
//!
//! The overlay controller is the same for every kind of jewelry. What differs is how many
//! overlays are drawn and where they go, which is what an [`AccessoryStrategy`] supplies.

use std::fmt;

use tryon_image::{Rect, Resolution};

use crate::asset::AssetId;
use crate::geometry::{self, EarringTuning, NecklaceTuning, Placements};

/// The kinds of jewelry that can be tried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AccessoryKind {
    Necklace,
    Earrings,
}

impl AccessoryKind {
    /// Returns the bundled assets of this kind, in thumbnail strip order.
    pub fn catalog(self) -> &'static [&'static str] {
        match self {
            Self::Necklace => &["neck4", "neck3", "neck2", "neck1"],
            Self::Earrings => &["ear9", "ear7", "ear5", "ear6"],
        }
    }

    /// Returns the asset that is selected when the try-on screen opens.
    pub fn default_asset(self) -> AssetId {
        match self {
            Self::Necklace => AssetId::new("neck2"),
            Self::Earrings => AssetId::new("ear9"),
        }
    }

    /// Returns whether `asset` is one of the bundled assets of this kind.
    pub fn offers(self, asset: &AssetId) -> bool {
        self.catalog().contains(&asset.as_str())
    }
}

impl fmt::Display for AccessoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Necklace => "necklace",
            Self::Earrings => "earrings",
        })
    }
}

/// Trait implemented by the per-accessory placement logic.
pub trait AccessoryStrategy: Send {
    fn kind(&self) -> AccessoryKind;

    /// Computes the placements for a face.
    ///
    /// Returns [`None`] when no placement can be computed, eg. because `intrinsic` has a zero
    /// dimension. Callers keep their previous placements in that case.
    fn place(&self, face: &Rect, intrinsic: Resolution) -> Option<Placements>;

    /// Placements shown before the first face has been detected.
    fn initial_placements(&self) -> Placements;

    /// Offset added to every placement when it is drawn.
    fn render_offset(&self) -> (f32, f32) {
        (0.0, 0.0)
    }
}

/// A single necklace centered below the face.
#[derive(Debug, Clone, Default)]
pub struct Necklace {
    tuning: NecklaceTuning,
}

impl Necklace {
    pub fn new(tuning: NecklaceTuning) -> Self {
        Self { tuning }
    }
}

impl AccessoryStrategy for Necklace {
    fn kind(&self) -> AccessoryKind {
        AccessoryKind::Necklace
    }

    fn place(&self, face: &Rect, intrinsic: Resolution) -> Option<Placements> {
        let rect = geometry::necklace(face, intrinsic, &self.tuning)?;
        Some(Placements::from_iter([rect]))
    }

    fn initial_placements(&self) -> Placements {
        Placements::from_iter([NecklaceTuning::INITIAL])
    }
}

/// A pair of earrings, one next to each side of the face.
#[derive(Debug, Clone, Default)]
pub struct Earrings {
    tuning: EarringTuning,
}

impl Earrings {
    pub fn new(tuning: EarringTuning) -> Self {
        Self { tuning }
    }
}

impl AccessoryStrategy for Earrings {
    fn kind(&self) -> AccessoryKind {
        AccessoryKind::Earrings
    }

    fn place(&self, face: &Rect, intrinsic: Resolution) -> Option<Placements> {
        let pair = geometry::earrings(face, intrinsic, &self.tuning)?;
        Some(Placements::from(pair))
    }

    fn initial_placements(&self) -> Placements {
        Placements::from([EarringTuning::INITIAL; 2])
    }

    fn render_offset(&self) -> (f32, f32) {
        (0.0, self.tuning.render_y_offset)
    }
}
