//! Errors surfaced to the user of the try-on screen.

use thiserror::Error;

use crate::accessory::AccessoryKind;
use crate::asset::AssetId;

/// A failure of the try-on screen.
///
/// Everything else in this crate reports errors through [`anyhow::Error`]. A [`Fault`] is used
/// where the caller has to react to the specific kind of failure, eg. by showing a different
/// screen.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("camera permission was denied")]
    PermissionDenied,

    #[error("no camera device or permission")]
    DeviceUnavailable,

    #[error("'{asset}' is not in the {kind} catalog")]
    UnknownAsset { kind: AccessoryKind, asset: AssetId },

    #[error("failed to decode asset '{asset}'")]
    AssetDecodeFailure {
        asset: AssetId,
        #[source]
        source: anyhow::Error,
    },

    #[error("camera error")]
    CameraRuntime(#[source] anyhow::Error),
}
