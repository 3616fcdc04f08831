//! Try-on configuration.
//!
//! The configuration is read from a JSON file. Every field is optional and falls back to its
//! default, so an empty object is a valid configuration. The asset directory can additionally be
//! overridden with the `TRYON_ASSET_DIR` environment variable.

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::accessory::{AccessoryKind, AccessoryStrategy, Earrings, Necklace};
use crate::face::DetectionOptions;
use crate::geometry::{EarringTuning, NecklaceTuning};

const ASSET_DIR_VAR: &str = "TRYON_ASSET_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TryOnConfig {
    /// Directory containing the `<id>.png` jewelry images.
    pub asset_dir: PathBuf,
    pub necklace: NecklaceTuning,
    pub earrings: EarringTuning,
    pub detection: DetectionOptions,
}

impl Default for TryOnConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            necklace: NecklaceTuning::default(),
            earrings: EarringTuning::default(),
            detection: DetectionOptions::default(),
        }
    }
}

impl TryOnConfig {
    /// Loads the configuration file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        log::debug!("loaded configuration from '{}'", path.display());
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_asset_dir_override(env::var_os(ASSET_DIR_VAR))
    }

    fn with_asset_dir_override(mut self, dir: Option<OsString>) -> Self {
        if let Some(dir) = dir.filter(|dir| !dir.is_empty()) {
            log::debug!("{} overrides asset directory: {:?}", ASSET_DIR_VAR, dir);
            self.asset_dir = dir.into();
        }
        self
    }

    /// Creates the placement strategy for `kind` with the configured tuning values.
    pub fn strategy(&self, kind: AccessoryKind) -> Box<dyn AccessoryStrategy> {
        match kind {
            AccessoryKind::Necklace => Box::new(Necklace::new(self.necklace)),
            AccessoryKind::Earrings => Box::new(Earrings::new(self.earrings)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::face::PerformanceMode;

    #[test]
    fn empty_object_is_default() {
        let config: TryOnConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TryOnConfig::default());
    }

    #[test]
    fn partial_tuning() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "asset_dir": "/opt/jewelry",
                "necklace": {{ "y_offset": 35.0 }},
                "detection": {{ "performance": "accurate" }}
            }}"#
        )
        .unwrap();

        let config = TryOnConfig::load(file.path()).unwrap();
        assert_eq!(config.asset_dir, Path::new("/opt/jewelry"));
        assert_eq!(config.necklace.y_offset, 35.0);
        assert_eq!(config.necklace.width_scale, NecklaceTuning::WIDTH_SCALE);
        assert_eq!(config.earrings, EarringTuning::default());
        assert_eq!(config.detection.performance, PerformanceMode::Accurate);
    }

    #[test]
    fn load_errors_name_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = TryOnConfig::load(file.path()).unwrap_err();
        assert!(format!("{err}").contains("invalid config file"), "{err}");

        assert!(TryOnConfig::load("/nonexistent/tryon.json").is_err());
    }

    #[test]
    fn asset_dir_override() {
        let config = TryOnConfig::default().with_asset_dir_override(Some("/tmp/gems".into()));
        assert_eq!(config.asset_dir, Path::new("/tmp/gems"));

        let config = TryOnConfig::default().with_asset_dir_override(Some(OsString::new()));
        assert_eq!(config.asset_dir, Path::new("assets"));

        let config = TryOnConfig::default().with_asset_dir_override(None);
        assert_eq!(config.asset_dir, Path::new("assets"));
    }

    #[test]
    fn strategies_use_tuning() {
        let mut config = TryOnConfig::default();
        config.earrings.render_y_offset = 12.0;
        let strategy = config.strategy(AccessoryKind::Earrings);
        assert_eq!(strategy.kind(), AccessoryKind::Earrings);
        assert_eq!(strategy.render_offset(), (0.0, 12.0));
        assert_eq!(
            config.strategy(AccessoryKind::Necklace).kind(),
            AccessoryKind::Necklace
        );
    }
}
