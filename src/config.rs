//! Restore configuration
//!
//! Serde struct with defaults, loadable from JSON alongside other host
//! settings.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How the sequencer decides that anchors have finished registering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RegistrationGate {
    /// Open once this many distinct anchors have registered
    ExpectedCount(usize),
    /// Open when the host calls `AnchorRegistry::seal`
    #[default]
    Signal,
    /// Open after a fixed number of turns (legacy two-frame wait)
    FixedTurns(u32),
}

/// Keys, tolerances and registration policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Store key for the box set
    pub box_key: String,
    /// Store key for the placeholder set
    pub placeholder_key: String,
    /// Same-box distance for incremental saves
    pub upsert_tolerance: f32,
    /// Box -> anchor relink distance
    pub box_anchor_tolerance: f32,
    /// Placeholder -> anchor position distance
    pub anchor_position_tolerance: f32,
    /// Placeholder -> anchor angular distance (degrees)
    pub anchor_rotation_tolerance_deg: f32,
    /// Anchor registration barrier
    pub registration_gate: RegistrationGate,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            box_key: SAVED_BOXES_KEY.to_string(),
            placeholder_key: SAVED_PLACEHOLDERS_KEY.to_string(),
            upsert_tolerance: UPSERT_TOLERANCE,
            box_anchor_tolerance: BOX_ANCHOR_TOLERANCE,
            anchor_position_tolerance: ANCHOR_POSITION_TOLERANCE,
            anchor_rotation_tolerance_deg: ANCHOR_ROTATION_TOLERANCE_DEG,
            registration_gate: RegistrationGate::default(),
        }
    }
}

impl RestoreConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RestoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reproduce the legacy two-turn registration wait
    pub fn with_legacy_wait(mut self) -> Self {
        self.registration_gate = RegistrationGate::FixedTurns(2);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("upsert_tolerance", self.upsert_tolerance),
            ("box_anchor_tolerance", self.box_anchor_tolerance),
            ("anchor_position_tolerance", self.anchor_position_tolerance),
            (
                "anchor_rotation_tolerance_deg",
                self.anchor_rotation_tolerance_deg,
            ),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTolerance { field, value });
            }
        }
        Ok(())
    }
}
