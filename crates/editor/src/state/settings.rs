//! Editor settings

use serde::{Deserialize, Serialize};

use crate::viewport::region::RegionTolerance;

/// Picking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickingSettings {
    /// Maximum squared pointer travel between down and up for a click, px²
    pub click_tolerance: f32,
    /// Continuous hover highlighting
    pub hover: bool,
}

impl Default for PickingSettings {
    fn default() -> Self {
        Self {
            click_tolerance: 2.0,
            hover: true,
        }
    }
}

/// Snap steps for the transform gizmo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapSettings {
    pub enabled: bool,
    /// Translation step, model units
    pub move_step: f64,
    /// Rotation step, degrees
    pub rotation_step_deg: f64,
    pub scale_step: f64,
}

impl SnapSettings {
    /// Smallest accepted step (and smallest snapped scale)
    pub const MIN_STEP: f64 = 0.0001;

    pub fn set_move_step(&mut self, step: f64) {
        self.move_step = step.max(Self::MIN_STEP);
    }

    pub fn set_rotation_step_deg(&mut self, step: f64) {
        self.rotation_step_deg = step.max(Self::MIN_STEP);
    }

    pub fn set_scale_step(&mut self, step: f64) {
        self.scale_step = step.max(Self::MIN_STEP);
    }
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            move_step: 1.0,
            rotation_step_deg: 15.0,
            scale_step: 0.1,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Oldest snapshots are dropped beyond this depth
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// Autosave settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveSettings {
    pub enabled: bool,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub picking: PickingSettings,
    #[serde(default)]
    pub region: RegionTolerance,
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub autosave: AutosaveSettings,
}

impl EditorSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "treed", "treed")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Ignoring malformed settings at {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Failed to create config dir {}: {e}", dir.display());
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to write settings to {}: {e}", path.display());
                }
            }
            Err(e) => tracing::warn!("Failed to serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = EditorSettings::default();
        assert_eq!(s.picking.click_tolerance, 2.0);
        assert_eq!(s.region.angle_deg, 2.0);
        assert_eq!(s.history.max_depth, 100);
        assert!(!s.snap.enabled);
        assert!(s.autosave.enabled);
    }

    #[test]
    fn test_snap_steps_clamped() {
        let mut snap = SnapSettings::default();
        snap.set_move_step(0.0);
        snap.set_rotation_step_deg(-5.0);
        snap.set_scale_step(0.5);
        assert_eq!(snap.move_step, SnapSettings::MIN_STEP);
        assert_eq!(snap.rotation_step_deg, SnapSettings::MIN_STEP);
        assert_eq!(snap.scale_step, 0.5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: EditorSettings = serde_json::from_str(r#"{"snap": {"enabled": true, "move_step": 0.5, "rotation_step_deg": 5.0, "scale_step": 0.1}}"#).unwrap();
        assert!(s.snap.enabled);
        assert_eq!(s.snap.move_step, 0.5);
        assert_eq!(s.history.max_depth, 100);
    }
}
