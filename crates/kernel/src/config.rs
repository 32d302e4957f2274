use glam::{Quat, Vec2, Vec3};
use mediawall_common::{Color, Pose};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`WallConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tuning for camera motion and panel looks. Every field has a default, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Camera pose when nothing is selected.
    pub overview: Pose,
    /// Distance in front of a panel's face the camera stops at.
    pub focus_distance: f32,
    /// Time constant (seconds) for camera position.
    pub position_tau: f32,
    /// Time constant (seconds) for camera orientation.
    pub orientation_tau: f32,
    /// Time constant (seconds) for border color and image scale.
    pub hover_tau: f32,
    pub base_color: Color,
    pub highlight_color: Color,
    /// Image scale inside the frame at rest.
    pub image_scale: Vec2,
    /// Extra factor applied to the image scale while hovered and not focused.
    pub hover_shrink: Vec2,
    pub zoom_base: f32,
    pub zoom_amplitude: f32,
    /// Angular rate (radians per second) of the image zoom drift.
    pub zoom_rate: f32,
    /// Optional cap on the frame delta fed to smoothing, in seconds. Unset
    /// means every delta is used as given.
    pub max_frame_dt: Option<f32>,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            overview: Pose::new(Vec3::new(0.0, 0.0, 5.5), Quat::IDENTITY),
            focus_distance: 1.25,
            position_tau: 0.4,
            orientation_tau: 0.25,
            hover_tau: 0.1,
            base_color: Color::WHITE,
            highlight_color: Color::ORANGE,
            image_scale: Vec2::new(0.85, 0.9),
            hover_shrink: Vec2::new(0.85, 0.905),
            zoom_base: 2.0,
            zoom_amplitude: 0.5,
            zoom_rate: 1.0 / 3.0,
            max_frame_dt: None,
        }
    }
}

impl WallConfig {
    /// Load from `.yaml`/`.yml` or JSON by extension, then validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let config: Self = if is_yaml {
            serde_yaml::from_str(&data)?
        } else {
            serde_json::from_str(&data)?
        };
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded wall config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let taus = [
            ("position_tau", self.position_tau),
            ("orientation_tau", self.orientation_tau),
            ("hover_tau", self.hover_tau),
        ];
        for (name, tau) in taus {
            if !tau.is_finite() || tau < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be >= 0, got {tau}")));
            }
        }
        if !self.focus_distance.is_finite() {
            return Err(ConfigError::Invalid("focus_distance must be finite".into()));
        }
        if let Some(max) = self.max_frame_dt.filter(|m| !(m.is_finite() && *m > 0.0)) {
            return Err(ConfigError::Invalid(format!("max_frame_dt must be > 0, got {max}")));
        }
        if !self.overview.position.is_finite() {
            return Err(ConfigError::Invalid("overview position must be finite".into()));
        }
        let len = self.overview.rotation.length();
        if !len.is_finite() || (len - 1.0).abs() > 1e-3 {
            return Err(ConfigError::Invalid(
                "overview rotation must be a unit quaternion".into(),
            ));
        }
        if !(self.image_scale.is_finite() && self.hover_shrink.is_finite()) {
            return Err(ConfigError::Invalid("image scales must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = WallConfig::default();
        c.validate().unwrap();
        assert!(c.orientation_tau < c.position_tau);
    }

    #[test]
    fn negative_tau_is_rejected() {
        let c = WallConfig {
            hover_tau: -1.0,
            ..WallConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.yaml");
        std::fs::write(&path, "focus_distance: 2.0\nposition_tau: 0.8\n").unwrap();
        let c = WallConfig::load(&path).unwrap();
        assert_eq!(c.focus_distance, 2.0);
        assert_eq!(c.position_tau, 0.8);
        assert_eq!(c.hover_tau, WallConfig::default().hover_tau);
    }

    #[test]
    fn json_overview_pose() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.json");
        std::fs::write(
            &path,
            r#"{ "overview": { "position": [0, 1, 6], "rotation": [0, 0, 0, 1] } }"#,
        )
        .unwrap();
        let c = WallConfig::load(&path).unwrap();
        assert_eq!(c.overview.position, Vec3::new(0.0, 1.0, 6.0));
    }

    #[test]
    fn invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.json");
        std::fs::write(&path, r#"{ "max_frame_dt": 0 }"#).unwrap();
        assert!(matches!(WallConfig::load(&path), Err(ConfigError::Invalid(_))));
    }
}
