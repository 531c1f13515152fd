//! Gameplay configuration and visual settings
//!
//! `GameConfig` is the tuning surface the host may override (all fields
//! default). Invalid values never reach the simulation: `validate` reports
//! them, `sanitized` clamps them to safe minimums.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BOMB_DAMAGE, BOSS_MAX_HEALTH};

/// Smallest playfield the layout still works in
pub const MIN_WIDTH: f32 = 200.0;
pub const MIN_HEIGHT: f32 = 300.0;
const MIN_SPEED: f32 = 1.0;
const MIN_INTERVAL: f32 = 0.01;
const MIN_WAVE_DURATION: f32 = 1.0;

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        value: f32,
        min: f32,
    },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i32 },

    #[error("invalid config JSON: {0}")]
    Json(String),
}

/// Gameplay tuning
///
/// Speeds are pixels per second, intervals and durations seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub player_speed: f32,
    /// Seconds between auto-fire shots
    pub player_fire_interval: f32,
    pub bullet_speed: f32,
    /// Seconds between enemy spawns at the start of the wave
    pub enemy_spawn_interval: f32,
    /// Seconds before the boss shows up
    pub wave_duration: f32,
    pub boss_max_health: i32,
    pub bomb_damage: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 700.0,
            player_speed: 420.0,
            player_fire_interval: 0.12,
            bullet_speed: 720.0,
            enemy_spawn_interval: 0.75,
            wave_duration: 45.0,
            boss_max_health: BOSS_MAX_HEALTH,
            bomb_damage: BOMB_DAMAGE,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn floats(&self) -> [(&'static str, f32, f32); 7] {
        [
            ("width", self.width, MIN_WIDTH),
            ("height", self.height, MIN_HEIGHT),
            ("playerSpeed", self.player_speed, MIN_SPEED),
            ("playerFireInterval", self.player_fire_interval, MIN_INTERVAL),
            ("bulletSpeed", self.bullet_speed, MIN_SPEED),
            ("enemySpawnInterval", self.enemy_spawn_interval, MIN_INTERVAL),
            ("waveDuration", self.wave_duration, MIN_WAVE_DURATION),
        ]
    }

    /// Report the first out-of-range value
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value, min) in self.floats() {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < min {
                return Err(ConfigError::TooSmall { field, value, min });
            }
        }
        if self.boss_max_health <= 0 {
            return Err(ConfigError::NotPositive {
                field: "bossMaxHealth",
                value: self.boss_max_health,
            });
        }
        if self.bomb_damage <= 0 {
            return Err(ConfigError::NotPositive {
                field: "bombDamage",
                value: self.bomb_damage,
            });
        }
        Ok(())
    }

    /// Copy with every bad value replaced: non-finite falls back to the
    /// default, too-small clamps up to the minimum
    pub fn sanitized(&self) -> Self {
        if self.validate().is_ok() {
            return self.clone();
        }

        let defaults = Self::default();
        let fix = |field: &str, value: f32, fallback: f32, min: f32| {
            let fixed = if value.is_finite() { value.max(min) } else { fallback };
            if fixed != value {
                log::warn!("Config {} = {} out of range, using {}", field, value, fixed);
            }
            fixed
        };

        Self {
            width: fix("width", self.width, defaults.width, MIN_WIDTH),
            height: fix("height", self.height, defaults.height, MIN_HEIGHT),
            player_speed: fix("playerSpeed", self.player_speed, defaults.player_speed, MIN_SPEED),
            player_fire_interval: fix(
                "playerFireInterval",
                self.player_fire_interval,
                defaults.player_fire_interval,
                MIN_INTERVAL,
            ),
            bullet_speed: fix("bulletSpeed", self.bullet_speed, defaults.bullet_speed, MIN_SPEED),
            enemy_spawn_interval: fix(
                "enemySpawnInterval",
                self.enemy_spawn_interval,
                defaults.enemy_spawn_interval,
                MIN_INTERVAL,
            ),
            wave_duration: fix(
                "waveDuration",
                self.wave_duration,
                defaults.wave_duration,
                MIN_WAVE_DURATION,
            ),
            boss_max_health: if self.boss_max_health > 0 {
                self.boss_max_health
            } else {
                defaults.boss_max_health
            },
            bomb_damage: if self.bomb_damage > 0 {
                self.bomb_damage
            } else {
                defaults.bomb_damage
            },
        }
    }
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle cap for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 300,
            QualityPreset::High => 500,
        }
    }

    /// Whether to draw the parallax star field
    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Visual and audio preferences (not persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub quality: QualityPreset,
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Particle effects
    pub particles: bool,
    /// Minimize shake and flashes
    pub reduced_motion: bool,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            screen_shake: true,
            particles: true,
            reduced_motion: false,
            muted: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Multiplier for shake/flash/chromatic triggers
    pub fn effect_intensity(&self) -> f32 {
        if self.reduced_motion {
            0.0
        } else if !self.effective_screen_shake() {
            0.5
        } else {
            1.0
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert_eq!(GameConfig::default().boss_max_health, 200);
        assert_eq!(GameConfig::default().bomb_damage, 25);
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let config = GameConfig {
            width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall { field: "width", .. })
        ));

        let config = GameConfig {
            height: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "height", .. })
        ));
    }

    #[test]
    fn test_sanitized_clamps_to_safe_values() {
        let config = GameConfig {
            width: -50.0,
            height: f32::INFINITY,
            wave_duration: 0.0,
            boss_max_health: -1,
            ..Default::default()
        };
        let fixed = config.sanitized();
        assert_eq!(fixed.width, MIN_WIDTH);
        assert_eq!(fixed.height, 700.0);
        assert_eq!(fixed.wave_duration, MIN_WAVE_DURATION);
        assert_eq!(fixed.boss_max_health, BOSS_MAX_HEALTH);
        assert!(fixed.validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let config = GameConfig::from_json(r#"{ "waveDuration": 30, "width": 480 }"#).unwrap();
        assert_eq!(config.wave_duration, 30.0);
        assert_eq!(config.width, 480.0);
        assert_eq!(config.height, 700.0);

        assert!(matches!(
            GameConfig::from_json(r#"{ "width": 10 }"#),
            Err(ConfigError::TooSmall { .. })
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::TooSmall {
            field: "width",
            value: 10.0,
            min: 200.0,
        };
        assert_eq!(err.to_string(), "width must be at least 200, got 10");
    }

    #[test]
    fn test_settings_effects() {
        let mut settings = Settings::default();
        assert_eq!(settings.max_particles(), 500);
        assert!(settings.effective_screen_shake());

        let no_shake = Settings {
            screen_shake: false,
            ..Default::default()
        };
        assert_eq!(no_shake.effect_intensity(), 0.5);

        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
        assert_eq!(settings.effect_intensity(), 0.0);

        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);

        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 100);
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
    }
}
