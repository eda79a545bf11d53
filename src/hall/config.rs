//! Room configuration models.

use serde::{Deserialize, Serialize};

use crate::game::{GameSettings, entities::PlayerId};

/// How a room's numbers get drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// The operator submits each number explicitly
    Operator,
    /// The room draws a random unused number on a timer
    Auto { interval_secs: u64 },
}

impl std::fmt::Display for DrawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawMode::Operator => write!(f, "operator"),
            DrawMode::Auto { interval_secs } => write!(f, "auto/{interval_secs}s"),
        }
    }
}

/// Room configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Room name
    pub name: String,

    /// Identity allowed to draw, terminate, reset, and pause
    pub operator: PlayerId,

    /// Session settings (threshold, capacity, pacing, reset trigger)
    pub game: GameSettings,

    /// Draw source for this room
    pub draw_mode: DrawMode,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            name: "Main Hall".to_string(),
            operator: PlayerId::new("operator"),
            game: GameSettings::default(),
            draw_mode: DrawMode::Operator,
        }
    }
}

impl RoomConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Room name must not be empty".to_string());
        }

        if self.game.min_players == 0 {
            return Err("Player threshold must be at least 1".to_string());
        }

        if self.game.max_players < self.game.min_players {
            return Err("Max players must not be below the start threshold".to_string());
        }

        if let DrawMode::Auto { interval_secs } = self.draw_mode
            && interval_secs == 0
        {
            return Err("Auto-draw interval must be at least 1 second".to_string());
        }

        if self.game.min_draw_interval_secs == Some(0) {
            return Err("Draw pacing interval must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Seconds between actor ticks; auto-draw rooms tick at their draw
    /// interval, operator rooms idle at one-second housekeeping ticks.
    pub fn tick_interval_secs(&self) -> u64 {
        match self.draw_mode {
            DrawMode::Auto { interval_secs } => interval_secs.max(1),
            DrawMode::Operator => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RoomConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let config = RoomConfig {
            name: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut config = RoomConfig::default();
        config.game.min_players = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_capacity_below_threshold() {
        let mut config = RoomConfig::default();
        config.game.min_players = 5;
        config.game.max_players = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_auto_interval() {
        let config = RoomConfig {
            draw_mode: DrawMode::Auto { interval_secs: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_interval_tracks_draw_mode() {
        let operator = RoomConfig::default();
        assert_eq!(operator.tick_interval_secs(), 1);
        let auto = RoomConfig {
            draw_mode: DrawMode::Auto { interval_secs: 15 },
            ..Default::default()
        };
        assert_eq!(auto.tick_interval_secs(), 15);
    }
}
