//! Logical game state
//!
//! What the state machine owns about the player. The drawn body lives in
//! `player::Avatar` and only mirrors this.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::EntityId;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Player moves, cameras watch
    Running,
    /// Caught; waiting for the automatic restart
    Over,
    /// Paused from outside
    Pause,
    /// No level started yet
    #[default]
    Stop,
}

/// The player as the game logic sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec2,
    /// Heading scaled to the current speed (screen space)
    pub direction_vector: Vec2,
    /// Deaths in the current run
    pub deaths: u32,
    pub status: GameStatus,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            direction_vector: Vec2::new(0.0, 1.0),
            deaths: 0,
            status: GameStatus::Stop,
        }
    }
}

impl PlayerState {
    /// Fresh player at `spawn`, keeping nothing but the death count
    pub fn spawn(spawn: Vec2, deaths: u32) -> Self {
        Self {
            position: spawn,
            deaths,
            status: GameStatus::Running,
            ..Self::default()
        }
    }
}

/// Notable outcome of a frame, reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A camera saw the player
    Caught { camera: EntityId },
    /// The automatic restart after being caught
    Restarted,
    /// Reached a hole; `level` is the index now loaded
    LevelComplete { level: usize },
    /// Reached the hole of the last level; `deaths` is stored as the best
    /// score and the campaign starts over
    CampaignComplete { deaths: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_is_stop() {
        assert_eq!(PlayerState::default().status, GameStatus::Stop);
    }

    #[test]
    fn test_spawn_faces_down_and_runs() {
        let p = PlayerState::spawn(Vec2::new(3.0, 4.0), 7);
        assert_eq!(p.status, GameStatus::Running);
        assert_eq!(p.direction_vector, Vec2::new(0.0, 1.0));
        assert_eq!(p.deaths, 7);
    }
}
