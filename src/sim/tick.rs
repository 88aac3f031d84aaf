//! Per-frame game logic
//!
//! One call to `GameLogic::play` advances a frame. Key events arrive in the
//! `TickInput` for that frame together with the wall-clock time, so the logic
//! never reads a clock itself.

use glam::Vec2;

use super::collision::{circle_hits_polygon, polygons_overlap};
use super::direction::DirectionKeys;
use super::level::Level;
use super::math::{Circle, lerp, normalize};
use super::player::{ANIMATE_WALK, Avatar};
use super::shape::{Positioned, Projection, Renderable};
use super::state::{GameEvent, GameStatus, PlayerState};
use crate::persistence::{Data, KeyValueStore};
use crate::settings::Settings;

/// Raw input delivered into a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(char),
    KeyUp(char),
    /// Forget every held key, e.g. when the host loses focus
    ReleaseAll,
}

/// Everything a frame needs from the outside world
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Events since the previous frame, oldest first
    pub events: Vec<InputEvent>,
    /// Wall-clock time (ms)
    pub time_ms: f64,
}

impl TickInput {
    pub fn at(time_ms: f64) -> Self {
        Self {
            events: Vec::new(),
            time_ms,
        }
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// The stealth game state machine
pub struct GameLogic<S> {
    level: Level,
    avatar: Avatar,
    player: PlayerState,
    direction_keys: DirectionKeys,
    data: Data<S>,
    settings: Settings,
    /// When the player was caught (ms)
    over_since_ms: f64,
    /// Time of the frame being played (ms)
    now_ms: f64,
}

impl<S: KeyValueStore> GameLogic<S> {
    /// Create the logic in `Stop`; call `start` or `load_first_level` to play
    pub fn new(level: Level, storage: S, settings: Settings) -> Self {
        let width = level.grid_size * settings.player_scale;
        let avatar = Avatar::new(
            level.player_initial_position,
            width,
            settings.collision_radius,
        );
        Self {
            level,
            avatar,
            player: PlayerState::default(),
            direction_keys: DirectionKeys::new(),
            data: Data::new(storage),
            settings,
            over_since_ms: 0.0,
            now_ms: 0.0,
        }
    }

    /// Resume at the last level reached
    pub fn start(&mut self) {
        let last = self.data.last_level();
        if !self.level.load_level(last) {
            log::warn!("Saved level {} not in campaign, starting over", last + 1);
            self.level.load_first_level();
        }
        self.restart_level();
    }

    /// Run one frame
    pub fn play(&mut self, input: &TickInput) -> Option<GameEvent> {
        for event in &input.events {
            match *event {
                InputEvent::KeyDown(key) => self.direction_keys.add_key(key),
                InputEvent::KeyUp(key) => self.direction_keys.remove_key(key),
                InputEvent::ReleaseAll => self.direction_keys.clear(),
            }
        }
        self.now_ms = input.time_ms;

        match self.player.status {
            GameStatus::Running => {
                self.move_player();
                self.animate_components();
                self.check_collision_with_relevant_elements()
            }
            GameStatus::Over => {
                self.animate_components();
                if self.now_ms - self.over_since_ms > self.settings.game_over_delay_ms {
                    self.restart_level();
                    return Some(GameEvent::Restarted);
                }
                None
            }
            GameStatus::Pause | GameStatus::Stop => None,
        }
    }

    /// Move the player based on the direction keys
    fn move_player(&mut self) {
        if self.direction_keys.has_pressed_keys() {
            let rot = lerp(
                self.player.direction_vector,
                self.direction_keys.direction_vector(),
                self.settings.direction_blend,
            );
            self.player.direction_vector = normalize(rot) * self.settings.player_speed;

            self.check_collision_and_slide();

            self.avatar.animation |= ANIMATE_WALK;
        } else {
            self.avatar.animation = 0;
        }

        let dir = self.player.direction_vector;
        self.avatar.update_coordinates(self.player.position);
        self.avatar.update_direction_vector(Vec2::new(dir.x, -dir.y));
    }

    /// Try the full step, then each axis alone. Returns true if fully blocked.
    fn check_collision_and_slide(&mut self) -> bool {
        let dir = self.player.direction_vector;
        let attempts = [dir, Vec2::new(dir.x, 0.0), Vec2::new(0.0, dir.y)];

        let prev_position = self.player.position;
        let circle = self.avatar.collision_circle();
        for step in attempts {
            let candidate = prev_position + step;
            if !self.collides_with_map(&circle.moved_to(candidate)) {
                self.player.position = candidate;
                return false;
            }
        }

        self.player.position = prev_position;
        true
    }

    fn collides_with_map(&self, circle: &Circle) -> bool {
        self.level
            .obstacles()
            .any(|outline| circle_hits_polygon(outline, circle))
    }

    fn animate_components(&mut self) {
        let now = self.now_ms;
        self.avatar.animate(now);
        for camera in &mut self.level.cameras {
            camera.animate(now / 1000.0);
        }
        for hole in &mut self.level.holes {
            hole.animate(now);
        }
    }

    fn check_collision_with_relevant_elements(&mut self) -> Option<GameEvent> {
        let player_projection = self.avatar.projection();

        let mut caught = None;
        for camera in &mut self.level.cameras {
            camera.saw_player = camera.sees_any_point(&player_projection);
            if camera.saw_player {
                caught = Some(camera.id);
                break;
            }
        }
        if let Some(camera) = caught {
            self.game_over();
            return Some(GameEvent::Caught { camera });
        }

        let reached_goal = self
            .level
            .holes
            .iter()
            .any(|hole| projections_collide(&player_projection, &hole.projection_named("center")));
        if reached_goal {
            return Some(self.level_complete());
        }

        None
    }

    fn game_over(&mut self) {
        self.player.deaths = self.player.deaths.saturating_add(1);
        self.data.save_deaths(self.player.deaths);

        self.player.status = GameStatus::Over;
        self.avatar.animation = 0;
        self.avatar.break_shapes();
        self.over_since_ms = self.now_ms;

        log::info!(
            "Caught on level {} (deaths: {})",
            self.level.level_index + 1,
            self.player.deaths
        );
    }

    fn level_complete(&mut self) -> GameEvent {
        if self.level.load_next_level() {
            let level = self.level.level_index;
            self.data.save_last_level(level);
            self.restart_level();
            log::info!("Level complete, moving on to level {}", level + 1);
            return GameEvent::LevelComplete { level };
        }

        let deaths = self.player.deaths;
        self.data.save_best_deaths(deaths);
        self.data.save_deaths(0);
        log::info!("Campaign complete with {} deaths", deaths);

        self.load_first_level();
        GameEvent::CampaignComplete { deaths }
    }

    /// Only a running game can be paused
    pub fn can_pause_game(&self) -> bool {
        self.player.status == GameStatus::Running
    }

    pub fn pause(&mut self) {
        if self.can_pause_game() {
            self.player.status = GameStatus::Pause;
            self.level.pause_game();
        }
    }

    pub fn unpause(&mut self) {
        if self.player.status == GameStatus::Pause {
            self.player.status = GameStatus::Running;
            self.level.unpause_game();
        }
    }

    /// Start a new run from the first level
    pub fn load_first_level(&mut self) {
        self.level.load_first_level();
        self.data.save_deaths(0);
        self.data.save_last_level(0);
        self.restart_level();
    }

    /// Put the player back on the spawn point of the current level
    pub fn restart_level(&mut self) {
        let spawn = self.level.player_initial_position;
        self.player = PlayerState::spawn(spawn, self.data.load_deaths());
        self.direction_keys.clear();

        self.avatar
            .reset(self.level.grid_size * self.settings.player_scale);
        self.avatar.update_coordinates(spawn);
        let dir = self.player.direction_vector;
        self.avatar.update_direction_vector(Vec2::new(dir.x, -dir.y));

        for camera in &mut self.level.cameras {
            camera.saw_player = false;
        }

        log::debug!(
            "Level {} (re)started at ({}, {})",
            self.level.level_index + 1,
            spawn.x,
            spawn.y
        );
    }

    pub fn key_down(&mut self, key: char) {
        self.direction_keys.add_key(key);
    }

    pub fn key_up(&mut self, key: char) {
        self.direction_keys.remove_key(key);
    }

    pub fn status(&self) -> GameStatus {
        self.player.status
    }

    pub fn deaths(&self) -> u32 {
        self.player.deaths
    }

    /// 0-based
    pub fn level_index(&self) -> usize {
        self.level.level_index
    }

    pub fn best_deaths(&self) -> Option<u32> {
        self.data.load_best_deaths()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn data(&self) -> &Data<S> {
        &self.data
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Any outline of `a` overlapping any outline of `b`
fn projections_collide(a: &[Projection], b: &[Projection]) -> bool {
    a.iter()
        .any(|s1| b.iter().any(|s2| polygons_overlap(&s1.points, &s2.points)))
}
