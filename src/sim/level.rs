//! Level geometry and campaign progression
//!
//! A level is authored as a grid of bit flags plus a list of cameras. Loading
//! turns it into static wall tiles, goal holes, cameras and a spawn point. The
//! game logic only ever reads tile geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::camera::Camera;
use super::math::{Circle, Polygon};
use super::shape::{
    Bounds, EntityId, IdAllocator, Positioned, Projection, Renderable, regular_polygon, sampled_rect,
};
use crate::consts::{DEFAULT_GRID_SIZE, HOLE_PULSE_PERIOD_MS};

/// Map cell flags
pub const CELL_TILE: u8 = 1;
pub const CELL_PLAYER_START: u8 = 8;
pub const CELL_HOLE: u8 = 16;

const BUILT_IN_LEVELS: [&str; 3] = [
    include_str!("../../assets/levels/level_001.json"),
    include_str!("../../assets/levels/level_002.json"),
    include_str!("../../assets/levels/level_003.json"),
];

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("campaign has no levels")]
    NoLevels,
    #[error("level map is empty")]
    EmptyMap,
    #[error("map row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("level has no player start cell")]
    MissingSpawn,
    #[error("camera {index} at ({col}, {row}) is outside the map")]
    CameraOutOfBounds { index: usize, col: usize, row: usize },
    #[error("camera {index} needs a positive view distance and angle")]
    InvalidCamera { index: usize },
    #[error("invalid level json: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_grid_size() -> f32 {
    DEFAULT_GRID_SIZE
}

fn default_sweep_speed() -> f32 {
    1.0
}

/// Authored camera placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDef {
    pub col: usize,
    pub row: usize,
    /// Screen-space facing, e.g. `[0, 1]` looks down
    pub direction: [f32; 2],
    pub view_distance: f32,
    pub view_angle: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub phase: f32,
    #[serde(default = "default_sweep_speed")]
    pub sweep_speed: f32,
}

/// Authored level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    #[serde(default)]
    pub background: String,
    #[serde(default = "default_grid_size")]
    pub grid_size: f32,
    pub map: Vec<Vec<u8>>,
    #[serde(default)]
    pub cameras: Vec<CameraDef>,
}

impl LevelDef {
    /// Parse and validate a level
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let def: LevelDef = serde_json::from_str(json)?;
        def.validate()?;
        Ok(def)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let width = self.map.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(LevelError::EmptyMap);
        }
        if let Some((row, cells)) = self.map.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(LevelError::RaggedRow {
                row,
                expected: width,
                found: cells.len(),
            });
        }
        if !self.map.iter().flatten().any(|c| c & CELL_PLAYER_START != 0) {
            return Err(LevelError::MissingSpawn);
        }
        for (index, cam) in self.cameras.iter().enumerate() {
            if cam.row >= self.map.len() || cam.col >= width {
                return Err(LevelError::CameraOutOfBounds {
                    index,
                    col: cam.col,
                    row: cam.row,
                });
            }
            if cam.view_distance <= 0.0 || cam.view_angle <= 0.0 {
                return Err(LevelError::InvalidCamera { index });
            }
        }
        Ok(())
    }

    fn cell(&self, row: usize, col: usize) -> u8 {
        self.map
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }

    fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            col as f32 * self.grid_size + self.grid_size * 0.5,
            row as f32 * self.grid_size + self.grid_size * 0.5,
        )
    }
}

/// Static wall block, one or two cells wide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    outline: Polygon,
}

impl Tile {
    pub fn new(id: EntityId, x: f32, y: f32, size: f32, sample_step: f32) -> Self {
        Self {
            id,
            x,
            y,
            size,
            outline: sampled_rect(Vec2::new(x, y), size, size, sample_step),
        }
    }

    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }
}

impl Positioned for Tile {
    fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.size,
            height: self.size,
        }
    }

    fn collision_circle(&self) -> Circle {
        let c = self.bounds().center();
        Circle::new(c.x, c.y, self.size * std::f32::consts::FRAC_1_SQRT_2)
    }
}

impl Renderable for Tile {
    fn projection(&self) -> Vec<Projection> {
        vec![Projection::new("tile", self.outline.clone(), "#2e7d32")]
    }
}

/// Goal region; touching its centre finishes the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hole {
    pub id: EntityId,
    pub center: Vec2,
    pub size: f32,
    /// Opacity of the pulsing centre, updated by `animate`
    pub glow: f32,
}

impl Hole {
    pub fn new(id: EntityId, center: Vec2, size: f32) -> Self {
        Self {
            id,
            center,
            size,
            glow: 1.0,
        }
    }

    pub fn animate(&mut self, time_ms: f64) {
        let wave = (time_ms / HOLE_PULSE_PERIOD_MS).sin() as f32;
        self.glow = (wave + 1.0) * 0.2 + 0.6;
    }
}

impl Positioned for Hole {
    fn bounds(&self) -> Bounds {
        Bounds {
            x: self.center.x - self.size / 2.0,
            y: self.center.y - self.size / 2.0,
            width: self.size,
            height: self.size,
        }
    }

    fn collision_circle(&self) -> Circle {
        Circle::new(self.center.x, self.center.y, self.size * 0.25)
    }
}

impl Renderable for Hole {
    fn projection(&self) -> Vec<Projection> {
        let phase = std::f32::consts::PI / 8.0;
        let rim = Projection::new(
            "rim",
            regular_polygon(self.center, self.size * 0.45, 8, phase),
            "#1a237e",
        );
        let mut center = Projection::new(
            "center",
            regular_polygon(self.center, self.size * 0.25, 8, phase),
            "#4fc3f7",
        );
        center.opacity = self.glow;
        vec![rim, center]
    }
}

/// The campaign and the geometry of the level currently loaded
#[derive(Debug, Clone)]
pub struct Level {
    defs: Vec<LevelDef>,
    pub level_index: usize,
    pub grid_size: f32,
    pub background: String,
    pub tiles: Vec<Tile>,
    pub cameras: Vec<Camera>,
    pub holes: Vec<Hole>,
    pub player_initial_position: Vec2,
    pub paused: bool,
    ids: IdAllocator,
}

impl Level {
    /// Build a campaign and load its first level
    pub fn new(defs: Vec<LevelDef>) -> Result<Self, LevelError> {
        if defs.is_empty() {
            return Err(LevelError::NoLevels);
        }
        for def in &defs {
            def.validate()?;
        }

        let mut level = Self {
            defs,
            level_index: 0,
            grid_size: DEFAULT_GRID_SIZE,
            background: String::new(),
            tiles: Vec::new(),
            cameras: Vec::new(),
            holes: Vec::new(),
            player_initial_position: Vec2::ZERO,
            paused: false,
            ids: IdAllocator::new(),
        };
        level.load(0);
        Ok(level)
    }

    /// Campaign bundled with the game
    pub fn built_in() -> Result<Self, LevelError> {
        let defs = BUILT_IN_LEVELS
            .iter()
            .map(|json| LevelDef::from_json(json))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(defs)
    }

    pub fn level_count(&self) -> usize {
        self.defs.len()
    }

    pub fn has_more_levels(&self) -> bool {
        self.level_index + 1 < self.defs.len()
    }

    /// Advance to the next level; false (and nothing loaded) on the last one
    pub fn load_next_level(&mut self) -> bool {
        if !self.has_more_levels() {
            return false;
        }
        self.load(self.level_index + 1);
        true
    }

    pub fn load_first_level(&mut self) {
        self.load(0);
    }

    /// Load a specific level; false if out of range
    pub fn load_level(&mut self, index: usize) -> bool {
        if index >= self.defs.len() {
            return false;
        }
        self.load(index);
        true
    }

    /// Drop the current level's entities
    pub fn unload(&mut self) {
        self.tiles.clear();
        self.cameras.clear();
        self.holes.clear();
    }

    pub fn pause_game(&mut self) {
        self.paused = true;
    }

    pub fn unpause_game(&mut self) {
        self.paused = false;
    }

    /// Obstacle outlines for collision
    pub fn obstacles(&self) -> impl Iterator<Item = &[Vec2]> {
        self.tiles.iter().map(Tile::outline)
    }

    fn load(&mut self, index: usize) {
        self.unload();
        self.ids = IdAllocator::new();
        self.level_index = index;
        self.paused = false;

        let def = &self.defs[index];
        let grid = def.grid_size;
        self.grid_size = grid;
        self.background = def.background.clone();

        let rows = def.map.len();
        let cols = def.map[0].len();
        let mut free = vec![vec![true; cols]; rows];

        for row in 0..rows {
            for col in 0..cols {
                let cell = def.cell(row, col);

                if free[row][col] && cell & CELL_TILE != 0 {
                    let block = [(row, col + 1), (row + 1, col), (row + 1, col + 1)];
                    let merges = block.iter().all(|&(r, c)| {
                        r < rows && c < cols && free[r][c] && def.cell(r, c) & CELL_TILE != 0
                    });

                    let size = if merges {
                        for (r, c) in block {
                            free[r][c] = false;
                        }
                        2.0
                    } else {
                        1.0
                    };
                    free[row][col] = false;

                    let id = self.ids.allocate();
                    self.tiles.push(Tile::new(
                        id,
                        col as f32 * grid,
                        row as f32 * grid,
                        size * grid,
                        grid / 8.0,
                    ));
                }

                if cell & CELL_HOLE != 0 {
                    let id = self.ids.allocate();
                    self.holes.push(Hole::new(id, def.cell_center(row, col), grid));
                }

                if cell & CELL_PLAYER_START != 0 {
                    self.player_initial_position = def.cell_center(row, col);
                }
            }
        }

        for cam in &def.cameras {
            let id = self.ids.allocate();
            let camera = Camera::new(
                id,
                def.cell_center(cam.row, cam.col),
                grid,
                Vec2::from(cam.direction),
            )
            .with_view(cam.view_distance, cam.view_angle)
            .with_sweep(cam.rotation, cam.phase, cam.sweep_speed);
            self.cameras.push(camera);
        }

        log::info!(
            "Level {} loaded: {} tiles, {} cameras, {} holes",
            index + 1,
            self.tiles.len(),
            self.cameras.len(),
            self.holes.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(map: Vec<Vec<u8>>) -> LevelDef {
        LevelDef {
            background: "#000".into(),
            grid_size: 10.0,
            map,
            cameras: Vec::new(),
        }
    }

    #[test]
    fn test_built_in_campaign_loads() {
        let level = Level::built_in().expect("bundled levels are valid");
        assert_eq!(level.level_index, 0);
        assert!(level.level_count() >= 2);
        assert!(!level.tiles.is_empty());
        assert!(!level.holes.is_empty());
    }

    #[test]
    fn test_merges_two_by_two_blocks() {
        let level = Level::new(vec![def(vec![
            vec![1, 1, 1],
            vec![1, 1, 0],
            vec![0, 8, 0],
        ])])
        .unwrap();
        assert_eq!(level.tiles.len(), 2);
        assert_eq!(level.tiles[0].size, 20.0);
        assert_eq!(level.tiles[1].size, 10.0);
        assert_eq!(level.tiles[1].x, 20.0);
        assert_eq!(level.player_initial_position, Vec2::new(15.0, 25.0));
    }

    #[test]
    fn test_holes_and_cameras_placed_at_cell_centres() {
        let mut d = def(vec![vec![8, 0, 16]]);
        d.cameras.push(CameraDef {
            col: 1,
            row: 0,
            direction: [0.0, 2.0],
            view_distance: 2.0,
            view_angle: 0.3,
            rotation: 0.0,
            phase: 0.0,
            sweep_speed: 1.0,
        });
        let level = Level::new(vec![d]).unwrap();
        assert_eq!(level.holes[0].center, Vec2::new(25.0, 5.0));
        assert_eq!(level.cameras[0].position, Vec2::new(15.0, 5.0));
        assert_eq!(level.cameras[0].base_direction, Vec2::new(0.0, 1.0));
        assert_ne!(level.holes[0].id, level.cameras[0].id);
    }

    #[test]
    fn test_progression() {
        let mut level = Level::new(vec![def(vec![vec![8]]), def(vec![vec![0, 8]])]).unwrap();
        assert!(level.has_more_levels());
        assert!(level.load_next_level());
        assert_eq!(level.level_index, 1);
        assert!(!level.has_more_levels());
        assert!(!level.load_next_level());
        assert_eq!(level.level_index, 1);
        level.load_first_level();
        assert_eq!(level.level_index, 0);
        assert!(!level.load_level(5));
        assert!(level.load_level(1));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(Level::new(Vec::new()), Err(LevelError::NoLevels)));
        assert!(matches!(def(vec![]).validate(), Err(LevelError::EmptyMap)));
        assert!(matches!(
            def(vec![vec![8, 0], vec![0]]).validate(),
            Err(LevelError::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            def(vec![vec![1, 0]]).validate(),
            Err(LevelError::MissingSpawn)
        ));
        assert!(matches!(
            LevelDef::from_json("{\"map\": 3}"),
            Err(LevelError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_camera_rejected() {
        let mut d = def(vec![vec![8, 0]]);
        d.cameras.push(CameraDef {
            col: 1,
            row: 0,
            direction: [1.0, 0.0],
            view_distance: 0.0,
            view_angle: 0.3,
            rotation: 0.0,
            phase: 0.0,
            sweep_speed: 1.0,
        });
        assert!(matches!(d.validate(), Err(LevelError::InvalidCamera { index: 0 })));
        d.cameras[0].view_distance = 1.0;
        d.cameras[0].col = 4;
        assert!(matches!(
            d.validate(),
            Err(LevelError::CameraOutOfBounds { index: 0, .. })
        ));
    }

    #[test]
    fn test_hole_center_projection_and_pulse() {
        let mut hole = Hole::new(EntityId(0), Vec2::new(50.0, 50.0), 40.0);
        hole.animate(0.0);
        assert!((hole.glow - 0.8).abs() < 1e-6);
        let center = hole.projection_named("center");
        assert_eq!(center.len(), 1);
        assert_eq!(center[0].points.len(), 8);
        assert!((center[0].opacity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_unload_clears_entities() {
        let mut level = Level::built_in().unwrap();
        level.unload();
        assert!(level.tiles.is_empty() && level.cameras.is_empty() && level.holes.is_empty());
        assert_eq!(level.obstacles().count(), 0);
    }
}
