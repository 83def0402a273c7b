use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::input::Direction;
use crate::snake::Position;

const APP_DIR_NAME: &str = "grid-snake";
const SETTINGS_FILE_NAME: &str = "config.json";

/// Lower bound for the redraw interval; a terminal cannot usefully redraw faster.
pub const MIN_FRAME_INTERVAL_MS: u64 = 16;

/// Index of the first body segment that can collide with the head.
///
/// The four segments behind the head are always adjacent to it right after a
/// move, so they are never treated as a collision.
pub const SELF_COLLISION_SKIP: usize = 4;

/// How food is moved off the snake after the per-tick body scan.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FoodPlacement {
    /// Relocate once; the new cell may still sit under the snake.
    SinglePass,
    /// Keep relocating until the food is on a free cell.
    #[default]
    UntilClear,
}

/// Raw settings bundle as read from disk. Every field has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub map: MapSettings,
    pub food: FoodSettings,
    pub snake: SnakeSettings,
    pub joystick: JoystickSettings,
    pub game: GameSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapSettings {
    pub width: u16,
    pub height: u16,
    pub color: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
            color: "#fafafa".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FoodSettings {
    pub width: u16,
    pub height: u16,
    pub color: String,
}

impl Default for FoodSettings {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            color: "#da4444".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnakeSettings {
    pub parts: u16,
    pub width: u16,
    pub height: u16,
    pub head_color: String,
    pub body_color: String,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self {
            parts: 4,
            width: 10,
            height: 10,
            head_color: "#459045".to_owned(),
            body_color: "#43c643".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JoystickSettings {
    pub direction: Direction,
    /// Ignore direction changes for most of a tick after one is accepted.
    pub throttle: bool,
}

impl Default for JoystickSettings {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
            throttle: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSettings {
    /// Milliseconds between redraws.
    pub fps: u64,
    /// Milliseconds between moves.
    pub speed: u64,
    pub reward: u32,
    pub food_placement: FoodPlacement,
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            fps: 0,
            speed: 85,
            reward: 100,
            food_placement: FoodPlacement::UntilClear,
            seed: None,
        }
    }
}

/// Map extent and grid unit, in pixel units.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PlayArea {
    pub width: i32,
    pub height: i32,
    pub alpha: i32,
}

impl PlayArea {
    /// Returns true when a cell at `position` lies fully on the map.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x <= self.width - self.alpha
            && position.y <= self.height - self.alpha
    }

    /// Number of grid columns.
    #[must_use]
    pub fn columns(self) -> i32 {
        self.width / self.alpha
    }

    /// Number of grid rows.
    #[must_use]
    pub fn rows(self) -> i32 {
        self.height / self.alpha
    }

    /// Returns the grid cell nearest the map centre, rounded towards the origin.
    #[must_use]
    pub fn center(self) -> Position {
        Position {
            x: self.width / 2 / self.alpha * self.alpha,
            y: self.height / 2 / self.alpha * self.alpha,
        }
    }

    /// Iterates over every grid cell, row by row.
    pub fn cells(self) -> impl Iterator<Item = Position> {
        let alpha = self.alpha;
        let columns = self.columns();
        (0..self.rows()).flat_map(move |row| {
            (0..columns).map(move |column| Position {
                x: column * alpha,
                y: row * alpha,
            })
        })
    }
}

/// Colors for every drawn entity.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub map: Color,
    pub food: Color,
    pub snake_head: Color,
    pub snake_body: Color,
}

/// Validated, typed configuration consumed by the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub area: PlayArea,
    pub parts: u16,
    pub direction: Direction,
    pub throttle: bool,
    pub frame_interval: Duration,
    pub tick_delay: Duration,
    pub reward: u32,
    pub food_placement: FoodPlacement,
    pub seed: Option<u64>,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Settings::default()
            .validate()
            .expect("built-in settings must always validate")
    }
}

impl Settings {
    /// Reads settings from `path` (when given) or from the per-user config
    /// directory, falling back to the built-in defaults.
    ///
    /// An explicit path must exist. The per-user file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        match user_settings_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reads and parses a JSON settings file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses settings from a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Checks grid alignment and value ranges, producing a typed configuration.
    pub fn validate(&self) -> Result<GameConfig, ConfigError> {
        let snake = &self.snake;
        if snake.width != snake.height {
            return Err(ConfigError::NonSquareCell {
                width: snake.width,
                height: snake.height,
            });
        }
        let alpha = snake.width;
        if alpha == 0 {
            return Err(ConfigError::ZeroCell);
        }

        if self.food.width != alpha || self.food.height != alpha {
            return Err(ConfigError::FoodCellMismatch {
                width: self.food.width,
                height: self.food.height,
                alpha,
            });
        }

        for (dimension, value) in [("width", self.map.width), ("height", self.map.height)] {
            if value == 0 || value % alpha != 0 {
                return Err(ConfigError::MisalignedMap {
                    dimension,
                    value,
                    alpha,
                });
            }
        }

        if snake.parts == 0 {
            return Err(ConfigError::NoParts);
        }

        let area = PlayArea {
            width: i32::from(self.map.width),
            height: i32::from(self.map.height),
            alpha: i32::from(alpha),
        };
        let segments = u32::from(snake.parts) + 1;
        if i64::from(area.center().x) - i64::from(segments) * i64::from(area.alpha) < 0 {
            return Err(ConfigError::SnakeTooLong { segments });
        }

        if self.game.speed == 0 {
            return Err(ConfigError::ZeroSpeed);
        }

        let palette = Palette {
            map: parse_color("map.color", &self.map.color)?,
            food: parse_color("food.color", &self.food.color)?,
            snake_head: parse_color("snake.headColor", &snake.head_color)?,
            snake_body: parse_color("snake.bodyColor", &snake.body_color)?,
        };

        Ok(GameConfig {
            area,
            parts: snake.parts,
            direction: self.joystick.direction,
            throttle: self.joystick.throttle,
            frame_interval: Duration::from_millis(self.game.fps.max(MIN_FRAME_INTERVAL_MS)),
            tick_delay: Duration::from_millis(self.game.speed),
            reward: self.game.reward,
            food_placement: self.game.food_placement,
            seed: self.game.seed,
            palette,
        })
    }
}

/// Returns the per-user settings path, when the platform has a config directory.
#[must_use]
pub fn user_settings_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(SETTINGS_FILE_NAME);
    Some(base)
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    value.parse::<Color>().map_err(|_| ConfigError::InvalidColor {
        field,
        value: value.to_owned(),
    })
}
