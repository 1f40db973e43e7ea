/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::geom::Position;
use crate::domain::obstacle::{ClusterParams, GridParams};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub field: FieldConfig,
    pub spawn: Position,
    pub generation: GenerationConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub render_interval_ms: u64,
    pub button_delay_ms: u64,
    pub inactivity_timeout_ms: u64,
    pub wander_interval_ms: u64,
    pub frame_sleep_ms: u64,   // host loop idle between ticks
}

#[derive(Clone, Debug)]
pub struct FieldConfig {
    pub width: i32,
    pub height: i32,
    pub obstacle_width: i32,
    pub obstacle_height: i32,
    pub capacity: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Grid,
    Clustered,
    Path,
}

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub strategy: Strategy,
    pub grid: GridParams,
    pub clusters: ClusterParams,
    pub removal_percent: u32,
    pub seed: Option<u64>,     // None → OS entropy
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub a: Vec<String>,
    pub b: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    field: TomlField,
    #[serde(default)]
    actor: TomlActor,
    #[serde(default)]
    generation: TomlGeneration,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_render_interval")]
    render_interval_ms: u64,
    #[serde(default = "default_button_delay")]
    button_delay_ms: u64,
    #[serde(default = "default_inactivity_timeout")]
    inactivity_timeout_ms: u64,
    #[serde(default = "default_wander_interval")]
    wander_interval_ms: u64,
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlField {
    #[serde(default = "default_field_width")]
    width: i32,
    #[serde(default = "default_field_height")]
    height: i32,
    #[serde(default = "default_obstacle_size")]
    obstacle_width: i32,
    #[serde(default = "default_obstacle_size")]
    obstacle_height: i32,
    #[serde(default = "default_capacity")]
    capacity: usize,
}

#[derive(Deserialize, Debug)]
struct TomlActor {
    #[serde(default = "default_spawn_x")]
    spawn_x: i32,
    #[serde(default = "default_spawn_y")]
    spawn_y: i32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneration {
    #[serde(default = "default_strategy")]
    strategy: Strategy,
    #[serde(default = "default_grid_fill")]
    grid_fill_percent: u32,
    #[serde(default = "default_spawn_buffer")]
    spawn_buffer: i32,
    #[serde(default = "default_cluster_count")]
    cluster_count: u32,
    #[serde(default = "default_cluster_min")]
    cluster_min: i32,
    #[serde(default = "default_cluster_max")]
    cluster_max: i32,
    #[serde(default = "default_cluster_spread")]
    cluster_spread: i32,
    #[serde(default = "default_removal")]
    removal_percent: u32,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_button_a")]
    a: Vec<String>,
    #[serde(default = "default_button_b")]
    b: Vec<String>,
}

// ── Defaults ──

fn default_render_interval() -> u64 { 50 }
fn default_button_delay() -> u64 { 50 }
fn default_inactivity_timeout() -> u64 { 5000 }  // 5s idle → wander
fn default_wander_interval() -> u64 { 50 }
fn default_frame_sleep() -> u64 { 5 }

fn default_field_width() -> i32 { 128 }
fn default_field_height() -> i32 { 64 }
fn default_obstacle_size() -> i32 { 16 }
fn default_capacity() -> usize { 15 }

fn default_spawn_x() -> i32 { 10 }
fn default_spawn_y() -> i32 { 64 - 25 }

fn default_strategy() -> Strategy { Strategy::Grid }
fn default_grid_fill() -> u32 { 50 }
fn default_spawn_buffer() -> i32 { 20 }
fn default_cluster_count() -> u32 { 10 }
fn default_cluster_min() -> i32 { 3 }
fn default_cluster_max() -> i32 { 5 }
fn default_cluster_spread() -> i32 { 5 }
fn default_removal() -> u32 { 30 }

fn default_button_a() -> Vec<String> { vec!["A".into()] }
fn default_button_b() -> Vec<String> { vec!["B".into()] }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            render_interval_ms: default_render_interval(),
            button_delay_ms: default_button_delay(),
            inactivity_timeout_ms: default_inactivity_timeout(),
            wander_interval_ms: default_wander_interval(),
            frame_sleep_ms: default_frame_sleep(),
        }
    }
}

impl Default for TomlField {
    fn default() -> Self {
        TomlField {
            width: default_field_width(),
            height: default_field_height(),
            obstacle_width: default_obstacle_size(),
            obstacle_height: default_obstacle_size(),
            capacity: default_capacity(),
        }
    }
}

impl Default for TomlActor {
    fn default() -> Self {
        TomlActor {
            spawn_x: default_spawn_x(),
            spawn_y: default_spawn_y(),
        }
    }
}

impl Default for TomlGeneration {
    fn default() -> Self {
        TomlGeneration {
            strategy: default_strategy(),
            grid_fill_percent: default_grid_fill(),
            spawn_buffer: default_spawn_buffer(),
            cluster_count: default_cluster_count(),
            cluster_min: default_cluster_min(),
            cluster_max: default_cluster_max(),
            cluster_spread: default_cluster_spread(),
            removal_percent: default_removal(),
            seed: None,
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            a: default_button_a(),
            b: default_button_b(),
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            timing: TimingConfig {
                render_interval_ms: t.timing.render_interval_ms,
                button_delay_ms: t.timing.button_delay_ms,
                inactivity_timeout_ms: t.timing.inactivity_timeout_ms,
                wander_interval_ms: t.timing.wander_interval_ms,
                frame_sleep_ms: t.timing.frame_sleep_ms,
            },
            field: FieldConfig {
                width: t.field.width.max(0),
                height: t.field.height.max(0),
                obstacle_width: t.field.obstacle_width.max(0),
                obstacle_height: t.field.obstacle_height.max(0),
                capacity: t.field.capacity,
            },
            spawn: Position::new(t.actor.spawn_x, t.actor.spawn_y),
            generation: GenerationConfig {
                strategy: t.generation.strategy,
                grid: GridParams {
                    fill_percent: t.generation.grid_fill_percent.min(100),
                    spawn_buffer: t.generation.spawn_buffer,
                },
                clusters: ClusterParams {
                    count: t.generation.cluster_count,
                    min_size: t.generation.cluster_min,
                    max_size: t.generation.cluster_max.max(t.generation.cluster_min),
                    spread: t.generation.cluster_spread.max(0),
                },
                removal_percent: t.generation.removal_percent.min(100),
                seed: t.generation.seed,
            },
            gamepad: GamepadConfig {
                a: t.gamepad.a,
                b: t.gamepad.b,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.config/slimewalk`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(cfg) => {
                    info!(path = %path.display(), "loaded config");
                    return cfg;
                }
                Err(e @ ConfigError::Parse(_)) => {
                    warn!("{e}; using default settings");
                    return GameConfig::default();
                }
                Err(e) => warn!("{e}"),
            }
        }
        info!("no config.toml found, using defaults");
        GameConfig::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: TomlConfig = toml::from_str(text)?;
        Ok(raw.into())
    }
}

/// Candidate directories to search: exe dir + CWD + user config dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. ~/.config/slimewalk
    if let Ok(home) = std::env::var("HOME") {
        let user = PathBuf::from(&home).join(".config/slimewalk");
        if user.is_dir() && !dirs.iter().any(|d| d == &user) {
            dirs.push(user);
        }
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.timing.render_interval_ms, 50);
        assert_eq!(cfg.timing.button_delay_ms, 50);
        assert_eq!(cfg.timing.inactivity_timeout_ms, 5000);
        assert_eq!(cfg.timing.wander_interval_ms, 50);
        assert_eq!((cfg.field.width, cfg.field.height), (128, 64));
        assert_eq!(cfg.field.capacity, 15);
        assert_eq!(cfg.spawn, Position::new(10, 39));
        assert_eq!(cfg.generation.strategy, Strategy::Grid);
        assert_eq!(cfg.generation.grid.fill_percent, 50);
        assert_eq!(cfg.generation.grid.spawn_buffer, 20);
        assert_eq!(cfg.generation.removal_percent, 30);
        assert_eq!(cfg.generation.seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            r#"
            [generation]
            strategy = "path"
            seed = 42

            [field]
            capacity = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.generation.strategy, Strategy::Path);
        assert_eq!(cfg.generation.seed, Some(42));
        assert_eq!(cfg.field.capacity, 4);
        assert_eq!(cfg.field.obstacle_width, 16);
        assert_eq!(cfg.generation.clusters.count, 10);
    }

    #[test]
    fn out_of_range_values_are_sanitised() {
        let cfg = GameConfig::from_toml_str(
            r#"
            [generation]
            grid_fill_percent = 250
            cluster_min = 6
            cluster_max = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.generation.grid.fill_percent, 100);
        assert_eq!(cfg.generation.clusters.max_size, 6);
    }

    #[test]
    fn bad_strategy_is_a_parse_error() {
        let err = GameConfig::from_toml_str("[generation]\nstrategy = \"spiral\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::from_file(Path::new("/definitely/not/here/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
