/*
 * Configuration Module
 *
 * This module defines the startup configuration of the application: window
 * size, seeding, update mode and the boid groups to create. It can be
 * loaded from a JSON file; any field left out falls back to the default
 * scene of three schools of fish.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::flock::{Flock, UpdateMode};
use crate::geometry::{Boundary, Vector2};
use crate::params::FlockParameters;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Schools Of Fish".to_owned(),
            width: 1080,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub count: usize,
    #[serde(default)]
    pub params: FlockParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    /// Seed for boid placement; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub update_mode: UpdateMode,
    /// Written into every group after the groups are created.
    pub boundary_repel: Vector2,
    pub background: [f32; 3],
    pub groups: Vec<GroupConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let school = |name: &str, count: usize, friendliness: f32, color: [f32; 4]| GroupConfig {
            name: name.to_owned(),
            count,
            params: FlockParameters {
                friendliness,
                view_distance: 60.0,
                min_separation_distance: 15.0,
                max_speed: 100.0,
                size: Vector2::new(15.0, 5.0),
                color,
                ..FlockParameters::default()
            },
        };

        Self {
            window: WindowConfig::default(),
            seed: None,
            update_mode: UpdateMode::Sequential,
            boundary_repel: Vector2::new(15.0, 15.0),
            background: [150.0 / 255.0, 158.0 / 255.0, 224.0 / 255.0],
            groups: vec![
                school("green", 50, 0.0, [0.0, 1.0, 0.0, 1.0]),
                school("blue", 300, 0.1, [0.0, 0.0, 1.0, 1.0]),
                school("red", 300, 0.1, [1.0, 0.0, 0.0, 1.0]),
            ],
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), groups = config.groups.len(), "loaded configuration");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Only the startup shape is checked; runtime tunables accept anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window dimensions must be non-zero"));
        }
        if self.groups.is_empty() {
            return Err(ConfigError::Invalid("at least one boid group is required"));
        }
        if !self.boundary_repel.is_finite() {
            return Err(ConfigError::Invalid("boundary_repel must be finite"));
        }

        let mut names = HashSet::new();
        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(ConfigError::Invalid("group names must not be empty"));
            }
            if !names.insert(group.name.as_str()) {
                return Err(ConfigError::Invalid("group names must be unique"));
            }
            if !params_are_finite(&group.params) {
                return Err(ConfigError::Invalid("group parameters must be finite"));
            }
        }

        Ok(())
    }

    pub fn boundary(&self) -> Boundary {
        Boundary::from_size(self.window.width as f32, self.window.height as f32)
    }

    pub fn build_flock(&self) -> Flock {
        let mut flock = match self.seed {
            Some(seed) => Flock::with_seed(self.boundary(), seed),
            None => Flock::new(self.boundary()),
        };
        flock.set_update_mode(self.update_mode);

        for group in &self.groups {
            flock.add_group_with(group.name.clone(), group.count, group.params);
        }
        flock.set_boundary_repel(self.boundary_repel);

        flock
    }
}

fn params_are_finite(p: &FlockParameters) -> bool {
    [
        p.cohesion,
        p.separation,
        p.alignment,
        p.friendliness,
        p.view_distance,
        p.min_separation_distance,
        p.max_speed,
    ]
    .iter()
    .all(|v| v.is_finite())
        && p.boundary_repel.is_finite()
        && p.size.is_finite()
        && p.color.iter().all(|c| c.is_finite())
}
