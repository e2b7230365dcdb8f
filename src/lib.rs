/*
 * Schools Of Fish - Module Definitions
 *
 * This file defines the module structure for the flocking simulation.
 * The simulation core (geometry, boid, params, flock) has no windowing
 * dependencies of its own; app, ui, renderer and input wire it to nannou.
 */

// Re-export key components for easier access
pub use boid::{Boid, Neighbor};
pub use config::{AppConfig, ConfigError};
pub use debug::DebugInfo;
pub use flock::{BoidGroup, BoidId, Flock, FlockError, GroupId, UpdateMode};
pub use geometry::{Boundary, Vector2};
pub use params::{ControlState, FlockParameters};
pub use app::Model;

// Define modules
pub mod geometry;
pub mod boid;
pub mod params;
pub mod flock;
pub mod config;
pub mod debug;
pub mod app;
pub mod ui;
pub mod renderer;
pub mod input;
