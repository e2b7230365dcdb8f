/*
 * Parameters Module
 *
 * This module defines the tunables of a boid group (FlockParameters) and the
 * control panel state (ControlState) that edits them. The control state also
 * provides snapshot based change detection so the app only reacts to, and
 * logs, values that were actually moved.
 */

use serde::{Deserialize, Serialize};

use crate::geometry::Vector2;

/// Per-group tunables. Any value is accepted, including negative weights,
/// which simply invert the corresponding rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParameters {
    pub cohesion: f32,
    pub separation: f32,
    pub alignment: f32,
    /// Scale applied to boids of other groups (1.0 treats them as family).
    pub friendliness: f32,
    pub view_distance: f32,
    pub min_separation_distance: f32,
    pub max_speed: f32,
    pub boundary_repel: Vector2,
    /// Triangle length and width in pixels.
    pub size: Vector2,
    /// RGBA, each component in 0..1.
    pub color: [f32; 4],
}

impl Default for FlockParameters {
    fn default() -> Self {
        Self {
            cohesion: 0.2,
            separation: 0.5,
            alignment: 0.3,
            friendliness: 1.0,
            view_distance: 10.0,
            min_separation_distance: 40.0,
            max_speed: 60.0,
            boundary_repel: Vector2::new(10.0, 10.0),
            size: Vector2::new(1.0, 1.0),
            color: [0.1, 0.8, 0.3, 1.0],
        }
    }
}

impl FlockParameters {
    // Get parameter ranges for UI sliders
    pub fn weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn length_range() -> std::ops::RangeInclusive<f32> {
        10.0..=30.0
    }

    pub fn width_range() -> std::ops::RangeInclusive<f32> {
        3.0..=15.0
    }

    pub fn count_range() -> std::ops::RangeInclusive<usize> {
        20..=3000
    }

    pub fn view_distance_range() -> std::ops::RangeInclusive<f32> {
        5.0..=200.0
    }

    pub fn min_separation_range() -> std::ops::RangeInclusive<f32> {
        1.0..=100.0
    }

    pub fn max_speed_range() -> std::ops::RangeInclusive<f32> {
        10.0..=400.0
    }
}

// State of the control panel between frames
#[derive(Debug, Default)]
pub struct ControlState {
    pub selected_group: usize,
    pub agent_count: usize,
    pub show_debug: bool,
    pub pause_simulation: bool,

    // Internal state for tracking changes
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of the edited values used for change detection
#[derive(Debug, Clone, Copy, PartialEq)]
struct ParamSnapshot {
    selected_group: usize,
    agent_count: usize,
    params: FlockParameters,
    pause_simulation: bool,
}

/// What moved since the last snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamChanges {
    pub group_switched: bool,
    pub count_changed: bool,
    pub params_changed: bool,
    pub pause_toggled: bool,
}

impl ParamChanges {
    pub fn any(&self) -> bool {
        self.group_switched || self.count_changed || self.params_changed || self.pause_toggled
    }
}

impl ControlState {
    pub fn new(selected_group: usize, agent_count: usize) -> Self {
        Self {
            selected_group,
            agent_count,
            ..Self::default()
        }
    }

    // Take a snapshot of the values the panel is about to edit
    pub fn take_snapshot(&mut self, params: &FlockParameters) {
        self.previous_values = Some(ParamSnapshot {
            selected_group: self.selected_group,
            agent_count: self.agent_count,
            params: *params,
            pause_simulation: self.pause_simulation,
        });
    }

    // Compare against the last snapshot; with no snapshot nothing has changed
    pub fn detect_changes(&self, params: &FlockParameters) -> ParamChanges {
        let Some(prev) = &self.previous_values else {
            return ParamChanges::default();
        };

        let group_switched = self.selected_group != prev.selected_group;

        ParamChanges {
            group_switched,
            // A different group naturally has a different count and parameters
            count_changed: !group_switched && self.agent_count != prev.agent_count,
            params_changed: !group_switched && *params != prev.params,
            pause_toggled: self.pause_simulation != prev.pause_simulation,
        }
    }
}
