/*
 * Application Module
 *
 * This module defines the main application model and the frame driver for
 * the simulation. Each frame the control panel is processed first, its
 * edits are applied to the flock, and then the flock is ticked once with
 * the wall-clock time since the previous frame.
 *
 * The same flock can also be driven without a window (run_headless) for a
 * fixed number of fixed-size ticks.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::debug::{self, DebugInfo, GroupSummary};
use crate::flock::{Flock, GroupId};
use crate::geometry::Boundary;
use crate::params::ControlState;
use crate::{input, renderer, ui};

// nannou builds the model from a plain fn, so the config is parked here first
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

// Main model for the application
pub struct Model {
    pub flock: Flock,
    pub controls: ControlState,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub background: [f32; 3],
}

pub fn run(config: AppConfig) {
    if CONFIG.set(config).is_err() {
        warn!("application already configured; keeping the first configuration");
    }

    nannou::app(model).update(update).run();
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let config = CONFIG.get().cloned().unwrap_or_default();

    let window_id = app
        .new_window()
        .title(config.window.title.clone())
        .size(config.window.width, config.window.height)
        .view(renderer::view)
        .resized(input::resized)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let mut flock = config.build_flock();

    // The window manager may not honour the requested size
    let rect = window.rect();
    flock.set_boundary(Boundary::from_size(rect.w(), rect.h()));

    let first_count = flock.groups().first().map_or(0, |g| g.len());
    info!(
        groups = flock.groups().len(),
        boids = flock.len(),
        mode = ?flock.update_mode(),
        "starting simulation"
    );

    Model {
        flock,
        controls: ControlState::new(0, first_count),
        egui,
        debug_info: DebugInfo::default(),
        background: config.background,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    let (changes, respawn) = match ui::update_ui(
        &mut model.egui,
        &mut model.flock,
        &mut model.controls,
        &model.debug_info,
    ) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(%err, "control panel lost its group; selecting the first one");
            model.controls.selected_group = 0;
            return;
        }
    };

    let group = GroupId(model.controls.selected_group);

    if changes.params_changed {
        if let Ok(params) = model.flock.params(group) {
            debug!(group = group.0, ?params, "group parameters changed");
        }
    }
    if changes.pause_toggled {
        info!(paused = model.controls.pause_simulation, "simulation pause toggled");
    }

    if respawn {
        apply_agent_count(&mut model.flock, group, 0);
    }
    if respawn || changes.count_changed {
        apply_agent_count(&mut model.flock, group, model.controls.agent_count);
    }

    if !model.controls.pause_simulation {
        model.flock.tick(update.since_last.as_secs_f32());
        model.debug_info.ticks += 1;
    }

    model.debug_info.total_boids = model.flock.len();
}

fn apply_agent_count(flock: &mut Flock, group: GroupId, count: usize) {
    if let Err(err) = flock.set_agent_count(group, count) {
        warn!(%err, count, "could not resize boid group");
    }
}

/// Run the configured flock for `ticks` steps of `dt` seconds without a
/// window, returning a summary of every group at the end.
pub fn run_headless(config: &AppConfig, ticks: u64, dt: f32) -> Vec<GroupSummary> {
    let mut flock = config.build_flock();
    info!(ticks, dt, boids = flock.len(), "running headless");

    for tick in 0..ticks {
        flock.tick(dt);

        if tick > 0 && tick % 600 == 0 {
            debug!(tick, "headless progress");
        }
    }

    let summary = debug::summarize(&flock);
    for group in &summary {
        info!(
            group = %group.name,
            count = group.count,
            mean_speed = group.mean_speed,
            centroid_x = group.centroid.x,
            centroid_y = group.centroid.y,
            "group summary"
        );
    }

    summary
}
