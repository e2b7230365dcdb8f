/*
 * Input Module
 *
 * This module handles window events for the simulation:
 * - Forwarding raw events to egui so the control panel works
 * - Keeping the flock boundary in step with the window size
 * - Keyboard shortcuts for pausing and the debug overlay
 */

use nannou::prelude::*;
use tracing::info;

use crate::app::Model;
use crate::geometry::Boundary;

// The boundary always covers the whole window
pub fn resized(_app: &App, model: &mut Model, size: Vec2) {
    info!(width = size.x, height = size.y, "window resized");
    model.flock.set_boundary(Boundary::from_size(size.x, size.y));
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    // Typing into the panel must not toggle anything
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    match key {
        Key::Space => model.controls.pause_simulation = !model.controls.pause_simulation,
        Key::D => model.controls.show_debug = !model.controls.show_debug,
        _ => {}
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
