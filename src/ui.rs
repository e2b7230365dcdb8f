/*
 * UI Module
 *
 * This module contains functions for creating and updating the control
 * panel using nannou_egui. The panel edits one boid group at a time; a
 * combo box picks which. Parameter change detection is handled by the
 * ControlState snapshot so the caller only acts on real edits.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::flock::{Flock, FlockError, GroupId};
use crate::params::{ControlState, FlockParameters, ParamChanges};

// Update the panel and return what changed plus whether a respawn was requested
pub fn update_ui(
    egui: &mut Egui,
    flock: &mut Flock,
    controls: &mut ControlState,
    debug_info: &DebugInfo,
) -> Result<(ParamChanges, bool), FlockError> {
    let mut respawn_group = false;

    let group = GroupId(controls.selected_group);
    let group_names: Vec<String> = flock.groups().iter().map(|g| g.name().to_owned()).collect();
    let selected_name = flock.group(group)?.name().to_owned();
    controls.agent_count = flock.group(group)?.len();

    // Take a snapshot of current parameter values for change detection
    controls.take_snapshot(flock.params(group)?);

    let params = flock.params_mut(group)?;
    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            egui::ComboBox::from_label("Group")
                .selected_text(selected_name.as_str())
                .show_ui(ui, |ui| {
                    for (i, name) in group_names.iter().enumerate() {
                        ui.selectable_value(&mut controls.selected_group, i, name.as_str());
                    }
                });

            ui.collapsing("Flocking Behavior", |ui| {
                let weights = FlockParameters::weight_range;
                ui.add(egui::Slider::new(&mut params.cohesion, weights()).text("Cohesion"));
                ui.add(egui::Slider::new(&mut params.separation, weights()).text("Separation"));
                ui.add(egui::Slider::new(&mut params.alignment, weights()).text("Alignment"));
                ui.add(egui::Slider::new(&mut params.friendliness, weights()).text("Friendliness"));
            });

            ui.collapsing("Perception", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.view_distance, FlockParameters::view_distance_range())
                        .text("View Distance"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.min_separation_distance,
                        FlockParameters::min_separation_range(),
                    )
                    .text("Min Separation"),
                );
                ui.add(
                    egui::Slider::new(&mut params.max_speed, FlockParameters::max_speed_range())
                        .text("Max Speed"),
                );
            });

            ui.collapsing("Population", |ui| {
                ui.add(
                    egui::Slider::new(&mut controls.agent_count, FlockParameters::count_range())
                        .text("Count"),
                );

                if ui.button("Respawn Group").clicked() {
                    respawn_group = true;
                }
            });

            ui.collapsing("Appearance", |ui| {
                ui.add(egui::Slider::new(&mut params.size.x, FlockParameters::length_range()).text("Length"));
                ui.add(egui::Slider::new(&mut params.size.y, FlockParameters::width_range()).text("Width"));
                ui.add(egui::Slider::new(&mut params.color[0], 0.0..=1.0).text("R"));
                ui.add(egui::Slider::new(&mut params.color[1], 0.0..=1.0).text("G"));
                ui.add(egui::Slider::new(&mut params.color[2], 0.0..=1.0).text("B"));
            });

            ui.collapsing("Performance", |ui| {
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Ticks: {}", debug_info.ticks));
                ui.label(format!("Total Boids: {}", debug_info.total_boids));
            });

            ui.checkbox(&mut controls.show_debug, "Show Debug Info");
            ui.checkbox(&mut controls.pause_simulation, "Pause Simulation");
        });

    // Detect parameter changes
    let changes = controls.detect_changes(flock.params(group)?);

    Ok((changes, respawn_group))
}

// Draw debug information on the screen
pub fn draw_debug_info(
    draw: &nannou::Draw,
    debug_info: &DebugInfo,
    window_rect: nannou::geom::Rect,
    selected_group: &str,
) {
    // Create a background panel in the top-right corner
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 220.0;
    let panel_height = line_height * 4.0 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width + margin;
    let text_y = window_rect.top() - margin;

    let debug_texts = [
        format!("FPS: {:.1}", debug_info.fps),
        format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0),
        format!("Total Boids: {}", debug_info.total_boids),
        format!("Selected: {}", selected_group),
    ];

    for (i, text) in debug_texts.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);

        draw.text(text)
            .x_y(text_x + 70.0, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
