/*
 * Renderer Module
 *
 * This module handles the rendering of the simulation. Each boid is drawn
 * as a triangle pointing along its heading, sized and colored by its group.
 *
 * The simulation works in window pixels with the origin at the bottom-left
 * corner; nannou centers its origin, so everything is offset by half the
 * window before drawing.
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::flock::GroupId;
use crate::geometry::Vector2;
use crate::ui;

// Unit triangle, nose along +x
const TRIANGLE: [(f32, f32); 3] = [(0.66, 0.0), (-0.33, 0.94), (-0.33, -0.94)];

// Triangle scaled by a group's (length, width)
pub fn triangle_points(size: Vector2) -> [Point2; 3] {
    TRIANGLE.map(|(x, y)| pt2(x * size.x, y * size.y))
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();

    let [r, g, b] = model.background;
    draw.background().color(rgb(r, g, b));

    let window_rect = app.window_rect();
    let origin = vec2(window_rect.left(), window_rect.bottom());

    for group in model.flock.groups() {
        let params = group.params();
        let [r, g, b, a] = params.color;
        let color = rgba(r, g, b, a);
        let points = triangle_points(params.size);

        for boid in group.boids() {
            draw.polygon()
                .color(color)
                .points(points)
                .xy(origin + Vec2::from(boid.position()))
                .rotate(boid.angle_deg().to_radians());
        }
    }

    if model.controls.show_debug {
        draw_selection_debug(&draw, model, origin);

        let selected = model
            .flock
            .group(GroupId(model.controls.selected_group))
            .map(|g| g.name())
            .unwrap_or("-");
        ui::draw_debug_info(&draw, &model.debug_info, window_rect, selected);
    }

    draw.to_frame(app, &frame).unwrap();

    // Draw the egui UI
    model.egui.draw_to_frame(&frame).unwrap();
}

// View radius, separation radius and velocity of the selected group's first boid
fn draw_selection_debug(draw: &Draw, model: &Model, origin: Vec2) {
    let Ok(group) = model.flock.group(GroupId(model.controls.selected_group)) else {
        return;
    };
    let Some(boid) = group.boids().first() else {
        return;
    };

    let params = group.params();
    let position = origin + Vec2::from(boid.position());

    draw.ellipse()
        .xy(position)
        .radius(params.view_distance)
        .no_fill()
        .stroke(GREEN)
        .stroke_weight(1.0);

    draw.ellipse()
        .xy(position)
        .radius(params.min_separation_distance)
        .no_fill()
        .stroke(RED)
        .stroke_weight(1.0);

    draw.arrow()
        .start(position)
        .end(position + Vec2::from(boid.velocity()) * 0.5)
        .color(YELLOW)
        .stroke_weight(2.0);
}
