/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each tick a boid has its velocity nudged by three local rules:
 * 1. Cohesion: Steer towards the average position of neighbors
 * 2. Separation: Push away from neighbors, harder the closer they are
 * 3. Alignment: Steer along the average heading of neighbors
 * and is then pushed back towards the boundary, speed limited and moved.
 */

use crate::geometry::{Boundary, Vector2};

/// Snapshot of a nearby boid, as handed to the steering rules.
///
/// `weight` is 1.0 for members of the querying boid's own group and the
/// group's friendliness for everyone else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: Vector2,
    pub velocity: Vector2,
    pub weight: f32,
}

impl Neighbor {
    pub fn of(boid: &Boid, weight: f32) -> Self {
        Self {
            position: boid.position,
            velocity: boid.velocity,
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Boid {
    pub position: Vector2,
    pub velocity: Vector2,
}

impl Boid {
    pub fn new(position: Vector2, velocity: Vector2) -> Self {
        Self { position, velocity }
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    // Unit heading; a stopped boid has none
    pub fn direction(&self) -> Vector2 {
        self.velocity.normalize_or_zero()
    }

    // Heading in degrees, counter-clockwise from +x
    pub fn angle_deg(&self) -> f32 {
        self.velocity.angle_deg(Vector2::X)
    }

    /// Steer towards the (friendliness weighted) center of the neighbors.
    pub fn cohere(&mut self, cohesion: f32, neighbors: &[Neighbor]) {
        if neighbors.is_empty() {
            return;
        }

        let mut center = Vector2::ZERO;
        let mut total_weight = 0.0;

        for neighbor in neighbors {
            center += neighbor.position * neighbor.weight;
            total_weight += neighbor.weight;
        }

        // Nobody here we care about
        if total_weight == 0.0 {
            return;
        }

        center /= total_weight;
        let pull = (center - self.position) * (total_weight / neighbors.len() as f32);

        self.velocity += pull * cohesion;
    }

    /// Push away from every neighbor, scaled so that a neighbor exactly
    /// `min_separation_distance` away contributes its offset unchanged.
    pub fn separate(&mut self, separation: f32, min_separation_distance: f32, neighbors: &[Neighbor]) {
        if neighbors.is_empty() {
            return;
        }

        let min_distance2 = min_separation_distance * min_separation_distance;
        let mut push = Vector2::ZERO;

        for neighbor in neighbors {
            let offset = self.position - neighbor.position;
            let distance2 = offset.length2();

            // Coincident boids have no direction to push along
            if distance2 == 0.0 {
                continue;
            }

            push += offset / (distance2 / min_distance2) * neighbor.weight;
        }

        self.velocity += push * separation;
    }

    /// Add the neighbors' average velocity.
    pub fn align(&mut self, alignment: f32, neighbors: &[Neighbor]) {
        if neighbors.is_empty() {
            return;
        }

        let mut heading = Vector2::ZERO;

        for neighbor in neighbors {
            heading += neighbor.velocity * neighbor.weight;
        }

        heading /= neighbors.len() as f32;

        self.velocity += heading * alignment;
    }

    // Nudge back towards the boundary; this does not clamp the position
    pub fn constrain_bounds(&mut self, bounds: &Boundary, repel: Vector2) {
        if self.position.x <= bounds.min.x {
            self.velocity.x += repel.x;
        } else if self.position.x >= bounds.max.x {
            self.velocity.x -= repel.x;
        }

        if self.position.y <= bounds.min.y {
            self.velocity.y += repel.y;
        } else if self.position.y >= bounds.max.y {
            self.velocity.y -= repel.y;
        }
    }

    pub fn constrain_speed(&mut self, max_speed: f32) {
        if self.velocity.length2() >= max_speed * max_speed {
            self.velocity = self.velocity.normalize() * max_speed;
        }
    }

    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn at(x: f32, y: f32) -> Neighbor {
        Neighbor {
            position: Vector2::new(x, y),
            velocity: Vector2::ZERO,
            weight: 1.0,
        }
    }

    fn moving(vx: f32, vy: f32) -> Neighbor {
        Neighbor {
            position: Vector2::ZERO,
            velocity: Vector2::new(vx, vy),
            weight: 1.0,
        }
    }

    #[test]
    fn rules_ignore_empty_neighborhoods() {
        let start = Boid::new(Vector2::new(3.0, 4.0), Vector2::new(-1.0, 2.0));
        let mut boid = start;

        boid.cohere(1.0, &[]);
        boid.separate(1.0, 15.0, &[]);
        boid.align(1.0, &[]);

        assert_eq!(boid, start);
    }

    #[test]
    fn cohere_pulls_towards_the_mean_position() {
        let mut boid = Boid::new(Vector2::ZERO, Vector2::ZERO);
        boid.cohere(0.5, &[at(10.0, 0.0), at(0.0, 10.0)]);

        assert_eq!(boid.velocity, Vector2::new(2.5, 2.5));
    }

    #[test]
    fn cohere_scales_foreign_neighbors_by_weight() {
        let mut boid = Boid::new(Vector2::ZERO, Vector2::ZERO);
        let mut foreign = at(10.0, 0.0);
        foreign.weight = 0.5;

        boid.cohere(1.0, &[foreign]);
        assert!((boid.velocity.x - 5.0).abs() < EPS);

        // A friendliness of zero means the foreigner is not pulled towards at all
        foreign.weight = 0.0;
        let mut boid = Boid::new(Vector2::ZERO, Vector2::ZERO);
        boid.cohere(1.0, &[foreign]);
        assert_eq!(boid.velocity, Vector2::ZERO);
    }

    #[test]
    fn separate_is_unit_scaled_at_min_distance() {
        let mut boid = Boid::new(Vector2::ZERO, Vector2::ZERO);
        boid.separate(1.0, 15.0, &[at(15.0, 0.0)]);

        assert!((boid.velocity.x + 15.0).abs() < EPS);
        assert_eq!(boid.velocity.y, 0.0);
    }

    #[test]
    fn separate_grows_as_neighbors_close_in() {
        let mut near = Boid::new(Vector2::ZERO, Vector2::ZERO);
        let mut far = near;
        near.separate(1.0, 15.0, &[at(5.0, 0.0)]);
        far.separate(1.0, 15.0, &[at(30.0, 0.0)]);

        assert!(near.velocity.x.abs() > far.velocity.x.abs());
        assert!((near.velocity.x + 45.0).abs() < EPS);
        assert!((far.velocity.x + 7.5).abs() < EPS);
    }

    #[test]
    fn separate_skips_coincident_neighbors() {
        let mut boid = Boid::new(Vector2::new(1.0, 1.0), Vector2::new(2.0, 0.0));
        boid.separate(1.0, 15.0, &[at(1.0, 1.0)]);

        assert_eq!(boid.velocity, Vector2::new(2.0, 0.0));
    }

    #[test]
    fn align_adds_the_mean_heading_not_the_difference() {
        let mut boid = Boid::new(Vector2::ZERO, Vector2::new(1.0, 0.0));
        boid.align(0.5, &[moving(4.0, 0.0), moving(0.0, 4.0)]);

        assert_eq!(boid.velocity, Vector2::new(2.0, 1.0));
    }

    #[test]
    fn bounds_nudge_per_axis() {
        let bounds = Boundary::from_size(100.0, 100.0);
        let repel = Vector2::new(5.0, 7.0);

        let mut at_min = Boid::new(Vector2::ZERO, Vector2::ZERO);
        at_min.constrain_bounds(&bounds, repel);
        assert_eq!(at_min.velocity, Vector2::new(5.0, 7.0));

        let mut at_max = Boid::new(Vector2::new(100.0, 100.0), Vector2::ZERO);
        at_max.constrain_bounds(&bounds, repel);
        assert_eq!(at_max.velocity, Vector2::new(-5.0, -7.0));

        let mut mixed = Boid::new(Vector2::new(-3.0, 50.0), Vector2::new(1.0, 1.0));
        mixed.constrain_bounds(&bounds, repel);
        assert_eq!(mixed.velocity, Vector2::new(6.0, 1.0));

        let mut inside = Boid::new(Vector2::new(50.0, 50.0), Vector2::new(1.0, 1.0));
        inside.constrain_bounds(&bounds, repel);
        assert_eq!(inside.velocity, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn speed_is_capped_exactly() {
        let mut boid = Boid::new(Vector2::ZERO, Vector2::new(30.0, 40.0));
        boid.constrain_speed(10.0);

        assert!((boid.velocity.length() - 10.0).abs() < EPS);
        assert!((boid.velocity.x - 6.0).abs() < EPS);
        assert!((boid.velocity.y - 8.0).abs() < EPS);

        let mut slow = Boid::new(Vector2::ZERO, Vector2::new(1.0, 1.0));
        slow.constrain_speed(10.0);
        assert_eq!(slow.velocity, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn integrate_moves_by_velocity_times_dt() {
        let mut boid = Boid::new(Vector2::new(1.0, 2.0), Vector2::new(10.0, -4.0));
        boid.integrate(0.0);
        assert_eq!(boid.position, Vector2::new(1.0, 2.0));

        boid.integrate(0.5);
        assert_eq!(boid.position, Vector2::new(6.0, 0.0));
    }

    #[test]
    fn heading_accessors() {
        let boid = Boid::new(Vector2::ZERO, Vector2::new(0.0, 3.0));
        assert_eq!(boid.direction(), Vector2::new(0.0, 1.0));
        assert!((boid.angle_deg() - 90.0).abs() < EPS);

        let stopped = Boid::default();
        assert_eq!(stopped.direction(), Vector2::ZERO);
        assert_eq!(stopped.angle_deg(), 0.0);
    }
}
