/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct shown in the control panel and
 * the per-group summaries logged by the headless runner.
 *
 * Includes metrics for:
 * - FPS (frames per second)
 * - Frame time
 * - Ticks simulated so far
 * - Boid count, mean speed and centroid of each group
 */

use std::time::Duration;

use crate::flock::Flock;
use crate::geometry::Vector2;

// Debug information to display
#[derive(Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub ticks: u64,
    pub total_boids: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub count: usize,
    pub mean_speed: f32,
    pub centroid: Vector2,
}

pub fn summarize(flock: &Flock) -> Vec<GroupSummary> {
    flock
        .groups()
        .iter()
        .map(|group| {
            let count = group.len();
            let (speed_sum, position_sum) = group
                .boids()
                .iter()
                .fold((0.0, Vector2::ZERO), |(speed, pos), boid| {
                    (speed + boid.velocity.length(), pos + boid.position)
                });

            // Empty groups report zeros rather than NaN
            let n = count.max(1) as f32;

            GroupSummary {
                name: group.name().to_owned(),
                count,
                mean_speed: speed_sum / n,
                centroid: position_sum / n,
            }
        })
        .collect()
}
