/*
 * Flock Module
 *
 * This module owns every boid in the simulation. Boids are kept in named
 * groups, each with its own FlockParameters, and the flock drives the
 * per-frame update:
 * - Neighbor discovery is an exhaustive scan over all groups
 * - Each boid then coheres, separates and aligns with what it found
 * - Boundary repulsion, the speed cap and integration come last
 *
 * Boids never hold references to each other. Neighbors are copied into a
 * scratch list that is rebuilt for every single query.
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::boid::{Boid, Neighbor};
use crate::geometry::{Boundary, Vector2};
use crate::params::FlockParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);

/// Identity of a boid: its group and its slot within that group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoidId {
    pub group: GroupId,
    pub index: usize,
}

impl BoidId {
    pub fn new(group: usize, index: usize) -> Self {
        Self {
            group: GroupId(group),
            index,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlockError {
    #[error("unknown boid group {0:?}")]
    UnknownGroup(GroupId),
    #[error("no boid at {0:?}")]
    UnknownBoid(BoidId),
}

/// How a tick sees the state of the other boids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Boids are updated in place, one after the other, so later boids see
    /// the already moved state of earlier ones.
    #[default]
    Sequential,
    /// Every boid sees the flock as it was when the tick started.
    DoubleBuffered,
}

#[derive(Debug, Clone)]
pub struct BoidGroup {
    name: String,
    params: FlockParameters,
    boids: Vec<Boid>,
}

impl BoidGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &FlockParameters {
        &self.params
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }
}

pub struct Flock {
    groups: Vec<BoidGroup>,
    boundary: Boundary,
    update_mode: UpdateMode,
    // Neighbors of the boid currently being updated
    near_boids: Vec<Neighbor>,
    // Tick-start copy of every group, only used when double buffering
    front: Vec<Vec<Boid>>,
    non_finite_reported: usize,
    rng: StdRng,
}

impl Flock {
    pub fn new(boundary: Boundary) -> Self {
        Self::with_rng(boundary, StdRng::from_entropy())
    }

    pub fn with_seed(boundary: Boundary, seed: u64) -> Self {
        Self::with_rng(boundary, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(boundary: Boundary, rng: StdRng) -> Self {
        Self {
            groups: Vec::new(),
            boundary,
            update_mode: UpdateMode::default(),
            near_boids: Vec::new(),
            front: Vec::new(),
            non_finite_reported: 0,
            rng,
        }
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.update_mode
    }

    pub fn set_update_mode(&mut self, mode: UpdateMode) {
        self.update_mode = mode;
    }

    // Add a group with default parameters
    pub fn add_group(&mut self, name: impl Into<String>, count: usize) -> GroupId {
        self.add_group_with(name, count, FlockParameters::default())
    }

    pub fn add_group_with(
        &mut self,
        name: impl Into<String>,
        count: usize,
        params: FlockParameters,
    ) -> GroupId {
        let id = GroupId(self.groups.len());
        let name = name.into();
        info!(group = id.0, name = %name, count, "adding boid group");

        self.groups.push(BoidGroup {
            name,
            params,
            boids: Vec::with_capacity(count),
        });
        self.spawn_into(id.0, count);

        id
    }

    pub fn groups(&self) -> &[BoidGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Result<&BoidGroup, FlockError> {
        self.groups.get(id.0).ok_or(FlockError::UnknownGroup(id))
    }

    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.groups.iter().position(|g| g.name == name).map(GroupId)
    }

    pub fn params(&self, id: GroupId) -> Result<&FlockParameters, FlockError> {
        self.group(id).map(|g| &g.params)
    }

    // Parameters may be changed freely between ticks
    pub fn params_mut(&mut self, id: GroupId) -> Result<&mut FlockParameters, FlockError> {
        self.groups
            .get_mut(id.0)
            .map(|g| &mut g.params)
            .ok_or(FlockError::UnknownGroup(id))
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    // Flock wide repel force, written into every group
    pub fn set_boundary_repel(&mut self, repel: Vector2) {
        for group in &mut self.groups {
            group.params.boundary_repel = repel;
        }
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(BoidGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(BoidGroup::is_empty)
    }

    pub fn boid(&self, id: BoidId) -> Option<&Boid> {
        self.groups.get(id.group.0)?.boids.get(id.index)
    }

    pub fn boid_mut(&mut self, id: BoidId) -> Option<&mut Boid> {
        self.groups.get_mut(id.group.0)?.boids.get_mut(id.index)
    }

    // All boids in update order
    pub fn iter(&self) -> impl Iterator<Item = (BoidId, &Boid)> + '_ {
        self.groups.iter().enumerate().flat_map(|(g, group)| {
            group
                .boids
                .iter()
                .enumerate()
                .map(move |(i, boid)| (BoidId::new(g, i), boid))
        })
    }

    /// Append a boid with a known state, bypassing random placement.
    pub fn push_boid(&mut self, id: GroupId, boid: Boid) -> Result<BoidId, FlockError> {
        let group = self
            .groups
            .get_mut(id.0)
            .ok_or(FlockError::UnknownGroup(id))?;
        group.boids.push(boid);

        Ok(BoidId {
            group: id,
            index: group.boids.len() - 1,
        })
    }

    pub fn add_agents(&mut self, id: GroupId, count: usize) -> Result<(), FlockError> {
        let current = self.group(id)?.len();
        self.set_agent_count(id, current + count)
    }

    /// Grow or shrink a group. New boids are placed at random inside the
    /// boundary; shrinking drops boids from the end. Boids that stay are
    /// left untouched.
    pub fn set_agent_count(&mut self, id: GroupId, count: usize) -> Result<(), FlockError> {
        let old_count = self.group(id)?.len();
        if count == old_count {
            return Ok(());
        }

        debug!(group = id.0, old_count, count, "resizing boid group");
        self.near_boids.clear();

        if count < old_count {
            self.groups[id.0].boids.truncate(count);
        } else {
            self.spawn_into(id.0, count - old_count);
        }

        Ok(())
    }

    fn spawn_into(&mut self, group: usize, count: usize) {
        let boundary = self.boundary;
        let max_speed = self.groups[group].params.max_speed;
        let rng = &mut self.rng;

        self.groups[group]
            .boids
            .extend((0..count).map(|_| random_boid(&mut *rng, &boundary, max_speed)));
    }

    /// Every other boid, in any group, within the view distance of the
    /// querying boid's group. Ordered by group, then by slot.
    pub fn find_neighbors(&self, id: BoidId) -> Result<Vec<BoidId>, FlockError> {
        let group = self.group(id.group)?;
        let boid = self.boid(id).ok_or(FlockError::UnknownBoid(id))?;

        let mut found = Vec::new();
        scan_neighbors(
            self.groups.iter().map(|g| g.boids.as_slice()),
            id,
            boid.position,
            group.params.view_distance,
            |other, _| found.push(other),
        );

        Ok(found)
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        match self.update_mode {
            UpdateMode::Sequential => self.tick_sequential(dt),
            UpdateMode::DoubleBuffered => self.tick_double_buffered(dt),
        }

        self.report_non_finite();
    }

    fn tick_sequential(&mut self, dt: f32) {
        for g in 0..self.groups.len() {
            let params = self.groups[g].params;

            for i in 0..self.groups[g].boids.len() {
                let id = BoidId::new(g, i);
                let mut boid = self.groups[g].boids[i];

                gather_neighbors(
                    self.groups.iter().map(|group| group.boids.as_slice()),
                    id,
                    boid.position,
                    &params,
                    &mut self.near_boids,
                );
                step(&mut boid, &params, &self.boundary, &self.near_boids, dt);

                self.groups[g].boids[i] = boid;
            }
        }
    }

    fn tick_double_buffered(&mut self, dt: f32) {
        self.front.resize_with(self.groups.len(), Vec::new);
        for (front, group) in self.front.iter_mut().zip(&self.groups) {
            front.clear();
            front.extend_from_slice(&group.boids);
        }

        for (g, group) in self.groups.iter_mut().enumerate() {
            let params = group.params;

            for (i, boid) in group.boids.iter_mut().enumerate() {
                gather_neighbors(
                    self.front.iter().map(Vec::as_slice),
                    BoidId::new(g, i),
                    boid.position,
                    &params,
                    &mut self.near_boids,
                );
                step(boid, &params, &self.boundary, &self.near_boids, dt);
            }
        }
    }

    // Degenerate parameters can push boids to NaN/Inf; say so once per new casualty
    fn report_non_finite(&mut self) {
        let non_finite = self
            .iter()
            .filter(|(_, b)| !(b.position.is_finite() && b.velocity.is_finite()))
            .count();

        if non_finite > self.non_finite_reported {
            warn!(non_finite, total = self.len(), "boids left the finite plane");
        }
        self.non_finite_reported = non_finite;
    }
}

// One full rule pass for a single boid; the order here is load bearing
fn step(
    boid: &mut Boid,
    params: &FlockParameters,
    boundary: &Boundary,
    neighbors: &[Neighbor],
    dt: f32,
) {
    boid.cohere(params.cohesion, neighbors);
    boid.separate(params.separation, params.min_separation_distance, neighbors);
    boid.align(params.alignment, neighbors);
    boid.constrain_bounds(boundary, params.boundary_repel);
    boid.constrain_speed(params.max_speed);
    boid.integrate(dt);
}

// Exhaustive O(n) scan; `origin` is excluded by identity, not by position
fn scan_neighbors<'a>(
    populations: impl Iterator<Item = &'a [Boid]>,
    origin: BoidId,
    position: Vector2,
    view_distance: f32,
    mut visit: impl FnMut(BoidId, &Boid),
) {
    let view_distance2 = view_distance * view_distance;

    for (g, boids) in populations.enumerate() {
        for (i, other) in boids.iter().enumerate() {
            let id = BoidId::new(g, i);
            if id == origin {
                continue;
            }

            if (position - other.position).length2() <= view_distance2 {
                visit(id, other);
            }
        }
    }
}

fn gather_neighbors<'a>(
    populations: impl Iterator<Item = &'a [Boid]>,
    origin: BoidId,
    position: Vector2,
    params: &FlockParameters,
    out: &mut Vec<Neighbor>,
) {
    out.clear();
    scan_neighbors(populations, origin, position, params.view_distance, |id, other| {
        let weight = if id.group == origin.group {
            1.0
        } else {
            params.friendliness
        };
        out.push(Neighbor::of(other, weight));
    });
}

fn random_boid(rng: &mut impl Rng, boundary: &Boundary, max_speed: f32) -> Boid {
    let position = Vector2::new(
        boundary.min.x + rng.gen::<f32>() * boundary.width(),
        boundary.min.y + rng.gen::<f32>() * boundary.height(),
    );

    let heading = rng.gen_range(0.0..TAU);
    let speed = rng.gen_range(0.5..=1.0) * max_speed;
    let velocity = Vector2::new(heading.cos(), heading.sin()) * speed;

    Boid::new(position, velocity)
}
