use schools::{Boid, BoidId, Boundary, Flock, FlockParameters, GroupId, UpdateMode, Vector2};

const EPS: f32 = 1e-4;

fn cohesion_only() -> FlockParameters {
    FlockParameters {
        cohesion: 1.0,
        separation: 0.0,
        alignment: 0.0,
        view_distance: 20.0,
        max_speed: 1000.0,
        ..FlockParameters::default()
    }
}

fn open_water() -> Boundary {
    Boundary::new(Vector2::new(-100.0, -100.0), Vector2::new(100.0, 100.0))
}

fn still(x: f32, y: f32) -> Boid {
    Boid::new(Vector2::new(x, y), Vector2::ZERO)
}

fn pair(params: FlockParameters, mode: UpdateMode) -> Flock {
    let mut flock = Flock::with_seed(open_water(), 11);
    flock.set_update_mode(mode);
    let group = flock.add_group_with("pair", 0, params);
    flock.push_boid(group, still(0.0, 0.0)).unwrap();
    flock.push_boid(group, still(10.0, 0.0)).unwrap();
    flock
}

fn velocity(flock: &Flock, group: usize, index: usize) -> Vector2 {
    flock.boid(BoidId::new(group, index)).unwrap().velocity()
}

#[test]
fn two_boids_pull_towards_each_other() {
    let mut flock = pair(cohesion_only(), UpdateMode::Sequential);
    flock.tick(0.0);

    assert_eq!(velocity(&flock, 0, 0), Vector2::new(10.0, 0.0));
    assert_eq!(velocity(&flock, 0, 1), Vector2::new(-10.0, 0.0));
}

#[test]
fn sequential_ticks_see_already_moved_boids() {
    let mut flock = pair(cohesion_only(), UpdateMode::Sequential);
    flock.tick(0.5);

    // The first boid has already moved to (5, 0) when the second looks around
    assert_eq!(velocity(&flock, 0, 0), Vector2::new(10.0, 0.0));
    assert_eq!(velocity(&flock, 0, 1), Vector2::new(-5.0, 0.0));
}

#[test]
fn double_buffered_ticks_see_the_tick_start() {
    let mut flock = pair(cohesion_only(), UpdateMode::DoubleBuffered);
    flock.tick(0.5);

    assert_eq!(velocity(&flock, 0, 0), Vector2::new(10.0, 0.0));
    assert_eq!(velocity(&flock, 0, 1), Vector2::new(-10.0, 0.0));

    let positions: Vec<Vector2> = flock.iter().map(|(_, b)| b.position()).collect();
    assert_eq!(positions, [Vector2::new(5.0, 0.0), Vector2::new(5.0, 0.0)]);
}

#[test]
fn negative_cohesion_pushes_apart() {
    let params = FlockParameters {
        cohesion: -1.0,
        ..cohesion_only()
    };
    let mut flock = pair(params, UpdateMode::Sequential);
    flock.tick(0.0);

    assert_eq!(velocity(&flock, 0, 0), Vector2::new(-10.0, 0.0));
}

#[test]
fn corner_boid_is_repelled_back_inside() {
    let mut flock = Flock::with_seed(Boundary::from_size(100.0, 100.0), 0);
    let group = flock.add_group_with("lonely", 0, cohesion_only());
    flock.push_boid(group, still(0.0, 0.0)).unwrap();
    flock.set_boundary_repel(Vector2::new(5.0, 5.0));

    flock.tick(0.25);

    assert_eq!(velocity(&flock, 0, 0), Vector2::new(5.0, 5.0));
    assert_eq!(
        flock.boid(BoidId::new(0, 0)).unwrap().position(),
        Vector2::new(1.25, 1.25)
    );
}

#[test]
fn far_side_boid_is_repelled_back_inside() {
    let mut flock = Flock::with_seed(Boundary::from_size(100.0, 100.0), 0);
    let group = flock.add_group_with("stray", 0, cohesion_only());
    flock.push_boid(group, still(120.0, 50.0)).unwrap();
    flock.set_boundary_repel(Vector2::new(5.0, 5.0));

    flock.tick(0.0);

    assert_eq!(velocity(&flock, 0, 0), Vector2::new(-5.0, 0.0));
}

#[test]
fn friendliness_scales_other_schools() {
    let mut flock = Flock::with_seed(open_water(), 0);
    let shy = flock.add_group_with(
        "shy",
        0,
        FlockParameters {
            friendliness: 0.0,
            ..cohesion_only()
        },
    );
    let curious = flock.add_group_with(
        "curious",
        0,
        FlockParameters {
            friendliness: 0.5,
            ..cohesion_only()
        },
    );
    flock.push_boid(shy, still(0.0, 0.0)).unwrap();
    flock.push_boid(curious, still(10.0, 0.0)).unwrap();

    // Neighbor discovery still spans both schools
    assert_eq!(
        flock.find_neighbors(BoidId::new(0, 0)).unwrap(),
        vec![BoidId::new(1, 0)]
    );

    flock.tick(0.0);

    assert_eq!(velocity(&flock, 0, 0), Vector2::ZERO);
    assert!((velocity(&flock, 1, 0).x + 5.0).abs() < EPS);
}

#[test]
fn own_school_counts_in_full_next_to_strangers() {
    let mut flock = Flock::with_seed(open_water(), 0);
    let fish = flock.add_group_with(
        "fish",
        0,
        FlockParameters {
            friendliness: 0.0,
            alignment: 1.0,
            ..cohesion_only()
        },
    );
    let others = flock.add_group_with("others", 0, cohesion_only());
    flock.push_boid(fish, still(0.0, 0.0)).unwrap();
    flock
        .push_boid(fish, Boid::new(Vector2::new(0.0, 10.0), Vector2::new(0.0, 4.0)))
        .unwrap();
    flock
        .push_boid(others, Boid::new(Vector2::new(10.0, 0.0), Vector2::new(8.0, 0.0)))
        .unwrap();

    flock.tick(0.0);

    // Two neighbors, one ignored: half the pull of the school mate, and half its heading
    let v = velocity(&flock, 0, 0);
    assert!(v.x.abs() < EPS);
    assert!((v.y - (5.0 + 2.0)).abs() < EPS, "velocity {v:?}");
}

#[test]
fn speed_never_exceeds_max_after_a_tick() {
    let params = FlockParameters {
        max_speed: 50.0,
        ..FlockParameters::default()
    };
    let mut flock = Flock::with_seed(Boundary::from_size(400.0, 400.0), 21);
    flock.add_group_with("school", 150, params);

    for _ in 0..20 {
        flock.tick(1.0 / 60.0);
    }

    for (_, boid) in flock.iter() {
        assert!(boid.velocity().length() <= 50.0 + 1e-3);
    }
}

#[test]
fn seeded_flocks_replay_identically() {
    let build = || {
        let mut flock = Flock::with_seed(Boundary::from_size(300.0, 200.0), 99);
        flock.add_group("a", 40);
        flock.add_group("b", 40);
        flock
    };
    let mut first = build();
    let mut second = build();

    for _ in 0..30 {
        first.tick(1.0 / 30.0);
        second.tick(1.0 / 30.0);
    }

    let a: Vec<Boid> = first.iter().map(|(_, b)| *b).collect();
    let b: Vec<Boid> = second.iter().map(|(_, b)| *b).collect();
    assert_eq!(a, b);
}

#[test]
fn growing_a_school_leaves_existing_fish_alone() {
    let mut flock = Flock::with_seed(Boundary::from_size(640.0, 480.0), 5);
    let group = flock.add_group("school", 30);
    flock.tick(0.1);
    let before: Vec<Boid> = flock.group(group).unwrap().boids().to_vec();

    flock.set_agent_count(group, 90).unwrap();

    let boids = flock.group(group).unwrap().boids();
    assert_eq!(&boids[..30], &before[..]);
    let boundary = flock.boundary();
    assert!(boids[30..].iter().all(|b| boundary.contains(b.position())));
}

#[test]
fn parameter_edits_apply_on_the_next_tick() {
    let mut flock = pair(cohesion_only(), UpdateMode::Sequential);
    flock.params_mut(GroupId(0)).unwrap().cohesion = 0.5;
    flock.tick(0.0);

    assert_eq!(velocity(&flock, 0, 0), Vector2::new(5.0, 0.0));
}
