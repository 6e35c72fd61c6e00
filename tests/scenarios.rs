//! End-to-end scenarios driven through `Simulation::step`.

use approx::assert_relative_eq;
use collision_engine::collision::{Collider, CollisionDetector};
use collision_engine::{
    BodyHandle, BoundaryElement, Circle, GeometryDefect, Material, Participant, PhysicsError,
    Polygon, RigidBody, Simulation, SimulationConfig, Vec2,
};

const EPSILON: f64 = 1e-9;

fn unit_ball(position: Vec2, velocity: Vec2) -> RigidBody {
    RigidBody::new(1.0, Circle::new(1.0).unwrap())
        .unwrap()
        .with_position(position)
        .with_velocity(velocity)
}

#[test]
fn circle_bounces_off_boundary_with_full_restitution() {
    let mut sim = Simulation::default();
    sim.add_boundary(BoundaryElement::new(20.0).unwrap());
    let ball = sim.add_body(unit_ball(Vec2::new(0.0, 0.95), Vec2::new(0.0, -5.0)));

    sim.step(0.001).unwrap();

    let body = sim.body(ball).unwrap();
    assert_relative_eq!(body.linear_velocity.x, 0.0, epsilon = EPSILON);
    assert_relative_eq!(body.linear_velocity.y, 5.0, epsilon = EPSILON);
    assert_eq!(sim.contacts().len(), 1);
    assert_eq!(sim.contacts()[0].first(), Participant::Boundary(0));
}

#[test]
fn body_sunk_behind_boundary_climbs_back_out() {
    let mut sim = Simulation::default();
    sim.add_boundary(BoundaryElement::new(20.0).unwrap());
    let block = sim.add_body(
        RigidBody::new(1.0, Polygon::rectangle(2.0, 2.0).unwrap())
            .unwrap()
            .with_position(Vec2::new(0.0, -0.5))
            .with_velocity(Vec2::new(0.0, -1.0)),
    );

    sim.step(0.001).unwrap();
    assert_relative_eq!(sim.contacts()[0].normal().y, 1.0, epsilon = EPSILON);
    assert!(sim.body(block).unwrap().linear_velocity.y > 0.0);

    for _ in 0..100 {
        sim.step(0.001).unwrap();
    }
    assert!(sim.body(block).unwrap().position.y > -0.5);
}

#[test]
fn equal_circles_swap_velocities_head_on() {
    let mut sim = Simulation::default();
    let a = sim.add_body(unit_ball(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0)));
    let b = sim.add_body(unit_ball(Vec2::new(1.95, 0.0), Vec2::new(-5.0, 0.0)));

    sim.step(0.001).unwrap();

    let va = sim.body(a).unwrap().linear_velocity;
    let vb = sim.body(b).unwrap().linear_velocity;
    assert_relative_eq!(va.x, -5.0, epsilon = EPSILON);
    assert_relative_eq!(vb.x, 5.0, epsilon = EPSILON);
    assert_relative_eq!(va.y, 0.0, epsilon = EPSILON);
    assert_relative_eq!(vb.y, 0.0, epsilon = EPSILON);
}

#[test]
fn polygon_with_repeated_vertex_is_rejected() {
    let result = Polygon::new(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 0.0),
    ]);
    match result {
        Err(PhysicsError::DegenerateGeometry {
            defect: GeometryDefect::ZeroLengthEdge { index },
        }) => assert_eq!(index, 1),
        other => panic!("expected a zero-length edge, got {other:?}"),
    }
}

#[test]
fn negative_timestep_leaves_state_unchanged() {
    let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -9.81)));
    let a = sim.add_body(unit_ball(Vec2::new(1.0, 2.0), Vec2::new(3.0, 0.0)));
    let b = sim.add_body(unit_ball(Vec2::new(1.5, 2.0), Vec2::ZERO));
    let before: Vec<RigidBody> = sim.bodies().map(|(_, body)| body.clone()).collect();

    let err = sim.step(-1.0).unwrap_err();
    assert_eq!(err, PhysicsError::InvalidTimestep { dt: -1.0 });

    assert_eq!(sim.body(a).unwrap().position, Vec2::new(1.0, 2.0));
    assert_eq!(sim.body(b).unwrap().position, Vec2::new(1.5, 2.0));
    let after: Vec<RigidBody> = sim.bodies().map(|(_, body)| body.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(sim.time(), 0.0);
}

#[test]
fn resting_polygon_gets_no_friction_impulse() {
    let rough = Material::new(0.0, 0.5);
    let mut floor = BoundaryElement::new(10.0).unwrap().with_material(rough);
    let mut block = RigidBody::new(1.0, Polygon::rectangle(2.0, 1.0).unwrap())
        .unwrap()
        .with_position(Vec2::new(0.0, 0.49))
        .with_velocity(Vec2::new(0.0, -0.2))
        .with_material(rough);

    let handle = BodyHandle::from_index(0);

    let detector = CollisionDetector::default();
    let event = detector
        .generate_collision_event(&Collider::boundary(0, &floor), &Collider::body(handle, &block))
        .unwrap();
    let impulse = detector.resolve(&event, &mut floor, &mut block).unwrap();

    assert!(impulse.normal_impulse > 0.0);
    assert_eq!(impulse.tangent_impulse, 0.0);
    assert_eq!(block.linear_velocity.x, 0.0);
    assert_eq!(block.angular_velocity, 0.0);
}

#[test]
fn resting_polygon_stays_put_under_gravity() {
    let rough = Material::new(0.0, 0.5);
    let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -10.0)));
    sim.add_boundary(BoundaryElement::new(10.0).unwrap().with_material(rough));
    let block = sim.add_body(
        RigidBody::new(1.0, Polygon::rectangle(2.0, 1.0).unwrap())
            .unwrap()
            .with_position(Vec2::new(0.0, 0.5))
            .with_material(rough),
    );
    for _ in 0..120 {
        sim.step(1.0 / 60.0).unwrap();
    }
    let body = sim.body(block).unwrap();
    assert_eq!(body.position.x, 0.0);
    assert_eq!(body.linear_velocity.x, 0.0);
}

fn pile() -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -9.81)));
    sim.add_boundary(BoundaryElement::between(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)).unwrap());
    sim.add_boundary(BoundaryElement::between(Vec2::new(-6.0, 10.0), Vec2::new(-6.0, 0.0)).unwrap());
    sim.add_boundary(BoundaryElement::between(Vec2::new(6.0, 0.0), Vec2::new(6.0, 10.0)).unwrap());
    for i in 0..12 {
        let x = -4.0 + (i % 4) as f64 * 2.2 + (i / 4) as f64 * 0.3;
        let y = 1.5 + (i / 4) as f64 * 2.1;
        let body = if i % 2 == 0 {
            RigidBody::new(1.0, Circle::new(0.8).unwrap()).unwrap()
        } else {
            RigidBody::new(2.0, Polygon::regular(5, 0.9).unwrap())
                .unwrap()
                .with_rotation(0.1 * i as f64)
        };
        sim.add_body(
            body.with_position(Vec2::new(x, y))
                .with_material(Material::new(0.4, 0.3)),
        );
    }
    sim
}

#[test]
fn identical_runs_produce_identical_trajectories() {
    let mut first = pile();
    let mut second = pile();
    for _ in 0..240 {
        first.step(1.0 / 60.0).unwrap();
        second.step(1.0 / 60.0).unwrap();
        assert_eq!(first.contacts(), second.contacts());
    }
    let a: Vec<RigidBody> = first.bodies().map(|(_, body)| body.clone()).collect();
    let b: Vec<RigidBody> = second.bodies().map(|(_, body)| body.clone()).collect();
    assert_eq!(a, b);
}

#[test]
fn pile_settles_inside_walls() {
    let mut sim = pile();
    for _ in 0..600 {
        sim.step(1.0 / 60.0).unwrap();
    }
    for (handle, body) in sim.bodies() {
        assert!(body.position.y > 0.0, "{handle} fell through the floor");
        assert!(body.position.x.abs() < 6.0, "{handle} escaped the walls");
        assert!(body.position.is_finite());
    }
}

#[test]
fn contacts_follow_documented_pair_order() {
    let mut sim = Simulation::default();
    sim.add_boundary(BoundaryElement::new(20.0).unwrap());
    let a = sim.add_body(unit_ball(Vec2::new(0.0, 0.9), Vec2::ZERO));
    let b = sim.add_body(unit_ball(Vec2::new(1.9, 0.9), Vec2::ZERO));

    sim.step(0.001).unwrap();

    let pairs: Vec<_> = sim.contacts().iter().map(|e| e.participants()).collect();
    assert_eq!(
        pairs,
        vec![
            (Participant::Boundary(0), Participant::Body(a)),
            (Participant::Body(a), Participant::Body(b)),
            (Participant::Boundary(0), Participant::Body(b)),
        ]
    );
}
