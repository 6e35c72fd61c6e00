//! Headless host loop for `collision_engine`.
//!
//! Run with `cargo run -p collision_demo -- <scene>` where scene is one of
//! `ball_pit`, `cradle` or `player`. Set `RUST_LOG=collision_engine=debug`
//! to see per-step output from the engine itself.

use std::env;

use collision_engine::{
    BodyHandle, BoundaryElement, Circle, ControlInput, Material, PhysicsResult, PlayerController,
    Polygon, RigidBody, Simulation, SimulationConfig, Vec2,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DT: f64 = 1.0 / 60.0;

fn main() -> PhysicsResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let scene = env::args().nth(1).unwrap_or_else(|| "ball_pit".to_string());
    info!(%scene, "running scene");

    match scene.as_str() {
        "ball_pit" => run_ball_pit(),
        "cradle" => run_cradle(),
        "player" => run_player(),
        other => {
            warn!(scene = other, "unknown scene, expected ball_pit, cradle or player");
            Ok(())
        }
    }
}

/// Floor and two walls enclosing an open box `width` wide.
fn add_pit(sim: &mut Simulation, width: f64, height: f64, material: Material) -> PhysicsResult<()> {
    let corners = [
        (Vec2::new(0.0, 0.0), Vec2::new(width, 0.0)),
        (Vec2::new(width, 0.0), Vec2::new(width, height)),
        (Vec2::new(0.0, height), Vec2::new(0.0, 0.0)),
    ];
    for (start, end) in corners {
        sim.add_boundary(BoundaryElement::between(start, end)?.with_material(material));
    }
    Ok(())
}

fn log_bodies(sim: &Simulation, frame: usize) {
    for (handle, body) in sim.bodies() {
        info!(
            frame,
            body = %handle,
            x = body.position.x,
            y = body.position.y,
            angle = body.rotation,
        );
    }
}

fn run_ball_pit() -> PhysicsResult<()> {
    let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -9.81)));
    add_pit(&mut sim, 10.0, 8.0, Material::new(0.2, 0.3))?;

    for i in 0..20 {
        let x = 1.0 + (i % 8) as f64 * 1.1;
        let y = 2.0 + (i / 8) as f64 * 1.5;
        let body = if i % 3 == 0 {
            RigidBody::new(2.0, Polygon::regular(3 + i % 4, 0.45)?)?.with_rotation(i as f64 * 0.3)
        } else {
            RigidBody::new(1.0, Circle::new(0.2 + (i % 4) as f64 * 0.1)?)?
        };
        sim.add_body(
            body.with_position(Vec2::new(x, y))
                .with_material(Material::new(0.6, 0.2)),
        );
    }

    info!(bodies = sim.body_count(), "ball pit ready");
    for frame in 0..300 {
        sim.step(DT)?;
        if frame % 60 == 0 {
            info!(frame, contacts = sim.contacts().len(), time = sim.time());
        }
    }
    log_bodies(&sim, 300);
    Ok(())
}

fn run_cradle() -> PhysicsResult<()> {
    let mut sim = Simulation::default();
    let radius = 0.5;
    let balls: Vec<BodyHandle> = (0..5)
        .map(|i| -> PhysicsResult<BodyHandle> {
            let ball = RigidBody::new(1.0, Circle::new(radius)?)?
                .with_position(Vec2::new(i as f64 * 2.0 * radius, 0.0))
                .with_material(Material::ELASTIC);
            Ok(sim.add_body(ball))
        })
        .collect::<PhysicsResult<_>>()?;

    // Striker approaches the row from the left
    let striker = RigidBody::new(1.0, Circle::new(radius)?)?
        .with_position(Vec2::new(-3.0, 0.0))
        .with_velocity(Vec2::new(4.0, 0.0))
        .with_material(Material::ELASTIC);
    let striker = sim.add_body(striker);

    for frame in 0..180 {
        sim.step(DT)?;
        if frame % 30 == 0 {
            let moving: Vec<String> = balls
                .iter()
                .chain(std::iter::once(&striker))
                .filter_map(|&h| sim.body(h).ok().map(|b| (h, b)))
                .filter(|(_, b)| b.linear_velocity.magnitude() > 1e-3)
                .map(|(h, b)| format!("{h}: {:.2}", b.linear_velocity.x))
                .collect();
            info!(frame, ?moving, "cradle");
        }
    }
    Ok(())
}

fn run_player() -> PhysicsResult<()> {
    let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -9.81)));
    add_pit(&mut sim, 12.0, 6.0, Material::new(0.0, 0.6))?;

    let avatar = sim.add_body(
        RigidBody::new(1.0, Circle::new(0.4)?)?
            .with_position(Vec2::new(2.0, 0.4))
            .with_material(Material::new(0.0, 0.6)),
    );
    for i in 0..3 {
        sim.add_body(
            RigidBody::new(1.5, Polygon::rectangle(0.8, 0.8)?)?
                .with_position(Vec2::new(5.0 + i as f64 * 1.2, 0.4))
                .with_material(Material::new(0.0, 0.4)),
        );
    }

    let player = sim.add_player(
        PlayerController::new(avatar)
            .with_acceleration(20.0)
            .with_maximum_speed(4.0),
    )?;
    sim.player_mut(player)?.set_input(ControlInput {
        right: true,
        ..ControlInput::default()
    });

    for frame in 0..240 {
        if frame == 120 {
            sim.player_mut(player)?.set_input(ControlInput::default());
            sim.player_mut(player)?.queue_impulse(Vec2::new(0.0, 5.0));
        }
        sim.step(DT)?;
        if frame % 40 == 0 {
            let body = sim.player_body(player)?;
            info!(
                frame,
                x = body.position.x,
                y = body.position.y,
                "player"
            );
        }
    }
    log_bodies(&sim, 240);
    Ok(())
}
