use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use collision_engine::{
    collision::{Collider, CollisionDetector},
    BodyHandle, BoundaryElement, Circle, Polygon, RigidBody, Shape, Simulation, SimulationConfig, Vec2,
};

const DT: f64 = 1.0 / 60.0;
const STEPS: usize = 30;

// --- Scene helpers ---

fn floored_simulation() -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::default().with_gravity(Vec2::new(0.0, -10.0)));
    sim.add_boundary(BoundaryElement::new(200.0).unwrap());
    sim
}

fn run_pile(sim: &mut Simulation, shape: Shape, count: usize) {
    let per_row = 10;
    for i in 0..count {
        let x = (i % per_row) as f64 * 1.1 - 5.0 + (i / per_row % 2) as f64 * 0.3;
        let y = 0.6 + (i / per_row) as f64 * 1.1;
        sim.add_body(
            RigidBody::new(1.0, shape.clone())
                .unwrap()
                .with_position(Vec2::new(x, y)),
        );
    }
    for _ in 0..STEPS {
        sim.step(black_box(DT)).unwrap();
    }
}

// Circles dropped in rows onto a single boundary
fn bench_circle_pile(c: &mut Criterion) {
    let mut group = c.benchmark_group("circle_pile");
    for count in [10, 100, 300].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            b.iter(|| {
                let mut sim = floored_simulation();
                run_pile(&mut sim, Circle::new(0.5).unwrap().into(), black_box(n));
            });
        });
    }
    group.finish();
}

// Same layout with hexagons, exercising face axes and edge contacts
fn bench_polygon_pile(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_pile");
    for count in [10, 100, 300].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            b.iter(|| {
                let mut sim = floored_simulation();
                run_pile(&mut sim, Polygon::regular(6, 0.5).unwrap().into(), black_box(n));
            });
        });
    }
    group.finish();
}

// Narrow phase alone for one overlapping polygon pair
fn bench_polygon_pair(c: &mut Criterion) {
    let a = RigidBody::new(1.0, Polygon::regular(8, 1.0).unwrap()).unwrap();
    let b = a.clone().with_position(Vec2::new(1.8, 0.3)).with_rotation(0.4);
    let detector = CollisionDetector::default();
    let (first, second) = (
        Collider::body(BodyHandle::from_index(0), &a),
        Collider::body(BodyHandle::from_index(1), &b),
    );

    c.bench_function("polygon_pair_event", |bench| {
        bench.iter(|| detector.generate_collision_event(black_box(&first), black_box(&second)));
    });
}

criterion_group!(benches, bench_circle_pile, bench_polygon_pile, bench_polygon_pair);
criterion_main!(benches);
