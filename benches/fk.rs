// cargo bench --bench fk
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hinge_ik::*;
use nalgebra as na;
use rand::{Rng, SeedableRng};

/// Serial chain of `num_joints` bodies with alternating axes
fn create_chain(num_joints: usize) -> (Robot<f64>, BodyId) {
    let mut builder = RobotBuilder::new("base");
    let mut parent = builder.root();
    for i in 0..num_joints {
        let child = builder.add_body(&format!("link{}", i));
        let axis = if i % 2 == 0 {
            na::Vector3::z()
        } else {
            na::Vector3::x()
        };
        builder
            .add_joint(
                HingeJointBuilder::new()
                    .name(&format!("joint{}", i))
                    .axis(axis)
                    .parent_anchor(na::Vector3::new(0.0, 0.2, 0.0)),
                parent,
                child,
            )
            .unwrap();
        parent = child;
    }
    (builder.finalize().unwrap(), parent)
}

fn random_q(dof: usize) -> na::DVector<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    na::DVector::from_fn(dof, |_, _| rng.gen_range(-1.0..1.0))
}

fn bench_fk(c: &mut Criterion) {
    let (mut robot, end) = create_chain(12);
    let mut coords = GeneralizedCoordinates::new(&mut robot);
    coords.set_q(&random_q(coords.dof())).unwrap();
    let local = na::Point3::new(0.0, 0.1, 0.0);
    c.bench_function("world_coordinates", |b| {
        b.iter(|| coords.world_coordinates(black_box(&local), end))
    });
    c.bench_function("jacobian", |b| b.iter(|| coords.jacobian(black_box(&local), end)));
    c.bench_function("numerical_jacobian", |b| {
        b.iter(|| coords.numerical_jacobian(black_box(&local), end))
    });
    c.bench_function("reduced_state", |b| b.iter(|| coords.reduced_state()));
}

fn bench_transforms(c: &mut Criterion) {
    let (mut robot, _) = create_chain(12);
    let mut coords = GeneralizedCoordinates::new(&mut robot);
    coords.set_q(&random_q(coords.dof())).unwrap();
    coords.sync_robot_state();
    let state = robot.state().clone();
    c.bench_function("update_transforms", |b| b.iter(|| robot.update_transforms()));
    c.bench_function("sync_with_state", |b| {
        let mut coords = GeneralizedCoordinates::new(&mut robot);
        b.iter(|| coords.sync_with_state(black_box(&state)).unwrap())
    });
}

criterion_group!(benches, bench_fk, bench_transforms);
criterion_main!(benches);
