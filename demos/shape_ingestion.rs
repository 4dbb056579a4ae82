//! Registers a ground mesh and a tetrahedron hull, moves the hull and publishes the table.
//!
//! Run with `RUST_LOG=debug` to see every registration step.

use glam::{Quat, Vec3};
use prop_physics::physics::aabb_from_points;
use prop_physics::{
    add_mesh_concave, add_mesh_convex, create_simulation_context, flush_shapes, prop_count,
    set_prop_transform, shape_row, EngineError, RecordingSimulator, SimulationConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = SimulationConfig::from_toml_str("max_shapes = 64")?;
    let mut context = create_simulation_context(config, RecordingSimulator::new())?;

    let ground = [
        Vec3::new(-10.0, 0.0, -10.0),
        Vec3::new(-10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(-10.0, 0.0, -10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, -10.0),
    ];
    let ground_bounds = aabb_from_points(&ground).ok_or(EngineError::Internal {
        message: "ground has no vertices".to_string(),
    })?;
    let world = add_mesh_concave(&mut context, &ground, &ground_bounds)?;

    // Four faces of a tetrahedron, wound outward
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(1.0, 0.0, 0.0);
    let c = Vec3::new(0.0, 1.0, 0.0);
    let d = Vec3::new(0.0, 0.0, 1.0);
    let hull = [a, c, b, a, b, d, a, d, c, b, c, d];
    let hull_bounds = aabb_from_points(&hull).ok_or(EngineError::Internal {
        message: "hull has no vertices".to_string(),
    })?;
    let tetrahedron = add_mesh_convex(&mut context, &hull, &hull_bounds)?;

    set_prop_transform(
        &mut context,
        tetrahedron,
        Vec3::new(0.0, 2.0, 0.0),
        Quat::from_rotation_y(0.5),
    )?;
    let published = flush_shapes(&mut context)?;

    log::info!(
        "[shape_ingestion] {} props, {} rows published",
        prop_count(&context),
        published
    );
    for slot in [world, tetrahedron] {
        let row = shape_row(&context, slot)?;
        log::info!(
            "[shape_ingestion] slot {}: kind={:?} dynamic={} mesh={} position={:?}",
            slot,
            row.flags.kind(),
            row.flags.is_dynamic(),
            row.geometry.mesh.0,
            row.position
        );
    }

    Ok(())
}
