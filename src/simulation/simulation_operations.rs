//! Simulation Operations - Pure DOP Functions
//!
//! Shape ingestion entry points. Each `add_mesh_*` call either appends
//! exactly one prop and one table row, or fails and leaves the context as it
//! was. Host buffers and the table are only written through scoped guards.

use std::sync::Arc;

use glam::{Quat, Vec3, Vec4};
use parking_lot::RwLock;

use super::simulation_context_data::{SharedSimulationContext, SimulationContext};
use crate::error::{EngineError, EngineResult, OptionExt};
use crate::mesh::{face_count, write_convex_planes, write_triangle_buffers, VertexTable};
use crate::physics::{
    active_rows, append_row, create_shape_table, has_capacity, map_shape_table, shape_table_row,
    validate_aabb, write_transform, Aabb, GeometryDescriptor, HostBuffer, MeshHandle, Plane, Prop,
    PropBuffers, RowRequest, ShapeKind, ShapeRow, Simulator,
};
use crate::SimulationConfig;

/// Create a context with an empty prop sequence and a table sized by `config.max_shapes`
pub fn create_simulation_context<S: Simulator>(
    config: SimulationConfig,
    simulator: S,
) -> EngineResult<SimulationContext<S>> {
    if let Err(e) = config.validate() {
        log::error!("[create_simulation_context] Configuration validation failed: {}", e);
        return Err(EngineError::InvalidConfig {
            field: "SimulationConfig".to_string(),
            value: format!("{:?}", config),
            reason: e.to_string(),
        });
    }

    let shape_table = create_shape_table(config.max_shapes);
    log::info!(
        "[create_simulation_context] Shape slot table ready ({} slots)",
        config.max_shapes
    );

    Ok(SimulationContext {
        config,
        simulator,
        props: Vec::new(),
        shape_table,
    })
}

/// Wrap a context for hosts that share it across threads
pub fn create_shared_context<S>(context: SimulationContext<S>) -> SharedSimulationContext<S> {
    Arc::new(RwLock::new(context))
}

/// Number of props registered so far; also the next slot to be assigned
pub fn prop_count<S>(context: &SimulationContext<S>) -> usize {
    context.props.len()
}

pub fn prop<S>(context: &SimulationContext<S>, slot: usize) -> EngineResult<&Prop> {
    context.props.get(slot).ok_or_engine(|| EngineError::BufferAccess {
        index: slot,
        size: context.props.len(),
    })
}

pub fn shape_row<S>(context: &SimulationContext<S>, slot: usize) -> EngineResult<ShapeRow> {
    shape_table_row(&context.shape_table, slot)
}

fn ensure_capacity<S>(context: &SimulationContext<S>) -> EngineResult<()> {
    if !has_capacity(&context.shape_table) {
        return Err(EngineError::ResourceExhausted(format!(
            "shape slot table full ({} of {} slots used)",
            context.shape_table.count, context.shape_table.capacity
        )));
    }
    Ok(())
}

/// Write the row and push the prop. Slot and prop index stay in lockstep.
fn append_prop<S>(
    context: &mut SimulationContext<S>,
    kind: ShapeKind,
    mesh: MeshHandle,
    buffers: PropBuffers,
    dynamic: bool,
) -> EngineResult<usize> {
    let slot = {
        let mut table = map_shape_table(&mut context.shape_table)?;
        append_row(
            &mut table,
            RowRequest {
                geometry: GeometryDescriptor {
                    kind,
                    mesh,
                    scale: context.config.default_scale,
                },
                dynamic,
            },
        )?
    }; // table unmapped here

    context.props.push(Prop {
        position: Vec4::ZERO,
        rotation: Quat::IDENTITY,
        prev_position: Vec4::ZERO,
        prev_rotation: Quat::IDENTITY,
        kind,
        mesh,
        buffers,
    });
    debug_assert_eq!(context.props.len(), context.shape_table.count);

    Ok(slot)
}

/// Register a convex hull built from consecutive triangle faces.
/// Returns the slot assigned to the new prop.
///
/// Geometry is fully validated before the simulator creates a mesh. If the
/// simulator then rejects the update, its freshly created mesh stays behind
/// empty and unreferenced; the context itself is unchanged.
pub fn add_mesh_convex<S, V>(
    context: &mut SimulationContext<S>,
    vertices: &V,
    bounds: &Aabb,
) -> EngineResult<usize>
where
    S: Simulator,
    V: VertexTable + ?Sized,
{
    ensure_capacity(context)?;
    let faces = face_count(vertices.len())?;
    validate_aabb(bounds)?;

    let mut planes: HostBuffer<Plane> =
        context.simulator.alloc_host_buffer("Convex Mesh Planes", faces)?;
    {
        let mut mapped = planes.map();
        write_convex_planes(vertices, &mut mapped, context.config.min_face_area)?;
    } // planes unmapped here

    let mesh = context.simulator.create_convex_mesh()?;
    if let Err(e) = context
        .simulator
        .update_convex_mesh(mesh, &planes, faces, bounds)
    {
        log::error!("[add_mesh_convex] Simulator rejected convex mesh {}: {}", mesh.0, e);
        return Err(e);
    }

    let slot = append_prop(
        context,
        ShapeKind::ConvexMesh,
        mesh,
        PropBuffers::Convex { planes },
        true,
    )?;

    log::info!(
        "[add_mesh_convex] Prop {} registered: convex mesh {} with {} planes",
        slot,
        mesh.0,
        faces
    );
    Ok(slot)
}

/// Register a triangle mesh with the winding flipped to the simulator's convention.
/// Returns the slot assigned to the new prop; slot 0 becomes the static world.
///
/// A rejected update leaves an empty simulator mesh behind, as in [`add_mesh_convex`].
pub fn add_mesh_concave<S, V>(
    context: &mut SimulationContext<S>,
    vertices: &V,
    bounds: &Aabb,
) -> EngineResult<usize>
where
    S: Simulator,
    V: VertexTable + ?Sized,
{
    ensure_capacity(context)?;
    let vertex_count = vertices.len();
    let faces = face_count(vertex_count)?;
    validate_aabb(bounds)?;

    let mut vertex_buffer: HostBuffer<[f32; 4]> = context
        .simulator
        .alloc_host_buffer("Triangle Mesh Vertices", vertex_count)?;
    let mut index_buffer: HostBuffer<i32> = context
        .simulator
        .alloc_host_buffer("Triangle Mesh Indices", vertex_count)?;
    {
        let mut mapped_vertices = vertex_buffer.map();
        let mut mapped_indices = index_buffer.map();
        write_triangle_buffers(vertices, &mut mapped_vertices, &mut mapped_indices)?;
    } // both buffers unmapped here

    let mesh = context.simulator.create_triangle_mesh()?;
    if let Err(e) = context.simulator.update_triangle_mesh(
        mesh,
        &vertex_buffer,
        &index_buffer,
        vertex_count,
        faces,
        bounds,
    ) {
        log::error!("[add_mesh_concave] Simulator rejected triangle mesh {}: {}", mesh.0, e);
        return Err(e);
    }

    let slot = append_prop(
        context,
        ShapeKind::TriangleMesh,
        mesh,
        PropBuffers::Triangle {
            vertices: vertex_buffer,
            indices: index_buffer,
        },
        true,
    )?;

    log::info!(
        "[add_mesh_concave] Prop {} registered: triangle mesh {} with {} vertices, {} faces",
        slot,
        mesh.0,
        vertex_count,
        faces
    );
    Ok(slot)
}

/// Move a prop. The old transform becomes the previous one for velocity estimation.
/// `rotation` is normalized; zero or non-finite rotations are rejected.
pub fn set_prop_transform<S>(
    context: &mut SimulationContext<S>,
    slot: usize,
    position: Vec3,
    rotation: Quat,
) -> EngineResult<()> {
    if !position.is_finite() {
        return Err(EngineError::InvalidInput {
            field: "position".to_string(),
            reason: format!("non-finite position {:?}", position),
        });
    }
    // length_squared overflows for huge components, so check the result, not the input
    let normalized = rotation.normalize();
    if !rotation.is_finite() || !normalized.is_finite() || !normalized.is_normalized() {
        return Err(EngineError::InvalidInput {
            field: "rotation".to_string(),
            reason: format!("degenerate rotation {:?}", rotation),
        });
    }
    let rotation = normalized;
    let position = position.extend(0.0);

    let size = context.props.len();
    let prop = context
        .props
        .get_mut(slot)
        .ok_or_engine(|| EngineError::BufferAccess { index: slot, size })?;

    {
        let mut table = map_shape_table(&mut context.shape_table)?;
        write_transform(&mut table, slot, position, rotation)?;
    }

    prop.prev_position = prop.position;
    prop.prev_rotation = prop.rotation;
    prop.position = position;
    prop.rotation = rotation;
    Ok(())
}

/// Publish the live rows to the simulator. Returns the number of rows sent.
pub fn flush_shapes<S: Simulator>(context: &mut SimulationContext<S>) -> EngineResult<usize> {
    let view = active_rows(&context.shape_table)?;
    context.simulator.set_shapes(&view)?;
    log::debug!("[flush_shapes] Published {} shape rows", view.len());
    Ok(view.len())
}
