/// Static indexed mesh: vertex + index buffers + one draw call.
///
/// Geometry is uploaded once and never changes. The screen quad and
/// scene drawables are configurations of this type.

use glam::Vec3;
use crate::error::{Error, Result};
use crate::graphics_device::{BufferHandle, BufferKind, PrimitiveTopology, RenderContext};

#[derive(Debug)]
pub struct StaticMesh {
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    vertex_count: u32,
    index_count: u32,
    topology: PrimitiveTopology,
}

impl StaticMesh {
    /// Upload positions and indices
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if there are no indices or an index
    /// points past the last vertex.
    pub fn new(
        ctx: &mut RenderContext<'_>,
        positions: &[Vec3],
        indices: &[u32],
        topology: PrimitiveTopology,
    ) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::InvalidResource("static mesh has no indices".to_string()));
        }
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(Error::InvalidResource(format!(
                "index {} out of range for {} vertices", bad, positions.len()
            )));
        }

        let vertex_buffer = ctx
            .device()
            .create_buffer(BufferKind::Vertex, bytemuck::cast_slice(positions))?;
        let index_buffer = match ctx
            .device()
            .create_buffer(BufferKind::Index, bytemuck::cast_slice(indices))
        {
            Ok(buffer) => buffer,
            Err(e) => {
                ctx.device().delete_buffer(vertex_buffer);
                return Err(e);
            }
        };

        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_count: positions.len() as u32,
            index_count: indices.len() as u32,
            topology,
        })
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Issue the draw call with whatever program is bound
    pub fn draw(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        ctx.device().draw_indexed(
            self.topology,
            self.vertex_buffer,
            self.index_buffer,
            self.index_count,
        )
    }

    /// Delete both buffers
    pub fn release(self, ctx: &mut RenderContext<'_>) {
        ctx.device().delete_buffer(self.vertex_buffer);
        ctx.device().delete_buffer(self.index_buffer);
    }
}
