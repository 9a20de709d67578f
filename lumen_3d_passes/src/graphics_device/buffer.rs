//! Geometry buffer kinds and primitive topologies

/// Kind of GPU buffer created by `GraphicsDevice::create_buffer()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Vertex positions (tightly packed vec3 of f32)
    Vertex,
    /// Triangle/line indices (u32)
    Index,
}

/// Primitive assembly mode for indexed draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    Triangles,
    Lines,
}
