use bytemuck::{Pod, Zeroable};

/// Position + texture coordinate, tightly packed (20 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // uv
    ];

    #[inline]
    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Immutable indexed triangle list.
///
/// Invariant: every index is smaller than `vertices.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<MeshVertex>,
    indices: Vec<u16>,
}

impl Mesh {
    /// Builds a mesh, checking the index bound.
    ///
    /// Returns `None` if any index points past the vertex list or the index
    /// count is not a multiple of three.
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u16>) -> Option<Self> {
        let in_bounds = indices.iter().all(|&i| (i as usize) < vertices.len());
        if !in_bounds || indices.len() % 3 != 0 {
            return None;
        }
        Some(Self { vertices, indices })
    }

    /// Builds a mesh from buffers whose index bound was checked at compile time.
    pub(crate) fn from_checked_parts(vertices: Vec<MeshVertex>, indices: Vec<u16>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self { vertices, indices }
    }

    #[inline]
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as bytes, zero-padded to a 4-byte multiple.
    ///
    /// `Queue::write_buffer` and mapped buffer creation both require
    /// `COPY_BUFFER_ALIGNMENT`; 60 `u16` indices are 120 bytes, so padding is
    /// only ever needed for odd counts.
    pub fn index_bytes(&self) -> Vec<u8> {
        let mut bytes = bytemuck::cast_slice::<u16, u8>(&self.indices).to_vec();
        let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
        bytes.resize(bytes.len().div_ceil(align) * align, 0);
        bytes
    }

    /// Iterates triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
