//! CPU-side model data ready for upload.
//!
//! A [`Model`] is a flat list of world-space triangle meshes plus the
//! decoded images their materials sample. Node transforms are baked into
//! the vertices at load time, so the renderer draws every mesh with the
//! same camera and lighting bind group and a per-mesh material.

use glam::Vec3;

/// Vertex layout shared with `assets/shaders/model.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// World-space unit normal.
    pub normal: [f32; 3],
    /// Base colour texture coordinate.
    pub uv: [f32; 2],
}

impl ModelVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2
    ];

    /// Vertex buffer layout for the model pipeline.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// How a material's alpha is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    /// Alpha is ignored.
    #[default]
    Opaque,
    /// Fragments below the cutoff are discarded, the rest are opaque.
    Mask,
    /// Alpha blends with what is behind.
    Blend,
}

/// Texture coordinate wrapping along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Tile.
    #[default]
    Repeat,
    /// Tile, mirroring every other repetition.
    MirroredRepeat,
    /// Stretch the edge texels.
    ClampToEdge,
}

/// A material's reference to one of [`Model::images`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    /// Index into [`Model::images`].
    pub image: usize,
    /// Horizontal wrapping.
    pub wrap_u: WrapMode,
    /// Vertical wrapping.
    pub wrap_v: WrapMode,
}

/// Metallic-roughness base colour subset of a glTF material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA factor multiplied with the texture.
    pub base_color: [f32; 4],
    /// sRGB base colour texture, if any.
    pub base_color_texture: Option<TextureRef>,
    /// Alpha interpretation.
    pub alpha_mode: AlphaMode,
    /// Cutoff for [`AlphaMode::Mask`].
    pub alpha_cutoff: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::from_color([1.0; 4])
    }
}

impl Material {
    /// Untextured opaque material.
    #[must_use]
    pub fn from_color(base_color: [f32; 4]) -> Self {
        Self {
            base_color,
            base_color_texture: None,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
        }
    }
}

/// A decoded image as tightly packed RGBA8 rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl ModelImage {
    /// Wrap RGBA8 pixels, `None` if the size is zero or the byte count does
    /// not match it.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        (expected > 0 && rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    /// A single white pixel.
    #[must_use]
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

/// One indexed triangle list with its material.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    /// Mesh vertices.
    pub vertices: Vec<ModelVertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
    /// Surface material.
    pub material: Material,
}

impl ModelMesh {
    /// Build a mesh, generating sequential indices when `indices` is `None`,
    /// smooth normals when `normals` is `None` and zero texture coordinates
    /// when `uvs` is `None`.
    #[must_use]
    pub fn from_parts(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        uvs: Option<Vec<[f32; 2]>>,
        indices: Option<Vec<u32>>,
        material: Material,
    ) -> Self {
        let indices = indices
            .unwrap_or_else(|| (0..positions.len() as u32).collect());
        let normals = match normals {
            Some(normals) if normals.len() == positions.len() => normals,
            _ => smooth_normals(&positions, &indices),
        };
        let uvs = match uvs {
            Some(uvs) if uvs.len() == positions.len() => uvs,
            _ => vec![[0.0; 2]; positions.len()],
        };
        let vertices = positions
            .into_iter()
            .zip(normals)
            .zip(uvs)
            .map(|((position, normal), uv)| ModelVertex {
                position,
                normal,
                uv,
            })
            .collect();
        Self {
            vertices,
            indices,
            material,
        }
    }

    /// Number of whole triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box around a single point.
    #[must_use]
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Grow to contain `p`.
    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the bounding sphere around [`center`](Self::center).
    #[must_use]
    pub fn radius(&self) -> f32 {
        (self.max - self.center()).length()
    }
}

/// A loaded model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Meshes in draw order.
    pub meshes: Vec<ModelMesh>,
    /// Images referenced by [`TextureRef::image`].
    pub images: Vec<ModelImage>,
}

impl Model {
    /// Bounds of every vertex, `None` for an empty model.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        let mut positions = self
            .meshes
            .iter()
            .flat_map(|mesh| mesh.vertices.iter())
            .map(|v| Vec3::from(v.position));
        let mut bounds = Aabb::from_point(positions.next()?);
        for p in positions {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Total vertex count across meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    /// Total triangle count across meshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(ModelMesh::triangle_count).sum()
    }

    /// The image a texture reference points at, if it exists.
    #[must_use]
    pub fn image(&self, texture: &TextureRef) -> Option<&ModelImage> {
        self.images.get(texture.image)
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(|m| m.indices.is_empty())
    }
}

/// Area-weighted vertex normals. Degenerate vertices get +Y.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(pa), Some(pb), Some(pc)) =
            (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        let (pa, pb, pc) = (Vec3::from(*pa), Vec3::from(*pb), Vec3::from(*pc));
        let face = (pb - pa).cross(pc - pa);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }
    accum
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<[f32; 3]> {
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    fn mesh(positions: Vec<[f32; 3]>) -> ModelMesh {
        ModelMesh::from_parts(positions, None, None, None, Material::default())
    }

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<ModelVertex>(), 32);
    }

    #[test]
    fn missing_attributes_are_generated() {
        let mesh = mesh(triangle());
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.uv, [0.0, 0.0]);
        }
    }

    #[test]
    fn uvs_are_kept_per_vertex() {
        let uvs = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let mesh = ModelMesh::from_parts(
            triangle(),
            None,
            Some(uvs.clone()),
            None,
            Material::default(),
        );
        let got: Vec<_> = mesh.vertices.iter().map(|v| v.uv).collect();
        assert_eq!(got, uvs);
    }

    #[test]
    fn image_size_must_match_pixels() {
        assert!(ModelImage::from_rgba(2, 1, vec![0; 8]).is_some());
        assert!(ModelImage::from_rgba(2, 2, vec![0; 8]).is_none());
        assert!(ModelImage::from_rgba(0, 0, Vec::new()).is_none());
        assert_eq!(ModelImage::white().rgba, vec![255; 4]);
    }

    #[test]
    fn bounds_cover_all_meshes() {
        let model = Model {
            meshes: vec![mesh(triangle()), mesh(vec![[-2.0, 0.0, 3.0]; 3])],
            images: Vec::new(),
        };
        let bounds = model.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(bounds.center(), Vec3::new(-0.5, 0.5, 1.5));
        let expected = (2.25_f32 + 0.25 + 2.25).sqrt();
        assert!((bounds.radius() - expected).abs() < 1e-6);
        assert_eq!(model.triangle_count(), 2);
        assert_eq!(model.vertex_count(), 6);
    }

    #[test]
    fn empty_model_has_no_bounds() {
        assert!(Model::default().bounds().is_none());
        assert!(Model::default().is_empty());
    }
}
