use glam::{Mat3, Mat4, Vec3};
use gltf::image::Format;
use gltf::mesh::Mode;
use gltf::texture::WrappingMode;

use crate::error::ViewerError;
use crate::model::{
    AlphaMode, Material, Model, ModelImage, ModelMesh, TextureRef, WrapMode,
};

/// Flatten the default scene (or the first scene, or every mesh when the
/// document has no scenes) into world-space meshes.
///
/// `images` holds the document's images in document order. Only
/// triangle-list primitives with positions are kept; other primitives are
/// skipped with a warning. A document with no drawable triangles is an
/// error.
///
/// # Errors
///
/// Returns [`ViewerError::ModelLoad`] if nothing drawable remains.
pub fn model_from_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: Vec<ModelImage>,
) -> Result<Model, ViewerError> {
    let mut model = Model {
        meshes: Vec::new(),
        images,
    };

    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, Mat4::IDENTITY, buffers, &mut model);
            }
        }
        None => {
            for mesh in document.meshes() {
                append_mesh(&mesh, Mat4::IDENTITY, buffers, &mut model);
            }
        }
    }

    if model.is_empty() {
        return Err(ViewerError::ModelLoad(
            "document contains no triangle geometry".to_owned(),
        ));
    }
    log::debug!(
        "built model: {} meshes, {} vertices, {} triangles",
        model.meshes.len(),
        model.vertex_count(),
        model.triangle_count()
    );
    Ok(model)
}

fn visit_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    model: &mut Model,
) {
    let world =
        parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, world, buffers, model);
    }
    for child in node.children() {
        visit_node(&child, world, buffers, model);
    }
}

fn append_mesh(
    mesh: &gltf::Mesh<'_>,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    model: &mut Model,
) {
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    // Mirroring transforms flip triangle winding.
    let mirrored = world.determinant() < 0.0;

    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            log::warn!(
                "skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name().unwrap_or("<unnamed>")
            );
            continue;
        }

        let reader = primitive.reader(|buffer| {
            buffers.get(buffer.index()).map(|data| data.0.as_slice())
        });
        let Some(positions) = reader.read_positions() else {
            log::warn!(
                "skipping primitive without positions in mesh {:?}",
                mesh.name().unwrap_or("<unnamed>")
            );
            continue;
        };
        let positions: Vec<[f32; 3]> = positions
            .map(|p| world.transform_point3(Vec3::from(p)).to_array())
            .collect();
        let normals = reader.read_normals().map(|normals| {
            normals
                .map(|n| {
                    (normal_matrix * Vec3::from(n))
                        .try_normalize()
                        .unwrap_or(Vec3::Y)
                        .to_array()
                })
                .collect()
        });
        let mut indices: Option<Vec<u32>> = reader
            .read_indices()
            .map(|indices| indices.into_u32().collect());
        if mirrored {
            let list = indices.get_or_insert_with(|| {
                (0..positions.len() as u32).collect()
            });
            for tri in list.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }

        let (material, tex_coord) =
            material_of(&primitive, model.images.len());
        let uvs = reader
            .read_tex_coords(tex_coord)
            .map(|uvs| uvs.into_f32().collect());
        model.meshes.push(ModelMesh::from_parts(
            positions, normals, uvs, indices, material,
        ));
    }
}

/// The primitive's material and the texture coordinate set its base colour
/// texture samples.
fn material_of(
    primitive: &gltf::Primitive<'_>,
    image_count: usize,
) -> (Material, u32) {
    let material = primitive.material();
    let pbr = material.pbr_metallic_roughness();
    let mut tex_coord = 0;
    let base_color_texture = pbr.base_color_texture().and_then(|info| {
        let texture = info.texture();
        let image = texture.source().index();
        if image >= image_count {
            log::warn!("texture {} has no decoded image", texture.index());
            return None;
        }
        tex_coord = info.tex_coord();
        let sampler = texture.sampler();
        Some(TextureRef {
            image,
            wrap_u: wrap_mode(sampler.wrap_s()),
            wrap_v: wrap_mode(sampler.wrap_t()),
        })
    });
    let alpha_mode = match material.alpha_mode() {
        gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
        gltf::material::AlphaMode::Mask => AlphaMode::Mask,
        gltf::material::AlphaMode::Blend => AlphaMode::Blend,
    };
    let material = Material {
        base_color: pbr.base_color_factor(),
        base_color_texture,
        alpha_mode,
        alpha_cutoff: material.alpha_cutoff().unwrap_or(0.5),
    };
    (material, tex_coord)
}

fn wrap_mode(mode: WrappingMode) -> WrapMode {
    match mode {
        WrappingMode::Repeat => WrapMode::Repeat,
        WrappingMode::MirroredRepeat => WrapMode::MirroredRepeat,
        WrappingMode::ClampToEdge => WrapMode::ClampToEdge,
    }
}

/// Convert an image decoded by `gltf::import_images` to RGBA8.
///
/// Grey images are expanded to RGB, 16-bit samples keep their high byte and
/// float samples are clamped to `[0, 1]`. An image whose pixel data does
/// not match its size becomes a white pixel.
#[must_use]
pub fn image_from_gltf(data: &gltf::image::Data) -> ModelImage {
    let (channels, sample_size) = match data.format {
        Format::R8 => (1, 1),
        Format::R8G8 => (2, 1),
        Format::R8G8B8 => (3, 1),
        Format::R8G8B8A8 => (4, 1),
        Format::R16 => (1, 2),
        Format::R16G16 => (2, 2),
        Format::R16G16B16 => (3, 2),
        Format::R16G16B16A16 => (4, 2),
        Format::R32G32B32FLOAT => (3, 4),
        Format::R32G32B32A32FLOAT => (4, 4),
    };
    let rgba = data
        .pixels
        .chunks_exact(channels * sample_size)
        .flat_map(|pixel| {
            let mut c = [0_u8; 4];
            for (dst, src) in c.iter_mut().zip(pixel.chunks_exact(sample_size))
            {
                *dst = sample_to_u8(src);
            }
            match channels {
                1 => [c[0], c[0], c[0], 255],
                2 => [c[0], c[0], c[0], c[1]],
                3 => [c[0], c[1], c[2], 255],
                _ => c,
            }
        })
        .collect();
    ModelImage::from_rgba(data.width, data.height, rgba).unwrap_or_else(|| {
        log::warn!(
            "image data does not match {}x{}, using white",
            data.width,
            data.height
        );
        ModelImage::white()
    })
}

fn sample_to_u8(bytes: &[u8]) -> u8 {
    match *bytes {
        [b] => b,
        [lo, hi] => (u16::from_ne_bytes([lo, hi]) >> 8) as u8,
        [a, b, c, d] => {
            let v = f32::from_ne_bytes([a, b, c, d]);
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        _ => 255,
    }
}

/// Decode a PNG or JPEG file to RGBA8.
///
/// # Errors
///
/// Returns [`ViewerError::Image`] if the bytes are not a supported image.
pub fn decode_image(bytes: &[u8]) -> Result<ModelImage, ViewerError> {
    let decoded = image::load_from_memory(bytes)?.into_rgba8();
    let (width, height) = decoded.dimensions();
    ModelImage::from_rgba(width, height, decoded.into_raw()).ok_or_else(|| {
        ViewerError::ModelLoad("image has no pixels".to_owned())
    })
}
