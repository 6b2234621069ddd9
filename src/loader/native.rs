use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use super::{fraction, image_from_gltf, model_from_document, LoadEvent};
use crate::error::ViewerError;
use crate::model::Model;

const READ_CHUNK: usize = 64 * 1024;

/// Load a `.gltf` or `.glb` file, reporting progress and then exactly one
/// terminal event to `sink`.
///
/// Progress is the fraction of the main file's bytes read so far.
/// External buffers and images are resolved relative to the file's
/// directory.
pub fn load_from_path(path: &Path, sink: &mut impl FnMut(LoadEvent)) {
    match read_model(path, sink) {
        Ok(model) => {
            log::info!(
                "loaded {} ({} triangles)",
                path.display(),
                model.triangle_count()
            );
            sink(LoadEvent::Loaded(model));
        }
        Err(e) => sink(LoadEvent::Failed(e)),
    }
}

/// Run [`load_from_path`] on a background thread named `model-loader`.
///
/// # Errors
///
/// Returns [`ViewerError::ThreadSpawn`] if the thread cannot be created; in
/// that case `sink` is never called.
pub fn spawn_load(
    path: PathBuf,
    mut sink: impl FnMut(LoadEvent) + Send + 'static,
) -> Result<JoinHandle<()>, ViewerError> {
    thread::Builder::new()
        .name("model-loader".into())
        .spawn(move || load_from_path(&path, &mut sink))
        .map_err(ViewerError::ThreadSpawn)
}

fn read_model(
    path: &Path,
    sink: &mut impl FnMut(LoadEvent),
) -> Result<Model, ViewerError> {
    let bytes = read_with_progress(path, sink)?;
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(&bytes)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let buffers = gltf::import_buffers(&document, Some(base), blob)?;
    let images = gltf::import_images(&document, Some(base), &buffers)?
        .iter()
        .map(image_from_gltf)
        .collect();
    model_from_document(&document, &buffers, images)
}

fn read_with_progress(
    path: &Path,
    sink: &mut impl FnMut(LoadEvent),
) -> Result<Vec<u8>, ViewerError> {
    let mut file = File::open(path)?;
    let total = file.metadata()?.len();
    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0_u8; READ_CHUNK];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        sink(LoadEvent::Progress(fraction(bytes.len() as u64, total)));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use glam::Vec3;

    use super::*;
    use crate::model::{Material, WrapMode};

    const TRIANGLE_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [0] }],
  "nodes": [{ "mesh": 0, "translation": [1.0, 0.0, 0.0] }],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
  "buffers": [{ "uri": "tri.bin", "byteLength": 36 }],
  "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
  "accessors": [{
    "bufferView": 0,
    "componentType": 5126,
    "count": 3,
    "type": "VEC3",
    "min": [0.0, 0.0, 0.0],
    "max": [1.0, 1.0, 0.0]
  }]
}"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "modelview-loader-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_triangle(dir: &Path) -> PathBuf {
        let floats: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let bin: Vec<u8> =
            floats.iter().flat_map(|f| f.to_le_bytes()).collect();
        std::fs::write(dir.join("tri.bin"), bin).unwrap();
        let path = dir.join("scene.gltf");
        std::fs::write(&path, TRIANGLE_GLTF).unwrap();
        path
    }

    const TEXTURED_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [0] }],
  "nodes": [{ "mesh": 0 }],
  "meshes": [{ "primitives": [{
    "attributes": { "POSITION": 0, "TEXCOORD_0": 1 },
    "material": 0
  }] }],
  "materials": [{
    "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } }
  }],
  "textures": [{ "source": 0 }],
  "images": [{ "uri": "checker.png" }],
  "buffers": [{ "uri": "textured.bin", "byteLength": 60 }],
  "bufferViews": [
    { "buffer": 0, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 24 }
  ],
  "accessors": [
    {
      "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
    },
    { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" }
  ]
}"#;

    fn write_textured(dir: &Path) -> PathBuf {
        let floats: [f32; 15] = [
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // positions
            0.0, 1.0, 1.0, 1.0, 0.0, 0.0, // uvs
        ];
        let bin: Vec<u8> =
            floats.iter().flat_map(|f| f.to_le_bytes()).collect();
        std::fs::write(dir.join("textured.bin"), bin).unwrap();

        let checker = image::RgbImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgb([255, 255, 255])
            } else {
                image::Rgb([0, 0, 0])
            }
        });
        checker.save(dir.join("checker.png")).unwrap();

        let path = dir.join("textured.gltf");
        std::fs::write(&path, TEXTURED_GLTF).unwrap();
        path
    }

    fn collect(path: &Path) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        load_from_path(path, &mut |event| events.push(event));
        events
    }

    #[test]
    fn loads_external_buffer_and_applies_node_transform() {
        let dir = scratch_dir("ok");
        let events = collect(&write_triangle(&dir));

        let (last, progress) = events.split_last().unwrap();
        assert!(!progress.is_empty());
        let mut previous = 0.0;
        for event in progress {
            let LoadEvent::Progress(p) = event else {
                panic!("terminal event before the end: {event:?}");
            };
            assert!(*p >= previous && *p <= 1.0);
            previous = *p;
        }
        assert_eq!(previous, 1.0);

        let LoadEvent::Loaded(model) = last else {
            panic!("expected Loaded, got {last:?}");
        };
        assert_eq!(model.triangle_count(), 1);
        let bounds = model.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(model.meshes[0].material, Material::default());
        assert!(model.images.is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn loads_base_color_texture_next_to_the_file() {
        let dir = scratch_dir("textured");
        let events = collect(&write_textured(&dir));

        let Some(LoadEvent::Loaded(model)) = events.last() else {
            panic!("expected Loaded, got {:?}", events.last());
        };
        let mesh = &model.meshes[0];
        let uvs: Vec<_> = mesh.vertices.iter().map(|v| v.uv).collect();
        assert_eq!(uvs, vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]);

        let texture = mesh.material.base_color_texture.unwrap();
        assert_eq!(texture.wrap_u, WrapMode::Repeat);
        let image = model.image(&texture).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(&image.rgba[..8], &[255, 255, 255, 255, 0, 0, 0, 255]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_texture_file_fails_the_load() {
        let dir = scratch_dir("no-texture");
        let path = write_textured(&dir);
        std::fs::remove_file(dir.join("checker.png")).unwrap();
        let events = collect(&path);
        assert!(matches!(
            events.last(),
            Some(LoadEvent::Failed(ViewerError::Gltf(_)))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_fails_once() {
        let dir = scratch_dir("missing");
        let events = collect(&dir.join("nope.gltf"));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LoadEvent::Failed(ViewerError::Io(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_json_fails_after_progress() {
        let dir = scratch_dir("invalid");
        let path = dir.join("broken.gltf");
        std::fs::write(&path, "{ not gltf").unwrap();
        let events = collect(&path);
        let terminal: Vec<_> =
            events.iter().filter(|e| e.is_terminal()).collect();
        assert_eq!(terminal.len(), 1);
        assert!(matches!(
            events.last(),
            Some(LoadEvent::Failed(ViewerError::Gltf(_)))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn spawned_load_reports_through_channel() {
        let dir = scratch_dir("spawn");
        let path = write_triangle(&dir);
        let (tx, rx) = mpsc::channel();
        let handle = spawn_load(path, move |event| {
            let _ = tx.send(event);
        })
        .unwrap();
        assert_eq!(handle.thread().name(), Some("model-loader"));
        handle.join().unwrap();
        let events: Vec<_> = rx.iter().collect();
        assert!(matches!(events.last(), Some(LoadEvent::Loaded(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
