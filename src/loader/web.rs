use gltf::buffer::Source as BufferSource;
use gltf::image::Source as ImageSource;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{
    base_url, decode_image, fraction, image_from_gltf, model_from_document,
    resolve_uri, LoadEvent,
};
use crate::error::ViewerError;
use crate::model::{Model, ModelImage};

/// Fetch a `.gltf` or `.glb` file with its external buffers and images,
/// reporting progress and then exactly one terminal event to `sink`.
///
/// Progress is the fraction of files (the document plus each external
/// buffer and image) fetched so far. Relative URIs resolve against the
/// document URL.
pub async fn load_from_url(url: &str, sink: &mut impl FnMut(LoadEvent)) {
    match fetch_model(url, sink).await {
        Ok(model) => {
            log::info!("loaded {url} ({} triangles)", model.triangle_count());
            sink(LoadEvent::Loaded(model));
        }
        Err(e) => sink(LoadEvent::Failed(e)),
    }
}

/// Files fetched so far out of the total.
struct Progress<'a, F> {
    sink: &'a mut F,
    fetched: u64,
    total: u64,
}

impl<F: FnMut(LoadEvent)> Progress<'_, F> {
    fn file_done(&mut self) {
        self.fetched += 1;
        (self.sink)(LoadEvent::Progress(fraction(self.fetched, self.total)));
    }
}

fn is_external(uri: &str) -> bool {
    !uri.starts_with("data:")
}

async fn fetch_model(
    url: &str,
    sink: &mut impl FnMut(LoadEvent),
) -> Result<Model, ViewerError> {
    let url = absolute_url(url)?;
    let bytes = fetch_bytes(&url).await?;
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(&bytes)?;

    let external_buffers = document
        .buffers()
        .filter(|b| match b.source() {
            BufferSource::Uri(uri) => is_external(uri),
            BufferSource::Bin => false,
        })
        .count();
    let external_images = document
        .images()
        .filter(|i| match i.source() {
            ImageSource::Uri { uri, .. } => is_external(uri),
            ImageSource::View { .. } => false,
        })
        .count();
    let mut progress = Progress {
        sink,
        fetched: 0,
        total: (1 + external_buffers + external_images) as u64,
    };
    progress.file_done();

    let base = base_url(&url);
    // Embedded and binary-chunk data needs no network access.
    let buffers = if external_buffers == 0 {
        gltf::import_buffers(&document, None, blob)?
    } else {
        fetch_buffers(&document, blob, &base, &mut progress).await?
    };
    let images = if external_images == 0 {
        gltf::import_images(&document, None, &buffers)?
            .iter()
            .map(image_from_gltf)
            .collect()
    } else {
        fetch_images(&document, &buffers, &base, &mut progress).await?
    };
    model_from_document(&document, &buffers, images)
}

async fn fetch_buffers<F: FnMut(LoadEvent)>(
    document: &gltf::Document,
    mut blob: Option<Vec<u8>>,
    base: &str,
    progress: &mut Progress<'_, F>,
) -> Result<Vec<gltf::buffer::Data>, ViewerError> {
    let mut buffers = Vec::with_capacity(document.buffers().len());
    for buffer in document.buffers() {
        let data = match buffer.source() {
            BufferSource::Bin => blob.take().ok_or_else(|| {
                ViewerError::ModelLoad("missing binary chunk".to_owned())
            })?,
            BufferSource::Uri(uri) if !is_external(uri) => {
                return Err(ViewerError::ModelLoad(
                    "data URI buffers cannot be mixed with external buffers"
                        .to_owned(),
                ));
            }
            BufferSource::Uri(uri) => {
                let data = fetch_bytes(&resolve_uri(base, uri)).await?;
                progress.file_done();
                data
            }
        };
        if data.len() < buffer.length() {
            return Err(ViewerError::ModelLoad(format!(
                "buffer {} is {} bytes, expected {}",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffers.push(gltf::buffer::Data(data));
    }
    Ok(buffers)
}

async fn fetch_images<F: FnMut(LoadEvent)>(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    base: &str,
    progress: &mut Progress<'_, F>,
) -> Result<Vec<ModelImage>, ViewerError> {
    let mut images = Vec::with_capacity(document.images().len());
    for image in document.images() {
        let decoded = match image.source() {
            ImageSource::View { view, .. } => {
                let start = view.offset();
                let bytes = buffers
                    .get(view.buffer().index())
                    .and_then(|data| data.0.get(start..start + view.length()))
                    .ok_or_else(|| {
                        ViewerError::ModelLoad(format!(
                            "image {} lies outside its buffer",
                            image.index()
                        ))
                    })?;
                decode_image(bytes)?
            }
            ImageSource::Uri { uri, .. } if !is_external(uri) => {
                return Err(ViewerError::ModelLoad(
                    "data URI images cannot be mixed with external images"
                        .to_owned(),
                ));
            }
            ImageSource::Uri { uri, .. } => {
                let bytes = fetch_bytes(&resolve_uri(base, uri)).await?;
                progress.file_done();
                decode_image(&bytes)?
            }
        };
        images.push(decoded);
    }
    Ok(images)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ViewerError> {
    let window = web_sys::window()
        .ok_or_else(|| ViewerError::Fetch("no window".to_owned()))?;
    let response: web_sys::Response =
        JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
    if !response.ok() {
        return Err(ViewerError::Fetch(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Resolve `url` against the page location.
fn absolute_url(url: &str) -> Result<String, ViewerError> {
    let href = web_sys::window()
        .ok_or_else(|| ViewerError::Fetch("no window".to_owned()))?
        .location()
        .href()
        .map_err(js_error)?;
    Ok(resolve_uri(&base_url(&href), url))
}

fn js_error(e: JsValue) -> ViewerError {
    ViewerError::Fetch(format!("{e:?}"))
}
