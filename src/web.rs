//! Browser entry point and page chrome.
//!
//! `start` is exported to JavaScript. It installs the panic hook and the
//! console logger, then runs the [`Viewer`] on a canvas appended to the
//! page body, with a "Toggle Panning" button next to it.

use wasm_bindgen::prelude::*;
use winit::event_loop::EventLoopProxy;

use crate::command::ViewerCommand;
use crate::error::ViewerError;
use crate::options::{ModelPreset, Options};
use crate::viewer::{Viewer, ViewerEvent};

/// Start the viewer in the page.
///
/// `preset` names one of the bundled models (`castle` when omitted);
/// `model_url` overrides the model URL while keeping the preset's camera
/// and lighting.
///
/// # Errors
///
/// Returns a JavaScript error string for an unknown preset or when the
/// event loop cannot be created.
#[wasm_bindgen]
pub fn start(
    preset: Option<String>,
    model_url: Option<String>,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let preset = match preset {
        Some(name) => name
            .parse::<ModelPreset>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => ModelPreset::default(),
    };
    let model = model_url.unwrap_or_else(|| preset.model_path());
    log::info!("starting {preset} viewer for {model}");

    Viewer::builder()
        .with_model(model)
        .with_options(Options::for_preset(preset))
        .build()
        .run()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Append a `<button class="btn">Toggle Panning</button>` to the body that
/// sends [`ViewerCommand::TogglePanning`] on click.
pub(crate) fn create_toggle_button(
    proxy: EventLoopProxy<ViewerEvent>,
) -> Result<(), ViewerError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ViewerError::Fetch("no document".to_owned()))?;
    let body = document
        .body()
        .ok_or_else(|| ViewerError::Fetch("no document body".to_owned()))?;

    let button = document.create_element("button").map_err(js_error)?;
    button.set_class_name("btn");
    button.set_text_content(Some("Toggle Panning"));

    let on_click = Closure::<dyn FnMut()>::new(move || {
        let _ = proxy
            .send_event(ViewerEvent::Command(ViewerCommand::TogglePanning));
    });
    button
        .add_event_listener_with_callback(
            "click",
            on_click.as_ref().unchecked_ref(),
        )
        .map_err(js_error)?;
    on_click.forget();

    let _ = body.append_child(&button).map_err(js_error)?;
    Ok(())
}

/// The page's inner size in CSS pixels.
pub(crate) fn page_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

fn js_error(e: JsValue) -> ViewerError {
    ViewerError::Fetch(format!("{e:?}"))
}
