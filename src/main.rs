//! Standalone model viewer.
//!
//! ```text
//! modelview [MODEL] [--preset castle|dino] [--options FILE]
//! ```
//!
//! Without `MODEL` the preset's bundled model is opened. `--options` loads a
//! TOML file instead of the preset's camera and lighting defaults.

use std::path::PathBuf;

use clap::Parser;
use modelview::{ModelPreset, Options, Viewer};

/// Orbit viewer for a single glTF model.
#[derive(Debug, Parser)]
#[command(name = "modelview", version, about)]
struct Args {
    /// Path to a `.gltf` or `.glb` file. Defaults to the preset's model.
    model: Option<PathBuf>,

    /// Bundled model whose camera and lighting defaults are used.
    #[arg(long, default_value_t = ModelPreset::default())]
    preset: ModelPreset,

    /// TOML options file overriding the preset defaults.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let options = match &args.options {
        Some(path) => match Options::load(path) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Options::for_preset(args.preset),
    };

    let model = args.model.map_or_else(
        || args.preset.model_path(),
        |path| path.to_string_lossy().into_owned(),
    );
    log::info!("opening {model}");

    let result = Viewer::builder()
        .with_model(model)
        .with_options(options)
        .build()
        .run();
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
