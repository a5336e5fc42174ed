use std::path::Path;

use molvis::{options::Options, Viewer};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut builder = Viewer::builder();
    if let Some(path) = args.next() {
        builder = builder.with_path(path);
    }
    if let Some(preset) = args.next() {
        match Options::load(Path::new(&preset)) {
            Ok(options) => builder = builder.with_options(options),
            Err(e) => {
                log::error!("failed to load options from {preset}: {e}");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
