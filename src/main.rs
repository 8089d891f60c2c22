//! `skyline [PRESET.toml]`: open the city scene viewer, optionally with a
//! view preset.

use std::path::Path;

use skyline::options::Options;
use skyline::viewer::Viewer;

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => {
                log::info!("loaded preset {path}");
                options
            }
            Err(e) => {
                log::error!("failed to load preset {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
