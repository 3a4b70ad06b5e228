//! param-sfo - PARAM.SFO viewer
//!
//! Opens the configured SFO file (`PARAM.SFO` by default) and prints every
//! entry as `key: value`.

use std::process;

use sfo_core::config::Config;
use sfo_format::ParamSfo;

fn main() {
    let config = Config::load().unwrap_or_default();
    sfo_core::logging::init(&config);

    tracing::info!("Reading {}", config.sfo.default_path.display());

    if let Err(e) = run(&config) {
        println!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> sfo_format::Result<()> {
    let sfo = ParamSfo::open(&config.sfo.default_path)?;

    for index in 0..sfo.len() {
        let key = sfo.key(index)?;
        let value = sfo.get(key)?;
        println!("{}: {}", key, value);
    }

    Ok(())
}
