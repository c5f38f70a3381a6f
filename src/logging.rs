//! Logger setup

use log::LevelFilter;

/// Install the env_logger backend.
///
/// `-v` raises the baseline from info to debug; a `RUST_LOG` directive
/// still overrides either. Safe to call more than once.
pub fn init(verbose: bool) {
    let baseline = match verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };

    let installed = env_logger::Builder::new()
        .filter_level(baseline)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
    if installed.is_err() {
        log::debug!("logger already installed");
    }
}
