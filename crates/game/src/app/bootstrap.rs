use std::path::PathBuf;
use std::str::FromStr;

use engine::PlayConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const WORLD_ENV_VAR: &str = "TILEPLAY_WORLD";
const SEED_ENV_VAR: &str = "TILEPLAY_SEED";
const INPUT_INTERVAL_ENV_VAR: &str = "TILEPLAY_INPUT_INTERVAL_MS";
const PAGE_CHARS_ENV_VAR: &str = "TILEPLAY_DIALOG_PAGE_CHARS";
const DEFAULT_PAGE_CHARS: usize = 64;

pub(crate) struct AppWiring {
    pub(crate) config: PlayConfig,
    pub(crate) world_path: Option<PathBuf>,
    pub(crate) page_chars: usize,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Tileplay Startup ===");

    let world_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(WORLD_ENV_VAR).map(PathBuf::from));

    let mut config = PlayConfig::default();
    if let Some(seed) = parse_env::<u64>(SEED_ENV_VAR) {
        config.shuffle_seed = Some(seed);
    }
    if let Some(interval) = parse_env::<f64>(INPUT_INTERVAL_ENV_VAR).filter(|ms| *ms > 0.0) {
        config.input_interval_ms = interval;
    }
    let page_chars = parse_env::<usize>(PAGE_CHARS_ENV_VAR)
        .filter(|chars| *chars > 0)
        .unwrap_or(DEFAULT_PAGE_CHARS);

    AppWiring {
        config,
        world_path,
        page_chars,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_env<T: FromStr>(var: &'static str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var, value = %raw, "ignoring_invalid_env_value");
            None
        }
    }
}
