//! Marga daemon
//!
//! Builds the configured robot backend, then services the remote command
//! link until interrupted.

use marga::config::AppConfig;
use marga::devices::create_device;
use marga::encoder::EncoderTicks;
use marga::error::{Error, Result};
use marga::navigation::Navigator;
use marga::remote::RemoteLink;
use marga::transport::{SerialTransport, is_transient};

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "/etc/marga.toml";
const IDLE_SLEEP: Duration = Duration::from_millis(10);

/// Parse config path from command line arguments.
///
/// Supports:
/// - `marga <path>` (positional)
/// - `marga --config <path>` (flag-based)
/// - `marga -c <path>` (short flag)
///
/// Defaults to `/etc/marga.toml` if not specified.
fn parse_config_path(args: &[String]) -> String {
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    DEFAULT_CONFIG_PATH.to_string()
}

/// Load the file, or run on defaults when the default path is absent
fn load_config(path: &str) -> Result<AppConfig> {
    if path == DEFAULT_CONFIG_PATH && !Path::new(path).exists() {
        return Ok(AppConfig::default());
    }
    AppConfig::load(path)
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = parse_config_path(&args);
    let config = load_config(&config_path)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("Marga v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!("Using config: {}", config_path);
    log::info!(
        "Device: {} ({})",
        config.device.name,
        config.device.device_type
    );

    let ticks = Arc::new(EncoderTicks::new());
    let hardware = create_device(&config, Arc::clone(&ticks))?;
    let mut navigator = Navigator::new(&config, ticks, hardware);
    navigator.stop()?;
    navigator.report()?;

    let transport = SerialTransport::open(&config.link.port, config.link.baud_rate)?;
    let mut link = RemoteLink::new(transport);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    log::info!("Listening for commands on {}", config.link.port);

    while running.load(Ordering::Relaxed) {
        match link.poll(&mut navigator) {
            Ok(0) => thread::sleep(IDLE_SLEEP),
            Ok(_) => {}
            Err(e @ Error::EncoderStall { .. }) => {
                log::warn!("Command aborted: {}", e);
            }
            Err(e) if is_transient(&e) => {
                log::warn!("Echo not sent, command dropped: {}", e);
            }
            Err(e) => {
                log::error!("Remote link failed: {}", e);
                navigator.stop()?;
                return Err(e);
            }
        }
    }

    navigator.stop()?;
    let pose = navigator.pose();
    log::info!(
        "Shutdown at ({:.1}, {:.1}) heading {:.1}°",
        pose.x,
        pose.y,
        pose.heading
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_config_path() {
        assert_eq!(parse_config_path(&args(&["marga"])), DEFAULT_CONFIG_PATH);
        assert_eq!(parse_config_path(&args(&["marga", "a.toml"])), "a.toml");
        assert_eq!(
            parse_config_path(&args(&["marga", "--config", "b.toml"])),
            "b.toml"
        );
        assert_eq!(parse_config_path(&args(&["marga", "-c", "c.toml"])), "c.toml");
        assert_eq!(parse_config_path(&args(&["marga", "-v"])), DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        assert!(load_config("/nonexistent/marga.toml").is_err());
    }
}
