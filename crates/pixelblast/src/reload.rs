use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context, Result};
use pixelconfig::{ConfigDocument, PixelBlastConfig};
use tracing::{debug, warn};

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub fn load_config(path: &Path) -> Result<PixelBlastConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let document = ConfigDocument::from_toml_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(document.into_config())
}

/// Polls a config file's modification time and reloads it when it changes.
#[derive(Debug)]
pub struct ConfigWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    next_poll: Instant,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_modified = modified(&path);
        Self {
            path,
            last_modified,
            next_poll: Instant::now() + POLL_INTERVAL,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a freshly parsed configuration at most once per interval, and
    /// only when the file changed. Parse failures keep the current one.
    pub fn poll(&mut self, now: Instant) -> Option<PixelBlastConfig> {
        if now < self.next_poll {
            return None;
        }
        self.next_poll = now + POLL_INTERVAL;
        self.check()
    }

    pub fn check(&mut self) -> Option<PixelBlastConfig> {
        let current = modified(&self.path);
        if current.is_none() || current == self.last_modified {
            return None;
        }
        self.last_modified = current;
        debug!(path = %self.path.display(), "config file changed");
        match load_config(&self.path) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!("keeping current configuration: {err:#}");
                None
            }
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
