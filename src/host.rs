//! Port implementations for the standalone binary.
//!
//! There is no renderer here: cursor and display changes are logged, and an
//! input grab becomes an `EVIOCGRAB` request for the reader thread.

use crate::error::{HwError, HwResult};
use crate::hw::{AudioPort, VideoPort};
use crate::options::HwOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct EvdevVideo {
    grab: Arc<AtomicBool>,
}

impl EvdevVideo {
    pub fn new(grab: Arc<AtomicBool>) -> Self {
        Self { grab }
    }
}

impl VideoPort for EvdevVideo {
    fn show_cursor(&mut self, visible: bool) {
        log::debug!("cursor {}", if visible { "shown" } else { "hidden" });
    }

    fn input_grab(&mut self, grab: bool) {
        self.grab.store(grab, Ordering::Relaxed);
    }

    fn toggle_fullscreen(&mut self, opts: &mut HwOptions) -> bool {
        opts.fullscreen = !opts.fullscreen;
        log::info!("Fullscreen: {}", opts.fullscreen);
        true
    }

    fn update_aspect(&mut self, opts: &HwOptions) -> bool {
        log::info!("Aspect: {}", opts.aspect);
        true
    }
}

/// Validates and remembers the soundfont for whichever mixer picks it up.
#[derive(Debug, Default)]
pub struct SoundfontAudio {
    soundfont: Option<PathBuf>,
}

impl SoundfontAudio {
    pub fn soundfont(&self) -> Option<&Path> {
        self.soundfont.as_deref()
    }
}

impl AudioPort for SoundfontAudio {
    fn set_soundfont(&mut self, path: &Path) -> HwResult<()> {
        if !path.is_file() {
            return Err(HwError::Soundfont {
                path: path.to_path_buf(),
                reason: "not a file".into(),
            });
        }
        log::info!("Soundfont: {}", path.display());
        self.soundfont = Some(path.to_path_buf());
        Ok(())
    }
}
