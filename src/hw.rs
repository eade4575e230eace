use crate::error::HwResult;
use crate::options::HwOptions;
use std::path::Path;

pub trait VideoPort {
    /// Show or hide the host cursor.
    fn show_cursor(&mut self, visible: bool);

    /// Capture or release exclusive pointer input.
    fn input_grab(&mut self, grab: bool);

    /// Flip `opts.fullscreen` and re-apply the display mode.
    /// Returns false when the new mode could not be applied.
    fn toggle_fullscreen(&mut self, opts: &mut HwOptions) -> bool;

    /// Re-apply `opts.aspect`.
    fn update_aspect(&mut self, opts: &HwOptions) -> bool;
}

pub trait AudioPort {
    fn set_soundfont(&mut self, path: &Path) -> HwResult<()>;
}

/// Everything an option action is allowed to touch.
pub struct OptContext<'a> {
    pub opts: &'a mut HwOptions,
    pub video: &'a mut dyn VideoPort,
    pub audio: &'a mut dyn AudioPort,
}

impl<'a> OptContext<'a> {
    pub fn new(
        opts: &'a mut HwOptions,
        video: &'a mut dyn VideoPort,
        audio: &'a mut dyn AudioPort,
    ) -> Self {
        Self { opts, video, audio }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::error::HwError;
    use std::path::PathBuf;

    /// Video port that records what was asked of it.
    #[derive(Debug)]
    pub struct RecordingVideo {
        pub cursor_visible: bool,
        pub grabbed: bool,
        pub fullscreen_toggles: u32,
        pub aspect_updates: u32,
        pub fail_aspect: bool,
    }

    impl Default for RecordingVideo {
        fn default() -> Self {
            Self {
                cursor_visible: true,
                grabbed: false,
                fullscreen_toggles: 0,
                aspect_updates: 0,
                fail_aspect: false,
            }
        }
    }

    impl VideoPort for RecordingVideo {
        fn show_cursor(&mut self, visible: bool) {
            self.cursor_visible = visible;
        }

        fn input_grab(&mut self, grab: bool) {
            self.grabbed = grab;
        }

        fn toggle_fullscreen(&mut self, opts: &mut HwOptions) -> bool {
            opts.fullscreen = !opts.fullscreen;
            self.fullscreen_toggles += 1;
            true
        }

        fn update_aspect(&mut self, _opts: &HwOptions) -> bool {
            self.aspect_updates += 1;
            !self.fail_aspect
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub soundfont: Option<PathBuf>,
        pub reject: bool,
    }

    impl AudioPort for RecordingAudio {
        fn set_soundfont(&mut self, path: &Path) -> HwResult<()> {
            if self.reject {
                return Err(HwError::Soundfont {
                    path: path.to_path_buf(),
                    reason: "rejected".into(),
                });
            }
            self.soundfont = Some(path.to_path_buf());
            Ok(())
        }
    }
}
