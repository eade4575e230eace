use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Absolute touchscreen; position follows the finger
    Touch,
    /// Relative mouse; motion scaled by mouse speed
    Mouse,
}

/// Touch/mouse hardware layer: maps a touchscreen or mouse onto a virtual
/// game mouse and republishes it through uinput.
///
/// Hardware options go after `--`, e.g. `hwport -- -mousespd 150 -fs`.
#[derive(Parser, Debug)]
#[command(name = "hwport")]
pub struct Config {
    /// Option file (TOML, keys fs/winw/winh/fsw/fsh/mousespd/...)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Specific evdev device path (e.g. /dev/input/event5)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Input device kind
    #[arg(short, long, value_enum, default_value_t = Mode::Touch)]
    pub mode: Mode,

    /// Game area width
    #[arg(long, default_value_t = 320)]
    pub game_width: i32,

    /// Game area height
    #[arg(long, default_value_t = 200)]
    pub game_height: i32,

    /// Activate a UI option by label (e.g. "Aspect"); repeatable
    #[arg(long = "ui", value_name = "LABEL")]
    pub ui: Vec<String>,

    /// Write the resulting options back to --config
    #[arg(long, default_value_t = false)]
    pub save_config: bool,

    /// Print hardware options and UI items, then exit
    #[arg(long, default_value_t = false)]
    pub list_options: bool,

    /// Hardware options (-fs, -winw WIDTH, -mousespd SPEED, ...)
    #[arg(last = true, allow_hyphen_values = true, value_name = "HW_OPTIONS")]
    pub hw_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::try_parse_from(["hwport"]).unwrap();
        assert_eq!(c.mode, Mode::Touch);
        assert_eq!((c.game_width, c.game_height), (320, 200));
        assert!(c.hw_args.is_empty());
        assert!(c.config.is_none());
    }

    #[test]
    fn hardware_flags_after_separator() {
        let c = Config::try_parse_from([
            "hwport", "--mode", "mouse", "--ui", "Aspect", "--ui", "Filter", "--", "-fs", "-winw",
            "640",
        ])
        .unwrap();
        assert_eq!(c.mode, Mode::Mouse);
        assert_eq!(c.ui, ["Aspect", "Filter"]);
        assert_eq!(c.hw_args, ["-fs", "-winw", "640"]);
    }
}
