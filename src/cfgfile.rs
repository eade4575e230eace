//! Config-file item tables.
//!
//! Each item binds one flat TOML key to a field of `HwOptions`. Values that
//! fail their check are logged and skipped so the previous value stays.

use crate::error::{HwError, HwResult};
use crate::options::HwOptions;
use std::path::Path;
use toml::{Table, Value};

pub type IntCheck = fn(i32) -> bool;

pub enum CfgKind {
    Bool {
        get: fn(&HwOptions) -> bool,
        set: fn(&mut HwOptions, bool),
    },
    Int {
        get: fn(&HwOptions) -> i32,
        set: fn(&mut HwOptions, i32),
        check: Option<IntCheck>,
    },
    Str {
        get: fn(&HwOptions) -> Option<&str>,
        set: fn(&mut HwOptions, String),
    },
}

pub struct CfgItem {
    pub name: &'static str,
    pub kind: CfgKind,
}

impl CfgItem {
    pub fn bool(
        name: &'static str,
        get: fn(&HwOptions) -> bool,
        set: fn(&mut HwOptions, bool),
    ) -> Self {
        Self { name, kind: CfgKind::Bool { get, set } }
    }

    pub fn int(
        name: &'static str,
        get: fn(&HwOptions) -> i32,
        set: fn(&mut HwOptions, i32),
        check: Option<IntCheck>,
    ) -> Self {
        Self { name, kind: CfgKind::Int { get, set, check } }
    }

    pub fn string(
        name: &'static str,
        get: fn(&HwOptions) -> Option<&str>,
        set: fn(&mut HwOptions, String),
    ) -> Self {
        Self { name, kind: CfgKind::Str { get, set } }
    }

    fn invalid(&self, value: &Value) -> HwError {
        HwError::InvalidValue {
            option: self.name.to_string(),
            value: value.to_string(),
        }
    }

    /// Store `value` into `opts`, leaving it untouched on any error.
    pub fn set_value(&self, opts: &mut HwOptions, value: &Value) -> HwResult<()> {
        match &self.kind {
            CfgKind::Bool { set, .. } => {
                let b = match value {
                    Value::Boolean(b) => *b,
                    Value::Integer(0) => false,
                    Value::Integer(1) => true,
                    _ => return Err(self.invalid(value)),
                };
                set(opts, b);
            }
            CfgKind::Int { set, check, .. } => {
                let v = value
                    .as_integer()
                    .and_then(|i| i32::try_from(i).ok())
                    .ok_or_else(|| self.invalid(value))?;
                if let Some(check) = check {
                    if !check(v) {
                        return Err(HwError::Rejected {
                            option: self.name.to_string(),
                            value: v as i64,
                        });
                    }
                }
                set(opts, v);
            }
            CfgKind::Str { set, .. } => {
                let s = value.as_str().ok_or_else(|| self.invalid(value))?;
                set(opts, s.to_string());
            }
        }
        Ok(())
    }

    /// Current value, or None for an unset string.
    pub fn value(&self, opts: &HwOptions) -> Option<Value> {
        match &self.kind {
            CfgKind::Bool { get, .. } => Some(Value::Boolean(get(opts))),
            CfgKind::Int { get, .. } => Some(Value::Integer(get(opts) as i64)),
            CfgKind::Str { get, .. } => get(opts).map(|s| Value::String(s.to_string())),
        }
    }
}

/// Apply every known key of `table`. Returns how many keys were stored.
pub fn apply(items: &[CfgItem], table: &Table, opts: &mut HwOptions) -> usize {
    let mut applied = 0;
    for (key, value) in table {
        let Some(item) = items.iter().find(|item| item.name == key) else {
            log::debug!("cfg: ignoring unknown key {}", key);
            continue;
        };
        match item.set_value(opts, value) {
            Ok(()) => applied += 1,
            Err(e) => log::warn!("cfg: {}", e),
        }
    }
    applied
}

pub fn to_table(items: &[CfgItem], opts: &HwOptions) -> Table {
    let mut table = Table::new();
    for item in items {
        if let Some(value) = item.value(opts) {
            table.insert(item.name.to_string(), value);
        }
    }
    table
}

pub fn load(path: &Path, items: &[CfgItem], opts: &mut HwOptions) -> HwResult<usize> {
    let content = std::fs::read_to_string(path).map_err(|source| HwError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table: Table = toml::from_str(&content)?;
    let applied = apply(items, &table, opts);
    log::info!("Loaded {} option(s) from {}", applied, path.display());
    Ok(applied)
}

pub fn save(path: &Path, items: &[CfgItem], opts: &HwOptions) -> HwResult<()> {
    let content = toml::to_string(&to_table(items, opts))?;
    std::fs::write(path, content).map_err(|source| HwError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved options to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::cfg_items;

    fn parse(src: &str) -> Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn applies_known_keys() {
        let mut opts = HwOptions::default();
        let n = apply(
            &cfg_items(),
            &parse("fs = true\nwinw = 640\nwinh = 400\nmousespd = 150\n"),
            &mut opts,
        );
        assert_eq!(n, 4);
        assert!(opts.fullscreen);
        assert_eq!(opts.screen_winw, 640);
        assert_eq!(opts.screen_winh, 400);
        assert_eq!(opts.mousespd, 150);
    }

    #[test]
    fn rejected_mouse_speed_keeps_previous_value() {
        let mut opts = HwOptions::default();
        opts.mousespd = 42;
        for bad in ["mousespd = 0", "mousespd = 201", "mousespd = -5"] {
            assert_eq!(apply(&cfg_items(), &parse(bad), &mut opts), 0);
            assert_eq!(opts.mousespd, 42);
        }
        assert_eq!(apply(&cfg_items(), &parse("mousespd = 200"), &mut opts), 1);
        assert_eq!(opts.mousespd, 200);
    }

    #[test]
    fn unknown_and_mistyped_keys_are_skipped() {
        let mut opts = HwOptions::default();
        let n = apply(
            &cfg_items(),
            &parse("volume = 3\nwinw = \"wide\"\nfs = 2\nfsw = 1280\n"),
            &mut opts,
        );
        assert_eq!(n, 1);
        assert_eq!(opts.screen_winw, 0);
        assert!(!opts.fullscreen);
        assert_eq!(opts.screen_fsw, 1280);
    }

    #[test]
    fn bool_accepts_zero_and_one() {
        let mut opts = HwOptions::default();
        apply(&cfg_items(), &parse("fs = 1"), &mut opts);
        assert!(opts.fullscreen);
        apply(&cfg_items(), &parse("fs = 0"), &mut opts);
        assert!(!opts.fullscreen);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hw.toml");

        let mut opts = HwOptions::default();
        opts.fullscreen = true;
        opts.screen_fsw = 1920;
        opts.screen_fsh = 1080;
        opts.mousespd = 77;
        save(&path, &cfg_items(), &opts).unwrap();

        let mut loaded = HwOptions::default();
        load(&path, &cfg_items(), &mut loaded).unwrap();
        assert!(loaded.fullscreen);
        assert_eq!(loaded.screen_fsw, 1920);
        assert_eq!(loaded.screen_fsh, 1080);
        assert_eq!(loaded.mousespd, 77);
    }

    #[test]
    fn unset_string_is_not_written() {
        let table = to_table(&cfg_items(), &HwOptions::default());
        assert!(!table.contains_key("sdlmixersf"));
        assert_eq!(table.get("mousespd"), Some(&Value::Integer(100)));
    }

    #[cfg(feature = "mixer")]
    #[test]
    fn soundfont_key() {
        let mut opts = HwOptions::default();
        apply(&cfg_items(), &parse("sdlmixersf = \"gm.sf2\""), &mut opts);
        assert_eq!(opts.sdlmixer_sf.as_deref(), Some("gm.sf2"));
        let table = to_table(&cfg_items(), &opts);
        assert_eq!(table.get("sdlmixersf").and_then(Value::as_str), Some("gm.sf2"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = HwOptions::default();
        let err = load(&dir.path().join("nope.toml"), &cfg_items(), &mut opts).unwrap_err();
        assert!(matches!(err, HwError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "fs = = true").unwrap();
        let mut opts = HwOptions::default();
        let err = load(&path, &cfg_items(), &mut opts).unwrap_err();
        assert!(matches!(err, HwError::Parse(_)));
    }
}
