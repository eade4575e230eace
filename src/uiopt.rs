//! In-UI option items: actions, sliders, toggles and cycles.

use crate::hw::OptContext;
use crate::options::HwOptions;

pub type UiAction = fn(&mut OptContext<'_>) -> bool;

pub enum UiOptKind {
    Func(UiAction),
    SliderInt {
        get: fn(&HwOptions) -> i32,
        set: fn(&mut HwOptions, i32),
        min: i32,
        max: i32,
    },
    Bool {
        get: fn(&HwOptions) -> bool,
        toggle: UiAction,
    },
    Cycle {
        get: fn(&HwOptions) -> &'static str,
        next: UiAction,
    },
}

pub struct UiOpt {
    /// Sliders are unnamed and belong to the item before them.
    pub name: Option<&'static str>,
    pub kind: UiOptKind,
}

impl UiOpt {
    pub fn func(name: &'static str, action: UiAction) -> Self {
        Self { name: Some(name), kind: UiOptKind::Func(action) }
    }

    pub fn slider_int(
        get: fn(&HwOptions) -> i32,
        set: fn(&mut HwOptions, i32),
        min: i32,
        max: i32,
    ) -> Self {
        Self { name: None, kind: UiOptKind::SliderInt { get, set, min, max } }
    }

    pub fn bool(name: &'static str, get: fn(&HwOptions) -> bool, toggle: UiAction) -> Self {
        Self { name: Some(name), kind: UiOptKind::Bool { get, toggle } }
    }

    pub fn cycle(name: &'static str, get: fn(&HwOptions) -> &'static str, next: UiAction) -> Self {
        Self { name: Some(name), kind: UiOptKind::Cycle { get, next } }
    }

    pub fn value_text(&self, opts: &HwOptions) -> String {
        match &self.kind {
            UiOptKind::Func(_) => String::new(),
            UiOptKind::SliderInt { get, .. } => get(opts).to_string(),
            UiOptKind::Bool { get, .. } => (if get(opts) { "On" } else { "Off" }).to_string(),
            UiOptKind::Cycle { get, .. } => get(opts).to_string(),
        }
    }

    /// Run the item's action. Sliders have none and report false.
    pub fn activate(&self, ctx: &mut OptContext<'_>) -> bool {
        match &self.kind {
            UiOptKind::Func(action) => action(ctx),
            UiOptKind::Bool { toggle, .. } => toggle(ctx),
            UiOptKind::Cycle { next, .. } => next(ctx),
            UiOptKind::SliderInt { .. } => false,
        }
    }

    /// Move a slider by `delta`, clamped to its range.
    pub fn slide(&self, opts: &mut HwOptions, delta: i32) -> bool {
        match &self.kind {
            UiOptKind::SliderInt { get, set, min, max } => {
                let v = get(opts).saturating_add(delta).clamp(*min, *max);
                set(opts, v);
                true
            }
            _ => false,
        }
    }
}

pub fn find<'a>(items: &'a [UiOpt], name: &str) -> Option<&'a UiOpt> {
    items
        .iter()
        .find(|item| item.name.is_some_and(|n| n.eq_ignore_ascii_case(name)))
}

/// The slider that follows a named item, if any.
pub fn slider_for<'a>(items: &'a [UiOpt], name: &str) -> Option<&'a UiOpt> {
    let pos = items
        .iter()
        .position(|item| item.name.is_some_and(|n| n.eq_ignore_ascii_case(name)))?;
    items
        .get(pos + 1)
        .filter(|item| matches!(item.kind, UiOptKind::SliderInt { .. }))
}

/// One line per item, as a settings menu would show it.
pub fn describe(items: &[UiOpt], opts: &HwOptions) -> String {
    let mut out = String::new();
    for item in items {
        let value = item.value_text(opts);
        match item.name {
            Some(name) if value.is_empty() => out.push_str(&format!("  {}\n", name)),
            Some(name) => out.push_str(&format!("  {:<12}{}\n", name, value)),
            None => out.push_str(&format!("    [{}]\n", value)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::testing::{RecordingAudio, RecordingVideo};
    use crate::options::{ui_options, MOUSE_SPEED_DEFAULT, MOUSE_SPEED_MAX};

    #[test]
    fn mouse_speed_func_resets_default() {
        let items = ui_options();
        let mut opts = HwOptions { mousespd: 5, ..HwOptions::default() };
        let mut video = RecordingVideo::default();
        let mut audio = RecordingAudio::default();
        let mut ctx = OptContext::new(&mut opts, &mut video, &mut audio);
        assert!(find(&items, "mouse spd").unwrap().activate(&mut ctx));
        assert_eq!(opts.mousespd, MOUSE_SPEED_DEFAULT);
    }

    #[test]
    fn mouse_speed_slider_is_clamped() {
        let items = ui_options();
        let slider = slider_for(&items, "Mouse spd").unwrap();
        let mut opts = HwOptions::default();
        assert!(slider.slide(&mut opts, 500));
        assert_eq!(opts.mousespd, MOUSE_SPEED_MAX);
        assert!(slider.slide(&mut opts, -1000));
        assert_eq!(opts.mousespd, 1);
        assert_eq!(slider.value_text(&opts), "1");
    }

    #[test]
    fn fullscreen_goes_through_video() {
        let items = ui_options();
        let item = find(&items, "Fullscreen").unwrap();
        let mut opts = HwOptions::default();
        let mut video = RecordingVideo::default();
        let mut audio = RecordingAudio::default();
        assert_eq!(item.value_text(&opts), "Off");
        {
            let mut ctx = OptContext::new(&mut opts, &mut video, &mut audio);
            assert!(item.activate(&mut ctx));
        }
        assert!(opts.fullscreen);
        assert_eq!(video.fullscreen_toggles, 1);
        assert_eq!(item.value_text(&opts), "On");
    }

    #[test]
    fn slider_does_not_activate_and_func_does_not_slide() {
        let items = ui_options();
        let mut opts = HwOptions::default();
        assert!(!find(&items, "Mouse spd").unwrap().slide(&mut opts, 1));
        let mut video = RecordingVideo::default();
        let mut audio = RecordingAudio::default();
        let mut ctx = OptContext::new(&mut opts, &mut video, &mut audio);
        assert!(!slider_for(&items, "Mouse spd").unwrap().activate(&mut ctx));
    }

    #[test]
    fn describe_shows_values() {
        let text = describe(&ui_options(), &HwOptions::default());
        assert!(text.contains("Mouse spd"));
        assert!(text.contains("[100]"));
        assert!(text.contains("Fullscreen  Off"));
    }
}
