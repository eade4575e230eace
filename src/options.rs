//! Hardware-layer options and the tables that expose them.
//!
//! The same settings are reachable three ways: config-file keys
//! ([`cfg_items`]), in-UI items ([`ui_options`]) and single-dash command-line
//! flags ([`cmdline_options`]). The `gl` and `mixer` features add the
//! renderer and soundfont entries.

use crate::cfgfile::CfgItem;
use crate::cmdline::{CmdlineAction, CmdlineOption};
use crate::error::{HwError, HwResult};
use crate::hw::OptContext;
use crate::uiopt::UiOpt;

pub const MOUSE_SPEED_MAX: i32 = 200;
pub const MOUSE_SPEED_DEFAULT: i32 = 100;

/// 320x200 shown on a 4:3 screen, times 1000000.
pub const DEFAULT_ASPECT: i32 = 833_333;
pub const ASPECT_SQUARE: i32 = 1_000_000;
pub const ASPECT_OFF: i32 = 0;

pub const DEFAULT_FULLSCREEN: bool = false;

#[cfg(feature = "gl")]
const GL_FILTER_NAMES: [&str; 2] = ["Nearest", "Linear"];

#[derive(Debug, Clone, PartialEq)]
pub struct HwOptions {
    pub fullscreen: bool,
    /// Window size, 0 = derive from the game size.
    pub screen_winw: i32,
    pub screen_winh: i32,
    /// Fullscreen mode size, 0 = desktop size.
    pub screen_fsw: i32,
    pub screen_fsh: i32,
    pub mousespd: i32,
    /// Aspect ratio times 1000000, 0 = off.
    pub aspect: i32,
    pub sdlmixer_sf: Option<String>,
    pub use_gl: bool,
    /// Bits per pixel, 0 = autodetect.
    pub bpp: i32,
    /// 0 = nearest, 1 = linear.
    pub gl_filter: i32,
}

impl Default for HwOptions {
    fn default() -> Self {
        Self {
            fullscreen: DEFAULT_FULLSCREEN,
            screen_winw: 0,
            screen_winh: 0,
            screen_fsw: 0,
            screen_fsh: 0,
            mousespd: MOUSE_SPEED_DEFAULT,
            aspect: DEFAULT_ASPECT,
            sdlmixer_sf: None,
            use_gl: true,
            bpp: 0,
            gl_filter: 1,
        }
    }
}

pub fn check_mouse_speed(v: i32) -> bool {
    if v > 0 && v <= MOUSE_SPEED_MAX {
        true
    } else {
        log::error!("invalid mousespd {}, must be 0 < N <= {}", v, MOUSE_SPEED_MAX);
        false
    }
}

#[cfg(feature = "gl")]
pub fn check_gl_filter(v: i32) -> bool {
    if (0..GL_FILTER_NAMES.len() as i32).contains(&v) {
        true
    } else {
        log::error!("invalid filter {}, must be 0 (nearest) or 1 (linear)", v);
        false
    }
}

// Config file

#[cfg(feature = "mixer")]
fn soundfont(o: &HwOptions) -> Option<&str> {
    o.sdlmixer_sf.as_deref()
}

pub fn cfg_items() -> Vec<CfgItem> {
    let mut items = vec![
        CfgItem::bool("fs", |o| o.fullscreen, |o, v| o.fullscreen = v),
        CfgItem::int("winw", |o| o.screen_winw, |o, v| o.screen_winw = v, None),
        CfgItem::int("winh", |o| o.screen_winh, |o, v| o.screen_winh = v, None),
        CfgItem::int("fsw", |o| o.screen_fsw, |o, v| o.screen_fsw = v, None),
        CfgItem::int("fsh", |o| o.screen_fsh, |o, v| o.screen_fsh = v, None),
        CfgItem::int(
            "mousespd",
            |o| o.mousespd,
            |o, v| o.mousespd = v,
            Some(check_mouse_speed),
        ),
    ];
    #[cfg(feature = "mixer")]
    items.push(CfgItem::string("sdlmixersf", soundfont, |o, v| {
        o.sdlmixer_sf = Some(v)
    }));
    #[cfg(feature = "gl")]
    items.push(CfgItem::int("aspect", |o| o.aspect, |o, v| o.aspect = v, None));
    items.extend(cfg_items_extra());
    items
}

pub fn cfg_items_extra() -> Vec<CfgItem> {
    #[cfg(feature = "gl")]
    {
        vec![
            CfgItem::bool("gl", |o| o.use_gl, |o, v| o.use_gl = v),
            CfgItem::int("bpp", |o| o.bpp, |o, v| o.bpp = v, None),
            CfgItem::int(
                "filter",
                |o| o.gl_filter,
                |o, v| o.gl_filter = v,
                Some(check_gl_filter),
            ),
        ]
    }
    #[cfg(not(feature = "gl"))]
    {
        Vec::new()
    }
}

// UI

fn ui_reset_mouse_speed(ctx: &mut OptContext<'_>) -> bool {
    ctx.opts.mousespd = MOUSE_SPEED_DEFAULT;
    true
}

fn ui_toggle_fullscreen(ctx: &mut OptContext<'_>) -> bool {
    ctx.video.toggle_fullscreen(ctx.opts)
}

#[cfg(feature = "gl")]
pub fn aspect_label(o: &HwOptions) -> &'static str {
    match o.aspect {
        DEFAULT_ASPECT => "VGA",
        ASPECT_SQUARE => "1:1",
        ASPECT_OFF => "Off",
        _ => "Custom",
    }
}

#[cfg(feature = "gl")]
fn ui_next_aspect(ctx: &mut OptContext<'_>) -> bool {
    ctx.opts.aspect = match ctx.opts.aspect {
        DEFAULT_ASPECT => ASPECT_SQUARE,
        ASPECT_SQUARE => ASPECT_OFF,
        _ => DEFAULT_ASPECT,
    };
    ctx.video.update_aspect(ctx.opts)
}

#[cfg(feature = "gl")]
pub fn filter_label(o: &HwOptions) -> &'static str {
    GL_FILTER_NAMES
        .get(o.gl_filter as usize)
        .copied()
        .unwrap_or(GL_FILTER_NAMES[0])
}

#[cfg(feature = "gl")]
fn ui_next_filter(ctx: &mut OptContext<'_>) -> bool {
    let f = ctx.opts.gl_filter;
    ctx.opts.gl_filter = if (0..=1).contains(&f) { (f + 1) % 2 } else { 0 };
    true
}

pub fn ui_options() -> Vec<UiOpt> {
    let mut items = vec![
        UiOpt::func("Mouse spd", ui_reset_mouse_speed),
        UiOpt::slider_int(|o| o.mousespd, |o, v| o.mousespd = v, 1, MOUSE_SPEED_MAX),
        UiOpt::bool("Fullscreen", |o| o.fullscreen, ui_toggle_fullscreen),
    ];
    #[cfg(feature = "gl")]
    items.push(UiOpt::cycle("Aspect", aspect_label, ui_next_aspect));
    items.extend(ui_options_extra());
    items
}

pub fn ui_options_extra() -> Vec<UiOpt> {
    #[cfg(feature = "gl")]
    {
        vec![UiOpt::cycle("Filter", filter_label, ui_next_filter)]
    }
    #[cfg(not(feature = "gl"))]
    {
        Vec::new()
    }
}

// Command line

fn set_mouse_speed(ctx: &mut OptContext<'_>, params: &[String]) -> HwResult<()> {
    let v = crate::cmdline::parse_int("-mousespd", &params[0])?;
    if !check_mouse_speed(v) {
        return Err(HwError::Rejected {
            option: "-mousespd".into(),
            value: v as i64,
        });
    }
    ctx.opts.mousespd = v;
    Ok(())
}

#[cfg(feature = "gl")]
fn set_gl_filter(ctx: &mut OptContext<'_>, params: &[String]) -> HwResult<()> {
    let v = crate::cmdline::parse_int("-filt", &params[0])?;
    if !check_gl_filter(v) {
        return Err(HwError::Rejected {
            option: "-filt".into(),
            value: v as i64,
        });
    }
    ctx.opts.gl_filter = v;
    Ok(())
}

#[cfg(feature = "mixer")]
fn set_soundfont(ctx: &mut OptContext<'_>, params: &[String]) -> HwResult<()> {
    ctx.opts.sdlmixer_sf = Some(params[0].clone());
    ctx.audio.set_soundfont(std::path::Path::new(&params[0]))
}

fn flag(
    name: &'static str,
    set: fn(&mut HwOptions, bool),
    value: bool,
    help: &'static str,
) -> CmdlineOption {
    CmdlineOption {
        name,
        num_param: 0,
        action: CmdlineAction::SetBool(set, value),
        param_name: None,
        help,
    }
}

fn param(
    name: &'static str,
    action: CmdlineAction,
    param_name: &'static str,
    help: &'static str,
) -> CmdlineOption {
    CmdlineOption {
        name,
        num_param: 1,
        action,
        param_name: Some(param_name),
        help,
    }
}

pub fn cmdline_options() -> Vec<CmdlineOption> {
    let fullscreen: fn(&mut HwOptions, bool) = |o, v| o.fullscreen = v;
    let mut options = vec![
        flag("-fs", fullscreen, true, "Enable fullscreen"),
        flag("-window", fullscreen, false, "Use windowed mode"),
        param(
            "-winw",
            CmdlineAction::SetInt(|o, v| o.screen_winw = v),
            "WIDTH",
            "Set window width",
        ),
        param(
            "-winh",
            CmdlineAction::SetInt(|o, v| o.screen_winh = v),
            "HEIGHT",
            "Set window height",
        ),
        param(
            "-fsw",
            CmdlineAction::SetInt(|o, v| o.screen_fsw = v),
            "WIDTH",
            "Set fullscreen width",
        ),
        param(
            "-fsh",
            CmdlineAction::SetInt(|o, v| o.screen_fsh = v),
            "HEIGHT",
            "Set fullscreen height",
        ),
        param(
            "-mousespd",
            CmdlineAction::Custom(set_mouse_speed),
            "SPEED",
            "Set mouse speed (default = 100)",
        ),
    ];
    #[cfg(feature = "mixer")]
    options.push(param(
        "-sdlmixersf",
        CmdlineAction::Custom(set_soundfont),
        "FILE.SF2",
        "Set SDL_mixer soundfont",
    ));
    #[cfg(feature = "gl")]
    options.push(param(
        "-aspect",
        CmdlineAction::SetInt(|o, v| o.aspect = v),
        "ASPECT",
        "Set aspect ratio (*1000000, 0 = off)",
    ));
    options.extend(cmdline_options_extra());
    options
}

pub fn cmdline_options_extra() -> Vec<CmdlineOption> {
    #[cfg(feature = "gl")]
    {
        let use_gl: fn(&mut HwOptions, bool) = |o, v| o.use_gl = v;
        vec![
            flag("-gl", use_gl, true, "Enable OpenGL"),
            flag("-nogl", use_gl, false, "Disable OpenGL"),
            param(
                "-bpp",
                CmdlineAction::SetInt(|o, v| o.bpp = v),
                "BPP",
                "Set bits/pixel (0 = autodetect)",
            ),
            param(
                "-filt",
                CmdlineAction::Custom(set_gl_filter),
                "FILTER",
                "Set OpenGL filter (0 = nearest, 1 = linear)",
            ),
        ]
    }
    #[cfg(not(feature = "gl"))]
    {
        Vec::new()
    }
}
