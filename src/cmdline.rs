use crate::error::{HwError, HwResult};
use crate::hw::OptContext;
use crate::options::HwOptions;

pub type CustomAction = fn(&mut OptContext<'_>, &[String]) -> HwResult<()>;

pub enum CmdlineAction {
    /// Store a fixed value; used for enable/disable flag pairs.
    SetBool(fn(&mut HwOptions, bool), bool),
    SetInt(fn(&mut HwOptions, i32)),
    Custom(CustomAction),
}

/// One single-dash flag, e.g. `-winw WIDTH`.
pub struct CmdlineOption {
    pub name: &'static str,
    pub num_param: usize,
    pub action: CmdlineAction,
    pub param_name: Option<&'static str>,
    pub help: &'static str,
}

impl CmdlineOption {
    fn run(&self, params: &[String], ctx: &mut OptContext<'_>) -> HwResult<()> {
        match &self.action {
            CmdlineAction::SetBool(set, value) => set(ctx.opts, *value),
            CmdlineAction::SetInt(set) => {
                let v = parse_int(self.name, &params[0])?;
                set(ctx.opts, v);
            }
            CmdlineAction::Custom(action) => action(ctx, params)?,
        }
        Ok(())
    }
}

pub fn parse_int(option: &str, param: &str) -> HwResult<i32> {
    param.trim().parse().map_err(|_| HwError::InvalidValue {
        option: option.to_string(),
        value: param.to_string(),
    })
}

/// Apply `args` in order. Stops at the first bad option; options already
/// applied stay applied.
pub fn parse(options: &[CmdlineOption], args: &[String], ctx: &mut OptContext<'_>) -> HwResult<()> {
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        let opt = options
            .iter()
            .find(|o| o.name == arg)
            .ok_or_else(|| HwError::UnknownOption(arg.clone()))?;
        let params = args
            .get(i + 1..i + 1 + opt.num_param)
            .ok_or_else(|| HwError::MissingParam {
                option: opt.name.to_string(),
                expected: opt.num_param,
            })?;
        log::debug!("option {} {:?}", opt.name, params);
        opt.run(params, ctx)?;
        i += 1 + opt.num_param;
    }
    Ok(())
}

pub fn usage(options: &[CmdlineOption]) -> String {
    let heads: Vec<String> = options
        .iter()
        .map(|o| match o.param_name {
            Some(p) => format!("{} {}", o.name, p),
            None => o.name.to_string(),
        })
        .collect();
    let width = heads.iter().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (head, opt) in heads.iter().zip(options) {
        out.push_str(&format!("  {:<width$}  {}\n", head, opt.help, width = width));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::testing::{RecordingAudio, RecordingVideo};
    use crate::options::cmdline_options;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn run(opts: &mut HwOptions, line: &str) -> HwResult<()> {
        let mut video = RecordingVideo::default();
        let mut audio = RecordingAudio::default();
        let mut ctx = OptContext::new(opts, &mut video, &mut audio);
        parse(&cmdline_options(), &args(line), &mut ctx)
    }

    #[test]
    fn fullscreen_and_window_flags() {
        let mut opts = HwOptions::default();
        run(&mut opts, "-fs").unwrap();
        assert!(opts.fullscreen);
        run(&mut opts, "-window").unwrap();
        assert!(!opts.fullscreen);
    }

    #[test]
    fn sizes() {
        let mut opts = HwOptions::default();
        run(&mut opts, "-winw 640 -winh 400 -fsw 1920 -fsh 1080").unwrap();
        assert_eq!(
            (opts.screen_winw, opts.screen_winh, opts.screen_fsw, opts.screen_fsh),
            (640, 400, 1920, 1080)
        );
    }

    #[test]
    fn mouse_speed_out_of_range_is_rejected() {
        let mut opts = HwOptions::default();
        run(&mut opts, "-mousespd 150").unwrap();
        assert_eq!(opts.mousespd, 150);
        for bad in ["0", "201", "-1"] {
            let err = run(&mut opts, &format!("-mousespd {}", bad)).unwrap_err();
            assert!(matches!(err, HwError::Rejected { .. }), "{bad}: {err}");
            assert_eq!(opts.mousespd, 150);
        }
        run(&mut opts, "-mousespd 1").unwrap();
        assert_eq!(opts.mousespd, 1);
    }

    #[test]
    fn non_numeric_parameter() {
        let mut opts = HwOptions::default();
        let err = run(&mut opts, "-winw wide").unwrap_err();
        assert!(matches!(err, HwError::InvalidValue { .. }));
        assert_eq!(opts.screen_winw, 0);
    }

    #[test]
    fn missing_parameter() {
        let mut opts = HwOptions::default();
        let err = run(&mut opts, "-fs -winh").unwrap_err();
        assert!(matches!(err, HwError::MissingParam { expected: 1, .. }));
        assert!(opts.fullscreen);
    }

    #[test]
    fn unknown_option() {
        let mut opts = HwOptions::default();
        let err = run(&mut opts, "-bogus").unwrap_err();
        assert!(matches!(err, HwError::UnknownOption(ref o) if o == "-bogus"));
    }

    #[cfg(feature = "gl")]
    #[test]
    fn gl_flags() {
        let mut opts = HwOptions::default();
        run(&mut opts, "-nogl -bpp 16 -filt 0 -aspect 0").unwrap();
        assert!(!opts.use_gl);
        assert_eq!(opts.bpp, 16);
        assert_eq!(opts.gl_filter, 0);
        assert_eq!(opts.aspect, 0);
        run(&mut opts, "-gl").unwrap();
        assert!(opts.use_gl);
    }

    #[cfg(feature = "mixer")]
    #[test]
    fn soundfont_is_stored_and_forwarded() {
        let mut opts = HwOptions::default();
        let mut video = RecordingVideo::default();
        let mut audio = RecordingAudio::default();
        {
            let mut ctx = OptContext::new(&mut opts, &mut video, &mut audio);
            parse(&cmdline_options(), &args("-sdlmixersf gm.sf2"), &mut ctx).unwrap();
        }
        assert_eq!(opts.sdlmixer_sf.as_deref(), Some("gm.sf2"));
        assert_eq!(audio.soundfont.as_deref(), Some(std::path::Path::new("gm.sf2")));

        audio.reject = true;
        let mut ctx = OptContext::new(&mut opts, &mut video, &mut audio);
        assert!(parse(&cmdline_options(), &args("-sdlmixersf x.sf2"), &mut ctx).is_err());
    }

    #[test]
    fn usage_lists_every_option() {
        let table = cmdline_options();
        let text = usage(&table);
        assert_eq!(text.lines().count(), table.len());
        assert!(text.contains("-winw WIDTH"));
        assert!(text.contains("Set mouse speed (default = 100)"));
        let line = text.lines().find(|l| l.contains("-fs ")).unwrap();
        assert!(line.trim_start().starts_with("-fs"));
        assert!(line.ends_with("Enable fullscreen"));
    }
}
