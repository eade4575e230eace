mod cfgfile;
mod cmdline;
mod config;
mod device;
mod error;
mod host;
mod hw;
mod mouse;
mod options;
mod pointer;
mod uiopt;
mod virtual_mouse;

use clap::Parser;
use config::{Config, Mode};
use crossbeam_channel::TryRecvError;
use device::{find_input_device, HostEvent, InputReader, TouchState};
use error::{HwError, HwResult};
use host::{EvdevVideo, SoundfontAudio};
use hw::{AudioPort, OptContext};
use mouse::{HwMouse, MotionSource};
use options::HwOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use virtual_mouse::VirtualMouseDevice;

static QUIT: AtomicBool = AtomicBool::new(false);
static TOGGLE: AtomicBool = AtomicBool::new(false);

fn main() {
    // Handle "hwport toggle" / "hwport quit" before clap parsing.
    // These send a signal to the running instance and exit immediately.
    if let Some(cmd) = std::env::args().nth(1) {
        match cmd.as_str() {
            "toggle" => {
                send_to_running(libc::SIGUSR1, "Toggle");
                return;
            }
            "quit" => {
                send_to_running(libc::SIGTERM, "Quit");
                return;
            }
            _ => {}
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = Config::parse();

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Output size the mouse is scaled against; 0 means "same as the game".
fn output_size(opts: &HwOptions, game_w: i32, game_h: i32) -> (i32, i32) {
    let (w, h) = if opts.fullscreen {
        (opts.screen_fsw, opts.screen_fsh)
    } else {
        (opts.screen_winw, opts.screen_winh)
    };
    (
        if w > 0 { w } else { game_w },
        if h > 0 { h } else { game_h },
    )
}

/// Config file, then command line, then UI activations.
fn load_options(
    config: &Config,
    video: &mut EvdevVideo,
    audio: &mut SoundfontAudio,
) -> HwResult<HwOptions> {
    let cfg_items = options::cfg_items();
    let cmdline_options = options::cmdline_options();
    let ui_options = options::ui_options();

    let mut opts = HwOptions::default();
    if let Some(path) = &config.config {
        if path.exists() {
            cfgfile::load(path, &cfg_items, &mut opts)?;
        } else {
            log::info!("{} not found, using defaults", path.display());
        }
    }
    let cfg_soundfont = opts.sdlmixer_sf.clone();

    {
        let mut ctx = OptContext::new(&mut opts, video, audio);
        if let Err(e) = cmdline::parse(&cmdline_options, &config.hw_args, &mut ctx) {
            eprintln!("Hardware options:\n{}", cmdline::usage(&cmdline_options));
            return Err(e);
        }
        for label in &config.ui {
            match uiopt::find(&ui_options, label) {
                Some(item) => {
                    if !item.activate(&mut ctx) {
                        log::warn!("UI option {} could not be applied", label);
                    }
                }
                None => log::warn!("No UI option named {:?}", label),
            }
        }
    }

    // A soundfont from the file has not been handed to the mixer yet.
    if let Some(sf) = cfg_soundfont {
        if audio.soundfont().is_none() && opts.sdlmixer_sf.as_deref() == Some(sf.as_str()) {
            if let Err(e) = audio.set_soundfont(std::path::Path::new(&sf)) {
                log::warn!("{}", e);
            }
        }
    }

    if config.save_config {
        match &config.config {
            Some(path) => cfgfile::save(path, &cfg_items, &opts)?,
            None => log::warn!("--save-config needs --config"),
        }
    }

    Ok(opts)
}

fn run(config: &Config) -> HwResult<()> {
    if config.list_options {
        println!("Hardware options:\n{}", cmdline::usage(&options::cmdline_options()));
        println!("UI options:\n{}", uiopt::describe(&options::ui_options(), &HwOptions::default()));
        return Ok(());
    }

    let grab = Arc::new(AtomicBool::new(false));
    let mut video = EvdevVideo::new(Arc::clone(&grab));
    let mut audio = SoundfontAudio::default();
    let opts = load_options(config, &mut video, &mut audio)?;

    let source = match config.mode {
        Mode::Touch => MotionSource::Touch,
        Mode::Mouse => MotionSource::Relative,
    };

    println!("hwport - touch/mouse hardware layer");
    println!("  Mode:        {:?}", config.mode);
    println!("  Game area:   {}x{}", config.game_width, config.game_height);
    println!("  Mouse speed: {}", opts.mousespd);
    println!();

    signal_setup();

    let device_path = match &config.device {
        Some(path) => path.clone(),
        None => match find_input_device(source) {
            Some(p) => {
                let s = p.to_string_lossy().to_string();
                log::info!("Auto-detected input device: {}", s);
                s
            }
            None => {
                log::error!("Are you in the 'input' group? Try: sudo usermod -aG input $USER");
                return Err(HwError::Device(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no {:?} input device found", config.mode),
                )));
            }
        },
    };

    let mut hw = HwMouse::new(source);
    hw.set_limits(config.game_width, config.game_height);
    let (out_w, out_h) = output_size(&opts, config.game_width, config.game_height);
    hw.set_scale(out_w, out_h);

    let mut output = VirtualMouseDevice::new(config.game_width, config.game_height).map_err(|e| {
        log::error!("Do you have /dev/uinput access? Try: sudo modprobe uinput");
        HwError::Device(e)
    })?;

    // Spawn input reader thread
    let touch = Arc::new(TouchState::new());
    let reader_quit = Arc::new(AtomicBool::new(false));
    let (tx, rx) = crossbeam_channel::unbounded::<HostEvent>();
    let reader = {
        let touch = Arc::clone(&touch);
        let grab = Arc::clone(&grab);
        let quit = Arc::clone(&reader_quit);
        let path = device_path.clone();
        std::thread::Builder::new()
            .name("input-reader".into())
            .spawn(move || match InputReader::new(&path, touch, tx, grab, quit) {
                Ok(mut reader) => reader.run(),
                Err(e) => {
                    log::error!("Failed to open input device: {}", e);
                    log::error!("Check permissions on {}", path);
                }
            })?
    };

    println!("Tap or click to grab; middle button releases.");
    println!("Toggle: hwport toggle");
    println!("Quit:   hwport quit");
    println!();

    // 1kHz poll loop, the translator only runs here
    let tick = Duration::from_micros(1000);
    'poll: loop {
        let tick_start = std::time::Instant::now();

        if QUIT.load(Ordering::Relaxed) {
            break;
        }
        if TOGGLE
            .compare_exchange(true, false, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            hw.toggle_grab(&mut video);
        }

        loop {
            match rx.try_recv() {
                Ok(HostEvent::Motion { dx, dy }) => hw.move_by(dx, dy, &opts, touch.as_ref()),
                Ok(HostEvent::Button { button, pressed }) => hw.button(button, pressed, &mut video),
                Ok(HostEvent::Scroll(n)) => hw.scroll(n),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("Input reader stopped");
                    break 'poll;
                }
            }
        }

        if hw.is_grabbed() {
            if let Some(click) = hw.mouse_mut().take_click() {
                log::debug!("click {:?} at ({}, {})", click.buttons, click.x, click.y);
            }
            if let Err(e) = output.publish(hw.mouse_mut()) {
                log::warn!("Failed to emit mouse state: {}", e);
            }
        }

        let elapsed = tick_start.elapsed();
        if elapsed < tick {
            spin_sleep::sleep(tick - elapsed);
        }
    }

    log::info!("Shutting down...");
    hw.ungrab(&mut video);
    reader_quit.store(true, Ordering::Relaxed);
    // the reader may sit in a blocking read; it exits on its next event
    drop(reader);
    log::info!("Done");
    Ok(())
}

fn signal_setup() {
    unsafe {
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGUSR1, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(sig: libc::c_int) {
    match sig {
        libc::SIGUSR1 => TOGGLE.store(true, Ordering::Relaxed),
        _ => QUIT.store(true, Ordering::Relaxed),
    }
}

/// Find PID of a running hwport instance by scanning /proc.
fn find_running_instance() -> Option<i32> {
    let my_pid = std::process::id() as i32;
    for entry in std::fs::read_dir("/proc").ok()? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let pid: i32 = match entry.file_name().to_str().and_then(|s| s.parse().ok()) {
            Some(p) => p,
            None => continue,
        };
        if pid == my_pid {
            continue;
        }
        if let Ok(comm) = std::fs::read_to_string(entry.path().join("comm")) {
            if comm.trim() == "hwport" {
                return Some(pid);
            }
        }
    }
    None
}

/// Send a signal to the running hwport instance, or exit with an error.
fn send_to_running(sig: libc::c_int, action: &str) {
    match find_running_instance() {
        Some(pid) => {
            let ret = unsafe { libc::kill(pid, sig) };
            if ret == 0 {
                eprintln!("{} sent to hwport (pid {})", action, pid);
            } else {
                eprintln!("Failed to send signal to hwport (pid {})", pid);
                std::process::exit(1);
            }
        }
        None => {
            eprintln!("No running hwport instance found");
            std::process::exit(1);
        }
    }
}
