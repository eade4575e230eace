use crate::mouse::{HostButton, MotionSource, TouchPanel, TouchPosition};
use crossbeam_channel::Sender;
use evdev::{AbsoluteAxisType, Device, InputEventKind, Key, RelativeAxisType};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

/// Touch panel size in pixels; absolute device coordinates are scaled to this.
pub const PANEL_W: i32 = 320;
pub const PANEL_H: i32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Motion { dx: i32, dy: i32 },
    Button { button: HostButton, pressed: bool },
    Scroll(i32),
}

/// Last touch sample, written by the reader thread.
pub struct TouchState {
    pub px: AtomicI32,
    pub py: AtomicI32,
}

impl TouchState {
    pub fn new() -> Self {
        Self {
            px: AtomicI32::new(0),
            py: AtomicI32::new(0),
        }
    }
}

impl TouchPanel for TouchState {
    fn read(&self) -> TouchPosition {
        TouchPosition {
            px: self.px.load(Ordering::Relaxed),
            py: self.py.load(Ordering::Relaxed),
        }
    }
}

pub fn host_button(key: Key) -> Option<HostButton> {
    match key {
        Key::BTN_LEFT | Key::BTN_TOUCH => Some(HostButton::Left),
        Key::BTN_MIDDLE => Some(HostButton::Middle),
        Key::BTN_RIGHT => Some(HostButton::Right),
        Key::BTN_SIDE => Some(HostButton::Other(8)),
        Key::BTN_EXTRA => Some(HostButton::Other(9)),
        _ => None,
    }
}

/// Map `value` in `[min, max]` onto `0..size`.
pub fn scale_abs(value: i32, min: i32, max: i32, size: i32) -> i32 {
    if max <= min {
        return 0;
    }
    let v = value.clamp(min, max) as i64 - min as i64;
    let span = max as i64 - min as i64;
    ((v * (size as i64 - 1) + span / 2) / span) as i32
}

/// Find an input device for `source` by enumerating /dev/input/event*.
/// Touch wants ABS_X, ABS_Y and BTN_TOUCH; relative wants REL_X, REL_Y and BTN_LEFT.
pub fn find_input_device(source: MotionSource) -> Option<PathBuf> {
    for i in 0..64 {
        let path = PathBuf::from(format!("/dev/input/event{}", i));
        if !path.exists() {
            continue;
        }
        if let Ok(device) = Device::open(&path) {
            let suitable = match source {
                MotionSource::Touch => {
                    let abs = device.supported_absolute_axes().is_some_and(|axes| {
                        axes.contains(AbsoluteAxisType::ABS_X) && axes.contains(AbsoluteAxisType::ABS_Y)
                    });
                    let touch = device
                        .supported_keys()
                        .is_some_and(|keys| keys.contains(Key::BTN_TOUCH));
                    abs && touch
                }
                MotionSource::Relative => {
                    let rel = device.supported_relative_axes().is_some_and(|axes| {
                        axes.contains(RelativeAxisType::REL_X) && axes.contains(RelativeAxisType::REL_Y)
                    });
                    let left = device
                        .supported_keys()
                        .is_some_and(|keys| keys.contains(Key::BTN_LEFT));
                    rel && left
                }
            };
            if suitable {
                log::info!(
                    "Found {:?} device: {} at {}",
                    source,
                    device.name().unwrap_or("unknown"),
                    path.display()
                );
                return Some(path);
            }
        }
    }
    None
}

#[derive(Debug, Clone, Copy)]
struct AbsRange {
    min: i32,
    max: i32,
}

pub struct InputReader {
    device: Device,
    touch: Arc<TouchState>,
    events: Sender<HostEvent>,
    grab: Arc<AtomicBool>,
    quit: Arc<AtomicBool>,
    grabbed: bool,
    x_range: AbsRange,
    y_range: AbsRange,
}

impl InputReader {
    pub fn new(
        device_path: &str,
        touch: Arc<TouchState>,
        events: Sender<HostEvent>,
        grab: Arc<AtomicBool>,
        quit: Arc<AtomicBool>,
    ) -> std::io::Result<Self> {
        let device = Device::open(device_path)?;
        log::info!(
            "Opened input device: {} ({})",
            device.name().unwrap_or("unknown"),
            device_path
        );

        let mut x_range = AbsRange { min: 0, max: PANEL_W - 1 };
        let mut y_range = AbsRange { min: 0, max: PANEL_H - 1 };
        if device.supported_absolute_axes().is_some() {
            let abs = device.get_abs_state()?;
            let info = |axis: AbsoluteAxisType| {
                abs.get(axis.0 as usize)
                    .map(|a| AbsRange { min: a.minimum, max: a.maximum })
            };
            if let Some(r) = info(AbsoluteAxisType::ABS_X) {
                x_range = r;
            }
            if let Some(r) = info(AbsoluteAxisType::ABS_Y) {
                y_range = r;
            }
            log::debug!("touch range x {:?} y {:?}", x_range, y_range);
        }

        Ok(Self {
            device,
            touch,
            events,
            grab,
            quit,
            grabbed: false,
            x_range,
            y_range,
        })
    }

    /// Apply a pending grab request. Takes effect between event batches.
    fn sync_grab(&mut self) {
        let want = self.grab.load(Ordering::Relaxed);
        if want == self.grabbed {
            return;
        }
        let result = if want { self.device.grab() } else { self.device.ungrab() };
        match result {
            Ok(()) => self.grabbed = want,
            Err(e) => {
                log::warn!("Failed to {} device: {}", if want { "grab" } else { "ungrab" }, e);
                // don't retry on every batch
                self.grabbed = want;
            }
        }
    }

    /// Run the blocking event loop. Call from a dedicated thread.
    pub fn run(&mut self) {
        let mut dx = 0;
        let mut dy = 0;
        let mut touched = false;
        let mut out = Vec::new();

        'read: loop {
            if self.quit.load(Ordering::Relaxed) {
                break;
            }
            self.sync_grab();

            let events: Vec<_> = match self.device.fetch_events() {
                Ok(iter) => iter.collect(),
                Err(e) => {
                    if self.quit.load(Ordering::Relaxed) {
                        break;
                    }
                    // signals interrupt the blocking read with EINTR
                    if e.kind() == std::io::ErrorKind::Interrupted {
                        continue;
                    }
                    log::error!("Error reading input events: {}", e);
                    std::thread::sleep(std::time::Duration::from_millis(10));
                    continue;
                }
            };

            for ev in &events {
                match ev.kind() {
                    InputEventKind::RelAxis(RelativeAxisType::REL_X) => dx += ev.value(),
                    InputEventKind::RelAxis(RelativeAxisType::REL_Y) => dy += ev.value(),
                    // wheel up scrolls back
                    InputEventKind::RelAxis(RelativeAxisType::REL_WHEEL) => {
                        out.push(HostEvent::Scroll(-ev.value()))
                    }
                    InputEventKind::AbsAxis(AbsoluteAxisType::ABS_X) => {
                        let px = scale_abs(ev.value(), self.x_range.min, self.x_range.max, PANEL_W);
                        self.touch.px.store(px, Ordering::Relaxed);
                        touched = true;
                    }
                    InputEventKind::AbsAxis(AbsoluteAxisType::ABS_Y) => {
                        let py = scale_abs(ev.value(), self.y_range.min, self.y_range.max, PANEL_H);
                        self.touch.py.store(py, Ordering::Relaxed);
                        touched = true;
                    }
                    InputEventKind::Key(key) => {
                        // value 2 is autorepeat
                        if let (Some(button), 0 | 1) = (host_button(key), ev.value()) {
                            out.push(HostEvent::Button {
                                button,
                                pressed: ev.value() == 1,
                            });
                        }
                    }
                    InputEventKind::Synchronization(_) => {
                        if dx != 0 || dy != 0 || touched {
                            // motion first so a press lands where the finger is
                            out.insert(0, HostEvent::Motion { dx, dy });
                            dx = 0;
                            dy = 0;
                            touched = false;
                        }
                        for e in out.drain(..) {
                            if self.events.send(e).is_err() {
                                break 'read;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        if self.grabbed {
            let _ = self.device.ungrab();
        }
    }
}
