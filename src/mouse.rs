use crate::hw::VideoPort;
use crate::options::HwOptions;
use crate::pointer::{ButtonMask, VirtualMouse};

/// Touch panel rows above the game area (240-line panel, 200-line game).
pub const TOUCH_Y_OFFSET: i32 = 20;

/// Game area size until the video layer says otherwise.
pub const DEFAULT_GAME_W: i32 = 320;
pub const DEFAULT_GAME_H: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

impl HostButton {
    /// SDL numbering: 1 = left, 2 = middle, 3 = right.
    pub fn from_sdl(code: u8) -> Self {
        match code {
            1 => HostButton::Left,
            2 => HostButton::Middle,
            3 => HostButton::Right,
            n => HostButton::Other(n as u16),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchPosition {
    pub px: i32,
    pub py: i32,
}

/// Latest stylus/finger position in panel pixels.
pub trait TouchPanel {
    fn read(&self) -> TouchPosition;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionSource {
    /// Ignore motion deltas and sample the touch panel directly.
    Touch,
    /// Accumulate relative deltas scaled by mouse speed and window scale.
    Relative,
}

/// Translates host pointer events into the game's virtual mouse.
pub struct HwMouse {
    enabled: bool,
    game_w: i32,
    game_h: i32,
    dx_acc: i32,
    dy_acc: i32,
    sx: i32,
    sy: i32,
    source: MotionSource,
    mouse: VirtualMouse,
}

impl HwMouse {
    pub fn new(source: MotionSource) -> Self {
        Self {
            enabled: false,
            game_w: DEFAULT_GAME_W,
            game_h: DEFAULT_GAME_H,
            dx_acc: 0,
            dy_acc: 0,
            sx: 100,
            sy: 100,
            source,
            mouse: VirtualMouse::new(DEFAULT_GAME_W, DEFAULT_GAME_H),
        }
    }

    pub fn is_grabbed(&self) -> bool {
        self.enabled
    }

    pub fn mouse(&self) -> &VirtualMouse {
        &self.mouse
    }

    pub fn mouse_mut(&mut self) -> &mut VirtualMouse {
        &mut self.mouse
    }

    pub fn grab(&mut self, video: &mut dyn VideoPort) {
        if !self.enabled {
            self.enabled = true;
            video.show_cursor(false);
            video.input_grab(true);
            log::info!("Mouse grabbed");
        }
    }

    pub fn ungrab(&mut self, video: &mut dyn VideoPort) {
        if self.enabled {
            self.enabled = false;
            video.show_cursor(true);
            video.input_grab(false);
            log::info!("Mouse released");
        }
    }

    pub fn toggle_grab(&mut self, video: &mut dyn VideoPort) {
        if self.enabled {
            self.ungrab(video);
        } else {
            self.grab(video);
        }
    }

    pub fn set_limits(&mut self, w: i32, h: i32) {
        self.game_w = w.max(1);
        self.game_h = h.max(1);
        self.mouse.set_limits(self.game_w, self.game_h);
    }

    /// Output size in pixels; whole multiples of the game size slow
    /// relative motion down by the same factor.
    pub fn set_scale(&mut self, w: i32, h: i32) {
        self.sx = (w / self.game_w).max(1) * 100;
        self.sy = (h / self.game_h).max(1) * 100;
        log::debug!("mouse scale {}x{}", self.sx, self.sy);
    }

    pub fn move_by(&mut self, dx: i32, dy: i32, opts: &HwOptions, touch: &dyn TouchPanel) {
        match self.source {
            MotionSource::Touch => {
                let t = touch.read();
                self.mouse.set_xy_from_hw(t.px, t.py - TOUCH_Y_OFFSET);
            }
            MotionSource::Relative => {
                self.dx_acc = self.dx_acc.saturating_add(dx.saturating_mul(opts.mousespd));
                let step_x = self.dx_acc / self.sx;
                self.dx_acc %= self.sx;

                self.dy_acc = self.dy_acc.saturating_add(dy.saturating_mul(opts.mousespd));
                let step_y = self.dy_acc / self.sy;
                self.dy_acc %= self.sy;

                if step_x == 0 && step_y == 0 {
                    return;
                }
                let (x, y) = self.mouse.position();
                self.mouse.set_xy_from_hw(x + step_x, y + step_y);
            }
        }
    }

    pub fn button(&mut self, button: HostButton, pressed: bool, video: &mut dyn VideoPort) {
        if self.enabled {
            let bit = match button {
                HostButton::Left => ButtonMask::LEFT,
                HostButton::Right => ButtonMask::RIGHT,
                _ => ButtonMask::NONE,
            };
            let mut b = self.mouse.buttons();
            if pressed {
                b = b | bit;
            } else {
                b = b & !bit;
            }
            self.mouse.set_buttons_from_hw(b);
        }

        if pressed {
            if self.enabled {
                if button == HostButton::Middle {
                    self.ungrab(video);
                }
            } else {
                self.grab(video);
            }
        }
    }

    pub fn scroll(&mut self, scroll: i32) {
        self.mouse.set_scroll_from_hw(scroll);
    }
}
