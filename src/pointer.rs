use std::ops::{BitAnd, BitOr, Not};

/// Pressed-button bit set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);
    pub const LEFT: ButtonMask = ButtonMask(1 << 0);
    pub const RIGHT: ButtonMask = ButtonMask(1 << 1);

    pub fn contains(self, other: ButtonMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ButtonMask {
    type Output = ButtonMask;
    fn bitor(self, rhs: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 | rhs.0)
    }
}

impl BitAnd for ButtonMask {
    type Output = ButtonMask;
    fn bitand(self, rhs: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 & rhs.0)
    }
}

impl Not for ButtonMask {
    type Output = ButtonMask;
    fn not(self) -> ButtonMask {
        ButtonMask(!self.0)
    }
}

/// Where and with what a click started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub buttons: ButtonMask,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct VirtualMouse {
    x: i32,
    y: i32,
    buttons: ButtonMask,
    scroll: i32,
    click: Option<Click>,
    width: i32,
    height: i32,
}

impl VirtualMouse {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            buttons: ButtonMask::NONE,
            scroll: 0,
            click: None,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn set_limits(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.x = self.x.clamp(0, self.width - 1);
        self.y = self.y.clamp(0, self.height - 1);
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    pub fn set_xy_from_hw(&mut self, x: i32, y: i32) {
        self.x = x.clamp(0, self.width - 1);
        self.y = y.clamp(0, self.height - 1);
    }

    /// Newly pressed bits latch a click at the current position.
    pub fn set_buttons_from_hw(&mut self, buttons: ButtonMask) {
        let pressed = buttons & !self.buttons;
        if !pressed.is_empty() {
            self.click = Some(Click {
                buttons: pressed,
                x: self.x,
                y: self.y,
            });
        }
        self.buttons = buttons;
    }

    pub fn set_scroll_from_hw(&mut self, scroll: i32) {
        self.scroll = scroll;
    }

    pub fn take_click(&mut self) -> Option<Click> {
        self.click.take()
    }

    pub fn take_scroll(&mut self) -> i32 {
        std::mem::take(&mut self.scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_clamped_to_game_area() {
        let mut m = VirtualMouse::new(320, 200);
        m.set_xy_from_hw(-4, 250);
        assert_eq!(m.position(), (0, 199));
        m.set_xy_from_hw(400, 10);
        assert_eq!(m.position(), (319, 10));
    }

    #[test]
    fn shrinking_limits_pulls_position_in() {
        let mut m = VirtualMouse::new(640, 400);
        m.set_xy_from_hw(500, 300);
        m.set_limits(320, 200);
        assert_eq!(m.position(), (319, 199));
    }

    #[test]
    fn press_latches_click_once() {
        let mut m = VirtualMouse::new(320, 200);
        m.set_xy_from_hw(10, 20);
        m.set_buttons_from_hw(ButtonMask::LEFT);
        m.set_xy_from_hw(30, 40);
        assert_eq!(
            m.take_click(),
            Some(Click { buttons: ButtonMask::LEFT, x: 10, y: 20 })
        );
        assert_eq!(m.take_click(), None);

        // holding left while pressing right only reports the new button
        m.set_buttons_from_hw(ButtonMask::LEFT | ButtonMask::RIGHT);
        assert_eq!(m.take_click().map(|c| c.buttons), Some(ButtonMask::RIGHT));

        m.set_buttons_from_hw(ButtonMask::NONE);
        assert_eq!(m.take_click(), None);
    }

    #[test]
    fn scroll_is_consumed() {
        let mut m = VirtualMouse::new(320, 200);
        m.set_scroll_from_hw(-1);
        assert_eq!(m.scroll(), -1);
        assert_eq!(m.take_scroll(), -1);
        assert_eq!(m.take_scroll(), 0);
    }
}
