use crate::pointer::{ButtonMask, VirtualMouse};
use evdev::uinput::VirtualDeviceBuilder;
use evdev::{
    AbsInfo, AbsoluteAxisType, AttributeSet, BusType, EventType, InputEvent, InputId, Key,
    RelativeAxisType, UinputAbsSetup,
};

/// What was last written to uinput.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Published {
    x: i32,
    y: i32,
    buttons: ButtonMask,
}

/// uinput absolute pointer that mirrors the virtual mouse.
pub struct VirtualMouseDevice {
    device: evdev::uinput::VirtualDevice,
    last: Option<Published>,
}

impl VirtualMouseDevice {
    pub fn new(width: i32, height: i32) -> std::io::Result<Self> {
        let abs = |axis: AbsoluteAxisType, size: i32| -> UinputAbsSetup {
            UinputAbsSetup::new(axis, AbsInfo::new(0, 0, size.max(1) - 1, 0, 0, 1))
        };

        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        keys.insert(Key::BTN_RIGHT);

        let mut rel = AttributeSet::<RelativeAxisType>::new();
        rel.insert(RelativeAxisType::REL_WHEEL);

        let device = VirtualDeviceBuilder::new()?
            .name("hwport Mouse")
            .input_id(InputId::new(BusType::BUS_VIRTUAL, 0x1234, 0x5679, 1))
            .with_keys(&keys)?
            .with_absolute_axis(&abs(AbsoluteAxisType::ABS_X, width))?
            .with_absolute_axis(&abs(AbsoluteAxisType::ABS_Y, height))?
            .with_relative_axes(&rel)?
            .build()?;

        log::info!("Created virtual mouse ({}x{})", width, height);

        Ok(Self { device, last: None })
    }

    /// Emit whatever changed since the last call, plus any pending scroll.
    pub fn publish(&mut self, mouse: &mut VirtualMouse) -> std::io::Result<()> {
        let (x, y) = mouse.position();
        let now = Published {
            x,
            y,
            buttons: mouse.buttons(),
        };
        let events = diff_events(self.last, now, mouse.take_scroll());
        if events.is_empty() {
            return Ok(());
        }
        self.device.emit(&events)?;
        self.last = Some(now);
        Ok(())
    }
}

fn diff_events(last: Option<Published>, now: Published, scroll: i32) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let changed = |f: fn(&Published) -> i32| last.map_or(true, |l| f(&l) != f(&now));

    if changed(|p| p.x) {
        events.push(InputEvent::new_now(EventType::ABSOLUTE, AbsoluteAxisType::ABS_X.0, now.x));
    }
    if changed(|p| p.y) {
        events.push(InputEvent::new_now(EventType::ABSOLUTE, AbsoluteAxisType::ABS_Y.0, now.y));
    }
    for (bit, key) in [(ButtonMask::LEFT, Key::BTN_LEFT), (ButtonMask::RIGHT, Key::BTN_RIGHT)] {
        let was = last.is_some_and(|l| l.buttons.contains(bit));
        let is = now.buttons.contains(bit);
        if was != is {
            events.push(InputEvent::new_now(EventType::KEY, key.code(), is as i32));
        }
    }
    if scroll != 0 {
        // wheel up is positive on the wire
        events.push(InputEvent::new_now(
            EventType::RELATIVE,
            RelativeAxisType::REL_WHEEL.0,
            -scroll,
        ));
    }
    if !events.is_empty() {
        events.push(InputEvent::new_now(EventType::SYNCHRONIZATION, 0, 0));
    }
    events
}
