//! Translation between OS hook identifiers, the engine's device-neutral
//! codes, and enigo's emulation keys.

use auto_grind_core::{Axis, KeyCode, MouseButton, PadButton};

/// Engine key for an rdev key. Keys with no named code keep their rdev
/// scan code as [`KeyCode::Other`].
pub(crate) fn key_from_rdev(key: rdev::Key) -> KeyCode {
    use rdev::Key;

    match key {
        Key::KeyA => KeyCode::KeyA,
        Key::KeyB => KeyCode::KeyB,
        Key::KeyC => KeyCode::KeyC,
        Key::KeyD => KeyCode::KeyD,
        Key::KeyE => KeyCode::KeyE,
        Key::KeyF => KeyCode::KeyF,
        Key::KeyG => KeyCode::KeyG,
        Key::KeyH => KeyCode::KeyH,
        Key::KeyI => KeyCode::KeyI,
        Key::KeyJ => KeyCode::KeyJ,
        Key::KeyK => KeyCode::KeyK,
        Key::KeyL => KeyCode::KeyL,
        Key::KeyM => KeyCode::KeyM,
        Key::KeyN => KeyCode::KeyN,
        Key::KeyO => KeyCode::KeyO,
        Key::KeyP => KeyCode::KeyP,
        Key::KeyQ => KeyCode::KeyQ,
        Key::KeyR => KeyCode::KeyR,
        Key::KeyS => KeyCode::KeyS,
        Key::KeyT => KeyCode::KeyT,
        Key::KeyU => KeyCode::KeyU,
        Key::KeyV => KeyCode::KeyV,
        Key::KeyW => KeyCode::KeyW,
        Key::KeyX => KeyCode::KeyX,
        Key::KeyY => KeyCode::KeyY,
        Key::KeyZ => KeyCode::KeyZ,
        Key::Num0 | Key::Kp0 => KeyCode::Digit0,
        Key::Num1 | Key::Kp1 => KeyCode::Digit1,
        Key::Num2 | Key::Kp2 => KeyCode::Digit2,
        Key::Num3 | Key::Kp3 => KeyCode::Digit3,
        Key::Num4 | Key::Kp4 => KeyCode::Digit4,
        Key::Num5 | Key::Kp5 => KeyCode::Digit5,
        Key::Num6 | Key::Kp6 => KeyCode::Digit6,
        Key::Num7 | Key::Kp7 => KeyCode::Digit7,
        Key::Num8 | Key::Kp8 => KeyCode::Digit8,
        Key::Num9 | Key::Kp9 => KeyCode::Digit9,
        Key::F1 => KeyCode::F1,
        Key::F2 => KeyCode::F2,
        Key::F3 => KeyCode::F3,
        Key::F4 => KeyCode::F4,
        Key::F5 => KeyCode::F5,
        Key::F6 => KeyCode::F6,
        Key::F7 => KeyCode::F7,
        Key::F8 => KeyCode::F8,
        Key::F9 => KeyCode::F9,
        Key::F10 => KeyCode::F10,
        Key::F11 => KeyCode::F11,
        Key::F12 => KeyCode::F12,
        Key::Return | Key::KpReturn => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Space => KeyCode::Space,
        Key::Tab => KeyCode::Tab,
        Key::Backspace => KeyCode::Backspace,
        Key::Delete | Key::KpDelete => KeyCode::Delete,
        Key::Insert => KeyCode::Insert,
        Key::Home => KeyCode::Home,
        Key::End => KeyCode::End,
        Key::PageUp => KeyCode::PageUp,
        Key::PageDown => KeyCode::PageDown,
        Key::UpArrow => KeyCode::ArrowUp,
        Key::DownArrow => KeyCode::ArrowDown,
        Key::LeftArrow => KeyCode::ArrowLeft,
        Key::RightArrow => KeyCode::ArrowRight,
        Key::CapsLock => KeyCode::CapsLock,
        Key::ShiftLeft => KeyCode::ShiftLeft,
        Key::ShiftRight => KeyCode::ShiftRight,
        Key::ControlLeft => KeyCode::ControlLeft,
        Key::ControlRight => KeyCode::ControlRight,
        Key::Alt => KeyCode::AltLeft,
        Key::AltGr => KeyCode::AltRight,
        Key::MetaLeft => KeyCode::MetaLeft,
        Key::MetaRight => KeyCode::MetaRight,
        Key::Minus | Key::KpMinus => KeyCode::Minus,
        Key::Equal => KeyCode::Equal,
        Key::LeftBracket => KeyCode::BracketLeft,
        Key::RightBracket => KeyCode::BracketRight,
        Key::BackSlash | Key::IntlBackslash => KeyCode::Backslash,
        Key::SemiColon => KeyCode::Semicolon,
        Key::Quote => KeyCode::Quote,
        Key::BackQuote => KeyCode::Backquote,
        Key::Comma => KeyCode::Comma,
        Key::Dot => KeyCode::Period,
        Key::Slash | Key::KpDivide => KeyCode::Slash,
        Key::Unknown(code) => KeyCode::Other(code),
        // Remaining keypad and lock keys have no engine code.
        other => KeyCode::Other(fallback_code(other)),
    }
}

/// Stable code for rdev keys without an engine name, offset past the
/// platform scan code range rdev reports through `Unknown`.
fn fallback_code(key: rdev::Key) -> u32 {
    use rdev::Key;

    0x1_0000
        + match key {
            Key::PrintScreen => 1,
            Key::ScrollLock => 2,
            Key::Pause => 3,
            Key::NumLock => 4,
            Key::KpPlus => 5,
            Key::KpMultiply => 6,
            Key::Function => 7,
            _ => 0,
        }
}

/// Engine mouse button for an rdev button.
pub(crate) fn mouse_button_from_rdev(button: rdev::Button) -> MouseButton {
    match button {
        rdev::Button::Left => MouseButton::Left,
        rdev::Button::Right => MouseButton::Right,
        rdev::Button::Middle => MouseButton::Middle,
        rdev::Button::Unknown(1) => MouseButton::Back,
        rdev::Button::Unknown(2) => MouseButton::Forward,
        rdev::Button::Unknown(code) => MouseButton::Other(code),
    }
}

/// Engine pad button for a gilrs button. Analog triggers are reported as
/// axes and have no button counterpart.
pub(crate) fn pad_button_from_gilrs(button: gilrs::Button) -> Option<PadButton> {
    use gilrs::Button;

    Some(match button {
        Button::South => PadButton::South,
        Button::East => PadButton::East,
        Button::North => PadButton::North,
        Button::West => PadButton::West,
        Button::LeftTrigger => PadButton::LeftBumper,
        Button::RightTrigger => PadButton::RightBumper,
        Button::Select => PadButton::Select,
        Button::Start => PadButton::Start,
        Button::Mode => PadButton::Guide,
        Button::LeftThumb => PadButton::LeftThumb,
        Button::RightThumb => PadButton::RightThumb,
        Button::DPadUp => PadButton::DPadUp,
        Button::DPadDown => PadButton::DPadDown,
        Button::DPadLeft => PadButton::DPadLeft,
        Button::DPadRight => PadButton::DPadRight,
        _ => return None,
    })
}

/// Engine axis for a gilrs stick axis.
pub(crate) fn pad_axis_from_gilrs(axis: gilrs::Axis) -> Option<Axis> {
    use gilrs::Axis as G;

    Some(match axis {
        G::LeftStickX => Axis::LeftStickX,
        G::LeftStickY => Axis::LeftStickY,
        G::RightStickX => Axis::RightStickX,
        G::RightStickY => Axis::RightStickY,
        G::LeftZ => Axis::LeftTrigger,
        G::RightZ => Axis::RightTrigger,
        _ => return None,
    })
}

/// Engine trigger axis for a gilrs analog trigger button.
pub(crate) fn trigger_axis_from_gilrs(button: gilrs::Button) -> Option<Axis> {
    match button {
        gilrs::Button::LeftTrigger2 => Some(Axis::LeftTrigger),
        gilrs::Button::RightTrigger2 => Some(Axis::RightTrigger),
        _ => None,
    }
}

/// enigo key that reproduces an engine key, `None` when enigo cannot type
/// it on every platform.
///
/// Left and right modifiers collapse onto the generic modifier key.
pub(crate) fn key_to_enigo(key: KeyCode) -> Option<enigo::Key> {
    use enigo::Key;

    let key = match key {
        KeyCode::Enter => Key::Return,
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowUp => Key::UpArrow,
        KeyCode::ArrowDown => Key::DownArrow,
        KeyCode::ArrowLeft => Key::LeftArrow,
        KeyCode::ArrowRight => Key::RightArrow,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::MetaLeft | KeyCode::MetaRight => Key::Meta,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::Insert | KeyCode::Other(_) => return None,
        other => Key::Unicode(key_char(other)?),
    };
    Some(key)
}

/// Unshifted character a printable key produces on a US layout.
pub(crate) fn key_char(key: KeyCode) -> Option<char> {
    let c = match key {
        KeyCode::KeyA => 'a',
        KeyCode::KeyB => 'b',
        KeyCode::KeyC => 'c',
        KeyCode::KeyD => 'd',
        KeyCode::KeyE => 'e',
        KeyCode::KeyF => 'f',
        KeyCode::KeyG => 'g',
        KeyCode::KeyH => 'h',
        KeyCode::KeyI => 'i',
        KeyCode::KeyJ => 'j',
        KeyCode::KeyK => 'k',
        KeyCode::KeyL => 'l',
        KeyCode::KeyM => 'm',
        KeyCode::KeyN => 'n',
        KeyCode::KeyO => 'o',
        KeyCode::KeyP => 'p',
        KeyCode::KeyQ => 'q',
        KeyCode::KeyR => 'r',
        KeyCode::KeyS => 's',
        KeyCode::KeyT => 't',
        KeyCode::KeyU => 'u',
        KeyCode::KeyV => 'v',
        KeyCode::KeyW => 'w',
        KeyCode::KeyX => 'x',
        KeyCode::KeyY => 'y',
        KeyCode::KeyZ => 'z',
        KeyCode::Digit0 => '0',
        KeyCode::Digit1 => '1',
        KeyCode::Digit2 => '2',
        KeyCode::Digit3 => '3',
        KeyCode::Digit4 => '4',
        KeyCode::Digit5 => '5',
        KeyCode::Digit6 => '6',
        KeyCode::Digit7 => '7',
        KeyCode::Digit8 => '8',
        KeyCode::Digit9 => '9',
        KeyCode::Minus => '-',
        KeyCode::Equal => '=',
        KeyCode::BracketLeft => '[',
        KeyCode::BracketRight => ']',
        KeyCode::Backslash => '\\',
        KeyCode::Semicolon => ';',
        KeyCode::Quote => '\'',
        KeyCode::Backquote => '`',
        KeyCode::Comma => ',',
        KeyCode::Period => '.',
        KeyCode::Slash => '/',
        _ => return None,
    };
    Some(c)
}

/// enigo button for an engine mouse button.
pub(crate) fn mouse_button_to_enigo(button: MouseButton) -> Option<enigo::Button> {
    match button {
        MouseButton::Left => Some(enigo::Button::Left),
        MouseButton::Right => Some(enigo::Button::Right),
        MouseButton::Middle => Some(enigo::Button::Middle),
        MouseButton::Back | MouseButton::Forward | MouseButton::Other(_) => None,
    }
}

/// XInput `wButtons` bit for a pad button, as driven through ViGEm's
/// Xbox 360 target.
pub(crate) fn pad_button_bits(button: PadButton) -> u16 {
    match button {
        PadButton::DPadUp => 0x0001,
        PadButton::DPadDown => 0x0002,
        PadButton::DPadLeft => 0x0004,
        PadButton::DPadRight => 0x0008,
        PadButton::Start => 0x0010,
        PadButton::Select => 0x0020,
        PadButton::LeftThumb => 0x0040,
        PadButton::RightThumb => 0x0080,
        PadButton::LeftBumper => 0x0100,
        PadButton::RightBumper => 0x0200,
        PadButton::Guide => 0x0400,
        PadButton::South => 0x1000,
        PadButton::East => 0x2000,
        PadButton::West => 0x4000,
        PadButton::North => 0x8000,
    }
}

/// XInput thumbstick value for a stick position in `-1.0..=1.0`.
pub(crate) fn stick_value(value: f64) -> i16 {
    (value.clamp(-1.0, 1.0) * f64::from(i16::MAX)).round() as i16
}

/// XInput trigger value for a trigger position in `0.0..=1.0`.
pub(crate) fn trigger_value(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * f64::from(u8::MAX)).round() as u8
}
