use kestrel_input::InputKey;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

pub fn translate_key(code: KeyCode) -> Option<InputKey> {
    let key = match code {
        KeyCode::KeyA => InputKey::KeyA,
        KeyCode::KeyB => InputKey::KeyB,
        KeyCode::KeyC => InputKey::KeyC,
        KeyCode::KeyD => InputKey::KeyD,
        KeyCode::KeyE => InputKey::KeyE,
        KeyCode::KeyF => InputKey::KeyF,
        KeyCode::KeyQ => InputKey::KeyQ,
        KeyCode::KeyR => InputKey::KeyR,
        KeyCode::KeyS => InputKey::KeyS,
        KeyCode::KeyW => InputKey::KeyW,
        KeyCode::KeyX => InputKey::KeyX,
        KeyCode::KeyZ => InputKey::KeyZ,
        KeyCode::Space => InputKey::Space,
        KeyCode::ShiftLeft => InputKey::LeftShift,
        KeyCode::ControlLeft => InputKey::LeftControl,
        KeyCode::Escape => InputKey::Escape,
        KeyCode::ArrowUp => InputKey::ArrowUp,
        KeyCode::ArrowDown => InputKey::ArrowDown,
        KeyCode::ArrowLeft => InputKey::ArrowLeft,
        KeyCode::ArrowRight => InputKey::ArrowRight,
        _ => return None,
    };
    Some(key)
}

pub fn translate_button(button: MouseButton) -> Option<InputKey> {
    match button {
        MouseButton::Left => Some(InputKey::MouseLeft),
        MouseButton::Right => Some(InputKey::MouseRight),
        MouseButton::Middle => Some(InputKey::MouseMiddle),
        _ => None,
    }
}

/// Press (and key repeat) is 1.0, release is 0.0.
pub fn state_value(state: ElementState) -> f32 {
    match state {
        ElementState::Pressed => 1.0,
        ElementState::Released => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_input::InputDeviceType;

    #[test]
    fn movement_keys_translate_to_keyboard_keys() {
        for code in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD] {
            let key = translate_key(code).unwrap();
            assert_eq!(key.device_type(), InputDeviceType::Keyboard);
        }
        assert_eq!(translate_key(KeyCode::ShiftLeft), Some(InputKey::LeftShift));
        assert_eq!(translate_key(KeyCode::F12), None);
    }

    #[test]
    fn mouse_buttons() {
        assert_eq!(translate_button(MouseButton::Right), Some(InputKey::MouseRight));
        assert_eq!(translate_button(MouseButton::Back), None);
    }

    #[test]
    fn press_and_release_values() {
        assert_eq!(state_value(ElementState::Pressed), 1.0);
        assert_eq!(state_value(ElementState::Released), 0.0);
    }
}
