use serde::{Deserialize, Serialize};

/// Kind of physical input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputDeviceType {
    Keyboard,
    Mouse,
    Gamepad,
    Unknown,
}

/// One physical control on some device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputKey {
    Unknown,

    // Keyboard
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyQ,
    KeyR,
    KeyS,
    KeyW,
    KeyX,
    KeyZ,
    Space,
    LeftShift,
    LeftControl,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Mouse
    MousePosX,
    MousePosY,
    MouseMoveX,
    MouseMoveY,
    MouseLeft,
    MouseRight,
    MouseMiddle,

    // Gamepad
    GamepadLeftThumbX,
    GamepadLeftThumbY,
    GamepadRightThumbX,
    GamepadRightThumbY,
    GamepadLeftTrigger,
    GamepadRightTrigger,
    GamepadA,
    GamepadB,
    GamepadX,
    GamepadY,
    GamepadStart,
    GamepadSelect,
    GamepadBumperLeft,
    GamepadBumperRight,
    GamepadL3,
    GamepadR3,
    GamepadDpadUp,
    GamepadDpadDown,
    GamepadDpadLeft,
    GamepadDpadRight,
}

impl InputKey {
    /// The device type that produces this key.
    pub fn device_type(self) -> InputDeviceType {
        use InputKey::*;
        match self {
            KeyA | KeyB | KeyC | KeyD | KeyE | KeyF | KeyQ | KeyR | KeyS | KeyW | KeyX | KeyZ
            | Space | LeftShift | LeftControl | Escape | ArrowUp | ArrowDown | ArrowLeft
            | ArrowRight => InputDeviceType::Keyboard,

            MousePosX | MousePosY | MouseMoveX | MouseMoveY | MouseLeft | MouseRight
            | MouseMiddle => InputDeviceType::Mouse,

            GamepadLeftThumbX | GamepadLeftThumbY | GamepadRightThumbX | GamepadRightThumbY
            | GamepadLeftTrigger | GamepadRightTrigger | GamepadA | GamepadB | GamepadX
            | GamepadY | GamepadStart | GamepadSelect | GamepadBumperLeft | GamepadBumperRight
            | GamepadL3 | GamepadR3 | GamepadDpadUp | GamepadDpadDown | GamepadDpadLeft
            | GamepadDpadRight => InputDeviceType::Gamepad,

            Unknown => InputDeviceType::Unknown,
        }
    }

    /// Whether the key reports a continuous value rather than pressed/released.
    pub fn is_analog(self) -> bool {
        use InputKey::*;
        matches!(
            self,
            MousePosX
                | MousePosY
                | MouseMoveX
                | MouseMoveY
                | GamepadLeftThumbX
                | GamepadLeftThumbY
                | GamepadRightThumbX
                | GamepadRightThumbY
                | GamepadLeftTrigger
                | GamepadRightTrigger
        )
    }
}

/// Last known value of one key on one device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputDeviceState {
    pub value: f32,
}

impl InputDeviceState {
    pub fn new(value: f32) -> Self {
        Self { value }
    }

    pub fn pressed() -> Self {
        Self { value: 1.0 }
    }

    pub fn released() -> Self {
        Self { value: 0.0 }
    }
}

impl From<f32> for InputDeviceState {
    fn from(value: f32) -> Self {
        Self { value }
    }
}
