use std::collections::HashMap;
use std::rc::Rc;

use crate::callback::{CallbackBank, CallbackId};
use crate::key::{InputDeviceState, InputDeviceType, InputKey};

/// Committed per-key state of a device. Keys at exactly zero are absent.
pub type DeviceStateMap = HashMap<InputKey, InputDeviceState>;

/// Change listener, called with `(new_value, old_value)`.
pub type StateListener = dyn Fn(f32, f32);

/// Identifies one listener registration on one device.
///
/// Carries the serial the device was registered under, so a handle minted
/// for a device that was later removed and replaced never matches the
/// replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    pub device_type: InputDeviceType,
    pub device_index: u32,
    pub key: InputKey,
    serial: u64,
    id: CallbackId,
}

/// Buffered state of one physical device.
///
/// Platform code appends raw samples with [`Device::add_to_new_state_buffer`];
/// nothing is visible in the committed state until
/// [`Device::push_and_capture`] flushes the buffer, which is also the only
/// place listeners run.
pub struct Device {
    device_type: InputDeviceType,
    index: u32,
    serial: u64,
    current_state: DeviceStateMap,
    new_state_buffer: Vec<(InputKey, InputDeviceState)>,
    listeners: HashMap<InputKey, CallbackBank<StateListener>>,
}

impl Device {
    pub fn new(device_type: InputDeviceType, index: u32) -> Self {
        Self {
            device_type,
            index,
            serial: 0,
            current_state: DeviceStateMap::new(),
            new_state_buffer: Vec::new(),
            listeners: HashMap::new(),
        }
    }

    pub fn keyboard() -> Self {
        Self::new(InputDeviceType::Keyboard, 0)
    }

    pub fn mouse() -> Self {
        Self::new(InputDeviceType::Mouse, 0)
    }

    pub fn gamepad(index: u32) -> Self {
        Self::new(InputDeviceType::Gamepad, index)
    }

    pub fn device_type(&self) -> InputDeviceType {
        self.device_type
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn set_serial(&mut self, serial: u64) {
        self.serial = serial;
    }

    /// Queues a sample. Repeated samples for the same key are all kept, in
    /// order, until the next flush.
    pub fn add_to_new_state_buffer(&mut self, key: InputKey, state: impl Into<InputDeviceState>) {
        self.new_state_buffer.push((key, state.into()));
    }

    /// Number of samples waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.new_state_buffer.len()
    }

    pub fn register_listener(&mut self, key: InputKey, listener: Rc<StateListener>) -> ListenerHandle {
        let id = self.listeners.entry(key).or_default().insert(listener);
        ListenerHandle {
            device_type: self.device_type,
            device_index: self.index,
            key,
            serial: self.serial,
            id,
        }
    }

    /// Returns `false` if the handle does not belong to this device or was
    /// already unregistered.
    pub fn unregister_listener(&mut self, handle: ListenerHandle) -> bool {
        if handle.serial != self.serial
            || handle.device_type != self.device_type
            || handle.device_index != self.index
        {
            return false;
        }
        let Some(bank) = self.listeners.get_mut(&handle.key) else {
            return false;
        };
        let removed = bank.remove(handle.id);
        if bank.is_empty() {
            self.listeners.remove(&handle.key);
        }
        removed
    }

    pub fn listener_count(&self, key: InputKey) -> usize {
        self.listeners.get(&key).map_or(0, |bank| bank.len())
    }

    /// Commits buffered samples in order.
    ///
    /// A sample equal to the committed value is skipped. Every other sample
    /// is recorded into `capture` (the first change per key wins), committed
    /// (zero erases the key), and handed to that key's listeners as
    /// `(new, old)`. The buffer is empty afterwards.
    pub fn push_and_capture(&mut self, capture: &mut DeviceStateMap) {
        let buffer = std::mem::take(&mut self.new_state_buffer);
        for (key, state) in &buffer {
            let new_value = state.value;
            let old_value = self.value(*key);
            if new_value == old_value {
                continue;
            }

            capture.entry(*key).or_insert(*state);
            if new_value == 0.0 {
                self.current_state.remove(key);
            } else {
                self.current_state.insert(*key, *state);
            }

            tracing::trace!(?key, new_value, old_value, "device state changed");
            let listeners = match self.listeners.get(key) {
                Some(bank) => bank.snapshot(),
                None => continue,
            };
            for listener in listeners {
                listener(new_value, old_value);
            }
        }

        // Hand the allocation back for the next frame.
        self.new_state_buffer = buffer;
        self.new_state_buffer.clear();
    }

    /// Committed value of `key`, zero when absent.
    pub fn value(&self, key: InputKey) -> f32 {
        self.current_state.get(&key).map_or(0.0, |s| s.value)
    }

    pub fn state(&self, key: InputKey) -> Option<InputDeviceState> {
        self.current_state.get(&key).copied()
    }

    pub fn current_state(&self) -> &DeviceStateMap {
        &self.current_state
    }
}
