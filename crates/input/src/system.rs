use std::collections::BTreeMap;
use std::rc::Rc;

use crate::callback::{CallbackBank, CallbackId};
use crate::device::{Device, DeviceStateMap, ListenerHandle, StateListener};
use crate::key::{InputDeviceState, InputDeviceType, InputKey};

/// Identifies an end-of-process callback registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessHandle(CallbackId);

/// Owns every registered device and drives the once-per-frame flush.
///
/// This is an explicitly owned object: whoever runs the main loop owns the
/// `InputSystem` and passes it to whatever needs to bind against it.
#[derive(Default)]
pub struct InputSystem {
    devices: BTreeMap<InputDeviceType, BTreeMap<u32, Device>>,
    process_callbacks: CallbackBank<dyn Fn()>,
    next_serial: u64,
    frames: u64,
}

impl InputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// An input system with keyboard 0 and mouse 0 already registered.
    pub fn with_desktop_devices() -> Self {
        let mut system = Self::new();
        system.register_device(Device::keyboard());
        system.register_device(Device::mouse());
        system
    }

    /// Registers `device` under its `(type, index)`. Returns `false` and
    /// keeps the existing device if that slot is taken.
    pub fn register_device(&mut self, mut device: Device) -> bool {
        let device_type = device.device_type();
        let index = device.index();
        let by_index = self.devices.entry(device_type).or_default();
        if by_index.contains_key(&index) {
            tracing::warn!(?device_type, index, "device already registered");
            return false;
        }
        self.next_serial += 1;
        device.set_serial(self.next_serial);
        by_index.insert(index, device);
        tracing::info!(?device_type, index, "device registered");
        true
    }

    /// Removes and returns a device. Listener handles into it become inert.
    pub fn remove_device(&mut self, device_type: InputDeviceType, index: u32) -> Option<Device> {
        let by_index = self.devices.get_mut(&device_type)?;
        let device = by_index.remove(&index)?;
        if by_index.is_empty() {
            self.devices.remove(&device_type);
        }
        tracing::info!(?device_type, index, "device removed");
        Some(device)
    }

    pub fn contains_device(&self, device_type: InputDeviceType, index: u32) -> bool {
        self.device(device_type, index).is_some()
    }

    pub fn device(&self, device_type: InputDeviceType, index: u32) -> Option<&Device> {
        self.devices.get(&device_type)?.get(&index)
    }

    pub fn device_mut(&mut self, device_type: InputDeviceType, index: u32) -> Option<&mut Device> {
        self.devices.get_mut(&device_type)?.get_mut(&index)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values().flat_map(|by_index| by_index.values())
    }

    pub fn device_count(&self) -> usize {
        self.devices.values().map(BTreeMap::len).sum()
    }

    /// Queues a sample on a specific device. Returns `false` if the device
    /// is not registered.
    pub fn add_to_new_state_buffer(
        &mut self,
        device_type: InputDeviceType,
        index: u32,
        key: InputKey,
        state: impl Into<InputDeviceState>,
    ) -> bool {
        match self.device_mut(device_type, index) {
            Some(device) => {
                device.add_to_new_state_buffer(key, state);
                true
            }
            None => false,
        }
    }

    /// Queues a sample on device 0 of the key's own device type.
    pub fn add_key_state(&mut self, key: InputKey, state: impl Into<InputDeviceState>) -> bool {
        self.add_to_new_state_buffer(key.device_type(), 0, key, state)
    }

    pub fn register_listener(
        &mut self,
        device_type: InputDeviceType,
        index: u32,
        key: InputKey,
        listener: Rc<StateListener>,
    ) -> Option<ListenerHandle> {
        let device = self.device_mut(device_type, index)?;
        Some(device.register_listener(key, listener))
    }

    /// Returns `false` if the device is gone or the handle is stale.
    pub fn unregister_listener(&mut self, handle: ListenerHandle) -> bool {
        self.device_mut(handle.device_type, handle.device_index)
            .is_some_and(|device| device.unregister_listener(handle))
    }

    /// Registers a callback run at the end of every [`InputSystem::process_input`].
    pub fn register_process_callback(&mut self, callback: Rc<dyn Fn()>) -> ProcessHandle {
        ProcessHandle(self.process_callbacks.insert(callback))
    }

    pub fn unregister_process_callback(&mut self, handle: ProcessHandle) -> bool {
        self.process_callbacks.remove(handle.0)
    }

    pub fn process_callback_count(&self) -> usize {
        self.process_callbacks.len()
    }

    /// Number of completed [`InputSystem::process_input`] calls.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Flushes every device, then runs every process callback.
    ///
    /// Returns the changes committed this frame across all devices.
    pub fn process_input(&mut self) -> DeviceStateMap {
        let _span = tracing::trace_span!("process_input", frame = self.frames).entered();

        let mut capture = DeviceStateMap::new();
        for by_index in self.devices.values_mut() {
            for device in by_index.values_mut() {
                device.push_and_capture(&mut capture);
            }
        }

        for callback in self.process_callbacks.snapshot() {
            callback();
        }

        self.frames += 1;
        capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn register_and_remove_devices() {
        let mut input = InputSystem::new();
        assert!(input.register_device(Device::gamepad(0)));
        assert!(input.register_device(Device::gamepad(1)));
        assert!(!input.register_device(Device::gamepad(1)));
        assert_eq!(input.device_count(), 2);

        assert!(input.remove_device(InputDeviceType::Gamepad, 0).is_some());
        assert!(input.remove_device(InputDeviceType::Gamepad, 0).is_none());
        assert!(input.contains_device(InputDeviceType::Gamepad, 1));
        assert!(input.remove_device(InputDeviceType::Gamepad, 1).is_some());
        assert_eq!(input.device_count(), 0);
    }

    #[test]
    fn samples_for_missing_devices_are_rejected() {
        let mut input = InputSystem::new();
        assert!(!input.add_key_state(InputKey::KeyW, 1.0));
        assert!(
            input
                .register_listener(InputDeviceType::Mouse, 0, InputKey::MouseLeft, Rc::new(|_, _| {}))
                .is_none()
        );
    }

    #[test]
    fn process_flushes_devices_before_callbacks() {
        let mut input = InputSystem::with_desktop_devices();
        let order = Rc::new(RefCell::new(Vec::new()));

        {
            let order = Rc::clone(&order);
            input.register_listener(
                InputDeviceType::Keyboard,
                0,
                InputKey::KeyD,
                Rc::new(move |_, _| order.borrow_mut().push("listener")),
            );
        }
        {
            let order = Rc::clone(&order);
            input.register_process_callback(Rc::new(move || order.borrow_mut().push("process")));
        }

        input.add_key_state(InputKey::KeyD, 1.0);
        let capture = input.process_input();

        assert_eq!(*order.borrow(), vec!["listener", "process"]);
        assert_eq!(capture.get(&InputKey::KeyD).map(|s| s.value), Some(1.0));
        assert_eq!(input.frames(), 1);
    }

    #[test]
    fn handles_into_replaced_devices_are_inert() {
        let mut input = InputSystem::with_desktop_devices();
        let stale = input
            .register_listener(InputDeviceType::Mouse, 0, InputKey::MouseLeft, Rc::new(|_, _| {}))
            .unwrap();

        input.remove_device(InputDeviceType::Mouse, 0);
        assert!(!input.unregister_listener(stale));

        input.register_device(Device::mouse());
        let fresh_hits = Rc::new(Cell::new(0));
        {
            let hits = Rc::clone(&fresh_hits);
            input.register_listener(
                InputDeviceType::Mouse,
                0,
                InputKey::MouseLeft,
                Rc::new(move |_, _| hits.set(hits.get() + 1)),
            );
        }
        assert!(!input.unregister_listener(stale));

        input.add_key_state(InputKey::MouseLeft, 1.0);
        input.process_input();
        assert_eq!(fresh_hits.get(), 1);
    }

    #[test]
    fn process_callbacks_can_be_unregistered() {
        let mut input = InputSystem::new();
        let hits = Rc::new(Cell::new(0));
        let handle = {
            let hits = Rc::clone(&hits);
            input.register_process_callback(Rc::new(move || hits.set(hits.get() + 1)))
        };
        input.process_input();
        assert!(input.unregister_process_callback(handle));
        assert!(!input.unregister_process_callback(handle));
        input.process_input();
        assert_eq!(hits.get(), 1);
    }
}
