use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::device::ListenerHandle;
use crate::system::{InputSystem, ProcessHandle};
use crate::value::{ActionValue, Composite, InputMapping};

/// Which edges an action crossed on one process tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventContext {
    pub started: bool,
    pub performed: bool,
    pub canceled: bool,
    /// Ticks on which this action was active, counted since it was bound.
    pub tick: u64,
}

/// Handler assigned to one of an action's edges.
pub type ActionHandler<V> = Rc<dyn Fn(&EventContext, V)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
}

/// Raw bookkeeping for one mapping that is currently contributing.
#[derive(Debug, Clone, Copy)]
struct ActiveInput<A> {
    axis: A,
    weight: f32,
    current: f32,
    baseline: f32,
}

impl<A> ActiveInput<A> {
    fn raw(&self, composite: Composite) -> f32 {
        match composite {
            Composite::Value => self.current * self.weight,
            Composite::Delta => (self.current - self.baseline) * self.weight,
        }
    }
}

struct ActionState<V: ActionValue> {
    composite: Composite,
    phase: Phase,
    value: V,
    active: BTreeMap<usize, ActiveInput<V::Axis>>,
    tick: u64,
}

impl<V: ActionValue> ActionState<V> {
    fn new(composite: Composite) -> Self {
        Self {
            composite,
            phase: Phase::Idle,
            value: V::default(),
            active: BTreeMap::new(),
            tick: 0,
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.value = V::default();
        self.active.clear();
        self.tick = 0;
    }

    fn record(&mut self, slot: usize, mapping: &InputMapping<V>, new_value: f32, old_value: f32) {
        match self.composite {
            Composite::Value if new_value == 0.0 => {
                self.active.remove(&slot);
            }
            Composite::Value => {
                self.active.insert(
                    slot,
                    ActiveInput {
                        axis: mapping.axis,
                        weight: mapping.weight,
                        current: new_value,
                        baseline: 0.0,
                    },
                );
            }
            Composite::Delta => {
                self.active
                    .entry(slot)
                    .and_modify(|input| input.current = new_value)
                    .or_insert(ActiveInput {
                        axis: mapping.axis,
                        weight: mapping.weight,
                        current: new_value,
                        baseline: old_value,
                    });
            }
        }
    }

    fn compose(&self) -> V {
        self.active.values().fold(V::default(), |acc, input| {
            acc.merge(V::sample(input.axis, input.raw(self.composite)))
        })
    }

    /// Advances the state machine by one tick. Returns `None` when no edge
    /// fired.
    fn evaluate(&mut self) -> Option<(EventContext, V)> {
        let value = self.compose();
        if self.composite == Composite::Delta {
            for input in self.active.values_mut() {
                input.baseline = input.current;
            }
        }

        let mut ctx = EventContext::default();
        match self.phase {
            Phase::Idle if value.is_relaxed() => {
                if self.composite == Composite::Delta {
                    self.active.clear();
                }
                return None;
            }
            Phase::Idle => {
                self.phase = Phase::Active;
                ctx.started = true;
                ctx.performed = true;
            }
            Phase::Active if value.is_relaxed() => {
                // Held keys only contribute again after their next change.
                self.phase = Phase::Idle;
                self.active.clear();
                ctx.canceled = true;
            }
            Phase::Active => {
                ctx.performed = V::REPEATS_WHILE_HELD
                    || self.composite == Composite::Delta
                    || value != self.value;
            }
        }

        self.value = value;
        self.tick += 1;
        ctx.tick = self.tick;
        (ctx.started || ctx.performed || ctx.canceled).then_some((ctx, value))
    }
}

struct Handlers<V> {
    started: Option<ActionHandler<V>>,
    performed: Option<ActionHandler<V>>,
    canceled: Option<ActionHandler<V>>,
}

impl<V> Default for Handlers<V> {
    fn default() -> Self {
        Self {
            started: None,
            performed: None,
            canceled: None,
        }
    }
}

/// State shared between an action and the callbacks it registers. The
/// callbacks only hold a `Weak` to it.
struct ActionShared<V: ActionValue> {
    name: String,
    state: RefCell<ActionState<V>>,
    handlers: RefCell<Handlers<V>>,
}

impl<V: ActionValue> ActionShared<V> {
    fn on_device_change(&self, slot: usize, mapping: &InputMapping<V>, new_value: f32, old_value: f32) {
        self.state
            .borrow_mut()
            .record(slot, mapping, new_value, old_value);
    }

    fn on_input_process(&self) {
        let Some((ctx, value)) = self.state.borrow_mut().evaluate() else {
            return;
        };
        tracing::trace!(
            action = %self.name,
            started = ctx.started,
            performed = ctx.performed,
            canceled = ctx.canceled,
            ?value,
            "action edge"
        );

        let (started, performed, canceled) = {
            let handlers = self.handlers.borrow();
            (
                handlers.started.clone(),
                handlers.performed.clone(),
                handlers.canceled.clone(),
            )
        };
        if ctx.started
            && let Some(handler) = started
        {
            handler(&ctx, value);
        }
        if ctx.performed
            && let Some(handler) = performed
        {
            handler(&ctx, value);
        }
        if ctx.canceled
            && let Some(handler) = canceled
        {
            handler(&ctx, V::default());
        }
    }
}

struct Binding {
    listeners: Vec<ListenerHandle>,
    process: ProcessHandle,
}

/// A named, device-independent input action producing values of type `V`.
///
/// Mappings are attached with [`InputAction::map_input`] and only take effect
/// on the next [`InputAction::bind`]. Dropping a bound action without
/// [`InputAction::unbind`] leaves inert registrations behind in the
/// [`InputSystem`].
pub struct InputAction<V: ActionValue> {
    name: String,
    composite: Composite,
    mappings: Vec<InputMapping<V>>,
    shared: Rc<ActionShared<V>>,
    binding: Option<Binding>,
}

impl<V: ActionValue> InputAction<V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_composite(name, Composite::Value)
    }

    pub fn with_composite(name: impl Into<String>, composite: Composite) -> Self {
        let name = name.into();
        Self {
            shared: Rc::new(ActionShared {
                name: name.clone(),
                state: RefCell::new(ActionState::new(composite)),
                handlers: RefCell::new(Handlers::default()),
            }),
            name,
            composite,
            mappings: Vec::new(),
            binding: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn composite(&self) -> Composite {
        self.composite
    }

    pub fn mappings(&self) -> &[InputMapping<V>] {
        &self.mappings
    }

    pub fn map_input(&mut self, mapping: InputMapping<V>) -> &mut Self {
        self.mappings.push(mapping);
        self
    }

    pub fn clear_mappings(&mut self) {
        self.mappings.clear();
    }

    pub fn on_started(&mut self, handler: impl Fn(&EventContext, V) + 'static) -> &mut Self {
        self.shared.handlers.borrow_mut().started = Some(Rc::new(handler));
        self
    }

    pub fn on_performed(&mut self, handler: impl Fn(&EventContext, V) + 'static) -> &mut Self {
        self.shared.handlers.borrow_mut().performed = Some(Rc::new(handler));
        self
    }

    /// The canceled handler always receives the relaxed value.
    pub fn on_canceled(&mut self, handler: impl Fn(&EventContext, V) + 'static) -> &mut Self {
        self.shared.handlers.borrow_mut().canceled = Some(Rc::new(handler));
        self
    }

    /// Value sampled on the most recent process tick.
    pub fn value(&self) -> V {
        self.shared.state.borrow().value
    }

    pub fn is_active(&self) -> bool {
        self.shared.state.borrow().phase == Phase::Active
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Registers a listener for every mapping whose device exists, plus one
    /// process callback. Rebinding an already bound action releases the old
    /// registrations first. Returns how many mappings were bound.
    pub fn bind(&mut self, input: &mut InputSystem) -> usize {
        if self.binding.is_some() {
            self.unbind(input);
        }

        let mut listeners = Vec::with_capacity(self.mappings.len());
        for (slot, mapping) in self.mappings.iter().enumerate() {
            let device_type = mapping.key.device_type();
            let weak = Rc::downgrade(&self.shared);
            let captured = *mapping;
            let registered = input.register_listener(
                device_type,
                mapping.device_index,
                mapping.key,
                Rc::new(move |new_value, old_value| {
                    if let Some(shared) = weak.upgrade() {
                        shared.on_device_change(slot, &captured, new_value, old_value);
                    }
                }),
            );
            match registered {
                Some(handle) => listeners.push(handle),
                None => tracing::warn!(
                    action = %self.name,
                    key = ?mapping.key,
                    ?device_type,
                    device_index = mapping.device_index,
                    "no device for mapping, skipped"
                ),
            }
        }

        let weak: Weak<ActionShared<V>> = Rc::downgrade(&self.shared);
        let process = input.register_process_callback(Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_input_process();
            }
        }));

        let bound = listeners.len();
        tracing::debug!(action = %self.name, bound, mappings = self.mappings.len(), "action bound");
        self.binding = Some(Binding { listeners, process });
        bound
    }

    /// Releases every registration made by [`InputAction::bind`] and resets
    /// the action to idle without firing handlers. Returns `false` if the
    /// action was not bound.
    pub fn unbind(&mut self, input: &mut InputSystem) -> bool {
        let Some(binding) = self.binding.take() else {
            return false;
        };
        for handle in binding.listeners {
            input.unregister_listener(handle);
        }
        input.unregister_process_callback(binding.process);
        self.shared.state.borrow_mut().reset();
        tracing::debug!(action = %self.name, "action unbound");
        true
    }
}

impl<V: ActionValue> std::fmt::Debug for InputAction<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputAction")
            .field("name", &self.name)
            .field("composite", &self.composite)
            .field("mappings", &self.mappings)
            .field("value", &self.value())
            .field("bound", &self.is_bound())
            .finish()
    }
}
