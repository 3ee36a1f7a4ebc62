use std::rc::Rc;

/// Generation-checked identifier of a callback inside a [`CallbackBank`].
///
/// A stale id (its callback already removed, slot since reused) never
/// matches, so removing through it is a reported no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId {
    index: u32,
    generation: u32,
}

struct CallbackSlot<F: ?Sized> {
    generation: u32,
    sequence: u64,
    callback: Option<Rc<F>>,
}

/// Small slot map of shared callbacks.
///
/// Invocation goes through [`CallbackBank::snapshot`], which copies the live
/// callbacks out in registration order so the bank itself is not borrowed
/// while they run.
pub(crate) struct CallbackBank<F: ?Sized> {
    slots: Vec<CallbackSlot<F>>,
    free: Vec<u32>,
    next_sequence: u64,
    live: usize,
}

impl<F: ?Sized> Default for CallbackBank<F> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            next_sequence: 0,
            live: 0,
        }
    }
}

impl<F: ?Sized> CallbackBank<F> {
    pub(crate) fn insert(&mut self, callback: Rc<F>) -> CallbackId {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.sequence = sequence;
            slot.callback = Some(callback);
            return CallbackId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(CallbackSlot {
            generation: 0,
            sequence,
            callback: Some(callback),
        });
        CallbackId {
            index,
            generation: 0,
        }
    }

    pub(crate) fn remove(&mut self, id: CallbackId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return false;
        };
        if slot.generation != id.generation || slot.callback.is_none() {
            return false;
        }
        slot.callback = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        true
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: CallbackId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.generation == id.generation && slot.callback.is_some())
    }

    /// Live callbacks in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Rc<F>> {
        let mut live: Vec<(u64, Rc<F>)> = self
            .slots
            .iter()
            .filter_map(|slot| slot.callback.as_ref().map(|cb| (slot.sequence, Rc::clone(cb))))
            .collect();
        live.sort_by_key(|(sequence, _)| *sequence);
        live.into_iter().map(|(_, cb)| cb).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.live == 0
    }
}
