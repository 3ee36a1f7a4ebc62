use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use kestrel_common::Handle;

/// Handle-indexed slot storage with free-list reuse.
///
/// Objects live in one contiguous `Vec`. A handle maps to exactly one slot
/// while it is alive; destroyed slots are emptied and pushed onto a LIFO
/// free list so the most recently freed slot is the next one filled.
///
/// The handle counter is atomic, so minting handles is safe from any thread.
/// The slot vector and the index map are not synchronized; structural
/// mutation requires `&mut self` and callers serialize it.
pub struct Arena<H: Handle, T> {
    slots: Vec<Option<(H, T)>>,
    index: HashMap<H, usize>,
    free_list: Vec<usize>,
    counter: AtomicU64,
}

impl<H: Handle, T> Default for Arena<H, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            free_list: Vec::new(),
            counter: AtomicU64::new(0),
        }
    }
}

impl<H: Handle, T> Arena<H, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `object` and returns its fresh handle together with a reference
    /// to the stored value.
    pub fn create_object(&mut self, object: T) -> (H, &mut T) {
        let handle = H::from_raw(self.counter.fetch_add(1, Ordering::Relaxed));

        let slot = match self.free_list.pop() {
            Some(slot) => {
                self.slots[slot] = Some((handle, object));
                slot
            }
            None => {
                self.slots.push(Some((handle, object)));
                self.slots.len() - 1
            }
        };
        self.index.insert(handle, slot);

        let (_, object) = self.slots[slot]
            .as_mut()
            .unwrap_or_else(|| unreachable!("slot {slot} was just filled"));
        (handle, object)
    }

    /// Removes the object behind `handle`, returning it.
    pub fn remove_object(&mut self, handle: H) -> Option<T> {
        let slot = self.index.remove(&handle)?;
        self.free_list.push(slot);
        self.slots[slot].take().map(|(_, object)| object)
    }

    /// Destroys the object behind `handle`. Returns `false` if the handle is
    /// unknown, leaving the arena untouched.
    pub fn destroy_object(&mut self, handle: H) -> bool {
        self.remove_object(handle).is_some()
    }

    pub fn get_object(&self, handle: H) -> Option<&T> {
        let slot = *self.index.get(&handle)?;
        self.slots[slot].as_ref().map(|(_, object)| object)
    }

    pub fn get_object_mut(&mut self, handle: H) -> Option<&mut T> {
        let slot = *self.index.get(&handle)?;
        self.slots[slot].as_mut().map(|(_, object)| object)
    }

    pub fn contains(&self, handle: H) -> bool {
        self.index.contains_key(&handle)
    }

    /// Slot currently backing `handle`.
    pub fn slot_of(&self, handle: H) -> Option<usize> {
        self.index.get(&handle).copied()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of slots, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Live `(handle, object)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(handle, object)| (*handle, object)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.as_mut().map(|(handle, object)| (*handle, object)))
    }

    /// Live handles in slot order.
    pub fn handles(&self) -> impl Iterator<Item = H> + '_ {
        self.iter().map(|(handle, _)| handle)
    }

    /// Drops every object. Handle numbering continues where it left off.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.free_list.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_common::ComponentHandle;
    use std::collections::HashSet;

    type TestArena = Arena<ComponentHandle, String>;

    #[test]
    fn create_and_get() {
        let mut arena = TestArena::new();
        let (h, value) = arena.create_object("first".into());
        value.push('!');
        assert_eq!(arena.get_object(h).map(String::as_str), Some("first!"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut arena = TestArena::new();
        let mut issued = HashSet::new();
        for round in 0..10 {
            let (a, _) = arena.create_object(format!("a{round}"));
            let (b, _) = arena.create_object(format!("b{round}"));
            assert!(issued.insert(a));
            assert!(issued.insert(b));
            assert!(arena.destroy_object(a));
        }
        assert_eq!(issued.len(), 20);
    }

    #[test]
    fn live_handles_map_to_distinct_slots() {
        let mut arena = TestArena::new();
        let mut live = Vec::new();
        for i in 0..32 {
            let (h, _) = arena.create_object(i.to_string());
            live.push(h);
            if i % 3 == 0 {
                let victim = live.remove(live.len() / 2);
                assert!(arena.destroy_object(victim));
            }
        }
        let slots: HashSet<usize> = live.iter().filter_map(|h| arena.slot_of(*h)).collect();
        assert_eq!(slots.len(), live.len());
        assert_eq!(arena.len(), live.len());
    }

    #[test]
    fn freed_slots_are_reused_lifo() {
        let mut arena = TestArena::new();
        let (a, _) = arena.create_object("a".into());
        let (b, _) = arena.create_object("b".into());
        let (_c, _) = arena.create_object("c".into());
        let slot_a = arena.slot_of(a).unwrap();
        let slot_b = arena.slot_of(b).unwrap();

        assert!(arena.destroy_object(a));
        assert!(arena.destroy_object(b));

        let (d, _) = arena.create_object("d".into());
        let (e, _) = arena.create_object("e".into());
        assert_eq!(arena.slot_of(d), Some(slot_b));
        assert_eq!(arena.slot_of(e), Some(slot_a));
        assert_eq!(arena.slot_count(), 3);
    }

    #[test]
    fn unknown_handle_is_reported_not_fatal() {
        let mut arena = TestArena::new();
        let (a, _) = arena.create_object("a".into());
        let never = ComponentHandle(999);

        assert!(!arena.destroy_object(never));
        assert!(arena.get_object(never).is_none());

        assert!(arena.destroy_object(a));
        assert!(!arena.destroy_object(a));
        assert!(arena.get_object(a).is_none());

        // The failed calls left the free list alone: exactly one reusable slot.
        let (b, _) = arena.create_object("b".into());
        let (c, _) = arena.create_object("c".into());
        assert_eq!(arena.slot_of(b), Some(0));
        assert_eq!(arena.slot_of(c), Some(1));
    }

    #[test]
    fn destroyed_content_is_dropped() {
        use std::rc::Rc;
        let tracker = Rc::new(());
        let mut arena: Arena<ComponentHandle, Rc<()>> = Arena::new();
        let (h, _) = arena.create_object(Rc::clone(&tracker));
        assert_eq!(Rc::strong_count(&tracker), 2);
        arena.destroy_object(h);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn iteration_skips_free_slots() {
        let mut arena = TestArena::new();
        let (a, _) = arena.create_object("a".into());
        let (b, _) = arena.create_object("b".into());
        arena.destroy_object(a);
        let pairs: Vec<_> = arena.iter().map(|(h, v)| (h, v.clone())).collect();
        assert_eq!(pairs, vec![(b, "b".to_string())]);
    }

    #[test]
    fn clear_keeps_counting() {
        let mut arena = TestArena::new();
        let (a, _) = arena.create_object("a".into());
        arena.clear();
        let (b, _) = arena.create_object("b".into());
        assert_ne!(a, b);
        assert!(!arena.is_empty());
    }
}
