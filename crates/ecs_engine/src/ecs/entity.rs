//! Entity implementation
//!
//! Entities are generational keys: a slot index plus a version that is bumped
//! whenever the slot is freed. A destroyed entity's key never compares equal
//! to the key handed out when its slot is reused.

slotmap::new_key_type! {
    /// Opaque entity identifier owned by a [`World`](super::World)
    pub struct Entity;
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::{Key, SlotMap};

    #[test]
    fn test_reused_slot_gets_new_identity() {
        let mut slots: SlotMap<Entity, ()> = SlotMap::with_key();
        let first = slots.insert(());
        slots.remove(first);
        let second = slots.insert(());
        assert_ne!(first, second);
        assert!(!slots.contains_key(first));
        assert!(Entity::null().is_null());
    }
}
