/// Active render targets of a post process (one, or two when reusable).

use crate::graphics_device::RenderTargetId;

/// Slots of a double-buffered post process
pub const MAX_ACTIVE_SLOTS: usize = 2;

/// Fixed-capacity ordered set of render targets, indexed by the ping-pong index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveTextureSlots {
    slots: [Option<RenderTargetId>; MAX_ACTIVE_SLOTS],
    len: usize,
}

impl ActiveTextureSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a render target; returns false when full
    pub fn push(&mut self, handle: RenderTargetId) -> bool {
        if self.len == MAX_ACTIVE_SLOTS {
            return false;
        }
        self.slots[self.len] = Some(handle);
        self.len += 1;
        true
    }

    /// Forget all slots (the targets stay cached)
    pub fn reset(&mut self) {
        self.slots = [None; MAX_ACTIVE_SLOTS];
        self.len = 0;
    }

    pub fn get(&self, index: usize) -> Option<RenderTargetId> {
        if index < self.len { self.slots[index] } else { None }
    }

    pub fn contains(&self, handle: RenderTargetId) -> bool {
        self.iter().any(|h| h == handle)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = RenderTargetId> + '_ {
        self.slots[..self.len].iter().flatten().copied()
    }

    /// Filled slots as a vector
    pub fn to_vec(&self) -> Vec<RenderTargetId> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn handles(count: usize) -> Vec<RenderTargetId> {
        let mut map: SlotMap<RenderTargetId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_push_until_full() {
        let h = handles(3);
        let mut slots = ActiveTextureSlots::new();
        assert!(slots.push(h[0]));
        assert!(slots.push(h[1]));
        assert!(!slots.push(h[2]));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.to_vec(), vec![h[0], h[1]]);
    }

    #[test]
    fn test_get_and_contains() {
        let h = handles(2);
        let mut slots = ActiveTextureSlots::new();
        slots.push(h[0]);
        assert_eq!(slots.get(0), Some(h[0]));
        assert_eq!(slots.get(1), None);
        assert!(slots.contains(h[0]));
        assert!(!slots.contains(h[1]));
    }

    #[test]
    fn test_reset_empties_slots() {
        let h = handles(2);
        let mut slots = ActiveTextureSlots::new();
        slots.push(h[0]);
        slots.push(h[1]);
        slots.reset();
        assert!(slots.is_empty());
        assert_eq!(slots.get(0), None);
        assert!(slots.push(h[1]));
    }
}
