//! Slot-indexed storage for live values.

use bitvec::vec::BitVec;
use heckt_regalloc::{NetIdx, SlotIdx};
use tracing::trace;

/// Register file holding at most one live value per slot.
///
/// Each occupied slot remembers which net it holds, so reading a net whose
/// slot has been handed to another net is caught instead of returning the
/// wrong value.  The shadow bits live in a separate bit vector.
#[derive(Debug)]
pub(crate) struct RegisterFile<C> {
    cts: Vec<Option<(NetIdx, C)>>,
    shadow: BitVec,
    releases: u64,
}

impl<C> RegisterFile<C> {
    pub(crate) fn new(slots: usize) -> Self {
        Self {
            cts: (0..slots).map(|_| None).collect(),
            shadow: BitVec::repeat(false, slots),
            releases: 0,
        }
    }

    /// Gets the ciphertext and shadow bit of `net`, if it's the current
    /// occupant of `slot`.
    pub(crate) fn read(&self, slot: SlotIdx, net: NetIdx) -> Option<(&C, bool)> {
        let i = usize::from(slot);
        match self.cts.get(i)? {
            Some((occupant, ct)) if *occupant == net => Some((ct, self.shadow[i])),
            _ => None,
        }
    }

    /// Stores a value for `net`, releasing whatever was in the slot.
    pub(crate) fn write(&mut self, slot: SlotIdx, net: NetIdx, ct: C, bit: bool) {
        let i = usize::from(slot);
        if let Some((prev, _)) = self.cts[i].take() {
            trace!(slot = i, prev = u32::from(prev), "release");
            self.releases += 1;
        }
        self.cts[i] = Some((net, ct));
        self.shadow.set(i, bit);
    }

    pub(crate) fn releases(&self) -> u64 {
        self.releases
    }

    pub(crate) fn occupied(&self) -> usize {
        self.cts.iter().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_releases_previous() {
        let mut rf = RegisterFile::new(2);
        let (s0, a, b) = (SlotIdx::from(0u32), NetIdx::from(0u32), NetIdx::from(1u32));

        rf.write(s0, a, "ct_a", true);
        assert_eq!(rf.read(s0, a), Some((&"ct_a", true)));
        assert_eq!(rf.releases(), 0);

        rf.write(s0, b, "ct_b", false);
        assert_eq!(rf.read(s0, b), Some((&"ct_b", false)));
        assert_eq!(rf.read(s0, a), None);
        assert_eq!(rf.releases(), 1);
        assert_eq!(rf.occupied(), 1);
    }

    #[test]
    fn test_empty_slot() {
        let rf = RegisterFile::<bool>::new(1);
        assert_eq!(rf.read(SlotIdx::from(0u32), NetIdx::from(0u32)), None);
        assert_eq!(rf.read(SlotIdx::from(5u32), NetIdx::from(0u32)), None);
    }
}
