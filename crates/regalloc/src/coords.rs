//! Net and slot coordinates.

/// Inner typedef used for net position indexes.
pub type RawNetIdx = u32;

/// Position of a net in program order, inputs first and then the nets defined
/// by each equation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NetIdx(RawNetIdx);

impl From<RawNetIdx> for NetIdx {
    fn from(value: RawNetIdx) -> Self {
        Self(value)
    }
}

impl From<NetIdx> for RawNetIdx {
    fn from(value: NetIdx) -> Self {
        value.0
    }
}

impl From<usize> for NetIdx {
    fn from(value: usize) -> Self {
        Self(RawNetIdx::try_from(value).expect("coords: net index fits in u32"))
    }
}

impl From<NetIdx> for usize {
    fn from(value: NetIdx) -> Self {
        value.0 as usize
    }
}

/// Index of a slot in the register file.
///
/// Several nets map to the same slot as long as they're never live at the
/// same time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SlotIdx(u32);

impl From<u32> for SlotIdx {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<SlotIdx> for u32 {
    fn from(value: SlotIdx) -> Self {
        value.0
    }
}

impl From<usize> for SlotIdx {
    fn from(value: usize) -> Self {
        Self(u32::try_from(value).expect("coords: slot index fits in u32"))
    }
}

impl From<SlotIdx> for usize {
    fn from(value: SlotIdx) -> Self {
        value.0 as usize
    }
}
