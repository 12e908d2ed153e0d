//! Allocator errors.

/// Errors produced while building or querying a [`crate::RegisterAllocator`].
#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    /// A lookup named a net the allocator never registered.
    #[error("unknown net `{0}`")]
    UnknownNet(String),

    /// The net lists handed to the allocator are inconsistent.
    #[error("malformed circuit: {0}")]
    MalformedCircuit(String),
}
