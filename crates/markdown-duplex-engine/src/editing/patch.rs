use crate::editing::reconcile::Reconciliation;

/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// What the reconciler decided, including any created sibling id.
    pub outcome: Reconciliation,
    /// Document version after this command.
    pub version: u64,
}
