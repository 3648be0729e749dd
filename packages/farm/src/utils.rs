use soroban_sdk::{contracttype, Address};

/// A pending two-step ownership transfer.
///
/// The current owner proposes `new_owner`; the transfer only completes once
/// `new_owner` accepts it. When `time_limit` is set, the proposal can no longer
/// be accepted after that ledger timestamp.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerChange {
    pub new_owner: Address,
    pub time_limit: Option<u64>,
}

impl OwnerChange {
    pub fn is_expired(&self, now: u64) -> bool {
        match self.time_limit {
            Some(limit) => now > limit,
            None => false,
        }
    }
}
