//! Shared security primitives for the treasury
//!
//! Provides the reentrancy guard, the circuit breaker, and the role set
//! used by every fund-moving entry point.

use std::collections::HashSet;
use types::address::Address;

/// Reentrancy guard preventing nested calls into protected functions.
///
/// An entry point acquires the guard before touching state and releases
/// it on completion. A token-port callback that re-enters the treasury
/// finds the guard held and fails.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `true` if successfully acquired,
    /// `false` if already locked (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Release the guard.
    pub fn release(&mut self) {
        self.locked = false;
    }

    /// Check if currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Circuit breaker gating state-changing operations.
///
/// When paused, standard fund-moving operations must be rejected; the
/// forced-withdrawal path conversely requires the paused state.
#[derive(Debug, Clone)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    /// Create a new unpaused guard.
    pub fn new() -> Self {
        Self { paused: false }
    }

    /// Pause operations.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unpause operations.
    pub fn unpause(&mut self) {
        self.paused = false;
    }

    /// Check if currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for PauseGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Attestation strategy: one trusted signer, or membership in a dynamic set.
///
/// Selected at construction; both variants feed the same downstream
/// claim-consumption logic. In the set variant any member may authorize —
/// an M-of-anyone trust model, not M-of-N consensus.
#[derive(Debug, Clone)]
pub enum TruthHolders {
    /// A single swappable attester.
    Single(Option<Address>),
    /// A dynamic membership set.
    Set(HashSet<Address>),
}

impl TruthHolders {
    /// Single-attester strategy, initially unset.
    pub fn single() -> Self {
        TruthHolders::Single(None)
    }

    /// Set-membership strategy, initially empty.
    pub fn set() -> Self {
        TruthHolders::Set(HashSet::new())
    }

    /// Check whether `addr` may attest claims.
    pub fn contains(&self, addr: &Address) -> bool {
        match self {
            TruthHolders::Single(holder) => holder.as_ref() == Some(addr),
            TruthHolders::Set(holders) => holders.contains(addr),
        }
    }
}

/// The treasury's fixed role assignments.
///
/// Mutated only through the owner-gated setters on the treasury facade.
#[derive(Debug, Clone)]
pub struct Roles {
    owner: Address,
    operator: Option<Address>,
    counter_party: Option<Address>,
    truth_holders: TruthHolders,
}

impl Roles {
    /// Create the role set with an initial owner and attestation strategy.
    pub fn new(owner: Address, truth_holders: TruthHolders) -> Self {
        Self {
            owner,
            operator: None,
            counter_party: None,
            truth_holders,
        }
    }

    /// Check if `caller` is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// Check if `caller` is the operator.
    pub fn is_operator(&self, caller: &Address) -> bool {
        self.operator.as_ref() == Some(caller)
    }

    /// Check if `addr` is a registered truth holder.
    pub fn is_truth_holder(&self, addr: &Address) -> bool {
        self.truth_holders.contains(addr)
    }

    /// Current owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Current operator, if configured.
    pub fn operator(&self) -> Option<&Address> {
        self.operator.as_ref()
    }

    /// Current counterparty, if configured.
    pub fn counter_party(&self) -> Option<&Address> {
        self.counter_party.as_ref()
    }

    /// Hand ownership to a new address. Gating happens at the facade.
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.owner = new_owner;
    }

    /// Replace the operator.
    pub fn set_operator(&mut self, operator: Address) {
        self.operator = Some(operator);
    }

    /// Replace the counterparty destination.
    pub fn set_counter_party(&mut self, counter_party: Address) {
        self.counter_party = Some(counter_party);
    }

    /// Swap the attester in the single-holder strategy, or insert into the
    /// set strategy. Returns `true` if membership changed.
    pub fn add_truth_holder(&mut self, holder: Address) -> bool {
        match &mut self.truth_holders {
            TruthHolders::Single(slot) => {
                let changed = slot.as_ref() != Some(&holder);
                *slot = Some(holder);
                changed
            }
            TruthHolders::Set(holders) => holders.insert(holder),
        }
    }

    /// Remove an attester. In the single-holder strategy only a matching
    /// address clears the slot. Returns `true` if membership changed.
    pub fn remove_truth_holder(&mut self, holder: &Address) -> bool {
        match &mut self.truth_holders {
            TruthHolders::Single(slot) => {
                if slot.as_ref() == Some(holder) {
                    *slot = None;
                    true
                } else {
                    false
                }
            }
            TruthHolders::Set(holders) => holders.remove(holder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    // --- ReentrancyGuard tests ---

    #[test]
    fn test_reentrancy_guard_acquire_release() {
        let mut guard = ReentrancyGuard::new();
        assert!(!guard.is_locked());
        assert!(guard.acquire());
        assert!(guard.is_locked());
        guard.release();
        assert!(!guard.is_locked());
    }

    #[test]
    fn test_reentrancy_guard_double_acquire_fails() {
        let mut guard = ReentrancyGuard::new();
        assert!(guard.acquire());
        assert!(!guard.acquire(), "Second acquire must fail");
    }

    // --- PauseGuard tests ---

    #[test]
    fn test_pause_guard() {
        let mut pg = PauseGuard::new();
        assert!(!pg.is_paused());
        pg.pause();
        assert!(pg.is_paused());
        pg.unpause();
        assert!(!pg.is_paused());
    }

    // --- Roles tests ---

    #[test]
    fn test_roles_owner() {
        let roles = Roles::new(addr(1), TruthHolders::single());
        assert!(roles.is_owner(&addr(1)));
        assert!(!roles.is_owner(&addr(2)));
    }

    #[test]
    fn test_roles_transfer_ownership() {
        let mut roles = Roles::new(addr(1), TruthHolders::single());
        roles.transfer_ownership(addr(2));
        assert!(roles.is_owner(&addr(2)));
        assert!(!roles.is_owner(&addr(1)));
    }

    #[test]
    fn test_roles_operator_unset_by_default() {
        let roles = Roles::new(addr(1), TruthHolders::single());
        assert!(!roles.is_operator(&addr(1)));
        assert!(roles.operator().is_none());
    }

    #[test]
    fn test_roles_set_operator_and_counter_party() {
        let mut roles = Roles::new(addr(1), TruthHolders::single());
        roles.set_operator(addr(5));
        roles.set_counter_party(addr(6));
        assert!(roles.is_operator(&addr(5)));
        assert_eq!(roles.counter_party(), Some(&addr(6)));
    }

    // --- TruthHolders tests ---

    #[test]
    fn test_single_truth_holder_swap() {
        let mut roles = Roles::new(addr(1), TruthHolders::single());
        assert!(roles.add_truth_holder(addr(7)));
        assert!(roles.is_truth_holder(&addr(7)));

        // Swapping replaces the previous attester
        assert!(roles.add_truth_holder(addr(8)));
        assert!(!roles.is_truth_holder(&addr(7)));
        assert!(roles.is_truth_holder(&addr(8)));
    }

    #[test]
    fn test_single_truth_holder_remove_requires_match() {
        let mut roles = Roles::new(addr(1), TruthHolders::single());
        roles.add_truth_holder(addr(7));
        assert!(!roles.remove_truth_holder(&addr(9)));
        assert!(roles.remove_truth_holder(&addr(7)));
        assert!(!roles.is_truth_holder(&addr(7)));
    }

    #[test]
    fn test_set_truth_holders_membership() {
        let mut roles = Roles::new(addr(1), TruthHolders::set());
        assert!(roles.add_truth_holder(addr(7)));
        assert!(roles.add_truth_holder(addr(8)));
        assert!(!roles.add_truth_holder(addr(8)), "Duplicate insert is a no-op");

        assert!(roles.is_truth_holder(&addr(7)));
        assert!(roles.remove_truth_holder(&addr(7)));
        assert!(!roles.is_truth_holder(&addr(7)));
        assert!(roles.is_truth_holder(&addr(8)));
    }
}
