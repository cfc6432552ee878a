//! Treasury facade — every public entry point
//!
//! Composes the registry, ledger, commitment store, claim book, request
//! queue, and role set behind one call surface. Each entry point applies
//! the same sequencing: pause gate, reentrancy guard, registry check,
//! operation-specific authorization, state effects, and only then the
//! external token transfer — so a reentrant token callback always
//! observes already-updated state. If the external transfer fails, the
//! just-committed effect is rolled back and the error surfaces; no call
//! leaves partial state behind.

use rust_decimal::Decimal;
use types::address::Address;
use types::currency::Currency;

use crate::claims::{ClaimBook, ClaimMessage};
use crate::commitment::{CommitmentStore, EntitlementMessage, StateCommitment};
use crate::errors::{ClaimError, CommitmentError, LedgerError};
use crate::events::{
    Claimed, ClaimRequestCreated, CurrencyAdded, CurrencyRemoved, Deposited, NewCounterParty,
    NewOperator, NewTruthHolder, StateUpdated, TreasuryEvent, Withdrawn,
};
use crate::ledger::BalanceLedger;
use crate::merkle::{self, Hash};
use crate::registry::CurrencyRegistry;
use crate::requests::{ClaimRequest, RequestQueue};
use crate::security::{PauseGuard, ReentrancyGuard, Roles, TruthHolders};
use crate::signing;
use crate::token::TokenPort;

/// The custodial treasury engine.
#[derive(Debug)]
pub struct Treasury {
    /// The treasury's own account at the token service.
    address: Address,
    registry: CurrencyRegistry,
    ledger: BalanceLedger,
    commitments: CommitmentStore,
    claims: ClaimBook,
    requests: RequestQueue,
    roles: Roles,
    pause_guard: PauseGuard,
    reentrancy_guard: ReentrancyGuard,
    /// Emitted events log (append-only)
    events: Vec<TreasuryEvent>,
}

impl Treasury {
    /// Create a treasury with an owner and an attestation strategy.
    pub fn new(address: Address, owner: Address, truth_holders: TruthHolders) -> Self {
        Self {
            address,
            registry: CurrencyRegistry::new(),
            ledger: BalanceLedger::new(),
            commitments: CommitmentStore::new(),
            claims: ClaimBook::new(),
            requests: RequestQueue::new(),
            roles: Roles::new(owner, truth_holders),
            pause_guard: PauseGuard::new(),
            reentrancy_guard: ReentrancyGuard::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Currency Registry ─────────────────────────

    /// Accept a currency. Owner-only; idempotent.
    pub fn add_currency(
        &mut self,
        caller: &Address,
        currency: Currency,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_owner(caller)?;
        self.registry.add(currency);
        Ok(self.emit(TreasuryEvent::CurrencyAdded(CurrencyAdded { currency })))
    }

    /// Stop accepting a currency. Owner-only. Recorded balances remain;
    /// only new operations in the currency are blocked.
    pub fn remove_currency(
        &mut self,
        caller: &Address,
        currency: Currency,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_owner(caller)?;
        self.registry.remove(&currency);
        Ok(self.emit(TreasuryEvent::CurrencyRemoved(CurrencyRemoved { currency })))
    }

    /// Check whether a currency is accepted.
    pub fn is_supported(&self, currency: &Currency) -> bool {
        self.registry.is_supported(currency)
    }

    // ───────────────────────── Roles ─────────────────────────

    /// Hand ownership to a new address. Owner-only.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), LedgerError> {
        self.check_owner(caller)?;
        self.roles.transfer_ownership(new_owner);
        Ok(())
    }

    /// Replace the operator. Owner-only.
    pub fn set_operator(
        &mut self,
        caller: &Address,
        operator: Address,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_owner(caller)?;
        self.roles.set_operator(operator);
        Ok(self.emit(TreasuryEvent::NewOperator(NewOperator { operator })))
    }

    /// Replace the counterparty sweep destination. Owner-only.
    pub fn set_counter_party(
        &mut self,
        caller: &Address,
        counter_party: Address,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_owner(caller)?;
        self.roles.set_counter_party(counter_party);
        Ok(self.emit(TreasuryEvent::NewCounterParty(NewCounterParty { counter_party })))
    }

    /// Register a truth holder (swap in the single-holder strategy,
    /// insert in the set strategy). Owner-only.
    pub fn add_truth_holder(
        &mut self,
        caller: &Address,
        holder: Address,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_owner(caller)?;
        self.roles.add_truth_holder(holder);
        Ok(self.emit(TreasuryEvent::NewTruthHolder(NewTruthHolder {
            truth_holder: holder,
            added: true,
        })))
    }

    /// Deregister a truth holder. Owner-only.
    pub fn remove_truth_holder(
        &mut self,
        caller: &Address,
        holder: Address,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_owner(caller)?;
        self.roles.remove_truth_holder(&holder);
        Ok(self.emit(TreasuryEvent::NewTruthHolder(NewTruthHolder {
            truth_holder: holder,
            added: false,
        })))
    }

    // ───────────────────────── Circuit Breaker ─────────────────────────

    /// Pause fund-moving operations. Owner-only, pause-exempt itself.
    pub fn pause(&mut self, caller: &Address) -> Result<TreasuryEvent, LedgerError> {
        self.check_owner(caller)?;
        self.pause_guard.pause();
        Ok(self.emit(TreasuryEvent::Paused))
    }

    /// Resume fund-moving operations. Owner-only.
    pub fn unpause(&mut self, caller: &Address) -> Result<TreasuryEvent, LedgerError> {
        self.check_owner(caller)?;
        self.pause_guard.unpause();
        Ok(self.emit(TreasuryEvent::Unpaused))
    }

    /// Check the circuit breaker.
    pub fn is_paused(&self) -> bool {
        self.pause_guard.is_paused()
    }

    // ───────────────────────── Balance Ledger ─────────────────────────

    /// Deposit funds for `recipient`, paid by `caller`.
    ///
    /// For the native coin the attached `value` must equal `amount`
    /// exactly — excess is rejected, not silently kept. For a token,
    /// `value` must be zero and the amount is pulled from the payer via
    /// `transfer_from` (the payer must have approved the treasury).
    pub fn deposit(
        &mut self,
        port: &mut dyn TokenPort,
        caller: Address,
        recipient: Address,
        amount: Decimal,
        currency: Currency,
        value: Decimal,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.acquire_guard()?;
        let result = self.deposit_locked(port, caller, recipient, amount, currency, value);
        self.reentrancy_guard.release();
        result
    }

    fn deposit_locked(
        &mut self,
        port: &mut dyn TokenPort,
        caller: Address,
        recipient: Address,
        amount: Decimal,
        currency: Currency,
        value: Decimal,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_not_paused()?;
        check_amount(amount)?;
        self.check_supported(&currency)?;

        if currency.is_native() {
            if value != amount {
                return Err(LedgerError::AmountMismatch {
                    declared: amount.to_string(),
                    provided: value.to_string(),
                });
            }
            port.transfer(&currency, &caller, &self.address, amount)?;
        } else {
            if !value.is_zero() {
                return Err(LedgerError::AmountMismatch {
                    declared: amount.to_string(),
                    provided: value.to_string(),
                });
            }
            port.transfer_from(&currency, &self.address, &caller, &self.address, amount)?;
        }

        self.ledger.credit(&recipient, &currency, amount)?;
        self.ledger.credit_holdings(&currency, amount)?;

        Ok(self.emit(TreasuryEvent::Deposited(Deposited {
            payer: caller,
            recipient,
            amount,
            currency,
        })))
    }

    /// Pay out a user's recorded balance. Owner- or operator-gated.
    pub fn withdraw(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        recipient: Address,
        amount: Decimal,
        currency: Currency,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.acquire_guard()?;
        let result = self.withdraw_locked(port, caller, recipient, amount, currency);
        self.reentrancy_guard.release();
        result
    }

    fn withdraw_locked(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        recipient: Address,
        amount: Decimal,
        currency: Currency,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_not_paused()?;
        if !self.roles.is_owner(caller) && !self.roles.is_operator(caller) {
            return Err(LedgerError::Unauthorized);
        }
        check_amount(amount)?;
        self.check_supported(&currency)?;

        self.ledger.debit(&recipient, &currency, amount)?;
        if let Err(err) = self.pay_out(port, &currency, &recipient, amount) {
            self.ledger.credit(&recipient, &currency, amount)?;
            return Err(err);
        }

        Ok(self.emit(TreasuryEvent::Withdrawn(Withdrawn {
            recipient,
            amount,
            currency,
        })))
    }

    /// Sweep contract liquidity to the configured counterparty.
    ///
    /// Operator-gated. Moves float, not entitlements: the per-user ledger
    /// is untouched, only the treasury's own holdings are checked.
    pub fn transfer_to_counter_party(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        currency: Currency,
        amount: Decimal,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.acquire_guard()?;
        let result = self.sweep_locked(port, caller, currency, amount);
        self.reentrancy_guard.release();
        result
    }

    fn sweep_locked(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        currency: Currency,
        amount: Decimal,
    ) -> Result<TreasuryEvent, LedgerError> {
        self.check_not_paused()?;
        if !self.roles.is_operator(caller) {
            return Err(LedgerError::Unauthorized);
        }
        check_amount(amount)?;
        self.check_supported(&currency)?;
        let counter_party = *self.roles.counter_party().ok_or(LedgerError::NoCounterParty)?;

        self.pay_out(port, &currency, &counter_party, amount)?;

        Ok(self.emit(TreasuryEvent::Withdrawn(Withdrawn {
            recipient: counter_party,
            amount,
            currency,
        })))
    }

    /// Recorded balance of a user.
    pub fn balance_of(&self, user: &Address, currency: &Currency) -> Decimal {
        self.ledger.balance_of(user, currency)
    }

    /// Contract float in a currency.
    pub fn holdings_of(&self, currency: &Currency) -> Decimal {
        self.ledger.holdings_of(currency)
    }

    /// Sum of all recorded balances in a currency.
    pub fn total_balances(&self, currency: &Currency) -> Decimal {
        self.ledger.total_balances(currency)
    }

    // ───────────────────────── Merkle Commitment ─────────────────────────

    /// Replace the active state commitment. Owner-only; pause-exempt.
    ///
    /// The engine cannot validate the root's contents; that new roots only
    /// ever increase per-user entitlements is an operational contract with
    /// the publisher.
    pub fn update_state(
        &mut self,
        caller: &Address,
        root: Hash,
        data_pointer: impl Into<String>,
        now: i64,
    ) -> Result<TreasuryEvent, CommitmentError> {
        if !self.roles.is_owner(caller) {
            return Err(CommitmentError::Unauthorized);
        }
        let record = self.commitments.update(root, data_pointer.into(), now);
        let event = StateUpdated {
            root: record.root,
            data_pointer: record.data_pointer.clone(),
            version: record.version,
        };
        Ok(self.emit(TreasuryEvent::StateUpdated(event)))
    }

    /// Owner-relayed withdrawal against a committed cumulative entitlement.
    ///
    /// The owner submits on the user's behalf; authenticity comes from the
    /// user's signature over the entitlement message, which must recover
    /// to the user encoded in it. Cumulative accounting caps the total
    /// ever withdrawn at the committed amount.
    pub fn withdraw_committed(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        message: &EntitlementMessage,
        signature: &[u8],
        amount: Decimal,
    ) -> Result<TreasuryEvent, CommitmentError> {
        self.acquire_guard()?;
        let result = self.withdraw_committed_locked(port, caller, message, signature, amount);
        self.reentrancy_guard.release();
        result
    }

    fn withdraw_committed_locked(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        message: &EntitlementMessage,
        signature: &[u8],
        amount: Decimal,
    ) -> Result<TreasuryEvent, CommitmentError> {
        if self.pause_guard.is_paused() {
            return Err(CommitmentError::Paused);
        }
        if !self.roles.is_owner(caller) {
            return Err(CommitmentError::Unauthorized);
        }
        if amount <= Decimal::ZERO {
            return Err(CommitmentError::InvalidAmount);
        }

        let signer = signing::recover_signer(&message.encode(), signature)
            .map_err(|_| CommitmentError::InvalidSignature)?;
        if signer != message.user {
            return Err(CommitmentError::InvalidSignature);
        }
        if !self.registry.is_supported(&message.currency) {
            return Err(CommitmentError::CurrencyNotSupported {
                currency: message.currency.to_string(),
            });
        }

        self.commitments.register_withdrawal(
            &message.user,
            &message.currency,
            amount,
            message.cumulative_amount,
        )?;
        if let Err(err) = self.pay_out(port, &message.currency, &message.user, amount) {
            self.commitments
                .unregister_withdrawal(&message.user, &message.currency, amount);
            return Err(err.into());
        }

        Ok(self.emit(TreasuryEvent::Withdrawn(Withdrawn {
            recipient: message.user,
            amount,
            currency: message.currency,
        })))
    }

    /// Emergency self-service exit, available only while paused.
    ///
    /// No signature relay: the user calls directly and proves inclusion of
    /// their entitlement leaf under the active root. The registry is not
    /// consulted — a delisted currency committed to the state remains
    /// exit-able here.
    pub fn forced_withdraw(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        amount: Decimal,
        message: &EntitlementMessage,
        leaf: Hash,
        proof: &[Hash],
    ) -> Result<TreasuryEvent, CommitmentError> {
        self.acquire_guard()?;
        let result = self.forced_withdraw_locked(port, caller, amount, message, leaf, proof);
        self.reentrancy_guard.release();
        result
    }

    fn forced_withdraw_locked(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        amount: Decimal,
        message: &EntitlementMessage,
        leaf: Hash,
        proof: &[Hash],
    ) -> Result<TreasuryEvent, CommitmentError> {
        if !self.pause_guard.is_paused() {
            return Err(CommitmentError::NotPaused);
        }
        if amount <= Decimal::ZERO {
            return Err(CommitmentError::InvalidAmount);
        }
        if message.leaf_hash() != leaf {
            return Err(CommitmentError::InvalidHash);
        }
        let root = self
            .commitments
            .active()
            .ok_or(CommitmentError::NoCommitment)?
            .root;
        if !merkle::verify(&root, &leaf, proof) {
            return Err(CommitmentError::InvalidProof);
        }
        if *caller != message.user {
            return Err(CommitmentError::InvalidUser);
        }

        self.commitments.register_withdrawal(
            &message.user,
            &message.currency,
            amount,
            message.cumulative_amount,
        )?;
        if let Err(err) = self.pay_out(port, &message.currency, &message.user, amount) {
            self.commitments
                .unregister_withdrawal(&message.user, &message.currency, amount);
            return Err(err.into());
        }

        Ok(self.emit(TreasuryEvent::Withdrawn(Withdrawn {
            recipient: message.user,
            amount,
            currency: message.currency,
        })))
    }

    /// The active state commitment, if published.
    pub fn commitment(&self) -> Option<&StateCommitment> {
        self.commitments.active()
    }

    /// Cumulative amount withdrawn against the committed state.
    pub fn withdrawn_of(&self, user: &Address, currency: &Currency) -> Decimal {
        self.commitments.withdrawn_of(user, currency)
    }

    // ───────────────────────── Signed Claims ─────────────────────────

    /// Pay out a claim attested by a truth holder's signature.
    ///
    /// The message hash is consumed before the transfer, so an identical
    /// resubmission fails `AlreadyClaimed` regardless of who relays it.
    pub fn claim(
        &mut self,
        port: &mut dyn TokenPort,
        message: &ClaimMessage,
        signature: &[u8],
        now: i64,
    ) -> Result<TreasuryEvent, ClaimError> {
        self.acquire_guard().map_err(ClaimError::Ledger)?;
        let result = self.claim_locked(port, message, signature, now);
        self.reentrancy_guard.release();
        result
    }

    fn claim_locked(
        &mut self,
        port: &mut dyn TokenPort,
        message: &ClaimMessage,
        signature: &[u8],
        now: i64,
    ) -> Result<TreasuryEvent, ClaimError> {
        if self.pause_guard.is_paused() {
            return Err(ClaimError::Paused);
        }
        if message.amount <= Decimal::ZERO {
            return Err(ClaimError::InvalidAmount);
        }

        let signer = signing::recover_signer(&message.encode(), signature)
            .map_err(|_| ClaimError::InvalidSignature)?;
        if !self.roles.is_truth_holder(&signer) {
            return Err(ClaimError::Unauthorized);
        }
        if now > message.deadline {
            return Err(ClaimError::Expired {
                deadline: message.deadline,
                now,
            });
        }

        let hash = message.hash();
        if self.claims.is_consumed(&hash) {
            return Err(ClaimError::AlreadyClaimed);
        }
        if !self.registry.is_supported(&message.currency) {
            return Err(ClaimError::CurrencyNotSupported {
                currency: message.currency.to_string(),
            });
        }

        self.claims.consume(hash);
        if let Err(err) = self.pay_out(port, &message.currency, &message.recipient, message.amount)
        {
            self.claims.release(&hash);
            return Err(err.into());
        }

        Ok(self.emit(TreasuryEvent::Claimed(Claimed {
            recipient: message.recipient,
            amount: message.amount,
            currency: message.currency,
        })))
    }

    // ───────────────────────── Claim Requests ─────────────────────────

    /// Queue a payout for truth-holder approval. Owner-only.
    pub fn add_claim_request(
        &mut self,
        caller: &Address,
        recipient: Address,
        currency: Currency,
        amount: Decimal,
        deadline: i64,
    ) -> Result<TreasuryEvent, ClaimError> {
        if !self.roles.is_owner(caller) {
            return Err(ClaimError::Unauthorized);
        }
        if amount <= Decimal::ZERO {
            return Err(ClaimError::InvalidAmount);
        }

        let request = self.requests.create(recipient, currency, amount, deadline);
        let event = ClaimRequestCreated {
            id: request.id,
            recipient: request.recipient,
            amount: request.amount,
            currency: request.currency,
            deadline: request.deadline,
        };
        Ok(self.emit(TreasuryEvent::ClaimRequestCreated(event)))
    }

    /// Approve a pending claim request and pay it out.
    ///
    /// Any registered truth holder may approve any pending request —
    /// a deliberate M-of-anyone trust model with no per-request
    /// assignment.
    pub fn approve_claim(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        id: u64,
        now: i64,
    ) -> Result<TreasuryEvent, ClaimError> {
        self.acquire_guard().map_err(ClaimError::Ledger)?;
        let result = self.approve_claim_locked(port, caller, id, now);
        self.reentrancy_guard.release();
        result
    }

    fn approve_claim_locked(
        &mut self,
        port: &mut dyn TokenPort,
        caller: &Address,
        id: u64,
        now: i64,
    ) -> Result<TreasuryEvent, ClaimError> {
        if self.pause_guard.is_paused() {
            return Err(ClaimError::Paused);
        }
        if !self.roles.is_truth_holder(caller) {
            return Err(ClaimError::Unauthorized);
        }

        let request = self.requests.approve(id, now)?;
        if !self.registry.is_supported(&request.currency) {
            self.requests.unapprove(id);
            return Err(ClaimError::CurrencyNotSupported {
                currency: request.currency.to_string(),
            });
        }
        if let Err(err) = self.pay_out(port, &request.currency, &request.recipient, request.amount)
        {
            self.requests.unapprove(id);
            return Err(err.into());
        }

        Ok(self.emit(TreasuryEvent::Claimed(Claimed {
            recipient: request.recipient,
            amount: request.amount,
            currency: request.currency,
        })))
    }

    /// Look up a claim request.
    pub fn request(&self, id: u64) -> Option<&ClaimRequest> {
        self.requests.get(id)
    }

    // ───────────────────────── Role Queries ─────────────────────────

    /// The treasury's own token-service account.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Current owner.
    pub fn owner(&self) -> &Address {
        self.roles.owner()
    }

    /// Current operator, if configured.
    pub fn operator(&self) -> Option<&Address> {
        self.roles.operator()
    }

    /// Current counterparty, if configured.
    pub fn counter_party(&self) -> Option<&Address> {
        self.roles.counter_party()
    }

    /// Check whether an address may attest claims.
    pub fn is_truth_holder(&self, addr: &Address) -> bool {
        self.roles.is_truth_holder(addr)
    }

    // ───────────────────────── Events ─────────────────────────

    /// All emitted events, in order.
    pub fn events(&self) -> &[TreasuryEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<TreasuryEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    /// Debit float and push funds out. Effects precede the external call;
    /// a failed transfer restores the float before the error surfaces.
    fn pay_out(
        &mut self,
        port: &mut dyn TokenPort,
        currency: &Currency,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        self.ledger.debit_holdings(currency, amount)?;
        if let Err(transfer_err) = port.transfer(currency, &self.address, to, amount) {
            self.ledger.credit_holdings(currency, amount)?;
            return Err(LedgerError::Token(transfer_err));
        }
        Ok(())
    }

    fn emit(&mut self, event: TreasuryEvent) -> TreasuryEvent {
        self.events.push(event.clone());
        event
    }

    fn acquire_guard(&mut self) -> Result<(), LedgerError> {
        if !self.reentrancy_guard.acquire() {
            return Err(LedgerError::Reentrancy);
        }
        Ok(())
    }

    fn check_not_paused(&self) -> Result<(), LedgerError> {
        if self.pause_guard.is_paused() {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    fn check_owner(&self, caller: &Address) -> Result<(), LedgerError> {
        if !self.roles.is_owner(caller) {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    fn check_supported(&self, currency: &Currency) -> Result<(), LedgerError> {
        if !self.registry.is_supported(currency) {
            return Err(LedgerError::CurrencyNotSupported {
                currency: currency.to_string(),
            });
        }
        Ok(())
    }
}

fn check_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(())
}
