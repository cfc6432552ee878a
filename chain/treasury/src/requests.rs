//! Claim request queue
//!
//! Owner-proposed payouts awaiting truth-holder approval. Ids are
//! sequential from 1. A request transitions pending → approved exactly
//! once; expiry is checked at claim time, never swept proactively.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::address::Address;
use types::currency::Currency;

use crate::errors::ClaimError;

/// A pending or approved claim request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub id: u64,
    pub recipient: Address,
    pub currency: Currency,
    pub amount: Decimal,
    pub deadline: i64,
    pub approved: bool,
}

/// The queue: requests by id plus the id counter.
#[derive(Debug, Clone, Default)]
pub struct RequestQueue {
    requests: HashMap<u64, ClaimRequest>,
    next_id: u64,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new pending request and return it. First id is 1.
    pub fn create(
        &mut self,
        recipient: Address,
        currency: Currency,
        amount: Decimal,
        deadline: i64,
    ) -> &ClaimRequest {
        self.next_id += 1;
        let id = self.next_id;
        self.requests.insert(
            id,
            ClaimRequest {
                id,
                recipient,
                currency,
                amount,
                deadline,
                approved: false,
            },
        );
        &self.requests[&id]
    }

    /// Look up a request by id.
    pub fn get(&self, id: u64) -> Option<&ClaimRequest> {
        self.requests.get(&id)
    }

    /// Transition a request to approved.
    ///
    /// Fails on unknown id, on a second approval, and past the deadline;
    /// the request is untouched on failure. Returns a copy of the request
    /// for the caller to pay out.
    pub fn approve(&mut self, id: u64, now: i64) -> Result<ClaimRequest, ClaimError> {
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(ClaimError::UnknownRequest { id })?;

        if request.approved {
            return Err(ClaimError::AlreadyApproved);
        }
        if now > request.deadline {
            return Err(ClaimError::Expired {
                deadline: request.deadline,
                now,
            });
        }

        request.approved = true;
        Ok(request.clone())
    }

    /// Undo an approval after a failed transfer.
    pub fn unapprove(&mut self, id: u64) {
        if let Some(request) = self.requests.get_mut(&id) {
            request.approved = false;
        }
    }
}
