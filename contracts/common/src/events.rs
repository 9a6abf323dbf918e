//! Protocol Events for tvault
//!
//! Events are emitted during contract execution and can be indexed
//! off-chain. Each event type has a 32-byte key so hosts can detect an
//! emission without decoding the payload.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::events::EVENT_KEY_DOMAIN;
use crate::types::Address;
use crate::uint256::WideUint;

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Fungible ledger events (0x01 - 0x1F)
    Transfer = 0x01,
    Approval = 0x02,

    // Vault events (0x20 - 0x3F)
    Deposit = 0x20,
    Withdraw = 0x21,
}

impl EventType {
    /// Event name as indexers see it
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer => "Transfer",
            Self::Approval => "Approval",
            Self::Deposit => "Deposit",
            Self::Withdraw => "Withdraw",
        }
    }

    /// 32-byte key: `sha256(domain || name)`
    pub fn key(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(EVENT_KEY_DOMAIN);
        hasher.update(self.name().as_bytes());
        hasher.finalize().into()
    }
}

/// Main event enum containing all possible protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum VaultEvent {
    // ============ Ledger Events ============

    /// Emitted on every balance movement, including mint (from zero) and
    /// burn (to zero)
    Transfer {
        from: Address,
        to: Address,
        amount: WideUint,
    },

    /// Emitted when an allowance is set
    Approval {
        owner: Address,
        spender: Address,
        amount: WideUint,
    },

    // ============ Vault Events ============

    /// Emitted by deposit and mint
    Deposit {
        caller: Address,
        receiver: Address,
        assets: WideUint,
        shares: WideUint,
    },

    /// Emitted by withdraw and redeem
    Withdraw {
        caller: Address,
        receiver: Address,
        owner: Address,
        assets: WideUint,
        shares: WideUint,
    },
}

impl VaultEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Transfer { .. } => EventType::Transfer,
            Self::Approval { .. } => EventType::Approval,
            Self::Deposit { .. } => EventType::Deposit,
            Self::Withdraw { .. } => EventType::Withdraw,
        }
    }

    /// Key of this event's type
    pub fn key(&self) -> [u8; 32] {
        self.event_type().key()
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during one call
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<VaultEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: VaultEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&VaultEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// True if any logged event carries the given key
    pub fn contains_key(&self, key: &[u8; 32]) -> bool {
        self.events.iter().any(|e| &e.key() == key)
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
