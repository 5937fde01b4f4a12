//! Order fulfillment
//!
//! The order status state machine and the proof-of-pickup signature payload.
//! Completing an order requires a captured [`Signature`]; an empty payload is
//! unrepresentable, so "no signature, no completion" holds by construction.

use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to order status transitions.
#[derive(Debug, Error)]
pub enum OrderStateError {
    /// The requested transition is not permitted from the current status.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },

    /// The stored status string is not one of the known variants.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),
}

/// Errors related to signature payloads.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// A captured signature is mandatory; an empty payload is rejected.
    #[error("a captured customer signature is required")]
    Empty,

    /// The payload is not valid base64 image data.
    #[error("signature payload is not valid base64")]
    InvalidBase64(#[source] base64::DecodeError),
}

/// Order lifecycle states.
///
/// `Pending → Processing → Ready → Completed`, with `Cancelled` reachable
/// from any non-terminal state. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted by the customer, not yet picked up by staff.
    Pending,
    /// Staff are preparing the order.
    Processing,
    /// Prepared and awaiting customer pickup.
    Ready,
    /// Handed over, with proof-of-pickup captured.
    Completed,
    /// Abandoned before handover.
    Cancelled,
}

impl OrderStatus {
    /// The storage representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether the terminal handover may occur from this status.
    ///
    /// Completion with captured proof is permitted from any open state;
    /// ordinary advancement follows the chain in
    /// [`OrderStatus::can_transition`].
    pub fn can_complete(self) -> bool {
        !self.is_terminal()
    }

    /// Whether an order may move from this status to `next`.
    pub fn can_transition(self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Pending, OrderStatus::Processing)
            | (OrderStatus::Processing, OrderStatus::Ready)
            | (OrderStatus::Ready, OrderStatus::Completed) => true,
            (from, OrderStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Validates a transition from this status to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStateError::InvalidTransition`] if the move is not in
    /// the transition table.
    pub fn transition(self, next: OrderStatus) -> Result<OrderStatus, OrderStateError> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(OrderStateError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(OrderStateError::UnknownStatus(other.to_string())),
        }
    }
}

/// A captured proof-of-pickup signature image.
///
/// Holds a base64 payload as produced by a signature capture widget, with an
/// optional `data:*;base64,` data URL prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(String);

impl Signature {
    /// Creates a signature from a raw captured payload.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Empty`] for an empty or whitespace payload
    /// and [`SignatureError::InvalidBase64`] when the image data does not
    /// decode.
    pub fn new(payload: impl Into<String>) -> Result<Self, SignatureError> {
        let payload = payload.into();
        let trimmed = payload.trim();

        if trimmed.is_empty() {
            return Err(SignatureError::Empty);
        }

        let encoded = trimmed
            .split_once(";base64,")
            .map_or(trimmed, |(_, rest)| rest);

        STANDARD
            .decode(encoded)
            .map_err(SignatureError::InvalidBase64)?;

        Ok(Self(trimmed.to_string()))
    }

    /// The stored payload.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
