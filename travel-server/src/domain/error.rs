//! Domain error types.
//!
//! These errors represent validation failures in price-list snapshots.
//! They are distinct from storage and network errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// An identifier that must be present is empty
    #[error("{0} id must not be empty")]
    EmptyId(&'static str),

    /// Offer price is negative or not a number
    #[error("offer {offer_id} has invalid price {price}")]
    InvalidPrice { offer_id: String, price: f64 },

    /// Offer does not end strictly after it starts
    #[error("offer {offer_id} must end after it starts")]
    InvalidFlightTimes { offer_id: String },

    /// Leg route info names a location that is not a valid location name
    #[error("leg {leg_id} has invalid location: {reason}")]
    InvalidLocation { leg_id: String, reason: String },

    /// The same id appears twice where ids must be unique
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: String },
}
