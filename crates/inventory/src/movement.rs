use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Aggregate, DomainError, Entity, MovementId, ProductId};

use crate::product::Product;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    /// Replenishment: increases stock, unbounded.
    Entry,
    /// Sale or loss: decreases stock, bounded by what is on hand.
    Exit,
}

impl MovementType {
    /// Reason recorded when the caller leaves it blank.
    pub fn default_reason(self) -> &'static str {
        match self {
            MovementType::Entry => "Stock replenishment",
            MovementType::Exit => "Customer sale",
        }
    }
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MovementType::Entry => f.write_str("ENTRY"),
            MovementType::Exit => f.write_str("EXIT"),
        }
    }
}

/// Append-only ledger record.
///
/// `product_name` is a snapshot taken when the movement is recorded, so history
/// stays readable after the product is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: MovementId,
    pub product_id: ProductId,
    #[serde(rename = "type")]
    pub kind: MovementType,
    pub quantity: u64,
    pub date: DateTime<Utc>,
    pub reason: String,
    #[serde(default)]
    pub product_name: String,
}

impl Movement {
    /// Signed stock delta this movement applied.
    pub fn delta(&self) -> i128 {
        match self.kind {
            MovementType::Entry => i128::from(self.quantity),
            MovementType::Exit => -i128::from(self.quantity),
        }
    }
}

impl Entity for Movement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Caller input for recording a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub product_id: ProductId,
    #[serde(rename = "type")]
    pub kind: MovementType,
    pub quantity: u64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl MovementRequest {
    /// Request stamped with the current time and no explicit reason.
    pub fn new(product_id: ProductId, kind: MovementType, quantity: u64) -> Self {
        Self {
            product_id,
            kind,
            quantity,
            date: Utc::now(),
            reason: None,
        }
    }

    pub fn entry(product_id: ProductId, quantity: u64) -> Self {
        Self::new(product_id, MovementType::Entry, quantity)
    }

    pub fn exit(product_id: ProductId, quantity: u64) -> Self {
        Self::new(product_id, MovementType::Exit, quantity)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn at(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// The reason to record: the caller's text as given, or the type default
    /// when it is missing or empty.
    pub fn effective_reason(&self) -> String {
        match self.reason.as_deref() {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => self.kind.default_reason().to_string(),
        }
    }
}

/// Command: RecordMovement (request + pre-assigned movement id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMovement {
    pub movement_id: MovementId,
    pub request: MovementRequest,
}

impl RecordMovement {
    pub fn new(movement_id: MovementId, request: MovementRequest) -> Self {
        Self {
            movement_id,
            request,
        }
    }
}

impl Aggregate for Product {
    type Command = RecordMovement;
    type Event = Movement;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        // `handle` already bounded the delta; saturate rather than wrap if a
        // foreign record slips through.
        self.quantity_in_stock = match event.kind {
            MovementType::Entry => self.quantity_in_stock.saturating_add(event.quantity),
            MovementType::Exit => self.quantity_in_stock.saturating_sub(event.quantity),
        };
    }

    fn handle(&self, command: &Self::Command) -> Result<Self::Event, Self::Error> {
        let req = &command.request;

        if req.product_id != self.id {
            return Err(DomainError::product_not_found(req.product_id.as_str()));
        }
        if req.quantity == 0 {
            return Err(DomainError::invalid_quantity(req.quantity));
        }

        match req.kind {
            MovementType::Entry => {
                if self.quantity_in_stock.checked_add(req.quantity).is_none() {
                    return Err(DomainError::invalid_quantity(req.quantity));
                }
            }
            MovementType::Exit => {
                if req.quantity > self.quantity_in_stock {
                    return Err(DomainError::insufficient_stock(
                        self.id.as_str(),
                        req.quantity,
                        self.quantity_in_stock,
                    ));
                }
            }
        }

        Ok(Movement {
            id: command.movement_id.clone(),
            product_id: self.id.clone(),
            kind: req.kind,
            quantity: req.quantity,
            date: req.date,
            reason: req.effective_reason(),
            product_name: self.name.clone(),
        })
    }
}
