use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::policy;
use super::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Ready,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// The only status an order may move to from `self`.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    /// Role in charge of moving an order into `self`. `None` for `pending`,
    /// which is only ever reached at creation.
    pub fn entered_by(self) -> Option<Role> {
        match self {
            OrderStatus::Pending => None,
            OrderStatus::Ready => Some(Role::Preparateur),
            OrderStatus::Delivered => Some(Role::Accueil),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation("Invalid status value"))
    }
}

/// Role half of the transition policy: may `role` ask for `target` at all?
///
/// Admin may ask for anything; `pending` is reachable by nobody else.
pub fn authorize_target(role: Role, target: OrderStatus) -> Result<(), DomainError> {
    let allowed = match target.entered_by() {
        Some(required) => policy::permits(role, required),
        None => role == Role::Admin,
    };
    if allowed {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            "You are not allowed to change the status to this value",
        ))
    }
}

/// State half of the transition policy: `current -> target` must be the single
/// forward step of the state machine.
pub fn ensure_transition(current: OrderStatus, target: OrderStatus) -> Result<(), DomainError> {
    if current.next() == Some(target) {
        return Ok(());
    }
    let msg = match target {
        OrderStatus::Delivered => "Order must be ready before being delivered".to_string(),
        OrderStatus::Ready => "Order must be pending before being marked ready".to_string(),
        OrderStatus::Pending => format!("Order cannot go back from {current} to pending"),
    };
    Err(DomainError::InvalidTransition(msg))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Product,
    Menu,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Product => "product",
            ItemKind::Menu => "menu",
        }
    }
}

impl FromStr for ItemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(ItemKind::Product),
            "menu" => Ok(ItemKind::Menu),
            other => Err(DomainError::validation(format!("Invalid item type: {other}"))),
        }
    }
}

/// Catalog entity a line item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef {
    Product(Uuid),
    Menu(Uuid),
}

impl ItemRef {
    pub fn new(kind: ItemKind, id: Uuid) -> Self {
        match kind {
            ItemKind::Product => ItemRef::Product(id),
            ItemKind::Menu => ItemRef::Menu(id),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemRef::Product(_) => ItemKind::Product,
            ItemRef::Menu(_) => ItemKind::Menu,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ItemRef::Product(id) | ItemRef::Menu(id) => *id,
        }
    }
}

/// A requested line item, not yet priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRequest {
    pub item: ItemRef,
    pub quantity: i32,
}

impl ItemRequest {
    /// Builds a request from the loose wire shape, where exactly one of the
    /// two ids must be set and the quantity must be positive.
    pub fn from_parts(
        product_id: Option<Uuid>,
        menu_id: Option<Uuid>,
        quantity: i32,
    ) -> Result<Self, DomainError> {
        let item = match (product_id, menu_id) {
            (Some(id), None) => ItemRef::Product(id),
            (None, Some(id)) => ItemRef::Menu(id),
            (None, None) => {
                return Err(DomainError::validation(
                    "Each item must include a productId or a menuId.",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(DomainError::validation(
                    "An item cannot include both a productId and a menuId.",
                ))
            }
        };
        if quantity < 1 {
            return Err(DomainError::validation("Quantity must be a positive integer"));
        }
        Ok(Self { item, quantity })
    }
}

/// A line item with the unit price captured when the order was created.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineItem {
    pub item: ItemRef,
    pub price: BigDecimal,
    pub quantity: i32,
}

impl OrderLineItem {
    pub fn subtotal(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<OrderLineItem>,
    pub status: OrderStatus,
    pub created_by: Uuid,
    pub prepared_by: Option<Uuid>,
    pub total_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A priced order ready to be persisted. Orders are always stored as `pending`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<OrderLineItem>,
    pub created_by: Uuid,
    pub total_price: BigDecimal,
}

/// Parses a path identifier, reporting `what` in the validation message.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::validation(format!("Invalid {what} ID")))
}
