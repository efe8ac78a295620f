use std::collections::HashMap;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::catalog::{MenuPrice, Product};
use super::errors::DomainError;
use super::order::{ItemRef, ItemRequest, OrderLineItem};

/// Sum of `price * quantity` over the line items. Zero for an empty slice.
pub fn calculate_total_price(items: &[OrderLineItem]) -> BigDecimal {
    items.iter().map(OrderLineItem::subtotal).sum()
}

/// Matches every requested item against the fetched catalog entries and stamps
/// it with the current unit price. Request order is preserved.
///
/// Products must exist and be available; menus only need to exist.
pub fn resolve_line_items(
    requests: &[ItemRequest],
    products: &[Product],
    menus: &[MenuPrice],
) -> Result<Vec<OrderLineItem>, DomainError> {
    let products: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let menus: HashMap<Uuid, &BigDecimal> = menus.iter().map(|m| (m.id, &m.price)).collect();

    requests
        .iter()
        .map(|request| {
            let price = match request.item {
                ItemRef::Product(id) => {
                    let product = products.get(&id).ok_or_else(|| {
                        DomainError::Resolution(format!("Unable to find product: {id}"))
                    })?;
                    if !product.is_available {
                        return Err(DomainError::Resolution(format!(
                            "Product not available: {}",
                            product.name
                        )));
                    }
                    product.price.clone()
                }
                ItemRef::Menu(id) => menus
                    .get(&id)
                    .map(|&price| price.clone())
                    .ok_or_else(|| DomainError::Resolution(format!("Unable to find menu: {id}")))?,
            };
            Ok(OrderLineItem {
                item: request.item,
                price,
                quantity: request.quantity,
            })
        })
        .collect()
}
