use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ItemRef, ItemRequest, OrderLineItem};
use crate::domain::ports::CatalogRepository;
use crate::domain::pricing::{calculate_total_price, resolve_line_items};

/// Line items stamped with catalog prices, plus their total.
#[derive(Debug, Clone)]
pub struct PricedItems {
    pub items: Vec<OrderLineItem>,
    pub total_price: BigDecimal,
}

pub struct PricingEngine<C> {
    catalog: C,
}

impl<C: CatalogRepository> PricingEngine<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Resolves every requested item against the catalog and totals the order.
    ///
    /// Issues at most two catalog queries (one for products, one for menus)
    /// whatever the number of items.
    pub fn price(&self, requests: &[ItemRequest]) -> Result<PricedItems, DomainError> {
        let (product_ids, menu_ids) = referenced_ids(requests);

        let products = if product_ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_products_by_ids(&product_ids)?
        };
        let menus = if menu_ids.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_menu_prices(&menu_ids)?
        };

        let items = resolve_line_items(requests, &products, &menus)?;
        let total_price = calculate_total_price(&items);
        Ok(PricedItems { items, total_price })
    }
}

fn referenced_ids(requests: &[ItemRequest]) -> (Vec<Uuid>, Vec<Uuid>) {
    let mut product_ids = Vec::new();
    let mut menu_ids = Vec::new();
    for request in requests {
        let (ids, id) = match request.item {
            ItemRef::Product(id) => (&mut product_ids, id),
            ItemRef::Menu(id) => (&mut menu_ids, id),
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    (product_ids, menu_ids)
}
