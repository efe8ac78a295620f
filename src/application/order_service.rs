use crate::domain::errors::DomainError;
use crate::domain::order::{self, parse_id, ItemRequest, NewOrder, Order, OrderStatus};
use crate::domain::policy;
use crate::domain::ports::{CatalogRepository, OrderRepository};
use crate::domain::user::{Actor, Role};

use super::pricing::PricingEngine;

/// Order lifecycle: creation, the preparation queue, status transitions and deletion.
pub struct OrderService<R, C> {
    repo: R,
    pricing: PricingEngine<C>,
}

impl<R: OrderRepository, C: CatalogRepository> OrderService<R, C> {
    pub fn new(repo: R, catalog: C) -> Self {
        Self {
            repo,
            pricing: PricingEngine::new(catalog),
        }
    }

    /// Prices `items` against the catalog and stores a new `pending` order
    /// owned by `actor`.
    ///
    /// Prices are read and the order written without a shared transaction: a
    /// catalog edit landing in between is not seen by this order.
    pub fn create_order(&self, actor: &Actor, items: Vec<ItemRequest>) -> Result<Order, DomainError> {
        if items.is_empty() {
            return Err(DomainError::validation("Order is empty"));
        }
        policy::require(actor, Role::Accueil)?;

        let priced = self.pricing.price(&items)?;
        let order = self.repo.create(NewOrder {
            items: priced.items,
            created_by: actor.id,
            total_price: priced.total_price,
        })?;

        log::info!(
            "order {} created by {} ({} items, total {})",
            order.id,
            actor.id,
            order.items.len(),
            order.total_price
        );
        Ok(order)
    }

    /// Pending orders, oldest first.
    pub fn list_awaiting_preparation(&self, actor: &Actor) -> Result<Vec<Order>, DomainError> {
        policy::require(actor, Role::Preparateur)?;
        self.repo.list_by_status(OrderStatus::Pending)
    }

    pub fn get_order(&self, actor: &Actor, id: &str) -> Result<Order, DomainError> {
        let id = parse_id(id, "order")?;
        policy::require(actor, Role::Preparateur)?;
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("Order"))
    }

    /// Applies one step of the state machine.
    ///
    /// Checks run in this order: id format, status value, role against the
    /// target status, order existence, then the source status.
    pub fn update_status(
        &self,
        actor: &Actor,
        id: &str,
        status: Option<&str>,
    ) -> Result<Order, DomainError> {
        let id = parse_id(id, "order")?;
        let requested: OrderStatus = status
            .ok_or_else(|| DomainError::validation("Status is required"))?
            .parse()?;

        policy::require_any(actor, &[Role::Preparateur, Role::Accueil])?;
        if let Err(e) = order::authorize_target(actor.role, requested) {
            log::warn!(
                "user {} ({}) may not set order {} to {}",
                actor.id,
                actor.role,
                id,
                requested
            );
            return Err(e);
        }

        let current = self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("Order"))?;
        order::ensure_transition(current.status, requested)?;

        let prepared_by = (requested == OrderStatus::Ready).then_some(actor.id);
        let updated = self
            .repo
            .update_status(id, requested, prepared_by)?
            .ok_or(DomainError::NotFound("Order"))?;

        log::info!(
            "order {} moved {} -> {} by {}",
            id,
            current.status,
            updated.status,
            actor.id
        );
        Ok(updated)
    }

    /// Deletes an order on behalf of its author. Ownership is checked before
    /// anything is removed; admin gets no override here.
    pub fn delete_order(&self, actor: &Actor, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id, "order")?;
        let order = self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("Order"))?;
        if order.created_by != actor.id {
            log::warn!(
                "user {} tried to delete order {} owned by {}",
                actor.id,
                id,
                order.created_by
            );
            return Err(DomainError::forbidden("You are not allowed to delete this order"));
        }
        if !self.repo.delete(id)? {
            return Err(DomainError::NotFound("Order"));
        }
        log::info!("order {} deleted by {}", id, actor.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    use super::*;
    use crate::domain::order::ItemRef;
    use crate::testing::{InMemoryCatalog, InMemoryOrders};

    struct Fixture {
        service: OrderService<InMemoryOrders, InMemoryCatalog>,
        orders: InMemoryOrders,
        catalog: InMemoryCatalog,
    }

    fn fixture() -> Fixture {
        let orders = InMemoryOrders::default();
        let catalog = InMemoryCatalog::default();
        Fixture {
            service: OrderService::new(orders.clone(), catalog.clone()),
            orders,
            catalog,
        }
    }

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
        }
    }

    fn product_item(id: Uuid, quantity: i32) -> ItemRequest {
        ItemRequest {
            item: ItemRef::Product(id),
            quantity,
        }
    }

    fn pending_order(f: &Fixture, owner: &Actor) -> Order {
        let fries = f.catalog.add_product(&format!("Fries {}", Uuid::new_v4()), "2.5", true);
        f.service
            .create_order(owner, vec![product_item(fries.id, 1)])
            .expect("order should be created")
    }

    fn set_status(f: &Fixture, id: Uuid, status: OrderStatus) {
        f.orders
            .update_status(id, status, None)
            .expect("update should succeed")
            .expect("order should exist");
    }

    // ── createOrder ──────────────────────────────────────────────────────────

    #[test]
    fn create_order_snapshots_prices_and_totals() {
        let f = fixture();
        let burger = f.catalog.add_product("Burger", "3", true);
        let wrap = f.catalog.add_product("Wrap", "4.5", true);
        let caller = actor(Role::Accueil);

        let order = f
            .service
            .create_order(&caller, vec![product_item(burger.id, 4), product_item(wrap.id, 6)])
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_by, caller.id);
        assert_eq!(order.prepared_by, None);
        assert_eq!(order.total_price, BigDecimal::from(39));
        assert_eq!(order.items[1].price, BigDecimal::from_str("4.5").unwrap());
        assert_eq!(f.orders.len(), 1);
    }

    #[test]
    fn later_catalog_price_changes_do_not_touch_existing_orders() {
        let f = fixture();
        let burger = f.catalog.add_product("Burger", "3", true);
        let caller = actor(Role::Accueil);
        let order = f
            .service
            .create_order(&caller, vec![product_item(burger.id, 2)])
            .unwrap();

        f.catalog.set_price(burger.id, "10");

        let stored = f.orders.find_by_id(order.id).unwrap().unwrap();
        assert_eq!(stored.total_price, BigDecimal::from(6));
        assert_eq!(stored.items[0].price, BigDecimal::from(3));
    }

    #[test]
    fn empty_order_is_rejected_for_every_role() {
        let f = fixture();
        for role in Role::ALL {
            let err = f.service.create_order(&actor(role), vec![]).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{role}");
        }
        assert_eq!(f.orders.len(), 0);
    }

    #[test]
    fn preparateur_cannot_create_orders() {
        let f = fixture();
        let burger = f.catalog.add_product("Burger", "3", true);
        let err = f
            .service
            .create_order(&actor(Role::Preparateur), vec![product_item(burger.id, 1)])
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn admin_can_create_orders() {
        let f = fixture();
        let burger = f.catalog.add_product("Burger", "3", true);
        assert!(f
            .service
            .create_order(&actor(Role::Admin), vec![product_item(burger.id, 1)])
            .is_ok());
    }

    #[test]
    fn unknown_reference_persists_nothing() {
        let f = fixture();
        let burger = f.catalog.add_product("Burger", "3", true);
        let err = f
            .service
            .create_order(
                &actor(Role::Accueil),
                vec![
                    product_item(burger.id, 1),
                    ItemRequest { item: ItemRef::Menu(Uuid::new_v4()), quantity: 1 },
                ],
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Resolution(_)));
        assert_eq!(f.orders.len(), 0);
    }

    #[test]
    fn unavailable_product_persists_nothing() {
        let f = fixture();
        let sold_out = f.catalog.add_product("McFlurry", "3", false);
        let err = f
            .service
            .create_order(&actor(Role::Accueil), vec![product_item(sold_out.id, 1)])
            .unwrap_err();
        assert!(matches!(err, DomainError::Resolution(_)));
        assert_eq!(f.orders.len(), 0);
    }

    // ── listOrdersAwaitingPreparation / getOrder ────────────────────────────

    #[test]
    fn preparation_queue_is_pending_orders_oldest_first() {
        let f = fixture();
        let counter = actor(Role::Accueil);
        let first = pending_order(&f, &counter);
        let second = pending_order(&f, &counter);
        let done = pending_order(&f, &counter);
        set_status(&f, done.id, OrderStatus::Ready);

        let queue = f
            .service
            .list_awaiting_preparation(&actor(Role::Preparateur))
            .unwrap();

        let ids: Vec<Uuid> = queue.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn accueil_cannot_read_the_preparation_queue() {
        let f = fixture();
        let err = f
            .service
            .list_awaiting_preparation(&actor(Role::Accueil))
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn get_order_validates_id_and_reports_missing() {
        let f = fixture();
        let cook = actor(Role::Preparateur);
        assert!(matches!(
            f.service.get_order(&cook, "42"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            f.service.get_order(&cook, &Uuid::new_v4().to_string()),
            Err(DomainError::NotFound("Order"))
        ));
    }

    #[test]
    fn get_order_returns_items() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        let found = f
            .service
            .get_order(&actor(Role::Admin), &order.id.to_string())
            .unwrap();
        assert_eq!(found.items, order.items);
    }

    // ── updateOrderStatus ────────────────────────────────────────────────────

    #[test]
    fn preparateur_marks_pending_order_ready() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        let cook = actor(Role::Preparateur);

        let updated = f
            .service
            .update_status(&cook, &order.id.to_string(), Some("ready"))
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Ready);
        assert_eq!(updated.prepared_by, Some(cook.id));
    }

    #[test]
    fn admin_prepares_and_delivers_an_order() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        let admin = actor(Role::Admin);

        let ready = f
            .service
            .update_status(&admin, &order.id.to_string(), Some("ready"))
            .unwrap();
        assert_eq!(ready.status, OrderStatus::Ready);
        assert_eq!(ready.prepared_by, Some(admin.id));

        let delivered = f
            .service
            .update_status(&admin, &order.id.to_string(), Some("delivered"))
            .unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert_eq!(delivered.prepared_by, Some(admin.id));
    }

    #[test]
    fn preparateur_cannot_deliver_even_a_ready_order() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        let cook = actor(Role::Preparateur);
        f.service
            .update_status(&cook, &order.id.to_string(), Some("ready"))
            .unwrap();

        let err = f
            .service
            .update_status(&cook, &order.id.to_string(), Some("delivered"))
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn accueil_cannot_mark_ready() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        let err = f
            .service
            .update_status(&actor(Role::Accueil), &order.id.to_string(), Some("ready"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn accueil_delivering_a_pending_order_is_a_precondition_failure() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        let err = f
            .service
            .update_status(&actor(Role::Accueil), &order.id.to_string(), Some("delivered"))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        let stored = f.orders.find_by_id(order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[test]
    fn accueil_and_admin_deliver_ready_orders() {
        let f = fixture();
        for role in [Role::Accueil, Role::Admin] {
            let order = pending_order(&f, &actor(Role::Accueil));
            set_status(&f, order.id, OrderStatus::Ready);

            let updated = f
                .service
                .update_status(&actor(role), &order.id.to_string(), Some("delivered"))
                .unwrap();

            assert_eq!(updated.status, OrderStatus::Delivered);
        }
    }

    #[test]
    fn invalid_status_fails_validation_before_role_check() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        for role in Role::ALL {
            let err = f
                .service
                .update_status(&actor(role), &order.id.to_string(), Some("eaten"))
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{role}");
        }
    }

    #[test]
    fn missing_status_fails_validation() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        let err = f
            .service
            .update_status(&actor(Role::Admin), &order.id.to_string(), None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Status is required");
    }

    #[test]
    fn nobody_but_admin_may_ask_for_pending_and_admin_cannot_go_back() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        set_status(&f, order.id, OrderStatus::Ready);
        let id = order.id.to_string();

        for role in [Role::Preparateur, Role::Accueil] {
            assert!(matches!(
                f.service.update_status(&actor(role), &id, Some("pending")),
                Err(DomainError::Forbidden(_))
            ));
        }
        assert!(matches!(
            f.service.update_status(&actor(Role::Admin), &id, Some("pending")),
            Err(DomainError::InvalidTransition(_))
        ));
    }

    #[test]
    fn admin_cannot_skip_ready() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));
        let err = f
            .service
            .update_status(&actor(Role::Admin), &order.id.to_string(), Some("delivered"))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn update_status_of_missing_order_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .update_status(&actor(Role::Preparateur), &Uuid::new_v4().to_string(), Some("ready"))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Order")));
    }

    // ── deleteOrder ──────────────────────────────────────────────────────────

    #[test]
    fn author_deletes_own_order() {
        let f = fixture();
        let counter = actor(Role::Accueil);
        let order = pending_order(&f, &counter);

        f.service.delete_order(&counter, &order.id.to_string()).unwrap();

        assert_eq!(f.orders.len(), 0);
    }

    #[test]
    fn non_author_cannot_delete_and_order_survives() {
        let f = fixture();
        let order = pending_order(&f, &actor(Role::Accueil));

        for intruder in [actor(Role::Accueil), actor(Role::Admin)] {
            let err = f
                .service
                .delete_order(&intruder, &order.id.to_string())
                .unwrap_err();
            assert!(matches!(err, DomainError::Forbidden(_)));
        }
        assert!(f.orders.find_by_id(order.id).unwrap().is_some());
    }

    #[test]
    fn delete_reports_missing_and_malformed_ids() {
        let f = fixture();
        let counter = actor(Role::Accueil);
        assert!(matches!(
            f.service.delete_order(&counter, &Uuid::new_v4().to_string()),
            Err(DomainError::NotFound("Order"))
        ));
        assert!(matches!(
            f.service.delete_order(&counter, "nope"),
            Err(DomainError::Validation(_))
        ));
    }
}
