use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ItemKind, ItemRef, NewOrder, Order, OrderLineItem, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow, OrderStatusChangeset};

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn load_items(conn: &mut PgConnection, order: &OrderRow) -> Result<Vec<OrderItemRow>, DomainError> {
    Ok(OrderItemRow::belonging_to(order)
        .select(OrderItemRow::as_select())
        .order(order_items::position.asc())
        .load(conn)?)
}

/// `items` may come in any order (multi-row `RETURNING` has none); they are
/// put back in request order by `position`.
fn to_order(row: OrderRow, mut items: Vec<OrderItemRow>) -> Result<Order, DomainError> {
    items.sort_by_key(|item| item.position);
    let status = row
        .status
        .parse::<OrderStatus>()
        .map_err(|_| DomainError::Internal(format!("order {} has status {}", row.id, row.status)))?;
    let items = items
        .into_iter()
        .map(|item| {
            let kind = item.item_type.parse::<ItemKind>().map_err(|_| {
                DomainError::Internal(format!("order item {} has type {}", item.id, item.item_type))
            })?;
            Ok(OrderLineItem {
                item: ItemRef::new(kind, item.ref_id),
                price: item.price,
                quantity: item.quantity,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    Ok(Order {
        id: row.id,
        items,
        status,
        created_by: row.created_by,
        prepared_by: row.prepared_by,
        total_price: row.total_price,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: Uuid::new_v4(),
                    status: OrderStatus::Pending.as_str().to_string(),
                    created_by: order.created_by,
                    total_price: order.total_price.clone(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            let new_items: Vec<NewOrderItemRow> = order
                .items
                .iter()
                .enumerate()
                .map(|(position, line)| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id: row.id,
                    position: position as i32,
                    item_type: line.item.kind().as_str().to_string(),
                    ref_id: line.item.id(),
                    price: line.price.clone(),
                    quantity: line.quantity,
                })
                .collect();
            let items = diesel::insert_into(order_items::table)
                .values(&new_items)
                .returning(OrderItemRow::as_returning())
                .get_results(conn)?;

            to_order(row, items)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = load_items(&mut conn, &order)?;
        to_order(order, items).map(Some)
    }

    fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::status.eq(status.as_str()))
            .select(OrderRow::as_select())
            .order((orders::created_at.asc(), orders::id.asc()))
            .load(&mut conn)?;

        let items = OrderItemRow::belonging_to(&rows)
            .select(OrderItemRow::as_select())
            .order(order_items::position.asc())
            .load(&mut conn)?
            .grouped_by(&rows);

        rows.into_iter()
            .zip(items)
            .map(|(row, items)| to_order(row, items))
            .collect()
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        prepared_by: Option<Uuid>,
    ) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(orders::table.find(id))
            .set(&OrderStatusChangeset {
                status: status.as_str().to_string(),
                prepared_by,
                updated_at: Utc::now(),
            })
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = load_items(&mut conn, &row)?;
        to_order(row, items).map(Some)
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(orders::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
