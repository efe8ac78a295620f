use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{
    Menu, MenuChanges, MenuPrice, NewMenu, NewProduct, Product, ProductChanges,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{menu_products, menus, products};

use super::models::{
    MenuChangeset, MenuProductRow, MenuRow, NewMenuRow, NewProductRow, ProductChangeset,
    ProductRow,
};

#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn to_menu(row: MenuRow, product_ids: Vec<Uuid>) -> Menu {
    Menu {
        id: row.id,
        name: row.name,
        price: row.price,
        product_ids,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Loads the product links of `rows` in one query and assembles the menus.
fn with_products(conn: &mut PgConnection, rows: Vec<MenuRow>) -> Result<Vec<Menu>, DomainError> {
    let links = MenuProductRow::belonging_to(&rows)
        .select(MenuProductRow::as_select())
        .order(menu_products::position.asc())
        .load(conn)?
        .grouped_by(&rows);

    Ok(rows
        .into_iter()
        .zip(links)
        .map(|(row, links)| to_menu(row, links.into_iter().map(|l| l.product_id).collect()))
        .collect())
}

fn replace_links(
    conn: &mut PgConnection,
    menu_id: Uuid,
    product_ids: &[Uuid],
) -> Result<(), DomainError> {
    diesel::delete(menu_products::table.filter(menu_products::menu_id.eq(menu_id)))
        .execute(conn)?;
    let links: Vec<MenuProductRow> = product_ids
        .iter()
        .enumerate()
        .map(|(position, product_id)| MenuProductRow {
            menu_id,
            product_id: *product_id,
            position: position as i32,
        })
        .collect();
    diesel::insert_into(menu_products::table)
        .values(&links)
        .execute(conn)?;
    Ok(())
}

impl CatalogRepository for DieselCatalogRepository {
    fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .filter(products::id.eq_any(ids.to_vec()))
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_menu_prices(&self, ids: &[Uuid]) -> Result<Vec<MenuPrice>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = menus::table
            .filter(menus::id.eq_any(ids.to_vec()))
            .select((menus::id, menus::price))
            .load::<(Uuid, BigDecimal)>(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|(id, price)| MenuPrice { id, price })
            .collect())
    }

    fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .select(ProductRow::as_select())
            .order(products::created_at.desc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .filter(products::name.eq(name))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: Uuid::new_v4(),
                name: product.name,
                description: product.description,
                price: product.price,
                image: product.image,
                is_available: product.is_available,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(products::table.find(id))
            .set(&ProductChangeset {
                name: changes.name,
                description: changes.description,
                price: changes.price,
                image: changes.image,
                is_available: changes.is_available,
                updated_at: Utc::now(),
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn delete_product(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        match diesel::delete(products::table.find(id)).execute(&mut conn) {
            Ok(deleted) => Ok(deleted > 0),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _,
            )) => Err(DomainError::Conflict(
                "Product is still part of a menu".into(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn list_menus(&self) -> Result<Vec<Menu>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = menus::table
            .select(MenuRow::as_select())
            .order(menus::created_at.desc())
            .load(&mut conn)?;
        with_products(&mut conn, rows)
    }

    fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = menus::table
            .find(id)
            .select(MenuRow::as_select())
            .first(&mut conn)
            .optional()?;
        match row {
            Some(row) => Ok(with_products(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn create_menu(&self, menu: NewMenu) -> Result<Menu, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = diesel::insert_into(menus::table)
                .values(&NewMenuRow {
                    id: Uuid::new_v4(),
                    name: menu.name.clone(),
                    price: menu.price.clone(),
                })
                .returning(MenuRow::as_returning())
                .get_result(conn)?;
            replace_links(conn, row.id, &menu.product_ids)?;
            Ok(to_menu(row, menu.product_ids.clone()))
        })
    }

    fn update_menu(&self, id: Uuid, changes: MenuChanges) -> Result<Option<Menu>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = diesel::update(menus::table.find(id))
                .set(&MenuChangeset {
                    name: changes.name.clone(),
                    price: changes.price.clone(),
                    updated_at: Utc::now(),
                })
                .returning(MenuRow::as_returning())
                .get_result(conn)
                .optional()?;

            let Some(row) = row else {
                return Ok(None);
            };
            if let Some(product_ids) = &changes.product_ids {
                replace_links(conn, id, product_ids)?;
            }
            Ok(with_products(conn, vec![row])?.pop())
        })
    }

    fn delete_menu(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(menus::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
