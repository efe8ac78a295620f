//! In-memory repositories for unit and handler tests.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::{
    Menu, MenuChanges, MenuPrice, NewMenu, NewProduct, Product, ProductChanges,
};
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::domain::ports::{CatalogRepository, OrderRepository, UserRepository};
use crate::domain::user::{NewUser, User, UserCredentials};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryOrders {
    orders: Arc<Mutex<Vec<Order>>>,
}

impl InMemoryOrders {
    pub fn len(&self) -> usize {
        lock(&self.orders).len()
    }
}

impl OrderRepository for InMemoryOrders {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            items: order.items,
            status: OrderStatus::Pending,
            created_by: order.created_by,
            prepared_by: None,
            total_price: order.total_price,
            created_at: now,
            updated_at: now,
        };
        lock(&self.orders).push(order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(lock(&self.orders).iter().find(|o| o.id == id).cloned())
    }

    fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
        let mut found: Vec<Order> = lock(&self.orders)
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        found.sort_by_key(|o| o.created_at);
        Ok(found)
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        prepared_by: Option<Uuid>,
    ) -> Result<Option<Order>, DomainError> {
        let mut orders = lock(&self.orders);
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.status = status;
        if prepared_by.is_some() {
            order.prepared_by = prepared_by;
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut orders = lock(&self.orders);
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() < before)
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CatalogState {
    products: Vec<Product>,
    menus: Vec<Menu>,
    product_lookups: usize,
    menu_lookups: usize,
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn add_product(&self, name: &str, price: &str, is_available: bool) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: BigDecimal::from_str(price).expect("test price"),
            image: None,
            is_available,
            created_at: now,
            updated_at: now,
        };
        lock(&self.state).products.push(product.clone());
        product
    }

    pub fn add_menu(&self, name: &str, price: &str, product_ids: Vec<Uuid>) -> Menu {
        let now = Utc::now();
        let menu = Menu {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price: BigDecimal::from_str(price).expect("test price"),
            product_ids,
            created_at: now,
            updated_at: now,
        };
        lock(&self.state).menus.push(menu.clone());
        menu
    }

    pub fn set_price(&self, id: Uuid, price: &str) {
        let price = BigDecimal::from_str(price).expect("test price");
        let mut state = lock(&self.state);
        if let Some(product) = state.products.iter_mut().find(|p| p.id == id) {
            product.price = price;
        } else if let Some(menu) = state.menus.iter_mut().find(|m| m.id == id) {
            menu.price = price;
        }
    }

    /// Number of grouped product lookups served so far.
    pub fn product_lookups(&self) -> usize {
        lock(&self.state).product_lookups
    }

    pub fn menu_lookups(&self) -> usize {
        lock(&self.state).menu_lookups
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut state = lock(&self.state);
        state.product_lookups += 1;
        Ok(state
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn find_menu_prices(&self, ids: &[Uuid]) -> Result<Vec<MenuPrice>, DomainError> {
        let mut state = lock(&self.state);
        state.menu_lookups += 1;
        Ok(state
            .menus
            .iter()
            .filter(|m| ids.contains(&m.id))
            .map(|m| MenuPrice {
                id: m.id,
                price: m.price.clone(),
            })
            .collect())
    }

    fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(lock(&self.state).products.iter().rev().cloned().collect())
    }

    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(lock(&self.state)
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, DomainError> {
        Ok(lock(&self.state)
            .products
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut state = lock(&self.state);
        if state.products.iter().any(|p| p.name == product.name) {
            return Err(DomainError::Conflict("duplicate product name".into()));
        }
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            price: product.price,
            image: product.image,
            is_available: product.is_available,
            created_at: now,
            updated_at: now,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, DomainError> {
        let mut state = lock(&self.state);
        let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = Some(description);
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(image) = changes.image {
            product.image = Some(image);
        }
        if let Some(is_available) = changes.is_available {
            product.is_available = is_available;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    fn delete_product(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = lock(&self.state);
        if state.menus.iter().any(|m| m.product_ids.contains(&id)) {
            return Err(DomainError::Conflict(
                "Product is still part of a menu".into(),
            ));
        }
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        Ok(state.products.len() < before)
    }

    fn list_menus(&self) -> Result<Vec<Menu>, DomainError> {
        Ok(lock(&self.state).menus.iter().rev().cloned().collect())
    }

    fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, DomainError> {
        Ok(lock(&self.state).menus.iter().find(|m| m.id == id).cloned())
    }

    fn create_menu(&self, menu: NewMenu) -> Result<Menu, DomainError> {
        let now = Utc::now();
        let menu = Menu {
            id: Uuid::new_v4(),
            name: menu.name,
            price: menu.price,
            product_ids: menu.product_ids,
            created_at: now,
            updated_at: now,
        };
        lock(&self.state).menus.push(menu.clone());
        Ok(menu)
    }

    fn update_menu(&self, id: Uuid, changes: MenuChanges) -> Result<Option<Menu>, DomainError> {
        let mut state = lock(&self.state);
        let Some(menu) = state.menus.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            menu.name = name;
        }
        if let Some(price) = changes.price {
            menu.price = price;
        }
        if let Some(product_ids) = changes.product_ids {
            menu.product_ids = product_ids;
        }
        menu.updated_at = Utc::now();
        Ok(Some(menu.clone()))
    }

    fn delete_menu(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = lock(&self.state);
        let before = state.menus.len();
        state.menus.retain(|m| m.id != id);
        Ok(state.menus.len() < before)
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    users: Arc<Mutex<Vec<UserCredentials>>>,
}

impl UserRepository for InMemoryUsers {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = lock(&self.users);
        if users.iter().any(|c| c.user.username == user.username) {
            return Err(DomainError::Conflict("duplicate username".into()));
        }
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(UserCredentials {
            user: created.clone(),
            password_hash: user.password_hash,
        });
        Ok(created)
    }

    fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(lock(&self.users)
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(lock(&self.users).iter().any(|c| c.user.username == username))
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(lock(&self.users)
            .iter()
            .rev()
            .map(|c| c.user.clone())
            .collect())
    }

    fn count(&self) -> Result<i64, DomainError> {
        Ok(lock(&self.users).len() as i64)
    }
}
