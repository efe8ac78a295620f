use std::sync::Arc;

use uuid::Uuid;

use super::catalog::{
    Menu, MenuChanges, MenuPrice, NewMenu, NewProduct, Product, ProductChanges,
};
use super::errors::DomainError;
use super::order::{NewOrder, Order, OrderStatus};
use super::user::{NewUser, User, UserCredentials};

pub trait OrderRepository: Send + Sync + 'static {
    /// Stores the order as `pending` and returns it as persisted.
    fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Orders in `status`, oldest first.
    fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError>;
    /// Overwrites the status (last writer wins). `prepared_by` is only written when `Some`.
    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        prepared_by: Option<Uuid>,
    ) -> Result<Option<Order>, DomainError>;
    /// Returns `false` when nothing was deleted.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

/// Read and write access to products and menus.
pub trait CatalogRepository: Send + Sync + 'static {
    /// Grouped lookup; ids that match nothing are simply absent from the result.
    fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
    /// Grouped price lookup, without the menus' product lists.
    fn find_menu_prices(&self, ids: &[Uuid]) -> Result<Vec<MenuPrice>, DomainError>;

    fn list_products(&self) -> Result<Vec<Product>, DomainError>;
    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, DomainError>;
    fn create_product(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, DomainError>;
    fn delete_product(&self, id: Uuid) -> Result<bool, DomainError>;

    fn list_menus(&self) -> Result<Vec<Menu>, DomainError>;
    fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, DomainError>;
    fn create_menu(&self, menu: NewMenu) -> Result<Menu, DomainError>;
    fn update_menu(&self, id: Uuid, changes: MenuChanges) -> Result<Option<Menu>, DomainError>;
    fn delete_menu(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    fn create(&self, user: NewUser) -> Result<User, DomainError>;
    fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, DomainError>;
    fn username_exists(&self, username: &str) -> Result<bool, DomainError>;
    /// All users, newest first.
    fn list(&self) -> Result<Vec<User>, DomainError>;
    fn count(&self) -> Result<i64, DomainError>;
}

// Shared handles forward to the wrapped repository so services can be built
// over `Arc<dyn ...>` as well as over concrete repositories.

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        (**self).create(order)
    }
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(id)
    }
    fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
        (**self).list_by_status(status)
    }
    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        prepared_by: Option<Uuid>,
    ) -> Result<Option<Order>, DomainError> {
        (**self).update_status(id, status, prepared_by)
    }
    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        (**self).delete(id)
    }
}

impl<T: CatalogRepository + ?Sized> CatalogRepository for Arc<T> {
    fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        (**self).find_products_by_ids(ids)
    }
    fn find_menu_prices(&self, ids: &[Uuid]) -> Result<Vec<MenuPrice>, DomainError> {
        (**self).find_menu_prices(ids)
    }
    fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        (**self).list_products()
    }
    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        (**self).find_product(id)
    }
    fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, DomainError> {
        (**self).find_product_by_name(name)
    }
    fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        (**self).create_product(product)
    }
    fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, DomainError> {
        (**self).update_product(id, changes)
    }
    fn delete_product(&self, id: Uuid) -> Result<bool, DomainError> {
        (**self).delete_product(id)
    }
    fn list_menus(&self) -> Result<Vec<Menu>, DomainError> {
        (**self).list_menus()
    }
    fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, DomainError> {
        (**self).find_menu(id)
    }
    fn create_menu(&self, menu: NewMenu) -> Result<Menu, DomainError> {
        (**self).create_menu(menu)
    }
    fn update_menu(&self, id: Uuid, changes: MenuChanges) -> Result<Option<Menu>, DomainError> {
        (**self).update_menu(id, changes)
    }
    fn delete_menu(&self, id: Uuid) -> Result<bool, DomainError> {
        (**self).delete_menu(id)
    }
}

impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        (**self).create(user)
    }
    fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, DomainError> {
        (**self).find_credentials(username)
    }
    fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        (**self).username_exists(username)
    }
    fn list(&self) -> Result<Vec<User>, DomainError> {
        (**self).list()
    }
    fn count(&self) -> Result<i64, DomainError> {
        (**self).count()
    }
}
