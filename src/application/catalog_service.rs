use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::catalog::{Menu, MenuChanges, NewMenu, NewProduct, Product, ProductChanges};
use crate::domain::errors::DomainError;
use crate::domain::order::parse_id;
use crate::domain::policy;
use crate::domain::ports::CatalogRepository;
use crate::domain::user::{Actor, Role};

/// Product and menu management. Reads are open to all staff, writes to admin.
pub struct CatalogService<C> {
    repo: C,
}

impl<C: CatalogRepository> CatalogService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    pub fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list_products()
    }

    pub fn get_product(&self, id: &str) -> Result<Product, DomainError> {
        let id = parse_id(id, "product")?;
        self.repo.find_product(id)?.ok_or(DomainError::NotFound("Product"))
    }

    pub fn create_product(&self, actor: &Actor, product: NewProduct) -> Result<Product, DomainError> {
        policy::require(actor, Role::Admin)?;
        if self.repo.find_product_by_name(&product.name)?.is_some() {
            return Err(DomainError::Conflict("This product already exists".into()));
        }
        let product = self.repo.create_product(product)?;
        log::info!("product {} ({}) created", product.id, product.name);
        Ok(product)
    }

    pub fn update_product(
        &self,
        actor: &Actor,
        id: &str,
        changes: ProductChanges,
    ) -> Result<Product, DomainError> {
        let id = parse_id(id, "product")?;
        policy::require(actor, Role::Admin)?;
        if let Some(name) = &changes.name {
            if let Some(existing) = self.repo.find_product_by_name(name)? {
                if existing.id != id {
                    return Err(DomainError::Conflict("This product already exists".into()));
                }
            }
        }
        let product = self
            .repo
            .update_product(id, changes)?
            .ok_or(DomainError::NotFound("Product"))?;
        log::info!("product {} updated", product.id);
        Ok(product)
    }

    /// Fails with a conflict while a menu still lists the product.
    pub fn delete_product(&self, actor: &Actor, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id, "product")?;
        policy::require(actor, Role::Admin)?;
        if !self.repo.delete_product(id)? {
            return Err(DomainError::NotFound("Product"));
        }
        log::info!("product {} deleted", id);
        Ok(())
    }

    pub fn list_menus(&self) -> Result<Vec<Menu>, DomainError> {
        self.repo.list_menus()
    }

    pub fn get_menu(&self, id: &str) -> Result<Menu, DomainError> {
        let id = parse_id(id, "menu")?;
        self.repo.find_menu(id)?.ok_or(DomainError::NotFound("Menu"))
    }

    pub fn create_menu(&self, actor: &Actor, menu: NewMenu) -> Result<Menu, DomainError> {
        policy::require(actor, Role::Admin)?;
        self.ensure_products_exist(&menu.product_ids)?;
        let menu = self.repo.create_menu(menu)?;
        log::info!("menu {} ({}) created", menu.id, menu.name);
        Ok(menu)
    }

    pub fn update_menu(
        &self,
        actor: &Actor,
        id: &str,
        changes: MenuChanges,
    ) -> Result<Menu, DomainError> {
        let id = parse_id(id, "menu")?;
        policy::require(actor, Role::Admin)?;
        if let Some(product_ids) = &changes.product_ids {
            self.ensure_products_exist(product_ids)?;
        }
        let menu = self
            .repo
            .update_menu(id, changes)?
            .ok_or(DomainError::NotFound("Menu"))?;
        log::info!("menu {} updated", menu.id);
        Ok(menu)
    }

    pub fn delete_menu(&self, actor: &Actor, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id, "menu")?;
        policy::require(actor, Role::Admin)?;
        if !self.repo.delete_menu(id)? {
            return Err(DomainError::NotFound("Menu"));
        }
        log::info!("menu {} deleted", id);
        Ok(())
    }

    fn ensure_products_exist(&self, product_ids: &[Uuid]) -> Result<(), DomainError> {
        if product_ids.is_empty() {
            return Err(DomainError::validation("Products list is required"));
        }
        let wanted: HashSet<Uuid> = product_ids.iter().copied().collect();
        let wanted: Vec<Uuid> = wanted.into_iter().collect();
        let found: HashSet<Uuid> = self
            .repo
            .find_products_by_ids(&wanted)?
            .into_iter()
            .map(|p| p.id)
            .collect();
        match wanted.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(DomainError::Resolution(format!(
                "Unable to find product: {missing}"
            ))),
            None => Ok(()),
        }
    }
}
