use diesel::dsl::exists;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, Role, User, UserCredentials};
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_credentials(row: UserRow) -> Result<UserCredentials, DomainError> {
    let role = row
        .role
        .parse::<Role>()
        .map_err(|_| DomainError::Internal(format!("user {} has role {}", row.id, row.role)))?;
    Ok(UserCredentials {
        user: User {
            id: row.id,
            username: row.username,
            role,
            created_at: row.created_at,
        },
        password_hash: row.password_hash,
    })
}

impl UserRepository for DieselUserRepository {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                username: user.username,
                password_hash: user.password_hash,
                role: user.role.as_str().to_string(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)?;
        Ok(to_credentials(row)?.user)
    }

    fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(to_credentials).transpose()
    }

    fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::select(exists(
            users::table.filter(users::username.eq(username)),
        ))
        .get_result(&mut conn)?)
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self.pool.get()?;
        users::table
            .select(UserRow::as_select())
            .order(users::created_at.desc())
            .load(&mut conn)?
            .into_iter()
            .map(|row| to_credentials(row).map(|c| c.user))
            .collect()
    }

    fn count(&self) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(users::table.count().get_result(&mut conn)?)
    }
}
