use crate::auth::password;
use crate::domain::errors::DomainError;
use crate::domain::policy;
use crate::domain::ports::UserRepository;
use crate::domain::user::{validate_password, Actor, NewUser, Role, User};

const BAD_CREDENTIALS: &str = "Invalid username or password";

pub struct UserService<U> {
    repo: U,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(repo: U) -> Self {
        Self { repo }
    }

    pub fn register(
        &self,
        actor: &Actor,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, DomainError> {
        policy::require(actor, Role::Admin)?;
        self.create_user(username, password, role)
    }

    pub fn list(&self, actor: &Actor) -> Result<Vec<User>, DomainError> {
        policy::require(actor, Role::Admin)?;
        self.repo.list()
    }

    /// Checks credentials. Unknown users and wrong passwords fail the same way.
    pub fn login(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::validation("Username and password are required"));
        }
        let Some(credentials) = self.repo.find_credentials(username)? else {
            log::warn!("login failed for unknown user {username}");
            return Err(DomainError::Unauthorized(BAD_CREDENTIALS.into()));
        };
        if !password::verify_password(password, &credentials.password_hash) {
            log::warn!("login failed for {username}: wrong password");
            return Err(DomainError::Unauthorized(BAD_CREDENTIALS.into()));
        }
        log::info!("user {} logged in", credentials.user.id);
        Ok(credentials.user)
    }

    /// Creates the first admin when the user table is empty. Returns the new
    /// admin, or `None` when users already exist.
    pub fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        if self.repo.count()? > 0 {
            return Ok(None);
        }
        let admin = self.create_user(username, password, Role::Admin)?;
        log::info!("bootstrap admin {} created", admin.username);
        Ok(Some(admin))
    }

    fn create_user(&self, username: &str, password: &str, role: Role) -> Result<User, DomainError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::validation("Username and password are required"));
        }
        validate_password(password)?;
        if self.repo.username_exists(username)? {
            return Err(DomainError::Conflict("Username already in use".into()));
        }
        let password_hash = password::hash_password(password)
            .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))?;
        let user = self.repo.create(NewUser {
            username: username.to_string(),
            password_hash,
            role,
        })?;
        log::info!("user {} registered as {}", user.username, user.role);
        Ok(user)
    }
}
