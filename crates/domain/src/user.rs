//! Users and their addresses.

use common::ObjectId;
use document_store::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repository::{Entity, Repository, Stored};
use crate::validation::{missing, require_id, require_text};

/// A postal address embedded in a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl Address {
    /// Creates an address with only street and number.
    pub fn new(street: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            number: number.into(),
            ..Self::default()
        }
    }

    pub fn with_city(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }

    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }
}

/// Input for creating a user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub addresses: Option<Vec<Address>>,
}

/// A registered user.
///
/// `phone` and `addresses` are stored as null when not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: String,
    email: String,
    password: String,
    phone: Option<String>,
    addresses: Option<Vec<Address>>,
}

impl User {
    /// Creates a user. Name, email and password are required.
    pub fn new(input: NewUser) -> Result<Self> {
        require_text(Self::NAME, "name", &input.name)?;
        require_text(Self::NAME, "email", &input.email)?;
        require_text(Self::NAME, "password", &input.password)?;

        let user = Self {
            name: input.name,
            email: input.email,
            password: input.password,
            phone: input.phone.filter(|phone| !phone.is_empty()),
            addresses: input.addresses,
        };
        tracing::info!(email = %user.email, "user validated");
        Ok(user)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn addresses(&self) -> &[Address] {
        self.addresses.as_deref().unwrap_or_default()
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const NAME: &'static str = "user";
}

/// Fields to set on an existing user. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
}

impl UserPatch {
    /// Returns true if the patch sets no field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.phone.is_none()
            && self.addresses.is_none()
    }
}

/// Service for managing users.
pub struct UserService<S: DocumentStore> {
    repository: Repository<S, User>,
}

impl<S: DocumentStore> UserService<S> {
    /// Creates a new user service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, User> {
        &self.repository
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    pub async fn insert(&self, user: &User) -> Result<ObjectId> {
        self.repository.insert(user).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Stored<User>>> {
        let id = require_id(User::NAME, "id", id)?;
        self.repository.find_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Stored<User>>> {
        self.repository.find_all().await
    }

    /// Sets the fields present in `patch`.
    ///
    /// An empty patch is rejected. Returns true only if the stored user
    /// changed.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: &UserPatch) -> Result<bool> {
        let id = require_id(User::NAME, "id", id)?;
        if patch.is_empty() {
            return Err(missing(User::NAME, "update data"));
        }

        let outcome = self.repository.set(id, patch).await?;
        Ok(outcome.is_modified())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = require_id(User::NAME, "id", id)?;
        self.repository.delete(id).await
    }
}
