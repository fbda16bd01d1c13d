//! In-process repositories with the same contract as the SQLite ones.
//! Data lives only as long as the value.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::auth::{
  entities::{Application, User},
  errors::RepositoryError,
  ports::{ApplicationRepository, UserRepository},
  value_objects::{ApplicationId, Email, PasswordHash},
};

#[derive(Default)]
struct UserTable {
  next_id: i64,
  by_email: HashMap<String, User>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
  users: RwLock<UserTable>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn save(
    &self,
    email: &Email,
    password_hash: &PasswordHash,
  ) -> Result<User, RepositoryError> {
    let mut table = self.users.write().await;

    if table.by_email.contains_key(email.as_str()) {
      return Err(RepositoryError::DuplicateKey(format!(
        "UNIQUE constraint failed: users.email ({})",
        email
      )));
    }

    table.next_id += 1;
    let user = User::from_db(
      table.next_id,
      email.as_str().to_owned(),
      password_hash.as_str().to_owned(),
    );
    table.by_email.insert(user.email.clone(), user.clone());

    Ok(user)
  }

  async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError> {
    self
      .users
      .read()
      .await
      .by_email
      .get(email.as_str())
      .cloned()
      .ok_or(RepositoryError::NotFound)
  }
}

#[derive(Default)]
pub struct InMemoryApplicationRepository {
  apps: RwLock<HashMap<i32, Application>>,
}

impl InMemoryApplicationRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
  async fn find_by_id(&self, id: ApplicationId) -> Result<Application, RepositoryError> {
    self
      .apps
      .read()
      .await
      .get(&id.value())
      .cloned()
      .ok_or(RepositoryError::NotFound)
  }

  async fn upsert(&self, application: &Application) -> Result<(), RepositoryError> {
    self
      .apps
      .write()
      .await
      .insert(application.id, application.clone());
    Ok(())
  }
}
