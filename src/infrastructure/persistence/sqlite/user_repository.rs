use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::auth::{
  entities::User,
  errors::RepositoryError,
  ports::UserRepository,
  value_objects::{Email, PasswordHash},
};

/// SQLite implementation of the UserRepository trait
pub struct SqliteUserRepository {
  pool: SqlitePool,
}

impl SqliteUserRepository {
  /// Creates a new instance of SqliteUserRepository
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: i64,
  email: String,
  pass_hash: String,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(row.id, row.email, row.pass_hash)
  }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
  async fn save(
    &self,
    email: &Email,
    password_hash: &PasswordHash,
  ) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (email, pass_hash)
            VALUES (?1, ?2)
            RETURNING id, email, pass_hash
            "#,
    )
    .bind(email.as_str())
    .bind(password_hash.as_str())
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, pass_hash
            FROM users
            WHERE email = ?1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    row.map(User::from).ok_or(RepositoryError::NotFound)
  }
}
