use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::auth::{
  entities::Application, errors::RepositoryError, ports::ApplicationRepository,
  value_objects::ApplicationId,
};

/// SQLite implementation of the ApplicationRepository trait
pub struct SqliteApplicationRepository {
  pool: SqlitePool,
}

impl SqliteApplicationRepository {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[derive(sqlx::FromRow)]
struct AppRow {
  id: i32,
  name: String,
  secret: String,
}

impl From<AppRow> for Application {
  fn from(row: AppRow) -> Self {
    Application::new(row.id, row.name, row.secret)
  }
}

#[async_trait]
impl ApplicationRepository for SqliteApplicationRepository {
  async fn find_by_id(&self, id: ApplicationId) -> Result<Application, RepositoryError> {
    let row = sqlx::query_as::<_, AppRow>("SELECT id, name, secret FROM apps WHERE id = ?1")
      .bind(id.value())
      .fetch_optional(&self.pool)
      .await?;

    row.map(Application::from).ok_or(RepositoryError::NotFound)
  }

  async fn upsert(&self, application: &Application) -> Result<(), RepositoryError> {
    sqlx::query(
      r#"
            INSERT INTO apps (id, name, secret)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (id) DO UPDATE SET name = excluded.name, secret = excluded.secret
            "#,
    )
    .bind(application.id)
    .bind(&application.name)
    .bind(&application.secret)
    .execute(&self.pool)
    .await?;

    Ok(())
  }
}
