use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub type DbPool = SqlitePool;

/// Open a connection pool against the given sqlite URL and run migrations.
///
/// The URL is supplied by the embedding application (e.g.
/// `sqlite://lifts.db?mode=rwc`); this crate never decides where the
/// database lives.
pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  log::info!("database ready");

  Ok(pool)
}
