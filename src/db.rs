use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub fn init_pool(database_path: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the sign-in operator account if none exists. Returns true when a new
/// account was created.
pub fn seed_operator(pool: &DbPool, username: &str, password_hash: &str) -> bool {
    let conn = pool.get().expect("Failed to get DB connection for seeding");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM operators", [], |row| row.get(0))
        .unwrap_or(0);
    if count > 0 {
        log::info!("Operator account already present, skipping seed");
        return false;
    }

    conn.execute(
        "INSERT INTO operators (username, password_hash) VALUES (?1, ?2)",
        params![username, password_hash],
    )
    .expect("Failed to seed operator account");
    log::info!("Seeded operator account '{username}'");
    true
}
