/// The default database, a file based SQLite database in the working directory.
pub const DEFAULT_DB_URL: &str = "sqlite://.venter/venter.db?mode=rwc";

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Database")]
#[group(id = "database")]
pub struct Database {
    /// The database connection URL, either `sqlite://` or `postgres://`
    #[arg(id = "db-url", long, env = "DB_URL", default_value = DEFAULT_DB_URL)]
    pub url: String,
    #[arg(id = "db-max-conn", long, env = "DB_MAX_CONN", default_value_t = 10)]
    pub max_conn: u32,
    #[arg(id = "db-min-conn", long, env = "DB_MIN_CONN", default_value_t = 1)]
    pub min_conn: u32,
    /// Timeout in seconds for establishing a connection
    #[arg(
        id = "db-connect-timeout",
        long,
        env = "DB_CONNECT_TIMEOUT",
        default_value_t = 8
    )]
    pub connect_timeout: u64,
    /// Timeout in seconds for acquiring a connection from the pool
    #[arg(
        id = "db-acquire-timeout",
        long,
        env = "DB_ACQUIRE_TIMEOUT",
        default_value_t = 8
    )]
    pub acquire_timeout: u64,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: DEFAULT_DB_URL.into(),
            max_conn: 10,
            min_conn: 1,
            connect_timeout: 8,
            acquire_timeout: 8,
        }
    }
}

impl Database {
    /// An in-memory SQLite database.
    ///
    /// The pool is limited to a single connection, as every new connection to `:memory:` would
    /// open a new and empty database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_conn: 1,
            min_conn: 1,
            ..Default::default()
        }
    }
}
