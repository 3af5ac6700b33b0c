use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

/// r2d2 pool of PostgreSQL connections.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Connection checked out of a [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Build a connection pool for `database_url`.
///
/// The pool eagerly opens its minimum number of connections, so an
/// unreachable server is reported here rather than on first use.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().build(manager)
}
