//! Helpers for integration tests.
//!
//! Tests run against an embedded PostgreSQL cluster shared by the whole test
//! binary. Every test gets its own temporary database which is dropped again
//! with the [`TestDb`]. A cluster that cannot start fails the test.

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Text, Uuid as SqlUuid};
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

use pdv_orders::db::{DbConnection, DbPool, establish_connection_pool};
use pdv_orders::domain::ids::TenantId;
use pdv_orders::migrations::run_pending_migrations;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

static STABLE_PASSWORD: Once = Once::new();

/// Temporary database used in integration tests.
pub struct TestDb {
    pool: Option<DbPool>,
    database: Option<TemporaryDatabase>,
}

impl TestDb {
    /// Fresh database with every migration applied.
    pub fn new() -> Self {
        let db = Self::empty();
        let mut conn = db.conn();
        run_pending_migrations(&mut conn).expect("Migrations failed");
        db
    }

    /// Fresh database without any migration applied.
    pub fn empty() -> Self {
        let cluster = shared_cluster()
            .unwrap_or_else(|err| panic!("Embedded PostgreSQL failed to start: {err:?}"));
        let db_name = format!("test_{}", Uuid::new_v4().simple());
        let database = cluster
            .temporary_database(db_name.as_str())
            .unwrap_or_else(|err| panic!("Failed to create test database: {err:?}"));
        let pool =
            establish_connection_pool(database.url()).expect("Failed to build connection pool.");

        TestDb {
            pool: Some(pool),
            database: Some(database),
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone().expect("pool is alive until drop")
    }

    pub fn conn(&self) -> DbConnection {
        self.pool()
            .get()
            .expect("Failed to get connection from pool.")
    }

    pub fn url(&self) -> &str {
        self.database
            .as_ref()
            .map(TemporaryDatabase::url)
            .expect("database is alive until drop")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Pooled connections must close before the database is dropped.
        self.pool.take();
        self.database.take();
    }
}

/// Shared cluster for this test binary, stopped again when the process exits.
fn shared_cluster() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => {
                #[cfg(unix)]
                cleanup::register(handle);
                return Ok(handle);
            }
            Err(err) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(err);
                }
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// A data directory reused across test binaries keeps the password it was
/// initialised with.
fn ensure_stable_password() {
    STABLE_PASSWORD.call_once(|| {
        if std::env::var_os("PG_PASSWORD").is_none() {
            // SAFETY: runs once, before the cluster bootstrap spawns threads.
            unsafe {
                std::env::set_var("PG_PASSWORD", "pdv_orders_test");
            }
        }
    });
}

#[cfg(unix)]
mod cleanup {
    use std::path::{Path, PathBuf};
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::time::Duration;

    use pg_embedded_setup_unpriv::ClusterHandle;

    static POSTMASTER_PID: AtomicI32 = AtomicI32::new(0);
    static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

    fn read_postmaster_pid(data_dir: &Path) -> Option<i32> {
        let dir =
            cap_std::fs::Dir::open_ambient_dir(data_dir, cap_std::ambient_authority()).ok()?;
        let content = dir.read_to_string("postmaster.pid").ok()?;
        content.lines().next()?.trim().parse().ok()
    }

    extern "C" fn stop_postgres() {
        let stored = POSTMASTER_PID.load(Ordering::Relaxed);
        if stored <= 0 {
            return;
        }

        // The pid file is re-read so a recycled pid is never signalled.
        let pid = match DATA_DIR.get().and_then(|dir| read_postmaster_pid(dir)) {
            Some(current) if current == stored => current,
            _ => return,
        };

        // SAFETY: `pid` matches the postmaster recorded on disk.
        if unsafe { libc::kill(pid, libc::SIGTERM) } != 0 {
            return;
        }

        for _ in 0..50 {
            std::thread::sleep(Duration::from_millis(100));
            // SAFETY: signal 0 only checks that the process exists.
            if unsafe { libc::kill(pid, 0) } != 0 {
                return;
            }
        }

        // SAFETY: same pid as above, still alive after the grace period.
        unsafe {
            libc::kill(pid, libc::SIGKILL);
        }
    }

    pub fn register(handle: &ClusterHandle) {
        let data_dir = &handle.settings().data_dir;
        let Some(pid) = read_postmaster_pid(data_dir) else {
            return;
        };

        if POSTMASTER_PID
            .compare_exchange(0, pid, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return;
        }
        let _ = DATA_DIR.set(data_dir.clone());

        // SAFETY: `stop_postgres` is an `extern "C"` fn without preconditions.
        let rc = unsafe { libc::atexit(stop_postgres) };
        if rc != 0 {
            eprintln!("pg-embed: atexit registration failed (rc={rc}), postgres {pid} may outlive the tests");
        }
    }
}

/// Insert a tenant row and return its id.
pub fn insert_tenant(conn: &mut PgConnection, name: &str) -> TenantId {
    let id = Uuid::new_v4();
    sql_query("INSERT INTO tenants (id, nome) VALUES ($1, $2)")
        .bind::<SqlUuid, _>(id)
        .bind::<Text, _>(name)
        .execute(conn)
        .expect("Failed to insert tenant.");
    TenantId::new(id)
}
