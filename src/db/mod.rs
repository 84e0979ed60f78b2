//! Connection lifecycle and schema provisioning
//!
//! [`SchemaStore`] is the only component that talks to the server about
//! schema. It holds the immutable [`ConnectionDescriptor`] and opens a fresh
//! connection for every request; nothing is pooled or cached.

mod descriptor;
mod schema;

pub use descriptor::*;
pub use schema::*;

use crate::error::{Error, Result};
use sqlx::mysql::MySqlConnection;
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, info};

/// Schema owner and connection factory
#[derive(Debug, Clone)]
pub struct SchemaStore {
    descriptor: ConnectionDescriptor,
}

impl SchemaStore {
    /// Create a store for the given descriptor. The descriptor must name a
    /// target database.
    pub fn new(descriptor: ConnectionDescriptor) -> Result<Self> {
        descriptor.database_name()?;
        Ok(Self { descriptor })
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Liveness probe: open a connection to the target database and close it.
    ///
    /// Never fails; any problem (network, auth, missing database) is `false`.
    pub async fn verify_connectivity(&self) -> bool {
        match connect(&self.descriptor).await {
            Ok(conn) => {
                release(conn).await;
                true
            }
            Err(e) => {
                debug!("Connectivity probe to {} failed: {}", self.descriptor, e);
                false
            }
        }
    }

    /// Create the target database and both tables if they do not exist.
    ///
    /// All or nothing: the first failure aborts and comes back as
    /// [`Error::Provisioning`]. Every step is idempotent, so the whole call can
    /// be retried.
    pub async fn provision(&self) -> Result<()> {
        let database = self.descriptor.database_name()?;
        info!("Provisioning database '{}'", database);

        let mut server = connect(&self.descriptor.without_database())
            .await
            .map_err(Error::Provisioning)?;
        let created = sqlx::query(&create_database_sql(database))
            .execute(&mut server)
            .await;
        // Close regardless of the outcome before surfacing the error
        release(server).await;
        created.map_err(Error::Provisioning)?;

        let mut conn = connect(&self.descriptor)
            .await
            .map_err(Error::Provisioning)?;
        for (table, ddl) in TABLES {
            debug!("Ensuring table {}", table);
            if let Err(e) = sqlx::query(ddl).execute(&mut conn).await {
                release(conn).await;
                return Err(Error::Provisioning(e));
            }
        }
        conn.close().await.map_err(Error::Provisioning)?;

        info!("Database '{}' is ready", database);
        Ok(())
    }

    /// Open a new connection to the target database.
    ///
    /// The caller owns the connection. Dropping it releases the socket, so it
    /// is released on every exit path; call `close()` for a graceful shutdown.
    pub async fn acquire(&self) -> Result<MySqlConnection> {
        Ok(connect(&self.descriptor).await?)
    }
}

async fn connect(descriptor: &ConnectionDescriptor) -> sqlx::Result<MySqlConnection> {
    debug!("Connecting to MySQL at {}", descriptor);
    descriptor.connect_options().connect().await
}

/// Close a connection whose work is already done. A failed close does not
/// change the outcome of that work, so it is logged instead of returned.
pub(crate) async fn release(conn: MySqlConnection) {
    if let Err(e) = conn.close().await {
        debug!("Error closing connection: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 1 on loopback refuses connections immediately.
    fn unreachable_store() -> SchemaStore {
        let descriptor =
            ConnectionDescriptor::new("127.0.0.1", "nobody", None, "docledger_test").with_port(1);
        SchemaStore::new(descriptor).unwrap()
    }

    #[test]
    fn test_new_requires_database() {
        let descriptor: ConnectionDescriptor = "mysql://root@localhost".parse().unwrap();
        assert!(matches!(
            SchemaStore::new(descriptor),
            Err(Error::Descriptor(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_connectivity_reports_false() {
        assert!(!unreachable_store().verify_connectivity().await);
    }

    #[tokio::test]
    async fn test_provision_wraps_connect_failure() {
        let err = unreachable_store().provision().await.unwrap_err();
        assert!(matches!(err, Error::Provisioning(_)));
    }

    #[tokio::test]
    async fn test_acquire_failure_is_store_error() {
        let err = unreachable_store().acquire().await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }
}
