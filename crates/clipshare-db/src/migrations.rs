use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Store: running migration v1 (hash fields)");
        conn.execute_batch(
            "
            CREATE TABLE hash_fields (
                key     TEXT NOT NULL,
                field   TEXT NOT NULL,
                value   TEXT NOT NULL,
                PRIMARY KEY (key, field)
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
