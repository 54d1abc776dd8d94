use std::collections::HashMap;

use rusqlite::Connection;

use crate::Database;
use crate::error::Result;

/// Hash-style operations: a key owns a set of string fields.
impl Database {
    /// Write all `fields` under `key` in one transaction, creating the key if needed.
    pub fn hset(&self, key: &str, fields: &[(&str, String)]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for (field, value) in fields {
                upsert_field(&tx, key, field, value)?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Set one field only if `key` already exists. Returns false (and writes
    /// nothing) for a missing key.
    pub fn hset_existing(&self, key: &str, field: &str, value: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if !key_exists(&tx, key)? {
                return Ok(false);
            }
            upsert_field(&tx, key, field, value)?;
            tx.commit()?;
            Ok(true)
        })
    }

    /// All fields of `key`; empty for a missing key.
    pub fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT field, value FROM hash_fields WHERE key = ?1")?;
            let fields = stmt
                .query_map([key], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<std::result::Result<HashMap<_, _>, _>>()?;
            Ok(fields)
        })
    }

    pub fn exists(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| key_exists(conn, key))
    }

    /// Every key starting with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            // substr() instead of LIKE so `%` and `_` in the prefix stay literal
            let mut stmt = conn.prepare(
                "SELECT DISTINCT key FROM hash_fields
                 WHERE substr(key, 1, length(?1)) = ?1
                 ORDER BY key",
            )?;
            let keys = stmt
                .query_map([prefix], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(keys)
        })
    }

    /// Remove the given keys. Returns how many of them existed.
    pub fn del(&self, keys: &[String]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut removed = 0;
            for key in keys {
                if tx.execute("DELETE FROM hash_fields WHERE key = ?1", [key])? > 0 {
                    removed += 1;
                }
            }
            tx.commit()?;
            Ok(removed)
        })
    }
}

fn upsert_field(conn: &Connection, key: &str, field: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO hash_fields (key, field, value) VALUES (?1, ?2, ?3)
         ON CONFLICT(key, field) DO UPDATE SET value = excluded.value",
        (key, field, value),
    )?;
    Ok(())
}

fn key_exists(conn: &Connection, key: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM hash_fields WHERE key = ?1)",
        [key],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IN_MEMORY;

    fn db() -> Database {
        Database::open(IN_MEMORY).unwrap()
    }

    #[test]
    fn test_hset_overwrites_fields() {
        let db = db();
        db.hset("message:a", &[("content", "one".into()), ("isPinned", "false".into())])
            .unwrap();
        db.hset("message:a", &[("isPinned", "true".into())]).unwrap();

        let fields = db.hgetall("message:a").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["content"], "one");
        assert_eq!(fields["isPinned"], "true");
    }

    #[test]
    fn test_hset_existing_skips_missing_key() {
        let db = db();
        assert!(!db.hset_existing("message:ghost", "isPinned", "true").unwrap());
        assert!(!db.exists("message:ghost").unwrap());
        assert!(db.hgetall("message:ghost").unwrap().is_empty());

        db.hset("message:real", &[("isPinned", "false".into())]).unwrap();
        assert!(db.hset_existing("message:real", "isPinned", "true").unwrap());
        assert_eq!(db.hgetall("message:real").unwrap()["isPinned"], "true");
    }

    #[test]
    fn test_keys_with_prefix_is_literal() {
        let db = db();
        db.hset("message:a", &[("f", "1".into())]).unwrap();
        db.hset("message:b", &[("f", "1".into()), ("g", "2".into())]).unwrap();
        db.hset("messagexc", &[("f", "1".into())]).unwrap();
        db.hset("other:d", &[("f", "1".into())]).unwrap();

        assert_eq!(db.keys_with_prefix("message:").unwrap(), vec!["message:a", "message:b"]);
        assert!(db.keys_with_prefix("message%").unwrap().is_empty());
    }

    #[test]
    fn test_del_counts_existing_keys() {
        let db = db();
        db.hset("message:a", &[("f", "1".into())]).unwrap();
        db.hset("message:b", &[("f", "1".into())]).unwrap();

        let removed = db
            .del(&["message:a".to_string(), "message:missing".to_string()])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(db.keys_with_prefix("message:").unwrap(), vec!["message:b"]);
        assert_eq!(db.del(&[]).unwrap(), 0);
    }
}
