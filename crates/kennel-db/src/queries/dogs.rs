//! Dog registry queries.
//!
//! Dogs are owned by the wider breeder registry; the photo records only
//! reference them. These helpers cover what the photo workflow and the CLI
//! need: creating, renaming, and listing.

use chrono::Utc;
use kennel_core::{DogId, Error, Result};
use rusqlite::Connection;

use crate::models::Dog;

const COLS: &str = "id, name, created_at";

/// Create a new dog.
pub fn create_dog(conn: &Connection, name: &str) -> Result<Dog> {
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO dogs (name, created_at) VALUES (?1, ?2)",
        rusqlite::params![name, created_at],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Dog {
        id: DogId::from(conn.last_insert_rowid()),
        name: name.to_string(),
        created_at,
    })
}

/// Get a dog by ID.
pub fn get_dog(conn: &Connection, id: DogId) -> Result<Option<Dog>> {
    let q = format!("SELECT {COLS} FROM dogs WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Dog::from_row);
    match result {
        Ok(d) => Ok(Some(d)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all dogs in id order.
pub fn list_dogs(conn: &Connection) -> Result<Vec<Dog>> {
    query_dogs(conn, &format!("SELECT {COLS} FROM dogs ORDER BY id"))
}

/// List all dogs ordered by name (ties broken by id).
pub fn list_dogs_by_name(conn: &Connection) -> Result<Vec<Dog>> {
    query_dogs(conn, &format!("SELECT {COLS} FROM dogs ORDER BY name, id"))
}

/// Rename a dog. Returns `false` if no dog has this ID.
pub fn rename_dog(conn: &Connection, id: DogId, name: &str) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE dogs SET name = ?1 WHERE id = ?2",
            rusqlite::params![name, id.get()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

fn query_dogs(conn: &Connection, sql: &str) -> Result<Vec<Dog>> {
    let mut stmt = conn.prepare(sql).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Dog::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
