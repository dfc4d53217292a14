//! Photograph record CRUD operations.

use kennel_core::{Error, PhotoId, Result};
use rusqlite::Connection;

use crate::models::{NewPhoto, Photo, PhotoWithDog};

const COLS: &str = "id, dog_id, file_name, date_taken, location";

const JOINED: &str = "SELECT p.id, p.dog_id, p.file_name, p.date_taken, p.location,
                             d.id, d.name, d.created_at
                      FROM photos p
                      JOIN dogs d ON d.id = p.dog_id";

/// Insert a new photograph record and return it with its generated ID.
pub fn create_photo(conn: &Connection, new: &NewPhoto) -> Result<Photo> {
    conn.execute(
        "INSERT INTO photos (dog_id, file_name, date_taken, location)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![new.dog_id.get(), new.file_name, new.date_taken, new.location],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Photo {
        id: PhotoId::from(conn.last_insert_rowid()),
        dog_id: new.dog_id,
        file_name: new.file_name.clone(),
        date_taken: new.date_taken,
        location: new.location.clone(),
    })
}

/// Get a photograph record by ID.
pub fn get_photo(conn: &Connection, id: PhotoId) -> Result<Option<Photo>> {
    let q = format!("SELECT {COLS} FROM photos WHERE id = ?1");
    match conn.query_row(&q, [id.get()], Photo::from_row) {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a photograph record together with its dog.
pub fn get_photo_with_dog(conn: &Connection, id: PhotoId) -> Result<Option<PhotoWithDog>> {
    let q = format!("{JOINED} WHERE p.id = ?1");
    match conn.query_row(&q, [id.get()], PhotoWithDog::from_row) {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List every photograph record joined with its dog, in id order.
pub fn list_photos_with_dogs(conn: &Connection) -> Result<Vec<PhotoWithDog>> {
    let q = format!("{JOINED} ORDER BY p.id");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], PhotoWithDog::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Check whether a photograph record exists.
pub fn photo_exists(conn: &Connection, id: PhotoId) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM photos WHERE id = ?1",
        [id.get()],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Number of photograph records whose stored image is `file_name`.
pub fn count_photos_with_file_name(conn: &Connection, file_name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM photos WHERE file_name = ?1",
        [file_name],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Overwrite every column of a photograph record. Returns `false` if no row
/// has this ID.
pub fn update_photo(conn: &Connection, photo: &Photo) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE photos SET dog_id = ?1, file_name = ?2, date_taken = ?3, location = ?4
             WHERE id = ?5",
            rusqlite::params![
                photo.dog_id.get(),
                photo.file_name,
                photo.date_taken,
                photo.location,
                photo.id.get(),
            ],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete a photograph record by ID.
pub fn delete_photo(conn: &Connection, id: PhotoId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM photos WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
