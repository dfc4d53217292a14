//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`. Models that appear in joins also take a column offset.

use chrono::NaiveDate;
use kennel_core::{DogId, PhotoId};

// ---------------------------------------------------------------------------
// Dog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dog {
    pub id: DogId,
    pub name: String,
    pub created_at: String,
}

impl Dog {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Self::from_row_at(row, 0)
    }

    /// Read a dog whose columns start at `base` (for joined queries).
    pub fn from_row_at(row: &rusqlite::Row, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: DogId::from(row.get::<_, i64>(base)?),
            name: row.get(base + 1)?,
            created_at: row.get(base + 2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Photo
// ---------------------------------------------------------------------------

/// A persisted photograph record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: PhotoId,
    pub dog_id: DogId,
    /// Name of the stored image file; `None` until a file is attached.
    pub file_name: Option<String>,
    pub date_taken: NaiveDate,
    pub location: String,
}

impl Photo {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: PhotoId::from(row.get::<_, i64>(0)?),
            dog_id: DogId::from(row.get::<_, i64>(1)?),
            file_name: row.get(2)?,
            date_taken: row.get(3)?,
            location: row.get(4)?,
        })
    }
}

/// Field values for a photograph record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub dog_id: DogId,
    pub file_name: Option<String>,
    pub date_taken: NaiveDate,
    pub location: String,
}

// ---------------------------------------------------------------------------
// PhotoWithDog
// ---------------------------------------------------------------------------

/// A photograph record joined with the dog it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoWithDog {
    pub photo: Photo,
    pub dog: Dog,
}

impl PhotoWithDog {
    /// Expects the five photo columns followed by the three dog columns.
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            photo: Photo::from_row(row)?,
            dog: Dog::from_row_at(row, 5)?,
        })
    }
}
