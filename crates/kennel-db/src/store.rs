//! The record store seam used by the photo service.
//!
//! [`RecordStore`] describes the relational operations the photo workflow
//! needs. Every mutating call runs in its own transaction and is committed
//! before it returns, so a successful return means the change is durable.
//! [`SqliteRecordStore`] implements it over the pooled SQLite database.

use kennel_core::{Error, PhotoId, Result};

use crate::models::{Dog, NewPhoto, Photo, PhotoWithDog};
use crate::pool::{get_conn, DbPool};
use crate::queries::{dogs, photos};

/// Persistence operations for photograph records and the dogs they reference.
pub trait RecordStore: Send + Sync {
    /// Every record joined with its dog, in id order.
    fn list_photos(&self) -> Result<Vec<PhotoWithDog>>;

    /// A single record without its dog.
    fn find_photo(&self, id: PhotoId) -> Result<Option<Photo>>;

    /// A single record joined with its dog.
    fn find_photo_with_dog(&self, id: PhotoId) -> Result<Option<PhotoWithDog>>;

    fn photo_exists(&self, id: PhotoId) -> Result<bool>;

    /// Insert and commit a record; the store assigns the ID.
    fn insert_photo(&self, new: &NewPhoto) -> Result<Photo>;

    /// Overwrite and commit a record.
    ///
    /// Fails with [`Error::Conflict`] when the update matched no row.
    fn update_photo(&self, photo: &Photo) -> Result<()>;

    /// Remove and commit a record. Returns `false` if there was nothing to remove.
    fn remove_photo(&self, id: PhotoId) -> Result<bool>;

    /// Whether any record still points at the stored image `file_name`.
    fn file_name_in_use(&self, file_name: &str) -> Result<bool>;

    /// Dogs in id order.
    fn dogs(&self) -> Result<Vec<Dog>>;

    /// Dogs ordered by name.
    fn dogs_by_name(&self) -> Result<Vec<Dog>>;
}

/// [`RecordStore`] backed by the SQLite connection pool.
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: DbPool,
}

impl SqliteRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RecordStore for SqliteRecordStore {
    fn list_photos(&self) -> Result<Vec<PhotoWithDog>> {
        let conn = get_conn(&self.pool)?;
        photos::list_photos_with_dogs(&conn)
    }

    fn find_photo(&self, id: PhotoId) -> Result<Option<Photo>> {
        let conn = get_conn(&self.pool)?;
        photos::get_photo(&conn, id)
    }

    fn find_photo_with_dog(&self, id: PhotoId) -> Result<Option<PhotoWithDog>> {
        let conn = get_conn(&self.pool)?;
        photos::get_photo_with_dog(&conn, id)
    }

    fn photo_exists(&self, id: PhotoId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        photos::photo_exists(&conn, id)
    }

    fn insert_photo(&self, new: &NewPhoto) -> Result<Photo> {
        let conn = get_conn(&self.pool)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;
        let photo = photos::create_photo(&tx, new)?;
        tx.commit().map_err(|e| Error::database(e.to_string()))?;
        Ok(photo)
    }

    fn update_photo(&self, photo: &Photo) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;
        if !photos::update_photo(&tx, photo)? {
            return Err(Error::Conflict(format!(
                "update of photo {} matched no row",
                photo.id
            )));
        }
        tx.commit().map_err(|e| Error::database(e.to_string()))?;
        Ok(())
    }

    fn remove_photo(&self, id: PhotoId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;
        let removed = photos::delete_photo(&tx, id)?;
        tx.commit().map_err(|e| Error::database(e.to_string()))?;
        Ok(removed)
    }

    fn file_name_in_use(&self, file_name: &str) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        Ok(photos::count_photos_with_file_name(&conn, file_name)? > 0)
    }

    fn dogs(&self) -> Result<Vec<Dog>> {
        let conn = get_conn(&self.pool)?;
        dogs::list_dogs(&conn)
    }

    fn dogs_by_name(&self) -> Result<Vec<Dog>> {
        let conn = get_conn(&self.pool)?;
        dogs::list_dogs_by_name(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use chrono::NaiveDate;
    use kennel_core::DogId;

    fn store_with_dog() -> (SqliteRecordStore, DogId) {
        let pool = init_memory_pool().unwrap();
        let dog = dogs::create_dog(&pool.get().unwrap(), "Farrusco").unwrap();
        (SqliteRecordStore::new(pool), dog.id)
    }

    fn new_photo(dog_id: DogId) -> NewPhoto {
        NewPhoto {
            dog_id,
            file_name: Some(format!("{dog_id}_abc.jpg")),
            date_taken: NaiveDate::from_ymd_opt(2023, 7, 2).unwrap(),
            location: "Coimbra".into(),
        }
    }

    #[test]
    fn insert_is_committed() {
        let (store, dog_id) = store_with_dog();
        let photo = store.insert_photo(&new_photo(dog_id)).unwrap();

        // A different pooled connection sees the committed row.
        let listed = store.list_photos().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].photo, photo);
        assert_eq!(listed[0].dog.name, "Farrusco");
    }

    #[test]
    fn failed_insert_leaves_no_row() {
        let (store, _) = store_with_dog();
        let result = store.insert_photo(&new_photo(DogId::from(31337)));
        assert!(matches!(result, Err(Error::Database { .. })));
        assert!(store.list_photos().unwrap().is_empty());
    }

    #[test]
    fn update_of_missing_row_is_conflict() {
        let (store, dog_id) = store_with_dog();
        let mut photo = store.insert_photo(&new_photo(dog_id)).unwrap();
        photo.id = PhotoId::from(photo.id.get() + 100);
        let err = store.update_photo(&photo).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn update_and_remove() {
        let (store, dog_id) = store_with_dog();
        let mut photo = store.insert_photo(&new_photo(dog_id)).unwrap();
        photo.location = "Leiria".into();
        store.update_photo(&photo).unwrap();
        assert_eq!(store.find_photo(photo.id).unwrap().unwrap().location, "Leiria");

        assert!(store.remove_photo(photo.id).unwrap());
        assert!(!store.photo_exists(photo.id).unwrap());
        assert!(!store.remove_photo(photo.id).unwrap());
    }

    #[test]
    fn file_name_in_use_follows_remaining_rows() {
        let (store, dog_id) = store_with_dog();
        let first = store.insert_photo(&new_photo(dog_id)).unwrap();
        let name = first.file_name.clone().unwrap();

        let mut second = store.insert_photo(&new_photo(dog_id)).unwrap();
        second.file_name = Some(format!("{dog_id}_other.png"));
        store.update_photo(&second).unwrap();
        assert!(store.file_name_in_use(&name).unwrap());

        store.remove_photo(first.id).unwrap();
        assert!(!store.file_name_in_use(&name).unwrap());
        assert!(store.file_name_in_use(&format!("{dog_id}_other.png")).unwrap());
    }
}
