//! Photo service coordinating record storage with image files.
//!
//! Provides one method per user-facing operation: listing, details, the
//! create/edit/delete forms and their submissions. Validation problems come
//! back as [`FormOutcome::Invalid`] so the caller can redisplay the form;
//! everything else is an [`Error`].

use std::path::PathBuf;
use std::sync::Arc;

use kennel_core::config::PhotoConfig;
use kennel_core::upload::stored_file_name;
use kennel_core::{DogId, Error, PhotoId, Result, UploadedFile};
use kennel_db::models::{Dog, NewPhoto, Photo, PhotoWithDog};
use kennel_db::RecordStore;
use serde::Serialize;

use super::forms::{CreatePhotoForm, EditPhotoForm};
use super::storage::FileStore;

/// Message shown when a create submission carries no file.
pub const MISSING_FILE: &str = "Please add a photograph of the dog";

/// Message shown when the uploaded file is not a JPEG or PNG image.
pub const INVALID_FILE_TYPE: &str = "Only JPEG or PNG images can be attached to a dog";

/// One entry of the dog selector shown on the forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DogChoice {
    pub id: DogId,
    pub label: String,
}

impl DogChoice {
    fn named(dog: &Dog) -> Self {
        Self {
            id: dog.id,
            label: dog.name.clone(),
        }
    }

    // The edit form and the create form's validation fallback label dogs by id.
    fn by_id(dog: &Dog) -> Self {
        Self {
            id: dog.id,
            label: dog.id.to_string(),
        }
    }
}

/// A rejected form submission, ready to be shown again.
#[derive(Debug, Clone)]
pub struct InvalidForm<F> {
    pub errors: Vec<String>,
    /// The submitted values, echoed back.
    pub form: F,
    pub dog_choices: Vec<DogChoice>,
}

/// Result of a create or edit submission.
#[derive(Debug, Clone)]
pub enum FormOutcome<T, F> {
    Saved(T),
    Invalid(InvalidForm<F>),
}

/// Data for the edit form.
#[derive(Debug, Clone)]
pub struct EditForm {
    pub photo: Photo,
    pub dog_choices: Vec<DogChoice>,
}

/// High-level photo service over a [`RecordStore`] and a [`FileStore`].
pub struct PhotoService {
    records: Arc<dyn RecordStore>,
    files: Arc<dyn FileStore>,
    rollback_on_write_failure: bool,
    remove_file_on_delete: bool,
}

impl PhotoService {
    /// Create a new `PhotoService`.
    ///
    /// # Arguments
    ///
    /// * `records` - Store for photograph records and dogs
    /// * `files` - Store for uploaded image bytes
    /// * `config` - Consistency switches for the create and delete paths
    pub fn new(
        records: Arc<dyn RecordStore>,
        files: Arc<dyn FileStore>,
        config: &PhotoConfig,
    ) -> Self {
        Self {
            records,
            files,
            rollback_on_write_failure: config.rollback_on_write_failure,
            remove_file_on_delete: config.remove_file_on_delete,
        }
    }

    /// Every photograph joined with its dog.
    pub fn list_photos(&self) -> Result<Vec<PhotoWithDog>> {
        self.records.list_photos()
    }

    /// A single photograph with its dog.
    ///
    /// An absent ID and an unknown ID both yield `None`; callers send the
    /// user back to the listing rather than answering not-found.
    pub fn get_photo(&self, id: Option<PhotoId>) -> Result<Option<PhotoWithDog>> {
        let Some(id) = id else {
            return Ok(None);
        };
        self.records.find_photo_with_dog(id)
    }

    /// Dog choices for a new photograph, ordered by name.
    pub fn prepare_create_form(&self) -> Result<Vec<DogChoice>> {
        self.named_choices()
    }

    /// Store a new photograph record and its image.
    ///
    /// The record is committed first and the image written second. If the
    /// write fails the record either stays without its file or, with
    /// `rollback_on_write_failure`, is removed again before the error is
    /// returned.
    pub fn create_photo(
        &self,
        form: CreatePhotoForm,
        upload: Option<UploadedFile>,
    ) -> Result<FormOutcome<Photo, CreatePhotoForm>> {
        let Some(upload) = upload.filter(|u| !u.is_blank()) else {
            return self.reject_create(form, MISSING_FILE);
        };

        if upload.image_type().is_none() {
            tracing::debug!(
                content_type = ?upload.content_type,
                "Rejected upload with unsupported content type"
            );
            return self.reject_create(form, INVALID_FILE_TYPE);
        }

        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(errors) => {
                return Ok(FormOutcome::Invalid(InvalidForm {
                    errors,
                    form,
                    dog_choices: self.id_choices()?,
                }))
            }
        };

        let file_name = stored_file_name(fields.dog_id, &upload);
        let photo = self.records.insert_photo(&NewPhoto {
            dog_id: fields.dog_id,
            file_name: Some(file_name.clone()),
            date_taken: fields.date_taken,
            location: fields.location,
        })?;

        if let Err(e) = self.files.write(&file_name, &upload.data) {
            return Err(self.handle_write_failure(&photo, &file_name, e));
        }

        tracing::info!(
            photo_id = %photo.id,
            dog_id = %photo.dog_id,
            file_name = %file_name,
            bytes = upload.data.len(),
            "Photo created"
        );
        Ok(FormOutcome::Saved(photo))
    }

    /// The record to edit plus every dog as a choice.
    pub fn prepare_edit_form(&self, id: Option<PhotoId>) -> Result<EditForm> {
        let id = id.ok_or_else(|| Error::not_found("photo", "<none>"))?;
        let photo = self
            .records
            .find_photo(id)?
            .ok_or_else(|| Error::not_found("photo", id))?;
        Ok(EditForm {
            photo,
            dog_choices: self.id_choices()?,
        })
    }

    /// Overwrite a photograph record with the submitted values.
    ///
    /// No new image is accepted here; `file_name` is stored as submitted.
    pub fn update_photo(
        &self,
        id: PhotoId,
        form: EditPhotoForm,
    ) -> Result<FormOutcome<Photo, EditPhotoForm>> {
        if form.photo_id() != Some(id) {
            return Err(Error::mismatch(id, form.id.as_deref().unwrap_or("")));
        }

        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(errors) => {
                return Ok(FormOutcome::Invalid(InvalidForm {
                    errors,
                    form,
                    dog_choices: self.id_choices()?,
                }))
            }
        };

        let photo = Photo {
            id,
            dog_id: fields.dog_id,
            file_name: form.file_name(),
            date_taken: fields.date_taken,
            location: fields.location,
        };

        match self.records.update_photo(&photo) {
            Ok(()) => {}
            Err(Error::Conflict(reason)) => {
                if !self.records.photo_exists(id)? {
                    return Err(Error::not_found("photo", id));
                }
                tracing::error!(photo_id = %id, %reason, "Concurrent update conflict");
                return Err(Error::Conflict(reason));
            }
            Err(e) => return Err(e),
        }

        tracing::info!(photo_id = %id, file_name = ?photo.file_name, "Photo updated");
        Ok(FormOutcome::Saved(photo))
    }

    /// The record to delete, with its dog, for confirmation.
    pub fn prepare_delete_form(&self, id: Option<PhotoId>) -> Result<PhotoWithDog> {
        let id = id.ok_or_else(|| Error::not_found("photo", "<none>"))?;
        self.records
            .find_photo_with_dog(id)?
            .ok_or_else(|| Error::not_found("photo", id))
    }

    /// Delete a photograph record.
    ///
    /// The image file is left on disk unless `remove_file_on_delete` is set
    /// and no remaining record refers to it.
    pub fn confirm_delete(&self, id: PhotoId) -> Result<()> {
        let photo = self
            .records
            .find_photo(id)?
            .ok_or_else(|| Error::not_found("photo", id))?;

        if !self.records.remove_photo(id)? {
            return Err(Error::not_found("photo", id));
        }
        tracing::info!(photo_id = %id, "Photo deleted");

        let Some(name) = photo.file_name else {
            return Ok(());
        };
        if !self.remove_file_on_delete {
            tracing::debug!(photo_id = %id, file_name = %name, "Image left in place");
            return Ok(());
        }
        // Edits may point several records at one image.
        if self.records.file_name_in_use(&name)? {
            tracing::debug!(photo_id = %id, file_name = %name, "Image still referenced, kept");
            return Ok(());
        }

        match self.files.remove(&name) {
            Ok(true) => tracing::debug!(photo_id = %id, file_name = %name, "Image removed"),
            Ok(false) => {
                tracing::debug!(photo_id = %id, file_name = %name, "Image already absent")
            }
            Err(e) => tracing::warn!(
                photo_id = %id,
                file_name = %name,
                "Failed to remove image of deleted photo: {e}"
            ),
        }

        Ok(())
    }

    /// Filesystem path of a photograph's stored image.
    pub fn image_path(&self, id: PhotoId) -> Result<PathBuf> {
        let photo = self
            .records
            .find_photo(id)?
            .ok_or_else(|| Error::not_found("photo", id))?;
        let name = photo
            .file_name
            .ok_or_else(|| Error::not_found("image", id))?;
        self.files.resolve(&name)
    }

    fn reject_create(
        &self,
        form: CreatePhotoForm,
        message: &str,
    ) -> Result<FormOutcome<Photo, CreatePhotoForm>> {
        Ok(FormOutcome::Invalid(InvalidForm {
            errors: vec![message.to_string()],
            form,
            dog_choices: self.named_choices()?,
        }))
    }

    fn handle_write_failure(&self, photo: &Photo, file_name: &str, error: Error) -> Error {
        if !self.rollback_on_write_failure {
            tracing::warn!(
                photo_id = %photo.id,
                file_name = %file_name,
                "Image write failed after the record was committed; record has no file: {error}"
            );
            return error;
        }

        match self.records.remove_photo(photo.id) {
            Ok(_) => tracing::warn!(
                photo_id = %photo.id,
                file_name = %file_name,
                "Image write failed; record removed again: {error}"
            ),
            Err(rollback) => tracing::error!(
                photo_id = %photo.id,
                file_name = %file_name,
                "Image write failed and the record could not be removed: {error}; rollback: {rollback}"
            ),
        }
        error
    }

    fn named_choices(&self) -> Result<Vec<DogChoice>> {
        Ok(self.records.dogs_by_name()?.iter().map(DogChoice::named).collect())
    }

    fn id_choices(&self) -> Result<Vec<DogChoice>> {
        Ok(self.records.dogs()?.iter().map(DogChoice::by_id).collect())
    }
}
