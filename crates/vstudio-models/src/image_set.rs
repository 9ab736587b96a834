//! Ordered image set store.
//!
//! Insertion order is meaningful: it is the narrative order handed to the
//! prompt synthesizer, and the first and last entries anchor the video job.

use crate::image::{CandidateFile, ImageId, UploadedImage};

/// Maximum number of images the set may hold.
pub const MAX_IMAGES: usize = 40;

/// Minimum number of images required to start a video generation.
pub const MIN_VIDEO_IMAGES: usize = 5;

/// Ordered collection of uploaded images, capped at [`MAX_IMAGES`].
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    images: Vec<UploadedImage>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a batch of candidate files.
    ///
    /// Candidates whose declared type does not start with `image/` are
    /// skipped, and anything past the cap is dropped (existing entries are
    /// kept, oldest first). Neither case is an error. Returns the ids of the
    /// images actually added, in order.
    pub fn add(&mut self, files: impl IntoIterator<Item = CandidateFile>) -> Vec<ImageId> {
        let mut added = Vec::new();

        for file in files {
            if self.images.len() >= MAX_IMAGES {
                break;
            }

            let Ok(image) = UploadedImage::new(file.payload, file.mime_type, file.name) else {
                continue;
            };

            added.push(image.id().clone());
            self.images.push(image);
        }

        added
    }

    /// Remove the image with the given id. Returns false if it was absent.
    pub fn remove(&mut self, id: &ImageId) -> bool {
        let before = self.images.len();
        self.images.retain(|img| img.id() != id);
        self.images.len() != before
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, id: &ImageId) -> Option<&UploadedImage> {
        self.images.iter().find(|img| img.id() == id)
    }

    pub fn first(&self) -> Option<&UploadedImage> {
        self.images.first()
    }

    pub fn last(&self) -> Option<&UploadedImage> {
        self.images.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedImage> {
        self.images.iter()
    }

    pub fn as_slice(&self) -> &[UploadedImage] {
        &self.images
    }

    /// How many more images can be added before the cap.
    pub fn remaining_capacity(&self) -> usize {
        MAX_IMAGES - self.images.len()
    }

    /// Whether the set holds enough images to start a video generation.
    pub fn has_enough_for_video(&self) -> bool {
        self.images.len() >= MIN_VIDEO_IMAGES
    }
}
