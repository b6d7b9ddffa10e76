use crate::domain::model::Photo;
use std::collections::HashSet;

/// Ordered photos, unique by id, in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct PhotoList {
    photos: Vec<Photo>,
    ids: HashSet<String>,
}

impl PhotoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every photo whose id is not already present and returns how
    /// many were added.
    pub fn merge<I>(&mut self, photos: I) -> usize
    where
        I: IntoIterator<Item = Photo>,
    {
        let before = self.photos.len();
        for photo in photos {
            if self.ids.insert(photo.id.clone()) {
                self.photos.push(photo);
            }
        }
        self.photos.len() - before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn clear(&mut self) {
        self.photos.clear();
        self.ids.clear();
    }
}
