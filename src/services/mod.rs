//! Business logic services

pub mod authors;
pub mod books;
pub mod images;

use crate::{config::StorageConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
    pub authors: authors::AuthorService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, storage_config: &StorageConfig) -> Self {
        let images = images::ImageStore::new(&storage_config.upload_dir);
        Self {
            books: books::BookService::new(repository.clone(), images),
            authors: authors::AuthorService::new(repository),
        }
    }
}
