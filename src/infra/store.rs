//! File-backed movie collection store.
//!
//! `MovieStore` owns the canonical in-memory sequence of movies and the path
//! of its persisted JSON mirror. Every successful mutation rewrites the whole
//! file; a failed write is logged and the in-memory state stays authoritative
//! until the next successful write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::error;
use uuid::Uuid;

use crate::application::validate::{MovieDraft, MoviePatch};
use crate::domain::movies::Movie;

/// Errors raised while opening or mutating the collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("backing file is not a valid movie collection: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("movie not found")]
    NotFound,
}

/// Owner of the movie collection and its backing file.
#[derive(Debug)]
pub struct MovieStore {
    path: PathBuf,
    movies: Mutex<Vec<Movie>>,
}

impl MovieStore {
    /// Open the store rooted at `path`, loading the existing collection if
    /// the file is present. A missing file yields an empty collection; an
    /// unreadable or malformed file is a startup error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let movies = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            movies: Mutex::new(movies),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn len(&self) -> usize {
        self.movies.lock().await.len()
    }

    /// The full collection in insertion order.
    pub async fn list_all(&self) -> Vec<Movie> {
        self.movies.lock().await.clone()
    }

    /// The subsequence whose genre list contains `tag`, case-insensitively.
    /// No match is an empty vec, not an error.
    pub async fn list_by_genre(&self, tag: &str) -> Vec<Movie> {
        self.movies
            .lock()
            .await
            .iter()
            .filter(|movie| movie.has_genre(tag))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> Option<Movie> {
        self.movies
            .lock()
            .await
            .iter()
            .find(|movie| movie.id == id)
            .cloned()
    }

    /// Assign a fresh unique id, append the record, and mirror to disk.
    pub async fn create(&self, draft: MovieDraft) -> Movie {
        let mut movies = self.movies.lock().await;

        let mut id = Uuid::new_v4();
        while movies.iter().any(|movie| movie.id == id) {
            id = Uuid::new_v4();
        }

        let movie = Movie {
            id,
            title: draft.title,
            year: draft.year,
            director: draft.director,
            duration: draft.duration,
            poster: draft.poster,
            genre: draft.genre,
            rate: draft.rate,
        };
        movies.push(movie.clone());
        self.persist(&movies).await;
        movie
    }

    /// Merge `patch` over the record with `id` in place; its position in the
    /// sequence does not change.
    pub async fn update(&self, id: Uuid, patch: MoviePatch) -> Result<Movie, StoreError> {
        let mut movies = self.movies.lock().await;

        let updated = {
            let movie = movies
                .iter_mut()
                .find(|movie| movie.id == id)
                .ok_or(StoreError::NotFound)?;

            if let Some(title) = patch.title {
                movie.title = title;
            }
            if let Some(year) = patch.year {
                movie.year = year;
            }
            if let Some(director) = patch.director {
                movie.director = director;
            }
            if let Some(duration) = patch.duration {
                movie.duration = duration;
            }
            if let Some(poster) = patch.poster {
                movie.poster = poster;
            }
            if let Some(genre) = patch.genre {
                movie.genre = genre;
            }
            if let Some(rate) = patch.rate {
                movie.rate = rate;
            }
            movie.clone()
        };

        self.persist(&movies).await;
        Ok(updated)
    }

    /// Remove the record with `id`, closing the gap so the remaining
    /// sequence keeps its relative order.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut movies = self.movies.lock().await;

        let index = movies
            .iter()
            .position(|movie| movie.id == id)
            .ok_or(StoreError::NotFound)?;
        movies.remove(index);

        self.persist(&movies).await;
        Ok(())
    }

    /// Serialize the full collection and overwrite the backing file. Write
    /// failures are logged, not surfaced: the caller's mutation stands and
    /// disk catches up on the next successful write.
    async fn persist(&self, movies: &[Movie]) {
        let bytes = match serde_json::to_vec_pretty(movies) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(
                    target = "filmoteca::store",
                    path = %self.path.display(),
                    error = %err,
                    "failed to serialize movie collection",
                );
                return;
            }
        };

        if let Err(err) = tokio::fs::write(&self.path, bytes).await {
            error!(
                target = "filmoteca::store",
                path = %self.path.display(),
                error = %err,
                "failed to persist movie collection",
            );
        }
    }
}
