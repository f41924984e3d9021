//! The movie record and its fixed genre vocabulary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permitted genre tags, in canonical spelling.
pub const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Comedy",
    "Crime",
    "Drama",
    "Fantasy",
    "Horror",
    "Thriller",
    "Sci-Fi",
];

/// Whether `tag` is a member of the permitted genre set (exact spelling).
pub fn is_permitted_genre(tag: &str) -> bool {
    GENRES.contains(&tag)
}

/// A single record in the movie collection.
///
/// `id` is assigned by the store at creation and never changes. Every stored
/// record has passed full validation; `rate` defaults to 0 when absent from
/// the backing file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<String>,
    #[serde(default)]
    pub rate: f64,
}

impl Movie {
    /// Case-insensitive genre membership, used by the list filter.
    pub fn has_genre(&self, tag: &str) -> bool {
        self.genre.iter().any(|g| g.eq_ignore_ascii_case(tag))
    }
}
