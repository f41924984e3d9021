//! Domain model for the movie catalog.

pub mod movies;
