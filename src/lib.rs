//! Filmoteca: a small movie catalog served over HTTP, backed by a flat JSON
//! file that mirrors the in-memory collection on every mutation.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
