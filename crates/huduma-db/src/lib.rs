//! Huduma metadata store
//!
//! Repository traits and their Postgres implementations.

pub mod db;

pub use db::{DocumentRepository, PgDocumentRepository};
