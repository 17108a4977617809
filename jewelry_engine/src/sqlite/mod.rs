//! SQLite storage backend for the jewelry shop engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
