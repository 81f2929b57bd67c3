//! # quill-db
//!
//! Storage layer for quill notes.
//!
//! This crate provides:
//! - Connection pool management
//! - [`PgNoteStore`], the PostgreSQL implementation of `NoteStore`
//! - [`MemoryNoteStore`], an in-memory store used by tests and local runs
//!
//! ## Example
//!
//! ```rust,ignore
//! use quill_core::NoteStore;
//! use quill_db::{create_pool, PgNoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool("postgres://localhost/quill").await?;
//!     let store = PgNoteStore::new(pool);
//!     let note = store.fetch(7).await?;
//!     println!("{}", note.name);
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod notes;
pub mod pool;

pub use memory::MemoryNoteStore;
pub use notes::PgNoteStore;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
