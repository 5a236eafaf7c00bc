//! Services module for notes-service.

pub mod database;
pub mod memory;
pub mod metrics;
pub mod repository;

pub use database::PgNoteRepository;
pub use memory::InMemoryNoteRepository;
pub use metrics::{get_metrics, init_metrics, record_operation};
pub use repository::NoteRepository;
