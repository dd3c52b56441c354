//! Electronic ledger books (PLE).
//!
//! Pipe-delimited text files submitted to the tax authority, produced from
//! the same joined lines the financial statements use.

pub mod book;
pub mod error;
pub mod export;

pub use book::PleBook;
pub use error::PleError;
pub use export::{PleExport, PleExporter};
