//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod batch;
pub mod book;
pub mod entry;
pub mod report;

mod support;

pub use account::{AccountError, AccountRepository, AccountUpdate, NewAccount};
pub use batch::{IngestError, IngestRepository};
pub use book::{BookError, BookRepository};
pub use entry::{EntryError, EntryFilter, EntryListItem, EntryRepository, EntryWithLines};
pub use report::{ReportQueryError, ReportRepository};
