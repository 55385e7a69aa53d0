//! `SeaORM` entity definitions.

pub mod accounts;
pub mod books;
pub mod journal_entries;
pub mod journal_lines;
pub mod sea_orm_active_enums;
