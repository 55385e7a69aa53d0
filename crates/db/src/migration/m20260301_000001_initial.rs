//! Initial database migration.
//!
//! Creates the books, accounts, journal entries, and journal lines tables.
//! UUIDs are stored as BLOB, dates and timestamps as TEXT, and money as
//! INTEGER minor units.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: BOOKS
        // ============================================================
        db.execute_unprepared(BOOKS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_CODE_INDEX_SQL).await?;
        db.execute_unprepared(ACCOUNTS_PARENT_INDEX_SQL).await?;

        // ============================================================
        // PART 3: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_EXTERNAL_ID_INDEX_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_DATE_INDEX_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_ENTRY_INDEX_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_ACCOUNT_INDEX_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in ["journal_lines", "journal_entries", "accounts", "books"] {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {table};"))
                .await?;
        }
        Ok(())
    }
}

const BOOKS_SQL: &str = r"
CREATE TABLE books (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL DEFAULT 'personal' CHECK (kind IN ('personal', 'family')),
    owner_id BLOB NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id BLOB PRIMARY KEY NOT NULL,
    book_id BLOB NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    class TEXT NOT NULL CHECK (class IN ('asset', 'liability', 'equity', 'income', 'expense')),
    direction TEXT NOT NULL CHECK (direction IN ('debit', 'credit')),
    parent_id BLOB REFERENCES accounts(id),
    icon TEXT,
    is_system INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

const ACCOUNTS_CODE_INDEX_SQL: &str =
    "CREATE UNIQUE INDEX uidx_accounts_book_code ON accounts (book_id, code);";

const ACCOUNTS_PARENT_INDEX_SQL: &str =
    "CREATE INDEX idx_accounts_parent ON accounts (parent_id);";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id BLOB PRIMARY KEY NOT NULL,
    book_id BLOB NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    user_id BLOB NOT NULL,
    entry_date TEXT NOT NULL,
    entry_type TEXT NOT NULL,
    description TEXT,
    note TEXT,
    is_balanced INTEGER NOT NULL DEFAULT 1,
    reconciliation_status TEXT NOT NULL DEFAULT 'none',
    source TEXT NOT NULL DEFAULT 'manual',
    external_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

const JOURNAL_ENTRIES_EXTERNAL_ID_INDEX_SQL: &str =
    "CREATE UNIQUE INDEX uidx_journal_entries_book_external_id ON journal_entries (book_id, external_id);";

const JOURNAL_ENTRIES_DATE_INDEX_SQL: &str =
    "CREATE INDEX idx_journal_entries_book_date ON journal_entries (book_id, entry_date);";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id BLOB PRIMARY KEY NOT NULL,
    entry_id BLOB NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id BLOB NOT NULL REFERENCES accounts(id),
    position INTEGER NOT NULL,
    debit_minor INTEGER NOT NULL DEFAULT 0 CHECK (debit_minor >= 0),
    credit_minor INTEGER NOT NULL DEFAULT 0 CHECK (credit_minor >= 0),
    description TEXT
);
";

const JOURNAL_LINES_ENTRY_INDEX_SQL: &str =
    "CREATE INDEX idx_journal_lines_entry ON journal_lines (entry_id, position);";

const JOURNAL_LINES_ACCOUNT_INDEX_SQL: &str =
    "CREATE INDEX idx_journal_lines_account ON journal_lines (account_id);";
