//! `SeaORM` Entity for accounts table.

use homebook_core::chart::AccountRecord;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AccountClass, BalanceDirection};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub book_id: Uuid,
    pub code: String,
    pub name: String,
    pub class: AccountClass,
    pub direction: BalanceDirection,
    pub parent_id: Option<Uuid>,
    pub icon: Option<String>,
    pub is_system: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::books::Entity",
        from = "Column::BookId",
        to = "super::books::Column::Id"
    )]
    Books,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AccountRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            book_id: model.book_id,
            code: model.code,
            name: model.name,
            class: model.class.into(),
            direction: model.direction.into(),
            parent_id: model.parent_id,
            icon: model.icon,
            is_system: model.is_system,
            is_active: model.is_active,
            sort_order: model.sort_order,
        }
    }
}
