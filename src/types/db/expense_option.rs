use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::types::dto::reference::{ReferenceKind, ReferenceRecord};
use crate::types::internal::lookup::LookupInput;

/// Option names are unique within a category (composite unique index)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_category::Entity",
        from = "Column::ExpenseCategoryId",
        to = "super::expense_category::Column::Id",
        on_delete = "Cascade"
    )]
    ExpenseCategory,
}

impl Related<super::expense_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl super::LookupEntity for Entity {
    type Active = ActiveModel;

    const KIND: ReferenceKind = ReferenceKind::ExpenseOptions;

    fn id_column() -> Column {
        Column::Id
    }

    fn key_column() -> Column {
        Column::Name
    }

    fn parent_column() -> Option<Column> {
        Some(Column::ExpenseCategoryId)
    }

    fn to_record(model: Model) -> ReferenceRecord {
        ReferenceRecord {
            id: model.id,
            kind: Self::KIND,
            key: model.name,
            description: model.description,
            parent_id: Some(model.expense_category_id),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn new_active(id: String, input: LookupInput, now: i64) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            expense_category_id: Set(input.parent_id.unwrap_or_default()),
            name: Set(input.key),
            description: Set(input.description),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn apply(model: Model, input: LookupInput, now: i64) -> ActiveModel {
        let mut active: ActiveModel = model.into();
        if let Some(category_id) = input.parent_id {
            active.expense_category_id = Set(category_id);
        }
        active.name = Set(input.key);
        active.description = Set(input.description);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(now);
        active
    }
}
