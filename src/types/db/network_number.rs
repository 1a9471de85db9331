use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::types::dto::reference::{ReferenceKind, ReferenceRecord};
use crate::types::internal::lookup::LookupInput;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "network_numbers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub number: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub project_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "SetNull"
    )]
    Project,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl super::LookupEntity for Entity {
    type Active = ActiveModel;

    const KIND: ReferenceKind = ReferenceKind::NetworkNumbers;

    fn id_column() -> Column {
        Column::Id
    }

    fn key_column() -> Column {
        Column::Number
    }

    fn parent_column() -> Option<Column> {
        Some(Column::ProjectId)
    }

    fn to_record(model: Model) -> ReferenceRecord {
        ReferenceRecord {
            id: model.id,
            kind: Self::KIND,
            key: model.number,
            description: model.description,
            parent_id: model.project_id,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn new_active(id: String, input: LookupInput, now: i64) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            number: Set(input.key),
            description: Set(input.description),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            project_id: Set(input.parent_id),
        }
    }

    fn apply(model: Model, input: LookupInput, now: i64) -> ActiveModel {
        let mut active: ActiveModel = model.into();
        active.number = Set(input.key);
        active.description = Set(input.description);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(now);
        active.project_id = Set(input.parent_id);
        active
    }
}
