use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::types::dto::reference::{ReferenceKind, ReferenceRecord};
use crate::types::internal::lookup::LookupInput;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl super::LookupEntity for Entity {
    type Active = ActiveModel;

    const KIND: ReferenceKind = ReferenceKind::Roles;

    const PRE_CHECK_KEY: bool = true;

    fn id_column() -> Column {
        Column::Id
    }

    fn key_column() -> Column {
        Column::Name
    }

    fn to_record(model: Model) -> ReferenceRecord {
        ReferenceRecord {
            id: model.id,
            kind: Self::KIND,
            key: model.name,
            description: model.description,
            parent_id: None,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn new_active(id: String, input: LookupInput, now: i64) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            name: Set(input.key),
            description: Set(input.description),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn apply(model: Model, input: LookupInput, now: i64) -> ActiveModel {
        let mut active: ActiveModel = model.into();
        active.name = Set(input.key);
        active.description = Set(input.description);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(now);
        active
    }
}
