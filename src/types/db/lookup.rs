use sea_orm::{ActiveModelBehavior, ActiveModelTrait, EntityTrait};

use crate::types::dto::reference::{ReferenceKind, ReferenceRecord};
use crate::types::internal::lookup::LookupInput;

/// A flat reference table managed through the generic admin endpoints
///
/// Every lookup row has an id, a natural key, an optional description and an
/// active flag. Some kinds also carry a parent id used as the list filter.
pub trait LookupEntity: EntityTrait {
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send;

    const KIND: ReferenceKind;

    /// Whether the store checks the natural key before inserting instead of
    /// relying on the unique index alone
    const PRE_CHECK_KEY: bool = false;

    fn id_column() -> Self::Column;

    fn key_column() -> Self::Column;

    fn parent_column() -> Option<Self::Column> {
        None
    }

    fn to_record(model: Self::Model) -> ReferenceRecord;

    fn new_active(id: String, input: LookupInput, now: i64) -> Self::Active;

    fn apply(model: Self::Model, input: LookupInput, now: i64) -> Self::Active;
}

/// Implements [`LookupEntity`] for a table shaped
/// `(id, <key>, description, is_active, created_at, updated_at)`.
macro_rules! impl_lookup_entity {
    ($kind:ident, $key:ident, $key_column:ident) => {
        impl $crate::types::db::lookup::LookupEntity for Entity {
            type Active = ActiveModel;

            const KIND: $crate::types::dto::reference::ReferenceKind =
                $crate::types::dto::reference::ReferenceKind::$kind;

            fn id_column() -> Column {
                Column::Id
            }

            fn key_column() -> Column {
                Column::$key_column
            }

            fn to_record(model: Model) -> $crate::types::dto::reference::ReferenceRecord {
                $crate::types::dto::reference::ReferenceRecord {
                    id: model.id,
                    kind: Self::KIND,
                    key: model.$key,
                    description: model.description,
                    parent_id: None,
                    is_active: model.is_active,
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                }
            }

            fn new_active(
                id: String,
                input: $crate::types::internal::lookup::LookupInput,
                now: i64,
            ) -> ActiveModel {
                ActiveModel {
                    id: ::sea_orm::ActiveValue::Set(id),
                    $key: ::sea_orm::ActiveValue::Set(input.key),
                    description: ::sea_orm::ActiveValue::Set(input.description),
                    is_active: ::sea_orm::ActiveValue::Set(input.is_active),
                    created_at: ::sea_orm::ActiveValue::Set(now),
                    updated_at: ::sea_orm::ActiveValue::Set(now),
                }
            }

            fn apply(
                model: Model,
                input: $crate::types::internal::lookup::LookupInput,
                now: i64,
            ) -> ActiveModel {
                let mut active: ActiveModel = model.into();
                active.$key = ::sea_orm::ActiveValue::Set(input.key);
                active.description = ::sea_orm::ActiveValue::Set(input.description);
                active.is_active = ::sea_orm::ActiveValue::Set(input.is_active);
                active.updated_at = ::sea_orm::ActiveValue::Set(now);
                active
            }
        }
    };
}

pub(crate) use impl_lookup_entity;
