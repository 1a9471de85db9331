use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::services::validation::{optional_text, required_text};
use crate::stores::LookupStore;
use crate::types::dto::reference::{ReferenceInput, ReferenceKind, ReferenceRecord};
use crate::types::internal::{LookupInput, RoleName};

/// Run `$body` with `$entity` bound to the SeaORM entity backing `$kind`
macro_rules! with_lookup_entity {
    ($kind:expr, |$entity:ident| $body:expr) => {{
        use crate::types::db::*;
        match $kind {
            ReferenceKind::Roles => { type $entity = role::Entity; $body }
            ReferenceKind::Positions => { type $entity = position::Entity; $body }
            ReferenceKind::Departments => { type $entity = department::Entity; $body }
            ReferenceKind::Unions => { type $entity = labour_union::Entity; $body }
            ReferenceKind::ActivityCategories => { type $entity = activity_category::Entity; $body }
            ReferenceKind::ActivityCodes => { type $entity = activity_code::Entity; $body }
            ReferenceKind::NetworkNumbers => { type $entity = network_number::Entity; $body }
            ReferenceKind::DirectorCodes => { type $entity = director_code::Entity; $body }
            ReferenceKind::ReasonCodes => { type $entity = reason_code::Entity; $body }
            ReferenceKind::CpcCodes => { type $entity = cpc_code::Entity; $body }
            ReferenceKind::Budgets => { type $entity = budget::Entity; $body }
            ReferenceKind::ExpenseCategories => { type $entity = expense_category::Entity; $body }
            ReferenceKind::ExpenseOptions => { type $entity = expense_option::Entity; $body }
            ReferenceKind::CalendarCategories => { type $entity = calendar_category::Entity; $body }
        }
    }};
}

/// Admin CRUD over every reference table
pub struct ReferenceService {
    db: DatabaseConnection,
    lookups: LookupStore,
}

impl ReferenceService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            lookups: app_data.lookup_store,
        }
    }

    /// Trim and validate a create/update body
    ///
    /// Role names must be one of the known roles and are stored in their
    /// canonical spelling.
    fn normalize(kind: ReferenceKind, input: ReferenceInput, creating: bool) -> Result<LookupInput, InternalError> {
        let mut key = required_text(&input.key, kind.key_label())?;
        let parent_id = optional_text(input.parent_id);

        if kind == ReferenceKind::Roles {
            let role = RoleName::parse(&key).ok_or_else(|| {
                InternalError::validation(format!(
                    "Role name must be one of: {}",
                    RoleName::ALL.map(|r| r.as_str()).join(", ")
                ))
            })?;
            key = role.as_str().to_string();
        }

        if creating && kind.requires_parent() && parent_id.is_none() {
            return Err(InternalError::validation(format!(
                "Parent id is required for {}",
                kind.label()
            )));
        }

        Ok(LookupInput {
            key,
            description: optional_text(input.description),
            parent_id,
            is_active: input.is_active.unwrap_or(true),
        })
    }

    pub async fn list(
        &self,
        kind: ReferenceKind,
        parent_id: Option<String>,
    ) -> Result<Vec<ReferenceRecord>, InternalError> {
        let parent_id = optional_text(parent_id);
        with_lookup_entity!(kind, |E| self.lookups.list::<E>(&self.db, parent_id.as_deref()).await)
    }

    pub async fn get(&self, kind: ReferenceKind, id: &str) -> Result<ReferenceRecord, InternalError> {
        with_lookup_entity!(kind, |E| self.lookups.get::<E>(&self.db, id).await)
    }

    pub async fn create(
        &self,
        kind: ReferenceKind,
        input: ReferenceInput,
    ) -> Result<ReferenceRecord, InternalError> {
        let input = Self::normalize(kind, input, true)?;
        let record = with_lookup_entity!(kind, |E| self.lookups.create::<E>(&self.db, input).await)?;

        tracing::info!("Created {} '{}' ({})", kind.label(), record.key, record.id);
        Ok(record)
    }

    /// Overwrite an existing row; a missing id is reported before any validation
    pub async fn update(
        &self,
        kind: ReferenceKind,
        id: &str,
        input: ReferenceInput,
    ) -> Result<ReferenceRecord, InternalError> {
        self.get(kind, id).await?;
        let input = Self::normalize(kind, input, false)?;
        let record = with_lookup_entity!(kind, |E| self.lookups.update::<E>(&self.db, id, input).await)?;

        tracing::info!("Updated {} '{}' ({})", kind.label(), record.key, record.id);
        Ok(record)
    }

    pub async fn delete(&self, kind: ReferenceKind, id: &str) -> Result<(), InternalError> {
        with_lookup_entity!(kind, |E| self.lookups.delete::<E>(&self.db, id).await)?;

        tracing::info!("Deleted {} {}", kind.label(), id);
        Ok(())
    }

    /// Make sure a row exists for every known role; returns how many were added
    pub async fn ensure_roles(&self) -> Result<usize, InternalError> {
        let mut created = 0;
        for role in RoleName::ALL {
            let input = LookupInput {
                key: role.as_str().to_string(),
                description: None,
                parent_id: None,
                is_active: true,
            };
            let (_, inserted) = self
                .lookups
                .ensure::<crate::types::db::role::Entity>(&self.db, input)
                .await?;
            if inserted {
                created += 1;
            }
        }

        if created > 0 {
            tracing::info!("Created {} missing role(s)", created);
        }
        Ok(created)
    }
}
