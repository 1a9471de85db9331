use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, IntoActiveModel, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::LookupEntity;
use crate::types::dto::reference::ReferenceRecord;
use crate::types::internal::LookupInput;

/// Data access for the flat reference tables
///
/// Every operation is generic over a [`LookupEntity`], so one implementation
/// serves roles, budgets, activity codes and the rest. Callers pass the
/// connection so the same calls work inside the seeding transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStore;

impl LookupStore {
    pub fn new() -> Self {
        Self
    }

    /// List rows ordered by natural key, optionally restricted to one parent
    ///
    /// The parent filter is ignored for kinds without a parent column.
    pub async fn list<E: LookupEntity>(
        &self,
        conn: &impl ConnectionTrait,
        parent_id: Option<&str>,
    ) -> Result<Vec<ReferenceRecord>, InternalError> {
        let mut query = E::find();
        if let (Some(parent_id), Some(column)) = (parent_id, E::parent_column()) {
            query = query.filter(column.eq(parent_id));
        }

        let rows = query
            .order_by_asc(E::key_column())
            .all(conn)
            .await
            .map_err(|e| InternalError::database(&format!("list_{}", E::KIND.label()), e))?;

        Ok(rows.into_iter().map(E::to_record).collect())
    }

    pub async fn get<E: LookupEntity>(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<ReferenceRecord, InternalError> {
        let model = Self::find_model::<E>(conn, id).await?;
        Ok(E::to_record(model))
    }

    /// Find a row by natural key (and parent, for kinds keyed within a parent)
    pub async fn find_by_key<E: LookupEntity>(
        &self,
        conn: &impl ConnectionTrait,
        key: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<ReferenceRecord>, InternalError> {
        let mut query = E::find().filter(E::key_column().eq(key));
        if let (Some(parent_id), Some(column)) = (parent_id, E::parent_column()) {
            query = query.filter(column.eq(parent_id));
        }

        let model = query
            .one(conn)
            .await
            .map_err(|e| InternalError::database(&format!("find_{}_by_key", E::KIND.label()), e))?;

        Ok(model.map(E::to_record))
    }

    /// Insert a new row with a generated id
    ///
    /// # Errors
    /// * `Conflict` - natural key already taken (pre-checked for kinds that opt in,
    ///   otherwise reported by the unique index)
    /// * `Validation` - parent id does not reference an existing row
    pub async fn create<E: LookupEntity>(
        &self,
        conn: &impl ConnectionTrait,
        input: LookupInput,
    ) -> Result<ReferenceRecord, InternalError>
    where
        E::Model: IntoActiveModel<E::Active>,
    {
        if E::PRE_CHECK_KEY
            && self
                .find_by_key::<E>(conn, &input.key, input.parent_id.as_deref())
                .await?
                .is_some()
        {
            return Err(InternalError::conflict(format!(
                "A {} named '{}' already exists",
                E::KIND.label(),
                input.key
            )));
        }

        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();

        let model = E::new_active(id, input, now)
            .insert(conn)
            .await
            .map_err(|e| InternalError::database(&format!("create_{}", E::KIND.label()), e))?;

        Ok(E::to_record(model))
    }

    /// Overwrite the mutable fields of an existing row
    pub async fn update<E: LookupEntity>(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
        input: LookupInput,
    ) -> Result<ReferenceRecord, InternalError>
    where
        E::Model: IntoActiveModel<E::Active>,
    {
        let existing = Self::find_model::<E>(conn, id).await?;
        let now = chrono::Utc::now().timestamp();

        let model = E::apply(existing, input, now)
            .update(conn)
            .await
            .map_err(|e| InternalError::database(&format!("update_{}", E::KIND.label()), e))?;

        Ok(E::to_record(model))
    }

    /// Hard delete; `NotFound` when nothing matched
    pub async fn delete<E: LookupEntity>(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<(), InternalError> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database(&format!("delete_{}", E::KIND.label()), e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::not_found(E::KIND.label(), id));
        }

        Ok(())
    }

    /// Return the existing row for the key, creating it when absent
    ///
    /// The boolean is true when a row was inserted. Used by seeding.
    pub async fn ensure<E: LookupEntity>(
        &self,
        conn: &impl ConnectionTrait,
        input: LookupInput,
    ) -> Result<(ReferenceRecord, bool), InternalError>
    where
        E::Model: IntoActiveModel<E::Active>,
    {
        if let Some(existing) = self
            .find_by_key::<E>(conn, &input.key, input.parent_id.as_deref())
            .await?
        {
            return Ok((existing, false));
        }

        let created = self.create::<E>(conn, input).await?;
        Ok((created, true))
    }

    async fn find_model<E: LookupEntity>(
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<E::Model, InternalError> {
        E::find()
            .filter(E::id_column().eq(id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database(&format!("get_{}", E::KIND.label()), e))?
            .ok_or_else(|| InternalError::not_found(E::KIND.label(), id))
    }
}
