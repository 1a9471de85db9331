pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_reference_tables;
mod m20250301_000002_create_users;
mod m20250301_000003_create_projects_and_work_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_reference_tables::Migration),
            Box::new(m20250301_000002_create_users::Migration),
            Box::new(m20250301_000003_create_projects_and_work_items::Migration),
        ]
    }
}

/// Columns shared by every lookup table
#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum Lookup {
    Id,
    Name,
    Code,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

/// Build a lookup table keyed by `id` with a unique natural key column
pub(crate) fn lookup_table(table: &str, key: impl IntoIden) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(ColumnDef::new(Lookup::Id).string().not_null().primary_key())
        .col(ColumnDef::new(key).string().not_null().unique_key())
        .col(ColumnDef::new(Lookup::Description).string().null())
        .col(ColumnDef::new(Lookup::IsActive).boolean().not_null().default(true))
        .col(ColumnDef::new(Lookup::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Lookup::UpdatedAt).big_integer().not_null())
        .to_owned()
}
