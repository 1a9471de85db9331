use sea_orm_migration::prelude::*;

use crate::{Lookup, lookup_table};

/// Lookup tables keyed by `name`
const NAMED_TABLES: &[&str] = &[
    "roles",
    "positions",
    "departments",
    "unions",
    "activity_categories",
    "budgets",
    "expense_categories",
    "calendar_categories",
];

/// Lookup tables keyed by `code`
const CODED_TABLES: &[&str] = &["director_codes", "reason_codes", "cpc_codes"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in NAMED_TABLES {
            manager.create_table(lookup_table(table, Lookup::Name)).await?;
        }

        for table in CODED_TABLES {
            manager.create_table(lookup_table(table, Lookup::Code)).await?;
        }

        // Activity codes optionally belong to an activity category
        let mut activity_codes = lookup_table("activity_codes", Lookup::Code);
        activity_codes
            .col(ColumnDef::new(ActivityCodes::ActivityCategoryId).string().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_activity_codes_category")
                    .from(ActivityCodes::Table, ActivityCodes::ActivityCategoryId)
                    .to(Alias::new("activity_categories"), Lookup::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        manager.create_table(activity_codes).await?;

        // Expense option names are unique within their category, not globally
        manager
            .create_table(
                Table::create()
                    .table(ExpenseOptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ExpenseOptions::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(ExpenseOptions::ExpenseCategoryId).string().not_null())
                    .col(ColumnDef::new(ExpenseOptions::Name).string().not_null())
                    .col(ColumnDef::new(ExpenseOptions::Description).string().null())
                    .col(ColumnDef::new(ExpenseOptions::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(ExpenseOptions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ExpenseOptions::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_options_category")
                            .from(ExpenseOptions::Table, ExpenseOptions::ExpenseCategoryId)
                            .to(Alias::new("expense_categories"), Lookup::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expense_options_category_name")
                    .table(ExpenseOptions::Table)
                    .col(ExpenseOptions::ExpenseCategoryId)
                    .col(ExpenseOptions::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CalendarEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CalendarEntries::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(CalendarEntries::CalendarCategoryId).string().null())
                    .col(ColumnDef::new(CalendarEntries::Title).string().not_null())
                    .col(ColumnDef::new(CalendarEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(CalendarEntries::Description).string().null())
                    .col(ColumnDef::new(CalendarEntries::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(CalendarEntries::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_calendar_entries_category")
                            .from(CalendarEntries::Table, CalendarEntries::CalendarCategoryId)
                            .to(Alias::new("calendar_categories"), Lookup::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_calendar_entries_entry_date")
                    .table(CalendarEntries::Table)
                    .col(CalendarEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CalendarEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActivityCodes::Table).to_owned())
            .await?;

        for table in CODED_TABLES.iter().chain(NAMED_TABLES.iter()) {
            manager
                .drop_table(Table::drop().table(Alias::new(*table)).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ActivityCodes {
    Table,
    ActivityCategoryId,
}

#[derive(DeriveIden)]
enum ExpenseOptions {
    Table,
    Id,
    ExpenseCategoryId,
    Name,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CalendarEntries {
    Table,
    Id,
    CalendarCategoryId,
    Title,
    EntryDate,
    Description,
    CreatedAt,
    UpdatedAt,
}
