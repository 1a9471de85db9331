use sea_orm_migration::prelude::*;

use crate::{Lookup, lookup_table};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Projects::ProjectNumber).string().not_null().unique_key())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).string().null())
                    .col(ColumnDef::new(Projects::EstimatedHours).double().null())
                    .col(ColumnDef::new(Projects::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Projects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Projects::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectAssignments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectAssignments::ProjectId).string().not_null())
                    .col(ColumnDef::new(ProjectAssignments::UserId).string().not_null())
                    .col(ColumnDef::new(ProjectAssignments::RoleLabel).string().null())
                    .col(ColumnDef::new(ProjectAssignments::EstimatedHours).double().null())
                    .col(ColumnDef::new(ProjectAssignments::CreatedAt).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProjectAssignments::ProjectId)
                            .col(ProjectAssignments::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_assignments_project")
                            .from(ProjectAssignments::Table, ProjectAssignments::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_assignments_user")
                            .from(ProjectAssignments::Table, ProjectAssignments::UserId)
                            .to(Alias::new("users"), Lookup::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Network numbers optionally belong to a project
        let mut network_numbers = lookup_table("network_numbers", NetworkNumbers::Number);
        network_numbers
            .col(ColumnDef::new(NetworkNumbers::ProjectId).string().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_network_numbers_project")
                    .from(NetworkNumbers::Table, NetworkNumbers::ProjectId)
                    .to(Projects::Table, Projects::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        manager.create_table(network_numbers).await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkItems::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(WorkItems::Title).string().not_null())
                    .col(ColumnDef::new(WorkItems::Description).string().null())
                    .col(ColumnDef::new(WorkItems::ProjectId).string().null())
                    .col(ColumnDef::new(WorkItems::BudgetId).string().null())
                    .col(ColumnDef::new(WorkItems::UserId).string().null())
                    .col(ColumnDef::new(WorkItems::WorkDate).date().null())
                    .col(ColumnDef::new(WorkItems::StartTime).string().null())
                    .col(ColumnDef::new(WorkItems::EndTime).string().null())
                    .col(ColumnDef::new(WorkItems::PlannedDuration).double().null())
                    .col(ColumnDef::new(WorkItems::ActualDuration).double().null())
                    .col(ColumnDef::new(WorkItems::EstimatedHours).double().null())
                    .col(ColumnDef::new(WorkItems::RemainingHours).double().null())
                    .col(ColumnDef::new(WorkItems::ActivityCode).string().null())
                    .col(ColumnDef::new(WorkItems::NetworkNumber).string().null())
                    .col(ColumnDef::new(WorkItems::DirectorCode).string().null())
                    .col(ColumnDef::new(WorkItems::ReasonCode).string().null())
                    .col(ColumnDef::new(WorkItems::CpcCode).string().null())
                    .col(ColumnDef::new(WorkItems::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(WorkItems::UpdatedAt).big_integer().not_null())
                    // Deleting a project keeps its logged hours
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_items_project")
                            .from(WorkItems::Table, WorkItems::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_items_budget")
                            .from(WorkItems::Table, WorkItems::BudgetId)
                            .to(Alias::new("budgets"), Lookup::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_items_user")
                            .from(WorkItems::Table, WorkItems::UserId)
                            .to(Alias::new("users"), Lookup::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_work_items_user_id", WorkItems::UserId),
            ("idx_work_items_project_id", WorkItems::ProjectId),
            ("idx_work_items_work_date", WorkItems::WorkDate),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(WorkItems::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NetworkNumbers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    ProjectNumber,
    Name,
    Description,
    EstimatedHours,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProjectAssignments {
    Table,
    ProjectId,
    UserId,
    RoleLabel,
    EstimatedHours,
    CreatedAt,
}

#[derive(DeriveIden)]
enum NetworkNumbers {
    Table,
    Number,
    ProjectId,
}

#[derive(DeriveIden)]
enum WorkItems {
    Table,
    Id,
    Title,
    Description,
    ProjectId,
    BudgetId,
    UserId,
    WorkDate,
    StartTime,
    EndTime,
    PlannedDuration,
    ActualDuration,
    EstimatedHours,
    RemainingHours,
    ActivityCode,
    NetworkNumber,
    DirectorCode,
    ReasonCode,
    CpcCode,
    CreatedAt,
    UpdatedAt,
}
