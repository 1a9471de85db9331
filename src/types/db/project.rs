use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Legacy project number carried over from the old timesheet system
    #[sea_orm(unique)]
    pub project_number: String,
    pub name: String,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work_item::Entity")]
    WorkItem,
    #[sea_orm(has_many = "super::project_assignment::Entity")]
    ProjectAssignment,
}

impl Related<super::work_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkItem.def()
    }
}

impl Related<super::project_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
