use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "calendar_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub calendar_category_id: Option<String>,
    pub title: String,
    pub entry_date: Date,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::calendar_category::Entity",
        from = "Column::CalendarCategoryId",
        to = "super::calendar_category::Column::Id",
        on_delete = "SetNull"
    )]
    CalendarCategory,
}

impl Related<super::calendar_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CalendarCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
