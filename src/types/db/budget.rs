use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
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
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

super::lookup::impl_lookup_entity!(Budgets, name, Name);

impl Model {
    /// Expense budgets (OPEX and similar) take director/reason/CPC codes
    /// instead of a project, activity code and network number
    pub fn is_expense(&self) -> bool {
        let markers = ["opex", "expense"];
        let name = self.name.to_lowercase();
        let description = self.description.as_deref().unwrap_or_default().to_lowercase();
        markers
            .iter()
            .any(|marker| name.contains(marker) || description.contains(marker))
    }
}
