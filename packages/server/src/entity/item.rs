use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    /// Nullable so rows written before categories existed still load.
    pub category_id: Option<i64>,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: BelongsTo<Option<super::category::Entity>>,

    /// Stored image file name, `default.jpg` when none was uploaded.
    pub image_name: String,
}

impl ActiveModelBehavior for ActiveModel {}
