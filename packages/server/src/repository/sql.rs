use async_trait::async_trait;
use sea_orm::sea_query::{LikeExpr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::ItemRepository;
use super::error::{RepositoryError, RepositoryResult};
use super::item::{Item, NewItem};
use crate::entity::{category, item};

/// Item repository over a relational database (SQLite in practice).
///
/// Category names are normalized into the `categories` table; reads join
/// them back.
#[derive(Clone)]
pub struct SqlItemRepository {
    db: DatabaseConnection,
}

impl SqlItemRepository {
    /// Expects the schema to exist already (see [`crate::database::init_db`]).
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for SqlItemRepository {
    async fn insert(&self, new_item: NewItem) -> RepositoryResult<Item> {
        new_item.validate()?;

        let txn = self.db.begin().await?;
        let category = find_or_create_category(&txn, &new_item.category).await?;

        let model = item::ActiveModel {
            name: Set(new_item.name.clone()),
            category_id: Set(Some(category.id)),
            image_name: Set(new_item.image_name.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        Ok(new_item.into_item(model.id, Some(category.id)))
    }

    async fn list(&self) -> RepositoryResult<Vec<Item>> {
        let rows = item::Entity::find()
            .find_also_related(category::Entity)
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(to_item).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Item> {
        item::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(&self.db)
            .await?
            .map(to_item)
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn search_by_name(&self, keyword: &str) -> RepositoryResult<Vec<Item>> {
        let pattern = format!("%{}%", escape_like(keyword));
        let rows = item::Entity::find()
            .filter(item::Column::Name.like(LikeExpr::new(pattern).escape('\\')))
            .find_also_related(category::Entity)
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?;

        // SQLite's LIKE folds ASCII case; keep only exact-case matches.
        Ok(rows
            .into_iter()
            .map(to_item)
            .filter(|item| item.name.contains(keyword))
            .collect())
    }
}

/// Insert-if-absent first so the transaction takes the write lock before
/// reading.
async fn find_or_create_category<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> RepositoryResult<category::Model> {
    category::Entity::insert(category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(category::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    category::Entity::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| RepositoryError::Storage(format!("category '{name}' missing after upsert")))
}

fn to_item((model, category): (item::Model, Option<category::Model>)) -> Item {
    Item {
        id: model.id,
        name: model.name,
        category: category.map(|c| c.name).unwrap_or_default(),
        category_id: model.category_id,
        image_name: model.image_name,
    }
}

/// Escape LIKE wildcard characters in a search string.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
