use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, PaginatorTrait, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn count(db: &DatabaseConnection) -> Result<u64, ModelError> {
    Ok(Entity::find().count(db).await?)
}

/// All rows, ordered by id.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn exists_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, ModelError> {
    Ok(Entity::find_by_id(id).count(db).await? > 0)
}

/// Exact-match lookup on the uniqueness triple, optionally ignoring one row.
pub async fn exists_by_title_director_year(
    db: &DatabaseConnection,
    title: &str,
    director: &str,
    year: i32,
    excluding: Option<i64>,
) -> Result<bool, ModelError> {
    let mut finder = Entity::find()
        .filter(Column::Title.eq(title))
        .filter(Column::Director.eq(director))
        .filter(Column::Year.eq(year));
    if let Some(id) = excluding { finder = finder.filter(Column::Id.ne(id)); }
    Ok(finder.count(db).await? > 0)
}

/// Insert a new row; the database assigns `id`.
/// A taken triple surfaces as `ModelError::UniqueViolation`.
pub async fn insert(db: &DatabaseConnection, title: &str, director: &str, year: i32) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: NotSet,
        title: Set(title.to_string()),
        director: Set(director.to_string()),
        year: Set(year),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Overwrite title, director and year of an existing row. `Ok(None)` if `id` is unknown.
pub async fn replace(
    db: &DatabaseConnection,
    id: i64,
    title: &str,
    director: &str,
    year: i32,
) -> Result<Option<Model>, ModelError> {
    let Some(existing) = Entity::find_by_id(id).one(db).await? else { return Ok(None); };
    let mut am: ActiveModel = existing.into();
    am.title = Set(title.to_string());
    am.director = Set(director.to_string());
    am.year = Set(year);
    am.updated_at = Set(Utc::now().into());
    updated_or_missing(am.update(db).await)
}

/// A row deleted between the lookup and the UPDATE counts as missing.
pub(crate) fn updated_or_missing(res: Result<Model, DbErr>) -> Result<Option<Model>, ModelError> {
    match res {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Returns true if a row was deleted.
pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
