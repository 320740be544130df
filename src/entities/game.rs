use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A catalog game. `rating` and `total_reviews` are derived from the
/// game's reviews and only written by `services::rating::recompute_rating`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub release_date: Date,
    pub price_cents: i64,
    pub cover_image_url: Option<String>,
    pub steam_url: Option<String>,
    pub developer_id: Option<Uuid>,
    pub rating: f64,
    pub total_reviews: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::developer::Entity",
        from = "Column::DeveloperId",
        to = "super::developer::Column::Id",
        on_delete = "SetNull"
    )]
    Developer,
    #[sea_orm(has_many = "super::game_category::Entity")]
    GameCategories,
    #[sea_orm(has_many = "super::library_entry::Entity")]
    LibraryEntries,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::developer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Developer.def()
    }
}

impl Related<super::game_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameCategories.def()
    }
}

impl Related<super::library_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryEntries.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_category::Relation::Game.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
