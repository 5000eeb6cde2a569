use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{developer, genre, publisher};

/// A game offered in the storefront catalog.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Current list price of the game.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub price: Decimal,
    /// Unreleased games have no release date yet.
    pub release_date: Option<NaiveDate>,
    /// The studio that developed the game.
    pub developer_id: i32,
    /// The company that published the game.
    pub publisher_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "developer::Entity",
        from = "Column::DeveloperId",
        to = "developer::Column::Id",
        on_delete = "Cascade"
    )]
    Developer,
    #[sea_orm(
        belongs_to = "publisher::Entity",
        from = "Column::PublisherId",
        to = "publisher::Column::Id",
        on_delete = "Cascade"
    )]
    Publisher,
    /// Relation for the many-to-many relationship with genres.
    #[sea_orm(has_many = "super::game_genre::Entity")]
    GameGenre,
    /// Purchases of this game.
    #[sea_orm(has_many = "super::user_bought::Entity")]
    UserBought,
}

impl Related<developer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Developer.def()
    }
}

impl Related<publisher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publisher.def()
    }
}

impl Related<genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_genre::Relation::Genre.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::game_genre::Relation::Game.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
