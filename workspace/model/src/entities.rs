//! This file serves as the root for all SeaORM entity modules.
//! The data models mirror the relational schema of the game shop:
//! a catalog (developers, publishers, genres, games), the identity
//! records (users, roles) and the purchase join table.

pub mod developer;
pub mod game;
pub mod game_genre;
pub mod genre;
pub mod publisher;
pub mod role;
pub mod user;
pub mod user_bought;
pub mod user_role;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::developer::Entity as Developer;
    pub use super::game::Entity as Game;
    pub use super::game_genre::Entity as GameGenre;
    pub use super::genre::Entity as Genre;
    pub use super::publisher::Entity as Publisher;
    pub use super::role::Entity as Role;
    pub use super::user::Entity as User;
    pub use super::user_bought::Entity as UserBought;
    pub use super::user_role::Entity as UserRole;
}
