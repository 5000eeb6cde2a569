pub mod auth;
pub mod developers;
pub mod games;
pub mod genres;
pub mod health;
pub mod publishers;
pub mod purchases;
pub mod roles;
pub mod users;
