use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create developers table
        manager
            .create_table(
                Table::create()
                    .table(Developers::Table)
                    .if_not_exists()
                    .col(pk_auto(Developers::Id))
                    .col(string(Developers::Name).unique_key())
                    .col(string_null(Developers::Country))
                    .to_owned(),
            )
            .await?;

        // Create publishers table
        manager
            .create_table(
                Table::create()
                    .table(Publishers::Table)
                    .if_not_exists()
                    .col(pk_auto(Publishers::Id))
                    .col(string(Publishers::Name).unique_key())
                    .col(string_null(Publishers::Country))
                    .to_owned(),
            )
            .await?;

        // Create genres table
        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(pk_auto(Genres::Id))
                    .col(string(Genres::Name).unique_key())
                    .col(string_null(Genres::Description))
                    .to_owned(),
            )
            .await?;

        // Create games table
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(pk_auto(Games::Id))
                    .col(string(Games::Name))
                    .col(string_null(Games::Description))
                    .col(decimal(Games::Price).decimal_len(16, 4))
                    .col(date_null(Games::ReleaseDate))
                    .col(integer(Games::DeveloperId))
                    .col(integer(Games::PublisherId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_developer")
                            .from(Games::Table, Games::DeveloperId)
                            .to(Developers::Table, Developers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_publisher")
                            .from(Games::Table, Games::PublisherId)
                            .to(Publishers::Table, Publishers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create games_genres table (join table)
        manager
            .create_table(
                Table::create()
                    .table(GamesGenres::Table)
                    .if_not_exists()
                    .col(integer(GamesGenres::GameId))
                    .col(integer(GamesGenres::GenreId))
                    .primary_key(
                        Index::create()
                            .name("pk_games_genres")
                            .col(GamesGenres::GameId)
                            .col(GamesGenres::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_genres_game")
                            .from(GamesGenres::Table, GamesGenres::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_genres_genre")
                            .from(GamesGenres::Table, GamesGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .to_owned(),
            )
            .await?;

        // Create roles table
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(pk_auto(Roles::Id))
                    .col(string(Roles::Name).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create users_roles table (join table)
        manager
            .create_table(
                Table::create()
                    .table(UsersRoles::Table)
                    .if_not_exists()
                    .col(integer(UsersRoles::UserId))
                    .col(integer(UsersRoles::RoleId))
                    .primary_key(
                        Index::create()
                            .name("pk_users_roles")
                            .col(UsersRoles::UserId)
                            .col(UsersRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_user")
                            .from(UsersRoles::Table, UsersRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_role")
                            .from(UsersRoles::Table, UsersRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create user_bought table (purchases)
        manager
            .create_table(
                Table::create()
                    .table(UserBought::Table)
                    .if_not_exists()
                    .col(pk_auto(UserBought::Id))
                    .col(integer(UserBought::UserId))
                    .col(integer(UserBought::GameId))
                    .col(decimal(UserBought::PricePaid).decimal_len(16, 4))
                    .col(date(UserBought::BoughtAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_bought_user")
                            .from(UserBought::Table, UserBought::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_bought_game")
                            .from(UserBought::Table, UserBought::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A user can own a game at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_user_bought_user_game")
                    .table(UserBought::Table)
                    .col(UserBought::UserId)
                    .col(UserBought::GameId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(UserBought::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UsersRoles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GamesGenres::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Genres::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Publishers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Developers::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Developers {
    Table,
    Id,
    Name,
    Country,
}

#[derive(DeriveIden)]
enum Publishers {
    Table,
    Id,
    Name,
    Country,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    Name,
    Description,
    Price,
    ReleaseDate,
    DeveloperId,
    PublisherId,
}

#[derive(DeriveIden)]
enum GamesGenres {
    Table,
    GameId,
    GenreId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum UsersRoles {
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
#[sea_orm(table_name = "user_bought")]
enum UserBought {
    Table,
    Id,
    UserId,
    GameId,
    PricePaid,
    BoughtAt,
}
