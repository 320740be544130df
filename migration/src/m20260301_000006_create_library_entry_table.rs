use sea_orm_migration::prelude::*;

/// Creates the `library_entry` table: one row per game a user owns.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum LibraryEntry {
    Table,
    Id,
    UserId,
    GameId,
    DateAdded,
    HoursPlayed,
    IsFavorite,
    LastPlayed,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LibraryEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LibraryEntry::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LibraryEntry::UserId).uuid().not_null())
                    .col(ColumnDef::new(LibraryEntry::GameId).uuid().not_null())
                    .col(
                        ColumnDef::new(LibraryEntry::DateAdded)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryEntry::HoursPlayed)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(LibraryEntry::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LibraryEntry::LastPlayed)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_library_entry_user_id")
                            .from(LibraryEntry::Table, LibraryEntry::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_library_entry_game_id")
                            .from(LibraryEntry::Table, LibraryEntry::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_library_entry_user_game")
                    .table(LibraryEntry::Table)
                    .col(LibraryEntry::UserId)
                    .col(LibraryEntry::GameId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_library_entry_user_date_added")
                    .table(LibraryEntry::Table)
                    .col(LibraryEntry::UserId)
                    .col(LibraryEntry::DateAdded)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LibraryEntry::Table).to_owned())
            .await
    }
}
