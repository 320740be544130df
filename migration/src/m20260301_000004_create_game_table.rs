use sea_orm_migration::prelude::*;

/// Creates the `game` table. `rating` and `total_reviews` are derived from
/// the `review` table and rewritten on every review mutation.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[allow(clippy::enum_variant_names)]
#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    Title,
    Description,
    ReleaseDate,
    PriceCents,
    CoverImageUrl,
    SteamUrl,
    DeveloperId,
    Rating,
    TotalReviews,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Developer {
    Table,
    Id,
}

#[async_trait::async_trait]
#[allow(clippy::too_many_lines)]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Game::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Game::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Game::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Game::ReleaseDate).date().not_null())
                    .col(
                        ColumnDef::new(Game::PriceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Game::CoverImageUrl).string_len(500).null())
                    .col(ColumnDef::new(Game::SteamUrl).string_len(500).null())
                    .col(ColumnDef::new(Game::DeveloperId).uuid().null())
                    .col(
                        ColumnDef::new(Game::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Game::TotalReviews)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Game::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Game::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_developer_id")
                            .from(Game::Table, Game::DeveloperId)
                            .to(Developer::Table, Developer::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_release_date")
                    .table(Game::Table)
                    .col(Game::ReleaseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_title")
                    .table(Game::Table)
                    .col(Game::Title)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Game::Table).to_owned())
            .await
    }
}
