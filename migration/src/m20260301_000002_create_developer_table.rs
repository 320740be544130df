use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Developer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Developer::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Developer::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Developer::Country)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Developer::Website).string_len(500).null())
                    .col(
                        ColumnDef::new(Developer::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Developer::LogoUrl).string_len(500).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_developer_name")
                    .table(Developer::Table)
                    .col(Developer::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Developer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Developer {
    Table,
    Id,
    Name,
    Country,
    Website,
    Description,
    LogoUrl,
}
