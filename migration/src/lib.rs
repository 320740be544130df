pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_developer_table;
mod m20260301_000003_create_category_table;
mod m20260301_000004_create_game_table;
mod m20260301_000005_create_game_category_table;
mod m20260301_000006_create_library_entry_table;
mod m20260301_000007_create_review_table;
mod m20260301_000008_create_notification_table;
mod m20260301_000009_seed_categories;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_developer_table::Migration),
            Box::new(m20260301_000003_create_category_table::Migration),
            Box::new(m20260301_000004_create_game_table::Migration),
            Box::new(m20260301_000005_create_game_category_table::Migration),
            Box::new(m20260301_000006_create_library_entry_table::Migration),
            Box::new(m20260301_000007_create_review_table::Migration),
            Box::new(m20260301_000008_create_notification_table::Migration),
            Box::new(m20260301_000009_seed_categories::Migration),
        ]
    }
}
