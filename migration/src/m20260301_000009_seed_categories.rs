use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Convert a UUID string (with dashes) to an `SQLite` hex-blob literal.
///
/// `SeaORM` stores UUID columns as 16-byte BLOBs in `SQLite`, so raw SQL
/// inserts must use `X'...'` notation to match the format.
fn uuid_blob(uuid_str: &str) -> String {
    let hex: String = uuid_str.chars().filter(|c| *c != '-').collect();
    format!("X'{hex}'")
}

struct Category {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
}

#[rustfmt::skip]
const CATEGORIES: &[Category] = &[
    Category { id: "0a000000-0000-4000-8000-000000000001", name: "Action",     description: "Fast reflexes and combat",          icon: "bolt" },
    Category { id: "0a000000-0000-4000-8000-000000000002", name: "RPG",        description: "Character progression and story",   icon: "shield" },
    Category { id: "0a000000-0000-4000-8000-000000000003", name: "Adventure",  description: "Exploration and narrative",         icon: "compass" },
    Category { id: "0a000000-0000-4000-8000-000000000004", name: "Strategy",   description: "Planning and resource management",  icon: "chess" },
    Category { id: "0a000000-0000-4000-8000-000000000005", name: "Puzzle",     description: "Logic and problem solving",         icon: "puzzle" },
    Category { id: "0a000000-0000-4000-8000-000000000006", name: "Simulation", description: "Real-world systems and sandboxes",  icon: "gear" },
    Category { id: "0a000000-0000-4000-8000-000000000007", name: "Sports",     description: "Athletic competition",              icon: "ball" },
    Category { id: "0a000000-0000-4000-8000-000000000008", name: "Racing",     description: "Speed and vehicles",                icon: "flag" },
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for category in CATEGORIES {
            let sql = if backend == sea_orm::DatabaseBackend::Postgres {
                format!(
                    "INSERT INTO category (id, name, description, icon) \
                     VALUES ('{id}', '{name}', '{description}', '{icon}') \
                     ON CONFLICT (name) DO NOTHING",
                    id = category.id,
                    name = category.name,
                    description = category.description,
                    icon = category.icon,
                )
            } else {
                format!(
                    "INSERT OR IGNORE INTO category (id, name, description, icon) \
                     VALUES ({id_blob}, '{name}', '{description}', '{icon}')",
                    id_blob = uuid_blob(category.id),
                    name = category.name,
                    description = category.description,
                    icon = category.icon,
                )
            };
            db.execute(sea_orm::Statement::from_string(backend, sql))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(CategoryIden::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CategoryIden {
    #[sea_orm(iden = "category")]
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_blob_strips_dashes() {
        assert_eq!(
            uuid_blob("0a000000-0000-4000-8000-000000000001"),
            "X'0a000000000040008000000000000001'"
        );
    }

    #[test]
    fn category_names_are_unique() {
        let mut names: Vec<&str> = CATEGORIES.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATEGORIES.len());
    }
}
