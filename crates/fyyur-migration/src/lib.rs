pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_venues;
mod m20240101_000002_create_artists;
mod m20240101_000003_create_shows;
mod m20240101_000101_create_categories;
mod m20240101_000102_create_questions;
mod m20240101_000103_seed_categories;

/// Schema of the venue/artist/show booking site.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_venues::Migration),
            Box::new(m20240101_000002_create_artists::Migration),
            Box::new(m20240101_000003_create_shows::Migration),
        ]
    }
}

/// Schema of the trivia API. Keeps its own migration table so it can share
/// a database with [`Migrator`].
pub struct TriviaMigrator;

pub const TRIVIA_MIGRATIONS_TABLE: &str = "trivia_migrations";

#[async_trait::async_trait]
impl MigratorTrait for TriviaMigrator {
    fn migration_table_name() -> DynIden {
        Alias::new(TRIVIA_MIGRATIONS_TABLE).into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000101_create_categories::Migration),
            Box::new(m20240101_000102_create_questions::Migration),
            Box::new(m20240101_000103_seed_categories::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_migrators_use_separate_tables() {
        assert_eq!(Migrator::migration_table_name().to_string(), "seaql_migrations");
        assert_eq!(
            TriviaMigrator::migration_table_name().to_string(),
            TRIVIA_MIGRATIONS_TABLE
        );
    }

    #[test]
    fn test_migration_names_do_not_collide() {
        let booking: HashSet<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let trivia: HashSet<String> = TriviaMigrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(booking.len(), 3);
        assert_eq!(trivia.len(), 3);
        assert!(booking.is_disjoint(&trivia));
    }
}
