use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r#"INSERT INTO categories (id, type) VALUES
                 (1, 'Science'),
                 (2, 'Art'),
                 (3, 'Geography'),
                 (4, 'History'),
                 (5, 'Entertainment'),
                 (6, 'Sports')
               ON CONFLICT (id) DO NOTHING"#,
        )
        .await?;
        // Keep the serial ahead of the explicit ids
        db.execute_unprepared(
            "SELECT setval(pg_get_serial_sequence('categories', 'id'), (SELECT MAX(id) FROM categories))",
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DELETE FROM categories WHERE id BETWEEN 1 AND 6")
            .await?;
        Ok(())
    }
}
