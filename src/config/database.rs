use std::time::Duration;

use crate::domain::{
    feedback::entity::{feedback, feedback_comment, feedback_vote},
    scenario::entity::{game_system, scenario, scenario_tag, tag},
    session::entity::{game_session, session_participant},
    user::entity::user,
};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityName, Schema,
    Statement,
};
use tracing::info;

pub async fn establish_connection(
    database_url: &str,
    schema_update: bool,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // 인메모리 SQLite는 커넥션마다 DB가 따로 생기므로 하나만 유지
    if database_url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Successfully connected to the database.");

    if schema_update {
        // Auto-create tables (Schema Sync)
        create_tables(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    // Order matters for foreign keys! (Parent first, then Child)

    // 1. Independent Entities
    create_table_if_not_exists(db, &schema, user::Entity).await?;
    create_table_if_not_exists(db, &schema, game_system::Entity).await?;
    create_table_if_not_exists(db, &schema, tag::Entity).await?;

    // 2. Feedback
    create_table_if_not_exists(db, &schema, feedback::Entity).await?;
    create_table_if_not_exists(db, &schema, feedback_vote::Entity).await?;
    create_table_if_not_exists(db, &schema, feedback_comment::Entity).await?;
    create_index_if_not_exists(db, "idx_feedback_status", "feedback", &["status"], false).await?;

    // 3. Scenario
    create_table_if_not_exists(db, &schema, scenario::Entity).await?;
    create_table_if_not_exists(db, &schema, scenario_tag::Entity).await?;
    create_index_if_not_exists(
        db,
        "uq_scenario_distribute_url",
        "scenario",
        &["distribute_url"],
        true,
    )
    .await?;
    // 태그 AND 필터는 tag_id로 연결 행을 찾음
    create_index_if_not_exists(db, "idx_scenario_tag_tag", "scenario_tag", &["tag_id"], false)
        .await?;

    // 4. Session
    create_table_if_not_exists(db, &schema, game_session::Entity).await?;
    create_table_if_not_exists(db, &schema, session_participant::Entity).await?;
    create_index_if_not_exists(
        db,
        "idx_session_participant_user",
        "session_participant",
        &["user_id"],
        false,
    )
    .await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
    unique: bool,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let sql = format!(
        "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
        if unique { "UNIQUE " } else { "" },
        index_name,
        table_name,
        columns.join(", ")
    );

    db.execute(Statement::from_string(backend, sql))
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::error!("Failed to create index {}: {}", index_name, e);
            e
        })
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let table_name = entity.table_name().to_string();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    db.execute(create_stmt).await.map(|_| ()).map_err(|e| {
        tracing::error!("Failed to create table {}: {}", table_name, e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_sync_should_be_idempotent() {
        // Arrange
        let db = establish_connection("sqlite::memory:", true).await.unwrap();

        // Act
        let result = create_tables(&db).await;

        // Assert
        assert!(result.is_ok());
    }
}
