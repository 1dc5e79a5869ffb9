use super::*;
use std::sync::Arc;
use tokio_postgres::Client;

/// Table of journaled records.
#[rustfmt::skip]
pub const GAME_LOGS: &str = "game_logs";

/// Connects to PostgreSQL using `DB_URL` and ensures the journal table exists.
pub async fn db() -> anyhow::Result<Arc<Client>> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL")?;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    client
        .batch_execute(const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            GAME_LOGS,
            " (
                id        UUID PRIMARY KEY,
                room_id   UUID NOT NULL,
                seq       BIGINT NOT NULL,
                kind      TEXT NOT NULL,
                payload   TEXT NOT NULL,
                timestamp BIGINT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_game_logs_room ON ",
            GAME_LOGS,
            " (room_id, seq);"
        ))
        .await?;
    Ok(Arc::new(client))
}

#[async_trait::async_trait]
impl Journal for Arc<Client> {
    async fn append(&self, entries: &[(u64, Record)]) -> anyhow::Result<()> {
        for (seq, record) in entries {
            self.execute(
                const_format::concatcp!(
                    "INSERT INTO ",
                    GAME_LOGS,
                    " (id, room_id, seq, kind, payload, timestamp) VALUES ($1, $2, $3, $4, $5, $6)"
                ),
                &[
                    &uuid::Uuid::now_v7(),
                    &record.room().inner(),
                    &(*seq as i64),
                    &record.kind().to_string(),
                    &serde_json::to_string(record.event())?,
                    &(record.timestamp() as i64),
                ],
            )
            .await?;
        }
        Ok(())
    }
}
