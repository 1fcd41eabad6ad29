/// PostgreSQL persistence for decoded readings.
use async_trait::async_trait;
use tokio_postgres::types::Json;

use crate::database::connection::execute_with_retry;
use crate::handler::ReadingStore;
use crate::models::ReadingRecord;

pub struct PostgresStore {
    database_url: String,
}

impl PostgresStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        PostgresStore {
            database_url: database_url.into(),
        }
    }
}

#[async_trait]
impl ReadingStore for PostgresStore {
    /// Insert one reading into the sensor_readings table.
    ///
    /// The normalized reading goes into a JSONB column so layout generations
    /// with different probe sets land in one table without schema churn.
    async fn store_reading(&self, record: &ReadingRecord) -> Result<(), String> {
        let record = record.clone();
        let reading = serde_json::to_value(&record.reading)
            .map_err(|e| format!("Failed to serialize reading: {}", e))?;

        execute_with_retry(&self.database_url, move |client| {
            let record = record.clone();
            let reading = reading.clone();
            async move {
                client
                    .execute(
                        "INSERT INTO sensor_readings(device_id, application_id, recorded_at, reading)
                         VALUES ($1, $2, $3, $4)",
                        &[
                            &record.device_id,
                            &record.application_id,
                            &record.recorded_at,
                            &Json(reading),
                        ],
                    )
                    .await
            }
        })
        .await
    }
}
