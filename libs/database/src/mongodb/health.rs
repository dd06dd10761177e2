use mongodb::{Client, bson::doc};
use std::time::Instant;

use crate::common::DatabaseError;

/// Result of a timed ping.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: Option<String>,
    pub response_time_ms: u64,
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client.database("admin").run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

/// Ping the server; the error explains why it is unreachable.
pub async fn check_health(client: &Client) -> Result<(), DatabaseError> {
    ping(client)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))
}

/// Ping the server and report latency.
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err().map(|e| e.to_string()),
        response_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_check_health() {
        let client = Client::with_uri_str("mongodb://localhost:27017").await.unwrap();
        assert!(check_health(&client).await.is_ok());

        let status = check_health_detailed(&client).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
