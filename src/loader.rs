use reqwest::Client;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::models::{GridSnapshot, RowRecord};

/// Fetches grid rows from the JSON data endpoint.
///
/// The fan-out mirrors the front-end's parallel fetch of the same endpoint.
/// The observed front-end fires ten identical requests at a non-paginated
/// endpoint, which just multiplies the same payload; that is not replicated
/// as a default here, so `fan_out` is normally 1.
pub struct DataLoader {
    client: Client,
    endpoint: String,
    fan_out: usize,
}

impl DataLoader {
    pub fn new(endpoint: impl Into<String>, fan_out: usize) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            fan_out: fan_out.max(1),
        }
    }

    /// Issues the parallel fetches and concatenates the responses into one
    /// flat row sequence, preserving fetch-initiation order.
    pub async fn load(&self) -> Result<GridSnapshot, LoadError> {
        if self.fan_out > 1 {
            warn!(
                fan_out = self.fan_out,
                "issuing duplicate fetches against a non-paginated endpoint"
            );
        }

        let mut handles = Vec::with_capacity(self.fan_out);
        for _ in 0..self.fan_out {
            let client = self.client.clone();
            let url = self.endpoint.clone();
            handles.push(tokio::spawn(async move {
                client
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Vec<RowRecord>>()
                    .await
            }));
        }

        // Awaiting the handles in spawn order keeps response batches in
        // fetch-initiation order regardless of completion order.
        let mut rows = Vec::new();
        for handle in handles {
            rows.extend(handle.await??);
        }

        info!(rows = rows.len(), endpoint = %self.endpoint, "grid data loaded");
        Ok(GridSnapshot::new(rows))
    }
}
