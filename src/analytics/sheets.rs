use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::analytics::{AnalyticsError, AnalyticsRecord, AnalyticsSink};
use crate::config::SheetsConfig;

const HEADER_ROW: [&str; 7] = [
    "session_id",
    "timestamp",
    "question",
    "answer",
    "latency_seconds",
    "question_length",
    "answer_length",
];

/// Appends analytics rows to one named worksheet.
///
/// The worksheet contract is read-full / append-in-memory / write-full: the
/// whole value range is fetched, the new row concatenated, and the full
/// snapshot written back. Concurrent appends from other processes are
/// last-writer-wins; acceptable for an advisory analytics log.
pub struct SheetsSink {
    client: Client,
    config: SheetsConfig,
}

impl SheetsSink {
    pub fn new(config: SheetsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.config.api_base, self.config.spreadsheet_id, self.config.worksheet
        )
    }

    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, AnalyticsError> {
        let response = self
            .client
            .get(self.values_url())
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| AnalyticsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::Api(format!("Sheets Error {}: {}", status, text)));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AnalyticsError::Network(e.to_string()))?;

        let rows = json["values"]
            .as_array()
            .map(|rows| {
                rows.iter()
                    .map(|row| {
                        row.as_array()
                            .map(|cells| {
                                cells
                                    .iter()
                                    .map(|c| c.as_str().unwrap_or_default().to_string())
                                    .collect()
                            })
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(rows)
    }

    async fn write_all_rows(&self, rows: &[Vec<String>]) -> Result<(), AnalyticsError> {
        let body = json!({
            "range": self.config.worksheet,
            "majorDimension": "ROWS",
            "values": rows,
        });

        let response = self
            .client
            .put(format!("{}?valueInputOption=RAW", self.values_url()))
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyticsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::Api(format!("Sheets Error {}: {}", status, text)));
        }

        Ok(())
    }
}

#[async_trait]
impl AnalyticsSink for SheetsSink {
    async fn record(&self, record: &AnalyticsRecord) -> Result<(), AnalyticsError> {
        let mut rows = self.read_all_rows().await?;

        if rows.is_empty() {
            rows.push(HEADER_ROW.iter().map(|s| s.to_string()).collect());
        }

        rows.push(vec![
            record.session_id.to_string(),
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.question.clone(),
            record.answer.clone(),
            record.latency_seconds.to_string(),
            record.question_length.to_string(),
            record.answer_length.to_string(),
        ]);

        self.write_all_rows(&rows).await
    }
}
