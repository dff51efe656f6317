use anyhow::Context;

use crate::report::{Record, ScoreUpdate, UpdateResponse};

pub const REPORT_PATH: &str = "/api/student-report";
pub const UPDATE_PATH: &str = "/api/update-scores";

/// HTTP side of the dashboard. No timeout and no retry: a stalled request
/// stalls the caller.
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReportClient {
    pub fn new(base_url: impl Into<String>) -> ReportClient {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ReportClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_report(&self) -> anyhow::Result<Record> {
        let url = format!("{}{}", self.base_url, REPORT_PATH);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned an error status"))?;
        resp.json::<Record>()
            .await
            .with_context(|| format!("GET {url} did not return a report"))
    }

    pub async fn update_scores(&self, update: &ScoreUpdate) -> anyhow::Result<UpdateResponse> {
        let url = format!("{}{}", self.base_url, UPDATE_PATH);
        let resp = self
            .http
            .put(&url)
            .json(update)
            .send()
            .await
            .with_context(|| format!("PUT {url} failed"))?
            .error_for_status()
            .with_context(|| format!("PUT {url} returned an error status"))?;
        resp.json::<UpdateResponse>()
            .await
            .with_context(|| format!("PUT {url} did not return an updated report"))
    }
}
