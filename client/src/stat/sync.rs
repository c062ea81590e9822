use crate::stat::datatype::{Category, IndexPoint, YearRow};
use crate::stat::period::Period;
use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Thin wrapper over the calculator API. A 404 means "no rows" and comes back
/// as an empty vector.
#[derive(Debug, Clone)]
pub struct Api {
    client: Client,
    base_url: String,
}

impl Api {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).query(query).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            tracing::debug!(%url, "no rows");
            return Ok(Vec::new());
        }
        let resp = resp
            .error_for_status()
            .map_err(|e| anyhow!("{path}: {e}"))?;
        Ok(resp.json().await?)
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.get_rows("/api/personaltitle", &[]).await
    }

    pub async fn group_index(&self, from: Period, to: Period) -> Result<Vec<IndexPoint>> {
        self.get_rows("/api/infogroups", &range_query(from, to)).await
    }

    pub async fn subgroup_index(&self, from: Period, to: Period) -> Result<Vec<IndexPoint>> {
        self.get_rows("/api/subgroupindex", &range_query(from, to))
            .await
    }

    pub async fn group_prices(&self, year: i32) -> Result<Option<YearRow>> {
        let rows: Vec<YearRow> = self
            .get_rows("/api/groupprices", &[("year", year.to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn subgroup_weights(&self, year: i32) -> Result<Option<YearRow>> {
        let rows: Vec<YearRow> = self
            .get_rows("/api/subgroupweights", &[("year", year.to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }
}

fn range_query(from: Period, to: Period) -> [(&'static str, String); 2] {
    [("from", from.to_string()), ("to", to.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_query_uses_slash_format() {
        let q = range_query(Period::new(2024, 1), Period::new(2025, 11));
        assert_eq!(q[0], ("from", "2024/01".to_string()));
        assert_eq!(q[1], ("to", "2025/11".to_string()));
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(Api::new("http://127.0.0.1:5000/").base_url(), "http://127.0.0.1:5000");
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let api = Api::new("http://127.0.0.1:1");
        assert!(api.categories().await.is_err());
    }
}
