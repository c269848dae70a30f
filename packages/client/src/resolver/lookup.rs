//! Secondary lookup for list links.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::LookupError;

/// Looks up the files contained in a provider list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListLookup: Send + Sync {
    /// Id of the first file in the list
    async fn first_file_id(&self, list_id: &str) -> Result<String, LookupError>;
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    files: Vec<ListFile>,
}

#[derive(Debug, Deserialize)]
struct ListFile {
    id: String,
}

/// `GET <api_base>/api/list/<id>` over HTTP
pub struct HttpListLookup {
    http: reqwest::Client,
    api_base: String,
}

impl HttpListLookup {
    /// `api_base` is the provider origin, e.g. `https://pixeldrain.com`
    pub fn new(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { http, api_base }
    }
}

#[async_trait]
impl ListLookup for HttpListLookup {
    async fn first_file_id(&self, list_id: &str) -> Result<String, LookupError> {
        let url = format!("{}/api/list/{}", self.api_base, list_id);
        tracing::debug!("Looking up list '{}' at {}", list_id, url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let list: ListResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;

        list.files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or(LookupError::EmptyList)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_first_file_id_takes_first_entry() {
        // テスト項目: リストの先頭のファイル ID が返る
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/list/L1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "L1",
                "files": [{"id": "a", "name": "first.mp4"}, {"id": "b", "name": "second.mp4"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let lookup = HttpListLookup::new(reqwest::Client::new(), format!("{}/", server.uri()));

        // when (操作):
        let result = lookup.first_file_id("L1").await;

        // then (期待する結果):
        assert_eq!(result, Ok("a".to_string()));
    }

    #[tokio::test]
    async fn test_first_file_id_failures() {
        // テスト項目: HTTP エラー、不正なボディ、空のリストはそれぞれのエラーになる
        // given (前提条件):
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/list/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/list/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/list/empty"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": []})),
            )
            .mount(&server)
            .await;
        let lookup = HttpListLookup::new(reqwest::Client::new(), server.uri());

        // when (操作):
        let broken = lookup.first_file_id("broken").await;
        let garbage = lookup.first_file_id("garbage").await;
        let empty = lookup.first_file_id("empty").await;

        // then (期待する結果):
        assert_eq!(broken, Err(LookupError::Status(500)));
        assert!(matches!(garbage, Err(LookupError::Decode(_))));
        assert_eq!(empty, Err(LookupError::EmptyList));
    }
}
