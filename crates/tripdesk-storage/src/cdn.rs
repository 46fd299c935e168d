use crate::signature::sign_params;
use crate::traits::{DestroyOutcome, RemoteAssetStore, StorageError, StorageResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tripdesk_core::{CdnCredentials, ResourceKind, SignatureAlgorithm};

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: Option<String>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// CDN admin API client
///
/// Issues signed `POST {base}/{cloud_name}/{resource_kind}/destroy` requests.
#[derive(Clone)]
pub struct CdnStorage {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Option<CdnCredentials>,
    signature_algorithm: SignatureAlgorithm,
}

impl Debug for CdnStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CdnStorage")
            .field("base_url", &self.base_url)
            .field("configured", &self.credentials.is_some())
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

impl CdnStorage {
    /// Create a client. `credentials` may be `None`; every destroy then fails
    /// with `StorageError::NotConfigured` without touching the network.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<CdnCredentials>,
        signature_algorithm: SignatureAlgorithm,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            signature_algorithm,
        })
    }

    fn destroy_url(&self, cloud_name: &str, kind: ResourceKind) -> String {
        format!("{}/{}/{}/destroy", self.base_url, cloud_name, kind)
    }

    fn unix_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[async_trait]
impl RemoteAssetStore for CdnStorage {
    #[tracing::instrument(skip(self), fields(cdn.operation = "destroy"))]
    async fn destroy(&self, kind: ResourceKind, key: &str) -> StorageResult<DestroyOutcome> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            StorageError::NotConfigured(
                "CDN_CLOUD_NAME, CDN_API_KEY and CDN_API_SECRET must all be set".to_string(),
            )
        })?;

        if key.trim().is_empty() {
            return Err(StorageError::InvalidKey("empty remote key".to_string()));
        }

        let mut params: Vec<(&str, String)> = vec![
            ("invalidate", "true".to_string()),
            ("public_id", key.to_string()),
            ("timestamp", Self::unix_timestamp().to_string()),
        ];
        let signature = sign_params(&params, &credentials.api_secret, self.signature_algorithm);
        params.push(("api_key", credentials.api_key.clone()));
        params.push(("signature", signature));

        let response = self
            .http_client
            .post(self.destroy_url(&credentials.cloud_name, kind))
            .form(&params)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;
        let parsed: Option<DestroyResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|p| p.error)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parsed.ok_or_else(|| {
            StorageError::InvalidResponse(format!("destroy response is not JSON: {}", body))
        })?;
        if let Some(error) = parsed.error {
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message: error.message,
            });
        }
        let result = parsed.result.ok_or_else(|| {
            StorageError::InvalidResponse("destroy response has no result".to_string())
        })?;

        let outcome = DestroyOutcome::from_result(&result)?;
        tracing::debug!(kind = %kind, key = %key, ?outcome, "CDN destroy answered");
        Ok(outcome)
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn credentials() -> CdnCredentials {
        CdnCredentials {
            cloud_name: "demo".to_string(),
            api_key: "123456".to_string(),
            api_secret: "shhh".to_string(),
        }
    }

    fn store(base_url: &str, credentials: Option<CdnCredentials>) -> CdnStorage {
        CdnStorage::new(
            base_url,
            credentials,
            SignatureAlgorithm::Sha1,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_destroy_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/demo/image/destroy")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("public_id".into(), "folder/pic".into()),
                Matcher::UrlEncoded("api_key".into(), "123456".into()),
                Matcher::Regex("signature=[0-9a-f]{40}(&|$)".into()),
                Matcher::Regex("timestamp=[0-9]+".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result":"ok"}"#)
            .create_async()
            .await;

        let outcome = store(&server.url(), Some(credentials()))
            .destroy(ResourceKind::Image, "folder/pic")
            .await
            .unwrap();

        assert_eq!(outcome, DestroyOutcome::Deleted);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_destroy_signs_with_sha256_when_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/demo/image/destroy")
            .match_body(Matcher::Regex("signature=[0-9a-f]{64}(&|$)".into()))
            .with_status(200)
            .with_body(r#"{"result":"ok"}"#)
            .create_async()
            .await;

        let cdn = CdnStorage::new(
            server.url(),
            Some(credentials()),
            SignatureAlgorithm::Sha256,
            Duration::from_secs(5),
        )
        .unwrap();
        let outcome = cdn.destroy(ResourceKind::Image, "folder/pic").await.unwrap();

        assert_eq!(outcome, DestroyOutcome::Deleted);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_destroy_not_found_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/demo/raw/destroy")
            .with_status(200)
            .with_body(r#"{"result":"not found"}"#)
            .create_async()
            .await;

        let outcome = store(&server.url(), Some(credentials()))
            .destroy(ResourceKind::Raw, "docs/itinerary")
            .await
            .unwrap();

        assert_eq!(outcome, DestroyOutcome::NotFound);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_destroy_explicit_error_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/demo/video/destroy")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid Signature"}}"#)
            .create_async()
            .await;

        let err = store(&server.url(), Some(credentials()))
            .destroy(ResourceKind::Video, "clips/intro")
            .await
            .unwrap_err();

        match err {
            StorageError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_destroy_unexpected_result_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/demo/image/destroy")
            .with_status(200)
            .with_body(r#"{"result":"error"}"#)
            .create_async()
            .await;

        let err = store(&server.url(), Some(credentials()))
            .destroy(ResourceKind::Image, "folder/pic")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_store_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let cdn = store(&server.url(), None);
        assert!(!cdn.is_configured());
        let err = cdn
            .destroy(ResourceKind::Image, "folder/pic")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::NotConfigured(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Nothing listens on port 9 (discard) in the test environment.
        let err = store("http://127.0.0.1:9", Some(credentials()))
            .destroy(ResourceKind::Image, "folder/pic")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Transport(_)));
    }
}
