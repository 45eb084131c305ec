//! S3-compatible provider (AWS S3, MinIO, GCS interoperability API)

use super::{FileOption, Provider};
use crate::config::StorageConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream, Client};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct S3Provider {
    client: Client,
}

impl S3Provider {
    pub async fn new(config: &StorageConfig) -> Self {
        debug!(endpoint = ?config.endpoint, region = %config.region, "Initializing S3 client");

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let Some((access_key, secret_key)) = config.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "labelsync-static",
            ));
        }

        let shared = loader.load().await;
        let mut s3_config = aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            s3_config = s3_config.endpoint_url(endpoint);
        }

        Self::from_client(Client::from_conf(s3_config.build()))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for S3Provider {
    #[instrument(skip(self))]
    async fn check_bucket(&self, bucket_name: &str) -> Result<()> {
        match self.client.head_bucket().bucket(bucket_name).send().await {
            Ok(_) => {
                info!("Bucket s3://{} is reachable", bucket_name);
                Ok(())
            },
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => {
                Err(anyhow!("bucket does not exist: [{}]", bucket_name))
            },
            Err(e) => Err(anyhow!(
                "failed to check bucket [{}]: {}",
                bucket_name,
                DisplayErrorContext(&e)
            )),
        }
    }

    #[instrument(skip(self))]
    async fn is_exists(&self, opt: &FileOption) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&opt.bucket_name)
            .key(&opt.dst_path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(anyhow!(
                "HeadObject s3://{}/{}: {}",
                opt.bucket_name,
                opt.dst_path,
                DisplayErrorContext(&e)
            )),
        }
    }

    #[instrument(skip(self))]
    async fn upload_from_local_file(&self, opt: &FileOption) -> Result<()> {
        let body = ByteStream::from_path(&opt.src_path)
            .await
            .with_context(|| format!("opening {}", opt.src_path))?;

        self.client
            .put_object()
            .bucket(&opt.bucket_name)
            .key(&opt.dst_path)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "PutObject s3://{}/{}: {}",
                    opt.bucket_name,
                    opt.dst_path,
                    DisplayErrorContext(&e)
                )
            })?;

        debug!("Uploaded {} to s3://{}/{}", opt.src_path, opt.bucket_name, opt.dst_path);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn provider_for(server: &MockServer) -> S3Provider {
        let config = StorageConfig {
            endpoint: Some(server.uri()),
            region: "us-east-1".to_string(),
            access_key: Some("test-access".to_string()),
            secret_key: Some("test-secret".to_string()),
            path_style: true,
        };
        S3Provider::new(&config).await
    }

    #[tokio::test]
    async fn test_is_exists_maps_404_to_false() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/bucket/labels/cats/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/bucket/labels/cats/present.jpg"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-length", "3"))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let missing = FileOption::object("bucket", "labels/cats/missing.jpg");
        let present = FileOption::object("bucket", "labels/cats/present.jpg");

        assert!(!provider.is_exists(&missing).await.unwrap());
        assert!(provider.is_exists(&present).await.unwrap());
    }

    #[tokio::test]
    async fn test_check_bucket_missing() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/nope"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider.check_bucket("nope").await.unwrap_err();
        assert!(err.to_string().contains("bucket does not exist"));
    }

    #[tokio::test]
    async fn test_upload_puts_file_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/bucket/labels/a.txt"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        std::fs::write(&src, b"hello").unwrap();

        let provider = provider_for(&server).await;
        let opt = FileOption::upload(src.to_string_lossy(), "bucket", "labels/a.txt");
        provider.upload_from_local_file(&opt).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests
            .iter()
            .any(|r| r.body.windows(5).any(|w| w == b"hello")));
    }

    #[tokio::test]
    async fn test_upload_missing_source_file() {
        let server = MockServer::start().await;
        let provider = provider_for(&server).await;
        let opt = FileOption::upload("/definitely/not/here.jpg", "bucket", "k");
        assert!(provider.upload_from_local_file(&opt).await.is_err());
    }
}
