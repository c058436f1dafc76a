use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::config::Config;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("base url cannot have path segments: {0}")]
    CannotBeABase(String),
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("unable to read page contents: {0}")]
    Body(#[source] reqwest::Error),
}

/// 根据查询词取回页面HTML
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, word: &str) -> Result<String, FetchError>;
}

/// 从汉典抓取页面
pub struct ZdicFetcher {
    client: Client,
    base_url: Url,
}

/// 按配置构建HTTP客户端
pub fn build_client(config: &Config) -> reqwest::Result<Client> {
    reqwest::ClientBuilder::new()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
}

impl ZdicFetcher {
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::CannotBeABase(base_url.to_string()));
        }

        Ok(ZdicFetcher { client, base_url })
    }

    /// 查询词作为一段路径追加到基础地址后面，必要时做百分号编码
    pub fn page_url(&self, word: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::CannotBeABase(self.base_url.to_string()))?
            .pop_if_empty()
            .push(word);

        Ok(url)
    }
}

#[async_trait]
impl Fetcher for ZdicFetcher {
    async fn fetch(&self, word: &str) -> Result<String, FetchError> {
        let url = self.page_url(word)?;
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        response.text().await.map_err(FetchError::Body)
    }
}
