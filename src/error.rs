//! Error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetcher::FetchError;

/// 应用启动和运行期间的错误
#[derive(Error, Debug)]
pub enum Error {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    #[error("抓取器配置错误: {0}")]
    Fetcher(#[from] FetchError),
    #[error("无法创建HTTP客户端")]
    HttpClient(#[source] reqwest::Error),
    #[error("无法监听地址 {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("无法创建异步运行时")]
    Runtime(#[source] std::io::Error),
    #[error("服务器运行失败")]
    Serve(#[source] std::io::Error),
    #[error("无法序列化结果")]
    Serialize(#[from] serde_json::Error),
}
