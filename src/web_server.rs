use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::entry::DictionaryEntry;
use crate::error::Error;
use crate::fetcher::Fetcher;
use crate::parser::DictParser;

/// 查询请求参数
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// 查询的字或词
    pub word: Option<String>,
}

/// 查询成功的响应
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub word: String,
    pub results: DictionaryEntry,
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 查询失败的原因
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    /// 缺少 word 参数
    MissingQuery,
    /// 抓取失败或页面中没有释义
    NotFound(String),
    /// 解析任务异常退出
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::MissingQuery => (StatusCode::BAD_REQUEST, "缺少查询参数 word".to_string()),
            ApiError::NotFound(word) => (StatusCode::NOT_FOUND, format!("未找到\"{word}\"的相关解释")),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// 应用状态 - 解析器只读共享，每个请求各自抓取和解析页面
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<DictParser>,
    pub fetcher: Arc<dyn Fetcher>,
}

impl AppState {
    pub fn new(parser: DictParser, fetcher: impl Fetcher + 'static) -> Self {
        AppState {
            parser: Arc::new(parser),
            fetcher: Arc::new(fetcher),
        }
    }

    /// 抓取并解析一个查询词
    ///
    /// 抓取失败按未找到处理，不向上抛出
    pub async fn lookup(&self, word: &str) -> Result<DictionaryEntry, ApiError> {
        let html = match self.fetcher.fetch(word).await {
            Ok(html) => html,
            Err(err) => {
                warn!(%word, error = %err, "fetch failed");
                return Err(ApiError::NotFound(word.to_string()));
            }
        };

        // 在阻塞线程中解析，文档树不跨越 await
        let parser = Arc::clone(&self.parser);
        let query = word.to_string();
        let entry = tokio::task::spawn_blocking(move || parser.extract(&html, &query))
            .await
            .map_err(|err| {
                error!(%word, error = %err, "extraction task failed");
                ApiError::Internal(format!("解析任务失败: {err}"))
            })?;

        entry.ok_or_else(|| ApiError::NotFound(word.to_string()))
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/query", get(query_handler))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(state)
}

/// 启动Web服务器
pub async fn start_server(state: AppState, addr: &str) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })?;

    info!(%addr, "server listening");
    println!("✅ 服务器已启动！");
    println!("🔍 查询接口: http://{addr}/query?word=人工智能");

    axum::serve(listener, router(state)).await.map_err(Error::Serve)
}

/// 前端直接跨域调用
async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// 根路径处理器 - 使用说明
async fn root_handler() -> Html<&'static str> {
    Html(
        r#"<h1>汉语字典API服务</h1>
<p>使用说明：访问 /query?word=词语 查询词语释义</p>
<p>示例：<a href="/query?word=客">/query?word=客</a></p>
<p>示例：<a href="/query?word=人工智能">/query?word=人工智能</a></p>
"#,
    )
}

/// 查询处理器
async fn query_handler(
    Query(params): Query<SearchQuery>,
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>, ApiError> {
    // 响应中原样返回查询词，只在抓取和解析时去掉首尾空白
    let word = params
        .word
        .filter(|word| !word.trim().is_empty())
        .ok_or(ApiError::MissingQuery)?;

    info!(%word, "query");
    let results = state.lookup(word.trim()).await?;

    Ok(Json(SearchResponse { word, results }))
}
