use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化日志。级别由 RUST_LOG 控制，默认 zdict=info
pub fn init() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zdict=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if let Err(err) = result {
        eprintln!("日志初始化失败: {err}");
        return;
    }

    debug!("tracing initialized");
}
