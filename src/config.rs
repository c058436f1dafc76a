use std::env;
use std::time::Duration;

/// 默认的汉典查询地址，查询词作为最后一段路径追加
pub const DEFAULT_BASE_URL: &str = "https://www.zdic.net/hans/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// 服务配置，从环境变量读取（可以放在 .env 文件中）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 监听地址
    pub host: String,
    pub port: u16,
    /// 汉典页面地址
    pub base_url: String,
    pub user_agent: String,
    /// 抓取页面的超时时间
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 用给定的查找函数读取配置，未设置的项使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match lookup("ZDICT_PORT") {
            Some(value) => parse_value("ZDICT_PORT", value)?,
            None => defaults.port,
        };
        let timeout = match lookup("ZDICT_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_value("ZDICT_TIMEOUT_SECS", value)?),
            None => defaults.timeout,
        };

        Ok(Config {
            host: lookup("ZDICT_HOST").unwrap_or(defaults.host),
            port,
            base_url: lookup("ZDICT_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: lookup("ZDICT_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ZDICT_HOST", "127.0.0.1"),
            ("ZDICT_PORT", "8080"),
            ("ZDICT_TIMEOUT_SECS", " 3 "),
            ("ZDICT_BASE_URL", "http://localhost:9000/hans/"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.base_url, "http://localhost:9000/hans/");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[("ZDICT_PORT", "http")])).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { key: "ZDICT_PORT", .. }));
        assert_eq!(err.to_string(), r#"invalid value for ZDICT_PORT: "http""#);
    }
}
