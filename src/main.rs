mod config;
mod entry;
mod error;
mod fetcher;
mod logging;
mod multi_char;
mod node;
mod parser;
mod single_char;
mod web_server;

use config::Config;
use entry::DictionaryEntry;
use error::Error;
use fetcher::{build_client, ZdicFetcher};
use parser::DictParser;
use std::env;
use std::process::ExitCode;
use web_server::{start_server, AppState};

/// 自检用的查询词：一个多音字，一个词语。单字结果少于两个读音视为失败
const SELF_CHECK_WORDS: [&str; 2] = ["和", "人工智能"];

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init();

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("server");

    match mode {
        "server" => {
            start_web_server()?;
            Ok(ExitCode::SUCCESS)
        }
        "query" => match args.get(2) {
            Some(word) => Ok(query_word(word)?),
            None => {
                print_usage();
                Ok(ExitCode::FAILURE)
            }
        },
        "self-check" => Ok(self_check()?),
        _ => {
            print_usage();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_usage() {
    println!("汉语字典 - 汉典页面释义提取工具");
    println!("使用方法:");
    println!("  server        - 启动Web API服务器（默认）");
    println!("  query <词语>  - 查询一个字或词，输出JSON");
    println!("  self-check    - 查询 {} 检查页面结构是否仍可解析", SELF_CHECK_WORDS.join("、"));
}

/// 按环境变量配置创建应用状态
fn app_state(config: &Config) -> Result<AppState, Error> {
    let client = build_client(config).map_err(Error::HttpClient)?;
    let fetcher = ZdicFetcher::with_client(client, &config.base_url)?;

    Ok(AppState::new(DictParser::new(), fetcher))
}

/// 启动Web服务器
fn start_web_server() -> Result<(), Error> {
    println!("🌐 启动汉语字典Web服务器...");

    let config = Config::from_env()?;
    let state = app_state(&config)?;

    let rt = tokio::runtime::Runtime::new().map_err(Error::Runtime)?;
    rt.block_on(start_server(state, &config.bind_addr()))
}

/// 查询一个词并打印结果
fn query_word(word: &str) -> Result<ExitCode, Error> {
    let word = word.trim();
    let config = Config::from_env()?;
    let state = app_state(&config)?;

    let rt = tokio::runtime::Runtime::new().map_err(Error::Runtime)?;
    match rt.block_on(state.lookup(word)) {
        Ok(results) => {
            let json = serde_json::json!({ "word": word, "results": results });
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => {
            println!("❌ 未找到\"{}\"的相关解释", word);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// 显式触发的自检：确认站点的页面结构仍能被解析
fn self_check() -> Result<ExitCode, Error> {
    println!("🧪 页面结构自检...");

    let config = Config::from_env()?;
    let state = app_state(&config)?;
    let rt = tokio::runtime::Runtime::new().map_err(Error::Runtime)?;

    let mut healthy = true;
    for word in SELF_CHECK_WORDS {
        match rt.block_on(state.lookup(word)) {
            Ok(DictionaryEntry::Single(entry)) => {
                let readings = entry.basic.keys().collect::<Vec<_>>();
                println!(
                    "✅ {}: {} 个读音 ({}), {} 条释义",
                    word,
                    entry.basic.len(),
                    readings.join(", "),
                    entry.basic.sense_count()
                );
                if entry.basic.len() < 2 {
                    println!("⚠️  {} 是多音字，只解析出 {} 个读音", word, entry.basic.len());
                    healthy = false;
                }
            }
            Ok(DictionaryEntry::Multi(entry)) => {
                println!(
                    "✅ {}: 拼音 \"{}\", {} 条释义",
                    word,
                    entry.pinyin,
                    entry.basic.len()
                );
            }
            Err(err) => {
                println!("❌ {}: {:?}", word, err);
                healthy = false;
            }
        }
    }

    if healthy {
        println!("🎉 自检通过");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
