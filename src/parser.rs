use scraper::Html;
use tracing::debug;

use crate::entry::DictionaryEntry;
use crate::multi_char::MultiCharStrategy;
use crate::node::Classifier;
use crate::single_char::SingleCharStrategy;

/// HTML解析器 - 把汉典页面转换为词典词条
///
/// 选择器和正则只在创建时编译一次，之后只读，可以在多个请求之间共享。
/// 每次提取都解析自己的文档树，提取结束后即丢弃。
pub struct DictParser {
    classifier: Classifier,
    single: SingleCharStrategy,
    multi: MultiCharStrategy,
}

impl DictParser {
    /// 创建新的解析器
    pub fn new() -> Self {
        Self {
            classifier: Classifier::new(),
            single: SingleCharStrategy::new(),
            multi: MultiCharStrategy::new(),
        }
    }

    /// 按查询词的字数选择提取策略：单字按读音分组，词语取平铺的释义
    ///
    /// 找不到释义块、或释义块中没有任何释义时返回 None
    pub fn extract(&self, html: &str, word: &str) -> Option<DictionaryEntry> {
        let word = word.trim();
        let arity = word.chars().count();
        let mut document = Html::parse_document(html);

        let entry = match arity {
            0 => None,
            1 => self
                .single
                .extract(&document, &self.classifier)
                .map(DictionaryEntry::Single),
            _ => self
                .multi
                .extract(&mut document, &self.classifier)
                .map(DictionaryEntry::Multi),
        };

        debug!(
            %word,
            arity,
            found = entry.is_some(),
            senses = entry.as_ref().map_or(0, DictionaryEntry::sense_count),
            "extraction finished"
        );

        entry
    }
}

impl Default for DictParser {
    fn default() -> Self {
        Self::new()
    }
}
