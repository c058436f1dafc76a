use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// 一条释义
pub type Sense = String;

/// 词典查询结果 - 按查询词的字数区分两种结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DictionaryEntry {
    /// 单字
    Single(SingleCharacterEntry),
    /// 词语
    Multi(MultiCharacterEntry),
}

impl DictionaryEntry {
    /// 释义条数
    pub fn sense_count(&self) -> usize {
        match self {
            DictionaryEntry::Single(entry) => entry.basic.sense_count(),
            DictionaryEntry::Multi(entry) => entry.basic.len(),
        }
    }
}

/// 单字词条：按读音分组的基本解释 + 原始HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleCharacterEntry {
    pub basic: Readings,
    /// 基本解释块 + 详细解释块（如有）的原始HTML
    pub detailed: String,
}

/// 词语词条
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiCharacterEntry {
    /// 整词拼音，可能为空
    pub pinyin: String,
    pub basic: Vec<Sense>,
    /// 去掉相关词语后的解释块HTML
    pub detailed: String,
}

/// 读音 -> 释义列表，保留读音首次出现的顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readings {
    groups: Vec<(String, Vec<Sense>)>,
}

impl Readings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加释义。同一读音重复出现时累加，不覆盖
    pub fn extend(&mut self, key: &str, senses: Vec<Sense>) {
        if senses.is_empty() {
            return;
        }

        match self.groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => existing.extend(senses),
            None => self.groups.push((key.to_string(), senses)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Sense]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, senses)| senses.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn sense_count(&self) -> usize {
        self.groups.iter().map(|(_, senses)| senses.len()).sum()
    }
}

impl Serialize for Readings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (key, senses) in &self.groups {
            map.serialize_entry(key, senses)?;
        }
        map.end()
    }
}
