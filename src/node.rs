use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::entry::Sense;

/// 把松散的HTML元素归类为有限的几种节点，供两种提取策略做模式匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocNode {
    /// 读音标题段落（含 span.dicpy）。读音无法识别时 key 为 None
    Heading { key: Option<String> },
    /// 有序列表，每项的原始文本
    ListBlock { items: Vec<String> },
    /// 带编号标记（span.cino）的段落，已取出编号后的释义
    NumberedSense { text: Option<Sense> },
    /// 普通段落
    Prose { text: String },
    /// 含读音、粗体或次级标签的段落，不是释义
    Label,
    /// 列表项
    ListItem { text: String },
    Other,
}

/// 节点分类器 - 持有所有结构标记的选择器和正则
pub struct Classifier {
    pinyin_span: Selector,
    numbered_span: Selector,
    secondary_sense: Selector,
    label: Selector,
    list_item: Selector,
    /// 读音键：开头连续的拼音字母（含声调）
    reading: Regex,
    /// (1) 或 （1） 之后、可选冒号之后的释义
    numbered: Regex,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            pinyin_span: selector("span.dicpy"),
            numbered_span: selector("span.cino"),
            secondary_sense: selector("span.cin2"),
            label: selector("span.dicpy, strong, span.diczx1"),
            list_item: selector("li"),
            reading: Regex::new(r"^[a-zāáǎàēéěèīíǐìōóǒòūúǔùǖǘǚǜü]+").expect("valid reading pattern"),
            numbered: Regex::new(r"[(（]\d+[)）]\s*[∶:：]?\s*(.+)").expect("valid numbered pattern"),
        }
    }

    /// 是否为读音标题段落
    pub fn is_heading(&self, element: ElementRef<'_>) -> bool {
        element.value().name() == "p" && element.select(&self.pinyin_span).next().is_some()
    }

    /// 单字：基本解释块中兄弟节点的分类
    pub fn classify_sibling(&self, element: ElementRef<'_>) -> DocNode {
        match element.value().name() {
            "p" => match element.select(&self.pinyin_span).next() {
                Some(span) => DocNode::Heading {
                    key: self.reading_key(&stripped_text(span)),
                },
                None => DocNode::Prose {
                    text: stripped_text(element),
                },
            },
            "ol" => DocNode::ListBlock {
                items: element.select(&self.list_item).map(stripped_text).collect(),
            },
            _ => DocNode::Other,
        }
    }

    /// 词语：解释块中后代段落和列表项的分类
    pub fn classify_descendant(&self, element: ElementRef<'_>) -> DocNode {
        match element.value().name() {
            "p" => {
                if element.select(&self.numbered_span).next().is_some() {
                    DocNode::NumberedSense {
                        text: self.numbered_sense(&stripped_text(element)),
                    }
                } else if element.select(&self.label).next().is_some() {
                    DocNode::Label
                } else {
                    DocNode::Prose {
                        text: stripped_text(element),
                    }
                }
            }
            "li" => {
                let text = match element.select(&self.secondary_sense).next() {
                    Some(span) => stripped_text(span),
                    None => stripped_text(element),
                };
                DocNode::ListItem { text }
            }
            _ => DocNode::Other,
        }
    }

    /// 从读音文本中取出分组用的读音键
    ///
    /// 优先取开头的拼音字母，否则退回到第一个空白分隔的片段
    pub fn reading_key(&self, text: &str) -> Option<String> {
        if let Some(m) = self.reading.find(text) {
            return Some(m.as_str().to_string());
        }
        text.split_whitespace().next().map(str::to_string)
    }

    /// 取出 "(1)∶释义" 中的释义部分
    pub fn numbered_sense(&self, text: &str) -> Option<Sense> {
        let caps = self.numbered.captures(text)?;
        let sense = caps.get(1)?.as_str().trim();
        (!sense.is_empty()).then(|| sense.to_string())
    }
}

fn selector(s: &str) -> Selector {
    Selector::parse(s).expect("valid selector")
}

/// 元素的文本：每个文本片段去掉首尾空白后拼接
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// 去掉开头的 ◎ / ● 符号
pub fn strip_bullet(text: &str) -> &str {
    let trimmed = text.trim_start();
    match trimmed.strip_prefix(['◎', '●']) {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

/// 去掉全角空格
pub fn strip_fullwidth_spaces(text: &str) -> String {
    text.replace('\u{3000}', "")
}

/// 只由 ◎、∶、: 组成的文本是排版噪音
pub fn is_glyph_noise(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| matches!(c, '◎' | '∶' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(document: &'a Html, css: &str) -> ElementRef<'a> {
        document.select(&selector(css)).next().unwrap()
    }

    #[test]
    fn test_reading_key() {
        let classifier = Classifier::new();

        assert_eq!(classifier.reading_key("hé"), Some("hé".to_string()));
        assert_eq!(classifier.reading_key("hè（ㄏㄜˋ）"), Some("hè".to_string()));
        assert_eq!(classifier.reading_key("lǜ"), Some("lǜ".to_string()));
        assert_eq!(classifier.reading_key("ㄏㄜˊ hé"), Some("ㄏㄜˊ".to_string()));
        assert_eq!(classifier.reading_key(""), None);
    }

    #[test]
    fn test_numbered_sense() {
        let classifier = Classifier::new();

        assert_eq!(
            classifier.numbered_sense("(1)∶人为的"),
            Some("人为的".to_string())
        );
        assert_eq!(
            classifier.numbered_sense("（2）：模拟人的智能"),
            Some("模拟人的智能".to_string())
        );
        assert_eq!(classifier.numbered_sense("(3)"), None);
        assert_eq!(classifier.numbered_sense("没有编号"), None);
    }

    #[test]
    fn test_text_cleaning() {
        assert_eq!(strip_bullet("◎ 姓"), "姓");
        assert_eq!(strip_bullet("  ●平和"), "平和");
        assert_eq!(strip_bullet("相安◎"), "相安◎");
        assert_eq!(strip_fullwidth_spaces("　和　睦"), "和睦");
        assert!(is_glyph_noise("◎"));
        assert!(is_glyph_noise("∶:"));
        assert!(!is_glyph_noise(""));
        assert!(!is_glyph_noise("◎ 姓"));
    }

    #[test]
    fn test_classify_sibling() {
        let classifier = Classifier::new();
        let document = Html::parse_fragment(
            r#"<div><p><span class="dicpy">hé <span>ㄏㄜˊ</span></span></p><ol><li> 相安 </li><li>平静</li></ol><p class="prose">　◎ 姓</p><span>x</span></div>"#,
        );

        assert_eq!(
            classifier.classify_sibling(first(&document, "p")),
            DocNode::Heading { key: Some("hé".to_string()) }
        );
        assert_eq!(
            classifier.classify_sibling(first(&document, "ol")),
            DocNode::ListBlock { items: vec!["相安".to_string(), "平静".to_string()] }
        );
        assert_eq!(
            classifier.classify_sibling(first(&document, "p.prose")),
            DocNode::Prose { text: "◎ 姓".to_string() }
        );
        assert_eq!(classifier.classify_sibling(first(&document, "div > span")), DocNode::Other);
    }

    #[test]
    fn test_classify_descendant() {
        let classifier = Classifier::new();
        let document = Html::parse_fragment(
            r#"<div>
                <p class="a"><span class="cino">(1)</span>∶人为的</p>
                <p class="b"><strong>详细解释</strong></p>
                <p class="c">模拟人类智能的技术</p>
                <ul><li class="d"><span class="cin2">机器智能</span>（英文）</li><li class="e"> 条目 </li></ul>
            </div>"#,
        );

        assert_eq!(
            classifier.classify_descendant(first(&document, "p.a")),
            DocNode::NumberedSense { text: Some("人为的".to_string()) }
        );
        assert_eq!(classifier.classify_descendant(first(&document, "p.b")), DocNode::Label);
        assert_eq!(
            classifier.classify_descendant(first(&document, "p.c")),
            DocNode::Prose { text: "模拟人类智能的技术".to_string() }
        );
        assert_eq!(
            classifier.classify_descendant(first(&document, "li.d")),
            DocNode::ListItem { text: "机器智能".to_string() }
        );
        assert_eq!(
            classifier.classify_descendant(first(&document, "li.e")),
            DocNode::ListItem { text: "条目".to_string() }
        );
    }
}
