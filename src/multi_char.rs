use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::entry::{MultiCharacterEntry, Sense};
use crate::node::{is_glyph_noise, Classifier, DocNode};

/// 词语提取：整词拼音 + 平铺的释义列表
pub struct MultiCharStrategy {
    explanation: Selector,
    related: Selector,
    entry_title: Selector,
    pinyin_span: Selector,
    paragraph: Selector,
    list_item: Selector,
}

impl MultiCharStrategy {
    pub fn new() -> Self {
        Self {
            explanation: selector("div.jnr"),
            related: selector(".encs"),
            entry_title: selector("div.entry_title"),
            pinyin_span: selector("span.dicpy"),
            paragraph: selector("p"),
            list_item: selector("li"),
        }
    }

    /// 解释块中的相关词语会在遍历前从文档树上摘除，因此需要可变的文档
    pub fn extract(&self, document: &mut Html, classifier: &Classifier) -> Option<MultiCharacterEntry> {
        let Some(block_id) = document.select(&self.explanation).next().map(|block| block.id()) else {
            debug!("explanation block not found");
            return None;
        };

        let related: Vec<_> = match document.tree.get(block_id).and_then(ElementRef::wrap) {
            Some(block) => block.select(&self.related).map(|el| el.id()).collect(),
            None => return None,
        };
        if !related.is_empty() {
            debug!(count = related.len(), "removing related words");
        }
        for id in related {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let block = document.tree.get(block_id).and_then(ElementRef::wrap)?;

        let paragraphs = block
            .select(&self.paragraph)
            .map(|p| classifier.classify_descendant(p));
        let items = block
            .select(&self.list_item)
            .map(|li| classifier.classify_descendant(li));
        let basic = collect_senses(paragraphs.chain(items));

        if basic.is_empty() {
            debug!("explanation block has no senses");
            return None;
        }

        Some(MultiCharacterEntry {
            pinyin: self.pinyin(document),
            basic,
            detailed: block.html(),
        })
    }

    /// 词条标题中的拼音，没有时为空字符串
    fn pinyin(&self, document: &Html) -> String {
        document
            .select(&self.entry_title)
            .next()
            .and_then(|title| title.select(&self.pinyin_span).next())
            .map(|span| span.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }
}

fn selector(s: &str) -> Selector {
    Selector::parse(s).expect("valid selector")
}

/// 从分类后的节点中收集释义，丢弃空文本、纯符号段落和标签段落
pub fn collect_senses(nodes: impl IntoIterator<Item = DocNode>) -> Vec<Sense> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            DocNode::NumberedSense { text } => text,
            DocNode::Prose { text } if !text.is_empty() && !is_glyph_noise(&text) => Some(text),
            DocNode::ListItem { text } if !text.is_empty() => Some(text),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Option<MultiCharacterEntry> {
        let mut document = Html::parse_document(html);
        MultiCharStrategy::new().extract(&mut document, &Classifier::new())
    }

    const ARTIFICIAL_INTELLIGENCE: &str = r#"<html><body>
        <div class="entry_title"><h1>人工智能</h1><span class="dicpy"> rén gōng zhì néng </span></div>
        <div class="jnr">
            <p><strong>基本解释</strong></p>
            <p><span class="dicpy">rén gōng zhì néng</span></p>
            <p>◎</p>
            <p>∶</p>
            <p><span class="cino">(1)</span>∶研究、开发用于模拟人的智能的理论和技术</p>
            <p><span class="diczx1">英文</span> artificial intelligence</p>
            <p>计算机科学的一个分支</p>
            <ul><li><span class="cin2">机器智能</span>（旧称）</li><li>  </li><li>简称AI</li></ul>
            <div class="encs"><p>相关词语</p><ul><li>智能手机</li></ul></div>
        </div>
    </body></html>"#;

    #[test]
    fn test_extract_term() {
        let entry = extract(ARTIFICIAL_INTELLIGENCE).unwrap();

        assert_eq!(entry.pinyin, "rén gōng zhì néng");
        assert_eq!(
            entry.basic,
            vec![
                "研究、开发用于模拟人的智能的理论和技术",
                "计算机科学的一个分支",
                "机器智能",
                "简称AI",
            ]
        );
    }

    #[test]
    fn test_related_words_removed() {
        let entry = extract(ARTIFICIAL_INTELLIGENCE).unwrap();

        assert!(entry.basic.iter().all(|s| !s.contains("智能手机") && !s.contains("相关词语")));
        assert!(!entry.detailed.contains("encs"));
        assert!(!entry.detailed.contains("智能手机"));
        assert!(entry.detailed.starts_with("<div class=\"jnr\">"));
    }

    #[test]
    fn test_missing_title_gives_empty_pinyin() {
        let entry = extract(r#"<div class="jnr"><p>一段释义</p></div>"#).unwrap();

        assert_eq!(entry.pinyin, "");
        assert_eq!(entry.basic, vec!["一段释义"]);
    }

    #[test]
    fn test_missing_block_or_empty_block() {
        assert_eq!(extract("<div class=\"content\"><p>释义</p></div>"), None);
        assert_eq!(extract(r#"<div class="jnr"><p>◎</p><p>:</p><div class="encs"><p>别的词</p></div></div>"#), None);
    }

    #[test]
    fn test_collect_senses_drops_noise() {
        let senses = collect_senses(vec![
            DocNode::Prose { text: "◎".to_string() },
            DocNode::Prose { text: ":∶".to_string() },
            DocNode::Prose { text: String::new() },
            DocNode::Label,
            DocNode::NumberedSense { text: None },
            DocNode::NumberedSense { text: Some("编号释义".to_string()) },
            DocNode::ListItem { text: String::new() },
            DocNode::ListItem { text: "列表释义".to_string() },
            DocNode::Other,
        ]);

        assert_eq!(senses, vec!["编号释义", "列表释义"]);
    }
}
