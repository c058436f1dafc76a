use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::entry::{Readings, Sense, SingleCharacterEntry};
use crate::node::{is_glyph_noise, strip_bullet, strip_fullwidth_spaces, Classifier, DocNode};

/// 单字提取：基本解释按读音分组
pub struct SingleCharStrategy {
    basic_block: Selector,
    detailed_block: Selector,
    paragraph: Selector,
}

/// 兄弟节点遍历的状态
enum WalkState {
    /// 等待下一个读音标题
    Seeking,
    /// 正在为某个读音收集释义；key 为 None 时丢弃收集到的内容
    Collecting { key: Option<String>, senses: Vec<Sense> },
}

impl SingleCharStrategy {
    pub fn new() -> Self {
        Self {
            basic_block: Selector::parse(r#"div[data-type-block="基本解释"]"#)
                .expect("valid selector"),
            detailed_block: Selector::parse(r#"div[data-type-block="详细解释"]"#)
                .expect("valid selector"),
            paragraph: Selector::parse("p").expect("valid selector"),
        }
    }

    pub fn extract(&self, document: &Html, classifier: &Classifier) -> Option<SingleCharacterEntry> {
        let Some(basic_block) = document.select(&self.basic_block).next() else {
            debug!("basic explanation block not found");
            return None;
        };

        let mut basic = Readings::new();
        for parent in self.heading_parents(basic_block, classifier) {
            let nodes = parent
                .children()
                .filter_map(ElementRef::wrap)
                .map(|sibling| classifier.classify_sibling(sibling));
            walk_readings(nodes, &mut basic);
        }

        let mut detailed = basic_block.html();
        if let Some(detailed_block) = document.select(&self.detailed_block).next() {
            detailed.push_str(&detailed_block.html());
        }

        if basic.is_empty() {
            debug!("basic explanation block has no readings");
            return None;
        }

        Some(SingleCharacterEntry { basic, detailed })
    }

    /// 所有读音标题的父元素，按文档顺序去重
    fn heading_parents<'a>(
        &self,
        block: ElementRef<'a>,
        classifier: &Classifier,
    ) -> Vec<ElementRef<'a>> {
        let mut parents: Vec<ElementRef<'a>> = Vec::new();

        for heading in block
            .select(&self.paragraph)
            .filter(|p| classifier.is_heading(*p))
        {
            let Some(parent) = heading.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            if !parents.iter().any(|p| p.id() == parent.id()) {
                parents.push(parent);
            }
        }

        parents
    }
}

/// 在一组兄弟节点上做有限状态遍历，把释义归到前面最近的读音标题下
///
/// 标题之后遇到有序列表时取出全部列表项；遇到非空的普通段落时只取这一段；
/// 遇到下一个标题时结束当前分组。空段落、只有符号的段落和其他节点跳过。
pub fn walk_readings(nodes: impl IntoIterator<Item = DocNode>, readings: &mut Readings) {
    let mut state = WalkState::Seeking;

    for node in nodes {
        state = match (state, node) {
            (WalkState::Seeking, DocNode::Heading { key }) => WalkState::Collecting {
                key,
                senses: Vec::new(),
            },
            (WalkState::Seeking, _) => WalkState::Seeking,
            (WalkState::Collecting { key, senses }, DocNode::Heading { key: next }) => {
                flush(key, senses, readings);
                WalkState::Collecting {
                    key: next,
                    senses: Vec::new(),
                }
            }
            (WalkState::Collecting { key, mut senses }, DocNode::ListBlock { items }) => {
                senses.extend(items.iter().map(|item| strip_bullet(item).to_string()));
                flush(key, senses, readings);
                WalkState::Seeking
            }
            (WalkState::Collecting { key, mut senses }, DocNode::Prose { text }) => {
                let text = strip_fullwidth_spaces(&text);
                let text = strip_bullet(&text);
                if text.trim().is_empty() || is_glyph_noise(text.trim()) {
                    WalkState::Collecting { key, senses }
                } else {
                    senses.push(text.to_string());
                    flush(key, senses, readings);
                    WalkState::Seeking
                }
            }
            (collecting @ WalkState::Collecting { .. }, _) => collecting,
        };
    }

    if let WalkState::Collecting { key, senses } = state {
        flush(key, senses, readings);
    }
}

fn flush(key: Option<String>, senses: Vec<Sense>, readings: &mut Readings) {
    match key {
        Some(key) => readings.extend(&key, senses),
        None if !senses.is_empty() => {
            debug!(dropped = senses.len(), "senses under unreadable pronunciation heading");
        }
        None => {}
    }
}
