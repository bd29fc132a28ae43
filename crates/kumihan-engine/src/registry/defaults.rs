use std::collections::BTreeMap;

use super::{KeywordDefinition, KeywordKind, SpecialOptions};

/// One row of the built-in table.
struct Builtin {
    id: &'static str,
    ja: &'static str,
    en: &'static str,
    tag: &'static str,
    kind: KeywordKind,
    class: Option<&'static str>,
    wrap_as_code: bool,
}

const fn row(
    id: &'static str,
    ja: &'static str,
    en: &'static str,
    tag: &'static str,
    kind: KeywordKind,
) -> Builtin {
    Builtin {
        id,
        ja,
        en,
        tag,
        kind,
        class: None,
        wrap_as_code: false,
    }
}

const fn with_class(mut b: Builtin, class: &'static str) -> Builtin {
    b.class = Some(class);
    b
}

const fn raw(mut b: Builtin) -> Builtin {
    b.wrap_as_code = true;
    b
}

use KeywordKind::{Content, Decoration, Layout, Structure};

const BUILTINS: &[Builtin] = &[
    row("bold", "太字", "Bold", "strong", Decoration),
    row("italic", "イタリック", "Italic", "em", Decoration),
    row("underline", "下線", "Underline", "u", Decoration),
    row("strikethrough", "取り消し線", "Strikethrough", "del", Decoration),
    raw(row("code", "コード", "Code", "code", Decoration)),
    with_class(row("highlight", "ハイライト", "Highlight", "div", Layout), "highlight"),
    with_class(row("box", "枠線", "Box", "div", Layout), "box"),
    with_class(row("center", "中央寄せ", "Center", "div", Layout), "center"),
    row("quote", "引用", "Quote", "blockquote", Layout),
    with_class(row("warning", "注意", "Warning", "div", Layout), "alert warning"),
    with_class(row("info", "情報", "Info", "div", Layout), "alert info"),
    row("heading1", "見出し1", "Heading1", "h1", Structure),
    row("heading2", "見出し2", "Heading2", "h2", Structure),
    row("heading3", "見出し3", "Heading3", "h3", Structure),
    row("heading4", "見出し4", "Heading4", "h4", Structure),
    row("heading5", "見出し5", "Heading5", "h5", Structure),
    row("collapsible", "折りたたみ", "Collapsible", "details", Structure),
    with_class(row("spoiler", "ネタバレ", "Spoiler", "details", Structure), "spoiler"),
    raw(row("codeblock", "コードブロック", "CodeBlock", "pre", Structure)),
    row("ruby", "ルビ", "Ruby", "ruby", Content),
    with_class(row("toc", "目次", "TableOfContents", "nav", Content), "toc"),
];

pub(super) fn builtin_keywords() -> impl Iterator<Item = KeywordDefinition> {
    BUILTINS.iter().map(|b| {
        let mut attributes = BTreeMap::new();
        let mut css_requirements = vec![];
        if let Some(class) = b.class {
            attributes.insert("class".to_string(), class.to_string());
            css_requirements.extend(class.split_whitespace().map(str::to_string));
        }
        KeywordDefinition {
            id: b.id.to_string(),
            display_names: BTreeMap::from([
                ("ja".to_string(), b.ja.to_string()),
                ("en".to_string(), b.en.to_string()),
            ]),
            output_tag: b.tag.to_string(),
            kind: b.kind,
            attributes,
            special_options: SpecialOptions {
                wrap_as_code: b.wrap_as_code,
            },
            css_requirements,
        }
    })
}
