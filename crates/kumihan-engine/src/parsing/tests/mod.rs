//! Integration tests for the parsing module.
//!
//! Fixtures (.txt) and snapshots (.snap) are co-located in `fixtures/`.
//! Snapshots hold the text dump of the node tree plus the error list.

use proptest::prelude::*;

use crate::messages::Locale;
use crate::parsing::keywords::{KeywordValidator, sanitize_color};
use crate::parsing::orchestrator::{
    Parser, ParserOptions, Strategy as ParseStrategy, chunk_segments, parse_sequential,
    run_chunks, sequential::segment_text,
};
use crate::parsing::subparsers::{ParseContext, Parsed};
use crate::parsing::{MetaValue, NodeContent, parse, scan_marker, snapshot};
use crate::registry::KeywordRegistry;

// Fixture-based snapshot tests

#[test]
fn fixture_inline_markers() {
    assert_fixture("inline_markers");
}

#[test]
fn fixture_blocks() {
    assert_fixture("blocks");
}

#[test]
fn fixture_lists_and_markdown() {
    assert_fixture("lists_and_markdown");
}

#[test]
fn fixture_diagnostics() {
    assert_fixture("diagnostics");
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let text = std::fs::read_to_string(format!("{fixtures_dir}/{name}.txt")).unwrap();
    let registry = KeywordRegistry::with_defaults();

    let out = parse(&registry, &text);
    snapshot::invariants(&registry, &out.nodes);

    let dump = snapshot::dump(&out.nodes, &out.errors);
    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, dump);
    });
}

// Concrete scenarios

#[test]
fn bold_marker_is_one_strong_node() {
    let registry = KeywordRegistry::with_defaults();
    let out = parse(&registry, "# 太字 #重要##");
    assert_eq!(out.nodes.len(), 1);
    assert_eq!(out.nodes[0].node_type, "strong");
    assert_eq!(out.nodes[0].content, NodeContent::Text("重要".to_string()));
    assert!(out.errors.is_empty());
}

#[test]
fn compound_keywords_share_one_span() {
    let result = scan_marker("# 太字+下線 #内容##").unwrap();
    assert_eq!(result.keywords, vec!["太字", "下線"]);
    assert_eq!(result.markers.len(), 1);

    let registry = KeywordRegistry::with_defaults();
    let out = parse(&registry, "# 太字+下線 #内容##");
    let strong = &out.nodes[0];
    assert_eq!(strong.node_type, "strong");
    let u = &strong.content.children()[0];
    assert_eq!(u.node_type, "u");
    assert_eq!(u.content.as_text(), Some("内容"));
}

#[test]
fn ruby_attributes() {
    let result = scan_marker("# ルビ #漢字(かんじ)##").unwrap();
    assert_eq!(result.attributes["ruby_base"], "漢字");
    assert_eq!(result.attributes["ruby_text"], "かんじ");
    assert!(result.keywords.iter().any(|k| k == "ルビ"));
}

#[test]
fn dangerous_color_becomes_black() {
    let result = scan_marker("# 太字 color=javascript:alert(1) #x##").unwrap();
    assert_eq!(result.attributes["color"], "#000000");

    let registry = KeywordRegistry::with_defaults();
    let out = parse(&registry, "# 太字 color=javascript:alert(1) #x##");
    assert_eq!(out.nodes[0].attributes["color"], "#000000");
}

#[test]
fn unknown_keyword_node_and_error() {
    let registry = KeywordRegistry::with_defaults();
    let out = parse(&registry, "# 未知キーワード #x##");
    assert_eq!(out.errors.len(), 1);
    assert!(out.errors[0].contains("不明なキーワード"));
    assert_eq!(out.nodes.len(), 1);
    assert!(out.nodes[0].is_unknown_keyword());
    let MetaValue::List(suggestions) = &out.nodes[0].metadata["suggestions"] else {
        panic!("suggestions should be a list");
    };
    assert!(suggestions.len() <= 3);
}

#[test]
fn empty_input() {
    assert!(scan_marker("").is_none());
    let registry = KeywordRegistry::with_defaults();
    let out = parse(&registry, "");
    assert!(out.nodes.is_empty());
    assert!(out.errors.is_empty());
}

#[test]
fn english_locale() {
    let registry = KeywordRegistry::with_defaults();
    let parser = Parser::new(
        &registry,
        ParserOptions {
            locale: Locale::En,
            ..ParserOptions::default()
        },
    );
    let out = parser.parse("# ボールド #x##");
    assert_eq!(out.errors, vec!["Unknown keyword 'ボールド' (did you mean: Bold?)"]);
}

#[test]
fn nearest_marker_wins_on_ambiguous_lines() {
    assert!(scan_marker("# a # b # c #").is_none());
    let result = scan_marker("# 太字 #一## と # 下線 #二##").unwrap();
    assert_eq!(result.markers.len(), 2);
    assert_eq!(result.keywords, vec!["太字", "下線"]);
}

// Property tests

const DOC_LINES: &[&str] = &[
    "本文の行",
    "",
    "# 太字 #強調##",
    "前 # 下線 #x## 後",
    "- 項目",
    "1. 番号",
    "# 枠線",
    "# コード",
    "##",
    "# 未知 #y##",
    "# #空##",
    "**強調** と `code`",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(DOC_LINES), 0..40).prop_map(|lines| lines.join("\n"))
}

fn random_case(text: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), text.len()).prop_map(move |upper| {
        text.chars()
            .zip(upper)
            .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    #[test]
    fn marker_round_trip(
        kw in "[あ-ん]{1,6}",
        content in "[a-zA-Z0-9あ-ん ]{1,20}",
    ) {
        prop_assume!(!content.trim().is_empty());
        let result = scan_marker(&format!("# {kw} #{content}##")).unwrap();
        prop_assert_eq!(result.keywords, vec![kw]);
        prop_assert_eq!(result.content, content.trim());
    }

    #[test]
    fn sanitize_is_idempotent(x in "\\PC{0,40}") {
        let once = sanitize_color(&x);
        prop_assert_eq!(sanitize_color(&once), once);
    }

    #[test]
    fn parallel_matches_sequential(
        text in document(),
        chunk_lines in 1usize..10,
        workers in 1usize..=8,
    ) {
        let registry = KeywordRegistry::with_defaults();
        let ctx = ParseContext::new(&registry, Locale::En);
        let segments = segment_text(&ctx, &text, 0, 1);
        let chunks = chunk_segments(&segments, chunk_lines);
        let parallel = run_chunks(&chunks, workers, Locale::En, |c| ctx.dispatch(c));
        prop_assert_eq!(parallel, parse_sequential(&ctx, &text));
    }

    #[test]
    fn streaming_matches_sequential(
        text in document(),
        piece_chars in 1usize..12,
        threshold in 1usize..64,
    ) {
        let registry = KeywordRegistry::with_defaults();
        let ctx = ParseContext::new(&registry, Locale::En);
        let chars: Vec<char> = text.chars().collect();
        let mut stream = crate::parsing::orchestrator::StreamingParser::new(ctx, threshold);
        let mut streamed = Parsed::default();
        for piece in chars.chunks(piece_chars) {
            streamed.extend(stream.push(&piece.iter().collect::<String>()));
        }
        streamed.extend(stream.finish());
        prop_assert_eq!(streamed, parse_sequential(&ctx, &text));
    }

    #[test]
    fn strategies_agree(text in document()) {
        let registry = KeywordRegistry::with_defaults();
        let parser = Parser::new(&registry, ParserOptions { chunk_lines: 3, ..ParserOptions::default() });
        let sequential = parser.parse_with(&text, ParseStrategy::Sequential);
        let parallel = parser.parse_with(&text, ParseStrategy::Parallel);
        prop_assert_eq!(&parallel.nodes, &sequential.nodes);
        prop_assert_eq!(&parallel.errors, &sequential.errors);
    }

    #[test]
    fn validator_is_total(keywords in prop::collection::vec("\\PC{0,12}", 0..4)) {
        let registry = KeywordRegistry::with_defaults();
        let report = KeywordValidator::new(&registry, Locale::Ja).validate(&keywords);
        prop_assert_eq!(report.valid.len() + report.unknown.len(), keywords.len());
        for unknown in &report.unknown {
            prop_assert!(unknown.suggestions.len() <= 3);
        }
    }

    #[test]
    fn no_suggestions_for_distant_input(keyword in "[0-9]{8}") {
        let registry = KeywordRegistry::with_defaults();
        let report = KeywordValidator::new(&registry, Locale::Ja).validate(&[keyword]);
        prop_assert_eq!(report.unknown.len(), 1);
        prop_assert!(report.unknown[0].suggestions.is_empty());
    }

    #[test]
    fn dangerous_schemes_any_case(
        js in random_case("javascript:alert(1)"),
        data in random_case("data:text/html,<b>x</b>"),
    ) {
        prop_assert_eq!(sanitize_color(&js), "#000000");
        prop_assert_eq!(sanitize_color(&data), "#000000");
    }
}

#[test]
fn security_backstop_examples() {
    assert_eq!(sanitize_color("JavaScript:alert(1)"), "#000000");
    assert_eq!(sanitize_color("DATA:text/html,..."), "#000000");
}
