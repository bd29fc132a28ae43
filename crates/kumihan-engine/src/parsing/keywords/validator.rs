use super::similarity::close_matches;
use crate::messages::{Locale, Message};
use crate::registry::{KeywordDefinition, KeywordRegistry};

/// Suggestions embedded in an unknown-keyword message.
pub const MAX_SUGGESTIONS: usize = 3;

const STRICT_CUTOFF: f64 = 0.6;
const LENIENT_CUTOFF: f64 = 0.3;

/// Common misspellings and synonyms, checked before fuzzy matching.
const TRANSLATIONS: &[(&str, &str)] = &[
    ("アンダーライン", "下線"),
    ("ボールド", "太字"),
    ("強調", "太字"),
    ("斜体", "イタリック"),
    ("打ち消し線", "取り消し線"),
    ("取消線", "取り消し線"),
    ("見出し", "見出し1"),
    ("センター", "中央寄せ"),
    ("ボックス", "枠線"),
    ("折り畳み", "折りたたみ"),
    ("スポイラー", "ネタバレ"),
    ("ふりがな", "ルビ"),
];

#[derive(Debug, Clone, Copy)]
enum Trait {
    Heading,
    Collapsible,
    Code,
}

impl Trait {
    fn matches(self, def: &KeywordDefinition) -> bool {
        match self {
            Trait::Heading => def.is_heading(),
            Trait::Collapsible => def.is_collapsible(),
            Trait::Code => def.is_code(),
        }
    }
}

/// Keyword pairs that should not share a marker.
const CONFLICTS: &[(Trait, Trait)] = &[
    (Trait::Heading, Trait::Collapsible),
    (Trait::Heading, Trait::Code),
    (Trait::Collapsible, Trait::Code),
];

/// A keyword with no registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyword {
    pub keyword: String,
    pub suggestions: Vec<String>,
}

/// Result of checking a marker's keywords against the registry.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport<'r> {
    /// Recognized keywords in input order, with the text they were written as.
    pub valid: Vec<(String, &'r KeywordDefinition)>,
    pub unknown: Vec<UnknownKeyword>,
    pub errors: Vec<String>,
    /// Non-fatal combination warnings.
    pub warnings: Vec<String>,
}

impl ValidationReport<'_> {
    /// The keyword texts that resolved.
    pub fn valid_keywords(&self) -> Vec<&str> {
        self.valid.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Errors followed by warnings, as reported to the user.
    pub fn messages(&self) -> impl Iterator<Item = &String> {
        self.errors.iter().chain(&self.warnings)
    }
}

/// Checks resolved keywords against a [`KeywordRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct KeywordValidator<'r> {
    registry: &'r KeywordRegistry,
    locale: Locale,
}

impl<'r> KeywordValidator<'r> {
    pub fn new(registry: &'r KeywordRegistry, locale: Locale) -> Self {
        Self { registry, locale }
    }

    /// Validates `keywords`. Never fails: problems are reported in the result.
    pub fn validate<S: AsRef<str>>(&self, keywords: &[S]) -> ValidationReport<'r> {
        let mut report = ValidationReport::default();
        for keyword in keywords {
            let keyword = keyword.as_ref();
            match self.registry.lookup(keyword) {
                Some(def) => report.valid.push((keyword.to_string(), def)),
                None => {
                    let suggestions = self.suggest(keyword, MAX_SUGGESTIONS);
                    report.errors.push(
                        Message::UnknownKeyword {
                            keyword,
                            suggestions: &suggestions,
                        }
                        .render(self.locale),
                    );
                    report.unknown.push(UnknownKeyword {
                        keyword: keyword.to_string(),
                        suggestions,
                    });
                }
            }
        }
        report.warnings = self.combination_warnings(&report.valid);
        report
    }

    /// Up to `max` display names resembling `keyword`.
    ///
    /// The translation table wins outright. Otherwise a strict fuzzy pass runs
    /// first and a lenient one only if the strict pass finds nothing.
    pub fn suggest(&self, keyword: &str, max: usize) -> Vec<String> {
        if max == 0 {
            return vec![];
        }
        if let Some(def) = TRANSLATIONS
            .iter()
            .find(|(from, _)| *from == keyword)
            .and_then(|(_, to)| self.registry.lookup(to))
        {
            return vec![def.display_name(self.locale).to_string()];
        }

        let names: Vec<&str> = self.registry.definitions().flat_map(|d| d.names()).collect();
        let mut matched = close_matches(keyword, names.iter().copied(), names.len(), STRICT_CUTOFF);
        if matched.is_empty() {
            matched = close_matches(keyword, names.iter().copied(), names.len(), LENIENT_CUTOFF);
        }

        let mut out: Vec<String> = vec![];
        for name in matched {
            let Some(def) = self.registry.lookup(name) else {
                continue;
            };
            let display = def.display_name(self.locale).to_string();
            if !out.contains(&display) {
                out.push(display);
            }
            if out.len() == max {
                break;
            }
        }
        out
    }

    fn combination_warnings(&self, valid: &[(String, &KeywordDefinition)]) -> Vec<String> {
        let mut warnings = vec![];
        for (i, (first, a)) in valid.iter().enumerate() {
            for (second, b) in &valid[i + 1..] {
                let conflicting = CONFLICTS.iter().any(|&(x, y)| {
                    (x.matches(a) && y.matches(b)) || (y.matches(a) && x.matches(b))
                });
                if conflicting {
                    warnings.push(
                        Message::ConflictingKeywords { first, second }.render(self.locale),
                    );
                }
                if a.output_tag == b.output_tag {
                    warnings.push(
                        Message::DuplicateTag {
                            tag: &a.output_tag,
                            first,
                            second,
                        }
                        .render(self.locale),
                    );
                }
            }
        }
        warnings
    }
}
