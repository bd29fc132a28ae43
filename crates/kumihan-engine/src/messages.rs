//! Localized diagnostic messages.
//!
//! Every user-facing diagnostic is a [`Message`] rendered for a [`Locale`].
//! There are no numeric error codes: callers only ever see the rendered text.

use serde::{Deserialize, Serialize};

/// Language used for diagnostics and keyword suggestions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    /// Key used for this locale in a keyword's `display_names` map.
    pub fn code(self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }
}

/// A diagnostic before localization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    UnknownKeyword {
        keyword: &'a str,
        suggestions: &'a [String],
    },
    EmptyKeyword,
    KeywordTooLong {
        keyword: &'a str,
        max: usize,
    },
    KeywordForbiddenChars {
        keyword: &'a str,
    },
    KeywordNumeric {
        keyword: &'a str,
    },
    KeywordReserved {
        keyword: &'a str,
    },
    CompoundEmptyPart {
        position: usize,
    },
    InvalidRuby {
        text: &'a str,
    },
    InvalidAttribute {
        name: &'a str,
        value: &'a str,
    },
    UnexpectedText {
        text: &'a str,
    },
    ConflictingKeywords {
        first: &'a str,
        second: &'a str,
    },
    DuplicateTag {
        tag: &'a str,
        first: &'a str,
        second: &'a str,
    },
    EmptyKeywordSegment {
        line: usize,
        offset: usize,
    },
    UnterminatedMarker {
        line: usize,
        offset: usize,
    },
    UnclosedBlock {
        line: usize,
        keyword: &'a str,
    },
    StrayBlockClose {
        line: usize,
    },
    ChunkFailed {
        index: usize,
        reason: &'a str,
    },
}

impl Message<'_> {
    /// Renders the message for `locale`.
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::Ja => self.ja(),
            Locale::En => self.en(),
        }
    }

    fn ja(&self) -> String {
        match self {
            Message::UnknownKeyword {
                keyword,
                suggestions,
            } => {
                if suggestions.is_empty() {
                    format!("不明なキーワード「{keyword}」です")
                } else {
                    format!(
                        "不明なキーワード「{keyword}」です（候補: {}）",
                        suggestions.join("、")
                    )
                }
            }
            Message::EmptyKeyword => "キーワードが空です".to_string(),
            Message::KeywordTooLong { keyword, max } => {
                format!("キーワード「{keyword}」が長すぎます（最大{max}文字）")
            }
            Message::KeywordForbiddenChars { keyword } => {
                format!("キーワード「{keyword}」に使用できない文字が含まれています")
            }
            Message::KeywordNumeric { keyword } => {
                format!("キーワード「{keyword}」は数字のみで構成できません")
            }
            Message::KeywordReserved { keyword } => {
                format!("「{keyword}」は予約語のためキーワードに使用できません")
            }
            Message::CompoundEmptyPart { position } => {
                format!("複合キーワードの{position}番目が空です")
            }
            Message::InvalidRuby { text } => format!("ルビ記法「{text}」が不正です"),
            Message::InvalidAttribute { name, value } => {
                format!("属性 {name} の値「{value}」が不正です")
            }
            Message::UnexpectedText { text } => {
                format!("マーカー内の「{text}」を解釈できません")
            }
            Message::ConflictingKeywords { first, second } => {
                format!("キーワード「{first}」と「{second}」の組み合わせは推奨されません")
            }
            Message::DuplicateTag { tag, first, second } => {
                format!("キーワード「{first}」と「{second}」は同じタグ <{tag}> を生成します")
            }
            Message::EmptyKeywordSegment { line, offset } => {
                format!("{line}行目{offset}バイト目: キーワードが空のマーカーです")
            }
            Message::UnterminatedMarker { line, offset } => {
                format!("{line}行目{offset}バイト目: マーカーが閉じられていません")
            }
            Message::UnclosedBlock { line, keyword } => {
                format!("{line}行目: ブロック「{keyword}」が閉じられていません")
            }
            Message::StrayBlockClose { line } => {
                format!("{line}行目: 対応する開始マーカーのない終了マーカーです")
            }
            Message::ChunkFailed { index, reason } => {
                format!("チャンク{index}の解析に失敗しました: {reason}")
            }
        }
    }

    fn en(&self) -> String {
        match self {
            Message::UnknownKeyword {
                keyword,
                suggestions,
            } => {
                if suggestions.is_empty() {
                    format!("Unknown keyword '{keyword}'")
                } else {
                    format!(
                        "Unknown keyword '{keyword}' (did you mean: {}?)",
                        suggestions.join(", ")
                    )
                }
            }
            Message::EmptyKeyword => "Keyword is empty".to_string(),
            Message::KeywordTooLong { keyword, max } => {
                format!("Keyword '{keyword}' is too long (max {max} characters)")
            }
            Message::KeywordForbiddenChars { keyword } => {
                format!("Keyword '{keyword}' contains forbidden characters")
            }
            Message::KeywordNumeric { keyword } => {
                format!("Keyword '{keyword}' must not be purely numeric")
            }
            Message::KeywordReserved { keyword } => {
                format!("'{keyword}' is a reserved word and cannot be used as a keyword")
            }
            Message::CompoundEmptyPart { position } => {
                format!("compound keyword has an empty part at position {position}")
            }
            Message::InvalidRuby { text } => format!("Invalid ruby notation '{text}'"),
            Message::InvalidAttribute { name, value } => {
                format!("Invalid value '{value}' for attribute {name}")
            }
            Message::UnexpectedText { text } => {
                format!("Unexpected text '{text}' in marker")
            }
            Message::ConflictingKeywords { first, second } => {
                format!("Keywords '{first}' and '{second}' should not be combined")
            }
            Message::DuplicateTag { tag, first, second } => {
                format!("Keywords '{first}' and '{second}' both produce <{tag}>")
            }
            Message::EmptyKeywordSegment { line, offset } => {
                format!("line {line}, byte {offset}: marker has an empty keyword")
            }
            Message::UnterminatedMarker { line, offset } => {
                format!("line {line}, byte {offset}: marker is not closed")
            }
            Message::UnclosedBlock { line, keyword } => {
                format!("line {line}: block '{keyword}' is not closed")
            }
            Message::StrayBlockClose { line } => {
                format!("line {line}: closing marker without an opening block")
            }
            Message::ChunkFailed { index, reason } => {
                format!("failed to parse chunk {index}: {reason}")
            }
        }
    }
}
