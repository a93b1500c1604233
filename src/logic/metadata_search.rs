use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::fmt::Write as _;

use crate::error::{CatalogError, CatalogResult};
use crate::logic::filter::{Predicate, Restriction};
use crate::model::Metadata;

const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A search pattern for artwork documents, in the POSIX advanced regex
/// dialect Postgres evaluates for `~`.
///
/// Matching is a case-sensitive contains-match over the document's
/// serialized text, so key names, string values, numbers and boolean
/// literals are all fair targets: `true` hits any document holding a `true`.
/// Postgres receives the source unchanged. In-process matching runs a
/// translation of it, see [`translate_posix`].
#[derive(Debug, Clone)]
pub struct DocumentPattern {
    source: String,
    regex: Result<Regex, String>,
}

impl DocumentPattern {
    /// Only blank patterns are refused here. Dialect errors surface from
    /// whichever store evaluates the pattern.
    pub fn parse(pattern: &str) -> CatalogResult<Self> {
        if pattern.trim().is_empty() {
            return Err(CatalogError::invalid_input("search pattern must not be empty"));
        }

        let regex = RegexBuilder::new(&translate_posix(pattern))
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|e| e.to_string());

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled in-process matcher, or an input error when the pattern
    /// uses something only Postgres can evaluate (backreferences, mostly).
    pub fn regex(&self) -> CatalogResult<&Regex> {
        self.regex.as_ref().map_err(|e| {
            CatalogError::invalid_input(format!(
                "search pattern {:?} cannot be evaluated: {}",
                self.source, e
            ))
        })
    }

    /// False when the pattern has no in-process matcher.
    pub fn is_match(&self, document: &Metadata) -> bool {
        self.regex
            .as_ref()
            .is_ok_and(|regex| regex.is_match(&document_text(document)))
    }

    pub fn into_restriction(self) -> Restriction {
        Restriction::new().and(Predicate::DocumentMatches(self))
    }
}

impl PartialEq for DocumentPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Rewrite a Postgres advanced regex into the `regex` crate's syntax.
///
/// - `{` opens a bound only when a bound follows (`{3}`, `{3,}`, `{2,5}`,
///   `{,5}`); otherwise it is a literal brace, as is a stray `}`.
/// - `\m`, `\M`, `\y`, `\Y`, `\Z` and the `[[:<:]]`/`[[:>:]]` word anchors
///   map to their `regex` equivalents.
/// - Inside bracket expressions a leading `]` and any `[` not opening a
///   `[:class:]` are literals.
///
/// Anything left untranslatable (backreferences) fails to compile later.
pub fn translate_posix(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                match chars.get(i + 1) {
                    Some('m') => out.push_str(r"\b{start}"),
                    Some('M') => out.push_str(r"\b{end}"),
                    Some('y') => out.push_str(r"\b"),
                    Some('Y') => out.push_str(r"\B"),
                    Some('Z') => out.push_str(r"\z"),
                    Some(other) => {
                        out.push('\\');
                        out.push(*other);
                    }
                    None => out.push('\\'),
                }
                i += 2;
            }
            '[' if starts_with(&chars, i, "[[:<:]]") => {
                out.push_str(r"\b{start}");
                i += 7;
            }
            '[' if starts_with(&chars, i, "[[:>:]]") => {
                out.push_str(r"\b{end}");
                i += 7;
            }
            '[' => i = copy_bracket(&chars, i, &mut out),
            '{' => match bound_at(&chars, i) {
                Some((bound, next)) => {
                    out.push_str(&bound);
                    i = next;
                }
                None => {
                    out.push_str(r"\{");
                    i += 1;
                }
            },
            '}' => {
                out.push_str(r"\}");
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn starts_with(chars: &[char], at: usize, needle: &str) -> bool {
    let needle: Vec<char> = needle.chars().collect();
    chars.get(at..at + needle.len()) == Some(needle.as_slice())
}

/// Copy the bracket expression opening at `start`, returning the index just
/// past its closing `]`. An unterminated bracket is copied through as is.
fn copy_bracket(chars: &[char], start: usize, out: &mut String) -> usize {
    let mut body = String::from("[");
    let mut j = start + 1;

    if chars.get(j) == Some(&'^') {
        body.push('^');
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        body.push_str(r"\]");
        j += 1;
    }

    while j < chars.len() {
        match chars[j] {
            ']' => {
                body.push(']');
                out.push_str(&body);
                return j + 1;
            }
            '[' if matches!(chars.get(j + 1), Some(':' | '.' | '=')) => {
                let delimiter = chars[j + 1];
                let close = (j + 2..chars.len().saturating_sub(1))
                    .find(|&k| chars[k] == delimiter && chars[k + 1] == ']');
                match close {
                    Some(k) => {
                        body.extend(&chars[j..=k + 1]);
                        j = k + 2;
                    }
                    None => {
                        body.push_str(r"\[");
                        j += 1;
                    }
                }
            }
            '\\' => {
                body.push('\\');
                if let Some(next) = chars.get(j + 1) {
                    body.push(*next);
                }
                j += 2;
            }
            c @ ('[' | '&' | '~') => {
                body.push('\\');
                body.push(c);
                j += 1;
            }
            c => {
                body.push(c);
                j += 1;
            }
        }
    }

    out.extend(&chars[start..]);
    chars.len()
}

/// A `{m}`, `{m,}`, `{m,n}` or `{,n}` bound at `start`, normalized for the
/// `regex` crate, with the index just past it.
fn bound_at(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut j = start + 1;
    let min: String = chars[j..].iter().take_while(|c| c.is_ascii_digit()).collect();
    j += min.len();

    let mut max = None;
    if chars.get(j) == Some(&',') {
        let digits: String = chars[j + 1..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        j += 1 + digits.len();
        max = Some(digits);
    }

    if chars.get(j) != Some(&'}') {
        return None;
    }

    let bound = match (min.is_empty(), max) {
        (false, None) => format!("{{{}}}", min),
        (false, Some(max)) => format!("{{{},{}}}", min, max),
        (true, Some(max)) if !max.is_empty() => format!("{{0,{}}}", max),
        _ => return None,
    };
    Some((bound, j + 1))
}

/// Render a document the way Postgres prints `jsonb::text`, so in-memory
/// matching sees the same text the database would.
///
/// Keys are ordered shorter first, then bytewise; entries are separated by
/// `", "` and keys by `": "`.
pub fn document_text(document: &Metadata) -> String {
    let mut out = String::new();
    write_object(&mut out, document);
    out
}

fn write_object(out: &mut String, object: &Metadata) {
    let mut keys: Vec<&String> = object.keys().collect();
    keys.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.as_bytes().cmp(b.as_bytes())));

    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_string(out, key);
        out.push_str(": ");
        write_value(out, &object[key.as_str()]);
    }
    out.push('}');
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => {
            let _ = write!(out, "{}", number);
        }
        Value::String(text) => write_string(out, text),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(object) => write_object(out, object),
    }
}

fn write_string(out: &mut String, text: &str) {
    // serde_json escapes the same characters jsonb does
    match serde_json::to_string(text) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => {
            out.push('"');
            out.push_str(text);
            out.push('"');
        }
    }
}
