// Copyright 2025 Cowboy AI, LLC.

//! # Dynamic label grammar
//!
//! A dynamic label describes how the human-readable label of a rosetta stone
//! statement is rendered from the values of its input positions.
//!
//! - `{i}` is a **placeholder** for the values of the property at index `i`
//! - `[prefix {i} postfix]` is an optional **section**, rendered only when the
//!   property at index `i` has values
//! - everything else is literal **text**; `\{`, `\[` and `\\` escape the
//!   special characters
//!
//! Constructs that never complete (an unterminated `{`, an empty key, a
//! section without a key) are kept as literal text. Sections do not nest.
//!
//! ```rust
//! use rosetta_templates::{DynamicLabel, LabelComponent};
//!
//! let label = DynamicLabel::parse("{0} travels [to {1}]").unwrap();
//! assert_eq!(
//!     label.components(),
//!     &[
//!         LabelComponent::Placeholder(0),
//!         LabelComponent::Text(" travels ".to_string()),
//!         LabelComponent::Section { index: 1, prefix: "to".to_string(), postfix: String::new() },
//!     ]
//! );
//! ```

use crate::errors::{TemplateError, TemplateResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One parsed piece of a dynamic label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LabelComponent {
    /// Literal text, escapes already resolved
    Text(String),
    /// Values of the property at this index
    Placeholder(usize),
    /// Optional span around the values of the property at `index`
    Section {
        /// Referenced property index
        index: usize,
        /// Trimmed text before the values
        prefix: String,
        /// Trimmed text after the values
        postfix: String,
    },
}

impl LabelComponent {
    /// Property index referenced by this component, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            LabelComponent::Text(_) => None,
            LabelComponent::Placeholder(index) | LabelComponent::Section { index, .. } => {
                Some(*index)
            }
        }
    }

    /// Whether this component is an optional section
    pub fn is_section(&self) -> bool {
        matches!(self, LabelComponent::Section { .. })
    }

    fn is_blank_text(&self) -> bool {
        matches!(self, LabelComponent::Text(text) if text.trim().is_empty())
    }
}

/// A parsed dynamic label
///
/// Keeps the source string alongside its components; two labels are equal
/// when their source strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DynamicLabel {
    template: String,
    components: Vec<LabelComponent>,
}

impl DynamicLabel {
    /// Parse a label template
    ///
    /// Fails with [`TemplateError::InvalidDynamicLabelPlaceholder`] when a
    /// completed placeholder or section key is not a property index.
    pub fn parse(template: impl Into<String>) -> TemplateResult<Self> {
        let template = template.into();
        let components = Parser::new(&template)
            .parse()
            .into_iter()
            .map(RawComponent::resolve)
            .collect::<TemplateResult<Vec<_>>>()?;
        Ok(Self {
            template,
            components,
        })
    }

    /// The source string
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Parsed components in order
    pub fn components(&self) -> &[LabelComponent] {
        &self.components
    }

    /// Every property index referenced by a placeholder or section
    pub fn referenced_indices(&self) -> BTreeSet<usize> {
        self.components.iter().filter_map(LabelComponent::index).collect()
    }

    /// Check that the label references exactly the indices `0..placeholders.len()`
    ///
    /// `placeholders` holds the placeholder of each property in index order.
    /// The first unreferenced index is reported together with its
    /// placeholder; an index beyond the property list is rejected as an
    /// invalid placeholder.
    pub fn validate_coverage(&self, placeholders: &[Option<&str>]) -> TemplateResult<()> {
        let referenced = self.referenced_indices();

        for (index, placeholder) in placeholders.iter().enumerate() {
            if !referenced.contains(&index) {
                return Err(TemplateError::MissingDynamicLabelPlaceholder {
                    index,
                    placeholder: placeholder.map(str::to_string),
                });
            }
        }

        if let Some(extra) = referenced.range(placeholders.len()..).next() {
            return Err(TemplateError::InvalidDynamicLabelPlaceholder(extra.to_string()));
        }

        Ok(())
    }

    /// Components appended by `self` after the components of `previous`
    ///
    /// Returns `None` when `self` does not start with `previous`. Trailing
    /// whitespace of the previous label is not significant, and blank text
    /// between the previous label and the appended components only separates
    /// them and is not reported.
    pub fn appended_components<'a>(&'a self, previous: &DynamicLabel) -> Option<Vec<&'a LabelComponent>> {
        let old = match previous.components().split_last() {
            Some((last, head)) if last.is_blank_text() => head,
            _ => previous.components(),
        };
        let new = self.components();
        if new.len() < old.len() {
            return None;
        }

        let Some((last_old, head_old)) = old.split_last() else {
            return Some(new.iter().filter(|c| !c.is_blank_text()).collect());
        };

        if head_old.iter().zip(new).any(|(a, b)| a != b) {
            return None;
        }

        let boundary = &new[head_old.len()];
        let tail = &new[old.len()..];
        match (last_old, boundary) {
            (a, b) if a == b => {}
            // separator whitespace may move between the old text and the tail
            (LabelComponent::Text(a), LabelComponent::Text(b)) if a.trim_end() == b.trim_end() => {}
            _ => return None,
        }

        Some(tail.iter().filter(|c| !c.is_blank_text()).collect())
    }

    /// Render the label from the values of each property index
    ///
    /// Multiple values are joined as `a, b and c`. Sections without values
    /// are skipped, placeholders without values are kept verbatim.
    pub fn render(&self, values: &BTreeMap<usize, Vec<String>>) -> String {
        let mut out = String::new();
        let mut previous_was_section = false;
        let mut skipped_section = false;

        for component in &self.components {
            match component {
                LabelComponent::Text(text) => {
                    let mut text = text.as_str();
                    if skipped_section && out.ends_with(char::is_whitespace) {
                        text = text.trim_start();
                    }
                    if previous_was_section {
                        push_separated(&mut out, text);
                    } else {
                        out.push_str(text);
                    }
                    previous_was_section = false;
                    skipped_section = false;
                }
                LabelComponent::Placeholder(index) => {
                    match values.get(index).filter(|v| !v.is_empty()) {
                        Some(values) => {
                            let joined = join_values(values);
                            if previous_was_section {
                                push_separated(&mut out, &joined);
                            } else {
                                out.push_str(&joined);
                            }
                        }
                        None => out.push_str(&format!("{{{index}}}")),
                    }
                    previous_was_section = false;
                    skipped_section = false;
                }
                LabelComponent::Section {
                    index,
                    prefix,
                    postfix,
                } => match values.get(index).filter(|v| !v.is_empty()) {
                    Some(values) => {
                        let joined = join_values(values);
                        let rendered = [prefix.as_str(), joined.as_str(), postfix.as_str()]
                            .into_iter()
                            .filter(|part| !part.is_empty())
                            .collect::<Vec<_>>()
                            .join(" ");
                        push_separated(&mut out, &rendered);
                        previous_was_section = true;
                        skipped_section = false;
                    }
                    None => skipped_section = true,
                },
            }
        }

        out.trim().to_string()
    }

    /// Render the label, failing when a required placeholder has no values
    ///
    /// Sections are optional and never fail.
    pub fn try_render(&self, values: &BTreeMap<usize, Vec<String>>) -> TemplateResult<String> {
        for component in &self.components {
            if let LabelComponent::Placeholder(index) = component {
                if values.get(index).map_or(true, Vec::is_empty) {
                    return Err(TemplateError::MissingFormattedLabelPlaceholder(
                        index.to_string(),
                    ));
                }
            }
        }
        Ok(self.render(values))
    }
}

impl fmt::Display for DynamicLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl TryFrom<String> for DynamicLabel {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DynamicLabel::parse(value)
    }
}

impl From<DynamicLabel> for String {
    fn from(label: DynamicLabel) -> Self {
        label.template
    }
}

fn push_separated(out: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    let needs_space = !out.is_empty()
        && !out.ends_with(char::is_whitespace)
        && !piece.starts_with(char::is_whitespace);
    if needs_space {
        out.push(' ');
    }
    out.push_str(piece);
}

fn join_values(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Component with a raw, not yet resolved key
#[derive(Debug, PartialEq)]
enum RawComponent {
    Text(String),
    Placeholder(String),
    Section {
        key: String,
        prefix: String,
        postfix: String,
    },
}

impl RawComponent {
    fn resolve(self) -> TemplateResult<LabelComponent> {
        let index = |key: String| {
            key.parse::<usize>()
                .map_err(|_| TemplateError::InvalidDynamicLabelPlaceholder(key))
        };
        Ok(match self {
            RawComponent::Text(text) => LabelComponent::Text(text),
            RawComponent::Placeholder(key) => LabelComponent::Placeholder(index(key)?),
            RawComponent::Section {
                key,
                prefix,
                postfix,
            } => LabelComponent::Section {
                index: index(key)?,
                prefix,
                postfix,
            },
        })
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    text: String,
    out: Vec<RawComponent>,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            text: String::new(),
            out: Vec::new(),
        }
    }

    fn parse(mut self) -> Vec<RawComponent> {
        while self.pos < self.chars.len() {
            match self.chars[self.pos] {
                '\\' => {
                    let (ch, width) = self.escaped_text_char(self.pos);
                    self.text.push_str(&ch);
                    self.pos += width;
                }
                '[' => match self.section(self.pos) {
                    Some((component, end)) => {
                        self.flush_text();
                        self.out.push(component);
                        self.pos = end;
                    }
                    None => {
                        self.text.push('[');
                        self.pos += 1;
                    }
                },
                '{' => match self.key(self.pos) {
                    Some((key, end)) => {
                        self.flush_text();
                        self.out.push(RawComponent::Placeholder(key));
                        self.pos = end;
                    }
                    None => {
                        self.text.push('{');
                        self.pos += 1;
                    }
                },
                ch => {
                    self.text.push(ch);
                    self.pos += 1;
                }
            }
        }
        self.flush_text();
        self.out
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.out.push(RawComponent::Text(std::mem::take(&mut self.text)));
        }
    }

    /// Resolve a backslash in plain text; only `{`, `[` and `\` are escapable
    fn escaped_text_char(&self, at: usize) -> (String, usize) {
        match self.chars.get(at + 1) {
            Some(next @ ('{' | '[' | '\\')) => (next.to_string(), 2),
            _ => ("\\".to_string(), 1),
        }
    }

    /// Parse `{key}` starting at the opening brace
    fn key(&self, start: usize) -> Option<(String, usize)> {
        let mut key = String::new();
        let mut pos = start + 1;
        while pos < self.chars.len() {
            match self.chars[pos] {
                '\\' if matches!(self.chars.get(pos + 1), Some('}' | '{' | '\\')) => {
                    key.push(self.chars[pos + 1]);
                    pos += 2;
                }
                '}' => {
                    let key = key.trim();
                    return (!key.is_empty()).then(|| (key.to_string(), pos + 1));
                }
                ch => {
                    key.push(ch);
                    pos += 1;
                }
            }
        }
        None
    }

    /// Parse `[prefix {key} postfix]` starting at the opening bracket
    fn section(&self, start: usize) -> Option<(RawComponent, usize)> {
        let mut prefix = String::new();
        let mut pos = start + 1;

        loop {
            match *self.chars.get(pos)? {
                '\\' => {
                    let (ch, width) = self.escaped_text_char(pos);
                    prefix.push_str(&ch);
                    pos += width;
                }
                '{' => break,
                ']' => return None,
                ch => {
                    prefix.push(ch);
                    pos += 1;
                }
            }
        }

        let (key, after_key) = self.key(pos)?;
        let mut postfix = String::new();
        pos = after_key;

        loop {
            match *self.chars.get(pos)? {
                '\\' => {
                    let (ch, width) = self.escaped_text_char(pos);
                    postfix.push_str(&ch);
                    pos += width;
                }
                ']' => break,
                '{' => return None,
                ch => {
                    postfix.push(ch);
                    pos += 1;
                }
            }
        }

        Some((
            RawComponent::Section {
                key,
                prefix: prefix.trim().to_string(),
                postfix: postfix.trim().to_string(),
            },
            pos + 1,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn text(value: &str) -> LabelComponent {
        LabelComponent::Text(value.to_string())
    }

    fn section(index: usize, prefix: &str, postfix: &str) -> LabelComponent {
        LabelComponent::Section {
            index,
            prefix: prefix.to_string(),
            postfix: postfix.to_string(),
        }
    }

    fn values(entries: &[(usize, &[&str])]) -> BTreeMap<usize, Vec<String>> {
        entries
            .iter()
            .map(|(index, v)| (*index, v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test_case("simple string", "simple string" ; "plain text")]
    #[test_case(r"\{simple string", "{simple string" ; "escaped curly bracket")]
    #[test_case(r"\[simple string", "[simple string" ; "escaped square bracket")]
    #[test_case(r"simple\\string", r"simple\string" ; "escaped backslash")]
    #[test_case(r"simple string\[", "simple string[" ; "trailing escape")]
    #[test_case(r"\{ \} \[ \] \\ \a", r"{ \} [ \] \ \a" ; "only openers and backslash escape")]
    #[test_case("prefix {} postfix", "prefix {} postfix" ; "empty placeholder")]
    #[test_case("[prefix {} postfix]", "[prefix {} postfix]" ; "empty section key")]
    #[test_case(r"\[prefix \{key} postfix]", "[prefix {key} postfix]" ; "escaped section")]
    #[test_case("{unfinished", "{unfinished" ; "unfinished placeholder")]
    #[test_case("[{unfinished", "[{unfinished" ; "unfinished section")]
    #[test_case("[text]", "[text]" ; "section without key")]
    #[test_case("[{}]", "[{}]" ; "section with empty key")]
    fn test_parses_as_single_text(source: &str, expected: &str) {
        let label = DynamicLabel::parse(source).unwrap();
        assert_eq!(label.components(), &[text(expected)]);
    }

    #[test]
    fn test_empty_label_has_no_components() {
        assert!(DynamicLabel::parse("").unwrap().components().is_empty());
    }

    #[test]
    fn test_placeholder_key_is_trimmed() {
        let label = DynamicLabel::parse("{ 3  }").unwrap();
        assert_eq!(label.components(), &[LabelComponent::Placeholder(3)]);
    }

    #[test_case("[prefix {0} postfix]", "prefix", "postfix" ; "prefix and postfix")]
    #[test_case("[{0} postfix]", "", "postfix" ; "no prefix")]
    #[test_case("[prefix {0}]", "prefix", "" ; "no postfix")]
    #[test_case("[{0}]", "", "" ; "key only")]
    #[test_case("[ \t {0} postfix]", "", "postfix" ; "blank prefix")]
    #[test_case("[prefix {0} \t ]", "prefix", "" ; "blank postfix")]
    fn test_parses_section(source: &str, prefix: &str, postfix: &str) {
        let label = DynamicLabel::parse(source).unwrap();
        assert_eq!(label.components(), &[section(0, prefix, postfix)]);
    }

    #[test]
    fn test_sections_do_not_nest() {
        let label = DynamicLabel::parse("[ [ pre1 {0}post1] pre2 {0}post2]").unwrap();
        assert_eq!(
            label.components(),
            &[
                section(0, "[ pre1", "post1"),
                text(" pre2 "),
                LabelComponent::Placeholder(0),
                text("post2]"),
            ]
        );
    }

    #[test]
    fn test_unfinished_section_keeps_placeholder() {
        let label = DynamicLabel::parse("[preposition{1}postposition").unwrap();
        assert_eq!(
            label.components(),
            &[text("[preposition"), LabelComponent::Placeholder(1), text("postposition")]
        );
    }

    #[test]
    fn test_mixed_components() {
        let label = DynamicLabel::parse("text [ pre {0}post] {1}").unwrap();
        assert_eq!(
            label.components(),
            &[
                text("text "),
                section(0, "pre", "post"),
                text(" "),
                LabelComponent::Placeholder(1),
            ]
        );
    }

    #[test_case("{abc}" ; "placeholder")]
    #[test_case("[to {x}]" ; "section")]
    #[test_case("{-1}" ; "negative")]
    fn test_non_index_key_is_rejected(source: &str) {
        let err = DynamicLabel::parse(source).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidDynamicLabelPlaceholder(_)));
    }

    #[test]
    fn test_escaped_closing_brace_in_key() {
        let err = DynamicLabel::parse(r"{abc\}def}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::InvalidDynamicLabelPlaceholder("abc}def".to_string())
        );
    }

    #[test]
    fn test_coverage_reports_first_missing_index() {
        let label = DynamicLabel::parse("{0} has a value").unwrap();
        let err = label
            .validate_coverage(&[Some("subject"), Some("value")])
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingDynamicLabelPlaceholder {
                index: 1,
                placeholder: Some("value".to_string()),
            }
        );
    }

    #[test]
    fn test_coverage_rejects_unknown_index() {
        let label = DynamicLabel::parse("{0} {1} {2}").unwrap();
        let err = label.validate_coverage(&[Some("a"), Some("b")]).unwrap_err();
        assert_eq!(err, TemplateError::InvalidDynamicLabelPlaceholder("2".to_string()));
    }

    #[test]
    fn test_appended_components() {
        let old = DynamicLabel::parse("{0} has value {1}").unwrap();
        let new = DynamicLabel::parse("{0} has value {1} [{2}]").unwrap();
        assert_eq!(new.appended_components(&old), Some(vec![&section(2, "", "")]));

        let diverged = DynamicLabel::parse("{0}: {1} [{2}]").unwrap();
        assert_eq!(diverged.appended_components(&old), None);

        let trailing_text = DynamicLabel::parse("{0} has value {1} units").unwrap();
        let extended = DynamicLabel::parse("{0} has value {1} units [in {2}]").unwrap();
        assert_eq!(
            extended.appended_components(&trailing_text),
            Some(vec![&section(2, "in", "")])
        );
    }

    #[test]
    fn test_appended_components_ignore_trailing_whitespace() {
        let old = DynamicLabel::parse("{0} has value {1} units ").unwrap();
        let new = DynamicLabel::parse("{0} has value {1} units[in {2}]").unwrap();
        assert_eq!(new.appended_components(&old), Some(vec![&section(2, "in", "")]));

        let old = DynamicLabel::parse("{0} has value {1} ").unwrap();
        let new = DynamicLabel::parse("{0} has value {1}[{2}]").unwrap();
        assert_eq!(new.appended_components(&old), Some(vec![&section(2, "", "")]));

        let changed = DynamicLabel::parse("{0} has value {1} unit[in {2}]").unwrap();
        let old = DynamicLabel::parse("{0} has value {1} units ").unwrap();
        assert_eq!(changed.appended_components(&old), None);
    }

    #[test]
    fn test_render_arranges_whitespace() {
        let label =
            DynamicLabel::parse("[ {0} ]travels[by {1} ][from {2} ][to {3} ][on {4} ]").unwrap();
        let full = values(&[
            (0, &["Person"]),
            (1, &["train"]),
            (2, &["Hanover"]),
            (3, &["Berlin"]),
            (4, &["29.07.2024"]),
        ]);
        assert_eq!(
            label.render(&full),
            "Person travels by train from Hanover to Berlin on 29.07.2024"
        );

        let partial = values(&[(0, &["Person"]), (1, &["train"]), (2, &["Hanover"])]);
        assert_eq!(label.render(&partial), "Person travels by train from Hanover");
    }

    #[test]
    fn test_render_keeps_missing_placeholders() {
        let label = DynamicLabel::parse("{0} {1}").unwrap();
        assert_eq!(label.render(&values(&[(0, &["Person"])])), "Person {1}");
    }

    #[test]
    fn test_render_joins_multiple_values() {
        let label = DynamicLabel::parse("{0} travel [by {1}] [to {2}] on {3}").unwrap();
        let all = values(&[
            (0, &["Person 1", "Person 2", "Person 3"]),
            (1, &["Train", "Bus", "Bike"]),
            (2, &["Berlin", "Hannover"]),
            (3, &["29.07.2024", "30.07.2024"]),
        ]);
        assert_eq!(
            label.render(&all),
            "Person 1, Person 2 and Person 3 travel by Train, Bus and Bike to Berlin and Hannover on 29.07.2024 and 30.07.2024"
        );
    }

    #[test]
    fn test_try_render_requires_placeholders() {
        let label = DynamicLabel::parse("{0} travels [to {1}]").unwrap();
        assert_eq!(
            label.try_render(&values(&[(0, &["Anna"])])).unwrap(),
            "Anna travels"
        );
        assert_eq!(
            label.try_render(&values(&[(1, &["Berlin"])])).unwrap_err(),
            TemplateError::MissingFormattedLabelPlaceholder("0".to_string())
        );
    }

    #[test]
    fn test_serde_uses_source_string() {
        let label = DynamicLabel::parse("{0} has value {1}").unwrap();
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, "\"{0} has value {1}\"");
        let back: DynamicLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, label);
        assert!(serde_json::from_str::<DynamicLabel>("\"{x}\"").is_err());
    }
}
