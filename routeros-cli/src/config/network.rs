//! Hierarchical configuration text parsing, comparison and dumping.

use std::collections::HashSet;

use regex::Regex;

use super::line::ConfigLine;
use super::{DiffMatch, DiffReplace, DumpFormat};
use crate::error::ConfigError;

/// How configuration text is split into items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Spaces per nesting level when dumping in block format.
    pub indent: usize,

    /// Lines starting with any of these are comments.
    pub comment_tokens: Vec<String>,

    /// Unindented lines starting with this character open a section that
    /// parents every following line until the next section.
    pub section_prefix: Option<char>,

    /// A line ending in this character continues on the next line.
    pub continuation: Option<char>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            indent: 1,
            comment_tokens: vec!["!".to_string()],
            section_prefix: None,
            continuation: None,
        }
    }
}

impl ParserOptions {
    /// Settings for RouterOS `/export` output.
    ///
    /// ```text
    /// # model = RB3011UiAS
    /// /ip address
    /// add address=192.168.88.1/24 comment=defconf interface=bridge \
    ///     network=192.168.88.0
    /// ```
    pub fn routeros() -> Self {
        Self {
            indent: 1,
            comment_tokens: vec!["#".to_string()],
            section_prefix: Some('/'),
            continuation: Some('\\'),
        }
    }
}

/// An ordered, parsed configuration.
#[derive(Debug, Clone, Default)]
pub struct NetworkConfig {
    options: ParserOptions,
    ignore_lines: Vec<Regex>,
    items: Vec<ConfigLine>,
}

impl NetworkConfig {
    /// Create an empty configuration with the given parser settings.
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            ignore_lines: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Parse `contents` in one go.
    pub fn parse(contents: &str, options: ParserOptions) -> Self {
        let mut config = Self::new(options);
        config.load(contents);
        config
    }

    /// Skip lines matching any of `patterns` when loading.
    pub fn with_ignore_lines<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, ConfigError> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidIgnorePattern {
                pattern: pattern.to_string(),
                source,
            })?;
            self.ignore_lines.push(regex);
        }
        Ok(self)
    }

    /// Replace the items with the parse of `contents`.
    pub fn load(&mut self, contents: &str) {
        self.items = self.parse_items(contents);
    }

    /// Parsed items in source order.
    pub fn items(&self) -> &[ConfigLine] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Parser settings.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Items strictly beneath `path`; every item for an empty path.
    pub fn block(&self, path: &[String]) -> Vec<&ConfigLine> {
        self.items
            .iter()
            .filter(|item| path.is_empty() || item.is_under(path))
            .collect()
    }

    /// Find the item at `path` (parents followed by the item's own text).
    pub fn find(&self, path: &[String]) -> Option<&ConfigLine> {
        let (text, parents) = path.split_last()?;
        self.items
            .iter()
            .find(|item| item.text == *text && item.parents == parents)
    }

    /// Items needed to bring `other` in line with this configuration.
    ///
    /// Each update is preceded by its ancestors, every ancestor emitted once.
    pub fn difference(
        &self,
        other: &NetworkConfig,
        path: &[String],
        diff_match: DiffMatch,
        diff_replace: DiffReplace,
    ) -> Vec<ConfigLine> {
        let ours = self.block(path);
        let theirs = other.block(path);

        let mut updates: Vec<&ConfigLine> = match diff_match {
            DiffMatch::Line => ours
                .iter()
                .copied()
                .filter(|item| !theirs.contains(item))
                .collect(),
            DiffMatch::Strict => ours
                .iter()
                .enumerate()
                .filter(|(idx, item)| theirs.get(*idx).is_none_or(|t| t.text != item.text))
                .map(|(_, item)| *item)
                .collect(),
            DiffMatch::Exact => {
                if ours.len() != theirs.len() || ours.iter().zip(&theirs).any(|(a, b)| a != b) {
                    ours
                } else {
                    Vec::new()
                }
            }
            DiffMatch::None => ours,
        };

        if diff_replace == DiffReplace::Block {
            updates = self.expand_blocks(&updates);
        }

        self.with_ancestors(&updates)
    }

    /// Dump every item in `format`.
    pub fn dumps(&self, format: DumpFormat) -> String {
        dumps(&self.items, format, self.options.indent)
    }

    /// Replace each update with the whole top-level block containing it.
    fn expand_blocks<'a>(&'a self, updates: &[&'a ConfigLine]) -> Vec<&'a ConfigLine> {
        let mut roots: Vec<String> = Vec::new();
        for item in updates {
            let root = item.parents.first().unwrap_or(&item.text);
            if !roots.contains(root) {
                roots.push(root.clone());
            }
        }

        let mut expanded = Vec::new();
        for root in &roots {
            let root_path = std::slice::from_ref(root);
            expanded.extend(
                self.items
                    .iter()
                    .filter(|item| (item.text == *root && !item.has_parents()) || item.is_under(root_path)),
            );
        }
        expanded
    }

    fn with_ancestors(&self, updates: &[&ConfigLine]) -> Vec<ConfigLine> {
        let mut visited: HashSet<Vec<String>> = HashSet::new();
        let mut expanded = Vec::new();

        for item in updates {
            for depth in 0..item.parents.len() {
                let ancestor_path = &item.parents[..=depth];
                if visited.insert(ancestor_path.to_vec()) {
                    let ancestor = self.find(ancestor_path).cloned().unwrap_or_else(|| {
                        ConfigLine::with_parents(
                            item.parents[depth].clone(),
                            item.parents[..depth].to_vec(),
                            depth,
                        )
                    });
                    expanded.push(ancestor);
                }
            }
            if visited.insert(item.path()) {
                expanded.push((*item).clone());
            }
        }

        expanded
    }

    fn is_ignored(&self, text: &str) -> bool {
        self.options
            .comment_tokens
            .iter()
            .any(|token| text.starts_with(token.as_str()))
            || self.ignore_lines.iter().any(|re| re.is_match(text))
    }

    fn parse_items(&self, contents: &str) -> Vec<ConfigLine> {
        let mut items = Vec::new();
        let mut section: Option<String> = None;
        let mut ancestors: Vec<(usize, String)> = Vec::new();

        for line in logical_lines(contents, self.options.continuation) {
            let text = line.trim();
            if text.is_empty() || self.is_ignored(text) {
                continue;
            }

            let indent = line.len() - line.trim_start().len();
            let opens_section = indent == 0
                && self
                    .options
                    .section_prefix
                    .is_some_and(|prefix| text.starts_with(prefix));

            if opens_section {
                section = Some(text.to_string());
                ancestors.clear();
                items.push(ConfigLine {
                    text: text.to_string(),
                    raw: line.clone(),
                    parents: Vec::new(),
                    level: 0,
                });
                continue;
            }

            while ancestors.last().is_some_and(|(depth, _)| *depth >= indent) {
                ancestors.pop();
            }

            let parents = section
                .iter()
                .cloned()
                .chain(ancestors.iter().map(|(_, text)| text.clone()))
                .collect();

            items.push(ConfigLine {
                text: text.to_string(),
                raw: line.clone(),
                parents,
                level: ancestors.len(),
            });
            ancestors.push((indent, text.to_string()));
        }

        items
    }
}

/// Serialize items.
///
/// - `Commands`: one command text per line, no indentation
/// - `Block`: indented by nesting level, re-parses to the same items
/// - `Raw`: source lines as loaded
pub fn dumps(items: &[ConfigLine], format: DumpFormat, indent: usize) -> String {
    let lines: Vec<String> = match format {
        DumpFormat::Commands => items.iter().map(|item| item.text.clone()).collect(),
        DumpFormat::Block => items
            .iter()
            .map(|item| format!("{}{}", " ".repeat(indent * item.level), item.text))
            .collect(),
        DumpFormat::Raw => items.iter().map(|item| item.raw.clone()).collect(),
    };
    lines.join("\n")
}

/// Split text into lines, joining continuation lines.
fn logical_lines(contents: &str, continuation: Option<char>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for line in contents.lines() {
        let line = line.trim_end_matches('\r');
        let joined = match pending.take() {
            Some(mut acc) => {
                acc.push_str(line.trim_start());
                acc
            }
            None => line.to_string(),
        };

        match continuation {
            Some(marker) if joined.trim_end().ends_with(marker) => {
                let trimmed = joined.trim_end();
                pending = Some(trimmed[..trimmed.len() - marker.len_utf8()].to_string());
            }
            _ => lines.push(joined),
        }
    }

    if let Some(acc) = pending {
        lines.push(acc);
    }
    lines
}
