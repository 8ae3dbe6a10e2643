//! A single parsed configuration item.

use std::fmt;

/// One configuration line with its ancestry.
///
/// Two lines are equal when their text and their parents are equal; the
/// original spelling and the indentation level do not take part.
#[derive(Debug, Clone, Eq)]
pub struct ConfigLine {
    /// Whitespace-trimmed command text.
    pub text: String,

    /// The line as it appeared in the source, continuations joined.
    pub raw: String,

    /// Texts of the ancestors, outermost first.
    pub parents: Vec<String>,

    /// Indentation depth below the enclosing section or top level.
    pub level: usize,
}

impl ConfigLine {
    /// Create a top-level line.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw: text.clone(),
            text,
            parents: Vec::new(),
            level: 0,
        }
    }

    /// Create a line nested under `parents`.
    pub fn with_parents(text: impl Into<String>, parents: Vec<String>, level: usize) -> Self {
        let mut line = Self::new(text);
        line.parents = parents;
        line.level = level;
        line
    }

    /// Whether this line has any ancestors.
    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Whether this line sits at or below `path`.
    pub fn is_under(&self, path: &[String]) -> bool {
        self.parents.len() >= path.len() && self.parents[..path.len()] == *path
    }

    /// Full path of this line: its parents followed by its own text.
    pub fn path(&self) -> Vec<String> {
        let mut path = self.parents.clone();
        path.push(self.text.clone());
        path
    }
}

impl PartialEq for ConfigLine {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.parents == other.parents
    }
}

impl std::hash::Hash for ConfigLine {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.parents.hash(state);
    }
}

impl fmt::Display for ConfigLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_raw_and_level() {
        let a = ConfigLine::with_parents("add name=br0", vec!["/interface bridge".into()], 0);
        let mut b = a.clone();
        b.raw = "add   name=br0".into();
        b.level = 2;
        assert_eq!(a, b);

        let c = ConfigLine::new("add name=br0");
        assert_ne!(a, c);
    }

    #[test]
    fn test_is_under() {
        let line = ConfigLine::with_parents(
            "set disabled=no",
            vec!["/ip service".into(), "www".into()],
            1,
        );
        assert!(line.is_under(&[]));
        assert!(line.is_under(&["/ip service".to_string()]));
        assert!(!line.is_under(&["/ip address".to_string()]));
        assert_eq!(line.path().len(), 3);
    }
}
