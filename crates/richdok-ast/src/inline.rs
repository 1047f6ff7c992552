//! Inline leaf nodes
//!
//! This module defines the leaf node of the AST: a run of literal text
//! carrying a set of character-level style names (e.g. `BOLD`, `ITALIC`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// An insertion-ordered set of inline style names
///
/// Styles keep the order in which they were first added; adding a style
/// that is already present is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct StyleSet(Vec<String>);

impl StyleSet {
    /// Create an empty style set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a style, returning `false` if it was already present
    pub fn insert(&mut self, style: impl Into<String>) -> bool {
        let style = style.into();
        if self.contains(&style) {
            return false;
        }
        self.0.push(style);
        true
    }

    /// Check whether a style is present
    pub fn contains(&self, style: &str) -> bool {
        self.0.iter().any(|s| s == style)
    }

    /// Iterate styles in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StyleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = StyleSet::new();
        for style in iter {
            set.insert(style);
        }
        set
    }
}

impl From<Vec<String>> for StyleSet {
    fn from(styles: Vec<String>) -> Self {
        styles.into_iter().collect()
    }
}

impl From<StyleSet> for Vec<String> {
    fn from(set: StyleSet) -> Self {
        set.0
    }
}

impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.join(", "))
    }
}

/// A leaf node: literal text with a set of styles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineNode {
    /// Styles applied to every character of `text`
    pub styles: StyleSet,
    /// The literal text
    pub text: String,
}

impl InlineNode {
    /// Create an unstyled inline node
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            styles: StyleSet::new(),
            text: text.into(),
        }
    }

    /// Add a style to this node
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.styles.insert(style);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_set_dedup_keeps_first_position() {
        let set: StyleSet = ["BOLD", "ITALIC", "BOLD"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["BOLD", "ITALIC"]);
    }

    #[test]
    fn test_style_set_insert() {
        let mut set = StyleSet::new();
        assert!(set.insert("CODE"));
        assert!(!set.insert("CODE"));
        assert!(set.contains("CODE"));
        assert!(!set.contains("BOLD"));
    }

    #[test]
    fn test_style_set_display() {
        let set: StyleSet = ["BOLD", "ITALIC"].into_iter().collect();
        assert_eq!(set.to_string(), "{BOLD, ITALIC}");
    }

    #[test]
    fn test_inline_builder() {
        let inline = InlineNode::new("hi").with_style("BOLD");
        assert_eq!(inline.text, "hi");
        assert!(inline.styles.contains("BOLD"));
    }

    #[test]
    fn test_style_set_serde_as_array() {
        let set: StyleSet = ["BOLD"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["BOLD"]"#);
        let back: StyleSet = serde_json::from_str(r#"["A","A","B"]"#).unwrap();
        assert_eq!(back.len(), 2);
    }
}
