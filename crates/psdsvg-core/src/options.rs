//! Configuration options for markup serialization

/// Options for markup serialization
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Tag rendered for nodes without a tag name
    pub fallback_tag: String,

    /// Tags rendered self-closing, without content
    pub self_closing_tags: Vec<String>,
}

impl Options {
    /// Check if a tag renders self-closing
    pub fn is_self_closing(&self, tag_name: &str) -> bool {
        self.self_closing_tags.iter().any(|tag| tag == tag_name)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fallback_tag: "p".to_string(),
            self_closing_tags: vec!["input".to_string(), "img".to_string()],
        }
    }
}
