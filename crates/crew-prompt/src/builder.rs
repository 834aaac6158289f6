//! Fluent prompt builder
//!
//! [`PromptBuilder`] assembles prompts piece by piece. Agent personas and task
//! instructions are built with it so that every prompt in the crew shares the
//! same section layout.

/// A fluent builder for constructing prompts
///
/// # Examples
///
/// ```
/// use crew_prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .text("You are Researcher.")
///     .blank_line()
///     .section("Tools")
///     .bullet("Stock News: news about a ticker")
///     .when(false, "never shown")
///     .build();
///
/// assert!(prompt.contains("## Tools"));
/// assert!(prompt.contains("- Stock News"));
/// assert!(!prompt.contains("never shown"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add static text
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.parts.push(content.into());
        self
    }

    /// Add a line of text followed by a newline
    pub fn line(self, content: impl Into<String>) -> Self {
        self.text(content).newline()
    }

    /// Add a newline
    pub fn newline(self) -> Self {
        self.text("\n")
    }

    /// Add a blank line (two newlines)
    pub fn blank_line(self) -> Self {
        self.text("\n\n")
    }

    /// Add a section header (markdown h2)
    pub fn section(self, title: impl Into<String>) -> Self {
        self.text(format!("\n## {}\n", title.into()))
    }

    /// Add content conditionally
    pub fn when(self, condition: bool, content: impl Into<String>) -> Self {
        if condition { self.text(content) } else { self }
    }

    /// Add a bullet point
    pub fn bullet(self, content: impl Into<String>) -> Self {
        self.text(format!("- {}\n", content.into()))
    }

    /// Add multiple bullet points
    pub fn bullets<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            self = self.bullet(item);
        }
        self
    }

    /// Add a labelled value on its own line
    pub fn field(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.text(format!("{}: {}\n", key.into(), value.into()))
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        self.parts.concat()
    }

    /// Build with surrounding whitespace trimmed
    pub fn build_trimmed(self) -> String {
        self.build().trim().to_string()
    }

    /// Check if the builder is empty
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<PromptBuilder> for String {
    fn from(builder: PromptBuilder) -> Self {
        builder.build()
    }
}
