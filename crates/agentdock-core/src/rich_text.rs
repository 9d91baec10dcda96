//! Structured message content for agent entries.
//!
//! Agent replies and failure notices are stored as a list of segments rather
//! than markup strings. Hosts decide how each emphasis looks; the transcript
//! model never carries raw markup.

/// Semantic emphasis for a run of text (UI-agnostic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    Plain,
    /// Headline of a notice.
    Strong,
    /// Shell command or identifier.
    Code,
    /// Secondary hint text.
    Muted,
}

/// One piece of rich text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of text. Never contains `\n`.
    Text { text: String, emphasis: Emphasis },
    /// A visual line break.
    LineBreak,
}

/// Ordered rich-text content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    segments: Vec<Segment>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds rich text from a plain string, turning every `\n` into a
    /// [`Segment::LineBreak`].
    ///
    /// `\r\n` pairs are treated as a single break.
    pub fn from_plain(text: &str) -> Self {
        let mut rich = Self::new();
        rich.push_plain(text, Emphasis::Plain);
        rich
    }

    /// Appends text with the given emphasis, splitting on newlines.
    pub fn push_plain(&mut self, text: &str, emphasis: Emphasis) -> &mut Self {
        let mut lines = text.split('\n').peekable();
        let mut first = true;
        while let Some(line) = lines.next() {
            if !first {
                self.segments.push(Segment::LineBreak);
            }
            first = false;
            // Only a `\r` directly before a `\n` belongs to the break.
            let line = if lines.peek().is_some() {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            };
            if !line.is_empty() {
                self.segments.push(Segment::Text {
                    text: line.to_string(),
                    emphasis,
                });
            }
        }
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.push_plain(text, Emphasis::Plain)
    }

    pub fn strong(&mut self, text: &str) -> &mut Self {
        self.push_plain(text, Emphasis::Strong)
    }

    pub fn code(&mut self, text: &str) -> &mut Self {
        self.push_plain(text, Emphasis::Code)
    }

    pub fn muted(&mut self, text: &str) -> &mut Self {
        self.push_plain(text, Emphasis::Muted)
    }

    pub fn line_break(&mut self) -> &mut Self {
        self.segments.push(Segment::LineBreak);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splits the content into display lines at each line break.
    ///
    /// Each returned line is a list of `(text, emphasis)` runs; an empty list
    /// is a blank line.
    pub fn lines(&self) -> Vec<Vec<(&str, Emphasis)>> {
        let mut lines = vec![Vec::new()];
        for segment in &self.segments {
            match segment {
                Segment::Text { text, emphasis } => {
                    if let Some(line) = lines.last_mut() {
                        line.push((text.as_str(), *emphasis));
                    }
                }
                Segment::LineBreak => lines.push(Vec::new()),
            }
        }
        lines
    }

    /// Flattens to plain text, rendering line breaks as `\n`.
    pub fn to_plain(&self) -> String {
        self.lines()
            .iter()
            .map(|runs| runs.iter().map(|(text, _)| *text).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        Self::from_plain(text)
    }
}
