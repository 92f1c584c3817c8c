use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::Snippet;
pub use text_size::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
    Info,
    Note,
    Help,
}

impl From<Level> for annotate_snippets::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Self::Error,
            Level::Warning => Self::Warning,
            Level::Info => Self::Info,
            Level::Note => Self::Note,
            Level::Help => Self::Help,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    range: TextRange,
    level: Level,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range, level }
    }

    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(Level::Error, message, range)
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(Level::Warning, message, range)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = annotate_snippets::Level::from(self.level);
        let message = level.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}
