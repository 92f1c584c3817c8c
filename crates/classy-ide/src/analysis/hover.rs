use classy_parse::Rule;
use serde::Serialize;
use text_size::TextRange;

use crate::FilePosition;

/// Produces the CSS a rule stands for.
pub trait CssGenerator {
    fn css(&self, rule: &Rule) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub value: String,
    /// Covers every span of the rule, group syntax in between included.
    pub range: TextRange,
    pub css: Option<String>,
}

impl super::Analysis {
    pub fn hover(&self, position: FilePosition) -> Option<Hover> {
        self.hover_with(position, self.vocabulary())
    }

    pub fn hover_with(
        &self,
        FilePosition { file, offset }: FilePosition,
        generator: &dyn CssGenerator,
    ) -> Option<Hover> {
        let rule = file
            .rules(self.db())
            .iter()
            .find(|rule| rule.spans.iter().any(|span| span.contains(offset)))?;

        tracing::trace!(?offset, rule = %rule.value, "hover");

        let range = rule.spans.iter().copied().reduce(TextRange::cover)?;
        Some(Hover { value: rule.value.clone(), range, css: generator.css(rule) })
    }
}
