//! Editor features on top of the rule parser: completion, hover and
//! diagnostics against a [`Vocabulary`].

mod analysis;
#[cfg(test)]
mod fixture;
mod vocabulary;

pub use analysis::Analysis;
pub use analysis::completion::{Completion, CompletionKind};
pub use analysis::hover::{CssGenerator, Hover};
pub use classy_db::{Diagnostic, File};
pub use classy_parse::Rule;
use text_size::TextSize;
pub use vocabulary::{Interpolation, Utility, Vocabulary};

#[derive(Debug, Clone, Copy)]
pub struct FilePosition {
    pub file: File,
    pub offset: TextSize,
}
