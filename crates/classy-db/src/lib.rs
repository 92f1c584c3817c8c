use camino::Utf8PathBuf;
pub use classy_errors::Diagnostic;
use classy_parse::Rule;
pub use line_index::LineIndex;

#[salsa::db]
#[derive(Clone, Default)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}

/// A buffer of utility classes, usually one `class` attribute or template
/// literal. Newlines are plain delimiters.
#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn salsa::Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }

    /// Every rule of the file, re-parsed only when the text changes.
    #[salsa::tracked(returns(ref))]
    pub fn rules(self, db: &dyn salsa::Database) -> Vec<Rule> {
        let rules = classy_parse::parse(self.text(db));
        tracing::debug!(path = %self.path(db), rules = rules.len(), "parsed file");
        rules
    }
}
