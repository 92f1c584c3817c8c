use classy_db::{Diagnostic, File};
use rustc_hash::FxHashSet;

impl super::Analysis {
    /// Unknown variants and utilities, as warnings.
    ///
    /// A variant applied to a whole group is reported once, at the variant.
    pub fn diagnostics(&self, file: File) -> Vec<Diagnostic> {
        let db = self.db();
        let vocabulary = self.vocabulary();

        let mut seen = FxHashSet::default();
        let mut diagnostics = Vec::new();

        for rule in file.rules(db) {
            for variant in &rule.variants {
                if !vocabulary.is_known_variant(&variant.name) && seen.insert(variant.loc) {
                    diagnostics.push(Diagnostic::warning(
                        format!("unknown variant `{}`", variant.value),
                        variant.loc,
                    ));
                }
            }

            let name = if rule.negated { &rule.name[1..] } else { rule.name.as_str() };
            if !vocabulary.is_known_utility(name) {
                diagnostics.push(Diagnostic::warning(
                    format!("unknown directive `{}`", rule.name),
                    rule.loc,
                ));
            }
        }

        tracing::debug!(path = %file.path(db), count = diagnostics.len(), "diagnostics");
        diagnostics
    }
}
