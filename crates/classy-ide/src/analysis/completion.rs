use classy_parse::parse_exact;
use serde::Serialize;
use text_size::TextRange;

use crate::FilePosition;
use crate::vocabulary::FxIndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionKind {
    Screen,
    Variant,
    /// Opens a new `key(...)` group.
    DirectiveGroup,
    Directive,
    /// `&`, the enclosing prefix itself.
    SelfReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub kind: CompletionKind,
    pub label: String,
    pub sort_text: String,
    pub detail: Option<String>,
    /// The source text the label replaces.
    pub range: TextRange,
}

impl super::Analysis {
    /// Everything that may be typed at the cursor, ordered by sort text:
    /// groups (`#`), directives (`$`), `&`, variants (`:`), screens (`@`).
    pub fn completions(&self, FilePosition { file, offset }: FilePosition) -> Vec<Completion> {
        let db = self.db();
        let vocabulary = self.vocabulary();

        let rule = parse_exact(file.text(db), offset);
        let token = rule.raw.as_str();
        let directive = unnegated(&rule.name, rule.negated);
        let prefix = unnegated(&rule.prefix, rule.negated);
        let range = rule.loc;

        tracing::trace!(?offset, token, directive, prefix, "completions");

        let completion = |kind, label: &str, sort_text: String, detail: Option<String>| {
            Completion { kind, label: label.to_owned(), sort_text, detail, range }
        };

        let mut completions = Vec::new();

        if rule.variants.is_empty() {
            completions.extend(
                vocabulary.screens.iter().filter(|(screen, _)| screen.starts_with(token)).map(
                    |(screen, width)| {
                        completion(
                            CompletionKind::Screen,
                            &format!("{screen}:"),
                            format!("@{screen}"),
                            Some(format!("breakpoint @ {width}")),
                        )
                    },
                ),
            );
        }

        completions.extend(
            vocabulary
                .variants
                .iter()
                .filter(|variant| {
                    variant.starts_with(token)
                        && !rule.variants.iter().any(|applied| applied.name == **variant)
                })
                .map(|variant| {
                    completion(
                        CompletionKind::Variant,
                        &format!("{variant}:"),
                        format!(":{variant}"),
                        None,
                    )
                }),
        );

        let keys = vocabulary
            .utilities
            .iter()
            .map(|utility| utility.value.as_str())
            .filter(|key| key.starts_with(directive))
            .collect::<Vec<_>>();

        // `ring-off` groups `ring-offset-2` under `ring-offset`.
        let groups = keys
            .iter()
            .filter_map(|&key| {
                let dash = key[directive.len()..].find('-')?;
                Some(&key[..directive.len() + dash])
            })
            .collect::<FxIndexSet<_>>();

        for group in groups {
            if let Some(label) = relative(group, prefix) {
                completions.push(completion(
                    CompletionKind::DirectiveGroup,
                    label,
                    format!("#{group}"),
                    Some(format!("{group}(...)")),
                ));
            }
        }

        for key in keys {
            if let Some(label) = relative(key, prefix) {
                completions.push(completion(
                    CompletionKind::Directive,
                    label,
                    format!("${}", natural_sort_key(key)),
                    Some(key.to_owned()),
                ));
            }
        }

        if !prefix.is_empty() && (token.is_empty() || token == "&") {
            completions.push(completion(
                CompletionKind::SelfReference,
                "&",
                "&".to_owned(),
                Some(prefix.to_owned()),
            ));
        }

        completions.sort_by(|a, b| a.sort_text.cmp(&b.sort_text));
        completions
    }
}

fn unnegated(name: &str, negated: bool) -> &str {
    if negated { name.strip_prefix('-').unwrap_or(name) } else { name }
}

/// `key` as typed inside the `prefix(...)` group, `None` when nothing is left.
fn relative<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(key).filter(|key| !key.is_empty());
    }

    match key.strip_prefix(prefix) {
        Some(rest) => rest.strip_prefix('-').filter(|rest| !rest.is_empty()),
        None => Some(key),
    }
}

/// Pads digit runs to eight places so `ring-offset-2` sorts before
/// `ring-offset-10`.
fn natural_sort_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut digits = String::new();

    for ch in key.chars().chain(std::iter::once('\0')) {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        if !digits.is_empty() {
            let padded = format!("{digits:0>8}");
            out.push_str(&padded[padded.len() - 8..]);
            digits.clear();
        }

        if ch != '\0' {
            out.push(ch);
        }
    }

    out
}
