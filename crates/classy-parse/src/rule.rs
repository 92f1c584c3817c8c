use classy_syntax::{NodeId, NodeKind, Tree};
use serde::Serialize;
use text_size::TextRange;

/// A fully qualified utility, flattened out of its groups and variants.
///
/// Rules own all their data and keep no reference into the tree they were
/// materialized from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Source text of the terminal identifier only.
    pub raw: String,
    /// Variants, `!` and name joined: `sm:!-mx-2`.
    pub value: String,
    /// `-`-joined name chain of all enclosing prefixes, with `-` in front if
    /// negated.
    pub name: String,
    /// The name chain without the terminal identifier.
    pub prefix: String,
    pub negated: bool,
    pub important: bool,
    pub variants: Vec<RuleVariant>,
    pub loc: TextRange,
    /// Disjoint source fragments that make up this rule, contiguous fragments
    /// merged. Group syntax in between is skipped.
    pub spans: Vec<TextRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleVariant {
    pub raw: String,
    /// `hover:` or `after::`.
    pub value: String,
    /// `hover` or `after:`.
    pub name: String,
    pub loc: TextRange,
}

/// Materializes the rule ending in `identifier` by walking its parent chain.
pub(crate) fn to_rule(tree: &Tree, identifier: NodeId) -> Rule {
    let mut names = Vec::new();
    let mut variants = Vec::new();
    let mut spans: Vec<TextRange> = Vec::new();
    let mut negated = false;
    let mut important = false;

    // Collected leaf to root, reversed below.
    for id in tree.ancestors(identifier) {
        let node = &tree[id];

        match &node.kind {
            NodeKind::Group => continue,
            NodeKind::Identifier(it) => {
                negated |= it.negated;
                important |= it.important;
                names.push(it.name.as_str());
            }
            NodeKind::Variant(variant) => variants.push(RuleVariant {
                raw: variant.raw.clone(),
                value: variant.value.clone(),
                name: variant.name.clone(),
                loc: node.range,
            }),
        }

        match spans.last_mut() {
            Some(first) if first.start() == node.range.end() => {
                *first = TextRange::new(node.range.start(), first.end());
            }
            _ => spans.push(node.range),
        }
    }

    names.reverse();
    variants.reverse();
    spans.reverse();

    let mut name = join_names(&names);
    if negated {
        name.insert(0, '-');
    }

    let mut prefix = join_names(&names[..names.len().saturating_sub(1)]);
    if negated && !prefix.is_empty() {
        prefix.insert(0, '-');
    }

    let mut value = variants.iter().map(|variant| variant.value.as_str()).collect::<String>();
    if important {
        value.push('!');
    }
    value.push_str(&name);

    let raw = tree[identifier].as_identifier().map(|it| it.raw.clone()).unwrap_or_default();

    Rule {
        raw,
        value,
        name,
        prefix,
        negated,
        important,
        variants,
        loc: tree[identifier].range,
        spans,
    }
}

/// `&` stands for the enclosing prefix and adds nothing of its own.
fn join_names(parts: &[&str]) -> String {
    parts.iter().filter(|&&part| part != "&" && !part.is_empty()).fold(
        String::new(),
        |mut name, part| {
            if !name.is_empty() {
                name.push('-');
            }
            name.push_str(part);
            name
        },
    )
}
