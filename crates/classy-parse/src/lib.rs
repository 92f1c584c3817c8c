//! Rules out of utility-class strings, for the whole buffer or for a cursor.
//!
//! All three entry points share one tree builder, so the exact completion
//! mode and the full parse never disagree on the grammar. Every call builds a
//! fresh tree; nothing is shared between calls.

mod rule;

use classy_syntax::{Tree, build};
pub use rule::{Rule, RuleVariant};
use text_size::{TextRange, TextSize};

/// Every rule of `text` in source order.
pub fn parse(text: &str) -> Vec<Rule> {
    rules(&build(text, None))
}

/// Rules whose spans contain `position`.
///
/// When the cursor sits in dead space (whitespace, right behind `(`), falls
/// back to all rules of the innermost group around the cursor.
pub fn parse_at(text: &str, position: TextSize) -> Vec<Rule> {
    let tree = build(text, None);
    let rules = rules(&tree);

    let at_position = |rule: &Rule| rule.spans.iter().any(|span| span.contains(position));
    if rules.iter().any(at_position) {
        return rules.into_iter().filter(at_position).collect();
    }

    let group = innermost_group(&tree, position);
    rules
        .into_iter()
        .filter(|rule| rule.spans.iter().any(|span| group.contains_range(*span)))
        .collect()
}

/// The rule being typed at `position`, which may still be unterminated.
pub fn parse_exact(text: &str, position: TextSize) -> Rule {
    let mut tree = build(text, Some(position));

    let last = tree.last();
    let identifier = match tree[last].as_identifier() {
        Some(_) => last,
        None => tree.append_placeholder(last),
    };

    rule::to_rule(&tree, identifier)
}

fn rules(tree: &Tree) -> Vec<Rule> {
    tree.terminal_identifiers().map(|id| rule::to_rule(tree, id)).collect()
}

fn innermost_group(tree: &Tree, position: TextSize) -> TextRange {
    tree.iter()
        .map(|id| &tree[id])
        .filter(|node| node.is_group() && node.range.contains(position))
        .map(|node| node.range)
        .last()
        .unwrap_or(tree[tree.root()].range)
}
