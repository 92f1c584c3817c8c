use text_size::{TextLen, TextRange, TextSize};

use crate::cursor::Cursor;
use crate::node::{Identifier, Node, NodeId, NodeKind, Tree, Variant};

/// Builds the tree for `text`.
///
/// With `stop`, scanning ends at that offset and whatever was collected so far
/// becomes an unterminated identifier: the token under a completion cursor.
/// `stop` is clamped to the text and rounded down to a character boundary.
pub fn build(text: &str, stop: Option<TextSize>) -> Tree {
    let stop = stop.map(|stop| {
        let mut stop = usize::from(stop).min(text.len());
        while !text.is_char_boundary(stop) {
            stop -= 1;
        }
        TextSize::new(stop as u32)
    });

    Builder::new(text, stop).run()
}

struct Builder<'a> {
    cursor: Cursor<'a>,
    tree: Tree,
    /// Enclosing group, variant or prefix identifier.
    parent: NodeId,
    /// Most recently appended node.
    node: NodeId,
    buffer: String,
    start: TextSize,
    stop: Option<TextSize>,
}

impl<'a> Builder<'a> {
    fn new(text: &'a str, stop: Option<TextSize>) -> Self {
        let tree = Tree::new(text.text_len());
        let root = tree.root();

        Self {
            cursor: Cursor::new(text),
            tree,
            parent: root,
            node: root,
            buffer: String::new(),
            start: TextSize::new(0),
            stop,
        }
    }

    fn run(mut self) -> Tree {
        let mut in_arbitrary = false;

        while !self.cursor.is_eof() {
            if self.at_stop() {
                self.push_identifier(false);
                return self.finish();
            }

            let ch = self.cursor.advance();

            if in_arbitrary || ch == '[' {
                self.buffer.push(ch);
                in_arbitrary = ch != ']';
                continue;
            }

            match ch {
                ':' => self.variant(),
                '(' => self.group(),
                ')' => self.terminate(true),
                ' ' | '\t' | '\n' | '\r' => self.terminate(false),
                _ => self.buffer.push(ch),
            }
        }

        if !self.buffer.is_empty()
            || self.tree[self.node].is_variant()
            || self.stop == Some(self.cursor.offset())
        {
            self.push_identifier(true);
        }

        self.finish()
    }

    fn variant(&mut self) {
        if self.buffer.is_empty() {
            self.start = self.cursor.offset();
            return;
        }

        let mut raw = std::mem::take(&mut self.buffer);
        raw.push(':');
        if !self.at_stop() && self.cursor.eat(':') {
            raw.push(':');
        }

        let mut start = self.start;

        // `!hover:` marks everything below the variant important.
        if let Some(rest) = raw.strip_prefix('!') {
            let bang = NodeKind::Identifier(Identifier::new("!".to_owned(), false));
            self.parent = self.append(bang, TextRange::at(start, TextSize::of('!')));
            raw = rest.to_owned();
            start += TextSize::of('!');
        }

        let range = TextRange::at(start, raw.text_len());
        self.parent = self.append(NodeKind::Variant(Variant::new(raw)), range);
        self.start = self.cursor.offset();
    }

    fn group(&mut self) {
        // A name right before `(` is the prefix of everything in the group.
        if !self.buffer.is_empty() {
            self.parent = self.push_identifier(false);
        }

        let open = self.cursor.offset() - TextSize::of('(');
        self.parent = self.append(NodeKind::Group, TextRange::at(open, TextSize::of('(')));
        self.start = self.cursor.offset();
    }

    fn terminate(&mut self, closes_group: bool) {
        if !self.buffer.is_empty() || self.tree[self.node].is_variant() {
            self.parent = self.push_identifier(true);
        }

        self.parent = self.enclosing_group(self.parent);

        let root = self.tree.root();
        if closes_group && self.parent != root {
            let end = self.cursor.offset();
            let group = &mut self.tree.nodes[self.parent];
            group.range = TextRange::new(group.range.start(), end);
            self.parent = group.parent.unwrap_or(root);
        }

        self.start = self.cursor.offset();
    }

    fn at_stop(&self) -> bool {
        self.stop.is_some_and(|stop| self.cursor.offset() >= stop)
    }

    fn push_identifier(&mut self, terminator: bool) -> NodeId {
        let raw = std::mem::take(&mut self.buffer);
        let range = TextRange::at(self.start, raw.text_len());
        self.append(NodeKind::Identifier(Identifier::new(raw, terminator)), range)
    }

    fn append(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = self.tree.nodes.alloc(Node {
            kind,
            range,
            prev: Some(self.node),
            next: None,
            parent: Some(self.parent),
        });
        self.tree.nodes[self.node].next = Some(id);
        self.node = id;
        id
    }

    fn enclosing_group(&self, id: NodeId) -> NodeId {
        self.tree.ancestors(id).find(|&id| self.tree[id].is_group()).unwrap_or(self.tree.root())
    }

    fn finish(mut self) -> Tree {
        // Groups still open extend to the end of the text.
        let end = self.tree[self.tree.root()].range.end();
        let open = self
            .tree
            .ancestors(self.parent)
            .filter(|&id| self.tree[id].is_group())
            .collect::<Vec<_>>();

        for id in open {
            let group = &mut self.tree.nodes[id];
            group.range = TextRange::new(group.range.start(), end);
        }

        self.tree
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;

    #[track_caller]
    fn check(text: &str, expect: Expect) {
        expect.assert_eq(&build(text, None).debug_dump());
    }

    #[track_caller]
    fn check_stop(text: &str, stop: u32, expect: Expect) {
        expect.assert_eq(&build(text, Some(TextSize::new(stop))).debug_dump());
    }

    #[test]
    fn empty() {
        check(
            "",
            expect![[r#"
                GROUP@0..0
            "#]],
        );
        check(
            " \t\r\n ",
            expect![[r#"
                GROUP@0..5
            "#]],
        );
    }

    #[test]
    fn variant_and_identifier() {
        check(
            "hover:underline",
            expect![[r#"
                GROUP@0..15
                  VARIANT@0..6 "hover:"
                    IDENTIFIER@6..15 "underline" terminator
            "#]],
        );
    }

    #[test]
    fn dangling_variant_gets_an_empty_identifier() {
        check(
            "focus: ",
            expect![[r#"
                GROUP@0..7
                  VARIANT@0..6 "focus:"
                    IDENTIFIER@6..6 "" terminator
            "#]],
        );
    }

    #[test]
    fn prefix_group() {
        check(
            "text(xl hover:underline) font-bold",
            expect![[r#"
                GROUP@0..34
                  IDENTIFIER@0..4 "text"
                    GROUP@4..24
                      IDENTIFIER@5..7 "xl" terminator
                      VARIANT@8..14 "hover:"
                        IDENTIFIER@14..23 "underline" terminator
                  IDENTIFIER@25..34 "font-bold" terminator
            "#]],
        );
    }

    #[test]
    fn important_variant_is_split() {
        check(
            "!hover:(a b)",
            expect![[r#"
                GROUP@0..12
                  IDENTIFIER@0..1 "!" important
                    VARIANT@1..7 "hover:"
                      GROUP@7..12
                        IDENTIFIER@8..9 "a" terminator
                        IDENTIFIER@10..11 "b" terminator
            "#]],
        );
    }

    #[test]
    fn double_colon_is_one_variant() {
        check(
            "after::content-none",
            expect![[r#"
                GROUP@0..19
                  VARIANT@0..7 "after::"
                    IDENTIFIER@7..19 "content-none" terminator
            "#]],
        );
    }

    #[test]
    fn arbitrary_values_keep_delimiters() {
        check(
            "text-[hsl(100, 50%, 10%)] grid-cols-[minmax(100px,max-content)]",
            expect![[r#"
                GROUP@0..63
                  IDENTIFIER@0..25 "text-[hsl(100, 50%, 10%)]" terminator
                  IDENTIFIER@26..63 "grid-cols-[minmax(100px,max-content)]" terminator
            "#]],
        );
    }

    #[test]
    fn unterminated_group_extends_to_end() {
        check(
            "ring(focus:& offset(& width)",
            expect![[r#"
                GROUP@0..28
                  IDENTIFIER@0..4 "ring"
                    GROUP@4..28
                      VARIANT@5..11 "focus:"
                        IDENTIFIER@11..12 "&" terminator
                      IDENTIFIER@13..19 "offset"
                        GROUP@19..28
                          IDENTIFIER@20..21 "&" terminator
                          IDENTIFIER@22..27 "width" terminator
            "#]],
        );
    }

    #[test]
    fn stray_delimiters_are_ignored() {
        check(
            ") : a)) :b",
            expect![[r#"
                GROUP@0..10
                  IDENTIFIER@4..5 "a" terminator
                  IDENTIFIER@9..10 "b" terminator
            "#]],
        );
    }

    #[test]
    fn stop_inside_token() {
        check_stop(
            "text(lg md:xl)",
            10,
            expect![[r#"
                GROUP@0..14
                  IDENTIFIER@0..4 "text"
                    GROUP@4..14
                      IDENTIFIER@5..7 "lg" terminator
                      IDENTIFIER@8..10 "md"
            "#]],
        );
    }

    #[test]
    fn stop_after_open_paren() {
        check_stop(
            "text( \t\n",
            6,
            expect![[r#"
                GROUP@0..8
                  IDENTIFIER@0..4 "text"
                    GROUP@4..8
                      IDENTIFIER@6..6 ""
            "#]],
        );
    }

    #[test]
    fn stop_at_end_terminates() {
        check_stop(
            "underline ",
            10,
            expect![[r#"
                GROUP@0..10
                  IDENTIFIER@0..9 "underline" terminator
                  IDENTIFIER@10..10 "" terminator
            "#]],
        );
    }

    #[test]
    fn stop_between_double_colon() {
        check_stop(
            "after::x",
            6,
            expect![[r#"
                GROUP@0..8
                  VARIANT@0..6 "after:"
                    IDENTIFIER@6..6 ""
            "#]],
        );
    }

    #[test]
    fn stop_is_clamped() {
        let tree = build("mx", Some(TextSize::new(40)));
        let last = tree[tree.last()].as_identifier().unwrap();
        assert_eq!(last.raw, "mx");
        assert!(last.terminator);
    }

    #[test]
    fn every_identifier_spans_its_raw_text() {
        let text = "-mx(5 sm:2! xl:8) :x !hover:(a) [lang]:b";
        let tree = build(text, None);

        for id in tree.iter() {
            if let Some(identifier) = tree[id].as_identifier() {
                assert_eq!(&text[tree[id].range], identifier.raw);
            }
        }
    }
}
