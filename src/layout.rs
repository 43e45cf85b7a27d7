//! Layout trees: candidate arrangements of unwrapped lines.
//!
//! A layout tree encodes one concrete way of arranging a partition
//! subtree: leaves are unwrapped lines, inner nodes juxtapose their
//! children on one line or stack them vertically. Layout trees are
//! value-like; combinators clone them freely when a candidate is adopted
//! into a composite.

use std::fmt;
use std::mem;

use crate::partition::UnwrappedLine;
use crate::token::{BreakDecision, PreFormatToken};

/// Variant payload of a layout item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutKind {
    /// A single unwrapped line, with its rendered text and width captured
    /// at construction so the tree is self-contained.
    Line {
        line: UnwrappedLine,
        text: String,
        length: i32,
    },

    /// Children rendered side by side on one line.
    Juxtaposition,

    /// Children rendered on successive lines.
    Stack,
}

impl LayoutKind {
    /// Diagnostic name of the layout type.
    pub fn type_name(&self) -> &'static str {
        match self {
            LayoutKind::Line { .. } => "line",
            LayoutKind::Juxtaposition => "juxtaposition",
            LayoutKind::Stack => "stack",
        }
    }

    #[inline]
    fn is_same_type(&self, other: &LayoutKind) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// One node's worth of layout information.
///
/// `spaces_before` and `must_wrap` describe the subtree's first line: the
/// spacing used when the subtree is appended to the right of another
/// layout, and whether the subtree is required to begin on a fresh line.
/// For composites with children, both must equal the first child's values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutItem {
    kind: LayoutKind,
    indentation_spaces: i32,
    spaces_before: i32,
    must_wrap: bool,
}

impl LayoutItem {
    /// Create a line item, capturing width, text, and leading spacing from
    /// the token buffer.
    pub fn line(line: UnwrappedLine, tokens: &[PreFormatToken]) -> Self {
        Self::line_indented(line, tokens, 0)
    }

    /// Create a line item with an initial relative indentation.
    pub fn line_indented(
        line: UnwrappedLine,
        tokens: &[PreFormatToken],
        indentation_spaces: i32,
    ) -> Self {
        let (spaces_before, must_wrap) = if line.is_empty() {
            (0, false)
        } else {
            let first = &tokens[line.tokens_range().start];
            (
                first.before.spaces_required,
                first.before.break_decision == BreakDecision::MustWrap,
            )
        };
        let text = line.text(tokens);
        let length = line.width(tokens);
        LayoutItem {
            kind: LayoutKind::Line { line, text, length },
            indentation_spaces,
            spaces_before,
            must_wrap,
        }
    }

    /// Create a juxtaposition item.
    pub fn juxtaposition(spaces_before: i32, must_wrap: bool) -> Self {
        LayoutItem {
            kind: LayoutKind::Juxtaposition,
            indentation_spaces: 0,
            spaces_before,
            must_wrap,
        }
    }

    /// Create a stack item.
    pub fn stack(spaces_before: i32, must_wrap: bool) -> Self {
        LayoutItem {
            kind: LayoutKind::Stack,
            indentation_spaces: 0,
            spaces_before,
            must_wrap,
        }
    }

    /// Set the relative indentation, returning the modified item.
    #[must_use = "with_indentation returns a new LayoutItem"]
    pub fn with_indentation(mut self, spaces: i32) -> Self {
        self.indentation_spaces = spaces;
        self
    }

    #[inline]
    pub fn kind(&self) -> &LayoutKind {
        &self.kind
    }

    #[inline]
    pub fn indentation_spaces(&self) -> i32 {
        self.indentation_spaces
    }

    pub fn set_indentation_spaces(&mut self, spaces: i32) {
        self.indentation_spaces = spaces;
    }

    #[inline]
    pub fn spaces_before(&self) -> i32 {
        self.spaces_before
    }

    #[inline]
    pub fn must_wrap(&self) -> bool {
        self.must_wrap
    }

    /// The unwrapped line of a `Line` item, if this is one.
    pub fn as_line(&self) -> Option<&UnwrappedLine> {
        match &self.kind {
            LayoutKind::Line { line, .. } => Some(line),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LayoutKind::Line { text, length, .. } => {
                write!(f, "[ {text} ], length: {length}, ")?;
            }
            kind => write!(f, "[<{}>], ", kind.type_name())?,
        }
        write!(
            f,
            "indentation: {}, spacing: {}, must wrap: {}",
            self.indentation_spaces,
            self.spaces_before,
            if self.must_wrap { "YES" } else { "no" },
        )
    }
}

/// A rose tree of layout items; `Line` items have no children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutTree {
    item: LayoutItem,
    children: Vec<LayoutTree>,
}

impl LayoutTree {
    /// Create a leaf node.
    pub fn new(item: LayoutItem) -> Self {
        LayoutTree {
            item,
            children: Vec::new(),
        }
    }

    /// Create a node with the given children.
    pub fn with_children(item: LayoutItem, children: Vec<LayoutTree>) -> Self {
        LayoutTree { item, children }
    }

    #[inline]
    pub fn value(&self) -> &LayoutItem {
        &self.item
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut LayoutItem {
        &mut self.item
    }

    #[inline]
    pub fn children(&self) -> &[LayoutTree] {
        &self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child node.
    pub fn adopt_subtree(&mut self, subtree: LayoutTree) {
        self.children.push(subtree);
    }

    /// Adopt `source` as a child, splicing in its children instead when it
    /// has the same type as this node and no extra indentation.
    ///
    /// Splicing keeps the composite's first-child `must_wrap` and
    /// `spaces_before` consistent with its own.
    pub fn adopt_flattened(&mut self, source: &LayoutTree) {
        let src_item = source.value();
        if !source.is_leaf()
            && src_item.kind().is_same_type(self.item.kind())
            && src_item.indentation_spaces() == 0
        {
            let first = source.children[0].value();
            debug_assert_eq!(src_item.must_wrap(), first.must_wrap());
            debug_assert_eq!(src_item.spaces_before(), first.spaces_before());
            for sublayout in &source.children {
                self.adopt_subtree(sublayout.clone());
            }
        } else {
            self.adopt_subtree(source.clone());
        }
    }

    pub(crate) fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        if self.children.is_empty() {
            write!(f, "{:indent$}{{ ({}) }}", "", self.item)
        } else {
            writeln!(f, "{:indent$}{{ ({})", "", self.item)?;
            for child in &self.children {
                child.fmt_indented(f, indent + 2)?;
                writeln!(f)?;
            }
            write!(f, "{:indent$}}}", "")
        }
    }
}

impl fmt::Display for LayoutTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::InterTokenInfo;

    // Two tokens: "short_line" requiring one space, "loooooong_line"
    // starting a new line.
    fn tokens() -> Vec<PreFormatToken> {
        vec![
            PreFormatToken {
                text: "short_line".to_string(),
                before: InterTokenInfo {
                    spaces_required: 1,
                    break_decision: BreakDecision::Undecided,
                },
            },
            PreFormatToken {
                text: "loooooong_line".to_string(),
                before: InterTokenInfo {
                    spaces_required: 0,
                    break_decision: BreakDecision::MustWrap,
                },
            },
        ]
    }

    #[test]
    fn line_item_display() {
        let tokens = tokens();
        let short_line = UnwrappedLine::spanning(0, 0..1);
        let long_line = UnwrappedLine::spanning(0, 1..2);
        let empty_line = UnwrappedLine::new(0, 0);

        let item = LayoutItem::line(short_line.clone(), &tokens);
        assert_eq!(
            item.to_string(),
            "[ short_line ], length: 10, indentation: 0, spacing: 1, must wrap: no"
        );

        let item = LayoutItem::line_indented(short_line, &tokens, 3);
        assert_eq!(
            item.to_string(),
            "[ short_line ], length: 10, indentation: 3, spacing: 1, must wrap: no"
        );

        let item = LayoutItem::line_indented(long_line, &tokens, 5);
        assert_eq!(
            item.to_string(),
            "[ loooooong_line ], length: 14, indentation: 5, spacing: 0, must wrap: YES"
        );

        let item = LayoutItem::line_indented(empty_line, &tokens, 11);
        assert_eq!(
            item.to_string(),
            "[  ], length: 0, indentation: 11, spacing: 0, must wrap: no"
        );
    }

    #[test]
    fn juxtaposition_item_display() {
        let item = LayoutItem::juxtaposition(3, false).with_indentation(5);
        assert_eq!(
            item.to_string(),
            "[<juxtaposition>], indentation: 5, spacing: 3, must wrap: no"
        );

        let item = LayoutItem::juxtaposition(7, true).with_indentation(11);
        assert_eq!(
            item.to_string(),
            "[<juxtaposition>], indentation: 11, spacing: 7, must wrap: YES"
        );
    }

    #[test]
    fn stack_item_display() {
        let item = LayoutItem::stack(3, false).with_indentation(5);
        assert_eq!(
            item.to_string(),
            "[<stack>], indentation: 5, spacing: 3, must wrap: no"
        );

        let item = LayoutItem::stack(7, true).with_indentation(11);
        assert_eq!(
            item.to_string(),
            "[<stack>], indentation: 11, spacing: 7, must wrap: YES"
        );
    }

    #[test]
    fn line_item_properties() {
        let tokens = tokens();
        let short_line = UnwrappedLine::spanning(0, 0..1);
        let item = LayoutItem::line(short_line.clone(), &tokens);
        assert_eq!(item.kind().type_name(), "line");
        assert_eq!(item.indentation_spaces(), 0);
        assert_eq!(item.spaces_before(), 1);
        assert!(!item.must_wrap());
        assert_eq!(item.as_line(), Some(&short_line));

        let empty = LayoutItem::line(UnwrappedLine::new(0, 0), &tokens);
        assert_eq!(empty.spaces_before(), 0);
        assert!(!empty.must_wrap());
    }

    #[test]
    fn composite_item_properties() {
        let horizontal = LayoutItem::juxtaposition(3, false);
        assert_eq!(horizontal.kind().type_name(), "juxtaposition");
        assert_eq!(horizontal.spaces_before(), 3);
        assert!(!horizontal.must_wrap());
        assert_eq!(horizontal.as_line(), None);

        let vertical = LayoutItem::stack(3, true);
        assert_eq!(vertical.kind().type_name(), "stack");
        assert_eq!(vertical.spaces_before(), 3);
        assert!(vertical.must_wrap());
    }

    #[test]
    fn adopt_flattened_splices_same_type() {
        let tokens = tokens();
        let leaf = || LayoutTree::new(LayoutItem::line(UnwrappedLine::spanning(0, 0..1), &tokens));

        let inner = LayoutTree::with_children(
            LayoutItem::juxtaposition(1, false),
            vec![leaf(), leaf()],
        );
        let mut outer = LayoutTree::new(LayoutItem::juxtaposition(1, false));
        outer.adopt_flattened(&inner);
        assert_eq!(outer.children().len(), 2);

        // Different type: adopted whole.
        let mut stack = LayoutTree::new(LayoutItem::stack(1, false));
        stack.adopt_flattened(&inner);
        assert_eq!(stack.children().len(), 1);

        // Same type but indented: adopted whole.
        let mut indented = inner.clone();
        indented.value_mut().set_indentation_spaces(4);
        let mut outer = LayoutTree::new(LayoutItem::juxtaposition(1, false));
        outer.adopt_flattened(&indented);
        assert_eq!(outer.children().len(), 1);
    }

    #[test]
    fn tree_display_nests_children() {
        let tokens = tokens();
        let tree = LayoutTree::with_children(
            LayoutItem::stack(1, false),
            vec![LayoutTree::new(LayoutItem::line(
                UnwrappedLine::spanning(0, 0..1),
                &tokens,
            ))],
        );
        assert_eq!(
            tree.to_string(),
            "{ ([<stack>], indentation: 0, spacing: 1, must wrap: no)\n  \
             { ([ short_line ], length: 10, indentation: 0, spacing: 1, must wrap: no) }\n\
             }"
        );
    }
}
