//! Rebuilding a partition tree from an optimal layout.
//!
//! The reconstructor flattens a layout tree into a sequence of unwrapped
//! lines: juxtapositions extend the line currently open for appending,
//! stacks close it and open new ones at the computed indentation. The
//! resulting lines replace the optimized partition node's children, and
//! token break decisions are updated to pin the chosen arrangement.

use tracing::warn;

use crate::layout::{LayoutKind, LayoutTree};
use crate::partition::{PartitionPolicy, TokenPartitionTree, UnwrappedLine};
use crate::token::{BreakDecision, PreFormatToken};

/// Reconstructs unwrapped lines from a layout tree.
pub struct TreeReconstructor {
    current_indentation_spaces: i32,
    unwrapped_lines: Vec<UnwrappedLine>,
    /// Whether the last emitted line is open for appending.
    active: bool,
}

impl TreeReconstructor {
    /// Create a reconstructor emitting lines at the given root
    /// indentation.
    pub fn new(indentation_spaces: i32) -> Self {
        TreeReconstructor {
            current_indentation_spaces: indentation_spaces,
            unwrapped_lines: Vec::new(),
            active: false,
        }
    }

    /// Flatten `layout_tree` into unwrapped lines.
    pub fn traverse_tree(&mut self, layout_tree: &LayoutTree, tokens: &[PreFormatToken]) {
        let relative_indentation = layout_tree.value().indentation_spaces();
        let saved_indentation = self.current_indentation_spaces;
        self.current_indentation_spaces += relative_indentation;

        // Indentation on a subtree that continues an open line cannot take
        // effect; the partition producer asked for something that will not
        // happen.
        if relative_indentation > 0 && self.active {
            warn!("discarding indentation of a line that's going to be appended");
        }

        match layout_tree.value().kind() {
            LayoutKind::Line { line, .. } => {
                assert!(
                    layout_tree.is_leaf(),
                    "line layout items cannot have children"
                );
                if self.active {
                    let last = self
                        .unwrapped_lines
                        .last_mut()
                        .expect("an active line has been emitted");
                    last.span_up_to_token(line.tokens_range().end);
                } else {
                    let mut uwline = line.clone();
                    uwline.set_indentation_spaces(self.current_indentation_spaces);
                    // Prevent later passes from re-breaking optimized lines.
                    uwline.set_partition_policy(PartitionPolicy::AlreadyFormatted);
                    self.unwrapped_lines.push(uwline);
                    self.active = true;
                }
            }

            LayoutKind::Juxtaposition => {
                for child in layout_tree.children() {
                    self.traverse_tree(child, tokens);
                }
            }

            LayoutKind::Stack => {
                let children = layout_tree.children();
                if children.is_empty() {
                    // Nothing to lay out.
                } else if children.len() == 1 {
                    self.traverse_tree(&children[0], tokens);
                } else {
                    // Indentation for the second and further lines: the
                    // current indent, or the open line's end column plus
                    // the stack's leading spacing when appending.
                    let indentation = if self.active {
                        let line = self
                            .unwrapped_lines
                            .last()
                            .expect("an active line has been emitted");
                        line.indentation_spaces()
                            + line.width(tokens)
                            + layout_tree.value().spaces_before()
                    } else {
                        self.current_indentation_spaces
                    };

                    self.traverse_tree(&children[0], tokens);

                    let saved = self.current_indentation_spaces;
                    self.current_indentation_spaces = indentation;
                    for child in &children[1..] {
                        self.active = false;
                        self.traverse_tree(child, tokens);
                    }
                    self.current_indentation_spaces = saved;
                }
            }
        }

        self.current_indentation_spaces = saved_indentation;
    }

    /// Replace `node`'s subtree with the emitted lines and pin the chosen
    /// break decisions on the affected tokens.
    pub fn replace_token_partition_tree_node(
        self,
        node: &mut TokenPartitionTree,
        tokens: &mut [PreFormatToken],
    ) {
        assert!(
            !self.unwrapped_lines.is_empty(),
            "reconstruction produced no unwrapped lines"
        );

        let first_line = &self.unwrapped_lines[0];
        let last_line = self
            .unwrapped_lines
            .last()
            .expect("checked non-empty above");

        let mut value = first_line.clone();
        value.span_up_to_token(last_line.tokens_range().end);
        value.set_indentation_spaces(self.current_indentation_spaces);
        // Marks the node as optimized; downstream passes must not redo it.
        value.set_partition_policy(PartitionPolicy::OptimalFunctionCallLayout);
        *node.value_mut() = value;

        node.children_mut().clear();
        for uwline in self.unwrapped_lines {
            if !uwline.is_empty() {
                let range = uwline.tokens_range();

                // The line's original leading spacing is superseded by the
                // partition's indentation.
                tokens[range.start].before.break_decision = BreakDecision::MustWrap;
                tokens[range.start].before.spaces_required = 0;

                for token in &mut tokens[range.start + 1..range.end] {
                    if token.before.break_decision == BreakDecision::Undecided {
                        token.before.break_decision = BreakDecision::MustAppend;
                    }
                }
            }
            node.adopt_subtree(TokenPartitionTree::new(uwline));
        }
    }
}
