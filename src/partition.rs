//! Token partition trees.
//!
//! A partition tree groups a buffer of pre-format tokens into nested
//! unwrapped lines. Each node carries a partition policy that tells the
//! optimizer how the node's children may be combined. Leaf values are the
//! unwrapped lines themselves: contiguous token ranges that render on one
//! logical line absent further breaks.

use std::fmt;
use std::ops::Range;

use crate::token::PreFormatToken;

/// Strategy for combining a partition node's children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PartitionPolicy {
    /// No policy assigned; hitting this during optimization is a bug in
    /// the partition-tree producer.
    #[default]
    Uninitialized,

    /// Children always go on separate lines.
    AlwaysExpand,

    /// Children fit on one line if possible, otherwise wrap.
    FitOnLineElseExpand,

    /// Children were aligned by a tabular pass; kept on separate lines.
    TabularAlignment,

    /// The subtree is already formatted and must not be re-optimized.
    AlreadyFormatted,

    /// Children are appended while they fit, wrapping the remainder.
    AppendFittingSubPartitions,

    /// Two-child function call form: header plus argument group.
    OptimalFunctionCallLayout,
}

impl fmt::Display for PartitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartitionPolicy::Uninitialized => "uninitialized",
            PartitionPolicy::AlwaysExpand => "always-expand",
            PartitionPolicy::FitOnLineElseExpand => "fit-else-expand",
            PartitionPolicy::TabularAlignment => "tabular-alignment",
            PartitionPolicy::AlreadyFormatted => "already-formatted",
            PartitionPolicy::AppendFittingSubPartitions => "append-fitting-sub-partitions",
            PartitionPolicy::OptimalFunctionCallLayout => "optimal-function-call-layout",
        };
        f.write_str(name)
    }
}

/// A contiguous token range rendered on a single logical line.
///
/// The line does not own its tokens; it indexes into the shared pre-format
/// token buffer. Width and text are computed on demand against that
/// buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnwrappedLine {
    indentation_spaces: i32,
    tokens: Range<usize>,
    partition_policy: PartitionPolicy,
}

impl UnwrappedLine {
    /// Create an empty line starting at `start` in the token buffer.
    pub fn new(indentation_spaces: i32, start: usize) -> Self {
        UnwrappedLine {
            indentation_spaces,
            tokens: start..start,
            partition_policy: PartitionPolicy::default(),
        }
    }

    /// Create a line spanning the given token range.
    pub fn spanning(indentation_spaces: i32, tokens: Range<usize>) -> Self {
        UnwrappedLine {
            indentation_spaces,
            tokens,
            partition_policy: PartitionPolicy::default(),
        }
    }

    /// Extend the line's token range up to (but not including) `end`.
    pub fn span_up_to_token(&mut self, end: usize) {
        debug_assert!(end >= self.tokens.start);
        self.tokens.end = end;
    }

    /// The token index range this line covers.
    #[inline]
    pub fn tokens_range(&self) -> Range<usize> {
        self.tokens.clone()
    }

    /// Whether the line covers no tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn indentation_spaces(&self) -> i32 {
        self.indentation_spaces
    }

    pub fn set_indentation_spaces(&mut self, spaces: i32) {
        self.indentation_spaces = spaces;
    }

    #[inline]
    pub fn partition_policy(&self) -> PartitionPolicy {
        self.partition_policy
    }

    pub fn set_partition_policy(&mut self, policy: PartitionPolicy) {
        self.partition_policy = policy;
    }

    /// Rendered width of the line: token widths plus required spacing.
    ///
    /// The first token's own leading spacing is excluded; indentation is
    /// applied separately during reconstruction.
    pub fn width(&self, tokens: &[PreFormatToken]) -> i32 {
        let mut width = 0;
        for (i, token) in tokens[self.tokens.clone()].iter().enumerate() {
            if i > 0 {
                width += token.before.spaces_required;
            }
            width += token.width();
        }
        width
    }

    /// Rendered text of the line, with required inter-token spacing.
    pub fn text(&self, tokens: &[PreFormatToken]) -> String {
        let mut text = String::new();
        for (i, token) in tokens[self.tokens.clone()].iter().enumerate() {
            if i > 0 {
                for _ in 0..token.before.spaces_required {
                    text.push(' ');
                }
            }
            text.push_str(&token.text);
        }
        text
    }
}

/// A rose tree of unwrapped lines with partition policies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPartitionTree {
    value: UnwrappedLine,
    children: Vec<TokenPartitionTree>,
}

impl TokenPartitionTree {
    /// Create a leaf node.
    pub fn new(value: UnwrappedLine) -> Self {
        TokenPartitionTree {
            value,
            children: Vec::new(),
        }
    }

    /// Create a node with the given children.
    pub fn with_children(value: UnwrappedLine, children: Vec<TokenPartitionTree>) -> Self {
        TokenPartitionTree { value, children }
    }

    #[inline]
    pub fn value(&self) -> &UnwrappedLine {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut UnwrappedLine {
        &mut self.value
    }

    #[inline]
    pub fn children(&self) -> &[TokenPartitionTree] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<TokenPartitionTree> {
        &mut self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child node.
    pub fn adopt_subtree(&mut self, subtree: TokenPartitionTree) {
        self.children.push(subtree);
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let range = self.value.tokens_range();
        write!(
            f,
            "{:indent$}[{}..{}) indent: {}, policy: {}",
            "",
            range.start,
            range.end,
            self.value.indentation_spaces(),
            self.value.partition_policy(),
        )?;
        for child in &self.children {
            writeln!(f)?;
            child.fmt_indented(f, indent + 2)?;
        }
        Ok(())
    }
}

impl fmt::Display for TokenPartitionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
