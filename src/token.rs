//! Pre-format token model.
//!
//! The engine consumes tokens that have already been annotated by upstream
//! spacing rules: each token knows how many spaces it requires before
//! itself and whether a break decision has been made for it. The optimizer
//! only reads widths and promotes break decisions; it never re-tokenizes.

/// Line break decision for the position before a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BreakDecision {
    /// No decision yet; the optimizer may append or wrap.
    #[default]
    Undecided,

    /// The token must stay on the same line as its predecessor.
    MustAppend,

    /// The token must begin a new line.
    MustWrap,
}

/// Spacing annotations for the position before a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterTokenInfo {
    /// Spaces required between this token and its predecessor.
    pub spaces_required: i32,

    /// Break decision for this position.
    pub break_decision: BreakDecision,
}

/// A token with pre-computed inter-token spacing annotations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreFormatToken {
    /// Token text as it will be rendered.
    pub text: String,

    /// Annotations for the position before this token.
    pub before: InterTokenInfo,
}

impl PreFormatToken {
    /// Create a token with default (undecided, zero-space) annotations.
    pub fn new(text: impl Into<String>) -> Self {
        PreFormatToken {
            text: text.into(),
            before: InterTokenInfo::default(),
        }
    }

    /// Rendered width of the token text, in columns.
    #[inline]
    pub fn width(&self) -> i32 {
        self.text.len() as i32
    }
}
