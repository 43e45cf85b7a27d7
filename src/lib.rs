//! Optimal code layout engine.
//!
//! Selects the line-breaking and indentation arrangement of a token
//! partition tree that minimizes a cost function under a column limit,
//! following Phillip Yelland's "A New Approach to Optimal Code
//! Formatting".
//!
//! # Quick Start
//!
//! ```ignore
//! use optfmt::{optimize_token_partition_tree, Style};
//!
//! optimize_token_partition_tree(&Style::default(), &mut partition, &mut tokens);
//! ```
//!
//! # Architecture
//!
//! The engine is built in layers, leaves first:
//!
//! 1. **Layout trees** ([`layout`]): candidate arrangements — lines,
//!    juxtapositions, stacks — as value-like rose trees
//! 2. **Cost functions** ([`function`]): piecewise-linear cost of a
//!    candidate as a function of its starting column, stored as knot lists
//! 3. **Combinators** ([`factory`]): `Line`, `Indent`, `Juxtaposition`,
//!    `Stack`, `Choice`, and `Wrap`, each combining knot lists in a single
//!    left-to-right pass
//! 4. **Optimizer** ([`optimizer`]): walks the partition tree bottom-up,
//!    dispatching on partition policies, and picks the layout active at
//!    the root indentation
//! 5. **Reconstruction** ([`reconstruction`]): flattens the winning layout
//!    back into unwrapped lines and rewrites the partition tree in place
//!
//! Costs are linear and additive: each column past the limit costs
//! `over_column_limit_penalty`, each introduced line break costs
//! `line_break_penalty`. The pointwise minimum of candidate functions is
//! itself piecewise linear, so an optimal layout for every starting column
//! is carried through the whole combination in one bottom-up pass.

pub mod factory;
pub mod function;
pub mod layout;
pub mod optimizer;
pub mod partition;
pub mod reconstruction;
pub mod style;
pub mod token;

pub use factory::LayoutFunctionFactory;
pub use function::{LayoutFunction, LayoutFunctionSegment, SegmentCursor, INFINITE_COLUMN};
pub use layout::{LayoutItem, LayoutKind, LayoutTree};
pub use optimizer::optimize_token_partition_tree;
pub use partition::{PartitionPolicy, TokenPartitionTree, UnwrappedLine};
pub use reconstruction::TreeReconstructor;
pub use style::Style;
pub use token::{BreakDecision, InterTokenInfo, PreFormatToken};
