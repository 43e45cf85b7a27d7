//! Cost function combinators.
//!
//! [`LayoutFunctionFactory`] builds piecewise-linear cost functions for
//! unwrapped lines and combines them geometrically:
//!
//! 1. **`line`**: cost of one unwrapped line as a function of start column
//! 2. **`indent`**: shift a function right by a fixed indentation
//! 3. **`juxtaposition`**: operands side by side on one line
//! 4. **`stack`**: operands on successive lines
//! 5. **`choice`**: pointwise minimum over alternatives
//! 6. **`wrap`**: fit on one line else wrap, built from the other three
//!
//! Each combinator walks its operands' knots strictly left to right with
//! per-operand cursors, so combining is linear in the total knot count.

use crate::function::{LayoutFunction, LayoutFunctionSegment, SegmentCursor, INFINITE_COLUMN};
use crate::layout::{LayoutItem, LayoutTree};
use crate::partition::UnwrappedLine;
use crate::style::Style;
use crate::token::PreFormatToken;

/// Factory for layout cost functions.
///
/// Holds the style and the token buffer so leaf layouts can capture their
/// rendered text and width once, at construction.
pub struct LayoutFunctionFactory<'a> {
    style: &'a Style,
    tokens: &'a [PreFormatToken],
}

impl<'a> LayoutFunctionFactory<'a> {
    pub fn new(style: &'a Style, tokens: &'a [PreFormatToken]) -> Self {
        LayoutFunctionFactory { style, tokens }
    }

    #[inline]
    pub fn style(&self) -> &Style {
        self.style
    }

    /// Cost function of a single unwrapped line.
    ///
    /// A line of width `w` fits freely at start columns up to
    /// `column_limit - w`; every further column costs
    /// `over_column_limit_penalty`.
    pub fn line(&self, uwline: &UnwrappedLine) -> LayoutFunction {
        let layout = LayoutTree::new(LayoutItem::line(uwline.clone(), self.tokens));
        let span = uwline.width(self.tokens);

        if span < self.style.column_limit {
            LayoutFunction::new(vec![
                // 0 <= x < column_limit - span
                LayoutFunctionSegment {
                    column: 0,
                    layout: layout.clone(),
                    span,
                    intercept: 0.0,
                    gradient: 0,
                },
                // column_limit - span <= x
                LayoutFunctionSegment {
                    column: self.style.column_limit - span,
                    layout,
                    span,
                    intercept: 0.0,
                    gradient: self.style.over_column_limit_penalty,
                },
            ])
        } else {
            LayoutFunction::new(vec![LayoutFunctionSegment {
                column: 0,
                layout,
                span,
                intercept: ((span - self.style.column_limit)
                    * self.style.over_column_limit_penalty) as f32,
                gradient: self.style.over_column_limit_penalty,
            }])
        }
    }

    /// Shift `lf` right by `indent` columns.
    ///
    /// Over-limit cost already charged at the source column is backed out
    /// of the intercept and gradient, because the shifted gradient charges
    /// it again.
    pub fn indent(&self, lf: &LayoutFunction, indent: i32) -> LayoutFunction {
        assert!(!lf.is_empty(), "indent requires a non-empty layout function");
        assert!(indent >= 0, "indentation must be non-negative, got {indent}");

        let mut result = LayoutFunction::default();

        let mut indent_column = 0;
        let mut column = indent;
        let mut index = lf
            .at_or_to_the_left_of(column)
            .expect("non-empty layout function has a segment at every column");

        loop {
            let segment = &lf[index];
            let columns_over_limit = column - self.style.column_limit;

            let new_intercept = segment.cost_at(column)
                - (self.style.over_column_limit_penalty * columns_over_limit.max(0)) as f32;
            let new_gradient = segment.gradient
                - if columns_over_limit >= 0 {
                    self.style.over_column_limit_penalty
                } else {
                    0
                };

            let mut new_layout = segment.layout.clone();
            let item = new_layout.value_mut();
            item.set_indentation_spaces(item.indentation_spaces() + indent);

            result.push(LayoutFunctionSegment {
                column: indent_column,
                layout: new_layout,
                span: indent + segment.span,
                intercept: new_intercept,
                gradient: new_gradient,
            });

            index += 1;
            if index == lf.len() {
                break;
            }
            column = lf[index].column;
            indent_column = column - indent;
        }

        result
    }

    /// Left fold of [`Self::juxtaposition_pair`] over the operands.
    pub fn juxtaposition(&self, lfs: Vec<LayoutFunction>) -> LayoutFunction {
        let mut iter = lfs.into_iter();
        let Some(mut incremental) = iter.next() else {
            return LayoutFunction::default();
        };
        for lf in iter {
            incremental = self.juxtaposition_pair(&incremental, &lf);
        }
        incremental
    }

    /// Place `right` immediately after `left` on the same line, separated
    /// by the right operand's leading spaces.
    ///
    /// Two cursors walk the operands in lockstep: the left at the
    /// composite's start column, the right at the column where it actually
    /// begins (`left start + left span + spacing`). Over-limit cost that
    /// both operands charge for the overlap region is subtracted so the
    /// composite charges it once.
    fn juxtaposition_pair(
        &self,
        left: &LayoutFunction,
        right: &LayoutFunction,
    ) -> LayoutFunction {
        assert!(!left.is_empty(), "juxtaposition requires non-empty operands");
        assert!(!right.is_empty(), "juxtaposition requires non-empty operands");

        let mut result = LayoutFunction::default();

        let mut index_l = 0;
        let mut column_l = 0;
        let mut column_r = left[0].span + right[0].layout.value().spaces_before();
        let mut index_r = right
            .at_or_to_the_left_of(column_r)
            .expect("non-empty layout function has a segment at every column");

        loop {
            let segment_l = &left[index_l];
            let segment_r = &right[index_r];
            let spaces_before_r = segment_r.layout.value().spaces_before();

            let columns_over_limit = column_r - self.style.column_limit;

            let new_intercept = segment_l.cost_at(column_l) + segment_r.cost_at(column_r)
                - (self.style.over_column_limit_penalty * columns_over_limit.max(0)) as f32;
            let new_gradient = segment_l.gradient + segment_r.gradient
                - if columns_over_limit >= 0 {
                    self.style.over_column_limit_penalty
                } else {
                    0
                };

            let mut new_layout = LayoutTree::new(LayoutItem::juxtaposition(
                segment_l.layout.value().spaces_before(),
                segment_l.layout.value().must_wrap(),
            ));
            new_layout.adopt_flattened(&segment_l.layout);
            new_layout.adopt_flattened(&segment_r.layout);

            result.push(LayoutFunctionSegment {
                column: column_l,
                layout: new_layout,
                span: segment_l.span + segment_r.span + spaces_before_r,
                intercept: new_intercept,
                gradient: new_gradient,
            });

            let next_l = index_l + 1;
            let next_column_l = if next_l < left.len() {
                left[next_l].column
            } else {
                INFINITE_COLUMN
            };
            let next_r = index_r + 1;
            let next_column_r = if next_r < right.len() {
                right[next_r].column
            } else {
                INFINITE_COLUMN
            };

            if next_l == left.len() && next_r == right.len() {
                break;
            }

            if next_r == right.len() || (next_column_l - column_l) <= (next_column_r - column_r) {
                // The left operand reaches its next knot first (or the
                // right has none); the right cursor follows.
                column_l = next_column_l;
                column_r = next_column_l + left[next_l].span + spaces_before_r;

                index_l = next_l;
                index_r = right
                    .at_or_to_the_left_of(column_r)
                    .expect("non-empty layout function has a segment at every column");
            } else {
                column_r = next_column_r;
                column_l = next_column_r - segment_l.span - spaces_before_r;

                index_r = next_r;
            }
        }

        result
    }

    /// Place the operands on successive lines.
    ///
    /// The composite takes the first operand's leading spacing and
    /// must-wrap flag, and the last operand's span (only the last line can
    /// be extended by later horizontal composition). Every knot of every
    /// operand becomes a knot of the composite.
    pub fn stack(&self, lfs: Vec<LayoutFunction>) -> LayoutFunction {
        if lfs.is_empty() {
            return LayoutFunction::default();
        }
        if lfs.len() == 1 {
            return lfs.into_iter().next().expect("length checked above");
        }
        for lf in &lfs {
            assert!(!lf.is_empty(), "stack requires non-empty operands");
        }

        let first_item = lfs[0][0].layout.value();
        let spaces_before = first_item.spaces_before();
        let must_wrap = first_item.must_wrap();
        let span = lfs[lfs.len() - 1][0].span;

        let line_breaks_penalty =
            ((lfs.len() - 1) as i32 * self.style.line_break_penalty) as f32;

        let mut result = LayoutFunction::default();
        let mut cursors: Vec<SegmentCursor> = lfs.iter().map(SegmentCursor::new).collect();

        let mut current_column = 0;
        loop {
            let mut new_segment = LayoutFunctionSegment {
                column: current_column,
                layout: LayoutTree::new(LayoutItem::stack(spaces_before, must_wrap)),
                span,
                intercept: line_breaks_penalty,
                gradient: 0,
            };

            for cursor in &mut cursors {
                cursor.move_to_knot_at_or_to_the_left_of(current_column);
                let segment = cursor.segment();
                new_segment.intercept += segment.cost_at(current_column);
                new_segment.gradient += segment.gradient;
                new_segment.layout.adopt_flattened(&segment.layout);
            }
            result.push(new_segment);

            let mut next_column = INFINITE_COLUMN;
            for cursor in &cursors {
                let column = cursor.next_knot_column();
                debug_assert!(column > current_column);
                if column < next_column {
                    next_column = column;
                }
            }
            if next_column == INFINITE_COLUMN {
                break;
            }
            current_column = next_column;
        }

        result
    }

    /// Pointwise minimum over the alternatives.
    ///
    /// The result's knots are the input knots plus the crossover columns
    /// where the active alternative is overtaken by one with a smaller
    /// gradient. Ties prefer the smaller gradient, then the earlier
    /// alternative.
    pub fn choice(&self, lfs: Vec<LayoutFunction>) -> LayoutFunction {
        if lfs.is_empty() {
            return LayoutFunction::default();
        }
        if lfs.len() == 1 {
            return lfs.into_iter().next().expect("length checked above");
        }
        for lf in &lfs {
            assert!(!lf.is_empty(), "choice requires non-empty alternatives");
        }

        let mut result = LayoutFunction::default();
        let mut cursors: Vec<SegmentCursor> = lfs.iter().map(SegmentCursor::new).collect();

        // Identity of the alternative segment emitted last, as
        // (alternative, knot) indices.
        let mut last_min: Option<(usize, usize)> = None;

        let mut current_column = 0;
        loop {
            let mut next_knot = INFINITE_COLUMN;
            for cursor in &mut cursors {
                cursor.move_to_knot_at_or_to_the_left_of(current_column);
                let column = cursor.next_knot_column();
                if column < next_knot {
                    next_knot = column;
                }
            }

            loop {
                let mut min_index = 0;
                for i in 1..cursors.len() {
                    let candidate = cursors[i].segment();
                    let minimum = cursors[min_index].segment();
                    let candidate_cost = candidate.cost_at(current_column);
                    let minimum_cost = minimum.cost_at(current_column);
                    if candidate_cost < minimum_cost
                        || (candidate_cost == minimum_cost
                            && candidate.gradient < minimum.gradient)
                    {
                        min_index = i;
                    }
                }
                let min_segment = cursors[min_index].segment();

                if last_min != Some((min_index, cursors[min_index].index())) {
                    result.push(LayoutFunctionSegment {
                        column: current_column,
                        layout: min_segment.layout.clone(),
                        span: min_segment.span,
                        intercept: min_segment.cost_at(current_column),
                        gradient: min_segment.gradient,
                    });
                    last_min = Some((min_index, cursors[min_index].index()));
                }

                // Closest crossover before the next knot.
                let mut next_column = next_knot;
                for cursor in &cursors {
                    let segment = cursor.segment();
                    if segment.gradient >= min_segment.gradient {
                        continue;
                    }
                    let gamma = (segment.cost_at(current_column)
                        - min_segment.cost_at(current_column))
                        / (min_segment.gradient - segment.gradient) as f32;
                    let column = current_column + gamma.ceil() as i32;
                    if column > current_column && column < next_column {
                        next_column = column;
                    }
                }

                current_column = next_column;
                if current_column >= next_knot {
                    break;
                }
            }

            if current_column == INFINITE_COLUMN {
                break;
            }
        }

        result
    }

    /// Fit on one line else wrap.
    ///
    /// Incremental fold over the operands: each next operand is either
    /// appended to the accumulated layout's last line or stacked below it,
    /// whichever is cheaper at each column. An operand that must begin on
    /// a new line is stacked unconditionally.
    pub fn wrap(&self, lfs: Vec<LayoutFunction>) -> LayoutFunction {
        let mut iter = lfs.into_iter();
        let Some(mut incremental) = iter.next() else {
            return LayoutFunction::default();
        };
        for lf in iter {
            incremental = if lf.must_wrap() {
                self.stack(vec![incremental, lf])
            } else {
                let juxtaposed = self.juxtaposition(vec![incremental.clone(), lf.clone()]);
                let stacked = self.stack(vec![incremental, lf]);
                self.choice(vec![juxtaposed, stacked])
            };
        }
        incremental
    }
}
