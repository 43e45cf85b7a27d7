//! Optimal layout selection for token partition trees.
//!
//! The walker turns a partition tree into a single cost function bottom-up
//! by dispatching on partition policies, selects the layout active at the
//! root's indentation, and hands it to the reconstructor, which rewrites
//! the partition node in place.

use tracing::trace;

use crate::factory::LayoutFunctionFactory;
use crate::function::LayoutFunction;
use crate::partition::{PartitionPolicy, TokenPartitionTree};
use crate::reconstruction::TreeReconstructor;
use crate::style::Style;
use crate::token::PreFormatToken;

/// Optimize the layout of `node`'s subtree in place.
///
/// `node`'s subtree is replaced with the reconstructed layout: one child
/// per emitted line, each marked already-formatted. Break decisions on the
/// affected tokens in `tokens` are updated accordingly.
///
/// Panics on contract violations: an unsupported partition policy, an
/// `OptimalFunctionCallLayout` node without exactly two children, or an
/// empty cost function where a non-empty one is required. These indicate
/// bugs in the partition-tree producer.
pub fn optimize_token_partition_tree(
    style: &Style,
    node: &mut TokenPartitionTree,
    tokens: &mut [PreFormatToken],
) {
    let indentation = node.value().indentation_spaces();
    trace!("optimizing partition tree:\n{node}");

    let layout_function = {
        let factory = LayoutFunctionFactory::new(style, tokens);
        traverse(&factory, node)
    };
    assert!(
        !layout_function.is_empty(),
        "layout function for the partition tree is empty"
    );
    trace!("layout function:\n{layout_function}");

    let index = layout_function
        .at_or_to_the_left_of(indentation)
        .expect("non-empty layout function has a segment at every column");
    let layout = layout_function[index].layout.clone();
    trace!("chosen layout at column {indentation}:\n{layout}");

    let mut reconstructor = TreeReconstructor::new(indentation);
    reconstructor.traverse_tree(&layout, tokens);
    reconstructor.replace_token_partition_tree_node(node, tokens);
    trace!("optimized partition tree:\n{node}");
}

fn traverse(factory: &LayoutFunctionFactory, node: &TokenPartitionTree) -> LayoutFunction {
    if node.is_leaf() {
        return factory.line(node.value());
    }

    match node.value().partition_policy() {
        PartitionPolicy::OptimalFunctionCallLayout => {
            let children = node.children();
            assert!(
                children.len() == 2,
                "optimal function call layout requires a header and an argument group, \
                 got {} children",
                children.len(),
            );

            let header = traverse(factory, &children[0]);
            let args = traverse(factory, &children[1]);

            let stacked = factory.stack(vec![
                header.clone(),
                factory.indent(&args, factory.style().wrap_spaces),
            ]);
            if args.must_wrap() {
                return stacked;
            }
            let juxtaposed = factory.juxtaposition(vec![header, args]);
            factory.choice(vec![juxtaposed, stacked])
        }

        PartitionPolicy::AppendFittingSubPartitions | PartitionPolicy::FitOnLineElseExpand => {
            factory.wrap(
                node.children()
                    .iter()
                    .map(|child| traverse(factory, child))
                    .collect(),
            )
        }

        PartitionPolicy::AlwaysExpand | PartitionPolicy::TabularAlignment => {
            factory.stack(
                node.children()
                    .iter()
                    .map(|child| traverse(factory, child))
                    .collect(),
            )
        }

        // Already-formatted content is priced as one opaque line; its
        // children are not re-broken.
        PartitionPolicy::AlreadyFormatted => factory.line(node.value()),

        policy => panic!("unsupported partition policy {policy} in layout optimization:\n{node}"),
    }
}
