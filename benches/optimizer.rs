//! Layout optimization benchmarks.
//!
//! Measures cost function combination and end-to-end optimization across
//! argument list sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use optfmt::{
    optimize_token_partition_tree, LayoutFunctionFactory, PartitionPolicy, PreFormatToken, Style,
    TokenPartitionTree, UnwrappedLine,
};

fn call_fixture(arg_count: usize) -> (Vec<PreFormatToken>, TokenPartitionTree) {
    let mut tokens = vec![PreFormatToken::new("function_name(")];
    for i in 0..arg_count {
        let mut token = PreFormatToken::new(format!("argument_{i},"));
        token.before.spaces_required = 1;
        tokens.push(token);
    }

    let leaf = |range: std::ops::Range<usize>| {
        let mut line = UnwrappedLine::spanning(0, range);
        line.set_partition_policy(PartitionPolicy::FitOnLineElseExpand);
        TokenPartitionTree::new(line)
    };

    let header = leaf(0..1);
    let mut args_line = UnwrappedLine::spanning(0, 1..tokens.len());
    args_line.set_partition_policy(PartitionPolicy::FitOnLineElseExpand);
    let args = TokenPartitionTree::with_children(
        args_line,
        (1..tokens.len()).map(|i| leaf(i..i + 1)).collect(),
    );

    let mut root_line = UnwrappedLine::spanning(0, 0..tokens.len());
    root_line.set_partition_policy(PartitionPolicy::OptimalFunctionCallLayout);
    let root = TokenPartitionTree::with_children(root_line, vec![header, args]);

    (tokens, root)
}

fn bench_wrap_combinator(c: &mut Criterion) {
    let style = Style {
        column_limit: 40,
        ..Style::default()
    };

    let mut group = c.benchmark_group("factory/wrap");
    for arg_count in [4usize, 16, 64] {
        let (tokens, _) = call_fixture(arg_count);
        let lines: Vec<UnwrappedLine> = (1..tokens.len())
            .map(|i| UnwrappedLine::spanning(0, i..i + 1))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(arg_count),
            &arg_count,
            |b, _| {
                b.iter(|| {
                    let factory = LayoutFunctionFactory::new(&style, &tokens);
                    let line_fns = lines.iter().map(|line| factory.line(line)).collect();
                    black_box(factory.wrap(line_fns))
                })
            },
        );
    }
    group.finish();
}

fn bench_optimize_function_call(c: &mut Criterion) {
    let style = Style {
        column_limit: 40,
        ..Style::default()
    };

    let mut group = c.benchmark_group("optimize/function_call");
    for arg_count in [4usize, 16, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(arg_count),
            &arg_count,
            |b, &arg_count| {
                b.iter(|| {
                    let (mut tokens, mut tree) = call_fixture(arg_count);
                    optimize_token_partition_tree(&style, &mut tree, &mut tokens);
                    black_box(tree)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_wrap_combinator, bench_optimize_function_call);
criterion_main!(benches);
