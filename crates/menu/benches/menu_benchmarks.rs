use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use navgate_auth::RoleSet;
use navgate_menu::descriptor::tree_size;
use navgate_menu::{filter_by_roles, first_leaf_path, RouteDescriptor};

const ROLES: [&str; 3] = ["admin", "operator", "auditor"];

/// Build a menu `depth` levels deep with `fanout` children per branch,
/// cycling role requirements so roughly a third of nodes are restricted.
fn build_menu(depth: usize, fanout: usize, prefix: &str) -> Vec<RouteDescriptor> {
    (0..fanout)
        .map(|i| {
            let name = format!("{prefix}{i}");
            let mut node = RouteDescriptor::new(format!("seg{i}"), name.clone());
            if i % 3 == 1 {
                node = node.with_roles([ROLES[i % ROLES.len()]]);
            }
            if depth > 1 {
                node = node.with_children(build_menu(depth - 1, fanout, &format!("{name}_")));
            }
            node
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_by_roles");
    let held: RoleSet = ["admin"].into_iter().collect();

    for (depth, fanout) in [(2, 8), (3, 8), (4, 6)] {
        let menu = build_menu(depth, fanout, "n");
        group.throughput(Throughput::Elements(tree_size(&menu) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("d{depth}_f{fanout}")),
            &menu,
            |b, menu| b.iter(|| filter_by_roles(black_box(menu), black_box(&held))),
        );
    }
    group.finish();
}

fn bench_home(c: &mut Criterion) {
    let held: RoleSet = ["operator"].into_iter().collect();
    let filtered = filter_by_roles(&build_menu(4, 6, "n"), &held);
    c.bench_function("first_leaf_path", |b| {
        b.iter(|| first_leaf_path(black_box(&filtered)))
    });
}

criterion_group!(benches, bench_filter, bench_home);
criterion_main!(benches);
