use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use morphic::{AccessPath, Engine, Predicate, Value};

// Engine with `clauses` registered clauses: every clause shares a guard on
// the "kind" field and adds one distinguishing literal, so resolution
// exercises both pooled elimination and per-clause predicates.
fn make_engine(clauses: usize) -> Engine<usize> {
    let mut engine = Engine::new();
    let kind_path = AccessPath::root().child("kind");
    let id_path = AccessPath::root().child("id");
    for i in 0..clauses {
        engine.add_clause(
            vec![
                Predicate::string().at(kind_path.clone()),
                Predicate::literal(i as i32).at(id_path.clone()),
            ],
            i,
        );
    }
    engine.use_fallback(usize::MAX);
    engine
}

fn bench_resolve_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for clauses in [16usize, 256] {
        let engine = make_engine(clauses);
        let input = Value::record([
            ("kind", Value::from("event")),
            ("id", Value::from((clauses / 2) as i32)),
        ]);
        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("hit/{clauses}"), |b| {
            b.iter(|| engine.resolve(&input).unwrap());
        });
    }
    group.finish();
}

fn bench_resolve_fallback(c: &mut Criterion) {
    let engine = make_engine(256);
    // The shared "kind" predicate fails once and eliminates every clause.
    let input = Value::record([("kind", Value::Null), ("id", Value::from(3))]);
    c.bench_function("resolve/fallback_shared_elimination", |b| {
        b.iter(|| engine.resolve(&input).unwrap());
    });
}

fn bench_registration(c: &mut Criterion) {
    c.bench_function("register/256_clauses", |b| {
        b.iter(|| make_engine(256));
    });
}

criterion_group!(
    benches,
    bench_resolve_hit,
    bench_resolve_fallback,
    bench_registration
);
criterion_main!(benches);
