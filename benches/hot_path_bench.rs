use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vigil::{enforce, location, EnforceError};

fn fired_site() {
    vigil::log_api_usage_once!("bench.fired_site");
}

fn checked_add(a: u64, b: u64) -> Result<u64, EnforceError> {
    vigil::enforce_le!(a, u64::MAX - b, "overflow adding ", b);
    Ok(a + b)
}

fn bench_usage_once(c: &mut Criterion) {
    fired_site();
    c.bench_function("log_api_usage_once_fired", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                fired_site();
            }
        })
    });
}

fn bench_enforce(c: &mut Criterion) {
    c.bench_function("enforce_passing", |b| {
        b.iter(|| enforce(black_box(true), location!(), "true", "unused"))
    });
    c.bench_function("enforce_le_passing", |b| {
        b.iter(|| checked_add(black_box(7), black_box(9)))
    });
}

criterion_group!(benches, bench_usage_once, bench_enforce);
criterion_main!(benches);
