use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use named_event::{Access, Registry};

criterion_group!(event, open_close_1024, set_poll);
criterion_main!(event);

fn open_close_1024(c: &mut Criterion) {
    let mut group = c.benchmark_group("open_close");

    group.bench_function("open_close", |b| {
        let registry = Registry::builder().capacity(1025).build();
        let event = registry.create(Some("bench"), true, false).expect("created");
        b.iter(|| {
            let handles = (0..1024)
                .map(|_| registry.open("bench", Access::ALL, false).expect("opened"))
                .collect::<Vec<_>>();
            for handle in handles {
                registry.close(handle).expect("closed");
            }
        });
        registry.close(event).expect("closed");
    });

    group.finish();
}

fn set_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_poll");

    for manual_reset in [true, false] {
        let name = if manual_reset { "manual" } else { "auto" };
        group.bench_function(name, |b| {
            let registry = Registry::new();
            let event = registry.create(None, manual_reset, false).expect("created");
            b.iter(|| {
                registry.set(event).expect("set");
                registry.wait(event, Some(Duration::ZERO)).expect("polled");
                registry.reset(event).expect("reset");
            });
        });
    }

    group.finish();
}
