/// Runner throughput benchmarks
///
/// Measures the cost of driving the automaton over clean sessions of
/// growing length and over early-trapping attack sequences.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use synguard::automaton::PacketLabel;
use synguard::runner::run;
use synguard::scenario::ScenarioCatalogue;

/// SYN, `payload` data packets, FIN
fn clean_session(payload: usize) -> Vec<PacketLabel> {
    let mut packets = Vec::with_capacity(payload + 2);
    packets.push(PacketLabel::Syn);
    packets.extend((0..payload).map(|i| PacketLabel::from(format!("DATA_{}", i))));
    packets.push(PacketLabel::Fin);
    packets
}

fn bench_clean_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_session");

    for payload in [10usize, 100, 1_000, 10_000] {
        let packets = clean_session(payload);
        group.throughput(Throughput::Elements(packets.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(payload), &packets, |b, p| {
            b.iter(|| run(black_box("bench"), black_box(p)))
        });
    }

    group.finish();
}

fn bench_early_trap(c: &mut Criterion) {
    // Trap on the first packet; the remaining packets must not cost anything
    let mut packets = vec![PacketLabel::Fin];
    packets.extend(clean_session(10_000));

    c.bench_function("early_trap_10k_tail", |b| {
        b.iter(|| run(black_box("bench"), black_box(&packets)))
    });
}

fn bench_builtin_catalogue(c: &mut Criterion) {
    let catalogue = ScenarioCatalogue::builtin();
    c.bench_function("builtin_catalogue", |b| b.iter(|| black_box(&catalogue).run_all()));
}

criterion_group!(
    benches,
    bench_clean_sessions,
    bench_early_trap,
    bench_builtin_catalogue
);
criterion_main!(benches);
