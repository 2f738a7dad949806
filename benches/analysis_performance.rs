use criterion::{Criterion, black_box, criterion_group, criterion_main};
use paddock::LapFilter;
use paddock::analysis::align_delta;
use paddock::session::{Compound, Lap, LapTelemetry, TelemetrySample};
use std::time::Duration;

// ~5.8km lap sampled at 4Hz for a bit over 90s
fn create_lap_telemetry(driver: &str, pace: f64) -> LapTelemetry {
    let samples = (0..370)
        .map(|i| {
            let time_s = i as f64 * 0.25 * pace;
            TelemetrySample {
                distance_m: i as f64 * 15.7,
                time_s,
                speed_kph: 220.0 + (time_s.sin() * 80.0),
                throttle_pct: 100.0,
                ..Default::default()
            }
        })
        .collect();
    LapTelemetry {
        driver: driver.to_string(),
        lap_number: 1,
        samples,
    }
}

fn create_race_laps(count: u32) -> Vec<Lap> {
    (1..=count)
        .map(|lap_number| Lap {
            driver: "VER".to_string(),
            lap_number,
            lap_time_s: Some(90.0 + f64::from(lap_number % 7)),
            stint: Some(1 + lap_number / 25),
            compound: Compound::Medium,
            pit_in: lap_number % 25 == 24,
            pit_out: lap_number % 25 == 0,
            ..Default::default()
        })
        .collect()
}

fn bench_telemetry_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("telemetry_alignment");

    let reference = create_lap_telemetry("VER", 1.0);
    let comparison = create_lap_telemetry("HAM", 1.01);

    group.bench_function("align_single_lap", |b| {
        b.iter(|| black_box(align_delta(black_box(&reference), black_box(&comparison))));
    });

    group.finish();
}

fn bench_lap_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("lap_filter");

    let filter = LapFilter::default();
    let race = create_race_laps(70);

    group.bench_function("quick_laps_70_laps", |b| {
        b.iter(|| black_box(filter.quick_laps(black_box(&race))));
    });

    // A full grid of 20 drivers
    let grid = create_race_laps(1400);
    group.bench_function("quick_laps_1400_laps", |b| {
        b.iter(|| black_box(filter.quick_laps(black_box(&grid))));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = bench_telemetry_alignment, bench_lap_filter
}
criterion_main!(benches);
