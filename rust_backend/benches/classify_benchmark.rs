use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use orchard_rust::classification::classify;
use orchard_rust::config::ViewerConfig;
use orchard_rust::core::classes::ClassScheme;
use orchard_rust::parsing::csv_parser::parse_points_csv_str;
use orchard_rust::services::summarize;
use orchard_rust::transformations::{apply_cascade, Choice, FilterSelection};

const LABELS: [&str; 10] = [
    "Muy bajo", "Bajo", "Medio", "Medio-alto", "Alto",
    "very low", "Medium_High", "3", "4.0", "sin dato",
];

fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::from("Cuartel,Especie,Variedad,fecha_vuelo,ndvi,ndvi_clase\n");
    for i in 0..rows {
        let date = if i % 2 == 0 { "2023-10-15" } else { "20231120" };
        csv.push_str(&format!(
            "C{},Cerezo,V{},{},{:.3},{}\n",
            i % 12,
            i % 3,
            date,
            0.2 + (i % 60) as f64 * 0.01,
            LABELS[i % LABELS.len()]
        ));
    }
    csv
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    group.bench_function("mixed_labels", |b| {
        b.iter(|| {
            for label in LABELS {
                black_box(classify(black_box(Some(label)), ClassScheme::Seven));
            }
        });
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = ViewerConfig::default();
    let classifier = config.classifier().unwrap();

    for rows in [1_000usize, 10_000] {
        let csv = synthetic_csv(rows);
        group.bench_with_input(BenchmarkId::new("parse_points", rows), &csv, |b, input| {
            b.iter(|| parse_points_csv_str(black_box(input), &config, &classifier).unwrap());
        });

        let table = parse_points_csv_str(&csv, &config, &classifier).unwrap();
        let selection = FilterSelection {
            flight_date: Choice::parse("2023-10-15"),
            blocks: vec!["C1".to_string(), "C2".to_string(), "C3".to_string()],
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("filter_and_summarize", rows), &table, |b, table| {
            b.iter(|| {
                let outcome = apply_cascade(black_box(table), &selection);
                black_box(summarize(&outcome.table, "ndvi", ClassScheme::Five))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_pipeline);
criterion_main!(benches);
