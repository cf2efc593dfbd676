use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use assert_cmd::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

static CLI_COUNTER: AtomicUsize = AtomicUsize::new(0);

const CATALOG: &str = "\
restaurants:
  - id: bistro
    name: Bistro
    max_reservation_minutes: 90
    tables:
      - { number: 1, seats: 2 }
      - { number: 2, seats: 4 }
      - { number: 3, seats: 4 }
      - { number: 4, seats: 6 }
";

fn tablekeep(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tablekeep").expect("failed to locate tablekeep binary");
    cmd.arg("--data-dir").arg(data_dir.path()).arg("--quiet");
    cmd
}

fn seeded_data_dir() -> TempDir {
    let data_dir = TempDir::new().expect("failed to create temp dir");
    let catalog = data_dir.path().join("catalog.yaml");
    std::fs::write(&catalog, CATALOG).expect("failed to write catalog");

    let status = tablekeep(&data_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .arg("seed")
        .arg(&catalog)
        .status()
        .expect("failed to execute tablekeep seed");
    assert!(status.success(), "tablekeep seed command failed");
    data_dir
}

fn reserve_at(data_dir: &TempDir, n: usize) -> bool {
    tablekeep(data_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .args([
            "reserve",
            "--restaurant",
            "bistro",
            "--client",
            &format!("client-{n}"),
            "--at",
            "2030-01-01T19:00:00Z",
            "--party",
            "2",
        ])
        .status()
        .expect("failed to execute tablekeep reserve")
        .success()
}

fn bench_cli_startup(c: &mut Criterion) {
    c.bench_function("cli_startup_version", |b| {
        b.iter(|| {
            let mut cmd = Command::cargo_bin("tablekeep").expect("failed to locate tablekeep binary");
            let output = cmd.arg("--version").output().expect("failed to run tablekeep");
            black_box(output);
        });
    });
}

fn bench_cli_reserve(c: &mut Criterion) {
    c.bench_function("cli_reserve", |b| {
        b.iter_batched(
            seeded_data_dir,
            |data_dir| {
                let counter = CLI_COUNTER.fetch_add(1, Ordering::Relaxed);
                black_box(reserve_at(&data_dir, counter));
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_cli_list(c: &mut Criterion) {
    c.bench_function("cli_list", |b| {
        b.iter_batched(
            || {
                let data_dir = seeded_data_dir();
                for i in 0..4 {
                    reserve_at(&data_dir, i);
                }
                data_dir
            },
            |data_dir| {
                let output = tablekeep(&data_dir)
                    .args(["list", "--format", "json", "--limit", "50"])
                    .output()
                    .expect("failed to execute tablekeep list");
                black_box(output);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    cli_benches,
    bench_cli_startup,
    bench_cli_reserve,
    bench_cli_list
);
criterion_main!(cli_benches);
