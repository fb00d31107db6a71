use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use smtpscout::scan::{RecordParser, SearchCriteria};
use smtpscout::{scan, ScanConfig};
use std::{fs::File, io::Write, num::NonZeroUsize};
use tempfile::tempdir;

fn synthetic_log(records: usize) -> String {
    let mut log = String::new();
    for i in 0..records {
        log.push_str(&format!(
            "2024-01-{:02} 10:{:02}:{:02} smtpd[{}]: connect from mx{}.example\n",
            1 + i % 28,
            i % 60,
            (i * 7) % 60,
            1000 + i,
            i
        ));
        log.push_str(&format!("\tfrom=<user{}@x.com> size={}\n", i % 97, i * 13));
        log.push_str("\tstatus=sent (250 ok)\n");
    }
    log
}

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    records_per_file: usize,
) -> std::io::Result<()> {
    let content = synthetic_log(records_per_file);
    for i in 0..file_count {
        let mut file = File::create(dir.path().join(format!("maillog.{}", i)))?;
        file.write_all(content.as_bytes())?;
    }
    Ok(())
}

fn bench_record_parser(c: &mut Criterion) {
    let log = synthetic_log(10_000);
    let criteria = SearchCriteria::new("user42@x.com", None).unwrap();

    c.bench_function("parse_and_match_10k_records", |b| {
        b.iter(|| {
            RecordParser::new(black_box(&log).lines())
                .filter(|r| criteria.matches(r.text()))
                .count()
        })
    });
}

fn bench_pool_scaling(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(&dir, 200, 500).unwrap();

    let mut group = c.benchmark_group("Pool Scaling");
    for workers in [1usize, 4, 16, 50] {
        let mut config = ScanConfig::new(dir.path(), "user42@x.com");
        config.pool_size = NonZeroUsize::new(workers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &config, |b, config| {
            b.iter(|| black_box(scan(config).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_record_parser, bench_pool_scaling);
criterion_main!(benches);
