//! Decoding benchmarks for rpmkit.
//!
//! Measures the hot paths of package inspection:
//! - Section decoding for large metadata sections
//! - cpio archive iteration with digest computation
//! - End-to-end verification per compressor

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation, missing_docs)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use rpmkit_core::CpioReader;
use rpmkit_core::Package;
use rpmkit_core::ReadConfig;
use rpmkit_core::section::decode;
use rpmkit_core::test_utils::CpioBuilder;
use rpmkit_core::test_utils::PackageBuilder;
use rpmkit_core::test_utils::TestFile;
use std::hint::black_box;

fn package_with_files(count: usize, size: usize) -> PackageBuilder {
    (0..count).fold(PackageBuilder::new("bench", "1.0", "1"), |b, i| {
        b.file(TestFile::new(
            &format!("/usr/share/bench/file{i:05}.dat"),
            &vec![(i % 251) as u8; size],
        ))
    })
}

/// Metadata section decoding.
fn benchmark_section_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_decode");
    let config = ReadConfig::default();

    for count in [10, 1_000, 10_000] {
        let header = package_with_files(count, 1).header_bytes();
        group.throughput(Throughput::Bytes(header.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &header, |b, header| {
            b.iter(|| decode(&mut black_box(&header[..]), &config).unwrap());
        });
    }

    group.finish();
}

/// cpio iteration including per-entry digests.
fn benchmark_cpio_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpio_iteration");

    for (count, size) in [(1_000, 64), (100, 64 * 1024)] {
        let archive = (0..count)
            .fold(CpioBuilder::new(), |b, i| {
                b.file(&format!("./f{i}"), 0o100_644, &vec![0x5A; size])
            })
            .build();
        group.throughput(Throughput::Bytes(archive.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("md5", format!("{count}x{size}")),
            &archive,
            |b, archive| {
                b.iter(|| {
                    for entry in CpioReader::new(black_box(&archive[..])) {
                        black_box(entry.unwrap().md5());
                    }
                });
            },
        );
    }

    group.finish();
}

/// Full package verification per payload compressor.
fn benchmark_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    group.sample_size(20);
    let config = ReadConfig::default();

    for codec in ["gzip", "bzip2", "xz", "zstd"] {
        let bytes = package_with_files(200, 4096).compressor(codec).build();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(codec), &bytes, |b, bytes| {
            b.iter(|| {
                let package = Package::from_reader(black_box(&bytes[..]), &config).unwrap();
                package.verify().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_section_decode,
    benchmark_cpio_iteration,
    benchmark_verify
);
criterion_main!(benches);
