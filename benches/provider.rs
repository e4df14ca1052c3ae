//! Throughput of the reference backend's page operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use page_crypto_provider::{
    CipherMode, CryptoProvider, HmacAlgorithm, ProviderContext, RustCryptoProvider,
};

fn bench_cipher(c: &mut Criterion) {
    let provider = RustCryptoProvider::new();
    let mut ctx = ProviderContext::stateless();
    let key = [0x42u8; 32];
    let iv = [0x24u8; 16];

    let mut group = c.benchmark_group("cipher");
    for size in [1024usize, 4096, 65536] {
        let page = vec![0xA5u8; size];
        let mut out = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encrypt", size), &page, |b, page| {
            b.iter(|| {
                provider
                    .cipher(&mut ctx, CipherMode::Encrypt, &key, &iv, black_box(page), &mut out)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_hmac(c: &mut Criterion) {
    let provider = RustCryptoProvider::new();
    let mut ctx = ProviderContext::stateless();
    let page = vec![0x5Au8; 4096];
    let pgno = 7u32.to_le_bytes();
    let mut out = [0u8; 64];

    let mut group = c.benchmark_group("hmac");
    group.throughput(Throughput::Bytes(page.len() as u64));
    for alg in HmacAlgorithm::ALL {
        group.bench_function(alg.name(), |b| {
            b.iter(|| {
                provider
                    .hmac(&mut ctx, alg, b"key", black_box(&page), Some(&pgno[..]), &mut out)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_kdf(c: &mut Criterion) {
    let provider = RustCryptoProvider::new();
    let mut ctx = ProviderContext::stateless();
    let salt = [0u8; 16];
    let mut key = [0u8; 32];

    let mut group = c.benchmark_group("kdf");
    group.sample_size(10);
    for alg in HmacAlgorithm::ALL {
        group.bench_function(alg.name(), |b| {
            b.iter(|| {
                provider
                    .kdf(&mut ctx, alg, b"passphrase", &salt, black_box(4000), &mut key)
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cipher, bench_hmac, bench_kdf);
criterion_main!(benches);
