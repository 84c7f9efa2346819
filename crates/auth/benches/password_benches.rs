use auth::password::{hash_password, verify_password, PasswordConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use secrecy::{ExposeSecret, SecretString};

fn bench_hash_password(c: &mut Criterion) {
    let password = SecretString::from("expo2026".to_string());
    c.bench_function("hash_password_default", |b| {
        b.iter(|| hash_password(black_box(&password), black_box(None)))
    });
    c.bench_function("hash_password_light", |b| {
        let config = PasswordConfig {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            ..Default::default()
        };
        b.iter(|| hash_password(black_box(&password), black_box(Some(config.clone()))))
    });
}

fn bench_verify_password(c: &mut Criterion) {
    let password = SecretString::from("expo2026".to_string());
    let hash = hash_password(&password, None).unwrap();
    c.bench_function("verify_password", |b| {
        b.iter(|| verify_password(black_box(&password), black_box(hash.expose_secret())))
    });
}

criterion_group!(benches, bench_hash_password, bench_verify_password);
criterion_main!(benches);
