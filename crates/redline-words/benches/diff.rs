use criterion::{Criterion, criterion_group, criterion_main};
use redline_words::diff_words;

fn sentence(words: usize, salt: usize) -> String {
    (0..words)
        .map(|i| {
            if i % 7 == salt % 7 {
                format!("edit{i}")
            } else {
                format!("word{i}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_diff_words(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_words");

    for words in [10, 50, 200] {
        let old = sentence(words, 0);
        let new = sentence(words, 3);
        group.bench_function(format!("{words}_words"), |b| {
            b.iter(|| {
                let changes = diff_words(std::hint::black_box(&old), std::hint::black_box(&new));
                std::hint::black_box(changes);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_diff_words);
criterion_main!(benches);
