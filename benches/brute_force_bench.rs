use basket::brute::{generate_rules, mine};
use basket::fp::fp_growth;
use basket::store::transactions_from_one_hot;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::Rng;

/// Random one-hot baskets. `density` thins out the drawn items.
fn generate_transactions(
    num_transactions: usize,
    num_items: usize,
    avg_transaction_size: usize,
    density: f64,
) -> Array2<i32> {
    let mut rng = rand::thread_rng();
    let mut data = vec![0i32; num_transactions * num_items];

    for tx_idx in 0..num_transactions {
        let random_factor: f64 = rng.r#gen();
        let num_items_in_tx = (avg_transaction_size as f64 * (0.5 + random_factor)).round() as usize;
        let num_items_in_tx = num_items_in_tx.min(num_items);

        for _ in 0..num_items_in_tx {
            let density_check: f64 = rng.r#gen();
            if density_check < density {
                let item = rng.gen_range(0..num_items);
                data[tx_idx * num_items + item] = 1;
            }
        }
    }

    Array2::from_shape_vec((num_transactions, num_items), data)
        .expect("shape matches the generated buffer")
}

/// Brute force cost grows with the catalogue, so item counts stay small.
fn bench_engines_by_catalogue(c: &mut Criterion) {
    let mut group = c.benchmark_group("engines_by_catalogue");
    group.sample_size(20);

    for num_items in [6, 10, 14] {
        let one_hot = generate_transactions(200, num_items, 4, 0.8);
        let transactions = transactions_from_one_hot(one_hot.view());

        group.bench_with_input(
            BenchmarkId::new("brute_force", num_items),
            &transactions,
            |b, tx| b.iter(|| mine(black_box(tx), black_box(0.1))),
        );
        group.bench_with_input(
            BenchmarkId::new("fp_growth", num_items),
            &one_hot,
            |b, tx| b.iter(|| fp_growth(black_box(tx.view()), black_box(0.1))),
        );
    }

    group.finish();
}

fn bench_brute_force_min_support(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force_min_support");

    let one_hot = generate_transactions(500, 12, 5, 0.7);
    let transactions = transactions_from_one_hot(one_hot.view());

    for min_sup in [0.05, 0.1, 0.2, 0.4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{min_sup:.2}")),
            &min_sup,
            |b, &sup| b.iter(|| mine(black_box(&transactions), black_box(sup))),
        );
    }

    group.finish();
}

fn bench_rule_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_generation");

    let one_hot = generate_transactions(500, 12, 6, 0.9);
    let transactions = transactions_from_one_hot(one_hot.view());
    let Ok(frequent) = mine(&transactions, 0.05) else {
        return;
    };

    for min_conf in [0.2, 0.5, 0.8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{min_conf:.1}")),
            &min_conf,
            |b, &conf| b.iter(|| generate_rules(black_box(&frequent), black_box(conf))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_engines_by_catalogue,
    bench_brute_force_min_support,
    bench_rule_generation
);
criterion_main!(benches);
