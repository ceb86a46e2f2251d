use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use tensorgrad_tensor::{random, Tensor};
use tensorgrad_tensor_ops::TensorOps;

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");
    random::set_seed(0);

    for size in [8, 128, 1024, 16384] {
        let a = Tensor::<f32>::uniform(&[size], false);
        let b = Tensor::<f32>::uniform(&[size], false);

        group.bench_function(format!("add_f32_size_{size}"), |bencher| {
            bencher.iter(|| black_box(a.add(&b).unwrap()))
        });

        group.bench_function(format!("mul_f32_size_{size}"), |bencher| {
            bencher.iter(|| black_box(a.mul(&b).unwrap()))
        });
    }

    group.finish();
}

fn bench_backward(c: &mut Criterion) {
    let mut group = c.benchmark_group("backward");

    for size in [8, 128, 1024] {
        let x = Tensor::<f32>::uniform(&[size, size], true);
        let y = Tensor::<f32>::uniform(&[size, size], true);

        group.bench_function(format!("mul_add_transpose_{size}"), |bencher| {
            bencher.iter(|| {
                let z = x.mul(&y).unwrap().add(&x).unwrap().transpose(&[1, 0]).unwrap();
                z.backward().unwrap();
                x.zero_grad();
                y.zero_grad();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forward, bench_backward);
criterion_main!(benches);
