use std::{
  hint::black_box,
  ptr::NonNull,
};

use bitbuddy::{
  Buddy,
  Field,
  FieldWord,
};
use bitbuddy_sys::arena::Arena;
use criterion::{
  BenchmarkId,
  Criterion,
  criterion_group,
  criterion_main,
};
use rand::Rng;

const LEVELS: usize = 6;
const SIZE: usize = 4096;
const LEAF: usize = SIZE >> (LEVELS - 1);

fn storage() -> Vec<FieldWord> {
  (0..Field::bytes(Buddy::cells(LEVELS)))
    .map(|_| FieldWord::new(0))
    .collect()
}

fn bench_alloc_release(c: &mut Criterion) {
  let mut group = c.benchmark_group("alloc_release");
  group.sample_size(50);

  let mut arena = Arena::new(SIZE).unwrap();
  let store = storage();
  let base = NonNull::new(arena.as_mut().as_mut_ptr()).unwrap();
  let mut buddy = Buddy::new(base, SIZE, LEVELS, &store).unwrap();

  for size in [LEAF, SIZE / 4, SIZE] {
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &s| {
      b.iter(|| {
        let ptr = buddy.allocate(black_box(s)).unwrap();
        buddy.deallocate(ptr.as_ptr()).unwrap();
      });
    });
  }

  group.finish();
}

fn bench_fill_drain(c: &mut Criterion) {
  let mut group = c.benchmark_group("fill_drain");
  group.sample_size(50);

  let mut arena = Arena::new(SIZE).unwrap();
  let store = storage();
  let base = NonNull::new(arena.as_mut().as_mut_ptr()).unwrap();
  let mut buddy = Buddy::new(base, SIZE, LEVELS, &store).unwrap();

  group.bench_function("leaves", |b| {
    b.iter(|| {
      let mut held = Vec::with_capacity(SIZE / LEAF);
      while let Ok(ptr) = buddy.allocate(black_box(LEAF)) {
        held.push(ptr);
      }
      for ptr in held {
        buddy.deallocate(ptr.as_ptr()).unwrap();
      }
    });
  });

  group.finish();
}

fn bench_churn(c: &mut Criterion) {
  let mut group = c.benchmark_group("churn");
  group.sample_size(50);

  let mut arena = Arena::new(SIZE).unwrap();
  let store = storage();
  let base = NonNull::new(arena.as_mut().as_mut_ptr()).unwrap();
  let mut buddy = Buddy::new(base, SIZE, LEVELS, &store).unwrap();

  let mut rng = rand::thread_rng();
  group.bench_function("mixed", |b| {
    b.iter(|| {
      let mut held: Vec<NonNull<u8>> = Vec::new();
      for _ in 0..64 {
        if held.is_empty() || rng.gen_bool(0.6) {
          let want = rng.gen_range(1..=SIZE / 4);
          if let Ok(ptr) = buddy.allocate(want) {
            held.push(ptr);
          }
        } else {
          let victim = held.swap_remove(rng.gen_range(0..held.len()));
          buddy.deallocate(victim.as_ptr()).unwrap();
        }
      }
      for ptr in held {
        buddy.deallocate(ptr.as_ptr()).unwrap();
      }
    });
  });

  group.finish();
}

criterion_group!(benches, bench_alloc_release, bench_fill_drain, bench_churn);
criterion_main!(benches);
