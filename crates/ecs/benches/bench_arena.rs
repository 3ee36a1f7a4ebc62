use std::hint::black_box;
use std::time::Instant;

use kestrel_common::ComponentHandle;
use kestrel_ecs::{Arena, ComponentSystem, Spatial};

fn bench_churn(count: usize, iterations: usize) {
    let mut arena: Arena<ComponentHandle, [f32; 16]> = Arena::new();
    let mut live: Vec<ComponentHandle> = (0..count)
        .map(|_| arena.create_object([0.0; 16]).0)
        .collect();

    let start = Instant::now();
    for i in 0..iterations {
        let victim = live.swap_remove(i % live.len());
        arena.destroy_object(victim);
        let (handle, _) = arena.create_object(black_box([1.0; 16]));
        live.push(handle);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  churn ({count} live, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
    assert_eq!(arena.slot_count(), count);
}

fn bench_lookup(count: usize, iterations: usize) {
    let mut arena: Arena<ComponentHandle, u64> = Arena::new();
    let handles: Vec<ComponentHandle> = (0..count as u64)
        .map(|i| arena.create_object(i).0)
        .collect();

    let start = Instant::now();
    let mut sum = 0u64;
    for i in 0..iterations {
        if let Some(v) = arena.get_object(handles[i % count]) {
            sum = sum.wrapping_add(*v);
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  lookup ({count} objects, {iterations} iters): {per_iter:?}/iter, sum {}", black_box(sum));
}

fn bench_physics_tick(count: usize, iterations: usize) {
    let mut system = ComponentSystem::<Spatial>::new();
    for i in 0..count {
        system.create_component(Spatial {
            velocity: glam::Vec3::new(i as f32, 0.0, 1.0),
            ..Spatial::default()
        });
    }

    let start = Instant::now();
    for _ in 0..iterations {
        system.physics_tick_all(black_box(1.0 / 60.0));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  physics_tick ({count} spatials, {iterations} iters): {per_iter:?}/iter");
}

fn main() {
    println!("arena benchmarks");
    bench_churn(1_000, 100_000);
    bench_churn(10_000, 100_000);
    bench_lookup(10_000, 1_000_000);
    bench_physics_tick(10_000, 100);
}
