use std::hint::black_box;
use std::time::Instant;

use mediawall_input::PointerEvent;
use mediawall_kernel::{MemoryRouter, Wall, WallConfig};
use mediawall_layout::{ItemDescriptor, Orientation, WallDocument, WallLayout};

fn make_wall(item_count: usize) -> Wall {
    let side = (item_count as f32).sqrt().ceil() as usize;
    let items = (0..item_count)
        .map(|i| ItemDescriptor {
            position: [(i % side) as f32 * 1.5, 0.0, -((i / side) as f32) * 1.5],
            rotation: Orientation::default(),
            image: Some(format!("/assets/{i}.jpg")),
        })
        .collect();
    let layout = WallLayout::from_document(WallDocument {
        origin: [0.0, -0.5, 0.0],
        items,
    })
    .unwrap();
    Wall::new(layout, WallConfig::default(), MemoryRouter::new())
}

fn bench_step(item_count: usize, iterations: usize) {
    let mut wall = make_wall(item_count);
    let first = wall.layout().items()[0].id;
    wall.handle(PointerEvent::Enter(first));
    wall.handle(PointerEvent::click(first));

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(wall.step(black_box(1.0 / 60.0)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  step ({item_count} items, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_click_cycle(item_count: usize, iterations: usize) {
    let mut wall = make_wall(item_count);
    let ids: Vec<_> = wall.layout().ids().collect();

    let start = Instant::now();
    for i in 0..iterations {
        wall.handle(PointerEvent::click(ids[i % ids.len()]));
        if i % 7 == 0 {
            wall.handle(PointerEvent::miss());
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  click ({item_count} items, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
    black_box(wall.drain_events());
}

fn main() {
    println!("wall frame step benchmarks");
    for count in [9, 100, 1_000] {
        bench_step(count, 10_000);
    }
    for count in [9, 100] {
        bench_click_cycle(count, 10_000);
    }
}
