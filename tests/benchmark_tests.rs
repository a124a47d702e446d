//! Performance benchmarks for the store and the wire codec

use avatar_server::handler::dispatch;
use avatar_server::store::AvatarStore;
use avatar_shared::{Position, Request, Response};
use std::time::Instant;

/// Benchmarks clamped moves on a single avatar
#[test]
fn benchmark_store_moves() {
    let mut store = AvatarStore::new();
    store.spawn("avatar1", 100, 100).unwrap();

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let delta = if i % 2 == 0 { 37 } else { -41 };
        store.move_along_x("avatar1", delta).unwrap();
        store.move_along_y("avatar1", -delta).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Store moves: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    let position = store.position("avatar1").unwrap();
    assert!((0..=200).contains(&position.x));
    assert!((0..=200).contains(&position.y));

    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks spawning many distinct avatars
#[test]
fn benchmark_store_spawns() {
    let mut store = AvatarStore::new();

    let avatars = 50_000;
    let start = Instant::now();

    for i in 0..avatars {
        let id = format!("avatar{}", i);
        store.spawn(&id, i % 201, (i * 7) % 201).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Store spawns: {} avatars in {:?} ({:.2} μs/avatar)",
        avatars,
        duration,
        duration.as_micros() as f64 / avatars as f64
    );

    assert_eq!(store.len(), avatars as usize);
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks decode, dispatch and encode of a full request
#[test]
fn benchmark_request_pipeline() {
    let mut store = AvatarStore::new();
    store.spawn("avatar1", 50, 50).unwrap();

    let messages = [
        r#"{"action":"moveUp","id":"avatar1","distance":3}"#,
        r#"{"action":"moveUp","id":"avatar1","distance":-3}"#,
        r#"{"action":"moveRight","id":"avatar1","distance":5}"#,
        r#"{"action":"moveRight","id":"avatar1","distance":-5}"#,
        r#"{"action":"position","id":"avatar1"}"#,
    ];

    let iterations = 30_000;
    let start = Instant::now();
    let mut last = Response::Success;

    for i in 0..iterations {
        let request = Request::decode(messages[i % messages.len()]).unwrap();
        last = dispatch(&mut store, request);
        let _ = last.encode();
    }

    let duration = start.elapsed();
    println!(
        "Request pipeline: {} requests in {:?} ({:.2} μs/request)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert_eq!(last, Response::Position(Position::new(50, 50)));
    assert!(duration.as_millis() < 2000);
}
