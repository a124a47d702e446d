//! Authoritative avatar state for the tracking server
//!
//! The store maps avatar identifiers to their current position and is the only
//! place positions are mutated. Every mutation enforces the world bounds:
//! spawns outside the world are rejected outright, while moves saturate at the
//! world edges. A stored position is therefore always inside
//! `[WORLD_MIN, WORLD_MAX]` on both axes.
//!
//! The store itself is a plain owned value. The network layer wraps a single
//! instance in `Arc<RwLock<_>>` so each operation runs under one lock.

use crate::error::StoreError;
use avatar_shared::{clamp_coordinate, in_bounds, Position};
use log::info;
use std::collections::HashMap;

/// Axis along which a move is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Avatar positions indexed by identifier
#[derive(Debug, Default, Clone)]
pub struct AvatarStore {
    avatars: HashMap<String, Position>,
}

impl AvatarStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            avatars: HashMap::new(),
        }
    }

    /// Creates or replaces an avatar at the given coordinates
    ///
    /// Both coordinates must lie inside the world. A rejected spawn leaves the
    /// store untouched, including any avatar already registered under `id`.
    pub fn spawn(&mut self, id: &str, x: i64, y: i64) -> Result<Position, StoreError> {
        if !in_bounds(x) || !in_bounds(y) {
            return Err(StoreError::OutOfBounds { x, y });
        }

        let position = Position::new(x, y);
        if self.avatars.insert(id.to_string(), position).is_some() {
            info!("Respawned avatar {} at ({}, {})", id, x, y);
        } else {
            info!("Spawned avatar {} at ({}, {})", id, x, y);
        }

        Ok(position)
    }

    /// Translates an avatar along the x axis, saturating at the world edges
    pub fn move_along_x(&mut self, id: &str, delta: i64) -> Result<Position, StoreError> {
        self.translate(id, Axis::X, delta)
    }

    /// Translates an avatar along the y axis, saturating at the world edges
    pub fn move_along_y(&mut self, id: &str, delta: i64) -> Result<Position, StoreError> {
        self.translate(id, Axis::Y, delta)
    }

    /// Moves an avatar along one axis, clamping the result to the world
    ///
    /// Fails with `NotFound` and leaves the store unchanged if `id` was never
    /// spawned.
    pub fn translate(&mut self, id: &str, axis: Axis, delta: i64) -> Result<Position, StoreError> {
        let position = self
            .avatars
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let coordinate = match axis {
            Axis::X => &mut position.x,
            Axis::Y => &mut position.y,
        };
        *coordinate = clamp_coordinate(coordinate.saturating_add(delta));

        Ok(*position)
    }

    /// Returns the current position of an avatar
    pub fn position(&self, id: &str) -> Result<Position, StoreError> {
        self.avatars
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Returns true if an avatar is registered under `id`
    pub fn contains(&self, id: &str) -> bool {
        self.avatars.contains_key(id)
    }

    /// Returns the number of avatars currently tracked
    pub fn len(&self) -> usize {
        self.avatars.len()
    }

    /// Returns true if no avatar has been spawned yet
    pub fn is_empty(&self) -> bool {
        self.avatars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatar_shared::{WORLD_MAX, WORLD_MIN};

    fn store_with(id: &str, x: i64, y: i64) -> AvatarStore {
        let mut store = AvatarStore::new();
        store.spawn(id, x, y).unwrap();
        store
    }

    fn assert_in_world(store: &AvatarStore, id: &str) {
        let position = store.position(id).unwrap();
        assert!((WORLD_MIN..=WORLD_MAX).contains(&position.x));
        assert!((WORLD_MIN..=WORLD_MAX).contains(&position.y));
    }

    #[test]
    fn test_store_creation() {
        let store = AvatarStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_spawn() {
        let mut store = AvatarStore::new();

        let position = store.spawn("avatar1", 50, 50).unwrap();
        assert_eq!(position, Position::new(50, 50));
        assert_eq!(store.len(), 1);
        assert!(store.contains("avatar1"));
    }

    #[test]
    fn test_spawn_accepts_world_corners() {
        let mut store = AvatarStore::new();

        assert!(store.spawn("a", 0, 0).is_ok());
        assert!(store.spawn("b", 200, 200).is_ok());
        assert!(store.spawn("c", 0, 200).is_ok());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_spawn_out_of_bounds_is_rejected() {
        let mut store = AvatarStore::new();

        let cases = [(-10, -10), (-1, 0), (0, -1), (201, 0), (0, 201), (1000, 50)];
        for (x, y) in cases {
            let result = store.spawn("avatar4", x, y);
            assert!(
                matches!(result, Err(StoreError::OutOfBounds { .. })),
                "Spawn at ({}, {}) should be rejected",
                x,
                y
            );
        }

        assert!(store.is_empty());
        assert!(matches!(
            store.position("avatar4"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_rejected_spawn_keeps_existing_avatar() {
        let mut store = store_with("avatar1", 30, 40);

        assert!(store.spawn("avatar1", 250, 10).is_err());

        assert_eq!(store.position("avatar1").unwrap(), Position::new(30, 40));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_spawn_overwrites_existing_avatar() {
        let mut store = store_with("avatar1", 30, 40);
        store.move_along_x("avatar1", 100).unwrap();

        store.spawn("avatar1", 5, 6).unwrap();

        assert_eq!(store.position("avatar1").unwrap(), Position::new(5, 6));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_move_along_x_only_changes_x() {
        let mut store = store_with("avatar1", 50, 50);

        let position = store.move_along_x("avatar1", -30).unwrap();

        assert_eq!(position, Position::new(20, 50));
        assert_eq!(store.position("avatar1").unwrap(), Position::new(20, 50));
    }

    #[test]
    fn test_move_along_y_only_changes_y() {
        let mut store = store_with("avatar1", 20, 50);

        let position = store.move_along_y("avatar1", 120).unwrap();

        assert_eq!(position, Position::new(20, 170));
    }

    #[test]
    fn test_moves_clamp_at_edges() {
        let mut store = store_with("avatar3", 0, 0);

        assert_eq!(store.move_along_x("avatar3", -50).unwrap().x, 0);
        assert_eq!(store.move_along_x("avatar3", 200).unwrap().x, 200);
        assert_eq!(store.move_along_y("avatar3", -200).unwrap().y, 0);
        assert_eq!(store.move_along_y("avatar3", 200).unwrap().y, 200);
        assert_eq!(store.move_along_x("avatar3", -500).unwrap().x, 0);
        assert_eq!(store.position("avatar3").unwrap(), Position::new(0, 200));
    }

    #[test]
    fn test_clamp_matches_formula_for_any_delta() {
        let deltas = [
            -10_000, -201, -200, -150, -1, 0, 1, 37, 150, 200, 201, 10_000,
            i64::MIN, i64::MAX,
        ];

        for start in [0, 1, 100, 199, 200] {
            for delta in deltas {
                let mut store = store_with("a", start, 100);
                let moved = store.move_along_x("a", delta).unwrap();
                let expected = 200_i64.min(0_i64.max(start.saturating_add(delta)));

                assert_eq!(moved.x, expected, "start {} delta {}", start, delta);
                assert_eq!(moved.y, 100);
            }
        }
    }

    #[test]
    fn test_sequential_moves_accumulate() {
        let mut store = store_with("avatar1", 20, 100);

        store.move_along_y("avatar1", 20).unwrap();
        store.move_along_y("avatar1", 20).unwrap();

        assert_eq!(store.position("avatar1").unwrap().y, 140);
    }

    #[test]
    fn test_missing_avatar_is_not_created() {
        let mut store = store_with("avatar1", 10, 10);

        assert!(matches!(
            store.move_along_x("nonExistentAvatar", 10),
            Err(StoreError::NotFound(id)) if id == "nonExistentAvatar"
        ));
        assert!(store.move_along_y("nonExistentAvatar", 10).is_err());
        assert!(store.position("nonExistentAvatar").is_err());

        assert_eq!(store.len(), 1);
        assert!(!store.contains("nonExistentAvatar"));
        assert_eq!(store.position("avatar1").unwrap(), Position::new(10, 10));
    }

    #[test]
    fn test_bounds_hold_over_mixed_sequence() {
        let mut store = AvatarStore::new();
        store.spawn("a", 100, 100).unwrap();
        store.spawn("b", 0, 200).unwrap();

        let steps: [(&str, Axis, i64); 8] = [
            ("a", Axis::X, 75),
            ("a", Axis::X, 75),
            ("b", Axis::Y, 1),
            ("b", Axis::X, -3),
            ("a", Axis::Y, -999),
            ("b", Axis::Y, -250),
            ("a", Axis::Y, 42),
            ("b", Axis::X, 400),
        ];

        for (id, axis, delta) in steps {
            store.translate(id, axis, delta).unwrap();
            assert_in_world(&store, "a");
            assert_in_world(&store, "b");
        }

        assert_eq!(store.position("a").unwrap(), Position::new(200, 42));
        assert_eq!(store.position("b").unwrap(), Position::new(200, 0));
    }

    #[test]
    fn test_independent_stores() {
        let mut first = store_with("avatar1", 1, 1);
        let second = AvatarStore::new();

        first.move_along_x("avatar1", 5).unwrap();

        assert!(first.contains("avatar1"));
        assert!(!second.contains("avatar1"));
    }
}
