//! Pointer hit-testing for drag-and-drop sorting.
//!
//! Mouse and touch input both arrive as pointer down/move/up events. Drop
//! targets are registered as rectangles in whatever coordinate space the
//! renderer uses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point in renderer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box. Left and top edges are inclusive, right and
/// bottom edges exclusive, so adjacent regions never both contain a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Registered drop targets.
#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    regions: Vec<(String, Rect)>,
}

impl RegionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or move a region. Re-registering brings it to the top.
    pub fn register(&mut self, id: impl Into<String>, rect: Rect) {
        let id = id.into();
        self.regions.retain(|(existing, _)| *existing != id);
        self.regions.push((id, rect));
    }

    pub fn unregister(&mut self, id: &str) {
        self.regions.retain(|(existing, _)| existing != id);
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The topmost (most recently registered) region containing `p`.
    pub fn hit_test(&self, p: Point) -> Option<&str> {
        self.regions
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(p))
            .map(|(id, _)| id.as_str())
    }
}

/// Unified pointer input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { item: String, at: Point },
    Move { at: Point },
    Up { at: Point },
    Cancel,
}

/// A completed drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub item: String,
    /// Region under the pointer on release, `None` when released outside.
    pub target: Option<String>,
}

/// Drag state for a single pointer.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    dragging: Option<String>,
    position: Option<Point>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Region currently under the dragged item, for hover highlighting.
    pub fn hovered<'r>(&self, regions: &'r RegionMap) -> Option<&'r str> {
        self.dragging.as_ref()?;
        regions.hit_test(self.position?)
    }

    /// Feed an event. Returns a drop when a drag ends with a release.
    pub fn handle(&mut self, event: PointerEvent, regions: &RegionMap) -> Option<DropEvent> {
        match event {
            PointerEvent::Down { item, at } => {
                self.dragging = Some(item);
                self.position = Some(at);
                None
            }
            PointerEvent::Move { at } => {
                if self.dragging.is_some() {
                    self.position = Some(at);
                }
                None
            }
            PointerEvent::Up { at } => {
                let item = self.dragging.take()?;
                self.position = None;
                Some(DropEvent {
                    item,
                    target: regions.hit_test(at).map(str::to_string),
                })
            }
            PointerEvent::Cancel => {
                self.dragging = None;
                self.position = None;
                None
            }
        }
    }
}

/// Item placement for a sorting exercise, driven by drops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortingBoard {
    placements: BTreeMap<String, String>,
}

impl SortingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a drop. Dropping outside every region returns the item to the pool.
    pub fn apply(&mut self, drop: DropEvent) {
        match drop.target {
            Some(category) => {
                self.placements.insert(drop.item, category);
            }
            None => {
                self.placements.remove(&drop.item);
            }
        }
    }

    pub fn category_of(&self, item: &str) -> Option<&str> {
        self.placements.get(item).map(String::as_str)
    }

    /// Items placed in a category, in id order.
    pub fn items_in(&self, category: &str) -> Vec<&str> {
        self.placements
            .iter()
            .filter(|(_, c)| c.as_str() == category)
            .map(|(item, _)| item.as_str())
            .collect()
    }

    /// Current placements as a validator mapping.
    pub fn placements(&self) -> &BTreeMap<String, String> {
        &self.placements
    }

    pub fn into_answer(self) -> crate::types::Answer {
        crate::types::Answer::Mapping(self.placements)
    }

    pub fn reset(&mut self) {
        self.placements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> RegionMap {
        let mut map = RegionMap::new();
        map.register("fruit", Rect::new(0.0, 0.0, 100.0, 100.0));
        map.register("veg", Rect::new(100.0, 0.0, 100.0, 100.0));
        map
    }

    #[test]
    fn hit_test_by_bounds() {
        let map = regions();
        assert_eq!(map.hit_test(Point::new(50.0, 50.0)), Some("fruit"));
        assert_eq!(map.hit_test(Point::new(100.0, 50.0)), Some("veg"));
        assert_eq!(map.hit_test(Point::new(250.0, 50.0)), None);
    }

    #[test]
    fn topmost_region_wins() {
        let mut map = regions();
        map.register("basket", Rect::new(50.0, 0.0, 100.0, 50.0));
        assert_eq!(map.hit_test(Point::new(60.0, 10.0)), Some("basket"));
        map.unregister("basket");
        assert_eq!(map.hit_test(Point::new(60.0, 10.0)), Some("fruit"));
    }

    #[test]
    fn drag_and_drop_into_region() {
        let map = regions();
        let mut tracker = DragTracker::new();
        assert_eq!(
            tracker.handle(
                PointerEvent::Down {
                    item: "apple".into(),
                    at: Point::new(300.0, 300.0),
                },
                &map,
            ),
            None
        );
        tracker.handle(PointerEvent::Move { at: Point::new(20.0, 20.0) }, &map);
        assert_eq!(tracker.hovered(&map), Some("fruit"));

        let drop = tracker.handle(PointerEvent::Up { at: Point::new(20.0, 20.0) }, &map);
        assert_eq!(
            drop,
            Some(DropEvent {
                item: "apple".into(),
                target: Some("fruit".into()),
            })
        );
        assert_eq!(tracker.dragging(), None);
    }

    #[test]
    fn up_without_down_is_ignored() {
        let map = regions();
        let mut tracker = DragTracker::new();
        assert_eq!(tracker.handle(PointerEvent::Up { at: Point::new(1.0, 1.0) }, &map), None);
    }

    #[test]
    fn cancel_drops_nothing() {
        let map = regions();
        let mut tracker = DragTracker::new();
        tracker.handle(
            PointerEvent::Down {
                item: "apple".into(),
                at: Point::new(0.0, 0.0),
            },
            &map,
        );
        tracker.handle(PointerEvent::Cancel, &map);
        assert_eq!(tracker.handle(PointerEvent::Up { at: Point::new(1.0, 1.0) }, &map), None);
    }

    #[test]
    fn board_tracks_placements() {
        let mut board = SortingBoard::new();
        board.apply(DropEvent {
            item: "apple".into(),
            target: Some("fruit".into()),
        });
        board.apply(DropEvent {
            item: "carrot".into(),
            target: Some("fruit".into()),
        });
        assert_eq!(board.items_in("fruit"), vec!["apple", "carrot"]);

        board.apply(DropEvent {
            item: "carrot".into(),
            target: Some("veg".into()),
        });
        assert_eq!(board.category_of("carrot"), Some("veg"));

        board.apply(DropEvent {
            item: "apple".into(),
            target: None,
        });
        assert_eq!(board.category_of("apple"), None);
    }
}
