// Softkey Layout Geometry
// Sizes rows and keys from weights and rebuilds the nearby-key index

use indexmap::IndexMap;

use crate::layout::spatial::build_nearby_keys;
use crate::layout::weight::split_value;
use crate::KeyId;

/// A point in device-independent pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Final on-screen box of one key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyGeometry {
    pub id: KeyId,
    pub top_left: Point,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Character and compact keys take part in the nearby-key index
    pub spatial: bool,
    /// Keys close enough to be fat-finger candidates
    pub nearby_keys: Vec<KeyId>,
}

impl KeyGeometry {
    pub fn new(id: KeyId, top_left: Point, width: f64, height: f64, spatial: bool) -> Self {
        Self {
            id,
            top_left,
            center: Point::new(top_left.x + width / 2.0, top_left.y + height / 2.0),
            width,
            height,
            spatial,
            nearby_keys: Vec::new(),
        }
    }

    /// Whether a point falls inside this key's box
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.top_left.x
            && x < self.top_left.x + self.width
            && y >= self.top_left.y
            && y < self.top_left.y + self.height
    }
}

/// One key inside a row, sized by weight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    pub id: KeyId,
    pub width_weight: u32,
    pub spatial: bool,
}

/// One keyboard row, sized by weight
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowSpec {
    pub height_weight: u32,
    pub keys: Vec<KeySpec>,
}

/// Geometry of every key for one container size
#[derive(Debug, Clone, Default)]
pub struct KeyboardGeometry {
    width: u32,
    height: u32,
    keys: IndexMap<KeyId, KeyGeometry>,
}

impl KeyboardGeometry {
    /// Lay out `rows` inside a `width` x `height` container.
    ///
    /// Row heights and per-row key widths are exact integer partitions, so
    /// rows tile the container with no gaps or overlap.
    pub fn compute(rows: &[RowSpec], width: u32, height: u32) -> Self {
        let row_weights: Vec<u32> = rows.iter().map(|r| r.height_weight).collect();
        let row_heights = split_value(&row_weights, height);

        let mut placed = Vec::new();
        let mut y = 0u32;
        for (row, &row_height) in rows.iter().zip(&row_heights) {
            let key_weights: Vec<u32> = row.keys.iter().map(|k| k.width_weight).collect();
            let key_widths = split_value(&key_weights, width);

            let mut x = 0u32;
            for (spec, &key_width) in row.keys.iter().zip(&key_widths) {
                placed.push(KeyGeometry::new(
                    spec.id,
                    Point::new(f64::from(x), f64::from(y)),
                    f64::from(key_width),
                    f64::from(row_height),
                    spec.spatial,
                ));
                x += key_width;
            }
            y += row_height;
        }

        build_nearby_keys(&mut placed);
        log::debug!(
            "computed geometry for {} keys in {}x{}",
            placed.len(),
            width,
            height
        );

        Self {
            width,
            height,
            keys: placed.into_iter().map(|k| (k.id, k)).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, id: KeyId) -> Option<&KeyGeometry> {
        self.keys.get(&id)
    }

    /// Fat-finger candidates for a key (empty when unknown)
    pub fn nearby_keys(&self, id: KeyId) -> &[KeyId] {
        self.keys
            .get(&id)
            .map(|k| k.nearby_keys.as_slice())
            .unwrap_or(&[])
    }

    /// Key under a point, if any
    pub fn key_at(&self, x: f64, y: f64) -> Option<KeyId> {
        self.keys.values().find(|k| k.contains(x, y)).map(|k| k.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyGeometry> {
        self.keys.values()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
