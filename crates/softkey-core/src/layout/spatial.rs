// Softkey Spatial Index
// Nearby-key adjacency used for fat-finger correction hints

use crate::layout::geometry::KeyGeometry;

/// Squared-distance threshold, as a multiple of the first key's width squared
pub const NEARBY_KEY_FACTOR: f64 = 1.2;

/// Whether `other` lies near `key`.
///
/// Measures from the center of `key` to the closest point of the box of
/// `other`, clamping each axis to the box edges independently.
pub fn is_nearby(key: &KeyGeometry, other: &KeyGeometry) -> bool {
    let right = other.top_left.x + other.width;
    let bottom = other.top_left.y + other.height;
    let x = key.center.x.clamp(other.top_left.x, right);
    let y = key.center.y.clamp(other.top_left.y, bottom);
    let dx = key.center.x - x;
    let dy = key.center.y - y;
    dx * dx + dy * dy < NEARBY_KEY_FACTOR * key.width * key.width
}

/// Rebuild `nearby_keys` for every key from scratch.
///
/// Only spatially qualified keys (character and compact keys) take part.
/// Adjacency is symmetric: when a pair qualifies both keys list each other.
pub fn build_nearby_keys(keys: &mut [KeyGeometry]) {
    for key in keys.iter_mut() {
        key.nearby_keys.clear();
    }

    let mut pairs = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        if !key.spatial {
            continue;
        }
        for (j, other) in keys.iter().enumerate().skip(i + 1) {
            if other.spatial && is_nearby(key, other) {
                pairs.push((i, j));
            }
        }
    }

    for (i, j) in pairs {
        let (a, b) = (keys[i].id, keys[j].id);
        keys[i].nearby_keys.push(b);
        keys[j].nearby_keys.push(a);
    }
    log::trace!("rebuilt nearby keys for {} keys", keys.len());
}
