// Softkey Weight Distributor
// Exact integer partition of a pixel size by relative weights

/// Split `size` into integer parts proportional to `weights`.
///
/// The parts always sum to `size`. Each part starts at the floor of its
/// exact share; the remaining units go one at a time to the part with the
/// largest fractional remainder (first one wins ties), and a part's
/// remainder is zeroed once it has been awarded.
///
/// A zero total weight splits evenly, using the same remainder rule.
///
/// # Examples
/// ```
/// use softkey_core::layout::split_value;
/// assert_eq!(split_value(&[1, 1, 1], 10), vec![4, 3, 3]);
/// assert_eq!(split_value(&[1, 3], 8), vec![2, 6]);
/// ```
pub fn split_value(weights: &[u32], size: u32) -> Vec<u32> {
    match weights {
        [] => Vec::new(),
        [_] => vec![size],
        _ => {
            let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
            if total == 0 {
                return split_value(&vec![1; weights.len()], size);
            }
            distribute(weights, total, size)
        }
    }
}

fn distribute(weights: &[u32], total: u64, size: u32) -> Vec<u32> {
    let size = u64::from(size);
    let mut parts = Vec::with_capacity(weights.len());
    // Remainders are kept as exact numerators over `total`.
    let mut remainders = Vec::with_capacity(weights.len());
    for &weight in weights {
        let scaled = u64::from(weight) * size;
        parts.push(scaled / total);
        remainders.push(scaled % total);
    }

    let allocated: u64 = parts.iter().sum();
    for _ in 0..size - allocated {
        let mut best = 0;
        for (i, &rem) in remainders.iter().enumerate() {
            if rem > remainders[best] {
                best = i;
            }
        }
        parts[best] += 1;
        remainders[best] = 0;
    }

    // Every part is bounded by `size`, which came from a u32.
    parts.into_iter().map(|p| p as u32).collect()
}
