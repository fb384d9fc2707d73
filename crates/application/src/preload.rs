/// How far around the current slot the cache is warmed, in slots.
pub const PRELOAD_RADIUS: usize = 2;

/// Slots worth prefetching around `current`: the nearer neighbors first,
/// bounds-filtered, never the current slot itself.
pub fn candidates(current: usize, total_slots: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(PRELOAD_RADIUS * 2);
    for offset in 1..=PRELOAD_RADIUS {
        if let Some(prev) = current.checked_sub(offset) {
            out.push(prev);
        }
        let next = current + offset;
        if next < total_slots {
            out.push(next);
        }
    }
    out
}
