/// Hashes a key to a server index in `0..nservers`.
///
/// Parses the key as a non-negative integer if possible, otherwise falls
/// back to the Unicode code point of its first character. An empty key
/// hashes to `0`.
fn key_hash(key: &str) -> u64 {
    match key.parse::<u64>() {
        Ok(n) => n,
        Err(_) => key.chars().next().map_or(0, |c| c as u64),
    }
}

/// The primary server for `key`: `h(key) mod nservers`.
pub fn primary_of(key: &str, nservers: usize) -> usize {
    debug_assert!(nservers > 0, "nservers must be >= 1");
    (key_hash(key) % nservers as u64) as usize
}

/// The ordered, contiguous preference list for `key`: `nreplicas` servers
/// starting at the primary and wrapping around the ring.
///
/// Ordering matters — callers always attempt the primary first, then walk
/// the list in order.
pub fn preference_list(key: &str, nservers: usize, nreplicas: usize) -> Vec<usize> {
    let primary = primary_of(key, nservers);
    (0..nreplicas)
        .map(|offset| (primary + offset) % nservers)
        .collect()
}
