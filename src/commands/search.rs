//! Key search (scan)

use crate::store::MemoryStore;

impl MemoryStore {
    /// Find all live keys matching a glob pattern, sorted
    ///
    /// `*` matches any run of characters (including none); every other
    /// character, regex metacharacters included, matches itself.
    pub fn scan(&mut self, pattern: &str) -> Vec<String> {
        // Expired keys are purged up front so the filter below sees one
        // consistent keyspace
        self.purge_expired();

        let pattern: Vec<char> = pattern.chars().collect();
        let mut keys: Vec<String> = self
            .entries
            .keys()
            .filter(|key| matches_pattern(key, &pattern))
            .cloned()
            .collect();
        keys.sort_unstable();
        keys
    }
}

/// Check if a key matches a pattern
///
/// Iterative wildcard matching: on a mismatch, backtrack to the most recent
/// `*` and let it swallow one more character.
fn matches_pattern(key: &str, pattern: &[char]) -> bool {
    let key: Vec<char> = key.chars().collect();
    let (mut k, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, k));
            p += 1;
        } else if p < pattern.len() && pattern[p] == key[k] {
            k += 1;
            p += 1;
        } else if let Some((star_p, star_k)) = star {
            p = star_p + 1;
            k = star_k + 1;
            star = Some((star_p, star_k + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
