const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

fn fnv1a_seeded(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = FNV_OFFSET ^ seed;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Deterministic hashing embedder used by the local index.
///
/// Not a semantic model: each dimension is an independently seeded FNV-1a
/// hash of the text, normalized into `[0, 1)`. Deterministic output keeps
/// index builds and queries reproducible without any model download.
#[derive(Clone, Debug)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let bytes = text.as_bytes();
        (0..self.dimension)
            .map(|seed| {
                let hash = fnv1a_seeded(bytes, seed as u64);
                (hash % 10_000) as f32 / 10_000.0
            })
            .collect()
    }
}
