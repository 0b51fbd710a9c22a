use crate::{PheError, Result};

pub const DEFAULT_SCALE: u64 = 1_000_000;
pub const DEFAULT_HEADROOM_BITS: u32 = 8;
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Kit-level settings shared by every scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KitConfig {
    /// Fixed-point factor: a real `x` is encoded as `round(x * scale)`.
    pub scale: u64,
    /// Bits of plaintext capacity kept free so that sums of encoded values stay decodable.
    pub headroom_bits: u32,
    /// Worker threads of the batch pool, 0 for one per logical core.
    pub threads: usize,
    /// Number of consecutive batch elements handled by one task.
    pub chunk_size: usize,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            headroom_bits: DEFAULT_HEADROOM_BITS,
            threads: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl KitConfig {
    pub fn with_scale(mut self, scale: u64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_headroom_bits(mut self, headroom_bits: u32) -> Self {
        self.headroom_bits = headroom_bits;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(PheError::InvalidConfig("scale must be positive".into()));
        }
        if self.chunk_size == 0 {
            return Err(PheError::InvalidConfig("chunk_size must be positive".into()));
        }
        Ok(())
    }
}
