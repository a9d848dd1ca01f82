use std::collections::HashMap;

use parking_lot::Mutex;

/// Maximum number of idle buffers retained per size class. Overflow
/// buffers are dropped rather than pooled, bounding retained memory.
pub const MAX_POOL_DEPTH: usize = 10;

/// Size-keyed reuse pool for raw capture buffers and encoder scratch.
///
/// Eliminates per-frame allocation on the capture hot path: the worker
/// acquires a byte buffer per read, hands it through the frame channel,
/// and the pipeline returns it after encoding. A buffer is owned by
/// exactly one holder at a time — the pool (idle) or a pipeline stage
/// (in flight); acquire/release is the only synchronization buffers need.
///
/// Byte pools (capture-facing) and sample pools (process-local scratch)
/// are tracked separately because their allocation strategy differs.
///
/// Invariant: pooled buffers keep their full logical length (`len() ==`
/// the capacity they were acquired with). Consumers treat the valid
/// prefix via an explicit count and must not truncate the vector.
#[derive(Debug, Default)]
pub struct BufferPool {
    byte_pools: Mutex<HashMap<usize, Vec<Vec<u8>>>>,
    sample_pools: Mutex<HashMap<usize, Vec<Vec<i16>>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an idle byte buffer of exactly `capacity` bytes, or allocate
    /// a fresh zeroed one if the size class is empty.
    pub fn acquire_bytes(&self, capacity: usize) -> Vec<u8> {
        let mut pools = self.byte_pools.lock();
        match pools.get_mut(&capacity).and_then(Vec::pop) {
            Some(buf) => buf,
            None => vec![0u8; capacity],
        }
    }

    /// Return a byte buffer to its size-keyed pool.
    ///
    /// Never disrupts the caller's control flow: when the size class is
    /// already at `MAX_POOL_DEPTH` the buffer is simply dropped.
    pub fn release_bytes(&self, buf: Vec<u8>) {
        if buf.is_empty() {
            return;
        }
        let mut pools = self.byte_pools.lock();
        let pool = pools.entry(buf.len()).or_default();
        if pool.len() < MAX_POOL_DEPTH {
            pool.push(buf);
        } else {
            log::debug!("byte pool full for capacity {}, dropping buffer", buf.len());
        }
    }

    /// Get an idle sample buffer of exactly `capacity` elements.
    pub fn acquire_samples(&self, capacity: usize) -> Vec<i16> {
        let mut pools = self.sample_pools.lock();
        match pools.get_mut(&capacity).and_then(Vec::pop) {
            Some(buf) => buf,
            None => vec![0i16; capacity],
        }
    }

    /// Return a sample buffer to its size-keyed pool.
    pub fn release_samples(&self, buf: Vec<i16>) {
        if buf.is_empty() {
            return;
        }
        let mut pools = self.sample_pools.lock();
        let pool = pools.entry(buf.len()).or_default();
        if pool.len() < MAX_POOL_DEPTH {
            pool.push(buf);
        } else {
            log::debug!("sample pool full for capacity {}, dropping buffer", buf.len());
        }
    }

    /// Drain every pool. Only call with no session active; draining during
    /// capture is a caller error that is not detected here.
    pub fn clear_all(&self) {
        self.byte_pools.lock().clear();
        self.sample_pools.lock().clear();
    }

    /// Number of idle byte buffers retained for `capacity`.
    pub fn idle_bytes(&self, capacity: usize) -> usize {
        self.byte_pools.lock().get(&capacity).map_or(0, Vec::len)
    }

    /// Number of idle sample buffers retained for `capacity`.
    pub fn idle_samples(&self, capacity: usize) -> usize {
        self.sample_pools.lock().get(&capacity).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_release_acquire_reuses() {
        let pool = BufferPool::new();
        let mut buf = pool.acquire_bytes(128);
        assert_eq!(buf.len(), 128);
        buf[0] = 42;
        let ptr = buf.as_ptr();

        pool.release_bytes(buf);
        assert_eq!(pool.idle_bytes(128), 1);

        let again = pool.acquire_bytes(128);
        assert_eq!(again.len(), 128);
        assert_eq!(again.as_ptr(), ptr); // reuse, not reallocation
        assert_eq!(pool.idle_bytes(128), 0);
    }

    #[test]
    fn size_classes_are_independent() {
        let pool = BufferPool::new();
        pool.release_bytes(vec![0u8; 64]);
        pool.release_bytes(vec![0u8; 128]);

        assert_eq!(pool.idle_bytes(64), 1);
        assert_eq!(pool.idle_bytes(128), 1);
        assert_eq!(pool.acquire_bytes(64).len(), 64);
        assert_eq!(pool.acquire_bytes(128).len(), 128);
    }

    #[test]
    fn depth_cap_discards_overflow() {
        let pool = BufferPool::new();
        for _ in 0..MAX_POOL_DEPTH + 5 {
            pool.release_bytes(vec![0u8; 32]);
        }
        assert_eq!(pool.idle_bytes(32), MAX_POOL_DEPTH);
    }

    #[test]
    fn byte_and_sample_pools_are_separate() {
        let pool = BufferPool::new();
        pool.release_bytes(vec![0u8; 16]);
        pool.release_samples(vec![0i16; 16]);

        assert_eq!(pool.idle_bytes(16), 1);
        assert_eq!(pool.idle_samples(16), 1);

        let samples = pool.acquire_samples(16);
        assert_eq!(samples.len(), 16);
        assert_eq!(pool.idle_bytes(16), 1); // untouched
    }

    #[test]
    fn clear_all_drains_everything() {
        let pool = BufferPool::new();
        pool.release_bytes(vec![0u8; 8]);
        pool.release_samples(vec![0i16; 8]);

        pool.clear_all();

        assert_eq!(pool.idle_bytes(8), 0);
        assert_eq!(pool.idle_samples(8), 0);
    }

    #[test]
    fn empty_release_is_ignored() {
        let pool = BufferPool::new();
        pool.release_bytes(Vec::new());
        pool.release_samples(Vec::new());
        assert_eq!(pool.idle_bytes(0), 0);
    }
}
