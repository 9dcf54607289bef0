//! Reusable read buffers shared by the fetch workers.
//!
//! High-churn crawls allocate one response buffer per fetch; recycling them
//! through a small pool keeps the hot path allocation-free once the pool is
//! warm. Buffers are handed out zero-filled at the requested size.

use parking_lot::Mutex;

pub(crate) struct BufferPool {
    pool: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub(crate) fn new() -> Self {
        Self {
            pool: Mutex::new(Vec::new()),
        }
    }

    /// Takes a zero-filled buffer of exactly `len` bytes.
    pub(crate) fn get(&self, len: usize) -> Vec<u8> {
        let mut buf = self
            .pool
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(len));
        buf.clear();
        buf.resize(len, 0);
        buf
    }

    pub(crate) fn put(&self, buf: Vec<u8>) {
        self.pool.lock().push(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_pool_recycles_and_clears() {
        let pool = BufferPool::new();

        let mut buf = pool.get(8);
        assert_eq!(buf.len(), 8);
        buf[0] = 0xFF;
        pool.put(buf);

        let buf = pool.get(8);
        assert_eq!(buf.len(), 8);
        assert_eq!(buf[0], 0);
    }
}
