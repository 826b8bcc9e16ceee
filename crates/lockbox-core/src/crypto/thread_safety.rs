//! Thread safety implementations for cryptographic types.
//!
//! This module provides the `unsafe impl Send` and `unsafe impl Sync` for
//! [`MasterKey`]. The `MemSafe` type from the `memsafe` crate contains a raw
//! pointer (`*mut T`) because it manages memory protection at the OS level,
//! which prevents the automatic `Send` and `Sync` implementations. Our usage
//! is sound because:
//!
//! 1. **RwLock protection**: all access to the underlying `MemSafe` data goes
//!    through `RwLock`, which provides proper synchronization.
//!
//! 2. **No concurrent raw pointer access**: the raw pointer is only used for
//!    memory protection operations (mlock, mprotect), which are thread-safe
//!    at the OS level. Data access goes through `MemSafe::read()` under the
//!    lock.
//!
//! 3. **No data races**: the raw pointer is never dereferenced without
//!    holding the lock, and the protected memory is valid regardless of
//!    which thread accesses it.

use super::keys::MasterKey;

// SAFETY: MasterKey can be sent between threads because its only field is
// wrapped in an RwLock, the MemSafe pointer targets memory valid on any
// thread, and the memory protection syscalls are thread-safe.
unsafe impl Send for MasterKey {}

// SAFETY: MasterKey can be shared between threads because all access to the
// key material goes through RwLock::read()/write(), and the raw pointer in
// MemSafe is never accessed without holding the lock.
unsafe impl Sync for MasterKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn master_key_is_send_and_sync() {
        assert_send::<MasterKey>();
        assert_sync::<MasterKey>();
        assert_send::<Arc<MasterKey>>();
    }

    #[test]
    fn can_share_across_threads() {
        let key = Arc::new(MasterKey::random().expect("generate key"));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let key = Arc::clone(&key);
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    key.with_key(|k| k[0]).expect("access key");
                }
            }));
        }

        for handle in handles {
            handle.join().expect("thread completed");
        }
    }
}
