//! RAII guard for process-global environment variables in tests.
//!
//! Tests that mutate environment variables must restore them even if the
//! test panics. The guard snapshots the variable in `new()` and restores it
//! in `Drop`. Tests using it must still be `#[serial]`.

use std::env;
use std::ffi::OsString;

/// RAII guard that restores an environment variable on drop.
pub struct EnvGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvGuard {
    /// Snapshot the current value of `key`.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            original: env::var_os(key),
        }
    }

    /// Snapshot `key`, then set it to `value`.
    ///
    /// # Safety
    /// Calls `std::env::set_var`; callers must be `#[serial]`.
    pub unsafe fn set(key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let guard = Self::new(key);
        unsafe { env::set_var(key, value) };
        guard
    }

    /// Snapshot `key`, then remove it.
    ///
    /// # Safety
    /// Calls `std::env::remove_var`; callers must be `#[serial]`.
    pub unsafe fn remove(key: &str) -> Self {
        let guard = Self::new(key);
        unsafe { env::remove_var(key) };
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests holding an EnvGuard are #[serial].
        match &self.original {
            Some(val) => unsafe { env::set_var(&self.key, val) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_guard_restores_existing_var() {
        let key = "PUZZLE_BROWSER_TEST_GUARD_EXISTING";
        unsafe { env::set_var(key, "original_value") };
        {
            let _guard = unsafe { EnvGuard::set(key, "modified_value") };
            assert_eq!(env::var(key).unwrap(), "modified_value");
        }
        assert_eq!(env::var(key).unwrap(), "original_value");
        unsafe { env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_env_guard_restores_absent_var() {
        let key = "PUZZLE_BROWSER_TEST_GUARD_ABSENT";
        unsafe { env::remove_var(key) };
        {
            let _guard = unsafe { EnvGuard::set(key, "temporary") };
            assert_eq!(env::var(key).unwrap(), "temporary");
        }
        assert!(env::var(key).is_err());
    }
}
