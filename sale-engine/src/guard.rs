//! Reentrancy guard
//!
//! A two-state latch shared by every settlement entry point. The recipient
//! notification callback runs synchronously inside an outer settlement call,
//! so a hostile recipient can try to start a second purchase before the first
//! finishes; the latch turns that attempt into a clean failure.
//!
//! Release is unconditional: the permit restores `NOT_ENTERED` on drop, on
//! success and failure paths alike.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to a single settlement latch
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    entered: Arc<AtomicBool>,
}

impl ReentrancyGuard {
    /// Create a released latch
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the latch. Returns `None` if it is already held.
    pub fn try_enter(&self) -> Option<GuardPermit> {
        if self
            .entered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(GuardPermit {
                entered: Arc::clone(&self.entered),
            })
        } else {
            None
        }
    }

    /// Whether the latch is currently held
    pub fn is_entered(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Held latch; releases on drop
#[derive(Debug)]
pub struct GuardPermit {
    entered: Arc<AtomicBool>,
}

impl Drop for GuardPermit {
    fn drop(&mut self) {
        self.entered.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_entry_fails() {
        let guard = ReentrancyGuard::new();
        let permit = guard.try_enter().unwrap();
        assert!(guard.try_enter().is_none());
        drop(permit);
        assert!(guard.try_enter().is_some());
    }

    #[test]
    fn test_clones_share_the_latch() {
        let guard = ReentrancyGuard::new();
        let clone = guard.clone();
        let _permit = guard.try_enter().unwrap();
        assert!(clone.is_entered());
        assert!(clone.try_enter().is_none());
    }

    #[test]
    fn test_release_on_early_return() {
        let guard = ReentrancyGuard::new();

        fn failing_entry(guard: &ReentrancyGuard) -> Result<(), ()> {
            let _permit = guard.try_enter().ok_or(())?;
            Err(())
        }

        assert!(failing_entry(&guard).is_err());
        assert!(!guard.is_entered());
    }
}
