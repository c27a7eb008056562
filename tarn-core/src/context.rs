// tarn-core - Cooperative cancellation
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Cancellation tokens threaded through evaluation.
//!
//! The token is the only coordination channel between the evaluator and its
//! host: the evaluator polls it at the top of every trampoline iteration and
//! immediately before builtin invocation, and unwinds with a timeout error
//! once it reports cancelled. `context*` derives a child token that is
//! cancelled when its scope exits, bounding blocking builtins to the
//! subexpression's lifetime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shareable cancellation flag with an optional parent.
///
/// A token is cancelled when its own flag is set or any ancestor's is, so
/// cancelling a scope cancels everything derived within it. The flag is
/// atomic so a host may cancel from another thread (a watchdog timer being
/// the usual case) while evaluation stays single-threaded.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: AtomicBool,
    parent: Option<CancelToken>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Derive a child token; cancelling the child leaves this token live,
    /// cancelling this token cancels the child.
    #[must_use]
    pub fn child(&self) -> Self {
        CancelToken {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Cancel this token (and so every token derived from it).
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Relaxed);
    }

    /// True when this token or any ancestor has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        let mut current = self;
        loop {
            if current.inner.cancelled.load(Ordering::Relaxed) {
                return true;
            }
            match &current.inner.parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
