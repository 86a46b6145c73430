// tests/support/mocks/util.rs
use agent_oauth_core::application::ports::util::CodeGenerator;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Predictable, unique code values.
#[derive(Default)]
pub struct SequentialCodeGenerator {
    next: AtomicUsize,
}

impl CodeGenerator for SequentialCodeGenerator {
    fn generate(&self) -> String {
        format!("test-code-{:04}", self.next.fetch_add(1, Ordering::SeqCst))
    }
}
