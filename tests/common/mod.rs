//! Common test utilities

use std::sync::Arc;
use std::sync::Once;

use ethertron_core::MemoryStore;

static INIT: Once = Once::new();

/// Initialize tracing output once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "ethertron_core=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory store shared between components under test.
pub fn memory_store() -> Arc<MemoryStore> {
    init_tracing();
    Arc::new(MemoryStore::new())
}
