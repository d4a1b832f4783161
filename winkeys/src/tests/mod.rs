mod cache_tests;
mod dispatch_tests;
mod locator_tests;
mod poll_tests;

// Initialize tracing for tests
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
