use struct_log::StructLogBuilder;
use tracing_log::LogTracer;

// One global logger per process, so this binary holds a single test.
#[test]
fn plain_output_bridges_log_records() {
    let guard = StructLogBuilder::new("vault-kv", "bridge")
        .json_enabled(false)
        .init()
        .expect("logger setup");
    assert!(guard.is_none());

    // already taken by the builder
    assert!(LogTracer::init().is_err());
}
