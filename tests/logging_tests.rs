use chat_summarizer::setup_logging;

#[test]
fn test_logging_setup() {
    // Repeated initialisation must not panic
    let result = std::panic::catch_unwind(|| {
        setup_logging();
        setup_logging();
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}
