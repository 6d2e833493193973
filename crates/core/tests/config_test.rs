use pathminer_core::config::Config;
use pathminer_core::Error;
use std::io::Write;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[test]
fn test_load_rejects_zero_batch_size() {
    let file = write_config(
        r#"
        [pipeline]
        batch_size = 0
    "#,
    );

    let result = Config::load(Some(file.path()));
    match result {
        Err(Error::Config(message)) => assert!(message.contains("batch_size")),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_load_rejects_unknown_storage_kind() {
    let file = write_config(
        r#"
        [storage]
        kind = "arrow"
    "#,
    );

    assert!(matches!(
        Config::load(Some(file.path())),
        Err(Error::Config(_))
    ));
}
