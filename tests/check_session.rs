// tests/check_session.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::fs;
use std::path::Path;

use runherd::config::{ConfigFile, load_and_validate};
use runherd::errors::RunherdError;
use runherd::exec::has_tool;
use runherd::session::run_check;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

fn load(dir: &Path, contents: &str) -> ConfigFile {
    let path = dir.join("Runherd.toml");
    fs::write(&path, contents).expect("write config");
    load_and_validate(&path).expect("config loads")
}

#[test]
fn tool_detection_scans_path() {
    assert!(has_tool("sh"));
    assert!(!has_tool("definitely-not-a-real-tool-77aa"));
}

#[tokio::test]
async fn missing_required_tool_skips_the_check_and_batch_passes() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = load(
        dir.path(),
        r#"
[[check]]
name = "doomed-without-tool"
cmd = ["false"]
requires = "definitely-not-a-real-tool-77aa"

[[check]]
name = "real"
cmd = ["true"]
"#,
    );

    // The gated check would fail if it ever ran; skipping keeps the batch green.
    let code = with_timeout(run_check(&cfg, false)).await?;
    assert_eq!(code, 0);
    Ok(())
}

#[tokio::test]
async fn failing_pre_step_propagates_its_code_and_skips_the_batch() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let marker = dir.path().join("check-ran");
    let cfg = load(
        dir.path(),
        &format!(
            r#"
[[pre]]
name = "generator"
cmd = ["sh", "-c", "exit 4"]

[[check]]
name = "never-launched"
cmd = ["sh", "-c", "touch {marker}"]
"#,
            marker = marker.display()
        ),
    );

    let code = with_timeout(run_check(&cfg, false)).await?;
    assert_eq!(code, 4);
    assert!(
        !marker.exists(),
        "checks must not launch after a failing pre step"
    );
    Ok(())
}

#[tokio::test]
async fn fix_steps_run_only_with_fix_and_fail_fast() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let marker = dir.path().join("check-ran");
    let cfg = load(
        dir.path(),
        &format!(
            r#"
[[fix]]
name = "broken-fixer"
cmd = ["sh", "-c", "exit 3"]

[[check]]
name = "observer"
cmd = ["sh", "-c", "touch {marker}"]
"#,
            marker = marker.display()
        ),
    );

    // Without --fix the failing fix step is never consulted.
    let code = with_timeout(run_check(&cfg, false)).await?;
    assert_eq!(code, 0);
    assert!(marker.exists());

    fs::remove_file(&marker)?;
    let code = with_timeout(run_check(&cfg, true)).await?;
    assert_eq!(code, 3);
    assert!(!marker.exists(), "checks must not launch after a failing fix step");
    Ok(())
}

#[tokio::test]
async fn fix_step_with_missing_tool_is_skipped_not_fatal() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = load(
        dir.path(),
        r#"
[[fix]]
name = "gated-fixer"
cmd = ["false"]
requires = "definitely-not-a-real-tool-77aa"

[[check]]
name = "real"
cmd = ["true"]
"#,
    );

    let code = with_timeout(run_check(&cfg, true)).await?;
    assert_eq!(code, 0);
    Ok(())
}

#[tokio::test]
async fn config_without_checks_is_rejected() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = load(dir.path(), "");

    let err = with_timeout(run_check(&cfg, false)).await.unwrap_err();
    assert!(matches!(err, RunherdError::ConfigError(_)), "{err}");
    Ok(())
}
