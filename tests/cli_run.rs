use clap::Parser;

use mirrorwatch::cli::CliArgs;
use mirrorwatch_test_utils::builders::Workspace;
use mirrorwatch_test_utils::init_tracing;

fn args(extra: &[&str]) -> CliArgs {
    let argv = std::iter::once("mirrorwatch").chain(extra.iter().copied());
    CliArgs::try_parse_from(argv).expect("arguments parse")
}

#[tokio::test]
async fn bare_invocation_prints_usage_and_succeeds() -> anyhow::Result<()> {
    mirrorwatch::run(args(&[])).await?;
    Ok(())
}

#[tokio::test]
async fn missing_pattern_leaves_destination_untouched() -> anyhow::Result<()> {
    init_tracing();
    let ws = Workspace::new();
    ws.source_tree().file("a.md", "a\n");
    let src = ws.src();
    let dist = ws.dist();

    mirrorwatch::run(args(&[src.to_str().unwrap(), dist.to_str().unwrap()])).await?;

    assert!(!dist.exists());
    Ok(())
}

#[tokio::test]
async fn once_publishes_and_returns() -> anyhow::Result<()> {
    init_tracing();
    let ws = Workspace::new();
    ws.source_tree()
        .file("A.md", "<!-- include::B.txt -->\r\nend\r\n")
        .file("B.txt", "x\ny\n");
    let src = ws.src();
    let dist = ws.dist();

    mirrorwatch::run(args(&[
        src.to_str().unwrap(),
        dist.to_str().unwrap(),
        r".*\.md",
        "--once",
    ]))
    .await?;

    let expected = format!("xyend{}", if cfg!(windows) { "\r\n" } else { "\n" });
    assert_eq!(ws.read_dist_string("A.md"), expected);
    Ok(())
}

#[tokio::test]
async fn missing_source_is_an_error() {
    let ws = Workspace::new();
    let missing = ws.root().join("nope");
    let dist = ws.dist();

    let result = mirrorwatch::run(args(&[
        missing.to_str().unwrap(),
        dist.to_str().unwrap(),
        ".*",
        "--once",
    ]))
    .await;

    assert!(result.is_err());
    assert!(!dist.exists());
}
