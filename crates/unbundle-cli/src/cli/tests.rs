use super::*;
use std::path::Path;

fn parse(args: &[&str]) -> Option<CliCommand> {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_no_subcommand() {
    assert!(parse(&["unbundle"]).is_none());
}

#[test]
fn cli_parse_run_defaults() {
    match parse(&["unbundle", "run"]) {
        Some(CliCommand::Run(args)) => {
            assert!(args.source.page.is_none());
            assert!(args.source.jobs.is_none());
            assert!(args.dist.is_none());
            assert!(!args.no_format);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_with_flags() {
    match parse(&[
        "unbundle",
        "run",
        "--page",
        "games",
        "--dist",
        "/tmp/out",
        "--jobs",
        "4",
        "--no-format",
    ]) {
        Some(CliCommand::Run(args)) => {
            assert_eq!(args.source.page.as_deref(), Some("games"));
            assert_eq!(args.source.jobs, Some(4));
            assert_eq!(args.dist.as_deref(), Some(Path::new("/tmp/out")));
            assert!(args.no_format);
        }
        _ => panic!("expected Run with flags"),
    }
}

#[test]
fn cli_parse_maps() {
    match parse(&["unbundle", "maps", "--page", "charts"]) {
        Some(CliCommand::Maps(args)) => {
            assert_eq!(args.page.as_deref(), Some("charts"));
            assert!(args.jobs.is_none());
        }
        _ => panic!("expected Maps"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["unbundle", "completions", "bash"]) {
        Some(CliCommand::Completions { shell }) => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_rejects_bad_jobs() {
    assert!(Cli::try_parse_from(["unbundle", "run", "--jobs", "many"]).is_err());
}

#[test]
fn run_args_override_config() {
    let args = RunArgs {
        source: SourceArgs {
            page: Some("games".to_string()),
            jobs: Some(0),
        },
        dist: Some(PathBuf::from("out")),
        no_format: true,
    };
    let mut cfg = UnbundleConfig::default();
    args.apply(&mut cfg);
    assert_eq!(cfg.page_path, "games");
    assert_eq!(cfg.max_concurrent_fetches, 1);
    assert_eq!(cfg.dist_dir, PathBuf::from("out"));
    assert!(!cfg.formatter.enabled);
}

#[test]
fn run_args_default_keep_config() {
    let mut cfg = UnbundleConfig::default();
    RunArgs::default().apply(&mut cfg);
    assert_eq!(cfg.page_path, "charts");
    assert!(cfg.formatter.enabled);
}
