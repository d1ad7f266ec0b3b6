// tests/cli_flags.rs

use clap::Parser;
use clap::error::ErrorKind;

use runherd::cli::{CliArgs, SessionCommand};

#[test]
fn long_and_short_fix_flags_parse() {
    let args = CliArgs::try_parse_from(["runherd", "check", "--fix"]).unwrap();
    let SessionCommand::Check { fix, .. } = args.command else {
        panic!("expected check subcommand");
    };
    assert!(fix);

    let args = CliArgs::try_parse_from(["runherd", "check", "-f"]).unwrap();
    let SessionCommand::Check { fix, .. } = args.command else {
        panic!("expected check subcommand");
    };
    assert!(fix);
}

#[test]
fn clustered_short_flags_expand() {
    // -fh sets both fix and help; help wins and renders usage to stdout.
    let err = CliArgs::try_parse_from(["runherd", "check", "-fh"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    assert!(!err.use_stderr(), "help is not a usage error");
}

#[test]
fn unknown_flag_is_a_hard_usage_error() {
    let err = CliArgs::try_parse_from(["runherd", "check", "--unknown"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    assert!(err.use_stderr(), "usage errors go to stderr and exit 1");
    let rendered = err.to_string();
    assert!(rendered.contains("--unknown"), "message names the flag");
}

#[test]
fn arguments_after_double_dash_pass_through_verbatim() {
    let args =
        CliArgs::try_parse_from(["runherd", "check", "--", "--fix", "-x", "plain"]).unwrap();
    let SessionCommand::Check { fix, passthrough } = args.command else {
        panic!("expected check subcommand");
    };
    assert!(!fix, "passthrough args are never interpreted as flags");
    assert_eq!(passthrough, vec!["--fix", "-x", "plain"]);
}

#[test]
fn dev_only_flag_repeats() {
    let args = CliArgs::try_parse_from([
        "runherd", "dev", "--only", "frontend", "--only", "backend",
    ])
    .unwrap();
    let SessionCommand::Dev { only, .. } = args.command else {
        panic!("expected dev subcommand");
    };
    assert_eq!(only, vec!["frontend", "backend"]);
}

#[test]
fn global_config_flag_is_accepted_after_the_subcommand() {
    let args =
        CliArgs::try_parse_from(["runherd", "check", "--config", "custom.toml"]).unwrap();
    assert_eq!(args.config.as_deref(), Some("custom.toml"));
}
