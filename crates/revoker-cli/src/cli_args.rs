use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "revoker",
    about = "Revoke every active session of an Okta user",
    version
)]
/// Top-level arguments for the `revoker` binary.
///
/// Secrets (`BEARER_AUTH_TOKEN`, `BASIC_USERNAME`/`BASIC_PASSWORD`,
/// `OAUTH2_*`) and settings (`ADDRESS`, `*_BACKOFF_MS`) are read from the
/// process environment, never from flags.
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Revoke sessions, retrying once on rate-limit or service errors.
    Execute(ExecuteArgs),
    /// Acknowledge a cancellation without touching the network.
    Halt(HaltArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliRecoveryMode {
    #[value(name = "self")]
    SelfManaged,
    Framework,
}

impl CliRecoveryMode {
    pub fn as_env_value(self) -> &'static str {
        match self {
            Self::SelfManaged => "self",
            Self::Framework => "framework",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExecuteArgs {
    #[arg(
        long = "user-id",
        env = "REVOKER_USER_ID",
        hide_env_values = true,
        help = "Identity-provider user id whose sessions are revoked"
    )]
    pub user_id: String,

    #[arg(
        long,
        help = "Base API address; overrides the ADDRESS environment default"
    )]
    pub address: Option<String>,

    #[arg(
        long = "okta-domain",
        help = "Okta org domain (e.g. dev-123.okta.com), used when --address is absent"
    )]
    pub okta_domain: Option<String>,

    #[arg(
        long = "recovery-mode",
        value_enum,
        help = "Who retries failures: this process once (self) or the caller (framework). Overrides RECOVERY_MODE"
    )]
    pub recovery_mode: Option<CliRecoveryMode>,

    #[arg(long, help = "Pretty-print the JSON result")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Args)]
pub struct HaltArgs {
    #[arg(long = "user-id", env = "REVOKER_USER_ID", hide_env_values = true)]
    pub user_id: Option<String>,

    #[arg(long, default_value = "cancelled")]
    pub reason: String,

    #[arg(long, help = "Pretty-print the JSON result")]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, CliCommand, CliRecoveryMode};

    #[test]
    fn unit_execute_parses_user_and_recovery_mode() {
        let cli = Cli::try_parse_from([
            "revoker",
            "execute",
            "--user-id",
            "00u1abcd",
            "--address",
            "https://example.okta.com",
            "--recovery-mode",
            "framework",
        ])
        .expect("args should parse");
        let CliCommand::Execute(args) = cli.command else {
            panic!("expected execute subcommand");
        };
        assert_eq!(args.user_id, "00u1abcd");
        assert_eq!(args.address.as_deref(), Some("https://example.okta.com"));
        assert_eq!(args.recovery_mode, Some(CliRecoveryMode::Framework));
    }

    #[test]
    fn unit_halt_defaults_reason_to_cancelled() {
        let cli = Cli::try_parse_from(["revoker", "halt"]).expect("args should parse");
        let CliCommand::Halt(args) = cli.command else {
            panic!("expected halt subcommand");
        };
        assert_eq!(args.reason, "cancelled");
    }

    #[test]
    fn regression_self_recovery_mode_value_is_spelled_self() {
        let cli = Cli::try_parse_from([
            "revoker",
            "execute",
            "--user-id",
            "u",
            "--recovery-mode",
            "self",
        ])
        .expect("args should parse");
        let CliCommand::Execute(args) = cli.command else {
            panic!("expected execute subcommand");
        };
        assert_eq!(
            args.recovery_mode.map(CliRecoveryMode::as_env_value),
            Some("self")
        );
    }
}
