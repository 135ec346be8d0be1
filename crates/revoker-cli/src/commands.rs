use anyhow::{Context, Result};
use revoker_core::ConfigBundle;
use revoker_okta::{
    HaltParams, JobContext, JobHandler, JobParams, RevocationResult, RevocationSettings,
    SessionRevocationJob, RECOVERY_MODE,
};
use serde::Serialize;

use crate::cli_args::{Cli, CliCommand, ExecuteArgs, HaltArgs};

fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.context("failed to render result as JSON")
}

/// Both bundles come from the process environment when run from the command line.
fn process_job_context() -> JobContext {
    let bundle = ConfigBundle::from_process_env();
    JobContext::new(bundle.clone(), bundle)
}

pub(crate) fn execute_params(args: &ExecuteArgs) -> JobParams {
    JobParams {
        user_id: Some(args.user_id.clone()),
        address: args.address.clone(),
        okta_domain: args.okta_domain.clone(),
    }
}

/// Runs `execute`, routing any failure through `recover` the way a job framework would.
pub(crate) async fn run_execute(args: &ExecuteArgs, mut ctx: JobContext) -> Result<RevocationResult> {
    if let Some(mode) = args.recovery_mode {
        ctx.environment.insert(RECOVERY_MODE, mode.as_env_value());
    }
    let settings = RevocationSettings::from_env(&ctx.environment);
    let job = SessionRevocationJob::from_settings(&settings)?;
    let params = execute_params(args);

    let outcome = match job.execute(&params, &ctx).await {
        Ok(result) => Ok(result),
        Err(error) => {
            tracing::debug!(kind = error.kind(), "execute failed; invoking recover");
            job.recover(&params, &ctx, error).await
        }
    };
    Ok(outcome?)
}

pub(crate) fn run_halt(args: &HaltArgs) -> Result<String> {
    let job = SessionRevocationJob::from_settings(&RevocationSettings::default())?;
    let result = job.halt(&HaltParams {
        user_id: args.user_id.clone(),
        reason: Some(args.reason.clone()),
    });
    render_json(&result, args.pretty)
}

pub(crate) async fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        CliCommand::Execute(args) => {
            let result = run_execute(&args, process_job_context()).await?;
            println!("{}", render_json(&result, args.pretty)?);
        }
        CliCommand::Halt(args) => {
            println!("{}", run_halt(&args)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::{execute_params, run_halt};
    use crate::cli_args::{ExecuteArgs, HaltArgs};

    #[test]
    fn unit_execute_params_carry_address_overrides() {
        let params = execute_params(&ExecuteArgs {
            user_id: "00u1abcd".to_string(),
            address: None,
            okta_domain: Some("dev-1.okta.com".to_string()),
            recovery_mode: None,
            pretty: false,
        });
        assert_eq!(params.user_id.as_deref(), Some("00u1abcd"));
        assert_eq!(params.okta_domain.as_deref(), Some("dev-1.okta.com"));
    }

    #[test]
    fn functional_halt_renders_camel_case_json() {
        let rendered = run_halt(&HaltArgs {
            user_id: None,
            reason: "cancelled".to_string(),
            pretty: false,
        })
        .expect("halt renders");
        let value: Value = serde_json::from_str(&rendered).expect("json");
        assert_eq!(value["userId"], "unknown");
        assert_eq!(value["reason"], "cancelled");
        assert_eq!(value["cleanupCompleted"], true);
        assert!(value["haltedAt"].is_string());
    }
}
