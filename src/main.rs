use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use callguard::application::{check_call, register_call};
use callguard::config::Config;
use callguard::domain::call_info::CallInfo;
use callguard::domain::phone::DialPlan;
use callguard::infrastructure::agi::AgiChannel;
use callguard::infrastructure::verification::HttpVerificationClient;
use callguard::interface::cli::{Action, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the AGI protocol, so all logging goes to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.to_config();

    let mut channel = AgiChannel::open(io::stdin().lock(), io::stdout().lock())?;

    // Whatever goes wrong, the switch gets a single diagnostic and the call
    // is left alone; only an explicit negative verdict terminates it.
    if let Err(err) = screen(&mut channel, &config, cli.action).await {
        error!(error = %err, "call screening aborted");
        let _ = channel.verbose(&format!("Something went wrong: {err}"));
    }

    Ok(())
}

async fn screen<R: BufRead, W: Write>(
    channel: &mut AgiChannel<R, W>,
    config: &Config,
    action: Action,
) -> anyhow::Result<()> {
    let dial_plan = DialPlan::from_config(&config.numbering.region, &config.numbering.city_code)?;
    let call = CallInfo::from_environment(channel.environment(), &dial_plan)?;
    info!(%call, ?action, "call extracted from AGI environment");

    let api = HttpVerificationClient::new(&config.service.host, config.service.timeout())?;
    match action {
        Action::Register => register_call(channel, &api, &call).await?,
        Action::Check => check_call(channel, &api, &call).await?,
    }

    Ok(())
}
