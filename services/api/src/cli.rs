use crate::demo::{
    run_demo, run_funds_report, run_notices_list, DemoArgs, FundsReportArgs, NoticesListArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use staff_portal::config::AppConfig;
use staff_portal::error::AppError;
use staff_portal::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Staff Portal",
    about = "Run the staff portal service or inspect its reports from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the staff fund summary and monthly matrices
    Funds {
        #[command(subcommand)]
        command: FundsCommand,
    },
    /// Print the notice board in display order
    Notices {
        #[command(subcommand)]
        command: NoticesCommand,
    },
    /// Walk through notices, funds, promotion and checkout on seeded data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum FundsCommand {
    /// Build the income and expense matrices
    Report(FundsReportArgs),
}

#[derive(Subcommand, Debug)]
enum NoticesCommand {
    /// List notices with pinning and expiry applied
    List(NoticesListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Fund ledger CSV export loaded at startup
    #[arg(long)]
    pub(crate) funds_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Funds {
            command: FundsCommand::Report(args),
        } => run_funds_report(&console_config()?.portal, args),
        Command::Notices {
            command: NoticesCommand::List(args),
        } => run_notices_list(&console_config()?.portal, args),
        Command::Demo(args) => run_demo(&console_config()?.portal, args),
    }
}

/// Config for the report commands, with logging set up the same way `serve` does it.
fn console_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["staff-portal", "funds", "report", "--csv", "funds.csv"])
            .expect("funds report parses");
        match cli.command {
            Some(Command::Funds {
                command: FundsCommand::Report(args),
            }) => assert_eq!(args.csv, Some(PathBuf::from("funds.csv"))),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["staff-portal", "notices", "list", "--today", "2025-11-20"])
            .expect("notices list parses");
        assert!(matches!(
            cli.command,
            Some(Command::Notices {
                command: NoticesCommand::List(NoticesListArgs { today: Some(_) })
            })
        ));

        assert!(Cli::try_parse_from(["staff-portal", "notices", "list", "--today", "soon"]).is_err());
    }

    #[test]
    fn report_commands_install_logging() {
        console_config().expect("config loads and logging initialises");
        assert!(tracing::dispatcher::has_been_set());
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["staff-portal"]).expect("no arguments");
        assert!(cli.command.is_none());
    }
}
