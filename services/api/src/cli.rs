use crate::demo::{run_campaign_report, run_demo, CampaignReportArgs, DemoArgs};
use crate::server;
use avvia::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AvvIA",
    about = "Run and demonstrate the AvvIA seasonal hiring pipeline from the command line",
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
    /// Inspect the demo campaign
    Campaign {
        #[command(subcommand)]
        command: CampaignCommand,
    },
    /// Walk through the demo campaign, applying a handful of operator actions
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CampaignCommand {
    /// Print role coverage, risk and optionally the candidate pipeline
    Report(CampaignReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Campaign {
            command: CampaignCommand::Report(args),
        } => run_campaign_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
