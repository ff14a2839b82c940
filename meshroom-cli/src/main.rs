use anyhow::Result;
use clap::{Parser, Subcommand};

mod input;
mod join;
mod logging;
mod serve;

#[derive(Parser)]
#[command(name = "meshroom", version, about = "Room-based peer mesh: relay server and client")]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay
    Serve(serve::ServeArgs),
    /// Join a room and chat with its members
    Join(join::JoinArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Join(args) => join::run(args).await,
    }
}
