use clap::{Parser, Subcommand};
use rst_common::with_tokio::tokio;

use prople_pocketd::commands::{List, Parse};
use prople_pocketd::errors::CliError;
use prople_pocketd::svc::logger;

#[derive(Parser)]
#[command(name = "pocketd")]
#[command(version = "0.1")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "parse")]
    #[command(about = "Frame and print the credentials of a CESR stream file")]
    Parse {
        #[arg(short, long, value_name = "FILE")]
        #[arg(required = true)]
        file: Option<String>,
    },

    #[command(name = "list")]
    #[command(about = "List the credentials stored under a schema")]
    List {
        #[arg(short, long, value_name = "FILE")]
        #[arg(required = true)]
        config: Option<String>,

        #[arg(short, long, value_name = "SAID")]
        #[arg(required = true)]
        schema: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Parse { file } => {
            let parse = Parse::new(file.to_owned().unwrap_or_default());
            let _ = parse.run()?;
        }
        Commands::List { config, schema } => {
            let list = List::new(
                config.to_owned().unwrap_or_default(),
                schema.to_owned().unwrap_or_default(),
            );
            let _ = list.run().await?;
        }
    }

    Ok(())
}
