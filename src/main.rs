use clap::Parser;

use gleaner::cli::{commands, Cli, Commands};
use gleaner::config::Config;
use gleaner::logging;
use gleaner::store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.database {
        config.files.database = Some(path.clone());
    }

    match cli.command {
        Commands::Run(args) => {
            args.apply(&mut config);
            logging::init(config.files.log_path());
            commands::run(&config).await?;
        }
        Commands::List { keyword } => {
            logging::init(None);
            let store = SqliteStore::new(config.files.database_path()?)?;
            commands::list_posts(&store, keyword.as_deref())?;
        }
        Commands::Export { keyword } => {
            logging::init(None);
            let store = SqliteStore::new(config.files.database_path()?)?;
            let mut stdout = std::io::stdout().lock();
            commands::export_posts(&store, keyword.as_deref(), &mut stdout)?;
        }
    }

    Ok(())
}
