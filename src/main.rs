use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use pdv_orders::config::DatabaseSettings;
use pdv_orders::migrations::{
    MigrationError, connect, pending_migrations, reapply_all, run_pending_migrations,
};

#[derive(Parser)]
#[command(
    name = "pdv-orders",
    about = "Applies the PDV order and payment schema migrations"
)]
struct Args {
    /// PostgreSQL connection string; falls back to DATABASE_PUBLIC_URL / DATABASE_URL.
    #[arg(long, alias = "url", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
    /// Apply migrations that the ledger has not recorded yet.
    #[default]
    Run,
    /// List migrations that have not been applied.
    Pending,
    /// Execute every migration script again in a single transaction.
    Reapply,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let args = Args::parse();

    let settings = match DatabaseSettings::from_env(args.database_url.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    log::info!("Target environment: {:?}", settings.environment);

    if let Err(e) = execute(args.command.unwrap_or_default(), &settings.database_url) {
        log::error!("Migration aborted: {e}");
        std::process::exit(1);
    }
}

fn execute(command: Command, database_url: &str) -> Result<(), MigrationError> {
    let mut conn = connect(database_url)?;

    match command {
        Command::Run => {
            let applied = run_pending_migrations(&mut conn)?;
            log::info!("{} migration(s) applied", applied.len());
        }
        Command::Pending => {
            let pending = pending_migrations(&mut conn)?;
            if pending.is_empty() {
                log::info!("No pending migrations");
            }
            for name in pending {
                log::info!("Pending: {name}");
            }
        }
        Command::Reapply => {
            let count = reapply_all(&mut conn)?;
            log::info!("{count} migration script(s) re-applied");
        }
    }

    Ok(())
}
