//! CLI entry point.
//!
//! Schema commands act on the database directly; every other command goes
//! through the `CliContext` built by `bootstrap`.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use matdb_cli::handlers::{folder, library, list, load, paths, schema, show};
use matdb_cli::{Cli, CliConfig, Commands, bootstrap, exit_code_for};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };
    let config = CliConfig::resolve(cli.database_url.as_deref())?;

    match command {
        Commands::Paths => paths::execute(&config).await?,
        Commands::CreateDb { force } => schema::create_db(&config, force).await?,
        Commands::Init => schema::init(&config).await?,
        Commands::DropTables { force } => schema::drop_all(&config, force).await?,
        command => {
            let ctx = bootstrap(&config).await?;
            match command {
                Commands::Library { command } => library::execute(&ctx, command).await?,
                Commands::Folder { command } => folder::execute(&ctx, command).await?,
                Commands::Models { library } => list::models(&ctx, &library).await?,
                Commands::Materials {
                    library,
                    name,
                    tags,
                    models,
                    no_legacy,
                } => {
                    let filter = list::material_filter(name, tags, models);
                    list::materials(&ctx, &library, filter, !no_legacy).await?;
                }
                Commands::Model { uuid, effective } => show::model(&ctx, &uuid, effective).await?,
                Commands::Material { uuid } => show::material(&ctx, &uuid).await?,
                Commands::Load { file, checked } => load::execute(&ctx, &file, checked).await?,
                Commands::Paths
                | Commands::CreateDb { .. }
                | Commands::Init
                | Commands::DropTables { .. } => unreachable!("handled before bootstrap"),
            }
            ctx.database().close().await;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = u8::try_from(exit_code_for(&err)).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
