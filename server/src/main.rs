mod config;
mod graphql;
mod http;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{Employee, EmployeeService, SeaOrmEmployeeStore};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "directory-server", version, about = "Employee directory service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert the demo org chart.
    Seed,
    /// Print the GraphQL schema (SDL).
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path; stdout when omitted")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app_config = Arc::new(AppConfig::load()?);
    init_tracing(ObsConfig {
        otlp_endpoint: app_config.otlp_endpoint.clone(),
        ..ObsConfig::default().with_service_name(app_config.service_name.clone())
    })?;

    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up(&app_config).await,
            MigrateCommand::Down => migrate_down(&app_config).await,
        },
        Command::Seed => run_seed(&app_config).await,
        Command::SchemaPrint { output } => schema_print(output),
    }
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database).await.map_err(Into::into)
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let pool = setup_pool(&config).await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let state = AppState {
        schema: graphql::build_schema(pool.clone()),
        pool,
        config,
    };
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `cargo run -p server -- migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}

async fn run_seed(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    ensure_migrations(&pool, false).await?;
    let service = EmployeeService::new(Arc::new(SeaOrmEmployeeStore::new(pool)));

    let create = |employee: Employee| {
        let service = service.clone();
        async move { service.create(employee).await.context("failed to seed employee") }
    };

    let paul = create(
        Employee::new("Paul", "McCartney")
            .with_position("Developer I")
            .with_department("Engineering"),
    )
    .await?;
    let pete = create(
        Employee::new("Pete", "Best")
            .with_position("Developer II")
            .with_department("Engineering"),
    )
    .await?;
    let george = create(
        Employee::new("George", "Harrison")
            .with_position("Developer III")
            .with_department("Engineering"),
    )
    .await?;
    let ringo = create(
        Employee::new("Ringo", "Starr")
            .with_position("Developer V")
            .with_department("Engineering")
            .with_reports([pete.employee_id, george.employee_id]),
    )
    .await?;
    let john = create(
        Employee::new("John", "Lennon")
            .with_position("Development Manager")
            .with_department("Engineering")
            .with_reports([paul.employee_id, ringo.employee_id]),
    )
    .await?;

    info!(root = %john.employee_id, "demo org chart seeded");
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let sdl = graphql::schema_builder().finish().sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}
