use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;

use pizza_api::handlers::{router, AppState};
use pizza_api::{establish_connection, run_migrations, seed::seed_data};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DatabaseArgs {
    /// Path of the SQLite database file
    #[arg(long, env = "DATABASE_URL", default_value = "app.db")]
    database_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations and serve the HTTP API
    Serve {
        #[command(flatten)]
        db: DatabaseArgs,
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5555")]
        bind: String,
    },
    /// Apply pending migrations
    Migrate {
        #[command(flatten)]
        db: DatabaseArgs,
    },
    /// Apply pending migrations and insert sample data
    Seed {
        #[command(flatten)]
        db: DatabaseArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { db, bind } => {
            migrate(&db.database_url)?;
            serve(db.database_url, &bind).await
        }
        Commands::Migrate { db } => migrate(&db.database_url),
        Commands::Seed { db } => {
            migrate(&db.database_url)?;
            seed_data(&mut establish_connection(&db.database_url)?)?;
            Ok(())
        }
    }
}

fn migrate(database_url: &str) -> Result<(), BoxError> {
    let mut conn = establish_connection(database_url)?;
    run_migrations(&mut conn)
}

async fn serve(database_url: String, bind: &str) -> Result<(), BoxError> {
    let app = router(AppState::new(database_url));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Pizza API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
