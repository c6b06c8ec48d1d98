use clap::Parser;

use mentoria_api::app;
use mentoria_api::config;
use mentoria_api::runtime::{FlagSource, FlagWatcher};

#[derive(Debug, Parser)]
#[command(name = "mentoria-api", about = "Mentoria platform API server")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "MENTORIA_API_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,
}

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SUPABASE_*, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Mentoria API in {:?} mode", config.environment);

    let state = app::AppState::postgres().await;

    // Log database connectivity transitions for the life of the process
    let mut link = FlagWatcher::new(Some(state.health.as_ref() as &dyn FlagSource));
    tokio::spawn(async move {
        while let Some(up) = link.changed().await {
            if up {
                tracing::info!("database connection established");
            } else {
                tracing::warn!("database connection lost");
            }
        }
    });

    let router = app::router(state);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Mentoria API server listening on http://{}", bind_addr);

    axum::serve(listener, router).await.expect("server");
}
