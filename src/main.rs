use chatbot_relay::config::{AppConfig, StoreBackend};
use chatbot_relay::llm::create_provider;
use chatbot_relay::logging::init_tracing;
use chatbot_relay::message_store::{InMemoryMessageStore, MessageStore, PostgresMessageStore};
use chatbot_relay::relay::ChatRelay;
use chatbot_relay::routes::configure_routes;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (store, postgres): (Arc<dyn MessageStore>, Option<Arc<PostgresMessageStore>>) =
        match config.store_backend {
            StoreBackend::Postgres => {
                let pg = Arc::new(PostgresMessageStore::new(config.store.clone())?);
                pg.ping().await?;
                pg.ensure_schema().await?;
                info!(
                    host = %config.store.host,
                    database = %config.store.database,
                    "connected to message store"
                );
                (pg.clone() as Arc<dyn MessageStore>, Some(pg))
            }
            StoreBackend::Memory => {
                warn!("using in-memory message store, conversations are lost on exit");
                (Arc::new(InMemoryMessageStore::new()) as Arc<dyn MessageStore>, None)
            }
        };

    let provider = create_provider(config.openai.clone())?;
    let relay = ChatRelay::new(store, provider, config.relay.clone());
    let routes = configure_routes(relay, &config.cors_origins);

    let addr = config.bind_address();
    info!(%addr, model = %config.openai.model, "starting server");

    tokio::select! {
        _ = warp::serve(routes).run(addr) => {}
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
        }
    }

    if let Some(pg) = postgres {
        pg.close();
    }

    Ok(())
}
