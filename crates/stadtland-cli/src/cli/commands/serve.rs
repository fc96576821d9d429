use std::sync::Arc;

use stadtland_core::{InMemoryLobby, RoundEngine};
use tracing::info;

use crate::cli::args::ServeArgs;
use crate::exit_codes::SUCCESS;
use crate::server::{self, AppState};

pub async fn run(args: ServeArgs) -> anyhow::Result<i32> {
    let config = args.judge.to_config()?;
    info!(judge = %config.provider, timeout_ms = config.timeout_ms, "judge configured");
    let engine = RoundEngine::new(config.build_oracle()?);

    let state = AppState {
        engine: Arc::new(engine),
        lobby: Arc::new(InMemoryLobby::new()),
    };
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(addr = %listener.local_addr()?, "listening");

    server::serve(listener, state).await?;
    Ok(SUCCESS)
}
