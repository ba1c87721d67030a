use crate::cli::commands::ServeArgs;
use crate::config::DatabaseConfig;
use crate::errors::BlackCardError;
use crate::api;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), BlackCardError> {
    let mut config = super::load_config(args.config.as_deref()).await?;

    let mut server = config.server();
    if let Some(port) = args.port {
        server.port = port;
    }
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(db) = args.db {
        config.database = Some(DatabaseConfig { path: db });
    }
    config.server = Some(server.clone());

    info!(
        host = %server.host,
        port = server.port,
        db = %config.database().path,
        require_auth = server.require_auth,
        "Starting API server"
    );

    let state = api::create_app_state(&config).await?;
    let app = api::build_router_with_cors(state, &server.cors_origins);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| BlackCardError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
