//! Room service entry point.
//!
//! Wires the Postgres store, Redis cache and notifier into the lifecycle
//! handlers and serves them over HTTP (axum) and gRPC (tonic) in parallel.

use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::signal;
use tonic::transport::Server;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use room_service::adapters::grpc::proto::room_service_server::RoomServiceServer;
use room_service::adapters::grpc::RoomGrpcService;
use room_service::adapters::http::{room_router, RoomAppState};
use room_service::adapters::{PostgresRoomRepository, RedisRoomCache, RedisRoomNotifier};
use room_service::application::handlers::room::{
    CloseRoomHandler, CreateRoomHandler, DeleteRoomHandler, GetParticipantHandler,
    GetRoomHandler, JoinRoomHandler, LeaveRoomHandler, ListRoomsHandler, RoomAccessPolicy,
    UpdateRoomHandler,
};
use room_service::config::AppConfig;
use room_service::ports::{RoomCache, RoomNotifier, RoomRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting room service");

    info!("Connecting to database...");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    if config.database.run_migrations {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    info!("Connecting to Redis...");
    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = redis_client
        .get_multiplexed_tokio_connection()
        .await
        .map_err(|e| {
            error!("Failed to connect to Redis: {}", e);
            e
        })?;

    let repository: Arc<dyn RoomRepository> = Arc::new(PostgresRoomRepository::new(pool));
    let cache: Arc<dyn RoomCache> = Arc::new(RedisRoomCache::new(
        redis_conn.clone(),
        config.redis.cache_ttl_secs,
    ));
    let notifier: Arc<dyn RoomNotifier> = Arc::new(RedisRoomNotifier::new(
        redis_conn,
        config.events.channel.clone(),
    ));

    let create_handler = Arc::new(CreateRoomHandler::new(repository.clone(), cache.clone()));
    let join_handler = Arc::new(JoinRoomHandler::new(
        repository.clone(),
        cache.clone(),
        notifier.clone(),
    ));
    let leave_handler = Arc::new(LeaveRoomHandler::new(
        repository.clone(),
        cache.clone(),
        notifier.clone(),
    ));
    let close_handler = Arc::new(CloseRoomHandler::new(
        repository.clone(),
        cache.clone(),
        notifier,
    ));
    let get_handler = Arc::new(GetRoomHandler::new(repository.clone(), cache.clone()));

    let state = RoomAppState {
        create_handler: create_handler.clone(),
        join_handler: join_handler.clone(),
        leave_handler: leave_handler.clone(),
        close_handler: close_handler.clone(),
        get_handler: get_handler.clone(),
        update_handler: Arc::new(UpdateRoomHandler::new(repository.clone(), cache.clone())),
        delete_handler: Arc::new(DeleteRoomHandler::new(repository.clone(), cache.clone())),
        list_handler: Arc::new(ListRoomsHandler::new(repository.clone())),
        get_participant_handler: Arc::new(GetParticipantHandler::new(
            repository.clone(),
            cache.clone(),
        )),
        access_policy: Arc::new(RoomAccessPolicy::new(repository, cache)),
    };

    let cors = build_cors_layer(&config);
    let app = room_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let grpc_service = RoomGrpcService::new(
        create_handler,
        join_handler,
        leave_handler,
        close_handler,
        get_handler,
    );
    let grpc_addr = config.server.grpc_addr();
    let grpc_server = tokio::spawn(async move {
        info!("gRPC listener on {}", grpc_addr);
        if let Err(e) = Server::builder()
            .add_service(RoomServiceServer::new(grpc_service))
            .serve_with_shutdown(grpc_addr, shutdown_signal())
            .await
        {
            error!("gRPC server error: {}", e);
        }
    });

    let http_addr = config.server.http_addr();
    info!("HTTP listener on {}", http_addr);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    grpc_server.await?;
    info!("Room service shutdown complete");

    Ok(())
}

fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
