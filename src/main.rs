use sentence_review_backend::config::Config;
use sentence_review_backend::logging::{init_tracing, FileLogSettings};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level, &FileLogSettings::from_env());

    let app = sentence_review_backend::create_app(&config).await;

    let addr = config.bind_addr();
    tracing::info!(
        %addr,
        mode = config.grading_mode.as_str(),
        store = config.store_backend.as_str(),
        "review backend listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
