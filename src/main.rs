use recent_tokens::{init_tracing, run, shutdown_on_signal, BaseConfig};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("recent_tokens=info,tower_http=info")?;

    let config = BaseConfig::from_env();
    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    run(config, shutdown).await
}
