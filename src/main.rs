use lift_coach::api::routes::create_routes;
use lift_coach::config::{AppConfig, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app = create_routes(pool);

    let address = app_config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("lift-coach server starting on http://{address}");
    info!("Health check available at http://{address}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
