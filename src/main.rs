//! Proxy Admin Console 服务主入口

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proxy_admin_console::{create_routes, Config, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志 - 默认INFO等级，便于生产环境使用
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proxy_admin_console=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 启动 Proxy Admin Console 服务");

    // 加载配置
    let config = Arc::new(Config::load()?);
    info!("✅ 配置加载成功");

    // 初始化数据库连接
    let database = Database::new(&config).await?;
    info!("✅ 数据库连接成功");

    // 应用数据库迁移
    database.run_migrations().await?;
    info!("✅ 数据库迁移完成");

    // 创建路由
    let app = create_routes(database, config.clone());
    info!("✅ 路由创建成功");

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 服务器启动成功，监听地址: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("🛑 接收到关闭信号，正在优雅关闭服务器...");
        })
        .await?;

    Ok(())
}
