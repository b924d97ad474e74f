use clap::Parser;
use excuse_relay::utils::error::{ErrorSeverity, RelayError};
use excuse_relay::utils::{logger, validation::Validate};
use excuse_relay::{app, build_provider, AppState, CliConfig, ExcuseEngine, RelayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 檔案是可選的
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting excuse-relay");
    if dotenv_loaded {
        tracing::debug!("Loaded environment from .env");
    }

    // 載入並驗證配置
    let config = match cli.load().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };
    tracing::debug!("Resolved config: {:?}", config);

    if cli.dry_run {
        display_config_summary(&config);
        return Ok(());
    }

    let provider = match build_provider(&config.provider) {
        Ok(provider) => provider,
        Err(e) => exit_with(e),
    };
    if !std::path::Path::new(&config.server.static_dir).is_dir() {
        tracing::warn!(
            "⚠️ Static directory '{}' not found; only the API will be served",
            config.server.static_dir
        );
    }

    let engine = ExcuseEngine::new(provider, config.generation);
    tracing::info!(
        provider = engine.provider_name(),
        model = engine.model(),
        max_tokens = engine.params().max_tokens,
        temperature = engine.params().temperature,
        api_key = %config.provider.masked_api_key(),
        "🔌 Provider ready"
    );
    let router = app::build_router(AppState::new(engine), &config.server.static_dir);

    let listener = match tokio::net::TcpListener::bind(config.bind_address()).await {
        Ok(listener) => listener,
        Err(e) => exit_with(RelayError::IoError(e)),
    };
    tracing::info!("🌐 Server running on http://{}", listener.local_addr()?);

    if let Err(e) = app::serve(listener, router).await {
        exit_with(e);
    }

    Ok(())
}

fn exit_with(e: RelayError) -> ! {
    tracing::error!(
        "❌ excuse-relay failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn display_config_summary(config: &RelayConfig) {
    println!("📋 Configuration Summary:");
    println!("  Bind: {}", config.bind_address());
    println!("  Static dir: {}", config.server.static_dir);
    println!(
        "  Provider: {} ({})",
        config.provider.kind.display_name(),
        config.provider.kind
    );
    println!("  Base URL: {}", config.provider.base_url);
    println!("  Model: {}", config.provider.model);
    println!("  API key: {}", config.provider.masked_api_key());
    match config.provider.timeout_seconds {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }
    println!("  Max tokens: {}", config.generation.max_tokens);
    println!("  Temperature: {}", config.generation.temperature);
    println!();
    println!("🔍 DRY RUN MODE - server not started");
}
