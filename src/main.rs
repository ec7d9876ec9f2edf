use std::io::Read;
use std::sync::Arc;

use secrecy::SecretString;
use uuid::Uuid;

use email_intel::audit::AuditRecord;
use email_intel::config::GatewayConfig;
use email_intel::llm::http::{HttpClientConfig, HttpModelClient};
use email_intel::pipeline::{EmailRequest, Gateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; keep the file-writer guard alive for the whole run
    let _guard = init_tracing();

    // Read API key from environment
    let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_else(|_| {
        eprintln!("Error: ANTHROPIC_API_KEY not set");
        eprintln!("  export ANTHROPIC_API_KEY=sk-ant-...");
        std::process::exit(1);
    });

    let api_url = std::env::var("GATEWAY_API_URL")
        .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".to_string());

    let config = GatewayConfig::from_env()?;

    eprintln!("📧 Email Intel v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Primary model:   {}", config.primary_model_id);
    eprintln!("   Secondary model: {}", config.secondary_model_id);
    eprintln!("   Reading EmailRequest JSON from stdin...\n");

    let client = Arc::new(HttpModelClient::new(HttpClientConfig {
        api_url,
        api_key: SecretString::from(api_key),
    }));
    let gateway = Gateway::new(client, config);

    // One request per run: JSON payload on stdin
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let request: EmailRequest = serde_json::from_str(&input)?;

    let request_id = Uuid::new_v4();
    let audit = AuditRecord::started(request_id, &request);
    tracing::info!(%request_id, "Audit: processing started");

    let result = gateway.process_with_id(request_id, request).await;
    let audit = audit.completed(&result);

    println!("{}", serde_json::to_string_pretty(&result)?);
    eprintln!("\nAudit record:");
    eprintln!("{}", serde_json::to_string_pretty(&audit)?);

    Ok(())
}

/// Set up tracing: env-filtered stderr output, plus a daily-rolling log
/// file when `GATEWAY_LOG_DIR` is set.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Ok(log_dir) = std::env::var("GATEWAY_LOG_DIR") {
        let appender = tracing_appender::rolling::daily(log_dir, "email-intel.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        None
    }
}
