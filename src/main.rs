//! OmnIA — Nova chat backend entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI flags, load config
//!   3. Init logger (CLI `-v` > `RUST_LOG` > config)
//!   4. Build the LLM provider (checks the hosted-model API key)
//!   5. Load the persona, open the memory log
//!   6. Serve HTTP until Ctrl-C

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use omnia::config::{self, Config};
use omnia::error::AppError;
use omnia::llm::providers;
use omnia::logger;
use omnia::subsystems::agents::chat::ChatService;
use omnia::subsystems::comms;
use omnia::subsystems::memory::MindLog;
use omnia::subsystems::persona::Persona;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some(), config.log_file.as_deref())?;

    info!(
        name = %config.name,
        data_dir = %config.data_dir.display(),
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    // Fails early on a missing GEMINI_API_KEY, before any file is touched.
    let llm = providers::build(&config.llm, config.llm_api_key.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;

    let persona = Persona::load(&config.persona_path())?;
    info!(
        persona = %persona.name(),
        age = %persona.age().as_deref().unwrap_or("-"),
        operator = %persona.operator(),
        "persona loaded"
    );

    let memory = MindLog::open(config.mind_path(), config.memory.cap)?;
    info!(path = %memory.path().display(), cap = memory.cap(), "memory log ready");

    let chat = Arc::new(ChatService::new(
        persona,
        llm,
        memory,
        config.prompts_dir.clone(),
        config.memory.context_turns,
    ));

    // Shared shutdown token — Ctrl-C cancels it, the HTTP channel watches it.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    print_startup_summary(&config, chat.persona().name());

    let handle = comms::start(&config, chat, shutdown);
    handle
        .await
        .map_err(|e| AppError::Comms(format!("http task panicked: {e}")))??;

    info!("shutdown complete");
    Ok(())
}

fn print_startup_summary(config: &Config, persona: &str) {
    let fit = |text: String| -> String {
        const WIDTH: usize = 58;
        let char_count = text.chars().count();
        if char_count >= WIDTH {
            let mut out = text.chars().take(WIDTH - 1).collect::<String>();
            out.push('…');
            out
        } else {
            format!("{text:<WIDTH$}")
        }
    };

    let endpoint = match config.llm.provider.as_str() {
        "gemini" => Some(&config.llm.gemini),
        "openai" | "openai-compatible" => Some(&config.llm.openai),
        _ => None,
    };
    let llm_line = match endpoint {
        Some(e) => format!(
            "provider={} model={} temp={} timeout={}s",
            config.llm.provider, e.model, e.temperature, e.timeout_seconds
        ),
        None => format!("provider={}", config.llm.provider),
    };

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ 🌌 OmnIA                                                     ║");
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║   {}║", fit(format!("🧾 name: {}", config.name)));
    println!("║   {}║", fit(format!("✨ persona: {persona}")));
    println!("║   {}║", fit(format!("🧠 pid: {}", std::process::id())));
    println!("║   {}║", fit(format!("🌐 http: {}", config.bind)));
    println!("║   {}║", fit(format!("📂 data: {}", config.data_dir.display())));
    println!(
        "║   {}║",
        fit(format!(
            "💭 memory: cap={} context={}",
            config.memory.cap, config.memory.context_turns
        ))
    );
    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ 🧠 LLM                                                       ║");
    println!("║   {}║", fit(llm_line));
    println!("╚══════════════════════════════════════════════════════════════╝");
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: omnia [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -v, -vv                    Increase logging verbosity (debug, trace)");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
    }
}
