//! `omnia-chat` — line-based console client for the OmnIA backend.
//!
//! Reads one message per line from stdin, POSTs it to `/omnIA/chat` and
//! prints Nova's answer. The conversation is kept in a session-local
//! [`ChatTranscript`] and discarded on exit.
//!
//! # Usage
//!
//! ```text
//! omnia-chat [--url <base>]
//!
//! Flags:
//!   --url, -u <base>   backend base URL (default: $OMNIA_URL or http://localhost:3000)
//!   --help, -h         print this help
//! ```
//!
//! Type `/quit` or send EOF (Ctrl-D) to leave.

use std::process;
use std::time::Duration;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use omnia::subsystems::comms::axum_channel::ChatRequest;
use omnia::subsystems::comms::transcript::ChatTranscript;

const DEFAULT_URL: &str = "http://localhost:3000";
/// Used when the persona cannot be fetched at startup.
const FALLBACK_OPERATOR: &str = "Kley";
const FALLBACK_NAME: &str = "Nova";

#[derive(Debug, Deserialize)]
struct ChatReply {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct PersonaDoc {
    nome: String,
    config: PersonaConfig,
}

#[derive(Debug, Deserialize)]
struct PersonaConfig {
    usuario: String,
}

// ── CLI arg parsing ────────────────────────────────────────────────────────

struct Args {
    url: Option<String>,
}

fn parse_args() -> Args {
    let mut url = None;
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" | "-u" => url = iter.next(),
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            other => {
                eprintln!("error: unexpected argument: {other}");
                eprintln!("  run 'omnia-chat --help' for usage");
                process::exit(1);
            }
        }
    }

    Args { url }
}

fn print_help() {
    eprintln!("usage: omnia-chat [--url <base>]");
    eprintln!();
    eprintln!("flags:");
    eprintln!("  --url, -u <base>   backend base URL");
    eprintln!("  --help, -h         print this help");
    eprintln!();
    eprintln!("base URL resolution:");
    eprintln!("  1. --url flag");
    eprintln!("  2. $OMNIA_URL");
    eprintln!("  3. {DEFAULT_URL}");
}

fn resolve_url(override_url: Option<String>) -> String {
    let url = override_url
        .or_else(|| std::env::var("OMNIA_URL").ok().filter(|u| !u.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_URL.to_string());
    url.trim_end_matches('/').to_string()
}

// ── HTTP ───────────────────────────────────────────────────────────────────

async fn fetch_persona(client: &reqwest::Client, base: &str) -> Option<PersonaDoc> {
    let resp = client.get(format!("{base}/omnIA/nova")).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<PersonaDoc>().await.ok()
}

async fn send_message(client: &reqwest::Client, base: &str, message: &str) -> Result<String, String> {
    let body = ChatRequest { message: Some(message.to_string()) };
    let resp = client
        .post(format!("{base}/omnIA/chat"))
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(format!("backend returned {status}"));
    }

    resp.json::<ChatReply>()
        .await
        .map(|r| r.answer)
        .map_err(|e| format!("unreadable reply: {e}"))
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args = parse_args();
    let base = resolve_url(args.url);

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(base)) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

async fn run(base: String) -> Result<(), String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .map_err(|e| format!("failed to build http client: {e}"))?;

    let (name, operator) = match fetch_persona(&client, &base).await {
        Some(p) => (p.nome, p.config.usuario),
        None => {
            eprintln!("warning: could not reach {base}/omnIA/nova");
            (FALLBACK_NAME.to_string(), FALLBACK_OPERATOR.to_string())
        }
    };

    let mut transcript = ChatTranscript::new();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Conectado a {base}. Digite /quit para sair.");

    loop {
        stdout
            .write_all(format!("{operator}> ").as_bytes())
            .await
            .map_err(|e| e.to_string())?;
        stdout.flush().await.map_err(|e| e.to_string())?;

        let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? else {
            break;
        };
        if line.trim() == "/quit" {
            break;
        }

        let Some(sent) = transcript.push_user(&line) else {
            continue;
        };
        let message = sent.text.clone();

        let reply = match send_message(&client, &base, &message).await {
            Ok(answer) => transcript.push_nova(answer),
            Err(e) => {
                eprintln!("warning: {e}");
                transcript.push_connection_error(&operator)
            }
        };
        println!("{name}: {}", reply.text);
    }

    println!("Até logo! ({} mensagens nesta sessão)", transcript.len());
    Ok(())
}
