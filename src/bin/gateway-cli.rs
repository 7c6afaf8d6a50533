use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the launcher gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9374")]
    url: String,

    /// Federated bearer token
    #[arg(short, long)]
    token: Option<String>,

    /// Launcher-issued token, sent as x-lk-token
    #[arg(short, long)]
    launcher_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health
    Health,
    /// Show API information
    Info,
    /// List modpacks
    Modpacks {
        #[arg(long)]
        lang: Option<String>,
    },
    /// Fetch one translation document
    Translations { lang: String },
    /// Send requests until the rate limiter answers 429
    Limits {
        #[arg(short = 'n', long, default_value_t = 200)]
        requests: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
    }
    if let Some(token) = &cli.launcher_token {
        headers.insert("x-lk-token", HeaderValue::from_str(token)?);
    }
    headers.insert("x-luminakraft-client", HeaderValue::from_static("gateway-cli"));

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Info => {
            let res = client.get(format!("{}/v1/info", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Modpacks { lang } => {
            let mut req = client.get(format!("{}/v1/modpacks", cli.url)).headers(headers);
            if let Some(lang) = lang {
                req = req.query(&[("lang", lang)]);
            }
            print_response(req.send().await?).await?;
        }
        Commands::Translations { lang } => {
            let res = client
                .get(format!("{}/v1/translations/{lang}", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Limits { requests } => {
            for sent in 1..=requests {
                let res = client
                    .get(format!("{}/v1/modpacks/list", cli.url))
                    .headers(headers.clone())
                    .send()
                    .await?;
                if res.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = res
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("?")
                        .to_string();
                    println!("Rate limited after {sent} requests (Retry-After: {retry_after}s)");
                    return Ok(());
                }
                if !res.status().is_success() {
                    eprintln!("Request {sent} failed with status {}", res.status());
                    return print_response(res).await;
                }
            }
            println!("{requests} requests admitted without hitting the limit");
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
