use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "txctl")]
#[command(about = "Command-line client for the send-tx gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health
    Health,
    /// Submit a transaction
    Send {
        /// ethereum, polygon or sepolia
        #[arg(long)]
        chain: String,
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Optional sender address
        #[arg(long)]
        from: Option<String>,
        /// Amount in wei (base-10)
        #[arg(long)]
        value: String,
        /// Idempotency key; reuse it to retry safely
        #[arg(long)]
        key: String,
        /// Optional 0x-prefixed calldata
        #[arg(long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Send {
            chain,
            to,
            from,
            value,
            key,
            data,
        } => {
            let mut body = json!({
                "chain": chain,
                "to": to,
                "value": value,
                "idempotency_key": key,
            });
            if let Some(from) = from {
                body["from"] = Value::String(from);
            }
            if let Some(data) = data {
                body["data"] = Value::String(data);
            }
            let res = client
                .post(format!("{}/send-tx", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let replayed = res
        .headers()
        .get("idempotent-replayed")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body: Value = res.json().await?;

    match replayed {
        Some(replayed) => println!("{} (replayed: {})", status, replayed),
        None => println!("{}", status),
    }
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
