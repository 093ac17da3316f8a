use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "harness-cli")]
#[command(about = "Drive traffic against a running log harness", long_about = None)]
struct Cli {
    /// Base URL including the API prefix.
    #[arg(short, long, default_value = "http://localhost:8080/api")]
    url: String,

    /// Send the request this many times.
    #[arg(short, long, default_value_t = 1)]
    repeat: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a greeting
    Hello {
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Post a JSON object for simulated processing
    Process {
        /// JSON object body, e.g. '{"user":"ada"}'
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
    /// Trigger the error simulator
    Error {
        /// Make the server fail the request with a 500
        #[arg(short, long)]
        throw: bool,
    },
    /// Generate synthetic log entries
    Generate {
        /// Entry count; negative values emit nothing
        #[arg(short, long, allow_negative_numbers = true)]
        count: Option<i64>,
    },
    /// Check harness health and request tally
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    for _ in 0..cli.repeat {
        let res = match &cli.command {
            Commands::Hello { name } => {
                let mut req = client.get(format!("{base}/hello"));
                if let Some(name) = name {
                    req = req.query(&[("name", name)]);
                }
                req.send().await?
            }
            Commands::Process { data } => {
                let body: Value = serde_json::from_str(data)?;
                client
                    .post(format!("{base}/process"))
                    .json(&body)
                    .send()
                    .await?
            }
            Commands::Error { throw } => {
                client
                    .get(format!("{base}/simulate-error"))
                    .query(&[("throwException", throw)])
                    .send()
                    .await?
            }
            Commands::Generate { count } => {
                let mut req = client.get(format!("{base}/generate-logs"));
                if let Some(count) = count {
                    req = req.query(&[("count", count)]);
                }
                req.send().await?
            }
            Commands::Health => client.get(format!("{base}/health")).send().await?,
        };
        print_response(res).await?;
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: harness returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
