use clap::Parser;
use excuse_relay::domain::model::{ErrorBody, GenerationResponse};
use excuse_relay::utils::{logger, validation::Validate};
use excuse_relay::{build_provider, CliConfig, ExcuseEngine};
use std::io::Read;

/// Generate one excuse from the terminal with the same engine and
/// configuration the server uses.
#[derive(Parser)]
#[command(name = "excuse")]
#[command(about = "Generate a single excuse without starting the server")]
struct Args {
    /// What went wrong. Reads stdin when omitted.
    problem: Option<String>,

    /// Print the same JSON body the HTTP endpoint would return
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    relay: CliConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logger::init_cli_logger(args.relay.verbose);

    let config = args.relay.load()?;
    config.validate()?;

    let problem = match args.problem {
        Some(problem) => problem,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let engine = ExcuseEngine::new(build_provider(&config.provider)?, config.generation);

    match engine.generate(Some(&problem)).await {
        Ok(excuse) => {
            if args.json {
                println!("{}", serde_json::to_string(&GenerationResponse { excuse })?);
            } else {
                println!("{}", excuse);
            }
            Ok(())
        }
        Err(e) => {
            if args.json {
                let body = ErrorBody {
                    error: e.user_friendly_message(),
                };
                println!("{}", serde_json::to_string(&body)?);
            } else {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
            }
            std::process::exit(1);
        }
    }
}
