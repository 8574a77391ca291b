use clap::{Parser, Subcommand};
use futures::StreamExt;
use gemrouter::config::Config;
use gemrouter::content_generator::{
    ContentGenerator, CountTokensParameters, EmbedContentParameters, GenerateContentParameters,
    GenerateContentResponse, create_content_generator, create_content_generator_config,
};
use gemrouter::model_catalog::OPENROUTER_MODEL_NAMES;
use gemrouter_schema::GenerateContentConfig;
use mimalloc::MiMalloc;
use std::io::Write;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Gemini-style content generation over OpenRouter", long_about = None)]
struct Cli {
    /// Gemini model id (e.g. gemini-2.5-pro) or a vendor-qualified OpenRouter id.
    /// Defaults to `basic.model`.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Print full JSON responses instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates a complete response for a prompt
    Generate {
        prompt: String,
        #[arg(long)]
        system: Option<String>,
        #[arg(long)]
        temperature: Option<f64>,
        #[arg(long)]
        max_output_tokens: Option<u32>,
    },
    /// Streams a response for a prompt
    Stream {
        prompt: String,
        #[arg(long)]
        system: Option<String>,
        #[arg(long)]
        temperature: Option<f64>,
        #[arg(long)]
        max_output_tokens: Option<u32>,
    },
    /// Estimates the token count of a prompt locally
    CountTokens { prompt: String },
    /// Requests embeddings (not offered through OpenRouter)
    Embed { text: Vec<String> },
    /// Lists Gemini ids and their OpenRouter equivalents
    Models,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    cfg.log_effective();

    if let Commands::Models = cli.command {
        for (bare, qualified) in OPENROUTER_MODEL_NAMES {
            println!("{bare:<24} {qualified}");
        }
        return Ok(());
    }

    let model = cli.model.clone().unwrap_or_else(|| cfg.basic.model.clone());
    let generator_config =
        create_content_generator_config(&model, cfg.basic.auth_type, &cfg.credentials())?;
    info!(model = %generator_config.model, auth_type = %generator_config.auth_type, "Generator config ready");
    let generator = create_content_generator(&generator_config, &cfg.http_options())?;

    match cli.command {
        Commands::Generate {
            prompt,
            system,
            temperature,
            max_output_tokens,
        } => {
            let request = generation_request(&model, prompt, system, temperature, max_output_tokens);
            let resp = generator.generate_content(request).await?;
            print_response(&resp, cli.json)?;
            println!();
        }
        Commands::Stream {
            prompt,
            system,
            temperature,
            max_output_tokens,
        } => {
            let request = generation_request(&model, prompt, system, temperature, max_output_tokens);
            tokio::select! {
                res = stream_to_stdout(generator.as_ref(), request, cli.json) => res?,
                _ = signal::ctrl_c() => warn!("Interrupted; stream dropped"),
            }
            println!();
        }
        Commands::CountTokens { prompt } => {
            let resp = generator
                .count_tokens(CountTokensParameters::new(model, prompt))
                .await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Commands::Embed { text } => {
            generator
                .embed_content(EmbedContentParameters {
                    model,
                    contents: text,
                })
                .await?;
        }
        Commands::Models => {}
    }
    Ok(())
}

fn generation_request(
    model: &str,
    prompt: String,
    system: Option<String>,
    temperature: Option<f64>,
    max_output_tokens: Option<u32>,
) -> GenerateContentParameters {
    let mut config = match system {
        Some(system) => GenerateContentConfig::default().with_system_instruction(system),
        None => GenerateContentConfig::default(),
    };
    config.temperature = temperature;
    config.max_output_tokens = max_output_tokens;
    GenerateContentParameters::new(model, prompt).with_config(config)
}

async fn stream_to_stdout(
    generator: &dyn ContentGenerator,
    request: GenerateContentParameters,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chunks = generator.generate_content_stream(request).await?;
    while let Some(chunk) = chunks.next().await {
        print_response(&chunk?, json)?;
        if json {
            println!();
        }
        std::io::stdout().flush()?;
    }
    Ok(())
}

fn print_response(resp: &GenerateContentResponse, json: bool) -> Result<(), serde_json::Error> {
    if json {
        print!("{}", serde_json::to_string(resp)?);
        return Ok(());
    }
    if let Some(text) = resp.text() {
        print!("{text}");
    }
    for call in resp.function_calls() {
        let args = call.args.as_ref().map(ToString::to_string).unwrap_or_default();
        print!("\n[function call] {}({args})", call.name);
    }
    Ok(())
}
