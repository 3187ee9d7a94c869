use anyhow::Context;
use clap::Parser;
use tt_stub::cli::{CliArgs, Endpoint};
use tt_stub::client::{ChatMessage, TenstorrentClient};
use tt_stub::error::Result;
use tt_stub::{logging, server};

async fn run(args: CliArgs) -> Result<()> {
    let settings = args.client_settings()?;
    let client = TenstorrentClient::from_settings(&settings, args.client_model())?;
    let prompt = args.resolve_prompt()?;

    let response = match args.endpoint {
        Endpoint::Chat => {
            let mut messages = Vec::new();
            if let Some(system) = &args.system {
                messages.push(ChatMessage::system(system.as_str()));
            }
            messages.push(ChatMessage::user(prompt));
            client
                .create_chat_completion(&messages, args.max_tokens, args.temperature, args.stream)
                .await
        }
        Endpoint::Completion => {
            client
                .create_completion(&prompt, args.max_tokens, args.temperature, args.stream)
                .await
        }
        Endpoint::Embedding => client.create_embeddings(&[prompt], args.dimensions).await,
    }
    .with_context(|| format!("calling {}", client.base_url()))?;

    println!("status: {}", response.status);
    println!("{}", response.body);

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let level = logging::parse_level(args.log_level.as_deref());
    logging::init_tracing(level);

    let result = if args.serve {
        server::run_server(args.server_config(), level).await
    } else {
        run(args).await
    };

    if let Err(error) = result {
        tracing::error!("{error:?}");
        std::process::exit(1);
    }
}
