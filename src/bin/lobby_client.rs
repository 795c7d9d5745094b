use clap::Parser;
use futures::{SinkExt, StreamExt};
use mafia_lobby::{
    client::{render, ClientCommand, ClientOutput},
    WebSocketMessage,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the mafia lobby server")]
struct Args {
    /// WebSocket endpoint of the server
    #[arg(long, default_value = "ws://127.0.0.1:4001/ws")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lobby_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let (stream, _) = connect_async(args.url.as_str()).await?;
    let (mut write, mut read) = stream.split();

    println!("Connected to {}", args.url);
    println!("Commands: /create <nickname>, /join <code> <nickname>, /reset, /quit");

    let reader = tokio::spawn(async move {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<WebSocketMessage>(&text) {
                    Ok(message) => match render(&message) {
                        ClientOutput::Notice(line) => println!("{}", line),
                        ClientOutput::Alert(line) => {
                            eprintln!();
                            eprintln!("!!! ERROR: {}", line);
                            eprintln!();
                        }
                    },
                    Err(e) => warn!(error = %e, "Unreadable frame from server"),
                },
                Ok(Message::Close(_)) => break,
                Ok(other) => debug!(frame = ?other, "Ignoring non-text frame"),
                Err(e) => {
                    eprintln!("!!! ERROR: connection lost: {}", e);
                    break;
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ClientCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let Some(message) = command.into_message() else {
            break;
        };

        write
            .send(Message::Text(serde_json::to_string(&message)?))
            .await?;
    }

    let _ = write.send(Message::Close(None)).await;
    reader.abort();
    Ok(())
}
