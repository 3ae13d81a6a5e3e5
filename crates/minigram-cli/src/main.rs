//! Command-line interface for minigram.
//!
//! `minigram receive` listens on a port and prints every incoming message;
//! `minigram send` transmits a message, broadcasting by default.

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use clap::{Args, Parser, Subcommand};
use minigram::{ANY_ADDRESS, BROADCAST_ADDRESS, DEFAULT_PORT, Receiver, ReceiverConfig};
use tokio::io::AsyncBufReadExt;

#[derive(Debug, Parser)]
#[command(name = "minigram", version, about = "Send and receive small UDP messages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Receive data over UDP
    Receive(ReceiveArgs),
    /// Send data over UDP
    Send(SendArgs),
}

#[derive(Debug, Args)]
struct ReceiveArgs {
    /// On which port to listen
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// On which address to listen
    #[arg(short, long, default_value = ANY_ADDRESS)]
    address: String,

    /// Print the current date on data receive
    #[arg(short, long)]
    date: bool,

    /// Print the address of the sender
    #[arg(short, long)]
    sender: bool,
}

#[derive(Debug, Args)]
struct SendArgs {
    /// To which port to send
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// To which address to send
    #[arg(short, long, default_value = BROADCAST_ADDRESS)]
    address: String,

    /// The message to send
    #[arg(required_unless_present = "lines", conflicts_with = "lines")]
    message: Option<String>,

    /// Read standard input and send each line as a separate message
    #[arg(short, long)]
    lines: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Receive(args) => receive(args).await,
        Command::Send(args) => send(args).await,
    }
}

/// Listen until interrupted, printing every decoded payload. Optional
/// prefixes are joined with " | ".
async fn receive(args: ReceiveArgs) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", args.address, args.port);
    let show_date = args.date;
    let show_sender = args.sender;

    let receiver = Receiver::bind_with(
        ReceiverConfig::new(args.address, args.port),
        move |msg| {
            let mut parts = Vec::new();
            if show_date {
                parts.push(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
            }
            if show_sender {
                parts.push(msg.info.sender().to_string());
            }
            parts.push(msg.payload.to_string());
            println!("{}", parts.join(" | "));
        },
    )
    .await
    .with_context(|| format!("cannot listen on {bind_addr}"))?;

    eprintln!("listening on {} (press Ctrl-C to stop)", receiver.local_addr());

    tokio::signal::ctrl_c()
        .await
        .context("cannot wait for Ctrl-C")?;

    receiver.finish().await;
    Ok(())
}

/// Send the given message, or with --lines every line of standard input.
async fn send(args: SendArgs) -> anyhow::Result<()> {
    if args.lines {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .context("cannot read standard input")?
        {
            minigram::send(line, args.port, &args.address)
                .await
                .with_context(|| format!("cannot send to {}:{}", args.address, args.port))?;
        }
        return Ok(());
    }

    if let Some(message) = args.message {
        minigram::send(message, args.port, &args.address)
            .await
            .with_context(|| format!("cannot send to {}:{}", args.address, args.port))?;
    }
    Ok(())
}
