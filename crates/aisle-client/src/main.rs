#![doc = include_str!("../README.md")]

mod client;

use clap::Parser;
use client::config::{CliArgs, ClientConfig, Mode};
use client::picker::{ManualPicker, RandomPicker};
use client::{session, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ClientConfig::try_from(args)?;

    telemetry::init();

    let stream = session::connect(&config.addr, config.connect_timeout).await?;
    let (reader, writer) = stream.into_split();

    let summary = match config.mode {
        Mode::Manual => {
            let mut picker = ManualPicker::new();
            session::run(reader, writer, &mut picker).await?
        }
        Mode::Automatic => {
            let mut picker = RandomPicker::new(config.think_ms);
            session::run(reader, writer, &mut picker).await?
        }
    };

    println!("Session over: {} seat(s) reserved.", summary.reserved);
    Ok(())
}
