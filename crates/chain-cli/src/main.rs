mod ai;

use anyhow::Result;
use chain_core::chain::Chain;
use chain_core::constants::DEFAULT_DIFFICULTY_BYTES;
use chain_core::pow::Difficulty;
use chain_core::{BlockFactory, SystemClock};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chain-cli")]
#[command(about = "Demo driver for the hash-chained ledger core")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a chain, validate it, and run the processing stub
    Demo {
        /// Leading zero bytes required of each sealed block hash
        #[arg(long, default_value_t = DEFAULT_DIFFICULTY_BYTES)]
        difficulty: usize,
        /// Number of blocks to seal on top of genesis
        #[arg(long, default_value_t = 1)]
        blocks: u32,
        /// Payload stored in each sealed block
        #[arg(long, default_value = "New Block Data")]
        payload: String,
        /// Dump the resulting chain as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo {
            difficulty,
            blocks,
            payload,
            json,
        } => demo(difficulty, blocks, &payload, json),
    }
}

fn demo(difficulty: usize, blocks: u32, payload: &str, json: bool) -> Result<()> {
    let factory = BlockFactory::new(Difficulty::leading_zero_bytes(difficulty));
    let mut chain = Chain::with_genesis("Genesis Block", &SystemClock);

    for _ in 0..blocks {
        let tip = chain.tip().expect("chain starts with genesis");
        let block = factory.create_block(tip, payload.as_bytes());
        println!("New Block Created with Hash: {}", block.hash_hex());
        chain.push(block);
    }

    if chain.is_valid() {
        println!("Blockchain is valid.");
    } else {
        println!("Blockchain is invalid.");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&chain)?);
    }

    let response = ai::process(ai::AiRequest {
        user_id: "user123".into(),
        operation: "process".into(),
        data: b"Sample Data".to_vec(),
    })?;
    println!("AI Response: {}", String::from_utf8_lossy(&response.result));

    Ok(())
}
