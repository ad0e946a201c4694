use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use powchain_core::{
    block_digest, constants::DEFAULT_DIFFICULTY, survey, Chain, ChainConfig, NonceStart,
    TracingSink, ValidationMode,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod render;

use render::{render_chain, render_survey, ConsoleSink};

const DEMO_PAYLOADS: [&str; 3] = [
    "First transaction: Alice sends 1 BTC to Bob",
    "Second transaction: Bob sends 0.5 BTC to Carol",
    "Third transaction: Carol buys coffee",
];
const DEMO_TAMPER_INDEX: u64 = 2;
const DEMO_TAMPER_PAYLOAD: &str = "Tampered data: Carol buys tea (instead of coffee)";

#[derive(Parser, Debug)]
#[command(name = "powchain")]
#[command(about = "Mine, dump and validate an in-memory proof-of-work hash chain")]
struct Cli {
    #[command(flatten)]
    chain: ChainArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct ChainArgs {
    /// Leading zero hex digits required of every block digest
    #[arg(long, global = true, env = "POWCHAIN_DIFFICULTY", default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u32,

    /// Nonce tested first by the mining search
    #[arg(long, global = true, value_enum, default_value_t = NonceStartArg::AfterIncrement)]
    nonce_start: NonceStartArg,

    /// Give up on a block after this many digests
    #[arg(long, global = true)]
    max_trials: Option<u64>,

    /// Also validate the genesis block and block positions
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum NonceStartArg {
    AfterIncrement,
    Zero,
}

impl From<NonceStartArg> for NonceStart {
    fn from(arg: NonceStartArg) -> Self {
        match arg {
            NonceStartArg::AfterIncrement => NonceStart::AfterIncrement,
            NonceStartArg::Zero => NonceStart::Zero,
        }
    }
}

impl ChainArgs {
    fn config(&self) -> ChainConfig {
        let validation = if self.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Standard
        };
        ChainConfig::with_difficulty(self.difficulty)
            .nonce_start(self.nonce_start.into())
            .max_trials(self.max_trials)
            .validation(validation)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a chain, append three blocks, dump it, then tamper and revalidate
    Demo,
    /// Build a chain from the given payloads and dump it
    Mine {
        /// Print the chain and validation result as JSON
        #[arg(long)]
        json: bool,
        /// One block is mined per payload, in order
        #[arg(required = true)]
        payloads: Vec<String>,
    },
    /// Print the digest of a single set of block fields
    Digest {
        #[arg(long)]
        index: u64,
        /// Milliseconds since the Unix epoch
        #[arg(long)]
        timestamp: u64,
        #[arg(long, allow_hyphen_values = true)]
        payload: String,
        #[arg(long, allow_hyphen_values = true)]
        previous: String,
        #[arg(long)]
        nonce: u64,
    },
    /// Sample mining trial counts for each difficulty up to a maximum
    Survey {
        #[arg(long, default_value_t = 3)]
        max_difficulty: u32,
        #[arg(long, default_value_t = 64)]
        samples: usize,
    },
}

#[derive(Serialize)]
struct ChainDump<'a> {
    difficulty: u32,
    blocks: &'a [powchain_core::Block],
    validation: powchain_core::ValidationResult,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo => demo(&cli.chain),
        Command::Mine { json, payloads } => mine(&cli.chain, json, &payloads),
        Command::Digest {
            index,
            timestamp,
            payload,
            previous,
            nonce,
        } => {
            println!("{}", block_digest(index, timestamp, &payload, &previous, nonce));
            Ok(())
        }
        Command::Survey {
            max_difficulty,
            samples,
        } => {
            info!(max_difficulty, samples, "running survey");
            let stats = survey::survey(&cli.chain.config(), max_difficulty, samples)
                .context("survey failed")?;
            print!("{}", render_survey(&stats, &survey::growth_factors(&stats)));
            Ok(())
        }
    }
}

fn demo(args: &ChainArgs) -> Result<()> {
    let mut chain = Chain::builder(args.config())
        .sink(ConsoleSink)
        .build()
        .context("failed to create chain")?;
    println!();

    for payload in DEMO_PAYLOADS {
        println!("Mining new block #{}...", chain.latest().index() + 1);
        chain
            .append(payload)
            .with_context(|| format!("failed to mine block for {payload:?}"))?;
        println!();
    }

    print!("{}", render_chain(chain.blocks()));
    println!("Blockchain is valid: {}", chain.validate().ok);

    println!();
    println!("--- Tampering Demonstration ---");
    println!("Tampering with block #{DEMO_TAMPER_INDEX} data...");
    chain.for_test_only_corrupt_and_rehash(DEMO_TAMPER_INDEX, DEMO_TAMPER_PAYLOAD)?;
    println!(
        "Blockchain is valid after tampering: {}",
        chain.validate().ok
    );
    println!(
        "Validation fails because the tampered block was rehashed without being \
         re-mined, and the block after it still links to the old digest."
    );
    Ok(())
}

fn mine(args: &ChainArgs, json: bool, payloads: &[String]) -> Result<()> {
    let builder = Chain::builder(args.config());
    // Keep stdout pure JSON; events still reach the log.
    let builder = if json {
        builder.sink(TracingSink)
    } else {
        builder.sink(ConsoleSink)
    };
    let mut chain = builder.build().context("failed to create chain")?;

    for payload in payloads {
        chain
            .append(payload.as_str())
            .with_context(|| format!("failed to mine block for {payload:?}"))?;
    }
    let validation = chain.validate();

    if json {
        let dump = ChainDump {
            difficulty: chain.difficulty(),
            blocks: chain.blocks(),
            validation,
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
    } else {
        print!("{}", render_chain(chain.blocks()));
        println!("Blockchain is valid: {}", validation.ok);
    }
    Ok(())
}
