use powchain_core::{Chain, ChainConfig, FixedClock, MemorySink};

pub const T0: u64 = 1_700_000_000_000;

pub const DEMO_PAYLOADS: [&str; 3] = [
    "First transaction: Alice sends 1 BTC to Bob",
    "Second transaction: Bob sends 0.5 BTC to Carol",
    "Third transaction: Carol buys coffee",
];

/// A chain whose clock is pinned to `T0`, so digests are reproducible.
pub fn fixed_chain(difficulty: u32) -> Chain {
    Chain::builder(ChainConfig::with_difficulty(difficulty))
        .clock(FixedClock(T0))
        .build()
        .expect("Failed to build chain")
}

pub fn recorded_chain(difficulty: u32) -> (Chain, MemorySink) {
    let sink = MemorySink::new();
    let chain = Chain::builder(ChainConfig::with_difficulty(difficulty))
        .clock(FixedClock(T0))
        .sink(sink.clone())
        .build()
        .expect("Failed to build chain");
    (chain, sink)
}

pub fn append_all(chain: &mut Chain, payloads: &[&str]) {
    for p in payloads {
        chain.append(*p).expect("Failed to append block");
    }
}
