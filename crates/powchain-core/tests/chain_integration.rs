mod helpers;

use std::thread;
use std::time::Duration;

use helpers::{append_all, fixed_chain, recorded_chain, DEMO_PAYLOADS, T0};
use powchain_core::{
    block_digest, meets_difficulty, CancelToken, Chain, ChainConfig, ChainError, ChainEvent,
    FailureReason, SharedChain, ValidationMode, ValidationResult,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn genesis_at_difficulty_four() -> anyhow::Result<()> {
    let chain = Chain::new(4)?;
    assert_eq!(chain.len(), 1);
    let genesis = &chain.blocks()[0];
    assert_eq!(genesis.index(), 0);
    assert!(genesis.digest().starts_with("0000"));
    assert_eq!(genesis.digest(), genesis.compute_digest());
    Ok(())
}

#[test]
fn two_appends_at_difficulty_two() -> anyhow::Result<()> {
    let mut chain = Chain::new(2)?;
    chain.append("a")?;
    chain.append("b")?;

    let blocks = chain.blocks();
    assert_eq!(blocks.len(), 3);
    for b in blocks {
        assert!(b.digest().starts_with("00"), "{} lacks prefix", b.digest());
    }
    assert_eq!(blocks[2].previous_digest(), blocks[1].digest());
    assert!(chain.validate().ok);
    Ok(())
}

#[test]
fn demo_chain_matches_known_digests() {
    let mut chain = fixed_chain(2);
    append_all(&mut chain, &DEMO_PAYLOADS);

    let expected = [
        (342, "0038dcde0c9a0900093da86d75c4e1729c4f817586f2ae2ea05308d47a8fffb5"),
        (556, "0044b9d3fc29c65ff399742a7322826e661383b7d5ba52744876f2be5713fc57"),
        (420, "00972a16ac9e341e5757ef3c483a3b58559272ae1dd9629d79124f7a7d4d86bc"),
        (381, "00be6fc0ea7db1da68361976036ed2ef7961213aef7610d1741ea945d977a317"),
    ];
    for (block, (nonce, digest)) in chain.blocks().iter().zip(expected) {
        assert_eq!(block.nonce(), nonce);
        assert_eq!(block.digest(), digest);
    }
}

#[test]
fn random_chain_is_linked_indexed_and_valid() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut chain = Chain::new(1).unwrap();
    let n = 25;
    for _ in 0..n {
        let len = rng.gen_range(0..64);
        let payload: String = (0..len).map(|_| rng.gen_range('a'..='z')).collect();
        chain.append(payload).unwrap();
    }

    let blocks = chain.blocks();
    assert_eq!(blocks.len(), n + 1);
    for (k, b) in blocks.iter().enumerate() {
        assert_eq!(b.index(), k as u64);
        assert!(meets_difficulty(b.digest(), 1));
        assert_eq!(
            b.digest(),
            block_digest(b.index(), b.timestamp(), b.payload(), b.previous_digest(), b.nonce())
        );
    }
    for pair in blocks.windows(2) {
        assert_eq!(pair[1].previous_digest(), pair[0].digest());
    }
    assert_eq!(chain.validate(), ValidationResult::valid());
    assert!(chain.validate_with(ValidationMode::Strict).ok);
}

#[test]
fn tampered_payload_is_caught_at_its_index() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        let mut chain = fixed_chain(1);
        append_all(&mut chain, &DEMO_PAYLOADS);
        let target = rng.gen_range(1..=3u64);

        chain.for_test_only_corrupt(target, "Tampered data").unwrap();

        let result = chain.validate();
        assert!(!result.ok);
        assert_eq!(result.failing_index, Some(target));
        assert_eq!(result.reason, Some(FailureReason::BadDigest));
    }
}

#[test]
fn rehashed_tamper_fails_proof_of_work() {
    let (mut chain, sink) = recorded_chain(2);
    append_all(&mut chain, &DEMO_PAYLOADS);
    assert!(chain.validate().ok);

    chain
        .for_test_only_corrupt_and_rehash(2, "Tampered data: Carol buys tea (instead of coffee)")
        .unwrap();
    assert_eq!(
        chain.blocks()[2].digest(),
        "a5aab8c28972db59e3e3ae5c733851d92fac7cefba52806048bb9c57c608c501"
    );
    assert_eq!(
        chain.validate(),
        ValidationResult::invalid(2, FailureReason::BadProofOfWork)
    );

    let events = sink.events();
    assert_eq!(
        events.last(),
        Some(&ChainEvent::ValidationFailed {
            index: 2,
            reason: FailureReason::BadProofOfWork,
        })
    );
    let mined = events
        .iter()
        .filter(|e| matches!(e, ChainEvent::BlockMined { .. }))
        .count();
    assert_eq!(mined, 4);
}

#[test]
fn rehashed_tamper_at_difficulty_zero_breaks_linkage() {
    let mut chain = fixed_chain(0);
    append_all(&mut chain, &DEMO_PAYLOADS);
    chain.for_test_only_corrupt_and_rehash(1, "rewritten").unwrap();
    assert_eq!(
        chain.validate(),
        ValidationResult::invalid(2, FailureReason::BadLinkage)
    );
}

#[test]
fn tampering_the_tip_with_rehash_at_difficulty_zero_goes_unnoticed() {
    // Without proof of work and without a successor, nothing pins the tip.
    let mut chain = fixed_chain(0);
    append_all(&mut chain, &DEMO_PAYLOADS);
    chain.for_test_only_corrupt_and_rehash(3, "rewritten").unwrap();
    assert!(chain.validate().ok);
}

#[test]
fn validation_is_idempotent() {
    let mut chain = fixed_chain(1);
    append_all(&mut chain, &DEMO_PAYLOADS);
    chain.for_test_only_corrupt(1, "x").unwrap();
    let first = chain.validate();
    assert_eq!(first, chain.validate());
}

#[test]
fn configuration_error_prevents_construction() {
    let err = Chain::with_config(ChainConfig::with_difficulty(64)).unwrap_err();
    assert!(matches!(err, ChainError::Configuration { difficulty: 64, .. }));
}

#[test]
fn cancel_from_another_thread_stops_genesis() {
    let token = CancelToken::new();
    let canceller = token.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        canceller.cancel();
    });

    let err = Chain::builder(ChainConfig::with_difficulty(10))
        .cancel_token(token)
        .build()
        .unwrap_err();
    handle.join().unwrap();

    assert!(matches!(err, ChainError::MiningCancelled { index: 0, .. }));
}

#[test]
fn shared_chain_serialises_append_and_validate() {
    let shared = SharedChain::new(fixed_chain(1));
    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            for i in 0..10 {
                shared.append(format!("block {i}")).unwrap();
            }
        })
    };
    // Every validation either sees the chain before or after a whole append.
    for _ in 0..20 {
        assert!(shared.validate().ok);
    }
    writer.join().unwrap();
    assert_eq!(shared.len(), 11);
    assert!(shared.blocks().iter().all(|b| b.timestamp() == T0));
}
