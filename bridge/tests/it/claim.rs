use alloy::primitives::U256;
use bridge::{
    claim::ClaimRequest,
    crypto::SecretKey,
    error::BridgeError,
    event::{BridgeEvent, Claim},
    token::TokenContract,
};

use crate::{Network, THRESHOLD, TOKEN_ID};

/// Deposit `amount` from a fresh account on deployment `from` towards deployment `to`.
fn deposit(network: &mut Network, from: usize, to: usize, amount: u64) -> ClaimRequest {
    let user = network.random_account();
    network.fund(from, user, U256::from(amount));
    let to_chain = network.deployments[to].network_id();
    let tx = network.deployments[from]
        .bridge
        .deposit(user, U256::from(amount), to_chain, TOKEN_ID)
        .unwrap();
    ClaimRequest::from(&tx)
}

#[bridge_macros::test]
fn round_trip(mut network: Network) {
    let request = deposit(&mut network, 0, 1, 1_000);
    let user = request.user;

    assert_eq!(
        network.deployments[1]
            .bridge
            .pending_txs(request.from_chain, &[request.tx_id]),
        vec![false]
    );
    network.relay(0, 1, request.tx_id).unwrap();

    let side = &network.deployments[1];
    assert_eq!(side.token.balance_of(user), U256::from(1_000));
    assert_eq!(
        side.bridge.pending_txs(request.from_chain, &[request.tx_id]),
        vec![true]
    );
    assert_eq!(
        side.bridge.events().last(),
        Some(&BridgeEvent::Claim(Claim {
            user,
            amount: U256::from(1_000),
            from_chain: request.from_chain,
            to_chain: request.to_chain,
            token_id: TOKEN_ID,
            tx_id: request.tx_id,
        }))
    );

    // Back home: burned on the side chain, released from custody.
    let home_network = network.deployments[0].network_id();
    network.deployments[1]
        .token
        .approve(user, network.deployments[1].address(), U256::from(400));
    let tx = network.deployments[1]
        .bridge
        .deposit(user, U256::from(400), home_network, TOKEN_ID)
        .unwrap();
    network.relay(1, 0, tx.tx_id).unwrap();

    let home = &network.deployments[0];
    assert_eq!(home.token.balance_of(user), U256::from(400));
    assert_eq!(home.token.balance_of(home.address()), U256::from(600));
    assert_eq!(network.deployments[1].token.balance_of(user), U256::from(600));
}

#[bridge_macros::test]
fn claim_succeeds_exactly_once(mut network: Network) {
    let request = deposit(&mut network, 0, 2, 10);
    let signatures = network.attest(2, &request, THRESHOLD as usize);

    network.deployments[2]
        .bridge
        .claim(&request, &signatures)
        .unwrap();
    for _ in 0..3 {
        assert_eq!(
            network.deployments[2].bridge.claim(&request, &signatures),
            Err(BridgeError::AlreadyClaimed {
                from_chain: request.from_chain,
                tx_id: request.tx_id
            })
        );
    }
    assert_eq!(
        network.deployments[2].token.balance_of(request.user),
        U256::from(10)
    );

    // The same id from a different source is a separate claim.
    let from_elsewhere = ClaimRequest {
        from_chain: network.deployments[1].network_id(),
        ..request.clone()
    };
    let signatures = network.attest(2, &from_elsewhere, THRESHOLD as usize);
    network.deployments[2]
        .bridge
        .claim(&from_elsewhere, &signatures)
        .unwrap();
}

#[bridge_macros::test]
fn quorum_of_distinct_registered_signers(mut network: Network) {
    let request = deposit(&mut network, 0, 1, 77);
    let outsider = SecretKey::new_from_rng(&mut network.rng);
    assert!(!network.deployments[1].bridge.is_signer(outsider.address()));

    let message = network.deployments[1].bridge.claim_message(&request);
    let valid = message.sign(&network.oracles[0]).unwrap();
    let unregistered = message.sign(&outsider).unwrap();

    let dest = &mut network.deployments[1];
    assert_eq!(
        dest.bridge.claim(&request, &[valid, unregistered]),
        Err(BridgeError::QuorumNotMet {
            valid: 1,
            required: THRESHOLD
        })
    );
    assert_eq!(
        dest.bridge.claim(&request, &[valid, valid, valid, valid]),
        Err(BridgeError::QuorumNotMet {
            valid: 1,
            required: THRESHOLD
        })
    );
    assert_eq!(
        dest.bridge.pending_txs(request.from_chain, &[request.tx_id]),
        vec![false]
    );

    let second = message.sign(&network.oracles[1]).unwrap();
    let dest = &mut network.deployments[1];
    dest.bridge
        .claim(&request, &[unregistered, valid, second])
        .unwrap();
    assert_eq!(
        dest.bridge.claim(&request, &[valid, second]),
        Err(BridgeError::AlreadyClaimed {
            from_chain: request.from_chain,
            tx_id: request.tx_id
        })
    );
}

#[bridge_macros::test]
fn threshold_changes_apply_forward(mut network: Network) {
    let owner = network.owner;
    let first = deposit(&mut network, 0, 1, 5);
    let second = deposit(&mut network, 0, 1, 6);
    let first_signatures = network.attest(1, &first, 2);
    let second_signatures = network.attest(1, &second, 2);

    let dest = &mut network.deployments[1];
    dest.bridge.claim(&first, &first_signatures).unwrap();

    dest.bridge.set_min_req_sigs(owner, 3).unwrap();
    assert_eq!(
        dest.bridge.claim(&second, &second_signatures),
        Err(BridgeError::QuorumNotMet {
            valid: 2,
            required: 3
        })
    );
    // Claims paid under the old threshold stay paid.
    assert_eq!(
        dest.bridge.pending_txs(first.from_chain, &[first.tx_id, second.tx_id]),
        vec![true, false]
    );

    let second_signatures = network.attest(1, &second, 3);
    network.deployments[1]
        .bridge
        .claim(&second, &second_signatures)
        .unwrap();
}

#[bridge_macros::test]
fn removed_signer_no_longer_counts(mut network: Network) {
    let owner = network.owner;
    let request = deposit(&mut network, 0, 1, 5);
    let signatures = network.attest(1, &request, 2);
    let removed = network.oracles[0].address();

    let dest = &mut network.deployments[1];
    dest.bridge.remove_signer(owner, removed).unwrap();
    assert_eq!(
        dest.bridge.claim(&request, &signatures),
        Err(BridgeError::QuorumNotMet {
            valid: 1,
            required: THRESHOLD
        })
    );

    dest.bridge.add_signer(owner, removed).unwrap();
    dest.bridge.claim(&request, &signatures).unwrap();
}

#[bridge_macros::test]
fn claims_are_bound_to_their_destination(mut network: Network) {
    let request = deposit(&mut network, 0, 1, 5);

    // Correctly signed for the intended destination, but submitted elsewhere.
    let signatures = network.attest(1, &request, THRESHOLD as usize);
    let wrong_network = network.deployments[2].network_id();
    assert_eq!(
        network.deployments[2].bridge.claim(&request, &signatures),
        Err(BridgeError::WrongDestination {
            to_chain: request.to_chain,
            local: wrong_network
        })
    );

    // Rewriting the destination invalidates the signatures, which commit to the original bridge and network.
    let redirected = ClaimRequest {
        to_chain: wrong_network,
        ..request.clone()
    };
    assert!(matches!(
        network.deployments[2].bridge.claim(&redirected, &signatures),
        Err(BridgeError::QuorumNotMet { valid: 0, .. })
    ));

    // A tampered amount recovers unknown signers.
    let inflated = ClaimRequest {
        amount: U256::from(5_000),
        ..request.clone()
    };
    assert!(matches!(
        network.deployments[1].bridge.claim(&inflated, &signatures),
        Err(BridgeError::QuorumNotMet { valid: 0, .. })
    ));

    network.deployments[1]
        .bridge
        .claim(&request, &signatures)
        .unwrap();
}

#[bridge_macros::test]
fn custody_shortfall(mut network: Network) {
    // A claim on the home chain for more than it holds, signed by a quorum.
    let user = network.random_account();
    let request = ClaimRequest {
        user,
        amount: U256::from(1),
        from_chain: network.deployments[1].network_id(),
        to_chain: network.deployments[0].network_id(),
        token_id: TOKEN_ID,
        tx_id: 1,
    };
    let signatures = network.attest(0, &request, THRESHOLD as usize);

    let home = &mut network.deployments[0];
    assert_eq!(
        home.bridge.claim(&request, &signatures),
        Err(BridgeError::InsufficientReserve {
            available: U256::ZERO,
            required: U256::from(1)
        })
    );
    assert_eq!(
        home.bridge.pending_txs(request.from_chain, &[request.tx_id]),
        vec![false]
    );
}
