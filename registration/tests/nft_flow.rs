//! End-to-end NFT-staking flow tests against fake collaborators.

mod common;

use common::{FakeApi, FakeChain, FakeWallet, WALLET};
use mintgate_core::{StakeRecord, STAKING_REQUIREMENT_SECS};
use mintgate_registration::{FlowError, NftFlow, NftState, StakeStatus};

const NOW: u64 = 1_700_000_000;

fn staked_record(token_id: u64, staked_secs_ago: u64) -> StakeRecord {
    StakeRecord {
        token_id,
        is_staked: true,
        stake_timestamp: NOW - staked_secs_ago,
        last_action_timestamp: NOW - staked_secs_ago,
    }
}

fn unstaked_record(token_id: u64) -> StakeRecord {
    StakeRecord {
        token_id,
        is_staked: false,
        stake_timestamp: 0,
        last_action_timestamp: 0,
    }
}

/// Runs a stake check for `raw_token_id` against the given chain.
async fn check_token(flow: &mut NftFlow, chain: &FakeChain, raw_token_id: &str) {
    let ticket = flow.set_token_id(raw_token_id).unwrap();
    assert_eq!(flow.state(), NftState::CheckingStake);
    flow.run_stake_check(&ticket, chain, NOW).await;
}

#[tokio::test]
async fn test_eligible_token_submits_with_token_id_message() {
    let chain = FakeChain::with_record(staked_record(42, 10 * 86_400));
    let api = FakeApi::accepting();
    let wallet = FakeWallet::new(WALLET);
    let mut flow = NftFlow::new();

    check_token(&mut flow, &chain, "42").await;
    assert_eq!(flow.state(), NftState::Eligible);
    assert_eq!(*flow.stake_status(), StakeStatus::Eligible);

    flow.set_email("a@b.com");
    flow.set_wallet_address(WALLET);
    assert!(flow.gate().submit_allowed());

    flow.submit(&wallet, &api).await.unwrap();

    let submissions = api.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].token_id, Some(42));
    assert_eq!(submissions[0].code, None);
    assert_eq!(submissions[0].email, "a@b.com");

    assert_eq!(
        wallet.signed_messages(),
        vec![(
            "Register with NFT token ID: 42".to_string(),
            WALLET.to_string()
        )]
    );

    // Success resets the whole flow
    assert_eq!(flow.state(), NftState::AwaitingTokenId);
    assert_eq!(flow.token_id(), None);
}

#[tokio::test]
async fn test_unstaked_token_blocks_regardless_of_fields() {
    let chain = FakeChain::with_record(unstaked_record(7));
    let api = FakeApi::accepting();
    let wallet = FakeWallet::new(WALLET);
    let mut flow = NftFlow::new();

    check_token(&mut flow, &chain, "7").await;
    assert_eq!(flow.state(), NftState::Ineligible);
    assert_eq!(*flow.stake_status(), StakeStatus::NotStaked);

    // Even with every field valid, submission stays blocked
    flow.set_email("a@b.com");
    flow.set_wallet_address(WALLET);
    assert!(!flow.gate().submit_allowed());

    let err = flow.submit(&wallet, &api).await.unwrap_err();
    assert!(matches!(err, FlowError::Ineligible(_)));
    assert!(api.submissions().is_empty());
}

#[tokio::test]
async fn test_waiting_token_reports_days_remaining() {
    // Staked three days ago: four whole days left
    let chain = FakeChain::with_record(staked_record(7, 3 * 86_400));
    let mut flow = NftFlow::new();

    check_token(&mut flow, &chain, "7").await;
    assert_eq!(flow.state(), NftState::Ineligible);
    assert_eq!(
        *flow.stake_status(),
        StakeStatus::Waiting {
            remaining_wait_secs: 345_600
        }
    );
    assert_eq!(flow.stake_status().to_string(), "4 days remaining until eligible");

    let api = FakeApi::accepting();
    let wallet = FakeWallet::new(WALLET);
    flow.set_email("a@b.com");
    flow.set_wallet_address(WALLET);

    let err = flow.submit(&wallet, &api).await.unwrap_err();
    match err {
        FlowError::Ineligible(message) => assert!(message.contains("4 more days")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_exactly_one_week_is_eligible() {
    let chain = FakeChain::with_record(staked_record(7, STAKING_REQUIREMENT_SECS));
    let mut flow = NftFlow::new();

    check_token(&mut flow, &chain, "7").await;
    assert_eq!(*flow.stake_status(), StakeStatus::Eligible);
}

#[tokio::test]
async fn test_chain_error_returns_to_awaiting_token_id() {
    let chain = FakeChain::empty();
    let mut flow = NftFlow::new();

    check_token(&mut flow, &chain, "999").await;
    assert_eq!(flow.state(), NftState::AwaitingTokenId);
    assert!(matches!(flow.stake_status(), StakeStatus::Failed(_)));
    assert!(!flow.gate().submit_allowed());
}

#[tokio::test]
async fn test_stale_stake_result_is_dropped() {
    let chain_staked = FakeChain::with_record(staked_record(1, 10 * 86_400));
    let chain_unstaked = FakeChain::with_record(unstaked_record(2));
    let mut flow = NftFlow::new();

    // User types token 1, then changes to token 2 before the first read
    // resolves.
    let old_ticket = flow.set_token_id("1").unwrap();
    let new_ticket = flow.set_token_id("2").unwrap();

    // The read for token 1 resolves late: it must not mark the flow
    // eligible, because the current input is token 2.
    let applied = flow.run_stake_check(&old_ticket, &chain_staked, NOW).await;
    assert!(!applied);
    assert_eq!(*flow.stake_status(), StakeStatus::Checking);

    let applied = flow.run_stake_check(&new_ticket, &chain_unstaked, NOW).await;
    assert!(applied);
    assert_eq!(*flow.stake_status(), StakeStatus::NotStaked);
}

#[tokio::test]
async fn test_invalid_token_id_is_rejected_locally() {
    let mut flow = NftFlow::new();
    assert!(matches!(
        flow.set_token_id("-1").unwrap_err(),
        FlowError::Validation(_)
    ));
    assert_eq!(flow.state(), NftState::AwaitingTokenId);
    assert_eq!(*flow.stake_status(), StakeStatus::Unknown);
}

#[tokio::test]
async fn test_pending_stake_check_blocks_submission() {
    let mut flow = NftFlow::new();
    let _ticket = flow.set_token_id("5").unwrap();
    flow.set_email("a@b.com");
    flow.set_wallet_address(WALLET);

    // The check never resolved: loading blocks submission.
    assert!(!flow.gate().submit_allowed());
}

#[tokio::test]
async fn test_signature_failure_keeps_eligibility() {
    let chain = FakeChain::with_record(staked_record(42, 10 * 86_400));
    let api = FakeApi::accepting();
    let wallet = FakeWallet {
        fail_sign: true,
        ..FakeWallet::new(WALLET)
    };
    let mut flow = NftFlow::new();

    check_token(&mut flow, &chain, "42").await;
    flow.set_email("a@b.com");
    flow.set_wallet_address(WALLET);

    let err = flow.submit(&wallet, &api).await.unwrap_err();
    assert!(matches!(err, FlowError::Wallet(_)));
    assert_eq!(flow.state(), NftState::CollectingDetails);
    assert!(*flow.stake_status() == StakeStatus::Eligible);
    assert!(api.submissions().is_empty());

    // Retry with a working wallet succeeds without re-checking the stake
    let good_wallet = FakeWallet::new(WALLET);
    flow.submit(&good_wallet, &api).await.unwrap();
    assert_eq!(api.submissions().len(), 1);
}

#[tokio::test]
async fn test_connect_wallet_fills_address() {
    let wallet = FakeWallet::new(WALLET);
    let mut flow = NftFlow::new();

    flow.connect_wallet(&wallet).await.unwrap();
    let chain = FakeChain::with_record(staked_record(3, 10 * 86_400));
    check_token(&mut flow, &chain, "3").await;
    flow.set_email("a@b.com");
    assert!(flow.gate().submit_allowed());
}
