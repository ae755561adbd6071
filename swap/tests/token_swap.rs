//! End-to-end swaps over a deployed engine with 18-decimal token amounts.

use rust_decimal_macros::dec;

use tokenswap_common::{AccountId, Amount, FeePercent, SwapError, PCT_SCALE};
use tokenswap_engine::{DeployConfig, Deployment};

const UNIT: Amount = 1_000_000_000_000_000_000;

fn tokens(n: u128) -> Amount {
    n * UNIT
}

fn holder() -> AccountId {
    AccountId::new("holder")
}

async fn deploy(fee_a: rust_decimal::Decimal, fee_b: rust_decimal::Decimal) -> Deployment {
    let config = DeployConfig {
        fee_percent_a: fee_a,
        fee_percent_b: fee_b,
        ..DeployConfig::default()
    };
    let deployment = Deployment::deploy(&config).await.unwrap();
    deployment.fund_a(&holder(), tokens(300)).unwrap();
    deployment
}

/// Swap 300 A into B, then 100 freshly issued B back into A.
async fn run_fixture(fee_a: rust_decimal::Decimal, fee_b: rust_decimal::Decimal) -> (Amount, Amount) {
    let d = deploy(fee_a, fee_b).await;

    let out_b = d.engine.swap_a_to_b(&holder(), tokens(300)).await.unwrap();
    assert_eq!(d.token_a.balance(&holder()), 0);
    assert_eq!(d.token_b.balance(&holder()), out_b);

    d.token_b.mint(&holder(), tokens(100) - out_b.min(tokens(100))).unwrap();
    let b_before = d.token_b.balance(&holder());
    d.approve_b(&holder(), tokens(100));

    let out_a = d.engine.swap_b_to_a(&holder(), tokens(100)).await.unwrap();
    assert_eq!(d.token_b.balance(&holder()), b_before - tokens(100));
    assert_eq!(d.token_a.balance(&holder()), out_a);

    (out_b, out_a)
}

#[tokio::test]
async fn swaps_without_fees() {
    assert_eq!(run_fixture(dec!(0), dec!(0)).await, (tokens(100), tokens(300)));
}

#[tokio::test]
async fn swaps_with_transfer_token_fee() {
    assert_eq!(run_fixture(dec!(10), dec!(0)).await, (tokens(90), tokens(300)));
}

#[tokio::test]
async fn swaps_with_mintable_token_fee() {
    assert_eq!(run_fixture(dec!(0), dec!(10)).await, (tokens(100), tokens(270)));
}

#[tokio::test]
async fn swaps_with_both_fees() {
    assert_eq!(run_fixture(dec!(10), dec!(10)).await, (tokens(90), tokens(270)));
}

#[tokio::test]
async fn swaps_with_ninety_percent_fees() {
    assert_eq!(run_fixture(dec!(90), dec!(90)).await, (tokens(10), tokens(30)));
}

#[tokio::test]
async fn previews_match_executed_swaps() {
    let d = deploy(dec!(12.5), dec!(3)).await;

    let preview = d.engine.get_converted_amount_a_to_b(tokens(300)).unwrap();
    let quote = d.engine.quote(tokenswap_common::SwapDirection::AtoB, tokens(300)).unwrap();
    assert_eq!(quote.amount_out, preview);
    assert_eq!(quote.fee + quote.net_in, tokens(300));

    assert_eq!(d.engine.swap_a_to_b(&holder(), tokens(300)).await.unwrap(), preview);
    assert_eq!(preview, (tokens(300) - tokens(300) / 8) / 3);
}

#[tokio::test]
async fn admin_updates_fees() {
    let d = deploy(dec!(0), dec!(0)).await;
    let ten = FeePercent::from_percent(dec!(10)).unwrap();

    d.engine.set_fees(&d.admin, ten, ten).await.unwrap();

    assert_eq!(d.engine.fee_percent_a(), ten);
    assert_eq!(d.engine.fee_percent_b(), ten);
    assert_eq!(d.engine.get_converted_amount_a_to_b(tokens(300)).unwrap(), tokens(90));
    assert_eq!(d.engine.get_converted_amount_b_to_a(tokens(100)).unwrap(), tokens(270));
}

#[tokio::test]
async fn non_admin_cannot_set_fees() {
    let d = deploy(dec!(0), dec!(10)).await;
    let before = (d.engine.fee_percent_a(), d.engine.fee_percent_b());

    let result = d
        .engine
        .set_fees(&holder(), FeePercent::ZERO, FeePercent::ZERO)
        .await;

    match result {
        Err(SwapError::Unauthorized { account, .. }) => assert_eq!(account, holder()),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    assert_eq!((d.engine.fee_percent_a(), d.engine.fee_percent_b()), before);
}

#[tokio::test]
async fn fee_above_one_hundred_percent_is_rejected() {
    let d = deploy(dec!(0), dec!(0)).await;

    let result = d
        .engine
        .set_fees(&d.admin, FeePercent::from_scaled(PCT_SCALE + 1), FeePercent::ZERO)
        .await;

    assert!(matches!(result, Err(SwapError::InvalidPercentage { .. })));
    assert_eq!(d.engine.fee_percent_a(), FeePercent::ZERO);
}

#[tokio::test]
async fn zero_amount_is_rejected_without_side_effects() {
    let d = deploy(dec!(0), dec!(0)).await;

    let a_to_b = d.engine.swap_a_to_b(&holder(), 0).await;
    let b_to_a = d.engine.swap_b_to_a(&holder(), 0).await;

    assert!(matches!(a_to_b, Err(SwapError::InvalidAmount { .. })));
    assert!(matches!(b_to_a, Err(SwapError::InvalidAmount { .. })));
    assert_eq!(d.token_a.balance(&holder()), tokens(300));
    assert_eq!(d.token_b.balance(&holder()), 0);
}

#[tokio::test]
async fn insufficient_allowance_leaves_balances_untouched() {
    let d = deploy(dec!(0), dec!(0)).await;
    d.token_a.approve(&holder(), d.engine.operator(), tokens(299));

    let result = d.engine.swap_a_to_b(&holder(), tokens(300)).await;

    assert!(matches!(result, Err(SwapError::InsufficientAllowance { .. })));
    assert_eq!(d.token_a.balance(&holder()), tokens(300));
    assert_eq!(d.token_b.total_supply(), 0);
}

#[tokio::test]
async fn insufficient_balance_is_reported() {
    let d = deploy(dec!(0), dec!(0)).await;
    d.token_a.approve(&holder(), d.engine.operator(), tokens(1_000));

    let result = d.engine.swap_a_to_b(&holder(), tokens(301)).await;

    assert!(matches!(
        result,
        Err(SwapError::InsufficientBalance { required, available, .. })
            if required == tokens(301) && available == tokens(300)
    ));
}

#[tokio::test]
async fn revoked_minter_blocks_swap_into_mintable_token() {
    let d = deploy(dec!(0), dec!(0)).await;
    d.token_b.revoke_minter(d.engine.operator());

    let result = d.engine.swap_a_to_b(&holder(), tokens(300)).await;

    assert!(matches!(result, Err(SwapError::MintNotPermitted { .. })));
    assert_eq!(d.token_a.balance(&holder()), tokens(300));
    assert_eq!(d.token_a.balance(d.engine.operator()), 0);
    assert_eq!(d.token_b.balance(&holder()), 0);

    let metrics = d.engine.metrics();
    assert_eq!(metrics.swaps_attempted, 1);
    assert_eq!(metrics.swaps_rejected, 1);
    assert_eq!(metrics.swaps_succeeded, 0);
}
