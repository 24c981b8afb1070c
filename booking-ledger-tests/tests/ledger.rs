use booking_ledger::{
    rpc::TxValidationCode,
    types::{Booking, TransactionName},
};
use booking_ledger_client::LedgerClientError;
use booking_ledger_tests::{
    utils::{asset_args, tagged},
    Org, TestPeer,
};

#[tokio::test]
async fn conflicting_writes_commit_once() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let contract = peer.contract(Org::Org1)?;
    let id = tagged("asset");

    let mut first_args = asset_args(&id);
    first_args[1] = "first".to_string();
    let mut second_args = asset_args(&id);
    second_args[1] = "second".to_string();

    // Both simulations see the key as absent
    let first = contract
        .endorse(TransactionName::CreateAsset.as_ref(), &first_args)
        .await?;
    let second = contract
        .endorse(TransactionName::CreateAsset.as_ref(), &second_args)
        .await?;

    let status = first.submit().await?.status().await?;
    assert!(status.is_valid());

    let commit = second.submit().await?;
    let status = commit.status().await?;
    assert_eq!(status.code, TxValidationCode::MvccReadConflict);

    let ledger = peer.ledger()?;
    let recorded = ledger.status(commit.tx_id()).await;
    assert_eq!(
        recorded.map(|status| status.validation_code),
        Some(TxValidationCode::MvccReadConflict)
    );

    // Only the first write reached the world state
    let payload = contract
        .evaluate_transaction(TransactionName::ReadAsset.as_ref(), &[id])
        .await?;
    let booking: Booking = serde_json::from_slice(&payload)?;
    assert_eq!(booking.name, "first");
    Ok(())
}

#[tokio::test]
async fn invalid_transactions_fail_submission() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let contract = peer.contract(Org::Org1)?;
    let id = tagged("asset");

    let stale = contract
        .endorse(TransactionName::CreateAsset.as_ref(), &asset_args(&id))
        .await?;
    let _ = contract
        .submit_transaction(TransactionName::CreateAsset.as_ref(), &asset_args(&id))
        .await?;

    let tx_id = stale.tx_id().to_string();
    let commit = stale.submit().await?;
    let status = commit.status().await?;
    assert!(!status.is_valid());

    // The full flow reports the same outcome as an error
    let other = tagged("asset");
    let stale = contract
        .endorse(TransactionName::CreateAsset.as_ref(), &asset_args(&other))
        .await?;
    let _ = contract
        .submit_transaction(TransactionName::CreateAsset.as_ref(), &asset_args(&other))
        .await?;
    let status = stale.submit().await?.status().await?;
    assert_eq!(status.code, TxValidationCode::MvccReadConflict);

    let error = contract
        .submit_transaction(TransactionName::CreateAsset.as_ref(), &asset_args(&id))
        .await
        .expect_err("duplicate booking ID must fail");
    assert!(matches!(error, LedgerClientError::Contract(_)));

    let ledger = peer.ledger()?;
    assert!(ledger.is_committed(&tx_id).await);
    Ok(())
}

#[tokio::test]
async fn new_keys_invalidate_range_reads() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let contract = peer.contract(Org::Org1)?;

    let _ = contract
        .submit_transaction(
            TransactionName::CreateAsset.as_ref(),
            &asset_args(&tagged("asset")),
        )
        .await?;

    let listing = contract
        .endorse(TransactionName::GetAllAssets.as_ref(), &[])
        .await?;
    let listed: Vec<Booking> = serde_json::from_slice(listing.result())?;
    assert_eq!(listed.len(), 1);

    // Another key appears inside the range before the listing commits
    let _ = contract
        .submit_transaction(
            TransactionName::CreateAsset.as_ref(),
            &asset_args(&tagged("asset")),
        )
        .await?;

    let status = listing.submit().await?.status().await?;
    assert_eq!(status.code, TxValidationCode::PhantomReadConflict);

    // Re-running the listing against the current state succeeds
    let listing = contract
        .endorse(TransactionName::GetAllAssets.as_ref(), &[])
        .await?;
    let status = listing.submit().await?.status().await?;
    assert!(status.is_valid());
    Ok(())
}

#[tokio::test]
async fn blocks_form_a_hash_chain() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let contract = peer.contract(Org::Org1)?;
    let id = tagged("asset");

    let stale = contract
        .endorse(TransactionName::CreateAsset.as_ref(), &asset_args(&id))
        .await?;
    let _ = contract
        .submit_transaction(TransactionName::CreateAsset.as_ref(), &asset_args(&id))
        .await?;
    let invalid = stale.submit().await?;
    let _ = contract
        .submit_transaction(
            TransactionName::CreateAsset.as_ref(),
            &asset_args(&tagged("asset")),
        )
        .await?;

    let ledger = peer.ledger()?;
    let blocks = ledger.blocks().await;
    assert_eq!(blocks.len(), 3);
    assert_eq!(ledger.height().await, 3);

    assert_eq!(blocks[0].previous_hash, [0; 32]);
    for (number, pair) in blocks.windows(2).enumerate() {
        assert_eq!(pair[0].number, number as u64);
        assert_eq!(pair[1].previous_hash, pair[0].hash());
    }

    // Invalid transactions still take a block
    assert_eq!(blocks[1].tx_id, invalid.tx_id());
    assert_eq!(
        blocks[1].validation_code,
        TxValidationCode::MvccReadConflict
    );
    assert_eq!(blocks[2].validation_code, TxValidationCode::Valid);

    let status = invalid.status().await?;
    assert_eq!(status.block_number, 1);
    Ok(())
}

#[tokio::test]
async fn evaluation_does_not_touch_the_log() -> anyhow::Result<()> {
    let peer = TestPeer::start().await?;
    let contract = peer.contract(Org::Org1)?;

    let payload = contract
        .evaluate_transaction(TransactionName::GetAllAssets.as_ref(), &[])
        .await?;
    assert_eq!(payload, b"[]");

    // Endorsing without submitting leaves no trace either
    let _ = contract
        .endorse(
            TransactionName::CreateAsset.as_ref(),
            &asset_args(&tagged("asset")),
        )
        .await?;

    let ledger = peer.ledger()?;
    assert_eq!(ledger.height().await, 0);
    let payload = contract
        .evaluate_transaction(TransactionName::GetAllAssets.as_ref(), &[])
        .await?;
    assert_eq!(payload, b"[]");
    Ok(())
}
