#![cfg(test)]

use super::*;
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events as _, Ledger as _},
    Address, Bytes, Env, IntoVal, String, Symbol, Val, Vec,
};

fn code(error: FeedError) -> soroban_sdk::Error {
    soroban_sdk::Error::from_contract_error(error as u32)
}

fn create_feed<'a>(env: &Env, initial_status: u32) -> (SequencerUptimeFeedClient<'a>, Address) {
    let contract_id = env.register(SequencerUptimeFeed, ());
    let client = SequencerUptimeFeedClient::new(env, &contract_id);
    let owner = Address::generate(env);

    client.initialize(&initial_status, &owner);

    (client, owner)
}

/// Feed with an L1 sender and a reader that has access.
fn create_reporting_feed<'a>(env: &Env) -> (SequencerUptimeFeedClient<'a>, Address, Address) {
    let (client, owner) = create_feed(env, STATUS_UP);
    let l1_sender = Address::generate(env);
    let reader = Address::generate(env);

    client.set_l1_sender(&owner, &l1_sender);
    client.add_access(&owner, &reader);

    (client, l1_sender, reader)
}

fn has_topic(env: &Env, name: Symbol) -> bool {
    env.events().all().iter().any(|(_, topics, _)| {
        let first: Val = topics.get(0).unwrap();
        let expected: Val = name.into_val(env);
        first.shallow_eq(&expected)
    })
}

#[test]
fn test_initialize_records_first_round() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);
    env.ledger().set_sequence_number(42);

    let (client, owner) = create_feed(&env, STATUS_UP);
    assert!(has_topic(&env, symbol_short!("new_round")));

    client.add_access(&owner, &owner);

    let round = client.latest_round_data(&owner);
    assert_eq!(round.round_id, 1);
    assert_eq!(round.answer, 0);
    assert_eq!(round.block_num, 42);
    assert_eq!(round.started_at, 1_700_000_000);
    assert_eq!(round.updated_at, 1_700_000_000);
    assert_eq!(client.owner(), owner);
    assert!(client.check_enabled());
}

#[test]
#[should_panic(expected = "Error(Contract, #1)")]
fn test_cannot_initialize_twice() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, owner) = create_feed(&env, STATUS_UP);
    client.initialize(&STATUS_UP, &owner);
}

#[test]
fn test_initialize_rejects_invalid_status() {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(SequencerUptimeFeed, ());
    let client = SequencerUptimeFeedClient::new(&env, &contract_id);
    let owner = Address::generate(&env);

    assert_eq!(
        client.try_initialize(&2, &owner),
        Err(Ok(code(FeedError::InvalidStatus)))
    );
}

#[test]
fn test_initialize_requires_owner_signature() {
    let env = Env::default();

    let contract_id = env.register(SequencerUptimeFeed, ());
    let client = SequencerUptimeFeedClient::new(&env, &contract_id);
    let owner = Address::generate(&env);

    env.set_auths(&[]);
    assert!(client.try_initialize(&STATUS_UP, &owner).is_err());
    assert_eq!(
        client.try_owner(),
        Err(Ok(code(FeedError::NotInitialized)))
    );

    env.mock_all_auths();
    client.initialize(&STATUS_UP, &owner);
    assert_eq!(client.owner(), owner);
}

#[test]
fn test_second_initialize_reports_already_initialized() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, owner) = create_feed(&env, STATUS_UP);
    assert_eq!(
        client.try_initialize(&7, &owner),
        Err(Ok(code(FeedError::AlreadyInitialized)))
    );
}

#[test]
fn test_constant_metadata() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _owner) = create_feed(&env, STATUS_UP);

    assert_eq!(
        client.description(),
        String::from_str(&env, "L2 Sequencer Uptime Status Feed")
    );
    assert_eq!(client.decimals(), 0);
    assert_eq!(
        client.type_and_version(),
        String::from_str(&env, "SequencerUptimeFeed 1.0.0")
    );
}

#[test]
fn test_has_access_reports_per_user() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, owner) = create_feed(&env, STATUS_UP);
    let user = Address::generate(&env);
    let other = Address::generate(&env);
    let data = Bytes::new(&env);

    client.add_access(&owner, &user);

    assert!(client.has_access(&user, &data));
    assert!(!client.has_access(&other, &data));
    client.check_access(&user);
    assert_eq!(
        client.try_check_access(&other),
        Err(Ok(code(FeedError::NoAccess)))
    );
}

#[test]
fn test_round_reads_are_gated() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _owner) = create_feed(&env, STATUS_UP);
    let stranger = Address::generate(&env);

    assert_eq!(
        client.try_latest_round_data(&stranger),
        Err(Ok(code(FeedError::NoAccess)))
    );
    assert_eq!(
        client.try_round_data(&stranger, &1),
        Err(Ok(code(FeedError::NoAccess)))
    );
}

#[test]
fn test_non_owner_cannot_set_l1_sender() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _owner) = create_feed(&env, STATUS_UP);
    let intruder = Address::generate(&env);

    assert_eq!(
        client.try_set_l1_sender(&intruder, &intruder),
        Err(Ok(code(FeedError::NotOwner)))
    );
    assert_eq!(client.l1_sender(), None);
}

#[test]
fn test_update_status_requires_l1_sender() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _l1_sender, _reader) = create_reporting_feed(&env);
    let impostor = Address::generate(&env);

    assert_eq!(
        client.try_update_status(&impostor, &STATUS_DOWN, &10),
        Err(Ok(code(FeedError::NotL1Sender)))
    );
}

#[test]
fn test_status_flip_opens_new_round() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(100);

    let (client, l1_sender, reader) = create_reporting_feed(&env);

    env.ledger().set_timestamp(200);
    client.update_status(&l1_sender, &STATUS_DOWN, &150);

    let round = client.latest_round_data(&reader);
    assert_eq!(round.round_id, 2);
    assert_eq!(round.answer, 1);
    assert_eq!(round.started_at, 150);
    assert_eq!(round.updated_at, 200);

    let first = client.round_data(&reader, &1);
    assert_eq!(first.answer, 0);
    assert_eq!(first.started_at, 100);
}

#[test]
fn test_same_status_refreshes_round() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(100);
    env.ledger().set_sequence_number(1);

    let (client, l1_sender, reader) = create_reporting_feed(&env);

    env.ledger().set_timestamp(300);
    env.ledger().set_sequence_number(7);
    client.update_status(&l1_sender, &STATUS_UP, &250);

    let round = client.latest_round_data(&reader);
    assert_eq!(round.round_id, 1);
    assert_eq!(round.started_at, 100);
    assert_eq!(round.updated_at, 300);
    assert_eq!(round.block_num, 7);
}

#[test]
fn test_stale_update_is_ignored() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(100);

    let (client, l1_sender, reader) = create_reporting_feed(&env);

    client.update_status(&l1_sender, &STATUS_DOWN, &100);
    assert!(has_topic(&env, symbol_short!("upd_ignrd")));

    let round = client.latest_round_data(&reader);
    assert_eq!(round.round_id, 1);
    assert_eq!(round.answer, 0);
}

#[test]
fn test_round_data_out_of_range() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _l1_sender, reader) = create_reporting_feed(&env);

    assert_eq!(
        client.try_round_data(&reader, &0),
        Err(Ok(code(FeedError::RoundNotFound)))
    );
    assert_eq!(
        client.try_round_data(&reader, &2),
        Err(Ok(code(FeedError::RoundNotFound)))
    );
    assert_eq!(
        client.try_round_data(&reader, &(u64::MAX as u128 + 1)),
        Err(Ok(code(FeedError::RoundNotFound)))
    );
}

#[test]
fn test_disabled_check_opens_reads() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, owner) = create_feed(&env, STATUS_DOWN);
    let anyone = Address::generate(&env);

    client.disable_access_check(&owner);
    assert_eq!(client.latest_round_data(&anyone).answer, 1);

    client.enable_access_check(&owner);
    assert!(client.try_latest_round_data(&anyone).is_err());
}

#[test]
fn test_repeated_reads_are_identical() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _l1_sender, reader) = create_reporting_feed(&env);

    let first = client.latest_round_data(&reader);
    let second = client.latest_round_data(&reader);
    assert_eq!(first, second);
}

#[test]
fn test_l1_sender_event_carries_previous_sender() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, owner) = create_feed(&env, STATUS_UP);
    let first = Address::generate(&env);
    let second = Address::generate(&env);

    client.set_l1_sender(&owner, &first);
    client.set_l1_sender(&owner, &second);
    let events = env.events().all();

    let (_, topics, data) = events.last().unwrap();
    let expected: Vec<Val> = (symbol_short!("l1_sender"),).into_val(&env);
    assert_eq!(topics, expected);
    let (from, to): (Option<Address>, Address) = data.into_val(&env);
    assert_eq!(from, Some(first));
    assert_eq!(to, second.clone());

    assert_eq!(client.l1_sender(), Some(second));
}
