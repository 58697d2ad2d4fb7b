use std::collections::HashMap;

use common::decimal::dec;
use common::error::Error;
use common::model::currency::Currency;
use common::model::log::ActionKind;
use ledger_core::{ExchangeRateTable, LedgerConfig, LedgerEngine};
use rust_decimal::Decimal;

#[test]
fn test_create_account() {
    let engine = LedgerEngine::new();

    let account = engine
        .create_account("alice", dec!(100), Currency::USD)
        .unwrap();

    assert_eq!(account.id, 1);
    assert_eq!(account.name, "alice");
    assert_eq!(account.balance, dec!(100));
    assert_eq!(account.currency, Currency::USD);

    // Visible to lookups immediately
    let snapshot = engine.account(account.id).unwrap();
    assert_eq!(snapshot.balance, dec!(100));
}

#[test]
fn test_account_ids_are_sequential() {
    let engine = LedgerEngine::new();

    let a = engine.create_account("a", dec!(0), Currency::USD).unwrap();
    let b = engine.create_account("b", dec!(0), Currency::EUR).unwrap();
    let c = engine.create_account("c", dec!(0), Currency::GBP).unwrap();

    assert_eq!((a.id, b.id, c.id), (1, 2, 3));
}

#[test]
fn test_create_account_zero_balance_is_permitted() {
    let engine = LedgerEngine::new();
    let account = engine.create_account("bob", dec!(0), Currency::EUR).unwrap();
    assert_eq!(account.balance, dec!(0));
}

#[test]
fn test_create_account_negative_balance_rejected() {
    let engine = LedgerEngine::new();
    let result = engine.create_account("bob", dec!(-1), Currency::USD);
    assert!(matches!(result, Err(Error::InvalidAmount(_))));
}

#[test]
fn test_create_account_rejects_currency_absent_from_table() {
    let rates = HashMap::from([(Currency::USD, HashMap::from([(Currency::USD, dec!(1))]))]);
    let engine = LedgerEngine::with_table(ExchangeRateTable::new(rates).unwrap());

    let result = engine.create_account("a", dec!(0), Currency::EUR);
    assert!(matches!(result, Err(Error::UnsupportedCurrency(_))));
}

#[test]
fn test_get_missing_account() {
    let engine = LedgerEngine::new();
    let result = engine.account(42);
    assert!(matches!(result, Err(Error::AccountNotFound(_))));
}

#[test]
fn test_deposit() {
    let engine = LedgerEngine::new();
    let account = engine.create_account("alice", dec!(10), Currency::USD).unwrap();

    let balance = engine.deposit(account.id, dec!(15)).unwrap();

    assert_eq!(balance, dec!(25));
    assert_eq!(engine.account(account.id).unwrap().balance, dec!(25));
}

#[test]
fn test_deposit_missing_account() {
    let engine = LedgerEngine::new();
    let result = engine.deposit(99, dec!(10));
    assert!(matches!(result, Err(Error::AccountNotFound(_))));
}

#[test]
fn test_deposit_rejects_non_positive_amounts() {
    let engine = LedgerEngine::new();
    let account = engine.create_account("alice", dec!(10), Currency::USD).unwrap();

    assert!(matches!(
        engine.deposit(account.id, dec!(0)),
        Err(Error::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.deposit(account.id, dec!(-5)),
        Err(Error::InvalidAmount(_))
    ));
    assert_eq!(engine.account(account.id).unwrap().balance, dec!(10));
}

#[test]
fn test_withdraw() {
    let engine = LedgerEngine::new();
    let account = engine.create_account("alice", dec!(50), Currency::GBP).unwrap();

    let balance = engine.withdraw(account.id, dec!(20)).unwrap();

    assert_eq!(balance, dec!(30));
}

#[test]
fn test_withdraw_insufficient_funds_leaves_balance_unchanged() {
    let engine = LedgerEngine::new();
    let account = engine.create_account("alice", dec!(20), Currency::USD).unwrap();

    let result = engine.withdraw(account.id, dec!(50));

    assert!(matches!(result, Err(Error::InsufficientFunds(_))));
    assert_eq!(engine.account(account.id).unwrap().balance, dec!(20));
}

#[test]
fn test_withdraw_full_balance() {
    let engine = LedgerEngine::new();
    let account = engine.create_account("alice", dec!(20), Currency::USD).unwrap();

    let balance = engine.withdraw(account.id, dec!(20)).unwrap();
    assert_eq!(balance, dec!(0));
}

#[test]
fn test_deposit_then_equal_withdraw_restores_balance() {
    let engine = LedgerEngine::new();
    let account = engine.create_account("alice", dec!(73.21), Currency::EUR).unwrap();

    engine.deposit(account.id, dec!(11.07)).unwrap();
    engine.withdraw(account.id, dec!(11.07)).unwrap();

    assert_eq!(engine.account(account.id).unwrap().balance, dec!(73.21));
}

#[test]
fn test_transfer_cross_currency() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(100), Currency::USD).unwrap();
    let b = engine.create_account("b", dec!(0), Currency::EUR).unwrap();

    let outcome = engine.transfer(a.id, b.id, dec!(10)).unwrap();

    // USD -> EUR at 0.85
    assert_eq!(outcome.from_account_balance, dec!(90));
    assert_eq!(outcome.to_account_balance, dec!(8.5));
    assert_eq!(outcome.converted_amount, dec!(8.5));
    assert_eq!(engine.account(a.id).unwrap().balance, dec!(90));
    assert_eq!(engine.account(b.id).unwrap().balance, dec!(8.5));
}

#[test]
fn test_transfer_same_currency_uses_rate_one() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(100), Currency::GBP).unwrap();
    let b = engine.create_account("b", dec!(5), Currency::GBP).unwrap();

    let outcome = engine.transfer(a.id, b.id, dec!(40)).unwrap();

    assert_eq!(outcome.from_account_balance, dec!(60));
    assert_eq!(outcome.to_account_balance, dec!(45));
    assert_eq!(outcome.converted_amount, dec!(40));
}

#[test]
fn test_transfer_funds_check_is_pre_conversion() {
    // The sender needs `amount` in their own currency even when the
    // converted credit would be smaller.
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(9.99), Currency::USD).unwrap();
    let b = engine.create_account("b", dec!(0), Currency::EUR).unwrap();

    let result = engine.transfer(a.id, b.id, dec!(10));

    assert!(matches!(result, Err(Error::InsufficientFunds(_))));
    assert_eq!(engine.account(a.id).unwrap().balance, dec!(9.99));
    assert_eq!(engine.account(b.id).unwrap().balance, dec!(0));
}

#[test]
fn test_transfer_missing_accounts() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(100), Currency::USD).unwrap();

    assert!(matches!(
        engine.transfer(a.id, 99, dec!(10)),
        Err(Error::AccountNotFound(_))
    ));
    assert!(matches!(
        engine.transfer(99, a.id, dec!(10)),
        Err(Error::AccountNotFound(_))
    ));
    assert_eq!(engine.account(a.id).unwrap().balance, dec!(100));
}

#[test]
fn test_transfer_errors_name_the_missing_side() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(100), Currency::USD).unwrap();

    let err = engine.transfer(a.id, 99, dec!(10)).unwrap_err();
    assert!(err.to_string().contains("destination"));

    let err = engine.transfer(99, a.id, dec!(10)).unwrap_err();
    assert!(err.to_string().contains("source"));
}

#[test]
fn test_deposit_overflow_is_an_error_not_a_panic() {
    let engine = LedgerEngine::new();
    let account = engine
        .create_account("a", Decimal::MAX, Currency::USD)
        .unwrap();

    let result = engine.deposit(account.id, dec!(1));

    assert!(matches!(result, Err(Error::InvalidAmount(_))));
    assert_eq!(engine.account(account.id).unwrap().balance, Decimal::MAX);
}

#[test]
fn test_transfer_overflow_leaves_both_balances_unchanged() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(10), Currency::USD).unwrap();
    let b = engine
        .create_account("b", Decimal::MAX, Currency::USD)
        .unwrap();

    let result = engine.transfer(a.id, b.id, dec!(5));

    assert!(matches!(result, Err(Error::InvalidAmount(_))));
    assert_eq!(engine.account(a.id).unwrap().balance, dec!(10));
    assert_eq!(engine.account(b.id).unwrap().balance, Decimal::MAX);
}

#[test]
fn test_transfer_rejects_non_positive_amounts() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(100), Currency::USD).unwrap();
    let b = engine.create_account("b", dec!(0), Currency::USD).unwrap();

    assert!(matches!(
        engine.transfer(a.id, b.id, dec!(0)),
        Err(Error::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.transfer(a.id, b.id, dec!(-10)),
        Err(Error::InvalidAmount(_))
    ));
}

#[test]
fn test_self_transfer_is_permitted() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(100), Currency::USD).unwrap();

    let outcome = engine.transfer(a.id, a.id, dec!(30)).unwrap();

    // Debit and credit net out at rate 1
    assert_eq!(outcome.from_account_balance, dec!(100));
    assert_eq!(outcome.to_account_balance, dec!(100));
    assert_eq!(engine.account(a.id).unwrap().balance, dec!(100));
}

#[test]
fn test_self_transfer_still_requires_funds() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(10), Currency::USD).unwrap();

    let result = engine.transfer(a.id, a.id, dec!(20));
    assert!(matches!(result, Err(Error::InsufficientFunds(_))));
}

#[test]
fn test_log_records_mutations_in_commit_order() {
    let engine = LedgerEngine::new();
    let a = engine.create_account("a", dec!(100), Currency::USD).unwrap();
    let b = engine.create_account("b", dec!(0), Currency::EUR).unwrap();

    engine.deposit(a.id, dec!(5)).unwrap();
    engine.withdraw(a.id, dec!(5)).unwrap();
    engine.transfer(a.id, b.id, dec!(10)).unwrap();

    let actions: Vec<ActionKind> = engine.log().entries().iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            ActionKind::Create,
            ActionKind::Create,
            ActionKind::Deposit,
            ActionKind::Withdraw,
            ActionKind::Transfer,
        ]
    );
}

#[test]
fn test_failed_operations_are_not_logged() {
    let engine = LedgerEngine::new();
    assert!(engine.log().is_empty());

    let a = engine.create_account("a", dec!(10), Currency::USD).unwrap();
    let before = engine.log().len();

    let _ = engine.withdraw(a.id, dec!(50));
    let _ = engine.deposit(99, dec!(5));
    let _ = engine.deposit(a.id, dec!(-1));

    assert_eq!(engine.log().len(), before);
}

#[test]
fn test_log_file_receives_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.log");

    let config = LedgerConfig::new(Some(path.clone()));
    let engine = LedgerEngine::with_config(&config).unwrap();
    let a = engine.create_account("a", dec!(10), Currency::USD).unwrap();
    engine.deposit(a.id, dec!(5)).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("Deposit: Account 1: +5"));
}
