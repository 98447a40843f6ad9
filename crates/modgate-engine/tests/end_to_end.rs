//! End-to-end tests of the unlock/escrow lifecycle.
//!
//! These drive the engine through the in-memory collaborators and check
//! fund movement between the four parties (buyer, holding account, owner,
//! creator), the documented quirks, and conservation under random load.

use modgate_engine::UnlockEscrowEngine;
use modgate_ledger::{Clock, InMemoryLedger, InMemoryRegistry, ManualClock, TokenLedger};
use modgate_types::{
    constants, AccountId, EngineConfig, ModgateError, ModuleId, ModuleInfo, ReceiptKind,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

type Engine = UnlockEscrowEngine<InMemoryLedger, InMemoryRegistry, ManualClock>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test world: owner, holding account, one creator, funded buyers.
struct World {
    engine: Engine,
    owner: AccountId,
    holding: AccountId,
    creator: AccountId,
}

impl World {
    fn new() -> Self {
        init_tracing();
        let owner = AccountId::from("ST1OWNER");
        let holding = AccountId::from("ST1CONTRACT");
        let creator = AccountId::from("ST1CREATOR");
        let mut registry = InMemoryRegistry::new();
        registry.register(ModuleId(1), ModuleInfo::new(100, creator.clone()));
        registry.register(ModuleId(2), ModuleInfo::new(200, creator.clone()));
        let engine = UnlockEscrowEngine::new(
            EngineConfig::new(owner.clone(), holding.clone()),
            InMemoryLedger::new(),
            registry,
            ManualClock::new(100),
        )
        .expect("default config is valid");
        Self {
            engine,
            owner,
            holding,
            creator,
        }
    }

    fn buyer(&mut self, funds: u64) -> AccountId {
        let buyer = AccountId::random();
        self.engine.ledger_mut().mint(&buyer, funds);
        buyer
    }

    fn balance(&self, account: &AccountId) -> u64 {
        self.engine.ledger().balance_of(account)
    }
}

// =============================================================================
// Test: purchase → confirm with the default 5% fee
// =============================================================================
#[test]
fn e2e_purchase_and_confirm_splits_fee() {
    let mut w = World::new();
    let buyer = w.buyer(10_000);

    w.engine.unlock_module(&buyer, ModuleId(1), None).unwrap();
    assert_eq!(w.balance(&buyer), 9_900);
    assert_eq!(w.balance(&w.holding), 100);
    assert!(!w.engine.is_unlocked(&buyer, ModuleId(1)));

    let creator = w.creator.clone();
    w.engine
        .confirm_unlock(&creator, ModuleId(1), &buyer)
        .unwrap();

    assert_eq!(w.balance(&w.owner), 5);
    assert_eq!(w.balance(&w.creator), 95);
    assert_eq!(w.balance(&w.holding), 0);
    assert!(w.engine.is_unlocked(&buyer, ModuleId(1)));
    assert_eq!(w.engine.get_user_unlock_count(&buyer), 1);

    let kinds: Vec<_> = w.engine.receipts().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![ReceiptKind::EscrowOpened, ReceiptKind::UnlockGranted]);
    assert!(w.engine.receipts().iter().all(|r| r.verify_hash()));
}

// =============================================================================
// Test: refund round trip restores the buyer exactly
// =============================================================================
#[test]
fn e2e_refund_round_trip() {
    let mut w = World::new();
    let buyer = w.buyer(10_000);

    w.engine.unlock_module(&buyer, ModuleId(1), None).unwrap();

    let err = w.engine.refund_escrow(&buyer, ModuleId(1)).unwrap_err();
    assert_eq!(err.code(), 107);

    w.engine.clock().advance(86_401);
    w.engine.refund_escrow(&buyer, ModuleId(1)).unwrap();

    assert_eq!(w.balance(&buyer), 10_000);
    assert_eq!(w.balance(&w.holding), 0);
    assert!(w.engine.get_escrow_info(&buyer, ModuleId(1)).is_none());

    // The creator can no longer confirm.
    let creator = w.creator.clone();
    let err = w
        .engine
        .confirm_unlock(&creator, ModuleId(1), &buyer)
        .unwrap_err();
    assert!(matches!(err, ModgateError::NoEscrow { .. }));
}

// =============================================================================
// Test: batch of two modules debits 300 and opens both escrows
// =============================================================================
#[test]
fn e2e_batch_two_modules() {
    let mut w = World::new();
    let buyer = w.buyer(10_000);

    w.engine
        .batch_unlock(&buyer, &[ModuleId(1), ModuleId(2)], &[None, None])
        .unwrap();

    assert_eq!(w.balance(&buyer), 9_700);
    assert_eq!(w.balance(&w.holding), 300);
    assert_eq!(
        w.engine.get_escrow_info(&buyer, ModuleId(1)).unwrap().amount,
        100
    );
    assert_eq!(
        w.engine.get_escrow_info(&buyer, ModuleId(2)).unwrap().amount,
        200
    );
    assert_eq!(w.engine.open_escrow_total(), 300);
}

// =============================================================================
// Test: batch partial failure keeps earlier purchases
// =============================================================================
#[test]
fn e2e_batch_partial_failure_is_not_rolled_back() {
    let mut w = World::new();
    let buyer = w.buyer(250);

    // 100 succeeds, then 200 exceeds the remaining 150.
    let err = w
        .engine
        .batch_unlock(&buyer, &[ModuleId(1), ModuleId(2)], &[])
        .unwrap_err();
    assert!(matches!(
        err,
        ModgateError::InsufficientBalance {
            needed: 200,
            available: 150
        }
    ));
    assert_eq!(w.balance(&buyer), 150);
    assert!(w.engine.get_escrow_info(&buyer, ModuleId(1)).is_some());
    assert!(w.engine.get_escrow_info(&buyer, ModuleId(2)).is_none());
}

// =============================================================================
// Test: unlock cap reached → no balance mutation
// =============================================================================
#[test]
fn e2e_max_unlocks_blocks_purchase() {
    let mut w = World::new();
    let buyer = w.buyer(10_000);
    let owner = w.owner.clone();
    let creator = w.creator.clone();
    w.engine.set_max_user_unlocks(&owner, 1).unwrap();

    w.engine.unlock_module(&buyer, ModuleId(1), None).unwrap();
    w.engine
        .confirm_unlock(&creator, ModuleId(1), &buyer)
        .unwrap();

    let before = w.balance(&buyer);
    let err = w
        .engine
        .unlock_module(&buyer, ModuleId(2), None)
        .unwrap_err();
    assert!(matches!(err, ModgateError::MaxUnlocksExceeded { .. }));
    assert_eq!(w.balance(&buyer), before);
    assert!(w.engine.get_escrow_info(&buyer, ModuleId(2)).is_none());

    // Revoking frees a slot.
    w.engine
        .revoke_unlock(&creator, ModuleId(1), &buyer)
        .unwrap();
    w.engine.unlock_module(&buyer, ModuleId(2), None).unwrap();
}

// =============================================================================
// Test: revoked unlock cannot be extended
// =============================================================================
#[test]
fn e2e_extend_after_revoke_fails() {
    let mut w = World::new();
    let buyer = w.buyer(10_000);
    let creator = w.creator.clone();

    w.engine.unlock_module(&buyer, ModuleId(1), None).unwrap();
    w.engine
        .confirm_unlock(&creator, ModuleId(1), &buyer)
        .unwrap();
    w.engine.extend_unlock(&buyer, ModuleId(1), 1_000).unwrap();
    w.engine
        .revoke_unlock(&creator, ModuleId(1), &buyer)
        .unwrap();

    let err = w
        .engine
        .extend_unlock(&buyer, ModuleId(1), 1_000)
        .unwrap_err();
    assert!(matches!(err, ModgateError::InvalidStatus { .. }));
    assert_eq!(
        w.engine.get_unlock_info(&buyer, ModuleId(1)).unwrap().expiration,
        100 + constants::DEFAULT_EXPIRATION_WINDOW + 1_000
    );
}

// =============================================================================
// Test: pausing blocks purchases but not the rest of the lifecycle
// =============================================================================
#[test]
fn e2e_pause_only_blocks_purchases() {
    let mut w = World::new();
    let buyer = w.buyer(10_000);
    let owner = w.owner.clone();
    let creator = w.creator.clone();

    w.engine.unlock_module(&buyer, ModuleId(1), None).unwrap();
    w.engine.pause(&owner).unwrap();

    assert!(matches!(
        w.engine.unlock_module(&buyer, ModuleId(2), None),
        Err(ModgateError::Paused)
    ));
    assert!(matches!(
        w.engine.batch_unlock(&buyer, &[ModuleId(2)], &[]),
        Err(ModgateError::Paused)
    ));

    w.engine
        .confirm_unlock(&creator, ModuleId(1), &buyer)
        .unwrap();
    w.engine.extend_unlock(&buyer, ModuleId(1), 10).unwrap();

    w.engine.unpause(&owner).unwrap();
    w.engine.unlock_module(&buyer, ModuleId(2), None).unwrap();
}

// =============================================================================
// Test: queries are side-effect free
// =============================================================================
#[test]
fn e2e_queries_are_idempotent() {
    let mut w = World::new();
    let buyer = w.buyer(10_000);
    let creator = w.creator.clone();
    w.engine.unlock_module(&buyer, ModuleId(1), None).unwrap();
    w.engine
        .confirm_unlock(&creator, ModuleId(1), &buyer)
        .unwrap();

    let first = (
        w.engine.get_unlock_info(&buyer, ModuleId(1)),
        w.engine.get_escrow_info(&buyer, ModuleId(1)),
        w.engine.is_unlocked(&buyer, ModuleId(1)),
        w.engine.get_user_unlock_count(&buyer),
    );
    for _ in 0..5 {
        let again = (
            w.engine.get_unlock_info(&buyer, ModuleId(1)),
            w.engine.get_escrow_info(&buyer, ModuleId(1)),
            w.engine.is_unlocked(&buyer, ModuleId(1)),
            w.engine.get_user_unlock_count(&buyer),
        );
        assert_eq!(first, again);
    }
    assert_eq!(w.engine.receipts().len(), 2);
}

// =============================================================================
// Test: config loaded from JSON drives the engine
// =============================================================================
#[test]
fn e2e_engine_from_json_config() {
    init_tracing();
    let json = serde_json::json!({
        "owner": "ST1OWNER",
        "holding_account": "ST1CONTRACT",
        "platform_fee_rate": 10,
        "default_expiration_window": 1000
    })
    .to_string();
    let cfg = EngineConfig::from_json(&json).unwrap();

    let mut registry = InMemoryRegistry::new();
    registry.register(ModuleId(1), ModuleInfo::new(100, "ST1CREATOR"));
    let mut ledger = InMemoryLedger::new();
    let buyer = AccountId::from("ST1USER");
    ledger.mint(&buyer, 100);

    let mut engine = UnlockEscrowEngine::new(cfg, ledger, registry, ManualClock::new(5)).unwrap();
    engine.unlock_module(&buyer, ModuleId(1), None).unwrap();
    engine
        .confirm_unlock(&AccountId::from("ST1CREATOR"), ModuleId(1), &buyer)
        .unwrap();

    assert_eq!(engine.ledger().balance_of(&AccountId::from("ST1OWNER")), 10);
    assert_eq!(engine.ledger().balance_of(&AccountId::from("ST1CREATOR")), 90);
    assert_eq!(
        engine.get_unlock_info(&buyer, ModuleId(1)).unwrap().expiration,
        1_005
    );
}

// =============================================================================
// Test: random operation sequences conserve supply and keep escrow covered
// =============================================================================
#[test]
fn e2e_random_operations_conserve_funds() {
    let mut w = World::new();
    let mut rng = StdRng::seed_from_u64(0x6d67);
    let creator = w.creator.clone();
    let owner = w.owner.clone();
    let other_creator = AccountId::from("ST1OTHERCREATOR");
    w.engine
        .registry_mut()
        .register(ModuleId(3), ModuleInfo::new(37, other_creator.clone()));

    let buyers: Vec<AccountId> = (0..4).map(|_| w.buyer(1_000)).collect();
    let modules = [ModuleId(1), ModuleId(2), ModuleId(3)];
    let supply = w.engine.ledger().total_supply();

    for _ in 0..500 {
        let buyer = &buyers[rng.gen_range(0..buyers.len())];
        let module = modules[rng.gen_range(0..modules.len())];
        let module_creator = if module == ModuleId(3) {
            &other_creator
        } else {
            &creator
        };
        let before = w.engine.ledger().total_supply();

        let _ = match rng.gen_range(0..7) {
            0 => w.engine.unlock_module(buyer, module, None),
            1 => w.engine.confirm_unlock(module_creator, module, buyer),
            2 => w.engine.refund_escrow(buyer, module),
            3 => w.engine.revoke_unlock(module_creator, module, buyer),
            4 => w
                .engine
                .extend_unlock(buyer, module, rng.gen_range(0..=constants::MAX_EXPIRATION_WINDOW)),
            5 => w.engine.batch_unlock(buyer, &modules, &[]),
            _ => w
                .engine
                .set_platform_fee_rate(&owner, rng.gen_range(0..=12)),
        };
        w.engine.clock().advance(rng.gen_range(0..50_000));

        assert_eq!(w.engine.ledger().total_supply(), before);
        w.engine.verify_holding_balance().unwrap();

        for b in &buyers {
            let active = modules
                .iter()
                .filter(|m| {
                    w.engine
                        .get_unlock_info(b, **m)
                        .is_some_and(|rec| rec.active)
                })
                .count();
            let count = usize::try_from(w.engine.get_user_unlock_count(b)).unwrap();
            assert!(count <= active, "count {count} > active {active}");
        }
    }

    assert_eq!(w.engine.ledger().total_supply(), supply);
    assert!(w.engine.receipts().iter().all(|r| r.verify_hash()));
    assert!(w.engine.clock().now() >= 100);
}
