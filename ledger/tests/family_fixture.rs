//! End-to-end scenario over the ledger facade: one family working through
//! the whole chore-and-reward cycle, checked against the expected final
//! balances and statuses.

use family_ledger::{FamilyLedger, LedgerConfig};
use shared::{
    AddChildRequest, AddRewardRequest, AddTaskRequest, RegisterParentRequest, RewardStatusView,
    Role, TaskStatusView,
};

const ALICE: &str = "0xalice";
const BOB: &str = "0xbob";
const GRACE: &str = "0xgrace";

fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

fn add_task(child: &str, description: &str, reward: u128, due_date: u64) -> AddTaskRequest {
    AddTaskRequest {
        child_address: child.to_string(),
        description: description.to_string(),
        reward,
        due_date,
    }
}

fn add_reward(child: &str, description: &str, price: u128) -> AddRewardRequest {
    AddRewardRequest {
        child_address: child.to_string(),
        description: description.to_string(),
        price,
    }
}

#[tokio::test]
async fn family_works_through_the_full_cycle() {
    let ledger = FamilyLedger::new(LedgerConfig::default());
    let yesterday = now() - 86_400;

    // Alice registers and enrols Bob and Grace.
    ledger
        .register_parent(ALICE, RegisterParentRequest { name: "Alice".into() })
        .await
        .unwrap();
    ledger
        .add_child(
            ALICE,
            AddChildRequest {
                child_address: BOB.into(),
                name: "Bob".into(),
            },
        )
        .await
        .unwrap();
    ledger
        .add_child(
            ALICE,
            AddChildRequest {
                child_address: GRACE.into(),
                name: "Grace".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(ledger.role_of(BOB).await.unwrap(), Role::Child);
    assert_eq!(ledger.get_profile(ALICE).await.unwrap().name, "Alice");

    // Task A for Grace, due yesterday: immediately expired.
    let task_a = ledger
        .add_task(ALICE, add_task(GRACE, "Bring the bin out", 3, yesterday))
        .await
        .unwrap()
        .task;
    assert_eq!(task_a.status, TaskStatusView::Expired);

    // Task B for Grace, no due date: completed, left waiting for approval.
    let task_b = ledger
        .add_task(ALICE, add_task(GRACE, "Help set the table for dinner", 2, 0))
        .await
        .unwrap()
        .task;
    ledger.complete_task(GRACE, task_b.id).await.unwrap();

    // Task C for Bob: completed and approved, crediting 20.
    let task_c = ledger
        .add_task(ALICE, add_task(BOB, "Clean your bedroom", 20, 0))
        .await
        .unwrap()
        .task;
    ledger.complete_task(BOB, task_c.id).await.unwrap();
    ledger.approve_task_completion(ALICE, task_c.id).await.unwrap();
    assert_eq!(ledger.balance_of(BOB).await.unwrap(), 20);

    // Reward 1 for Bob at 5: purchased (20 -> 15) and redeemed, unresolved.
    let reward_1 = ledger
        .add_reward(
            ALICE,
            add_reward(BOB, "Choose a special meal for the family to enjoy", 5),
        )
        .await
        .unwrap()
        .reward;
    ledger.purchase_reward(BOB, reward_1.id).await.unwrap();
    assert_eq!(ledger.balance_of(BOB).await.unwrap(), 15);
    ledger.redeem_reward(BOB, reward_1.id).await.unwrap();

    // Reward 2 for Bob at 10: purchased (15 -> 5), redeemed, approved.
    let reward_2 = ledger
        .add_reward(ALICE, add_reward(BOB, "Fun day out at the Zoo", 10))
        .await
        .unwrap()
        .reward;
    ledger.purchase_reward(BOB, reward_2.id).await.unwrap();
    ledger.redeem_reward(BOB, reward_2.id).await.unwrap();
    ledger
        .approve_reward_redemption(ALICE, reward_2.id)
        .await
        .unwrap();

    // Final balances and statuses.
    assert_eq!(ledger.balance_of(BOB).await.unwrap(), 5);
    assert_eq!(ledger.balance_of(GRACE).await.unwrap(), 0);

    let tasks = ledger.get_family_group_tasks(ALICE).await.unwrap().tasks;
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].status, TaskStatusView::Expired);
    assert_eq!(tasks[1].status, TaskStatusView::Completed);
    assert_eq!(tasks[2].status, TaskStatusView::Approved);

    let rewards = ledger.get_family_group_rewards(ALICE).await.unwrap().rewards;
    assert_eq!(rewards.len(), 2);
    assert_eq!(rewards[0].status, RewardStatusView::Redeemed);
    assert_eq!(rewards[1].status, RewardStatusView::Approved);

    // The family group summary agrees with the raw lists.
    let members = ledger.get_family_group(ALICE).await.unwrap().members;
    assert_eq!(members.len(), 2);
    let bob = members.iter().find(|m| m.address == BOB).unwrap();
    assert_eq!(bob.balance, 5);
    assert_eq!(bob.tasks_counter.approved, 1);
    assert_eq!(bob.tasks_counter.tokens_earned, 20);
    assert_eq!(bob.rewards_counter.redeemed, 1);
    assert_eq!(bob.rewards_counter.approved, 1);
    assert_eq!(bob.rewards_counter.tokens_spent, 15);
    let grace = members.iter().find(|m| m.address == GRACE).unwrap();
    assert_eq!(grace.tasks_counter.expired, 1);
    assert_eq!(grace.tasks_counter.completed, 1);

    // Children see only their own entries.
    let bob_tasks = ledger.get_child_tasks(BOB).await.unwrap().tasks;
    assert_eq!(bob_tasks.len(), 1);
    let grace_tasks = ledger.get_child_tasks(GRACE).await.unwrap().tasks;
    assert_eq!(grace_tasks.len(), 2);
    let bob_rewards = ledger.get_child_rewards(BOB).await.unwrap().rewards;
    assert_eq!(bob_rewards.len(), 2);

    // Token metadata is static configuration.
    assert_eq!(ledger.symbol(), "FCT");
    assert_eq!(ledger.decimals(), 18);
}

#[tokio::test]
async fn families_are_isolated_from_each_other() {
    let ledger = FamilyLedger::new(LedgerConfig::default());

    ledger
        .register_parent(ALICE, RegisterParentRequest { name: "Alice".into() })
        .await
        .unwrap();
    ledger
        .register_parent("0xdavid", RegisterParentRequest { name: "David".into() })
        .await
        .unwrap();
    ledger
        .add_child(
            ALICE,
            AddChildRequest {
                child_address: BOB.into(),
                name: "Bob".into(),
            },
        )
        .await
        .unwrap();
    ledger
        .add_child(
            "0xdavid",
            AddChildRequest {
                child_address: "0xcharlie".into(),
                name: "Charlie".into(),
            },
        )
        .await
        .unwrap();

    // David cannot assign work to Alice's child.
    let err = ledger
        .add_task("0xdavid", add_task(BOB, "Clean your bedroom", 5, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, family_ledger::LedgerError::NotFamilyMember(_)));

    // Nor approve a task in Alice's family.
    let task = ledger
        .add_task(ALICE, add_task(BOB, "Clean your bedroom", 5, 0))
        .await
        .unwrap()
        .task;
    ledger.complete_task(BOB, task.id).await.unwrap();
    let err = ledger
        .approve_task_completion("0xdavid", task.id)
        .await
        .unwrap_err();
    assert!(matches!(err, family_ledger::LedgerError::Unauthorized));

    // Each parent only sees their own family's entries.
    let davids = ledger.get_family_group_tasks("0xdavid").await.unwrap().tasks;
    assert!(davids.is_empty());
}
