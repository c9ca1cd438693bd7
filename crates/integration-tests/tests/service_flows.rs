//! Service-layer flows over the in-memory fakes: the same journeys the HTTP
//! handlers run, without the router or the database in the way.

use std::collections::HashMap;

use domains::{CreditRule, CreditRules, WordThreshold};
use services::critiques::{CritiqueLimits, NewCritique};
use services::ratings::NewRating;
use services::works::NewWork;
use services::{credits, critiques, iam, ratings, works, ServiceError};
use storage_adapters::{InMemoryStore, InMemoryUnitOfWork};

fn words(n: usize) -> String {
    "word ".repeat(n).trim().to_string()
}

fn rules() -> CreditRules {
    let group = |low: f64, high: f64| {
        vec![
            CreditRule {
                max_words: WordThreshold::Words(3000),
                credits: low,
            },
            CreditRule {
                max_words: WordThreshold::Max,
                credits: high,
            },
        ]
    };
    let mut bonuses = HashMap::new();
    bonuses.insert("new_member".to_string(), 2.0);
    CreditRules::new(group(3.0, 5.0), group(1.0, 2.5), bonuses).unwrap()
}

#[tokio::test]
async fn the_full_participation_journey_accrues_credits() {
    let shared = InMemoryStore::shared();
    let rules = rules();

    // registration, with the welcome bonus in the same scope
    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let author = iam::register_member(
        &mut uow.store.members,
        "alice",
        "alice@example.com",
        "Str0ng!pass",
        "Str0ng!pass",
    )
    .await
    .unwrap();
    credits::award_new_member_bonus(&mut uow.store.credits, &rules, author.id)
        .await
        .unwrap();
    let critic = iam::register_member(
        &mut uow.store.members,
        "bob",
        "bob@example.com",
        "Str0ng!pass",
        "Str0ng!pass",
    )
    .await
    .unwrap();
    uow.commit();

    // submission
    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let author_id = author.id.to_string();
    let work = works::add_work(
        &mut uow.store.works,
        8_000,
        NewWork {
            title: "The Lighthouse",
            content: &words(3500),
            member_id: &author_id,
            genre: "LITERARY",
            age_restriction: "NONE",
            work_id: None,
        },
    )
    .await
    .unwrap();
    iam::add_work_to_member(&mut uow.store.members, author.id, work.clone())
        .await
        .unwrap();
    credits::award_for_submission(&mut uow.store.credits, &rules, &work)
        .await
        .unwrap();
    uow.commit();

    // moderation, then the critique
    let mut uow = InMemoryUnitOfWork::begin(&shared);
    works::approve_work(&mut uow.store.works, work.id).await.unwrap();
    uow.commit();

    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let critic_id = critic.id.to_string();
    let work_id = work.id.to_string();
    let (about, body) = (words(20), words(40));
    let critique = critiques::add_critique(
        &mut uow.store.works,
        &mut uow.store.critiques,
        &CritiqueLimits::default(),
        NewCritique {
            about: &about,
            successes: &body,
            weaknesses: &body,
            ideas: &body,
            member_id: &critic_id,
            work_id: &work_id,
        },
    )
    .await
    .unwrap();
    credits::award_for_critique(&mut uow.store.credits, &rules, &critique)
        .await
        .unwrap();
    uow.commit();

    // the author rates the critique
    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let critique_id = critique.id.to_string();
    ratings::add_rating(
        &mut uow.store.critiques,
        &mut uow.store.ratings,
        NewRating {
            score: 4,
            comment: Some("useful"),
            critique_id: &critique_id,
            member_id: &author_id,
        },
    )
    .await
    .unwrap();
    uow.commit();

    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let author_balance = credits::balance_for_member(&mut uow.store.credits, author.id)
        .await
        .unwrap();
    let critic_balance = credits::balance_for_member(&mut uow.store.credits, critic.id)
        .await
        .unwrap();
    // welcome bonus + large-work award; the critic only wrote a small critique
    assert_eq!(author_balance, 7.0);
    assert_eq!(critic_balance, 1.0);

    let stored = works::get_work_by_id(&mut uow.store.works, work.id)
        .await
        .unwrap();
    assert_eq!(stored.critiques.len(), 1);
    assert_eq!(stored.critiques[0].ratings.len(), 1);
}

#[tokio::test]
async fn an_abandoned_scope_leaves_no_partial_writes() {
    let shared = InMemoryStore::shared();

    {
        let mut uow = InMemoryUnitOfWork::begin(&shared);
        iam::register_member(
            &mut uow.store.members,
            "alice",
            "alice@example.com",
            "Str0ng!pass",
            "Str0ng!pass",
        )
        .await
        .unwrap();
        // dropped without commit
    }

    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let err = iam::get_member_by_username(&mut uow.store.members, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_registration_is_refused_after_commit() {
    let shared = InMemoryStore::shared();

    let mut uow = InMemoryUnitOfWork::begin(&shared);
    iam::register_member(
        &mut uow.store.members,
        "alice",
        "alice@example.com",
        "Str0ng!pass",
        "Str0ng!pass",
    )
    .await
    .unwrap();
    uow.commit();

    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let err = iam::register_member(
        &mut uow.store.members,
        "alice",
        "other@example.com",
        "Str0ng!pass",
        "Str0ng!pass",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Duplicate(_)));
}

#[tokio::test]
async fn login_after_registration_round_trips() {
    let shared = InMemoryStore::shared();

    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let registered = iam::register_member(
        &mut uow.store.members,
        "alice",
        "alice@example.com",
        "Str0ng!pass",
        "Str0ng!pass",
    )
    .await
    .unwrap();
    uow.commit();

    let mut uow = InMemoryUnitOfWork::begin(&shared);
    let logged_in = iam::login_member(&mut uow.store.members, "alice@example.com", "Str0ng!pass")
        .await
        .unwrap();
    assert_eq!(logged_in.id, registered.id);
    assert!(logged_in.last_login >= registered.last_login);

    let err = iam::login_member(&mut uow.store.members, "alice@example.com", "Wr0ng!pass")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));
}
