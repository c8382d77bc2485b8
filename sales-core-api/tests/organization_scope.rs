mod common;

use sales_core_api::{NewCustomer, ServiceError};
use sales_core_db::models::Role;

use common::TestContext;

#[tokio::test]
async fn test_manager_migrates_only_within_department() {
    let ctx = TestContext::new().await;
    let north = ctx.core.organization.create_zone(&ctx.admin, "North").await.unwrap();
    let alpha = ctx
        .core
        .organization
        .create_department(&ctx.admin, "Alpha", Some(north.id))
        .await
        .unwrap();
    let beta = ctx
        .core
        .organization
        .create_department(&ctx.admin, "Beta", Some(north.id))
        .await
        .unwrap();
    ctx.hire("alice", Role::SalesRepresentative, Some(&alpha)).await;
    let anna = ctx.hire("anna", Role::SalesRepresentative, Some(&alpha)).await;
    let dave = ctx.hire("dave", Role::SalesRepresentative, Some(&beta)).await;
    let maria = ctx.hire("maria", Role::SalesManager, Some(&alpha)).await;
    ctx.core
        .organization
        .set_department_manager(&ctx.admin, alpha.id, maria.id)
        .await
        .unwrap();

    let alice_scope = ctx.scope("alice").await;
    let maria_scope = ctx.scope("maria").await;
    let bob = ctx
        .core
        .leads
        .create_customer(&alice_scope, NewCustomer::new("Bob", "555-0100"))
        .await
        .unwrap();

    let err = ctx
        .core
        .leads
        .migrate_customer(&maria_scope, bob.id, Some(dave.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    let unchanged = ctx.store.snapshot().await.customers[&bob.id].clone();
    assert_eq!(unchanged, bob);

    let moved = ctx
        .core
        .leads
        .migrate_customer(&maria_scope, bob.id, Some(anna.id))
        .await
        .unwrap();
    assert_eq!(moved.saler_id, Some(anna.id));
    assert_eq!(moved.department_id, Some(alpha.id));

    // Representatives never reach migration at all
    let err = ctx
        .core
        .leads
        .migrate_customer(&alice_scope, bob.id, Some(anna.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_director_migrates_across_departments_of_own_zone() {
    let ctx = TestContext::new().await;
    let north = ctx.core.organization.create_zone(&ctx.admin, "North").await.unwrap();
    let south = ctx.core.organization.create_zone(&ctx.admin, "South").await.unwrap();
    let alpha = ctx
        .core
        .organization
        .create_department(&ctx.admin, "Alpha", Some(north.id))
        .await
        .unwrap();
    let beta = ctx
        .core
        .organization
        .create_department(&ctx.admin, "Beta", Some(north.id))
        .await
        .unwrap();
    let gamma = ctx
        .core
        .organization
        .create_department(&ctx.admin, "Gamma", Some(south.id))
        .await
        .unwrap();
    ctx.hire("alice", Role::SalesRepresentative, Some(&alpha)).await;
    let dave = ctx.hire("dave", Role::SalesRepresentative, Some(&beta)).await;
    let sam = ctx.hire("sam", Role::SalesRepresentative, Some(&gamma)).await;
    let diana = ctx.hire("diana", Role::SalesDirector, None).await;
    ctx.core
        .organization
        .place_user_in_zone(&ctx.admin, diana.id, north.id)
        .await
        .unwrap();

    let alice_scope = ctx.scope("alice").await;
    let diana_scope = ctx.scope("diana").await;
    let bob = ctx
        .core
        .leads
        .create_customer(&alice_scope, NewCustomer::new("Bob", "555-0100"))
        .await
        .unwrap();

    let moved = ctx
        .core
        .leads
        .migrate_customer(&diana_scope, bob.id, Some(dave.id))
        .await
        .unwrap();
    assert_eq!(moved.department_id, Some(beta.id));
    assert_eq!(moved.zone_id, Some(north.id));

    let err = ctx
        .core
        .leads
        .migrate_customer(&diana_scope, bob.id, Some(sam.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn test_place_department_in_zone_is_idempotent() {
    let ctx = TestContext::new().await;
    let north = ctx.core.organization.create_zone(&ctx.admin, "North").await.unwrap();
    let south = ctx.core.organization.create_zone(&ctx.admin, "South").await.unwrap();
    let alpha = ctx
        .core
        .organization
        .create_department(&ctx.admin, "Alpha", Some(north.id))
        .await
        .unwrap();
    let alice = ctx.hire("alice", Role::SalesRepresentative, Some(&alpha)).await;
    let alice_scope = ctx.scope("alice").await;
    let bob = ctx
        .core
        .leads
        .create_customer(&alice_scope, NewCustomer::new("Bob", "555-0100"))
        .await
        .unwrap();

    let logs_before = ctx.store.snapshot().await.system_logs.len();
    let first = ctx
        .core
        .organization
        .place_department_in_zone(&ctx.admin, alpha.id, south.id)
        .await
        .unwrap();
    let after_first = ctx.store.snapshot().await;
    let second = ctx
        .core
        .organization
        .place_department_in_zone(&ctx.admin, alpha.id, south.id)
        .await
        .unwrap();
    let after_second = ctx.store.snapshot().await;

    assert_eq!(first.zone_id, Some(south.id));
    assert_eq!(second.zone_id, first.zone_id);
    assert_eq!(
        after_second.departments[&alpha.id].zone_id,
        after_first.departments[&alpha.id].zone_id
    );
    assert_eq!(after_second.users[&alice.id].zone_id, Some(south.id));
    assert_eq!(after_second.customers[&bob.id].zone_id, Some(south.id));
    assert_eq!(after_second.system_logs.len(), logs_before + 2);
}

#[tokio::test]
async fn test_unknown_references_are_not_found() {
    let ctx = TestContext::new().await;
    let north = ctx.core.organization.create_zone(&ctx.admin, "North").await.unwrap();

    let err = ctx
        .core
        .organization
        .place_department_in_zone(&ctx.admin, uuid::Uuid::new_v4(), north.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let alice = ctx.hire("alice", Role::SalesRepresentative, None).await;
    let err = ctx
        .core
        .organization
        .set_zone_director(&ctx.admin, uuid::Uuid::new_v4(), alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_stale_token_role_is_rejected() {
    let ctx = TestContext::new().await;
    let alice = ctx.hire("alice", Role::SalesRepresentative, None).await;
    let outcome = ctx.core.identity.login("alice", common::PASSWORD).await.unwrap();

    ctx.core
        .identity
        .update_user_role(&ctx.admin, alice.id, Role::Accountant)
        .await
        .unwrap();
    let err = ctx.core.identity.authenticate(&outcome.token).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}
