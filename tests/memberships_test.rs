// ABOUTME: Integration tests for favorite and shopping-cart memberships
// ABOUTME: Duplicate adds conflict, removing an absent entry fails, kinds are independent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_context, recipe_payload, seed_fixtures, Fixtures, TestContext};
use foodgram_server::errors::ErrorCode;
use foodgram_server::models::{MembershipKind, Recipe};
use foodgram_server::services::{memberships, recipes};

async fn setup() -> (TestContext, Fixtures, Recipe) {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();
    let recipe = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        &recipe_payload("Omelette", &[fx.breakfast.id], &[(fx.milk.id, 50)]),
    )
    .await
    .unwrap();
    (ctx, fx, recipe)
}

#[tokio::test]
async fn test_add_returns_summary_and_sets_flag() {
    let (ctx, fx, recipe) = setup().await;

    let summary = memberships::add(ctx.db(), fx.reader.id, recipe.id, MembershipKind::Favorite)
        .await
        .unwrap();
    assert_eq!(summary.id, recipe.id);
    assert_eq!(summary.name, "Omelette");
    assert_eq!(summary.image, recipe.image);
    assert_eq!(summary.cooking_time, recipe.cooking_time);

    let view = recipes::get_recipe_view(ctx.db(), recipe.id, Some(fx.reader.id))
        .await
        .unwrap();
    assert!(view.is_favorited);
    assert!(!view.is_in_shopping_cart);

    // Flags are per viewer
    let author_view = recipes::get_recipe_view(ctx.db(), recipe.id, Some(fx.author.id))
        .await
        .unwrap();
    assert!(!author_view.is_favorited);
}

#[tokio::test]
async fn test_duplicate_add_conflicts() {
    let (ctx, fx, recipe) = setup().await;

    memberships::add(ctx.db(), fx.reader.id, recipe.id, MembershipKind::ShoppingCart)
        .await
        .unwrap();
    let error = memberships::add(ctx.db(), fx.reader.id, recipe.id, MembershipKind::ShoppingCart)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(error.code.http_status(), 409);
}

#[tokio::test]
async fn test_kinds_are_independent() {
    let (ctx, fx, recipe) = setup().await;

    memberships::add(ctx.db(), fx.reader.id, recipe.id, MembershipKind::Favorite)
        .await
        .unwrap();
    memberships::add(ctx.db(), fx.reader.id, recipe.id, MembershipKind::ShoppingCart)
        .await
        .unwrap();

    memberships::remove(ctx.db(), fx.reader.id, recipe.id, MembershipKind::Favorite)
        .await
        .unwrap();

    let view = recipes::get_recipe_view(ctx.db(), recipe.id, Some(fx.reader.id))
        .await
        .unwrap();
    assert!(!view.is_favorited);
    assert!(view.is_in_shopping_cart);
}

#[tokio::test]
async fn test_remove_absent_fails() {
    let (ctx, fx, recipe) = setup().await;

    let error = memberships::remove(ctx.db(), fx.reader.id, recipe.id, MembershipKind::Favorite)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found() {
    let (ctx, fx, _recipe) = setup().await;

    let error = memberships::add(ctx.db(), fx.reader.id, 123_456, MembershipKind::Favorite)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    let error = memberships::remove(ctx.db(), fx.reader.id, 123_456, MembershipKind::ShoppingCart)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_concurrent_adds_leave_one_row() {
    let (ctx, fx, recipe) = setup().await;

    let db_a = ctx.db().clone();
    let db_b = ctx.db().clone();
    let user_id = fx.reader.id;
    let recipe_id = recipe.id;

    let first = tokio::spawn(async move {
        memberships::add(&db_a, user_id, recipe_id, MembershipKind::Favorite).await
    });
    let second = tokio::spawn(async move {
        memberships::add(&db_b, user_id, recipe_id, MembershipKind::Favorite).await
    });
    let results = [first.await.unwrap(), second.await.unwrap()];

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    let failure = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert_eq!(failure.code, ErrorCode::ResourceAlreadyExists);

    let rows = ctx
        .db()
        .memberships()
        .count(user_id, recipe_id, MembershipKind::Favorite)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_storage_rejects_duplicate_membership() {
    let (ctx, fx, recipe) = setup().await;
    let memberships = ctx.db().memberships();

    memberships
        .add(fx.reader.id, recipe.id, MembershipKind::ShoppingCart)
        .await
        .unwrap();
    let error = memberships
        .add(fx.reader.id, recipe.id, MembershipKind::ShoppingCart)
        .await
        .unwrap_err();
    assert!(error.is_conflict());

    // The other kind is a separate row
    memberships
        .add(fx.reader.id, recipe.id, MembershipKind::Favorite)
        .await
        .unwrap();
    let rows = memberships
        .count(fx.reader.id, recipe.id, MembershipKind::ShoppingCart)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
