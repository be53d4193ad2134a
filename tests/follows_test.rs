// ABOUTME: Integration tests for follow relationships and follow-views
// ABOUTME: Self-follows and duplicates are rejected; recipe previews honor recipes_limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_context, create_test_user, recipe_payload, seed_fixtures};
use foodgram_server::errors::ErrorCode;
use foodgram_server::pagination::PageParams;
use foodgram_server::services::{follows, recipes, users};

#[tokio::test]
async fn test_follow_returns_view_with_limited_recipes() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    for name in ["One", "Two", "Three"] {
        recipes::create_recipe(
            ctx.db(),
            ctx.images(),
            &fx.author_auth(),
            &recipe_payload(name, &[fx.dinner.id], &[(fx.flour.id, 10)]),
        )
        .await
        .unwrap();
    }

    let view = follows::follow(ctx.db(), fx.reader.id, fx.author.id, Some(2))
        .await
        .unwrap();

    assert_eq!(view.user.id, fx.author.id);
    assert!(view.user.is_subscribed);
    assert_eq!(view.recipes.len(), 2);
    assert_eq!(view.recipes_count, 3);

    let author_view = users::user_view(ctx.db(), fx.author.id, Some(fx.reader.id))
        .await
        .unwrap();
    assert!(author_view.is_subscribed);
    let anonymous_view = users::user_view(ctx.db(), fx.author.id, None).await.unwrap();
    assert!(!anonymous_view.is_subscribed);
}

#[tokio::test]
async fn test_self_follow_rejected() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let error = follows::follow(ctx.db(), fx.reader.id, fx.reader.id, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(!ctx.db().follows().exists(fx.reader.id, fx.reader.id).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_follow_conflicts() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    follows::follow(ctx.db(), fx.reader.id, fx.author.id, None)
        .await
        .unwrap();
    let error = follows::follow(ctx.db(), fx.reader.id, fx.author.id, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceAlreadyExists);
}

#[tokio::test]
async fn test_follow_unknown_user_not_found() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let error = follows::follow(ctx.db(), fx.reader.id, 99_999, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_unfollow() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let error = follows::unfollow(ctx.db(), fx.reader.id, fx.author.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    follows::follow(ctx.db(), fx.reader.id, fx.author.id, None)
        .await
        .unwrap();
    follows::unfollow(ctx.db(), fx.reader.id, fx.author.id)
        .await
        .unwrap();
    assert!(!ctx.db().follows().exists(fx.reader.id, fx.author.id).await.unwrap());
}

#[tokio::test]
async fn test_subscriptions_paginated() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let mut followed = vec![fx.author.id];
    for name in ["cook1", "cook2"] {
        followed.push(create_test_user(ctx.db(), name).await.unwrap().id);
    }
    for target in &followed {
        follows::follow(ctx.db(), fx.reader.id, *target, None)
            .await
            .unwrap();
    }

    let params = PageParams::new(1, 2);
    let page = follows::subscriptions(
        ctx.db(),
        fx.reader.id,
        &params,
        None,
        "/api/users/subscriptions/",
    )
    .await
    .unwrap();

    assert_eq!(page.count, 3);
    assert_eq!(page.results.len(), 2);
    assert!(page.next.is_some());
    assert!(page.previous.is_none());
    assert!(page.results.iter().all(|view| view.user.is_subscribed));

    // The author follows nobody
    let empty = follows::subscriptions(
        ctx.db(),
        fx.author.id,
        &PageParams::default(),
        None,
        "/api/users/subscriptions/",
    )
    .await
    .unwrap();
    assert_eq!(empty.count, 0);
    assert!(empty.results.is_empty());
}

#[tokio::test]
async fn test_storage_rejects_duplicate_and_self_follow() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();
    let follows = ctx.db().follows();

    follows.add(fx.reader.id, fx.author.id).await.unwrap();
    let error = follows.add(fx.reader.id, fx.author.id).await.unwrap_err();
    assert!(error.is_conflict());

    let error = follows.add(fx.reader.id, fx.reader.id).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);

    assert!(follows.exists(fx.reader.id, fx.author.id).await.unwrap());
    assert!(!follows.exists(fx.author.id, fx.reader.id).await.unwrap());
}
