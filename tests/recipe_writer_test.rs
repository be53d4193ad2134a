// ABOUTME: Integration tests for the recipe composite writer
// ABOUTME: Covers atomic create/update/delete, validation before persistence and short codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fs;

use common::{create_test_context, create_test_user, recipe_payload, seed_fixtures, TEST_IMAGE};
use foodgram_server::auth::AuthResult;
use foodgram_server::database::recipes::NewRecipe;
use foodgram_server::database::{RecipeIngredientsManager, RecipesManager};
use foodgram_server::errors::ErrorCode;
use foodgram_server::models::{IngredientSpec, MembershipKind, RecipePayload};
use foodgram_server::pagination::PageParams;
use foodgram_server::services::{memberships, recipes};

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_round_trips_through_view() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let payload = recipe_payload(
        "Pancakes",
        &[fx.breakfast.id, fx.dinner.id],
        &[(fx.flour.id, 200), (fx.milk.id, 300)],
    );
    let recipe = recipes::create_recipe(ctx.db(), ctx.images(), &fx.author_auth(), &payload)
        .await
        .unwrap();

    let view = recipes::get_recipe_view(ctx.db(), recipe.id, Some(fx.author.id))
        .await
        .unwrap();

    assert_eq!(view.name, "Pancakes");
    assert_eq!(view.cooking_time, 15);
    assert_eq!(view.author.id, fx.author.id);
    assert!(!view.author.is_subscribed);
    assert!(view.image.starts_with("/media/recipes/images/"));

    let mut tag_ids: Vec<i64> = view.tags.iter().map(|t| t.id).collect();
    tag_ids.sort_unstable();
    assert_eq!(tag_ids, vec![fx.breakfast.id, fx.dinner.id]);

    assert_eq!(view.ingredients.len(), 2);
    let flour = view.ingredients.iter().find(|i| i.id == fx.flour.id).unwrap();
    assert_eq!(flour.amount, 200);
    assert_eq!(flour.measurement_unit, "g");
    let milk = view.ingredients.iter().find(|i| i.id == fx.milk.id).unwrap();
    assert_eq!(milk.amount, 300);

    assert!(!view.is_favorited);
    assert!(!view.is_in_shopping_cart);
}

#[tokio::test]
async fn test_create_writes_image_file() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let payload = recipe_payload("Toast", &[fx.breakfast.id], &[(fx.flour.id, 50)]);
    let recipe = recipes::create_recipe(ctx.db(), ctx.images(), &fx.author_auth(), &payload)
        .await
        .unwrap();

    let relative = recipe.image.strip_prefix("/media/").unwrap();
    assert!(ctx.media_root.path().join(relative).exists());
}

#[tokio::test]
async fn test_create_assigns_unique_short_codes() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let mut codes = Vec::new();
    for i in 0..10 {
        let payload = recipe_payload(&format!("Dish {i}"), &[fx.dinner.id], &[(fx.sugar.id, i + 1)]);
        let recipe = recipes::create_recipe(ctx.db(), ctx.images(), &fx.author_auth(), &payload)
            .await
            .unwrap();
        assert_eq!(recipe.short_code.len(), 8);
        codes.push(recipe.short_code);
    }

    let mut unique = codes.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), codes.len());
}

#[tokio::test]
async fn test_create_rejects_unknown_account() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let ghost = AuthResult { user_id: 9_999 };
    let payload = recipe_payload("Ghost food", &[fx.dinner.id], &[(fx.flour.id, 1)]);
    let error = recipes::create_recipe(ctx.db(), ctx.images(), &ghost, &payload)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::AuthInvalid);
}

// ============================================================================
// Validation happens before anything is persisted
// ============================================================================

async fn assert_nothing_persisted(ctx: &common::TestContext) {
    let (rows, count) = ctx
        .db()
        .recipes()
        .list(&Default::default(), &PageParams::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(count, 0);

    let images_dir = ctx.media_root.path().join("recipes/images");
    let stored = fs::read_dir(&images_dir).map_or(0, Iterator::count);
    assert_eq!(stored, 0, "no image file may survive a rejected write");
}

#[tokio::test]
async fn test_duplicate_ingredient_rejected_without_writes() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let payload = recipe_payload(
        "Double flour",
        &[fx.breakfast.id],
        &[(fx.flour.id, 100), (fx.flour.id, 50)],
    );
    let error = recipes::create_recipe(ctx.db(), ctx.images(), &fx.author_auth(), &payload)
        .await
        .unwrap_err();

    assert_eq!(error.code.http_status(), 400);
    assert!(error.fields.contains_key("ingredients"));
    assert_nothing_persisted(&ctx).await;
}

#[tokio::test]
async fn test_every_invalid_field_reported_at_once() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let payload = RecipePayload {
        name: Some("   ".to_owned()),
        text: Some("Stir".to_owned()),
        cooking_time: Some(0),
        image: Some(TEST_IMAGE.to_owned()),
        tags: Some(vec![fx.breakfast.id, fx.breakfast.id]),
        ingredients: Some(vec![IngredientSpec {
            id: fx.flour.id,
            amount: 0,
        }]),
    };
    let error = recipes::create_recipe(ctx.db(), ctx.images(), &fx.author_auth(), &payload)
        .await
        .unwrap_err();

    for field in ["name", "cooking_time", "tags", "ingredients"] {
        assert!(error.fields.contains_key(field), "missing error for {field}");
    }
    assert!(!error.fields.contains_key("text"));
    assert_nothing_persisted(&ctx).await;
}

#[tokio::test]
async fn test_unknown_references_rejected_without_writes() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let payload = recipe_payload("Mystery", &[fx.breakfast.id, 4_242], &[(7_777, 1)]);
    let error = recipes::create_recipe(ctx.db(), ctx.images(), &fx.author_auth(), &payload)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    assert!(error.fields.contains_key("tags"));
    assert!(error.fields.contains_key("ingredients"));
    assert_nothing_persisted(&ctx).await;
}

#[tokio::test]
async fn test_missing_image_rejected_on_create() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let mut payload = recipe_payload("No picture", &[fx.dinner.id], &[(fx.milk.id, 10)]);
    payload.image = None;
    let error = recipes::create_recipe(ctx.db(), ctx.images(), &fx.author_auth(), &payload)
        .await
        .unwrap_err();

    assert!(error.fields.contains_key("image"));
    assert_nothing_persisted(&ctx).await;
}

// ============================================================================
// Atomicity
// ============================================================================

#[tokio::test]
async fn test_failed_ledger_write_rolls_back_recipe_row() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    {
        let mut guard = ctx.db().begin().await.unwrap();
        let conn = guard.executor().unwrap();

        let recipe = RecipesManager::insert(
            conn,
            &NewRecipe {
                author_id: fx.author.id,
                name: "Half written".to_owned(),
                text: "never visible".to_owned(),
                cooking_time: 5,
                image: "/media/recipes/images/none.png".to_owned(),
            },
        )
        .await
        .unwrap();
        RecipesManager::replace_tags(conn, recipe.id, &[fx.dinner.id])
            .await
            .unwrap();

        // Second entry for the same ingredient violates the ledger's uniqueness
        let specs = [
            IngredientSpec {
                id: fx.flour.id,
                amount: 1,
            },
            IngredientSpec {
                id: fx.flour.id,
                amount: 2,
            },
        ];
        let error = RecipeIngredientsManager::replace(conn, recipe.id, &specs)
            .await
            .unwrap_err();
        assert!(error.is_conflict());
        // Guard dropped without commit
    }

    assert_nothing_persisted(&ctx).await;
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_replaces_tags_and_ledger_wholesale() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let created = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        &recipe_payload(
            "Cake",
            &[fx.breakfast.id],
            &[(fx.flour.id, 100), (fx.sugar.id, 50)],
        ),
    )
    .await
    .unwrap();

    let update = RecipePayload {
        name: Some("Better cake".to_owned()),
        tags: Some(vec![fx.dinner.id]),
        ingredients: Some(vec![IngredientSpec {
            id: fx.milk.id,
            amount: 250,
        }]),
        ..Default::default()
    };
    let updated = recipes::update_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        created.id,
        &update,
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Better cake");
    assert_eq!(updated.text, created.text);
    assert_eq!(updated.cooking_time, created.cooking_time);
    assert_eq!(updated.image, created.image);
    assert_eq!(updated.short_code, created.short_code);

    let view = recipes::get_recipe_view(ctx.db(), created.id, None)
        .await
        .unwrap();
    let tag_ids: Vec<i64> = view.tags.iter().map(|t| t.id).collect();
    assert_eq!(tag_ids, vec![fx.dinner.id]);
    assert_eq!(view.ingredients.len(), 1);
    assert_eq!(view.ingredients[0].id, fx.milk.id);
    assert_eq!(view.ingredients[0].amount, 250);
}

#[tokio::test]
async fn test_update_requires_tags_and_ingredients() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let created = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        &recipe_payload("Soup", &[fx.dinner.id], &[(fx.milk.id, 500)]),
    )
    .await
    .unwrap();

    let update = RecipePayload {
        name: Some("Renamed soup".to_owned()),
        ..Default::default()
    };
    let error = recipes::update_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        created.id,
        &update,
    )
    .await
    .unwrap_err();

    assert!(error.fields.contains_key("tags"));
    assert!(error.fields.contains_key("ingredients"));

    let unchanged = ctx.db().recipes().require(created.id).await.unwrap();
    assert_eq!(unchanged.name, "Soup");
}

#[tokio::test]
async fn test_update_with_new_image_removes_old_file() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let created = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        &recipe_payload("Salad", &[fx.dinner.id], &[(fx.sugar.id, 5)]),
    )
    .await
    .unwrap();
    let old_path = ctx
        .media_root
        .path()
        .join(created.image.strip_prefix("/media/").unwrap());
    assert!(old_path.exists());

    let update = RecipePayload {
        image: Some(TEST_IMAGE.to_owned()),
        tags: Some(vec![fx.dinner.id]),
        ingredients: Some(vec![IngredientSpec {
            id: fx.sugar.id,
            amount: 6,
        }]),
        ..Default::default()
    };
    let updated = recipes::update_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        created.id,
        &update,
    )
    .await
    .unwrap();

    assert_ne!(updated.image, created.image);
    assert!(!old_path.exists());
}

#[tokio::test]
async fn test_only_author_may_update_or_delete() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let created = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        &recipe_payload("Private", &[fx.dinner.id], &[(fx.flour.id, 1)]),
    )
    .await
    .unwrap();

    let update = recipe_payload("Hijacked", &[fx.dinner.id], &[(fx.flour.id, 1)]);
    let error = recipes::update_recipe(
        ctx.db(),
        ctx.images(),
        &fx.reader_auth(),
        created.id,
        &update,
    )
    .await
    .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    let error = recipes::delete_recipe(ctx.db(), ctx.images(), &fx.reader_auth(), created.id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    assert!(ctx.db().recipes().get(created.id).await.unwrap().is_some());
}

// ============================================================================
// Delete and short links
// ============================================================================

#[tokio::test]
async fn test_delete_cascades_memberships() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let created = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        &recipe_payload("Short lived", &[fx.dinner.id], &[(fx.flour.id, 1)]),
    )
    .await
    .unwrap();
    memberships::add(ctx.db(), fx.reader.id, created.id, MembershipKind::ShoppingCart)
        .await
        .unwrap();

    recipes::delete_recipe(ctx.db(), ctx.images(), &fx.author_auth(), created.id)
        .await
        .unwrap();

    assert!(ctx.db().recipes().get(created.id).await.unwrap().is_none());
    let items = ctx
        .db()
        .recipe_ingredients()
        .cart_totals(fx.reader.id)
        .await
        .unwrap();
    assert!(items.is_empty());

    let error = recipes::get_recipe_view(ctx.db(), created.id, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_short_code_resolves_to_recipe_page() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let created = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        &recipe_payload("Linked", &[fx.dinner.id], &[(fx.flour.id, 1)]),
    )
    .await
    .unwrap();

    let link = recipes::short_link(ctx.db(), "https://foodgram.test", created.id)
        .await
        .unwrap();
    assert_eq!(link, format!("https://foodgram.test/s/{}", created.short_code));

    let path = recipes::resolve_short_code(ctx.db(), &created.short_code)
        .await
        .unwrap();
    assert_eq!(path, format!("/recipes/{}", created.id));

    let error = recipes::resolve_short_code(ctx.db(), "nope")
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_filters_by_author_tag_and_membership() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();
    let other = create_test_user(ctx.db(), "other").await.unwrap();
    let other_auth = AuthResult { user_id: other.id };

    let porridge = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &fx.author_auth(),
        &recipe_payload("Porridge", &[fx.breakfast.id], &[(fx.milk.id, 200)]),
    )
    .await
    .unwrap();
    let stew = recipes::create_recipe(
        ctx.db(),
        ctx.images(),
        &other_auth,
        &recipe_payload("Stew", &[fx.dinner.id], &[(fx.flour.id, 20)]),
    )
    .await
    .unwrap();
    memberships::add(ctx.db(), fx.reader.id, stew.id, MembershipKind::Favorite)
        .await
        .unwrap();

    let params = PageParams::default();

    let all = recipes::list_recipes(
        ctx.db(),
        &recipes::build_filter(None, Vec::new(), false, false, None),
        &params,
        None,
        "/api/recipes/",
    )
    .await
    .unwrap();
    assert_eq!(all.count, 2);
    // Newest first
    assert_eq!(all.results[0].id, stew.id);

    let by_author = recipes::list_recipes(
        ctx.db(),
        &recipes::build_filter(Some(fx.author.id), Vec::new(), false, false, None),
        &params,
        None,
        "/api/recipes/",
    )
    .await
    .unwrap();
    assert_eq!(by_author.count, 1);
    assert_eq!(by_author.results[0].id, porridge.id);

    let by_tag = recipes::list_recipes(
        ctx.db(),
        &recipes::build_filter(None, vec!["dinner".to_owned()], false, false, None),
        &params,
        None,
        "/api/recipes/",
    )
    .await
    .unwrap();
    assert_eq!(by_tag.count, 1);
    assert_eq!(by_tag.results[0].id, stew.id);

    let favorites = recipes::list_recipes(
        ctx.db(),
        &recipes::build_filter(None, Vec::new(), true, false, Some(fx.reader.id)),
        &params,
        Some(fx.reader.id),
        "/api/recipes/",
    )
    .await
    .unwrap();
    assert_eq!(favorites.count, 1);
    assert!(favorites.results[0].is_favorited);

    // Anonymous viewers cannot narrow by membership
    let anonymous = recipes::list_recipes(
        ctx.db(),
        &recipes::build_filter(None, Vec::new(), true, true, None),
        &params,
        None,
        "/api/recipes/",
    )
    .await
    .unwrap();
    assert_eq!(anonymous.count, 2);
}

#[tokio::test]
async fn test_list_orders_by_creation_time() {
    let ctx = create_test_context().await.unwrap();
    let fx = seed_fixtures(ctx.db()).await.unwrap();

    let mut ids = Vec::new();
    for name in ["First", "Second", "Third"] {
        let view = recipes::create_recipe(
            ctx.db(),
            ctx.images(),
            &fx.author_auth(),
            &recipe_payload(name, &[fx.dinner.id], &[(fx.flour.id, 1)]),
        )
        .await
        .unwrap();
        ids.push(view.id);
    }

    // Backdate the newest row so creation time and id disagree
    sqlx::query("UPDATE recipes SET created_at = $1 WHERE id = $2")
        .bind("2020-01-01T00:00:00.000000Z")
        .bind(ids[2])
        .execute(ctx.db().pool())
        .await
        .unwrap();

    let page = recipes::list_recipes(
        ctx.db(),
        &recipes::build_filter(None, Vec::new(), false, false, None),
        &PageParams::default(),
        None,
        "/api/recipes/",
    )
    .await
    .unwrap();
    let listed: Vec<i64> = page.results.iter().map(|recipe| recipe.id).collect();
    assert_eq!(listed, vec![ids[1], ids[0], ids[2]]);

    let by_author = ctx.db().recipes().by_author(fx.author.id, None).await.unwrap();
    let listed: Vec<i64> = by_author.iter().map(|recipe| recipe.id).collect();
    assert_eq!(listed, vec![ids[1], ids[0], ids[2]]);
}
