// ABOUTME: Recipe composite writer: validation, atomic persistence and read-view assembly
// ABOUTME: A recipe, its tag links and its ingredient ledger are written in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Recipe Composite Writer
//!
//! Create and update follow the same pipeline:
//!
//! 1. validate every field and collect all problems into one field-keyed error
//! 2. check that every referenced tag and ingredient exists
//! 3. store the uploaded image (outside the transaction, removed again on failure)
//! 4. in one transaction: write the recipe row, replace its tag links, replace its ledger
//!
//! Nothing is persisted when any step fails, and an update replaces tags and ingredients
//! wholesale. The short code is drawn once, on insert.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::auth::AuthResult;
use crate::constants::limits::{
    MAX_RECIPE_NAME_LENGTH, MIN_COOKING_TIME_MINUTES, MIN_INGREDIENT_AMOUNT,
};
use crate::constants::messages::{
    AMOUNT_TOO_SMALL, COOKING_TIME_REQUIRED, COOKING_TIME_TOO_SHORT, DUPLICATE_INGREDIENT,
    DUPLICATE_TAGS, EMPTY_INGREDIENTS, EMPTY_TAGS, IMAGE_REQUIRED,
    INGREDIENTS_REQUIRED_FOR_UPDATE, NAME_REQUIRED, NAME_TOO_LONG, TAGS_REQUIRED_FOR_UPDATE,
    TEXT_REQUIRED, UNKNOWN_INGREDIENT, UNKNOWN_TAG,
};
use crate::database::recipes::{NewRecipe, RecipeChanges};
use crate::database::{Database, RecipeIngredientsManager, RecipesManager};
use crate::errors::{AppError, AppResult, ErrorCode, ValidationErrors};
use crate::images::{discard_image, ImageKind, ImageStore};
use crate::models::{IngredientSpec, Recipe, RecipeFilter, RecipePayload, RecipeView};
use crate::pagination::{Page, PageParams};
use crate::permissions::ensure_author;
use crate::services::users::{require_caller, user_view};
use crate::short_links::{recipe_page_path, short_link_url};

/// Which contract a payload is validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Every field is required
    Create,
    /// Scalar fields are optional, tags and ingredients are required
    Update,
}

/// A payload that passed validation
///
/// Scalar fields are `None` only on update, where they keep the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecipe {
    /// Trimmed title
    pub name: Option<String>,
    /// Description
    pub text: Option<String>,
    /// Cooking time in minutes
    pub cooking_time: Option<i64>,
    /// Image data URL to store
    pub image: Option<String>,
    /// Tag ids, in submission order
    pub tags: Vec<i64>,
    /// Ingredient specs, in submission order
    pub ingredients: Vec<IngredientSpec>,
}

/// Validate a recipe payload, reporting every invalid field at once
///
/// # Errors
///
/// Returns a validation error whose field map holds every problem found
pub fn validate_payload(payload: &RecipePayload, mode: WriteMode) -> AppResult<ValidatedRecipe> {
    let mut errors = ValidationErrors::new();
    let creating = mode == WriteMode::Create;

    let name = check_name(&mut errors, payload.name.as_deref(), creating);
    let text = check_text(&mut errors, payload.text.as_deref(), creating);
    check_cooking_time(&mut errors, payload.cooking_time, creating);
    let image = check_image(&mut errors, payload.image.as_deref(), creating);
    let tags = check_tags(&mut errors, payload.tags.as_deref(), mode);
    let ingredients = check_ingredients(&mut errors, payload.ingredients.as_deref(), mode);

    errors.into_result()?;

    Ok(ValidatedRecipe {
        name,
        text,
        cooking_time: payload.cooking_time,
        image,
        tags,
        ingredients,
    })
}

fn check_name(errors: &mut ValidationErrors, name: Option<&str>, creating: bool) -> Option<String> {
    match name.map(str::trim) {
        Some("") => errors.add("name", NAME_REQUIRED),
        Some(name) if name.chars().count() > MAX_RECIPE_NAME_LENGTH => {
            errors.add("name", NAME_TOO_LONG);
        }
        Some(name) => return Some(name.to_owned()),
        None if creating => errors.missing("name", NAME_REQUIRED),
        None => {}
    }
    None
}

fn check_text(errors: &mut ValidationErrors, text: Option<&str>, creating: bool) -> Option<String> {
    match text {
        Some(text) if text.trim().is_empty() => errors.add("text", TEXT_REQUIRED),
        Some(text) => return Some(text.to_owned()),
        None if creating => errors.missing("text", TEXT_REQUIRED),
        None => {}
    }
    None
}

fn check_cooking_time(errors: &mut ValidationErrors, minutes: Option<i64>, creating: bool) {
    match minutes {
        Some(minutes) if minutes < MIN_COOKING_TIME_MINUTES => {
            errors.add("cooking_time", COOKING_TIME_TOO_SHORT);
        }
        Some(_) => {}
        None if creating => errors.missing("cooking_time", COOKING_TIME_REQUIRED),
        None => {}
    }
}

fn check_image(errors: &mut ValidationErrors, image: Option<&str>, creating: bool) -> Option<String> {
    match image.map(str::trim) {
        Some("") => errors.add("image", IMAGE_REQUIRED),
        Some(image) => return Some(image.to_owned()),
        None if creating => errors.missing("image", IMAGE_REQUIRED),
        None => {}
    }
    None
}

fn check_tags(errors: &mut ValidationErrors, tags: Option<&[i64]>, mode: WriteMode) -> Vec<i64> {
    let Some(tags) = tags else {
        match mode {
            WriteMode::Create => errors.missing("tags", EMPTY_TAGS),
            WriteMode::Update => errors.missing("tags", TAGS_REQUIRED_FOR_UPDATE),
        }
        return Vec::new();
    };

    if tags.is_empty() {
        errors.add("tags", EMPTY_TAGS);
    } else if has_duplicates(tags.iter().copied()) {
        errors.add("tags", DUPLICATE_TAGS);
    }
    tags.to_vec()
}

fn check_ingredients(
    errors: &mut ValidationErrors,
    specs: Option<&[IngredientSpec]>,
    mode: WriteMode,
) -> Vec<IngredientSpec> {
    let Some(specs) = specs else {
        match mode {
            WriteMode::Create => errors.missing("ingredients", EMPTY_INGREDIENTS),
            WriteMode::Update => errors.missing("ingredients", INGREDIENTS_REQUIRED_FOR_UPDATE),
        }
        return Vec::new();
    };

    if specs.is_empty() {
        errors.add("ingredients", EMPTY_INGREDIENTS);
    } else if has_duplicates(specs.iter().map(|spec| spec.id)) {
        errors.add("ingredients", DUPLICATE_INGREDIENT);
    }
    if specs.iter().any(|spec| spec.amount < MIN_INGREDIENT_AMOUNT) {
        errors.add("ingredients", AMOUNT_TOO_SMALL);
    }
    specs.to_vec()
}

fn has_duplicates(mut ids: impl Iterator<Item = i64>) -> bool {
    let mut seen = HashSet::new();
    ids.any(|id| !seen.insert(id))
}

/// Fail with 404 when a referenced tag or ingredient does not exist
///
/// # Errors
///
/// Returns `ResourceNotFound` listing every unknown id under its field
pub async fn ensure_references_exist(db: &Database, recipe: &ValidatedRecipe) -> AppResult<()> {
    let known_tags = db.tags().existing_ids(&recipe.tags).await?;
    let ingredient_ids: Vec<i64> = recipe.ingredients.iter().map(|spec| spec.id).collect();
    let known_ingredients = db.ingredients().existing_ids(&ingredient_ids).await?;

    let mut error: Option<AppError> = None;
    for id in recipe.tags.iter().filter(|id| !known_tags.contains(id)) {
        error = Some(
            error
                .unwrap_or_else(|| AppError::new(ErrorCode::ResourceNotFound, UNKNOWN_TAG))
                .with_field("tags", format!("{UNKNOWN_TAG} {id}")),
        );
    }
    for id in ingredient_ids.iter().filter(|id| !known_ingredients.contains(id)) {
        error = Some(
            error
                .unwrap_or_else(|| AppError::new(ErrorCode::ResourceNotFound, UNKNOWN_INGREDIENT))
                .with_field("ingredients", format!("{UNKNOWN_INGREDIENT} {id}")),
        );
    }

    error.map_or(Ok(()), Err)
}

/// Create a recipe with its tags and ingredient ledger
///
/// # Errors
///
/// Returns a validation error for an invalid payload, `ResourceNotFound` for unknown tags or
/// ingredients, `AuthInvalid` if the caller's account is gone, or a storage error. Nothing is
/// persisted on failure.
pub async fn create_recipe(
    db: &Database,
    images: &dyn ImageStore,
    caller: &AuthResult,
    payload: &RecipePayload,
) -> AppResult<Recipe> {
    require_caller(db, caller).await?;
    let validated = validate_payload(payload, WriteMode::Create)?;
    ensure_references_exist(db, &validated).await?;

    let image_payload = validated
        .image
        .as_deref()
        .ok_or_else(|| AppError::missing_field("image", IMAGE_REQUIRED))?;
    let image = images.store(ImageKind::Recipe, image_payload).await?;

    let new_recipe = NewRecipe {
        author_id: caller.user_id,
        name: validated.name.clone().unwrap_or_default(),
        text: validated.text.clone().unwrap_or_default(),
        cooking_time: validated.cooking_time.unwrap_or(MIN_COOKING_TIME_MINUTES),
        image: image.clone(),
    };

    match write_new_recipe(db, &new_recipe, &validated).await {
        Ok(recipe) => {
            info!(
                user.id = caller.user_id,
                recipe.id = recipe.id,
                tags = validated.tags.len(),
                ingredients = validated.ingredients.len(),
                "Recipe created"
            );
            Ok(recipe)
        }
        Err(e) => {
            discard_image(images, &image).await;
            Err(e)
        }
    }
}

async fn write_new_recipe(
    db: &Database,
    new_recipe: &NewRecipe,
    validated: &ValidatedRecipe,
) -> AppResult<Recipe> {
    let mut guard = db.begin().await?;
    let conn = guard.executor()?;

    let recipe = RecipesManager::insert(conn, new_recipe).await?;
    RecipesManager::replace_tags(conn, recipe.id, &validated.tags).await?;
    RecipeIngredientsManager::replace(conn, recipe.id, &validated.ingredients).await?;

    guard.commit().await?;
    Ok(recipe)
}

/// Update a recipe, replacing its tags and ingredient ledger in full
///
/// The short code is left untouched. A replaced image is deleted after the commit.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown recipe, `PermissionDenied` if the caller is not
/// the author, a validation error for an invalid payload, or a storage error
pub async fn update_recipe(
    db: &Database,
    images: &dyn ImageStore,
    caller: &AuthResult,
    recipe_id: i64,
    payload: &RecipePayload,
) -> AppResult<Recipe> {
    let existing = db.recipes().require(recipe_id).await?;
    ensure_author(caller, &existing)?;

    let validated = validate_payload(payload, WriteMode::Update)?;
    ensure_references_exist(db, &validated).await?;

    let new_image = match validated.image.as_deref() {
        Some(payload) => Some(images.store(ImageKind::Recipe, payload).await?),
        None => None,
    };

    let changes = RecipeChanges {
        name: validated.name.clone(),
        text: validated.text.clone(),
        cooking_time: validated.cooking_time,
        image: new_image.clone(),
    };

    if let Err(e) = write_recipe_changes(db, recipe_id, &changes, &validated).await {
        if let Some(image) = &new_image {
            discard_image(images, image).await;
        }
        return Err(e);
    }

    if new_image.is_some() {
        discard_image(images, &existing.image).await;
    }

    info!(
        user.id = caller.user_id,
        recipe.id = recipe_id,
        tags = validated.tags.len(),
        ingredients = validated.ingredients.len(),
        "Recipe updated"
    );

    db.recipes().require(recipe_id).await
}

async fn write_recipe_changes(
    db: &Database,
    recipe_id: i64,
    changes: &RecipeChanges,
    validated: &ValidatedRecipe,
) -> AppResult<()> {
    let mut guard = db.begin().await?;
    let conn = guard.executor()?;

    RecipesManager::update(conn, recipe_id, changes).await?;
    RecipesManager::replace_tags(conn, recipe_id, &validated.tags).await?;
    RecipeIngredientsManager::replace(conn, recipe_id, &validated.ingredients).await?;

    guard.commit().await
}

/// Delete a recipe; its ledger, tag links and memberships cascade
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown recipe or `PermissionDenied` for a non-author
pub async fn delete_recipe(
    db: &Database,
    images: &dyn ImageStore,
    caller: &AuthResult,
    recipe_id: i64,
) -> AppResult<()> {
    let recipe = db.recipes().require(recipe_id).await?;
    ensure_author(caller, &recipe)?;

    if !db.recipes().delete(recipe_id).await? {
        return Err(AppError::not_found(format!("Recipe {recipe_id}")));
    }
    discard_image(images, &recipe.image).await;

    info!(user.id = caller.user_id, recipe.id = recipe_id, "Recipe deleted");
    Ok(())
}

/// Render a recipe for a viewer
///
/// The favorite and cart flags and the author's `is_subscribed` are computed for `viewer`
/// on every call and are all `false` for anonymous viewers.
///
/// # Errors
///
/// Returns an error if any of the lookups fails
pub async fn recipe_view(
    db: &Database,
    recipe: Recipe,
    viewer: Option<i64>,
) -> AppResult<RecipeView> {
    let author = user_view(db, recipe.author_id, viewer).await?;
    let tags = db.tags().for_recipe(recipe.id).await?;
    let ingredients = db.recipe_ingredients().for_recipe(recipe.id).await?;
    let flags = match viewer {
        Some(user_id) => db.memberships().flags(user_id, recipe.id).await?,
        None => Default::default(),
    };

    Ok(RecipeView {
        id: recipe.id,
        tags,
        author,
        ingredients,
        is_favorited: flags.is_favorited,
        is_in_shopping_cart: flags.is_in_shopping_cart,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
    })
}

/// Load a recipe by id and render it for a viewer
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown recipe
pub async fn get_recipe_view(
    db: &Database,
    recipe_id: i64,
    viewer: Option<i64>,
) -> AppResult<RecipeView> {
    let recipe = db.recipes().require(recipe_id).await?;
    recipe_view(db, recipe, viewer).await
}

/// Build a listing filter from query flags
///
/// The favorite and cart flags only narrow the listing for an identified viewer.
#[must_use]
pub fn build_filter(
    author_id: Option<i64>,
    tag_slugs: Vec<String>,
    is_favorited: bool,
    is_in_shopping_cart: bool,
    viewer: Option<i64>,
) -> RecipeFilter {
    RecipeFilter {
        author_id,
        tag_slugs,
        favorited_by: viewer.filter(|_| is_favorited),
        in_cart_of: viewer.filter(|_| is_in_shopping_cart),
    }
}

/// One page of recipe views, newest first
///
/// # Errors
///
/// Returns an error if the listing or any view lookup fails
pub async fn list_recipes(
    db: &Database,
    filter: &RecipeFilter,
    params: &PageParams,
    viewer: Option<i64>,
    base: &str,
) -> AppResult<Page<RecipeView>> {
    let (recipes, count) = db.recipes().list(filter, params).await?;
    debug!(count, returned = recipes.len(), "Listed recipes");

    let mut views = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        views.push(recipe_view(db, recipe, viewer).await?);
    }

    Ok(Page::new(views, count, params, base))
}

/// Absolute short link of a recipe
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown recipe
pub async fn short_link(db: &Database, public_base_url: &str, recipe_id: i64) -> AppResult<String> {
    let recipe = db.recipes().require(recipe_id).await?;
    Ok(short_link_url(public_base_url, &recipe.short_code))
}

/// Frontend path a short code redirects to
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown code
pub async fn resolve_short_code(db: &Database, code: &str) -> AppResult<String> {
    db.recipes()
        .get_by_short_code(code)
        .await?
        .map(|recipe| recipe_page_path(recipe.id))
        .ok_or_else(|| AppError::not_found(format!("Short link {code}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> RecipePayload {
        RecipePayload {
            name: Some("Pancakes".to_owned()),
            text: Some("Mix and fry".to_owned()),
            cooking_time: Some(20),
            image: Some("data:image/png;base64,AAAA".to_owned()),
            tags: Some(vec![1, 2]),
            ingredients: Some(vec![
                IngredientSpec { id: 1, amount: 200 },
                IngredientSpec { id: 2, amount: 50 },
            ]),
        }
    }

    #[test]
    fn test_valid_create_payload() {
        let validated = validate_payload(&full_payload(), WriteMode::Create).unwrap();
        assert_eq!(validated.name.as_deref(), Some("Pancakes"));
        assert_eq!(validated.tags, vec![1, 2]);
        assert_eq!(validated.ingredients.len(), 2);
    }

    #[test]
    fn test_create_collects_every_field() {
        let payload = RecipePayload {
            cooking_time: Some(0),
            tags: Some(vec![3, 3]),
            ingredients: Some(vec![]),
            ..RecipePayload::default()
        };

        let error = validate_payload(&payload, WriteMode::Create).unwrap_err();
        assert_eq!(error.http_status(), 400);
        assert_eq!(error.fields["cooking_time"], vec![COOKING_TIME_TOO_SHORT]);
        assert_eq!(error.fields["tags"], vec![DUPLICATE_TAGS]);
        assert_eq!(error.fields["ingredients"], vec![EMPTY_INGREDIENTS]);
        assert_eq!(error.fields["image"], vec![IMAGE_REQUIRED]);
        assert_eq!(error.fields["name"], vec![NAME_REQUIRED]);
        assert_eq!(error.fields["text"], vec![TEXT_REQUIRED]);
    }

    #[test]
    fn test_duplicate_ingredient_and_small_amount() {
        let mut payload = full_payload();
        payload.ingredients = Some(vec![
            IngredientSpec { id: 4, amount: 0 },
            IngredientSpec { id: 4, amount: 10 },
        ]);

        let error = validate_payload(&payload, WriteMode::Create).unwrap_err();
        assert_eq!(
            error.fields["ingredients"],
            vec![DUPLICATE_INGREDIENT, AMOUNT_TOO_SMALL]
        );
    }

    #[test]
    fn test_empty_tags_rejected() {
        let mut payload = full_payload();
        payload.tags = Some(vec![]);

        let error = validate_payload(&payload, WriteMode::Create).unwrap_err();
        assert_eq!(error.fields["tags"], vec![EMPTY_TAGS]);
    }

    #[test]
    fn test_blank_image_rejected() {
        let mut payload = full_payload();
        payload.image = Some("   ".to_owned());

        let error = validate_payload(&payload, WriteMode::Create).unwrap_err();
        assert_eq!(error.fields["image"], vec![IMAGE_REQUIRED]);
    }

    #[test]
    fn test_name_length_limit() {
        let mut payload = full_payload();
        payload.name = Some("x".repeat(MAX_RECIPE_NAME_LENGTH + 1));

        let error = validate_payload(&payload, WriteMode::Create).unwrap_err();
        assert_eq!(error.fields["name"], vec![NAME_TOO_LONG]);
    }

    #[test]
    fn test_update_requires_tags_and_ingredients() {
        let payload = RecipePayload {
            name: Some("Renamed".to_owned()),
            ..RecipePayload::default()
        };

        let error = validate_payload(&payload, WriteMode::Update).unwrap_err();
        assert_eq!(error.code, ErrorCode::MissingRequiredField);
        assert_eq!(error.fields["tags"], vec![TAGS_REQUIRED_FOR_UPDATE]);
        assert_eq!(
            error.fields["ingredients"],
            vec![INGREDIENTS_REQUIRED_FOR_UPDATE]
        );
        assert!(!error.fields.contains_key("name"));
    }

    #[test]
    fn test_update_keeps_absent_scalars() {
        let payload = RecipePayload {
            tags: Some(vec![1]),
            ingredients: Some(vec![IngredientSpec { id: 1, amount: 1 }]),
            ..RecipePayload::default()
        };

        let validated = validate_payload(&payload, WriteMode::Update).unwrap();
        assert!(validated.name.is_none());
        assert!(validated.image.is_none());
        assert!(validated.cooking_time.is_none());
    }

    #[test]
    fn test_filter_flags_ignored_for_anonymous() {
        let anonymous = build_filter(None, vec![], true, true, None);
        assert!(anonymous.favorited_by.is_none());
        assert!(anonymous.in_cart_of.is_none());

        let viewer = build_filter(Some(2), vec!["breakfast".to_owned()], true, false, Some(7));
        assert_eq!(viewer.favorited_by, Some(7));
        assert!(viewer.in_cart_of.is_none());
        assert_eq!(viewer.author_id, Some(2));
    }
}
