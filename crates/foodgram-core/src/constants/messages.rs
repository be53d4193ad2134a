// ABOUTME: User-facing messages for validation, conflict and empty-result errors
// ABOUTME: Shared by the services and the tests that assert on them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Recipe submitted without tags
pub const EMPTY_TAGS: &str = "empty tags";
/// Same tag id submitted twice
pub const DUPLICATE_TAGS: &str = "duplicate tags";
/// Recipe submitted without ingredients
pub const EMPTY_INGREDIENTS: &str = "empty ingredients";
/// Same ingredient id submitted twice
pub const DUPLICATE_INGREDIENT: &str = "duplicate ingredient";
/// Ingredient amount below the minimum
pub const AMOUNT_TOO_SMALL: &str = "amount must be at least 1";
/// Cooking time below the minimum
pub const COOKING_TIME_TOO_SHORT: &str = "cooking time too short";
/// Image missing on create
pub const IMAGE_REQUIRED: &str = "image required";
/// Update without the tag list
pub const TAGS_REQUIRED_FOR_UPDATE: &str = "tags required for update";
/// Update without the ingredient list
pub const INGREDIENTS_REQUIRED_FOR_UPDATE: &str = "ingredients required for update";
/// Recipe name missing
pub const NAME_REQUIRED: &str = "name required";
/// Recipe name too long
pub const NAME_TOO_LONG: &str = "name is too long";
/// Recipe description missing
pub const TEXT_REQUIRED: &str = "text required";
/// Shopping list has nothing to aggregate
pub const CART_IS_EMPTY: &str = "cart is empty";
/// Favorite/cart add for a recipe already present
pub const RECIPE_ALREADY_ADDED: &str = "recipe already added";
/// Favorite/cart remove for a recipe not present
pub const RECIPE_NOT_ADDED: &str = "recipe was not added";
/// Follow request targeting the caller
pub const SELF_FOLLOW: &str = "cannot follow yourself";
/// Follow request for an existing follow
pub const ALREADY_FOLLOWING: &str = "already following";
/// Unfollow request without a follow
pub const NOT_FOLLOWING: &str = "not following";
/// Recipe created without a cooking time
pub const COOKING_TIME_REQUIRED: &str = "cooking time required";
/// Tag id that does not exist
pub const UNKNOWN_TAG: &str = "unknown tag";
/// Ingredient id that does not exist
pub const UNKNOWN_INGREDIENT: &str = "unknown ingredient";
/// Tag name or slug already taken
pub const TAG_EXISTS: &str = "tag with this name or slug already exists";
/// Ingredient (name, unit) pair already taken
pub const INGREDIENT_EXISTS: &str = "ingredient with this name and unit already exists";
/// User email or username already taken
pub const USER_EXISTS: &str = "user with this email or username already exists";
/// Request body is not valid JSON
pub const MALFORMED_BODY: &str = "request body is not valid JSON";
/// Request body is not declared as JSON
pub const JSON_CONTENT_TYPE_REQUIRED: &str = "expected a request with `Content-Type: application/json`";
/// Request body is over the upload limit
pub const BODY_TOO_LARGE: &str = "request body is too large";
/// A field holds a value of the wrong type
pub const INVALID_FIELD_VALUE: &str = "invalid value";
/// Key used for errors that belong to the body as a whole
pub const NON_FIELD_ERRORS: &str = "non_field_errors";
/// Avatar upload without an image
pub const AVATAR_REQUIRED: &str = "avatar required";
/// Avatar delete for a user without one
pub const NO_AVATAR: &str = "user has no avatar";
/// Avatar over the size limit
pub const AVATAR_TOO_LARGE: &str = "avatar must not exceed 5 MB";
/// Avatar in a format other than PNG or JPEG
pub const AVATAR_FORMAT: &str = "only PNG, JPG and JPEG avatars are allowed";
/// Username reserved for the `me` routes
pub const USERNAME_FORBIDDEN: &str = "this username is reserved";
/// Username with characters outside letters, digits and `.@+-_`
pub const USERNAME_INVALID: &str = "username contains invalid characters";
