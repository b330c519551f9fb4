//! Composite endpoints that call both backends and merge results.
//!
//! Every orchestration here is sequential: the sports call completes before
//! the recipes call starts. One failed call aborts the whole response through
//! the error normalizer; there are no partial or degraded responses.

pub mod merge;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::http::error::GatewayError;
use crate::http::server::AppState;

/// `GET /recipe-by-team/{id_or_name}`: team plus a uniformly random recipe.
pub async fn recipe_by_team(
    State(state): State<AppState>,
    Path(id_or_name): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    let team = state
        .sports
        .get_json(&format!("getTeamInfo/{id_or_name}"))
        .await?;
    let recipe = random_recipe(&state).await?;
    Ok(Json(json!({ "team": team, "recipe": recipe })))
}

/// `GET /recipe-by-player/{id_or_name}`: player plus a uniformly random
/// recipe. Numeric IDs and name strings resolve through the same backend
/// lookup, so no transformation distinguishes them.
pub async fn recipe_by_player(
    State(state): State<AppState>,
    Path(id_or_name): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    let player = state
        .sports
        .get_json(&format!("getPlayerInfo/{id_or_name}"))
        .await?;
    let recipe = random_recipe(&state).await?;
    Ok(Json(json!({ "player": player, "recipe": recipe })))
}

/// `GET /recipe-starting-with-team/{id_or_name}`: first recipe whose name
/// starts with the team name's first letter.
pub async fn recipe_starting_with_team(
    State(state): State<AppState>,
    Path(id_or_name): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    // A backend 404 and an error-shaped payload both mean the same thing
    // here, and either short-circuits before the recipes call is wasted.
    let team = match state
        .sports
        .get_json(&format!("getTeamInfo/{id_or_name}"))
        .await
    {
        Ok(team) => team,
        Err(GatewayError::Upstream { status, .. }) if status == StatusCode::NOT_FOUND => {
            return Err(GatewayError::not_found("Team not found"));
        }
        Err(e) => return Err(e),
    };
    if merge::is_error_payload(&team) {
        return Err(GatewayError::not_found("Team not found"));
    }
    let letter = team
        .get("name")
        .and_then(Value::as_str)
        .and_then(merge::first_letter)
        .ok_or_else(|| GatewayError::not_found("Team not found"))?;

    let recipes = fetch_recipes(&state).await?;
    match merge::first_starting_with(&recipes, letter) {
        Some(recipe) => Ok(Json(json!({ "team": team, "recipe": recipe }))),
        None => Err(GatewayError::not_found(format!(
            "No recipe found starting with the letter {letter}"
        ))),
    }
}

/// `GET /services-status`: both backend `/status` payloads merged. Sequential
/// by design; either failure aborts the whole call.
pub async fn services_status(
    State(state): State<AppState>,
) -> Result<Json<Value>, GatewayError> {
    let nba_status = state.sports.get_json("status").await?;
    let recipes_status = state.recipes.get_json("status").await?;
    Ok(Json(json!({
        "nbaService": nba_status,
        "recipesService": recipes_status,
    })))
}

/// Fetch the full recipe collection and select one via the injected picker.
async fn random_recipe(state: &AppState) -> Result<Value, GatewayError> {
    let recipes = fetch_recipes(state).await?;
    merge::pick_recipe(&recipes, state.recipe_picker.as_ref())
        .cloned()
        .ok_or_else(|| GatewayError::not_found("No recipes available"))
}

async fn fetch_recipes(state: &AppState) -> Result<Vec<Value>, GatewayError> {
    let payload = state.recipes.get_json("getRecipes").await?;
    match payload {
        Value::Array(recipes) => Ok(recipes),
        other => Err(GatewayError::Unreachable {
            detail: format!(
                "recipes backend returned a non-array payload: {}",
                payload_kind(&other)
            ),
        }),
    }
}

fn payload_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
