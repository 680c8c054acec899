//! `GET /api/templates/{template_id}/placeholders`: the tokens a stored
//! template expects, and which of them its data snapshot leaves unfilled.

use crate::engine::Resolver;
use crate::error::ServiceError;
use crate::services::templates::get::get_template;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::placeholder::Placeholder;
use common::requests::TemplatePlaceholders;
use std::collections::HashSet;

pub(crate) async fn process(state: web::Data<AppState>, template_id: web::Path<String>) -> impl Responder {
    match scan_template(&state, &template_id).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => e.error_response(),
    }
}

async fn scan_template(state: &AppState, template_id: &str) -> Result<TemplatePlaceholders, ServiceError> {
    let template = get_template(state, template_id)?;
    // no fallback page here: it would report its own tokens
    let html = state.fetcher.fetch(&template.html_url).await?;

    let placeholders = Placeholder::scan(&html);
    let filled: HashSet<String> = Resolver::render()
        .substitutions(&template.json_data)
        .into_iter()
        .map(|(token, _)| token)
        .collect();
    let unresolved = placeholders
        .iter()
        .filter(|path| !filled.contains(path.placeholder().as_str()))
        .cloned()
        .collect();

    Ok(TemplatePlaceholders {
        template_id: template.id,
        placeholders,
        unresolved,
    })
}
