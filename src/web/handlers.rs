use std::time::Instant;

use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info};
use serde_json::json;
use tera::Context;

use crate::metrics::InferMetrics;
use crate::web::models::InferForm;
use crate::AppState;

/// Rendered in place of an answer when the backend returned no usable choice.
const NO_RESPONSE_PLACEHOLDER: &str = "(no response)";

const EMPTY_IMAGE_MESSAGE: &str = "Empty image.";
const NOT_CONFIGURED_MESSAGE: &str = "Inference backend not configured (set VLLM_BASE_URL).";

// Index page handler
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    render_page(&data, &data.config.default_prompt, "", "")
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Inference form handler: validate, call the backend, render the result.
// Every outcome renders the page with HTTP 200 so the form stays usable.
pub async fn infer(
    data: web::Data<AppState>,
    MultipartForm(form): MultipartForm<InferForm>,
) -> impl Responder {
    let prompt = match form.prompt.as_deref().map(|p| p.trim()) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => data.config.default_prompt.clone(),
    };

    let image = match form.image.as_ref() {
        Some(image) if !image.data.is_empty() => image,
        _ => {
            InferMetrics::record_outcome("bad_request");
            return render_page(&data, &prompt, "", EMPTY_IMAGE_MESSAGE);
        }
    };

    // UX guard for placeholder/local configs, not a security control.
    let base_url = data.config.base_url.trim();
    if base_url.is_empty() || base_url.contains("localhost") {
        InferMetrics::record_outcome("not_configured");
        return render_page(&data, &prompt, "", NOT_CONFIGURED_MESSAGE);
    }

    info!(
        "infer request: prompt {} chars, image {} bytes",
        prompt.len(),
        image.data.len()
    );
    if let Some(name) = &image.file_name {
        debug!("image filename: {}", name);
    }

    let request = data.builder.build(&prompt, &image.data);

    let start = Instant::now();
    let result = data.client.chat_completions(&request).await;
    InferMetrics::record_infer_duration(start.elapsed());

    match result {
        Ok(response) => {
            let answer = response.answer_text().unwrap_or(NO_RESPONSE_PLACEHOLDER);
            InferMetrics::record_outcome("success");
            render_page(&data, &prompt, answer, "")
        }
        Err(err) => {
            InferMetrics::record_outcome("error");
            error!("inference request failed: {}", err);
            let message = if data.config.show_error_details {
                format!("{}\n\n{}", best_message(&err), error_chain(&err))
            } else {
                best_message(&err)
            };
            render_page(&data, &prompt, "", &message)
        }
    }
}

fn render_page(data: &AppState, prompt: &str, answer: &str, error: &str) -> HttpResponse {
    let mut context = Context::new();
    context.insert("prompt", prompt);
    context.insert("answer", answer);
    context.insert("error", error);
    match data.tera.render("index.html", &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

/// Innermost non-blank message along the error source chain; falls back to
/// the type name when every level renders blank.
fn best_message<E: std::error::Error>(err: &E) -> String {
    let mut message = None;
    let mut current: Option<&dyn std::error::Error> = Some(err);
    while let Some(e) = current {
        let text = e.to_string();
        if !text.trim().is_empty() {
            message = Some(text);
        }
        current = e.source();
    }
    message.unwrap_or_else(|| std::any::type_name::<E>().to_string())
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        out.push_str("\ncaused by: ");
        out.push_str(&e.to_string());
        current = e.source();
    }
    out
}
