use actix_web::{delete, get, post, web, HttpResponse, Result as WebResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::models::{ErrorResponse, PostMessageRequest, SessionResponse, TurnResponse};
use crate::chat::{TurnController, TurnOutcome, QUOTA_EXHAUSTED_MESSAGE};
use crate::config::AppConfig;
use crate::session::{today, SessionStore};

#[post("")]
pub async fn create_session(
    store: web::Data<Arc<SessionStore>>,
    config: web::Data<AppConfig>,
) -> WebResult<HttpResponse> {
    let greeting = config.persona.greeting.as_str();
    let greeting = (!greeting.is_empty()).then_some(greeting);

    let (_, handle) = store.create(greeting);
    let state = handle.lock().await;
    Ok(HttpResponse::Created().json(SessionResponse::from_state(&state)))
}

#[get("/{id}")]
pub async fn get_session(
    store: web::Data<Arc<SessionStore>>,
    id: web::Path<Uuid>,
) -> WebResult<HttpResponse> {
    let handle = match store.get(id.into_inner()) {
        Some(handle) => handle,
        None => return Ok(HttpResponse::NotFound().finish()),
    };

    let mut state = handle.lock().await;
    // Every render applies the date-reset rule before the gate is read.
    state.session.quota.touch(today());
    Ok(HttpResponse::Ok().json(SessionResponse::from_state(&state)))
}

#[delete("/{id}")]
pub async fn delete_session(
    store: web::Data<Arc<SessionStore>>,
    id: web::Path<Uuid>,
) -> WebResult<HttpResponse> {
    if store.remove(id.into_inner()) {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Ok(HttpResponse::NotFound().finish())
    }
}

#[post("/{id}/messages")]
pub async fn post_message(
    store: web::Data<Arc<SessionStore>>,
    controller: web::Data<Arc<TurnController>>,
    id: web::Path<Uuid>,
    req: web::Json<PostMessageRequest>,
) -> WebResult<HttpResponse> {
    let handle = match store.get(id.into_inner()) {
        Some(handle) => handle,
        None => return Ok(HttpResponse::NotFound().body("Session not found")),
    };

    match controller.run_turn(&handle, &req.content).await {
        Ok(TurnOutcome::Answered { reply, remaining }) => {
            Ok(HttpResponse::Ok().json(TurnResponse { reply, remaining }))
        }
        Ok(TurnOutcome::Ignored) => Ok(HttpResponse::NoContent().finish()),
        Ok(TurnOutcome::QuotaExhausted) => Ok(HttpResponse::TooManyRequests()
            .json(ErrorResponse::new(QUOTA_EXHAUSTED_MESSAGE))),
        Err(e) => Ok(HttpResponse::BadGateway()
            .json(ErrorResponse::new(format!("The assistant could not answer: {}", e)))),
    }
}

#[post("/{id}/clear")]
pub async fn clear_session(
    store: web::Data<Arc<SessionStore>>,
    config: web::Data<AppConfig>,
    id: web::Path<Uuid>,
) -> WebResult<HttpResponse> {
    let handle = match store.get(id.into_inner()) {
        Some(handle) => handle,
        None => return Ok(HttpResponse::NotFound().finish()),
    };

    let greeting = config.persona.greeting.as_str();
    let greeting = (!greeting.is_empty()).then_some(greeting);

    let mut state = handle.lock().await;
    state.clear_conversation(greeting);
    Ok(HttpResponse::Ok().json(SessionResponse::from_state(&state)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .service(create_session)
            .service(get_session)
            .service(delete_session)
            .service(post_message)
            .service(clear_session),
    );
}
