//! Assistant endpoints: command classification, chat, sentiment, panel layouts and
//! the terminal.
//!
//! Chat traffic that reaches the Anthropic backend passes through the shared
//! sliding-window limiter first; everything answered locally is unmetered.

use super::body;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use lcars_core::guard::{format_status, format_time_remaining, message_limits, RateLimitStatus};
use lcars_core::panels::parse_panel_query;
use lcars_core::store::NewConversation;
use lcars_core::{
    classify, dispatch, score_sentiment, validate_message, Intent, LcarsError,
    PanelLayout, ReplySource, SentimentResult, TerminalResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    #[serde(default, alias = "text")]
    message: Option<String>,
}

impl MessageBody {
    fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Consumes one call from the chat limiter or answers 429.
fn take_chat_slot(state: &AppState) -> ApiResult<()> {
    let mut limiter = state.limiter();
    if limiter.can_make_call() {
        return Ok(());
    }
    let wait = limiter.time_until_next_call();
    tracing::info!(target: "lcars::gateway", wait_ms = wait.as_millis() as u64, "chat rate limited");
    Err(LcarsError::RateLimited(format_time_remaining(wait)).into())
}

/// Validated, trimmed message text.
fn validated(state: &AppState, text: &str) -> ApiResult<String> {
    validate_message(text, state.config.message_max_len)
        .into_result()
        .map_err(ApiError::bad_request)?;
    Ok(text.trim().to_string())
}

fn remember(state: &AppState, message: &str, response: &str, sentiment: &SentimentResult, intent: &str) {
    state.console.record_conversation(NewConversation {
        message: message.to_string(),
        response: response.to_string(),
        sentiment: sentiment.mood.as_str().to_string(),
        sentiment_score: sentiment.score,
        intent: intent.to_string(),
    });
}

/// Direct pass-through to the Anthropic backend.
pub async fn ai_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MessageBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = body(payload, "Message is required")?;
    let message = request
        .text()
        .ok_or_else(|| ApiError::bad_request("Message is required"))?;
    let message = validated(&state, message)?;

    if !state.chat.is_configured() {
        return Ok(Json(json!({
            "response": "",
            "error": "Claude AI not configured",
            "apiAvailable": false,
            "message": "Add ANTHROPIC_API_KEY to .env to enable Claude AI. See API-ALTERNATIVES.md for other options.",
        })));
    }
    take_chat_slot(&state)?;

    let response = state.chat.send(&message).await.map_err(|e| {
        ApiError::internal(
            "Failed to get AI response",
            &LcarsError::upstream("Anthropic", e.to_string()),
        )
    })?;

    let sentiment = score_sentiment(&message);
    let intent = classify(&message);
    remember(&state, &message, &response, &sentiment, intent.label());
    Ok(Json(json!({ "response": response, "apiAvailable": true })))
}

#[derive(Debug, Serialize)]
pub struct CommandReply {
    intent: Intent,
    route: Option<String>,
    response: String,
    sentiment: SentimentResult,
}

/// Classifies an utterance and composes the assistant's reply.
pub async fn command(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MessageBody>, JsonRejection>,
) -> ApiResult<Json<CommandReply>> {
    let request = body(payload, "Message cannot be empty")?;
    let text = validated(&state, request.message.as_deref().unwrap_or_default())?;

    let intent = classify(&text);
    if let Intent::CaptainQuote { captain } = &intent {
        state.terminal().stage(captain.name());
    }
    if matches!(intent, Intent::Chat { .. }) && state.chat.is_configured() {
        take_chat_slot(&state)?;
    }

    let response = state.composer().compose(&intent).await;
    let sentiment = score_sentiment(&text);
    state.console.record_command();
    remember(&state, &text, &response, &sentiment, intent.label());
    tracing::debug!(target: "lcars::gateway", intent = intent.label(), "command handled");

    Ok(Json(CommandReply {
        route: intent.route(),
        intent,
        response,
        sentiment,
    }))
}

/// Free-form chat: backend first, local composition otherwise.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MessageBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = body(payload, "Message cannot be empty")?;
    let text = validated(&state, request.message.as_deref().unwrap_or_default())?;
    if state.chat.is_configured() {
        take_chat_slot(&state)?;
    }

    let reply = state.composer().chat(&text).await;
    let sentiment = score_sentiment(&text);
    remember(&state, &text, &reply.response, &sentiment, "chat");
    Ok(Json(json!({
        "response": reply.response,
        "source": reply.source,
        "apiAvailable": reply.source == ReplySource::Backend,
        "sentiment": sentiment,
    })))
}

pub async fn sentiment(
    payload: Result<Json<MessageBody>, JsonRejection>,
) -> ApiResult<Json<SentimentResult>> {
    let request = body(payload, "Message is required")?;
    Ok(Json(score_sentiment(request.message.as_deref().unwrap_or_default())))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitReply {
    #[serde(flatten)]
    status: RateLimitStatus,
    message: String,
}

pub async fn rate_limit(State(state): State<Arc<AppState>>) -> Json<RateLimitReply> {
    let status = state.limiter().status();
    Json(RateLimitReply {
        message: format_status(&status),
        status,
    })
}

#[derive(Debug, Deserialize)]
pub struct PanelsQuery {
    #[serde(default)]
    panels: String,
}

pub async fn panels(Query(query): Query<PanelsQuery>) -> Json<PanelLayout> {
    Json(dispatch(&parse_panel_query(&query.panels)))
}

#[derive(Debug, Deserialize)]
pub struct TerminalBody {
    command: String,
}

pub async fn terminal(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TerminalBody>, JsonRejection>,
) -> ApiResult<Json<TerminalResponse>> {
    let request = body(payload, "Command is required")?;
    validate_message(&request.command, message_limits::LONG)
        .into_result()
        .map_err(ApiError::bad_request)?;
    let mut rng = rand::thread_rng();
    let response = state.terminal().execute(&request.command, &mut rng);
    state.console.record_command();
    Ok(Json(response))
}

/// The captain staged by the last quote command, consumed on read.
pub async fn take_staged(State(state): State<Arc<AppState>>) -> Json<Value> {
    let command = state.terminal().take_staged();
    Json(json!({ "command": command }))
}
