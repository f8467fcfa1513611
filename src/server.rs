//! HTTP serving.
//!
//! [`serve`] wires the workspace, the hosted Gemini client, and the agent into
//! an axum REST surface. All state sits behind one [`AppState`]; the workspace
//! and the agent each get a tokio mutex, so note mutations serialize and at
//! most one agent turn runs at a time.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::agent::{Agent, ChatMessage};
use crate::calendar::{CalendarProvider, GoogleCalendar};
use crate::config::{MemoruniaConfig, RetrievalConfig};
use crate::genai::gemini::GeminiClient;
use crate::genai::{embed_or_empty, ChatProvider, EmbeddingProvider};
use crate::notes::graph::{build_graph, Graph};
use crate::notes::search::{related_notes, search_notes};
use crate::notes::types::{embedding_text, Cluster, Note, SearchHit};
use crate::notes::workspace::Workspace;
use crate::store::FileKvStore;
use crate::tools::ToolExecutor;

pub struct AppState {
    workspace: Mutex<Workspace>,
    agent: Mutex<Agent>,
    embedding: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatProvider>,
    calendar: Option<Arc<dyn CalendarProvider>>,
    retrieval: RetrievalConfig,
}

/// Start the REST server and block until ctrl-c.
pub async fn serve(config: MemoruniaConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let data_dir = config.resolved_data_dir();
    let store = FileKvStore::open(&data_dir)?;
    tracing::info!(data = %data_dir.display(), "workspace store ready");

    let workspace = Workspace::load(Box::new(store))?;
    tracing::info!(notes = workspace.notes().len(), "workspace loaded");

    let client = Arc::new(GeminiClient::from_config(&config.genai)?);
    let embedding: Arc<dyn EmbeddingProvider> = client.clone();
    let chat: Arc<dyn ChatProvider> = client;

    let calendar: Option<Arc<dyn CalendarProvider>> = if config.calendar.is_configured() {
        Some(Arc::new(GoogleCalendar::new(config.calendar.clone())))
    } else {
        tracing::info!("calendar credentials absent, createCalendarEvent disabled");
        None
    };

    let agent = Agent::new(
        chat.clone(),
        embedding.clone(),
        calendar.clone(),
        config.retrieval.clone(),
    );

    let state = Arc::new(AppState {
        workspace: Mutex::new(workspace),
        agent: Mutex::new(agent),
        embedding,
        chat,
        calendar,
        retrieval: config.retrieval.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", axum::routing::put(update_note).delete(delete_note))
        .route("/notes/{id}/related", get(related))
        .route("/search", get(search))
        .route("/graph", get(graph))
        .route("/clusters", get(clusters))
        .route("/organize", post(organize))
        .route("/chat", get(transcript).post(chat))
        .with_state(state)
}

enum ApiError {
    NotFound,
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Note not found" })))
                    .into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!(%err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError::Internal(err.into())
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct CreateNoteBody {
    title: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct UpdateNoteBody {
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    messages: Vec<ChatMessage>,
}

async fn list_notes(State(state): State<Arc<AppState>>) -> Json<Vec<Note>> {
    let ws = state.workspace.lock().await;
    Json(ws.notes().to_vec())
}

async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateNoteBody>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let embedding = embed_or_empty(
        state.embedding.as_ref(),
        &embedding_text(&body.title, &body.content),
    )
    .await;

    let mut note = Note::new(body.title, body.content);
    note.embedding = Some(embedding);

    let mut ws = state.workspace.lock().await;
    ws.insert_note(note.clone())?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateNoteBody>,
) -> ApiResult<Json<Note>> {
    let mut ws = state.workspace.lock().await;
    let Some(existing) = ws.find_note(&id) else {
        return Err(ApiError::NotFound);
    };

    let mut updated = existing.clone();
    if let Some(title) = body.title {
        updated.title = title;
    }
    if let Some(content) = body.content {
        updated.content = content;
    }
    updated.embedding = Some(
        embed_or_empty(
            state.embedding.as_ref(),
            &embedding_text(&updated.title, &updated.content),
        )
        .await,
    );

    if !ws.replace_note(updated.clone())? {
        return Err(ApiError::NotFound);
    }
    Ok(Json(updated))
}

async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let mut ws = state.workspace.lock().await;
    match ws.remove_note(&id)? {
        Some(note) => Ok(Json(json!({ "deleted": note.id }))),
        None => Err(ApiError::NotFound),
    }
}

async fn related(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SearchHit>>> {
    let ws = state.workspace.lock().await;
    let Some(note) = ws.find_note(&id) else {
        return Err(ApiError::NotFound);
    };

    let hits = related_notes(note, ws.notes(), state.retrieval.graph_edge_threshold)
        .into_iter()
        .map(|(n, score)| SearchHit {
            id: n.id.clone(),
            title: n.title.clone(),
            snippet: String::new(),
            score,
        })
        .collect();
    Ok(Json(hits))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchHit>> {
    let query_embedding = embed_or_empty(state.embedding.as_ref(), &params.q).await;
    let ws = state.workspace.lock().await;
    Json(search_notes(
        ws.notes(),
        &query_embedding,
        state.retrieval.search_floor,
        state.retrieval.max_search_results,
    ))
}

async fn graph(State(state): State<Arc<AppState>>) -> Json<Graph> {
    let ws = state.workspace.lock().await;
    Json(build_graph(
        ws.notes(),
        ws.clusters(),
        state.retrieval.graph_edge_threshold,
    ))
}

async fn clusters(State(state): State<Arc<AppState>>) -> Json<Vec<Cluster>> {
    let ws = state.workspace.lock().await;
    Json(ws.clusters().to_vec())
}

/// Re-cluster all notes. Same code path as the agent's clusterNotes tool.
async fn organize(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut ws = state.workspace.lock().await;
    let mut executor = ToolExecutor {
        workspace: &mut ws,
        embedding: state.embedding.as_ref(),
        chat: state.chat.as_ref(),
        calendar: state.calendar.as_deref(),
        retrieval: &state.retrieval,
    };
    Json(executor.execute("clusterNotes", &json!({})).await)
}

async fn transcript(State(state): State<Arc<AppState>>) -> Json<Vec<ChatMessage>> {
    let agent = state.agent.lock().await;
    Json(agent.transcript().to_vec())
}

/// One agent turn. The agent mutex keeps turns strictly sequential.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Json<ChatReply> {
    let mut agent = state.agent.lock().await;
    let mut ws = state.workspace.lock().await;
    let messages = agent.run_turn(&mut ws, &body.message).await;
    Json(ChatReply { messages })
}
