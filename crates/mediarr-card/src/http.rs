use crate::action::Action;
use crate::core::{CardEvent, CardSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use mediarr_proto::entity::StateSnapshot;
use mediarr_proto::source::SectionKey;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};

#[derive(Clone)]
struct HttpState {
    event_tx: mpsc::Sender<CardEvent>,
    snapshot_rx: watch::Receiver<CardSnapshot>,
}

#[derive(Serialize)]
struct SelectionInfo {
    selected_type: Option<SectionKey>,
    selected_index: usize,
}

/// The host API: card document, state delivery, user interactions.
pub fn router(event_tx: mpsc::Sender<CardEvent>, snapshot_rx: watch::Receiver<CardSnapshot>) -> Router {
    let app_state = HttpState {
        event_tx,
        snapshot_rx,
    };

    Router::new()
        .route("/", get(get_card))
        .route("/api/selection", get(get_selection))
        .route("/api/states", post(post_states))
        .route("/api/select/:section/:index", post(select_item))
        .route("/api/toggle/:section", post(toggle_section))
        .route("/api/next", post(next_item))
        .route("/api/play", post(play))
        .route("/api/clients/:client_id", post(choose_client))
        .route("/api/close", post(close_selector))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub fn start_server(
    bind_address: String,
    port: u16,
    event_tx: mpsc::Sender<CardEvent>,
    snapshot_rx: watch::Receiver<CardSnapshot>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app = router(event_tx, snapshot_rx);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn send(state: &HttpState, event: CardEvent) -> StatusCode {
    if state.event_tx.send(event).await.is_err() {
        error!("Failed to send event to card core");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::OK
}

async fn get_card(State(state): State<HttpState>) -> Html<String> {
    Html(state.snapshot_rx.borrow().html.clone())
}

async fn get_selection(State(state): State<HttpState>) -> Json<SelectionInfo> {
    let snapshot = state.snapshot_rx.borrow();
    Json(SelectionInfo {
        selected_type: snapshot.selected_type,
        selected_index: snapshot.selected_index,
    })
}

async fn post_states(State(state): State<HttpState>, Json(states): Json<StateSnapshot>) -> StatusCode {
    debug!("HTTP API: state delivery ({} entities)", states.len());
    send(&state, CardEvent::States(states)).await
}

async fn select_item(
    State(state): State<HttpState>,
    Path((section, index)): Path<(String, usize)>,
) -> StatusCode {
    let Ok(section) = section.parse::<SectionKey>() else {
        return StatusCode::NOT_FOUND;
    };
    info!("HTTP API: Select {} #{}", section, index);
    send(&state, CardEvent::Action(Action::SelectItem { section, index })).await
}

async fn toggle_section(State(state): State<HttpState>, Path(section): Path<String>) -> StatusCode {
    let Ok(section) = section.parse::<SectionKey>() else {
        return StatusCode::NOT_FOUND;
    };
    info!("HTTP API: Toggle {}", section);
    send(&state, CardEvent::Action(Action::ToggleSection(section))).await
}

async fn next_item(State(state): State<HttpState>) -> StatusCode {
    info!("HTTP API: Next");
    send(&state, CardEvent::Action(Action::Advance)).await
}

async fn play(State(state): State<HttpState>) -> StatusCode {
    info!("HTTP API: Play");
    send(&state, CardEvent::Action(Action::PlayFocused)).await
}

async fn choose_client(State(state): State<HttpState>, Path(client_id): Path<String>) -> StatusCode {
    info!("HTTP API: Play on client {}", client_id);
    send(&state, CardEvent::Action(Action::ChooseClient(client_id))).await
}

async fn close_selector(State(state): State<HttpState>) -> StatusCode {
    info!("HTTP API: Close client selector");
    send(&state, CardEvent::Action(Action::CloseSelector)).await
}
