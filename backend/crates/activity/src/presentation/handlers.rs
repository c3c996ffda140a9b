//! HTTP Handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum_extra::extract::Query;
use kernel::caller::CurrentUser;
use kernel::id::EventId;
use kernel::response::{ApiResponse, DataBody};
use platform::geocode::Geocoder;

use crate::application::config::ActivityConfig;
use crate::application::{
    BrowseEventsUseCase, CauseUseCase, CreateEventUseCase, CreatedEvent, EventDetailsUseCase,
    FavouriteUseCase, SignUpUseCase, UpdateEventUseCase,
};
use crate::domain::entity::cause::Cause;
use crate::domain::entity::event::{EventDetails, EventListing};
use crate::domain::repository::{ActivityStore, CauseRepository};
use crate::error::{ActivityError, ActivityResult};
use crate::presentation::dto::{
    AttendeesResponse, EventListQuery, EventPageResponse, EventRequest, EventResponse,
    EventsResponse, SelectCausesData, SignUpRequest, SignUpResponse, SignUpUpdateRequest,
};

/// Shared state for event handlers
#[derive(Clone)]
pub struct ActivityAppState<R, G>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub geocoder: Arc<G>,
    pub config: Arc<ActivityConfig>,
}

/// Shared state for the public cause handlers
#[derive(Clone)]
pub struct CauseAppState<R>
where
    R: CauseRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

fn event_id(raw: &str) -> ActivityResult<EventId> {
    raw.parse().map_err(|_| ActivityError::InvalidEventId)
}

// ============================================================================
// Listings
// ============================================================================

/// GET /event
pub async fn list_events<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Query(query): Query<EventListQuery>,
) -> ActivityResult<ApiResponse<EventPageResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let filters = query.filters()?;
    let (meta, events) = BrowseEventsUseCase::new(state.repo.clone())
        .all(caller.user_id, filters, &query.page())
        .await?;

    Ok(ApiResponse::new(
        "Events fetched successfully",
        EventPageResponse { meta, events },
    ))
}

/// GET /event/causes
pub async fn list_events_by_causes<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Query(query): Query<EventListQuery>,
) -> ActivityResult<ApiResponse<BTreeMap<String, Vec<EventListing>>>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let filters = query.filters()?;
    let grouped = BrowseEventsUseCase::new(state.repo.clone())
        .by_selected_causes(caller.user_id, filters)
        .await?;

    Ok(ApiResponse::new("Events fetched successfully", grouped))
}

/// GET /event/favourites
pub async fn list_favourites<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
) -> ActivityResult<ApiResponse<EventsResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let events = BrowseEventsUseCase::new(state.repo.clone())
        .favourites(caller.user_id)
        .await?;

    Ok(ApiResponse::new(
        "Favourite events fetched successfully",
        EventsResponse { events },
    ))
}

/// GET /event/going
pub async fn list_going<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
) -> ActivityResult<ApiResponse<EventsResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let events = BrowseEventsUseCase::new(state.repo.clone())
        .going(caller.user_id)
        .await?;

    Ok(ApiResponse::new(
        "Events fetched successfully",
        EventsResponse { events },
    ))
}

/// GET /event/signUp/history
pub async fn signup_history<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
) -> ActivityResult<ApiResponse<EventsResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let events = BrowseEventsUseCase::new(state.repo.clone())
        .history(caller.user_id)
        .await?;

    Ok(ApiResponse::new(
        "All activities successfully fetched",
        EventsResponse { events },
    ))
}

// ============================================================================
// Single events
// ============================================================================

/// GET /event/{id}
pub async fn get_event<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    _caller: CurrentUser,
    Path(id): Path<String>,
) -> ActivityResult<ApiResponse<EventDetails>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let details = EventDetailsUseCase::new(state.repo.clone())
        .get(event_id(&id)?)
        .await?;

    Ok(ApiResponse::new("Event fetched successfully", details))
}

/// POST /event
pub async fn create_event<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Json(req): Json<EventRequest>,
) -> ActivityResult<ApiResponse<CreatedEvent>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let use_case = CreateEventUseCase::new(
        state.repo.clone(),
        state.geocoder.clone(),
        state.config.clone(),
    );
    let created = use_case
        .execute(caller.user_id, req.into_create_input())
        .await?;

    Ok(ApiResponse::new("Event created successfully", created))
}

/// POST /event/update/{id}
pub async fn update_event<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<EventRequest>,
) -> ActivityResult<ApiResponse<EventResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let event_id = event_id(&id)?;
    let input = req.into_update_input().ok_or(ActivityError::AddressMissing)?;
    let event = UpdateEventUseCase::new(state.repo.clone(), state.geocoder.clone())
        .execute(caller.user_id, event_id, input)
        .await?;

    Ok(ApiResponse::new(
        "Event updated successfully",
        EventResponse { event },
    ))
}

/// POST /event/{id}/delete
pub async fn delete_event<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ActivityResult<ApiResponse<EventResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let event = EventDetailsUseCase::new(state.repo.clone())
        .delete(caller.user_id, event_id(&id)?)
        .await?;

    Ok(ApiResponse::new(
        "Event deleted successfully",
        EventResponse { event },
    ))
}

// ============================================================================
// Signups
// ============================================================================

/// POST /event/{id}/signUp
pub async fn sign_up<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<SignUpRequest>,
) -> ActivityResult<ApiResponse<SignUpResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let signup = SignUpUseCase::new(state.repo.clone())
        .sign_up(caller.user_id, event_id(&id)?, req.confirmed)
        .await?;

    Ok(ApiResponse::new(
        "Signup created successfully",
        SignUpResponse { signup },
    ))
}

/// GET /event/{id}/signUp
pub async fn list_attendees<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    _caller: CurrentUser,
    Path(id): Path<String>,
) -> ActivityResult<ApiResponse<AttendeesResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let users = SignUpUseCase::new(state.repo.clone())
        .attendees(event_id(&id)?)
        .await?;

    Ok(ApiResponse::new(
        "Attendees fetched successfully",
        AttendeesResponse { users },
    ))
}

/// POST /event/{id}/signUp/update
pub async fn update_sign_up<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<SignUpUpdateRequest>,
) -> ActivityResult<ApiResponse<SignUpResponse>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let signup = SignUpUseCase::new(state.repo.clone())
        .update(caller.user_id, event_id(&id)?, req.confirmed, req.attended)
        .await?;

    Ok(ApiResponse::new(
        "Signup updated successfully",
        SignUpResponse { signup },
    ))
}

/// POST /event/{id}/signUp/delete
pub async fn cancel_sign_up<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ActivityResult<ApiResponse<()>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    SignUpUseCase::new(state.repo.clone())
        .cancel(caller.user_id, event_id(&id)?)
        .await?;

    Ok(ApiResponse::message("Signup deleted successfully"))
}

// ============================================================================
// Favourites
// ============================================================================

/// POST /event/{id}/favourite
pub async fn add_favourite<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ActivityResult<ApiResponse<()>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    FavouriteUseCase::new(state.repo.clone())
        .add(caller.user_id, event_id(&id)?)
        .await?;

    Ok(ApiResponse::message("Favourite added successfully"))
}

/// POST /event/{id}/favourite/delete
pub async fn remove_favourite<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ActivityResult<ApiResponse<()>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    FavouriteUseCase::new(state.repo.clone())
        .remove(caller.user_id, event_id(&id)?)
        .await?;

    Ok(ApiResponse::message("Event unfavourited successfully"))
}

// ============================================================================
// Causes
// ============================================================================

/// GET /causes/user
pub async fn selected_causes<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
) -> ActivityResult<ApiResponse<Vec<Cause>>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let causes = CauseUseCase::new(state.repo.clone())
        .selected(caller.user_id)
        .await?;

    Ok(ApiResponse::new("Selected causes fetched successfully", causes))
}

/// POST /causes/select
pub async fn select_causes<R, G>(
    State(state): State<ActivityAppState<R, G>>,
    caller: CurrentUser,
    Json(req): Json<DataBody<SelectCausesData>>,
) -> ActivityResult<ApiResponse<Vec<Cause>>>
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let causes = CauseUseCase::new(state.repo.clone())
        .select(caller.user_id, &req.data.ids())
        .await?;

    Ok(ApiResponse::new(
        format!("Successfully selected causes for user {}", caller.user_id),
        causes,
    ))
}

/// GET /causes
pub async fn list_causes<R>(
    State(state): State<CauseAppState<R>>,
) -> ActivityResult<ApiResponse<Vec<Cause>>>
where
    R: CauseRepository + Clone + Send + Sync + 'static,
{
    let causes = CauseUseCase::new(state.repo.clone()).list().await?;
    Ok(ApiResponse::new("Causes fetched successfully", causes))
}

/// GET /causes/{id}
pub async fn get_cause<R>(
    State(state): State<CauseAppState<R>>,
    Path(id): Path<String>,
) -> ActivityResult<ApiResponse<Cause>>
where
    R: CauseRepository + Clone + Send + Sync + 'static,
{
    let cause = CauseUseCase::new(state.repo.clone()).get(&id).await?;
    Ok(ApiResponse::new("Cause fetched successfully", cause))
}
