//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use kernel::caller::CurrentUser;
use kernel::response::{ApiResponse, DataBody};
use platform::geocode::Geocoder;

use crate::application::{
    EditProfileUseCase, InformationUseCase, NotificationUseCase, RegisterProfileUseCase,
    SettingsUseCase, ViewProfileUseCase,
};
use crate::domain::entity::information::Information;
use crate::domain::entity::profile::ProfileView;
use crate::domain::repository::{CommunityStore, InformationRepository};
use crate::error::CommunityResult;
use crate::presentation::dto::{
    IndividualSignUpData, InformationQuery, NotificationRequest, NotificationsResponse,
    OrganisationSignUpData, ProfileEditData, ProfileQuery, SettingsRequest, SettingsResponse,
};

/// Shared state for the signed-in community handlers
#[derive(Clone)]
pub struct CommunityAppState<R, G>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub geocoder: Arc<G>,
}

/// Shared state for the public information handler
#[derive(Clone)]
pub struct InformationAppState<R>
where
    R: InformationRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

// ============================================================================
// Registration
// ============================================================================

/// POST /signup/individual
pub async fn register_individual<R, G>(
    State(state): State<CommunityAppState<R, G>>,
    caller: CurrentUser,
    Json(req): Json<DataBody<IndividualSignUpData>>,
) -> CommunityResult<ApiResponse<()>>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let (individual, address) = req.data.individual.into_parts(&caller);
    RegisterProfileUseCase::new(state.repo.clone(), state.geocoder.clone())
        .individual(individual, address)
        .await?;

    Ok(ApiResponse::message("Individual registration successful."))
}

/// POST /signup/organisation
pub async fn register_organisation<R, G>(
    State(state): State<CommunityAppState<R, G>>,
    caller: CurrentUser,
    Json(req): Json<DataBody<OrganisationSignUpData>>,
) -> CommunityResult<ApiResponse<()>>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let (organisation, address) = req.data.organisation.into_parts(&caller);
    RegisterProfileUseCase::new(state.repo.clone(), state.geocoder.clone())
        .organisation(organisation, address)
        .await?;

    Ok(ApiResponse::message("Organisation registration successful."))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /profile
pub async fn view_profile<R, G>(
    State(state): State<CommunityAppState<R, G>>,
    caller: CurrentUser,
    Query(query): Query<ProfileQuery>,
) -> CommunityResult<ApiResponse<ProfileView>>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let profile = ViewProfileUseCase::new(state.repo.clone())
        .execute(caller.user_id, query.other_user_id.as_deref())
        .await?;

    let message = if profile.is_individual() {
        "Found individual profile for user."
    } else {
        "Found organisation profile for user."
    };
    Ok(ApiResponse::new(message, profile))
}

/// POST /profile/edit
pub async fn edit_profile<R, G>(
    State(state): State<CommunityAppState<R, G>>,
    caller: CurrentUser,
    Json(req): Json<DataBody<ProfileEditData>>,
) -> CommunityResult<ApiResponse<()>>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    EditProfileUseCase::new(state.repo.clone(), state.geocoder.clone())
        .execute(caller.user_id, req.data.into())
        .await?;

    Ok(ApiResponse::message(
        "Operation successful. Please GET the view profile endpoint to see the updated profile record.",
    ))
}

// ============================================================================
// Settings
// ============================================================================

/// GET /settings
pub async fn get_settings<R, G>(
    State(state): State<CommunityAppState<R, G>>,
    caller: CurrentUser,
) -> CommunityResult<ApiResponse<SettingsResponse>>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let settings = SettingsUseCase::new(state.repo.clone())
        .get(caller.user_id)
        .await?;

    Ok(ApiResponse::new(
        "Settings fetched successfully",
        SettingsResponse { settings },
    ))
}

/// POST /settings
pub async fn update_settings<R, G>(
    State(state): State<CommunityAppState<R, G>>,
    caller: CurrentUser,
    Json(req): Json<SettingsRequest>,
) -> CommunityResult<ApiResponse<SettingsResponse>>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let settings = SettingsUseCase::new(state.repo.clone())
        .update(caller.user_id, req.email, req.notifications)
        .await?;

    Ok(ApiResponse::new(
        "Settings updated successfully",
        SettingsResponse { settings },
    ))
}

// ============================================================================
// Notifications
// ============================================================================

/// POST /notification
pub async fn send_notification<R, G>(
    State(state): State<CommunityAppState<R, G>>,
    caller: CurrentUser,
    Json(req): Json<NotificationRequest>,
) -> CommunityResult<ApiResponse<NotificationsResponse>>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let notifications = NotificationUseCase::new(state.repo.clone())
        .send(caller.user_id, req.into())
        .await?;

    Ok(ApiResponse::new(
        "Notification created successfully.",
        NotificationsResponse { notifications },
    ))
}

/// GET /notification
pub async fn list_notifications<R, G>(
    State(state): State<CommunityAppState<R, G>>,
    caller: CurrentUser,
) -> CommunityResult<ApiResponse<NotificationsResponse>>
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let notifications = NotificationUseCase::new(state.repo.clone())
        .received(caller.user_id)
        .await?;

    Ok(ApiResponse::new(
        "Notifications fetched successfully.",
        NotificationsResponse { notifications },
    ))
}

// ============================================================================
// Information
// ============================================================================

/// GET /information
pub async fn get_information<R>(
    State(state): State<InformationAppState<R>>,
    Query(query): Query<InformationQuery>,
) -> CommunityResult<ApiResponse<Information>>
where
    R: InformationRepository + Clone + Send + Sync + 'static,
{
    let information = InformationUseCase::new(state.repo.clone())
        .get(query.kind.as_deref())
        .await?;

    Ok(ApiResponse::new(
        "Information entry fetched successfully",
        information,
    ))
}
