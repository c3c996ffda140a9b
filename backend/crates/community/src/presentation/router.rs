//! Community Routers
//!
//! Profiles, settings and notifications need a signed-in caller; the binary
//! adds the auth middleware with `route_layer`. Information entries are
//! public.

use axum::{
    Router,
    routing::{get, post},
};
use platform::geocode::{AnyGeocoder, Geocoder};
use std::sync::Arc;

use crate::domain::repository::{CommunityStore, InformationRepository};
use crate::infra::postgres::PgCommunityRepository;
use crate::presentation::handlers::{self, CommunityAppState, InformationAppState};

/// Create the signed-in community router with PostgreSQL repository
pub fn community_router(repo: PgCommunityRepository, geocoder: AnyGeocoder) -> Router {
    community_router_generic(repo, geocoder)
}

/// Create the public information router with PostgreSQL repository
pub fn information_router(repo: PgCommunityRepository) -> Router {
    information_router_generic(repo)
}

/// Create a generic signed-in community router for any repository and geocoder
pub fn community_router_generic<R, G>(repo: R, geocoder: G) -> Router
where
    R: CommunityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let state = CommunityAppState {
        repo: Arc::new(repo),
        geocoder: Arc::new(geocoder),
    };

    Router::new()
        .route(
            "/signup/individual",
            post(handlers::register_individual::<R, G>),
        )
        .route(
            "/signup/organisation",
            post(handlers::register_organisation::<R, G>),
        )
        .route("/profile", get(handlers::view_profile::<R, G>))
        .route("/profile/edit", post(handlers::edit_profile::<R, G>))
        .route(
            "/settings",
            get(handlers::get_settings::<R, G>).post(handlers::update_settings::<R, G>),
        )
        .route(
            "/notification",
            get(handlers::list_notifications::<R, G>).post(handlers::send_notification::<R, G>),
        )
        .with_state(state)
}

/// Create a generic public information router for any repository
pub fn information_router_generic<R>(repo: R) -> Router
where
    R: InformationRepository + Clone + Send + Sync + 'static,
{
    let state = InformationAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/information", get(handlers::get_information::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedGeocoder, MemoryCommunityStore};
    use axum::Extension;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use kernel::caller::CurrentUser;
    use kernel::id::UserId;
    use platform::geocode::GeoPoint;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_for(store: &MemoryCommunityStore, user_id: i32) -> Router {
        let geocoder = FixedGeocoder(Some(GeoPoint {
            lat: 51.5,
            long: -0.12,
        }));
        community_router_generic(store.clone(), geocoder)
            .merge(information_router_generic(store.clone()))
            .layer(Extension(CurrentUser {
                user_id: UserId::new(user_id),
            }))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn store() -> MemoryCommunityStore {
        let store = MemoryCommunityStore::default();
        store.add_user(1, "paul");
        store.add_user(2, "wwf");
        store.add_user(3, "paula");
        store
    }

    fn address() -> Value {
        json!({
            "addressLine1": "7 Queen Lane",
            "addressLine2": "",
            "townCity": "London",
            "countryState": "UK",
            "postCode": "WC2R 2LS"
        })
    }

    #[tokio::test]
    async fn test_register_and_view_individual() {
        let store = store();
        let app = app_for(&store, 1);
        let body = json!({"data": {"individual": {
            "title": "Mr.",
            "firstName": "Paul",
            "lastName": "Test",
            "dateOfBirth": "1990-05-17",
            "gender": "m",
            "phoneNumber": "07500000000",
            "address": address()
        }}});

        let (status, response) = send(&app, "POST", "/signup/individual", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK, "{response}");
        assert_eq!(response["message"], "Individual registration successful.");

        let (status, response) = send(&app, "POST", "/signup/individual", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["message"],
            "User already has an individual or organisation profile."
        );

        let (status, response) = send(&app, "GET", "/profile", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["message"], "Found individual profile for user.");
        assert_eq!(response["data"]["user"]["username"], "paul");
        assert_eq!(response["data"]["individual"]["firstName"], "Paul");
        assert_eq!(response["data"]["individual"]["address"]["lat"], 51.5);
        assert!(response["data"]["organisation"].is_null());
    }

    #[tokio::test]
    async fn test_register_organisation_and_view_from_other_user() {
        let store = store();
        let body = json!({"data": {"organisation": {
            "name": "WWF",
            "organisationNumber": "1081247",
            "organisationType": "NGO",
            "lowIncome": false,
            "exempt": true,
            "pocFirstName": "Paul",
            "pocLastName": "Test",
            "phoneNumber": "02070000000",
            "address": address()
        }}});

        let (status, response) = send(&app_for(&store, 2), "POST", "/signup/organisation", Some(body)).await;
        assert_eq!(status, StatusCode::OK, "{response}");
        assert_eq!(response["message"], "Organisation registration successful.");

        let app = app_for(&store, 1);
        let (status, response) = send(&app, "GET", "/profile?otherUserId=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["message"], "Found organisation profile for user.");
        assert_eq!(response["data"]["organisation"]["exempt"], true);

        let (status, _) = send(&app, "GET", "/profile?otherUserId=99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, response) = send(&app, "GET", "/profile", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["message"],
            "User has no individual or organisation profile."
        );
    }

    #[tokio::test]
    async fn test_edit_profile() {
        let store = store();
        store.add_individual_profile(1, "m");
        let app = app_for(&store, 1);

        let edit = json!({"data": {
            "user": {"username": "paul2"},
            "individual": {"bio": "Likes beaches"}
        }});
        let (status, response) = send(&app, "POST", "/profile/edit", Some(edit)).await;
        assert_eq!(status, StatusCode::OK, "{response}");
        assert_eq!(store.username(1).unwrap(), "paul2");

        let edit = json!({"data": {"individual": {"womenOnly": true}}});
        let (status, response) = send(&app, "POST", "/profile/edit", Some(edit)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["message"],
            "Only women can filter by women only events."
        );

        let edit = json!({"data": {"user": {"username": "paula"}}});
        let (status, _) = send(&app, "POST", "/profile/edit", Some(edit)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let edit = json!({"data": {"user": {"username": "x"}}});
        let (status, response) = send(&app, "POST", "/profile/edit", Some(edit)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Input validation failed");
        assert_eq!(store.username(1).unwrap(), "paul2");
    }

    #[tokio::test]
    async fn test_settings() {
        let app = app_for(&store(), 1);

        let (status, response) = send(&app, "GET", "/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["data"]["settings"]["email"], 0);

        let (status, response) = send(&app, "POST", "/settings", Some(json!({"notifications": 1}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["message"], "Settings updated successfully");
        assert_eq!(response["data"]["settings"]["notifications"], 1);
        assert_eq!(response["data"]["settings"]["email"], 0);

        let (status, _) = send(&app, "POST", "/settings", Some(json!({"email": 2}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notifications() {
        let store = store();
        let sender = app_for(&store, 1);

        let (status, response) = send(
            &sender,
            "POST",
            "/notification",
            Some(json!({"type": "Cancellation", "message": "Event cancelled", "receiverIds": [2, 3]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{response}");
        assert_eq!(response["message"], "Notification created successfully.");
        assert_eq!(response["data"]["notifications"].as_array().unwrap().len(), 2);

        let (status, response) = send(
            &sender,
            "POST",
            "/notification",
            Some(json!({"type": "Cancellation", "message": "Event cancelled"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Notification is not in right format");

        let (status, response) = send(&app_for(&store, 3), "GET", "/notification", None).await;
        assert_eq!(status, StatusCode::OK);
        let received = &response["data"]["notifications"][0];
        assert_eq!(received["type"], "Cancellation");
        assert_eq!(received["senderId"], 1);
    }

    #[tokio::test]
    async fn test_information_is_public() {
        let app = information_router_generic(store());

        let (status, response) = send(&app, "GET", "/information?type=privacyPolicy", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["message"], "Information entry fetched successfully");
        assert_eq!(response["data"]["type"], "privacyPolicy");

        let (status, _) = send(&app, "GET", "/information?type=recipes", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", "/information", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requires_caller() {
        let app = community_router_generic(store(), FixedGeocoder::default());
        let (status, _) = send(&app, "GET", "/settings", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
