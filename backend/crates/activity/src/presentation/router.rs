//! Activity Routers
//!
//! Everything under `/event` plus the signed-in cause routes expects the auth
//! middleware to have run; the binary adds it with `route_layer`. Browsing
//! causes is public.

use axum::{
    Router,
    routing::{get, post},
};
use platform::geocode::{AnyGeocoder, Geocoder};
use std::sync::Arc;

use crate::application::config::ActivityConfig;
use crate::domain::repository::{ActivityStore, CauseRepository};
use crate::infra::postgres::PgActivityRepository;
use crate::presentation::handlers::{self, ActivityAppState, CauseAppState};

/// Create the signed-in activity router with PostgreSQL repository
pub fn activity_router(
    repo: PgActivityRepository,
    geocoder: AnyGeocoder,
    config: ActivityConfig,
) -> Router {
    activity_router_generic(repo, geocoder, config)
}

/// Create the public cause router with PostgreSQL repository
pub fn causes_router(repo: PgActivityRepository) -> Router {
    causes_router_generic(repo)
}

/// Create a generic signed-in activity router for any repository and geocoder
pub fn activity_router_generic<R, G>(repo: R, geocoder: G, config: ActivityConfig) -> Router
where
    R: ActivityStore,
    G: Geocoder + Clone + Send + Sync + 'static,
{
    let state = ActivityAppState {
        repo: Arc::new(repo),
        geocoder: Arc::new(geocoder),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/event",
            get(handlers::list_events::<R, G>).post(handlers::create_event::<R, G>),
        )
        .route("/event/causes", get(handlers::list_events_by_causes::<R, G>))
        .route("/event/favourites", get(handlers::list_favourites::<R, G>))
        .route("/event/going", get(handlers::list_going::<R, G>))
        .route(
            "/event/signUp/history",
            get(handlers::signup_history::<R, G>),
        )
        .route("/event/{id}", get(handlers::get_event::<R, G>))
        .route("/event/update/{id}", post(handlers::update_event::<R, G>))
        .route("/event/{id}/delete", post(handlers::delete_event::<R, G>))
        .route(
            "/event/{id}/signUp",
            get(handlers::list_attendees::<R, G>).post(handlers::sign_up::<R, G>),
        )
        .route(
            "/event/{id}/signUp/update",
            post(handlers::update_sign_up::<R, G>),
        )
        .route(
            "/event/{id}/signUp/delete",
            post(handlers::cancel_sign_up::<R, G>),
        )
        .route(
            "/event/{id}/favourite",
            post(handlers::add_favourite::<R, G>),
        )
        .route(
            "/event/{id}/favourite/delete",
            post(handlers::remove_favourite::<R, G>),
        )
        .route("/causes/user", get(handlers::selected_causes::<R, G>))
        .route("/causes/select", post(handlers::select_causes::<R, G>))
        .with_state(state)
}

/// Create a generic public cause router for any repository
pub fn causes_router_generic<R>(repo: R) -> Router
where
    R: CauseRepository + Clone + Send + Sync + 'static,
{
    let state = CauseAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/causes", get(handlers::list_causes::<R>))
        .route("/causes/{id}", get(handlers::get_cause::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedGeocoder, MemoryActivityStore};
    use axum::Extension;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use kernel::caller::CurrentUser;
    use kernel::id::UserId;
    use platform::geocode::GeoPoint;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const BUSH_HOUSE: (f64, f64) = (51.5128, -0.1177);

    fn app_for(store: &MemoryActivityStore, user_id: i32) -> Router {
        let geocoder = FixedGeocoder(Some(GeoPoint {
            lat: 51.5,
            long: -0.12,
        }));
        activity_router_generic(store.clone(), geocoder, ActivityConfig::development())
            .merge(causes_router_generic(store.clone()))
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

    fn store() -> MemoryActivityStore {
        let store = MemoryActivityStore::default();
        store.add_individual(1, 1, Some(BUSH_HOUSE));
        store.add_organisation(2, Some(BUSH_HOUSE));
        store
    }

    #[tokio::test]
    async fn test_list_events_with_filters_and_pages() {
        let store = store();
        store.add_event(2, 1, BUSH_HOUSE, &[1]);
        store.add_event(2, 2, BUSH_HOUSE, &[2]);
        store.add_event(2, 3, BUSH_HOUSE, &[3]);
        let app = app_for(&store, 1);

        let (status, body) = send(&app, "GET", "/event?pageSize=2&currentPage=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Events fetched successfully");
        assert_eq!(body["data"]["meta"]["count"], 3);
        assert_eq!(body["data"]["meta"]["pageCount"], 2);
        assert_eq!(body["data"]["events"][0]["id"], 3);
        assert_eq!(body["data"]["events"][0]["spotsRemaining"], 3);

        let (status, body) = send(&app, "GET", "/event?filter%5B%5D=%21physical", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No events found");

        let (status, body) = send(&app, "GET", "/event?filter%5B%5D=gardening", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid filter: gardening");
    }

    #[tokio::test]
    async fn test_events_grouped_by_selected_causes() {
        let store = store();
        store.add_event(2, 1, BUSH_HOUSE, &[1, 2]);
        store.add_event(2, 2, BUSH_HOUSE, &[3]);
        store.select_causes(1, &[1, 2]);
        let app = app_for(&store, 1);

        let (status, body) = send(&app, "GET", "/event/causes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["animals"][0]["id"], 1);
        assert_eq!(body["data"]["poverty"][0]["id"], 1);
        assert!(body["data"]["education"].is_null());
    }

    #[tokio::test]
    async fn test_create_get_update_delete_event() {
        let store = store();
        let app = app_for(&store, 2);

        let event = json!({
            "name": "Beach clean",
            "spots": 4,
            "date": "2040-03-25T12:00:00Z",
            "causes": [1],
            "address": {"address1": "Strand", "postcode": "WC2R 2LS", "city": "London"}
        });
        let (status, body) = send(&app, "POST", "/event", Some(event.clone())).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "Event created successfully");
        assert_eq!(body["data"]["causes"][0]["name"], "animals");
        let id = body["data"]["event"]["id"].as_i64().unwrap();
        let address_id = body["data"]["event"]["addressId"].as_i64().unwrap();

        let (status, body) = send(&app, "GET", &format!("/event/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["address"]["lat"], 51.5);
        assert_eq!(body["data"]["spotsRemaining"], 4);

        let mut update = event.clone();
        update["name"] = json!("River clean");
        update["address"]["id"] = json!(address_id);
        let (status, body) = send(&app, "POST", &format!("/event/update/{id}"), Some(update.clone())).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["event"]["name"], "River clean");

        let other = app_for(&store, 1);
        let (status, body) = send(&other, "POST", &format!("/event/update/{id}"), Some(update)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Only the event creator can change this event.");

        let (status, _) = send(&app, "POST", &format!("/event/{id}/delete"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, "GET", &format!("/event/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No event with given id");
    }

    #[tokio::test]
    async fn test_malformed_event_id() {
        let app = app_for(&store(), 1);
        let (status, body) = send(&app, "GET", "/event/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Event ID specified is in wrong format");
    }

    #[tokio::test]
    async fn test_sign_up_and_attendees() {
        let store = store();
        let event_id = store.add_event(2, 3, BUSH_HOUSE, &[]);
        let app = app_for(&store, 1);
        let uri = format!("/event/{event_id}/signUp");

        let (status, body) = send(&app, "POST", &uri, Some(json!({"confirmed": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["signup"]["eventId"], event_id.value());

        let (status, _) = send(&app, "POST", &uri, Some(json!({"confirmed": true}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["users"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            "POST",
            &format!("{uri}/update"),
            Some(json!({"confirmed": true, "attended": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Signup updated successfully");

        let (status, body) = send(&app, "GET", "/event/going", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["events"][0]["going"], true);

        let org = app_for(&store, 2);
        let (status, body) = send(&org, "POST", &uri, Some(json!({"confirmed": true}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Only individuals can sign up to events.");
    }

    #[tokio::test]
    async fn test_cancel_sign_up() {
        let store = store();
        let event_id = store.add_event(2, 3, BUSH_HOUSE, &[]);
        let app = app_for(&store, 1);
        let cancel = format!("/event/{event_id}/signUp/delete");

        let (status, body) = send(&app, "POST", &cancel, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No signup for this event.");

        let signup = format!("/event/{event_id}/signUp");
        send(&app, "POST", &signup, Some(json!({"confirmed": true}))).await;
        let (status, body) = send(&app, "POST", &cancel, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Signup deleted successfully");
        assert!(store.signups().is_empty());

        let (status, _) = send(&app_for(&store, 2), "POST", &cancel, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, "POST", "/event/abc/signUp/delete", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_favourites() {
        let store = store();
        let event_id = store.add_event(2, 3, BUSH_HOUSE, &[]);
        let app = app_for(&store, 1);

        let (status, body) = send(&app, "POST", &format!("/event/{event_id}/favourite"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Favourite added successfully");

        let (_, body) = send(&app, "GET", "/event/favourites", None).await;
        assert_eq!(body["data"]["events"][0]["favourited"], true);

        let uri = format!("/event/{event_id}/favourite/delete");
        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Event unfavourited successfully");
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_causes() {
        let store = store();
        let app = app_for(&store, 1);

        let (status, body) = send(&app, "GET", "/causes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (status, body) = send(&app, "GET", "/causes/x", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "ID specified is in wrong format");

        let (status, body) = send(&app, "GET", "/causes/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No cause with given id");

        let (status, body) = send(
            &app,
            "POST",
            "/causes/select",
            Some(json!({"data": {"causes": []}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "No causes were specified in the body");

        let (status, body) = send(
            &app,
            "POST",
            "/causes/select",
            Some(json!({"data": {"causes": [{"id": 3}]}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully selected causes for user 1");

        let (_, body) = send(&app, "GET", "/causes/user", None).await;
        assert_eq!(body["data"][0]["name"], "education");
    }

    #[tokio::test]
    async fn test_requires_caller() {
        let app = activity_router_generic(
            store(),
            FixedGeocoder::default(),
            ActivityConfig::development(),
        );
        let (status, _) = send(&app, "GET", "/event/going", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
