//! Route definitions for the Kargo back-office
//!
//! Each protected route group declares the role it serves when it installs
//! the auth gate, so the verification secret is an explicit registration-time
//! decision rather than something inferred from the path at request time.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    handlers::{admin, bco, calendar, chat, chb, forwarder},
    middleware::{auth_middleware, RouteRole},
    AppState,
};
use shared::types::Role;

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/forwarder", forwarder_routes(state.clone()))
        .nest("/bco", bco_routes(state.clone()))
        .nest("/chb", chb_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        .nest("/chat", chat_routes(state))
}

/// Forwarder admin routes: public auth endpoints plus the guarded dashboard.
fn forwarder_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(forwarder::dashboard_data))
        .route("/user", get(forwarder::get_user))
        .route("/logout", get(forwarder::logout))
        .route("/update-profile", post(forwarder::update_profile))
        .route("/add-importer", post(forwarder::add_importer))
        .route("/edit-importer/:importer_id", put(forwarder::edit_importer))
        .route("/delete-importer", delete(forwarder::delete_importer))
        .route("/invite-importer", post(forwarder::invite_importer))
        .route("/add-calendar-event", post(calendar::add_event))
        .route("/get-calendar-event", post(calendar::get_events))
        .route("/delete-calendar-event", delete(calendar::delete_event))
        .route_layer(middleware::from_fn_with_state(
            RouteRole::only(state, Role::Forwarder),
            auth_middleware,
        ));

    Router::new()
        .route("/registration", post(forwarder::register))
        .route("/activate-user", post(forwarder::activate_user))
        .route("/login", post(forwarder::login))
        .route("/resend-otp", post(forwarder::resend_otp))
        .merge(protected)
}

/// BCO routes: invite-driven signup endpoints plus the guarded dashboard.
fn bco_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(bco::fetch_dashboard_data))
        .route("/user", get(bco::get_user))
        .route("/logout", get(bco::logout))
        .route("/update-profile", post(bco::update_profile))
        .route("/add", post(bco::add_supplier))
        .route("/edit/:supplier_id", put(bco::edit_supplier))
        .route("/delete", delete(bco::delete_supplier))
        .route("/invite", post(bco::invite_supplier))
        .route("/add-calendar-event", post(calendar::add_event))
        .route("/get-calendar-event", post(calendar::get_events))
        .route("/delete-calendar-event", delete(calendar::delete_event))
        .route_layer(middleware::from_fn_with_state(
            RouteRole::only(state, Role::Bco),
            auth_middleware,
        ));

    Router::new()
        .route("/get-user-details", post(bco::get_user_details))
        .route("/registration", post(bco::register))
        .route("/login", post(bco::login))
        .merge(protected)
}

/// CHB routes, structurally parallel to the forwarder auth surface.
fn chb_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/user", get(chb::get_user))
        .route("/logout", get(chb::logout))
        .route("/update-profile", post(chb::update_profile))
        .route("/add-calendar-event", post(calendar::add_event))
        .route("/get-calendar-event", post(calendar::get_events))
        .route("/delete-calendar-event", delete(calendar::delete_event))
        .route_layer(middleware::from_fn_with_state(
            RouteRole::only(state, Role::Chb),
            auth_middleware,
        ));

    Router::new()
        .route("/registration", post(chb::register))
        .route("/activate-user", post(chb::activate_user))
        .route("/login", post(chb::login))
        .route("/resend-otp", post(chb::resend_otp))
        .merge(protected)
}

/// Admin routes: direct signup plus cross-role management surfaces.
fn admin_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/user", get(admin::get_user))
        .route("/logout", get(admin::logout))
        .route("/forwarder/list", get(admin::list_forwarders))
        .route("/bco/list", get(admin::list_bcos))
        .route("/chb/list", get(admin::list_chbs))
        .route("/supplier/list", get(admin::list_suppliers))
        .route("/forwarder/delete", delete(admin::delete_forwarder))
        .route("/bco/delete", delete(admin::delete_bco))
        .route("/chb/delete", delete(admin::delete_chb))
        .route("/supplier/delete", delete(admin::delete_supplier))
        .route("/add-calendar-event", post(calendar::add_event))
        .route("/get-calendar-event", post(calendar::get_events))
        .route("/delete-calendar-event", delete(calendar::delete_event))
        .route_layer(middleware::from_fn_with_state(
            RouteRole::only(state, Role::Admin),
            auth_middleware,
        ));

    Router::new()
        .route("/registration", post(admin::register))
        .route("/login", post(admin::login))
        .merge(protected)
}

/// Chat proxy routes, open to every authenticated role.
fn chat_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/generate-token", post(chat::generate_token))
        .route("/create-user", post(chat::create_user))
        .route("/update-user", post(chat::update_user))
        .route("/users", post(chat::get_all_users))
        .route("/create-chat", post(chat::create_chat))
        .route("/send-message", post(chat::send_message))
        .route("/send-message-to-channel", post(chat::send_message_to_channel))
        .route("/add-members-to-channel", post(chat::add_members_to_channel))
        .route_layer(middleware::from_fn_with_state(
            RouteRole::any(state),
            auth_middleware,
        ))
}
