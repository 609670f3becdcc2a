pub mod app_state;
pub mod http_error;
pub mod mail;
pub mod routes;
