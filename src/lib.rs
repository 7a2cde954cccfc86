pub mod api;
pub mod hn;
pub mod logging;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_HTTP_API: &str = "http_api";
