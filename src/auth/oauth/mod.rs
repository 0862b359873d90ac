//! OAuth相关模块

pub mod callback;

pub use callback::{parse_oauth_callback_url, OAuthCallbackParams};
