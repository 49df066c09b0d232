pub mod api_utils;
pub mod notify;
pub mod rest_provider;
