pub mod account_service;
pub mod request_service;
pub mod session_service;
