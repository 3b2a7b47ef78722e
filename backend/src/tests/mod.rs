mod common;

mod api_test;
mod chat_service_test;
