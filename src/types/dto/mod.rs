// DTOs - request and response bodies exposed through the OpenAPI surface
pub mod auth;
pub mod calendar;
pub mod common;
pub mod items;
pub mod projects;
pub mod reference;
pub mod reports;
pub mod seed;
pub mod users;
