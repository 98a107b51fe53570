//! HTTP API handlers for anketa-web

pub mod error;
pub mod export;
pub mod health;
pub mod list;
pub mod store;
pub mod submit;

pub use error::{ApiError, ApiResult};
pub use export::{export_document, export_sheet};
pub use health::health_routes;
pub use list::{get_survey, list_surveys};
pub use store::SurveyStore;
pub use submit::submit_survey;
