//! HTTP API handlers for octview-web

pub mod activity;
pub mod admin;
pub mod answers;
pub mod catalog;
pub mod error;
pub mod health;
pub mod images;
pub mod ui;

pub use activity::log_activity;
pub use admin::{activity_logs, all_answers, answer_summary};
pub use answers::{delete_feature_answers, get_feature_answers, save_feature_answers};
pub use catalog::{image_detail, list_categories, list_category_images};
pub use error::ApiError;
pub use health::health_routes;
pub use images::serve_image;
pub use ui::{serve_app_js, serve_index};
