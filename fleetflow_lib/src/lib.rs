//! Library layer for FleetFlow: list and detail data access, print
//! pagination, debounced search, the dashboard figures, the auth session
//! and configuration.
//!
//! Wraps the `fleetflow_api` client. Lists and detail views go through
//! [`ListResource`] and [`SingleResource`], which keep the latest server
//! state and refetch after every mutation.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod datetime;
pub mod debounce;
pub mod documents;
pub mod error;
pub mod list;
pub mod print;
pub mod single;

pub use fleetflow_api;
pub use fleetflow_api::types;
pub use fleetflow_api::{Client, ListQuery, Query};

pub use auth::AuthSession;
pub use config::Config;
pub use dashboard::{load_dashboard, DashboardStats};
pub use debounce::Debouncer;
pub use error::FleetError;
pub use list::{ListResource, ListState};
pub use print::{paginate, print_pages, PrintPage};
pub use single::{SingleResource, SingleState};
