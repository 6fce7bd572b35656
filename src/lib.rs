//! Kanban board kept in two spreadsheet tabs.
//!
//! The columns tab lists lane names in display order; the cards tab holds one
//! card per row. [`usecase::services::query_service::QueryService`] turns the
//! tabs into a [`domain::entities::board::Board`] and
//! [`usecase::services::edit_service::EditService`] writes changes back
//! through a [`usecase::ports::sheet::SheetClient`].

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod telemetry;
pub mod ui;
pub mod usecase;
