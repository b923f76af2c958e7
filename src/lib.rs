//! Personal medication manager: a drug catalog API, interaction warnings,
//! dosing schedules and prescription OCR.
//!
//! Dosewise keeps a small catalog of drugs and pairwise (or larger)
//! interaction rules in SQLite and serves it read-only over HTTP. A terminal
//! shell lets a user assemble the list of drugs they currently take and keeps
//! two derived views up to date:
//!
//! | View | Derived from | Rule |
//! |------|--------------|------|
//! | **Risk finding** | personal list + interaction rules | first fully covered rule, red wins |
//! | **Schedule plan** | personal list instructions | dosing pattern → fixed clock slots |
//!
//! Drugs can also be added by photographing a prescription: the image is run
//! through Tesseract and every catalog name found in the text is added.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files and environment variables
//! - [`db`] - SQLite initialization, schema, migrations, and health checks
//! - [`catalog`] - Drug and interaction types, import, and the store handle
//! - [`api`] / [`server`] - The read-only HTTP API and its startup
//! - [`risk`] - Interaction risk evaluation
//! - [`schedule`] - Dosing patterns and the daily plan
//! - [`ocr`] - Image-to-text recognition
//! - [`matcher`] - Catalog names in recognized text
//! - [`session`] / [`client`] - Shell state and catalog loading

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod matcher;
pub mod ocr;
pub mod risk;
pub mod schedule;
pub mod server;
pub mod session;
