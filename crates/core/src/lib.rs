//! Domain core of the ready reckoner: the feature table, the filter engine,
//! the editable view and session state machine, plus the file-backed
//! sources and stores. Nothing here touches the database.

pub mod annotation_file;
pub mod cache;
pub mod csv_source;
pub mod error;
pub mod feature_flag;
pub mod filter;
pub mod reference;
pub mod session;
pub mod status;
pub mod store;
pub mod table;
pub mod types;
pub mod view;
