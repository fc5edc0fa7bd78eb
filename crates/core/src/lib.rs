pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;

pub use catalog::{
    Catalog, CatalogError, CatalogSummary, Classification, Classifier, ClassifierKind, Pick, Table,
};
pub use config::{AppConfig, ConfigError, LoadOptions};
pub use domain::{Context, ContextKind, ContextStore, Fragment, IntentRequest, Parameters, Response};
pub use errors::{ApplicationError, InterfaceError};
pub use flows::{FlowState, Slot};
