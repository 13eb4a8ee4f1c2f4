pub mod cep;
pub mod config;
pub mod controller;
pub mod error;

pub use cep::{Category, CepLookup, ResultPayload, ViaCepClient, ViaCepResponse};
pub use config::{AppConfig, EasingType, ScrollConfig};
pub use controller::{LookupController, LookupView, ServicePolicy, SubmitOutcome};
pub use error::{Error, Result};
