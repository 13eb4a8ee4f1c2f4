mod lookup;
mod mask;
mod models;
mod render;

pub use lookup::{CepLookup, ViaCepClient};
pub use mask::{clean_cep, mask_cep, CEP_DIGITS};
pub use models::{Address, Category, ResultPayload, ViaCepResponse, NOT_AVAILABLE};
pub use render::{render, RenderedResult};
