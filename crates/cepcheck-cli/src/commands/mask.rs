use anyhow::Result;

use cepcheck_core::cep::mask_cep;

pub fn run(input: &str) -> Result<()> {
    println!("{}", mask_cep(input));
    Ok(())
}
