use anyhow::{bail, Result};

use cepcheck_core::cep::render;
use cepcheck_core::{
    AppConfig, LookupController, LookupView, ResultPayload, ServicePolicy, SubmitOutcome,
    ViaCepClient,
};

const DEFAULT_WIDTH: u16 = 80;

/// Prints each shown result to stdout
struct ConsoleView {
    json: bool,
    width: usize,
}

impl LookupView for ConsoleView {
    fn enter_busy(&mut self) {
        tracing::debug!("Verificando...");
    }

    fn leave_busy(&mut self) {}

    fn hide_result(&mut self) {}

    fn show_result(&mut self, payload: &ResultPayload) {
        if self.json {
            match serde_json::to_string_pretty(payload) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!("Failed to encode result: {}", e),
            }
            return;
        }

        let rendered = render(payload, self.width);
        println!("[{}] {}", rendered.category.css_class(), rendered.title);
        for line in rendered.body {
            println!("{}", line);
        }
    }
}

pub async fn run(config: &AppConfig, cep: &str, json: bool) -> Result<()> {
    let client = ViaCepClient::new(config)?;
    let controller = LookupController::new(client, ServicePolicy::from_config(&config.service));

    let width = crossterm::terminal::size()
        .map(|(w, _)| w)
        .unwrap_or(DEFAULT_WIDTH);
    let mut view = ConsoleView {
        json,
        width: width as usize,
    };

    match controller.submit(cep, &mut view).await {
        SubmitOutcome::Failed => bail!("Lookup for {} failed", cep),
        outcome => {
            tracing::debug!("Check finished: {:?}", outcome);
            Ok(())
        }
    }
}
