use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for address fields the API left out
pub const NOT_AVAILABLE: &str = "N/A";

/// Body returned by `GET /ws/{cep}/json/`
///
/// Unknown fields (complemento, ibge, ddd, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViaCepResponse {
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    /// Not-found marker; seen as `true` and as `"true"` in the wild
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erro: Option<Value>,
}

impl ViaCepResponse {
    /// Whether the API flagged the CEP as unknown
    pub fn is_not_found(&self) -> bool {
        self.erro.as_ref().is_some_and(is_truthy)
    }

    pub fn address(&self) -> Address<'_> {
        Address { response: self }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display view over a response, with `N/A` for missing fields
#[derive(Debug, Clone, Copy)]
pub struct Address<'a> {
    response: &'a ViaCepResponse,
}

impl<'a> Address<'a> {
    pub fn logradouro(&self) -> &'a str {
        or_placeholder(&self.response.logradouro)
    }

    pub fn bairro(&self) -> &'a str {
        or_placeholder(&self.response.bairro)
    }

    pub fn localidade(&self) -> &'a str {
        or_placeholder(&self.response.localidade)
    }

    pub fn uf(&self) -> &'a str {
        or_placeholder(&self.response.uf)
    }

    pub fn cep(&self) -> &'a str {
        or_placeholder(&self.response.cep)
    }

    /// Markup block appended to found-address messages
    pub fn to_markup(&self) -> String {
        format!(
            "<div class=\"address-info\"><strong>Endereço encontrado:</strong><br>{}<br>{} - {}/{}<br>CEP: {}</div>",
            escape_html(self.logradouro()),
            escape_html(self.bairro()),
            escape_html(self.localidade()),
            escape_html(self.uf()),
            escape_html(self.cep()),
        )
    }
}

fn or_placeholder(field: &Option<String>) -> &str {
    match field.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => NOT_AVAILABLE,
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Visual classification of a lookup result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Success,
    Error,
    Info,
}

impl Category {
    /// Style class name, as used by the result container
    pub fn css_class(&self) -> &'static str {
        match self {
            Category::Success => "success",
            Category::Error => "error",
            Category::Info => "info",
        }
    }
}

/// What the result container shows: category, title and a message that may
/// carry markup (the address block)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub category: Category,
    pub title: String,
    pub message: String,
}

impl ResultPayload {
    pub fn new(category: Category, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Cleaned input does not have eight digits
    pub fn invalid_cep() -> Self {
        Self::new(
            Category::Error,
            "CEP Inválido",
            "Por favor, digite um CEP válido com 8 dígitos.",
        )
    }

    /// API answered with the not-found marker
    pub fn not_found() -> Self {
        Self::new(
            Category::Error,
            "CEP não encontrado",
            "O CEP informado não foi encontrado na base dos Correios.",
        )
    }

    /// Transport or parse failure; the cause is never shown
    pub fn lookup_failed() -> Self {
        Self::new(
            Category::Error,
            "Erro na consulta",
            "Não foi possível consultar o CEP. Verifique sua conexão e tente novamente.",
        )
    }

    /// Address lies inside the served region
    pub fn served(address: &Address<'_>) -> Self {
        Self::new(
            Category::Success,
            "✓ Ótima notícia!",
            format!(
                "Atendemos sua região! Entre em contato conosco para começar seu projeto.{}",
                address.to_markup()
            ),
        )
    }

    /// Address found but outside the served region
    pub fn not_served(address: &Address<'_>, region_name: &str) -> Self {
        Self::new(
            Category::Info,
            "Região não atendida",
            format!(
                "No momento atendemos apenas o estado de {}. Sua região: {}/{}.{}<br><br>Entre em contato conosco para projetos especiais!",
                escape_html(region_name),
                escape_html(address.localidade()),
                escape_html(address.uf()),
                address.to_markup()
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paulista() -> ViaCepResponse {
        serde_json::from_str(
            r#"{
                "cep": "01310-930",
                "logradouro": "Avenida Paulista",
                "complemento": "2100",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP",
                "ibge": "3550308",
                "ddd": "11"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_not_found_variants() {
        let parse = |body: &str| serde_json::from_str::<ViaCepResponse>(body).unwrap();

        assert!(parse(r#"{"erro": true}"#).is_not_found());
        assert!(parse(r#"{"erro": "true"}"#).is_not_found());
        assert!(parse(r#"{"erro": 1}"#).is_not_found());
        assert!(!parse(r#"{"erro": false}"#).is_not_found());
        assert!(!parse(r#"{"erro": ""}"#).is_not_found());
        assert!(!parse(r#"{"erro": null}"#).is_not_found());
        assert!(!paulista().is_not_found());
    }

    #[test]
    fn test_address_placeholders() {
        let response = ViaCepResponse {
            cep: Some("12345-678".to_string()),
            logradouro: Some("".to_string()),
            bairro: None,
            localidade: Some("Cidade".to_string()),
            uf: Some("MG".to_string()),
            erro: None,
        };
        let address = response.address();
        assert_eq!(address.logradouro(), NOT_AVAILABLE);
        assert_eq!(address.bairro(), NOT_AVAILABLE);
        assert_eq!(address.localidade(), "Cidade");

        // Only an empty value falls back; whitespace is kept as sent
        let spaced = ViaCepResponse {
            bairro: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(spaced.address().bairro(), " ");

        let empty = ViaCepResponse::default();
        let markup = empty.address().to_markup();
        assert!(markup.contains("N/A<br>N/A - N/A/N/A<br>CEP: N/A"));
    }

    #[test]
    fn test_address_markup() {
        let response = paulista();
        assert_eq!(
            response.address().to_markup(),
            "<div class=\"address-info\"><strong>Endereço encontrado:</strong><br>Avenida Paulista<br>Bela Vista - São Paulo/SP<br>CEP: 01310-930</div>"
        );
    }

    #[test]
    fn test_markup_escapes_api_values() {
        let response = ViaCepResponse {
            logradouro: Some("<script>x</script>".to_string()),
            ..Default::default()
        };
        let markup = response.address().to_markup();
        assert!(markup.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!markup.contains("<script>"));
    }

    #[test]
    fn test_payload_messages() {
        let response = paulista();
        let served = ResultPayload::served(&response.address());
        assert_eq!(served.category, Category::Success);
        assert!(served.message.starts_with("Atendemos sua região!"));

        let rio = ViaCepResponse {
            localidade: Some("Rio de Janeiro".to_string()),
            uf: Some("RJ".to_string()),
            ..Default::default()
        };
        let info = ResultPayload::not_served(&rio.address(), "São Paulo");
        assert_eq!(info.category, Category::Info);
        assert!(info.message.contains("Sua região: Rio de Janeiro/RJ."));
        assert!(info.message.ends_with("Entre em contato conosco para projetos especiais!"));
    }

    #[test]
    fn test_category_serialization() {
        let payload = ResultPayload::invalid_cep();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["category"], "error");
        assert_eq!(Category::Info.css_class(), "info");
    }
}
