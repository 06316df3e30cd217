use anyhow::Result;
use glossa_core::model::ModelDescription;
use glossa_core::safety::HarmBlockThreshold;
use glossa_infrastructure::{ConfigService, GlossaPaths};
use glossa_interaction::{AccessOnlyInput, GeminiAccess, GeminiDialect, GeminiModelCatalog};

pub async fn list(
    paths: &GlossaPaths,
    key: Option<String>,
    host: Option<String>,
    min_safety: Option<HarmBlockThreshold>,
) -> Result<()> {
    let config = ConfigService::new(paths).get_config();
    let input = AccessOnlyInput {
        access: GeminiAccess {
            dialect: GeminiDialect::Gemini,
            gemini_key: key.unwrap_or_default(),
            gemini_host: host.unwrap_or(config.gemini.host),
            min_safety_level: min_safety.unwrap_or(config.gemini.min_safety_level),
        },
    };

    let response = GeminiModelCatalog::from_env().list_models(&input).await?;

    if response.models.is_empty() {
        println!("No models available.");
        return Ok(());
    }
    for model in &response.models {
        println!("{}", format_model_line(model));
    }
    Ok(())
}

fn format_model_line(model: &ModelDescription) -> String {
    let context = model
        .context_window
        .map(|tokens| format!("{}k", tokens / 1000))
        .unwrap_or_else(|| "-".to_string());
    let hidden = if model.hidden { "  (hidden)" } else { "" };
    format!("{:<45} {:<35} {:>8}{}", model.id, model.label, context, hidden)
}
