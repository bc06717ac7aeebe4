use crate::config::Config;
use crate::llm::GeminiProvider;
use crate::ui::style as ui;

pub fn render_status(config: &Config) -> String {
    let lines = [
        format!("◆ {}", ui::header("Parley status")),
        String::new(),
        format!("Version       {}", env!("CARGO_PKG_VERSION")),
        format!("Config        {}", ui::value(config.config_path.display())),
        format!("Workspace     {}", ui::value(config.workspace_dir.display())),
        String::new(),
        format!(
            "Model         {}",
            config.default_model.as_deref().unwrap_or("(default)")
        ),
        format!("Temperature   {:.2}", config.default_temperature),
        format!("Display name  {}", config.display_name),
        format!(
            "Transcripts   {}",
            ui::value(config.transcript_dir().display())
        ),
        format!(
            "Auth          {}",
            GeminiProvider::auth_source(config.api_key.as_deref())
        ),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::render_status;
    use crate::config::Config;

    #[test]
    fn render_status_covers_key_fields() {
        let mut config = Config::default();
        config.default_model = Some("gemini-pro".into());

        let rendered = render_status(&config);

        assert!(rendered.contains("gemini-pro"));
        assert!(rendered.contains("Transcripts"));
        assert!(rendered.contains("Auth"));
        assert!(rendered.contains(env!("CARGO_PKG_VERSION")));
    }
}
