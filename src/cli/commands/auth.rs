use crate::cli::config::ClientSettings;
use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;

pub async fn health(settings: &ClientSettings, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = settings.anonymous().health().await?;
    match output_format {
        OutputFormat::Json => output_json(&body),
        OutputFormat::Text => {
            let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("unknown");
            println!("{} ({})", status, settings.url);
            Ok(())
        }
    }
}

pub async fn register(settings: &ClientSettings, output_format: OutputFormat) -> anyhow::Result<()> {
    let response = settings.authenticated()?.register().await?;
    match output_format {
        OutputFormat::Json => output_json(&response),
        OutputFormat::Text => output_success(
            &output_format,
            &format!("{} ({})", response.message, response.user.uid),
            None,
        ),
    }
}

pub async fn me(settings: &ClientSettings, output_format: OutputFormat) -> anyhow::Result<()> {
    let user = settings.authenticated()?.me().await?;
    match output_format {
        OutputFormat::Json => output_json(&user),
        OutputFormat::Text => {
            println!("UID:      {}", user.uid);
            println!("Email:    {}{}", user.email, if user.email_verified { " (verified)" } else { "" });
            if !user.display_name.is_empty() {
                println!("Name:     {}", user.display_name);
            }
            println!("Since:    {}", user.created_at.format("%Y-%m-%d %H:%M"));
            Ok(())
        }
    }
}
