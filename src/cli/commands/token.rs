use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::{Identity, SharedSecretVerifier};
use crate::cli::utils::output_json;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(help = "User ID to place in the token subject")]
    pub uid: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, help = "Mark the email as verified")]
    pub verified: bool,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, env = "AUTH_JWT_SECRET", hide_env_values = true, help = "Signing secret shared with the server")]
    pub secret: String,

    #[arg(long, env = "AUTH_JWT_EXPIRY_HOURS", default_value_t = 24)]
    pub hours: u64,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut identity = Identity::new(args.uid);
    if let Some(email) = args.email {
        identity = identity.with_email(email, args.verified);
    }
    if let Some(name) = args.name {
        identity = identity.with_display_name(name);
    }

    let token = SharedSecretVerifier::new(args.secret, args.hours)
        .issue(&identity)
        .context("Failed to sign token")?;

    match output_format {
        OutputFormat::Json => output_json(&json!({ "token": token, "uid": identity.uid })),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
