use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::JwtAuth;
use crate::cli::{utils::output_success, OutputFormat};

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a token for a user id with the configured secret")]
    Issue {
        #[arg(long, help = "User id to embed in the token")]
        user_id: i32,
        #[arg(long, help = "Username to embed in the token")]
        username: String,
    },

    #[command(about = "Verify a token and print its claims")]
    Verify {
        #[arg(help = "Encoded JWT")]
        token: String,
    },
}

/// Only the token settings are needed here, so `DATABASE_URL` is not required.
fn token_authority() -> anyhow::Result<JwtAuth> {
    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
    let expiry_hours = match std::env::var("SECURITY_JWT_EXPIRY_HOURS") {
        Ok(v) => v.parse().context("SECURITY_JWT_EXPIRY_HOURS must be an integer")?,
        Err(_) => 24,
    };
    Ok(JwtAuth::new(&secret, expiry_hours)?)
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let tokens = token_authority()?;

    match cmd {
        TokenCommands::Issue { user_id, username } => {
            let token = tokens.issue(user_id, &username)?;
            match output_format {
                OutputFormat::Json => {
                    output_success(output_format, "Token issued", Some(json!({ "token": token })))
                }
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
        TokenCommands::Verify { token } => {
            let claims = tokens.verify(&token)?;
            output_success(
                output_format,
                &format!("Token valid for user {} ({})", claims.id, claims.username),
                Some(serde_json::to_value(&claims)?),
            )
        }
    }
}
