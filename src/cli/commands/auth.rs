//! Login and token verification commands.

use crate::auth::{AuthError, Authenticator, LoginRequest};
use crate::cli::LoginArgs;
use crate::config::AuthSettings;
use crate::error::{Error, Result};
use colored::Colorize;

/// Execute the login command.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the token cannot be
/// encoded.
pub fn login(args: &LoginArgs, json: bool) -> Result<()> {
    let auth = Authenticator::new(AuthSettings::from_env());
    let request = LoginRequest {
        username: args.username.clone(),
        password: args.password.clone(),
        remember_me: args.remember_me,
    };

    let response = auth.login(&request)?;

    if json {
        println!("{}", serde_json::to_string(&response)?);
    }

    if !response.success {
        return Err(Error::Auth(AuthError::Rejected(
            response
                .message
                .unwrap_or_else(|| "Login failed".to_string()),
        )));
    }

    if !json {
        if !auth.is_enabled() {
            println!("{}", "Authentication is disabled; issued a guest token.".yellow());
        }
        if let Some(token) = response.token {
            println!("{token}");
        }
    }

    Ok(())
}

/// Execute the verify command.
///
/// # Errors
///
/// Returns an error if the token is invalid or expired.
pub fn verify(token: &str, json: bool) -> Result<()> {
    let auth = Authenticator::new(AuthSettings::from_env());
    let check = auth.verify(token);

    if json {
        println!("{}", serde_json::to_string(&check)?);
    } else if check.valid {
        match &check.claims {
            Some(claims) => println!(
                "{} for {} (expires {})",
                "Valid".green(),
                claims.username,
                chrono::DateTime::from_timestamp(claims.exp, 0)
                    .map_or_else(|| claims.exp.to_string(), |t| t.to_rfc3339())
            ),
            None => println!("{} (authentication disabled)", "Valid".green()),
        }
    }

    if check.valid {
        Ok(())
    } else {
        Err(Error::Auth(AuthError::Rejected(
            "Token is invalid or expired".to_string(),
        )))
    }
}
