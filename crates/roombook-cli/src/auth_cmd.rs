//! Auth subcommands: login, register, logout, whoami.

use std::io::{self, Write};

use crate::context::AppContext;
use roombook_core::validation::RegistrationForm;

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Sign in and persist the session.
    Login {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
    /// Create an account and sign in.
    Register {
        /// First name.
        first_name: String,
        /// Last name.
        last_name: String,
        /// Account email.
        email: String,
        /// Account password.
        password: String,
        /// Password confirmation (defaults to the password).
        #[arg(long)]
        confirm: Option<String>,
        /// Contact phone.
        #[arg(long)]
        phone: Option<String>,
    },
    /// Drop the stored session.
    Logout,
    /// Show the current session.
    Whoami,
}

/// Execute an auth subcommand.
pub async fn run(ctx: &AppContext, action: AuthAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        AuthAction::Login { email, password } => {
            match ctx.session.login(&email, &password).await {
                Ok(snapshot) => {
                    let name = snapshot
                        .user
                        .as_ref()
                        .map_or_else(|| email.clone(), |u| u.display_name());
                    writeln!(out, "Signed in as {name}.")?;
                }
                Err(err) => writeln!(out, "Login failed: {}", err.user_message())?,
            }
        }
        AuthAction::Register {
            first_name,
            last_name,
            email,
            password,
            confirm,
            phone,
        } => {
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                password: password.clone(),
                confirm_password: confirm.unwrap_or(password),
                phone,
            };
            match ctx.session.register(&form).await {
                Ok(snapshot) => {
                    let name = snapshot
                        .user
                        .as_ref()
                        .map_or_else(|| form.email.clone(), |u| u.display_name());
                    writeln!(out, "Account created. Signed in as {name}.")?;
                }
                Err(err) => writeln!(out, "Registration failed: {}", err.user_message())?,
            }
        }
        AuthAction::Logout => {
            ctx.session.logout();
            writeln!(out, "Signed out.")?;
        }
        AuthAction::Whoami => {
            let snapshot = ctx.session.snapshot();
            if !snapshot.authenticated {
                writeln!(out, "Not signed in.")?;
                return Ok(());
            }
            // Refresh from the backend; this is also where a stale stored
            // token surfaces as a 401.
            match ctx.api.me().await {
                Ok(user) => {
                    writeln!(out, "{} <{}>", user.display_name(), user.email)?;
                    writeln!(out, "Role: {}", user.role.as_str())?;
                }
                Err(err) if err.is_unauthorized() => {
                    writeln!(out, "Сессия истекла. Войдите снова.")?;
                }
                Err(err) => {
                    writeln!(out, "Failed to refresh profile: {}", err.user_message())?;
                    if let Some(user) = snapshot.user {
                        writeln!(out, "Stored: {} <{}>", user.display_name(), user.email)?;
                    }
                }
            }
        }
    }
    Ok(())
}
