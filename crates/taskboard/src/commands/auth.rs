//! Account command handlers: register, login, logout, whoami.

use std::fmt::Write as _;

use secrecy::SecretString;
use taskboard_core::{Accounts, LoginForm, RegistrationForm, User};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::Target;
use crate::error::CliError;
use crate::output;

fn detail(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", user.username, user.email);
    let _ = write!(out, "id: {}", user.id);
    if let Some(created) = user.created_at {
        let _ = write!(out, "\nmember since: {}", created.format("%Y-%m-%d"));
    }
    out
}

fn render_user(user: &User, global: &GlobalOpts) {
    let out = output::render_single(&global.output, user, detail, |u| u.id.to_string());
    output::print_output(&out, global.quiet);
}

fn prompt(label: &str) -> Result<SecretString, CliError> {
    Ok(SecretString::from(rpassword::prompt_password(label)?))
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn register(
    args: RegisterArgs,
    target: &Target,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (password, confirm_password) = match args.password {
        Some(password) => (
            SecretString::from(password.clone()),
            SecretString::from(password),
        ),
        None => (prompt("Password: ")?, prompt("Confirm password: ")?),
    };
    let form = RegistrationForm {
        username: args.username,
        email: args.email,
        password,
        confirm_password,
    };

    let accounts = Accounts::new(&target.server, target.session.clone())?;
    let user = accounts.register(&form).await?;

    if !global.quiet {
        eprintln!("✓ Account '{}' created", user.username);
        eprintln!("  Sign in with: taskboard login --email {}", user.email);
    }
    render_user(&user, global);
    Ok(())
}

pub async fn login(args: LoginArgs, target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    let password = match args.password {
        Some(password) => SecretString::from(password),
        None => prompt("Password: ")?,
    };
    let form = LoginForm {
        email: args.email,
        password,
    };

    let accounts = Accounts::new(&target.server, target.session.clone())?;
    let user = accounts.login(&form).await?;

    if !global.quiet {
        eprintln!(
            "✓ Signed in as {} (profile '{}')",
            user.username, target.profile_name
        );
    }
    Ok(())
}

pub fn logout(target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    target.session.sign_out()?;
    if !global.quiet {
        eprintln!("✓ Signed out");
    }
    Ok(())
}

pub async fn whoami(target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    let accounts = Accounts::new(&target.server, target.session.clone())?;
    let user = accounts.resume().await?.ok_or(CliError::NotSignedIn)?;
    render_user(&user, global);
    Ok(())
}
