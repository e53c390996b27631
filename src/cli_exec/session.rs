use redfreelance::api::ProbeTarget;
use redfreelance::pages::{LoginPage, LoginView, RegisterPage};
use redfreelance::token::Role;

use super::*;

pub(super) fn handle_login_command(env: &CliEnv, email: String, password: String) -> Result<()> {
    let mut page = LoginPage::load(env.page()?)?;
    page.form.email = email;
    page.form.password = password;
    page.submit(&env.api)?;
    inline(page.message())?;

    if let LoginView::Welcome(w) = page.view() {
        println!("Logged in as {} ({})", w.identity, w.role);
    }
    finish(env, &mut page)
}

pub(super) fn handle_logout_command(env: &CliEnv) -> Result<()> {
    let mut page = LoginPage::load(env.page()?)?;
    page.logout()?;
    inline(page.message())?;
    finish(env, &mut page)
}

pub(super) fn handle_register_command(
    env: &CliEnv,
    email: String,
    password: String,
    role: Role,
) -> Result<()> {
    let mut page = RegisterPage::load(env.page()?);
    page.form.email = email;
    page.form.password = password;
    page.form.role = role;
    page.submit(&env.api)?;
    inline(page.message())?;
    finish(env, &mut page)
}

pub(super) fn handle_whoami_command(env: &CliEnv, json: bool) -> Result<()> {
    let mut page = LoginPage::load(env.page()?)?;
    let session = page.context().gate().get_session()?;
    finish(env, &mut page)?;

    let Some(session) = session else {
        anyhow::bail!("not logged in (run `redfreelance login --email ... --password ...`)");
    };
    if json {
        println!(
            "{}",
            serde_json::json!({
                "identity": session.identity,
                "role": session.role,
                "user_id": session.user_id,
            })
        );
    } else {
        println!("identity: {}", session.identity);
        println!("role: {}", session.role);
        if let Some(id) = session.user_id {
            println!("user_id: {}", id);
        }
    }
    Ok(())
}

pub(super) fn handle_probe_command(env: &CliEnv, target: ProbeTarget) -> Result<()> {
    let mut page = LoginPage::load(env.page()?)?;
    page.probe(&env.api, target)?;
    inline(page.probe_message(target))?;
    finish(env, &mut page)
}
