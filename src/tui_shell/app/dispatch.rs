use super::*;
use crate::pages::names_match;

/// Splits a line into its command word and the (trimmed) rest.
fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    }
}

fn parse_probe(raw: &str) -> Option<ProbeTarget> {
    match raw {
        "client" => Some(ProbeTarget::ClientDashboard),
        "freelancer" => Some(ProbeTarget::FreelancerProfile),
        "admin" => Some(ProbeTarget::AdminPanel),
        _ => None,
    }
}

fn parse_signup_role(raw: Option<&str>) -> Result<Role> {
    match raw {
        None | Some("client") => Ok(Role::Client),
        Some("freelancer") => Ok(Role::Freelancer),
        Some(other) => anyhow::bail!("unknown role {:?} (expected client or freelancer)", other),
    }
}

pub(super) fn run_command(app: &mut App, line: &str) -> Result<()> {
    let (word, rest) = split_command(line);
    let Some(cmd) = canonical(&app.page, word) else {
        anyhow::bail!("unknown command `{}` (try `help`)", word);
    };

    match cmd {
        "help" => {
            let lines = command_defs(&app.page)
                .into_iter()
                .map(|d| format!("{: <44} {}", d.usage, d.help))
                .collect();
            app.push_output(lines);
            Ok(())
        }
        "quit" => {
            app.quit = true;
            Ok(())
        }
        "close" => {
            app.page.context_mut().close_toast();
            Ok(())
        }
        "login" => {
            app.page.context_mut().navigate(Navigation::Login);
            Ok(())
        }
        "register" => {
            app.page.context_mut().navigate(Navigation::Register);
            Ok(())
        }
        "landing" => {
            app.page.context_mut().navigate(Navigation::Landing);
            Ok(())
        }
        "services" => {
            let category = Some(rest.to_string()).filter(|c| !c.is_empty());
            app.page
                .context_mut()
                .navigate(Navigation::Services { category });
            Ok(())
        }
        "logout" => logout(app),
        _ => run_page_command(app, cmd, rest),
    }
}

fn logout(app: &mut App) -> Result<()> {
    match &mut app.page {
        Page::Login(p) => return p.logout(),
        Page::Services(p) => return p.logout(),
        Page::Register(_) | Page::Landing(_) => {}
    }
    let ctx = app.page.context_mut();
    ctx.gate().logout()?;
    ctx.navigate_with(
        Navigation::Login,
        &Notification::success("Session closed successfully."),
    )
}

fn run_page_command(app: &mut App, cmd: &str, rest: &str) -> Result<()> {
    match &mut app.page {
        Page::Login(p) => match cmd {
            "signin" => {
                let mut args = rest.split_whitespace();
                let (Some(email), Some(password)) = (args.next(), args.next()) else {
                    anyhow::bail!("usage: signin <email> <password>");
                };
                p.form.email = email.to_string();
                p.form.password = password.to_string();
                p.submit(&app.api)
            }
            "probe" => {
                let Some(target) = parse_probe(rest) else {
                    anyhow::bail!("usage: probe <client|freelancer|admin>");
                };
                p.probe(&app.api, target)
            }
            _ => Ok(()),
        },

        Page::Register(p) => {
            let mut args = rest.split_whitespace();
            let (Some(email), Some(password)) = (args.next(), args.next()) else {
                anyhow::bail!("usage: signup <email> <password> [client|freelancer]");
            };
            p.form.role = parse_signup_role(args.next())?;
            p.form.email = email.to_string();
            p.form.password = password.to_string();
            p.submit(&app.api)
        }

        Page::Landing(p) => match cmd {
            "open" => {
                let n: usize = rest
                    .parse()
                    .with_context(|| format!("not a card number: {:?}", rest))?;
                if n == 0 || !p.open_category(n - 1) {
                    anyhow::bail!("no category card {}", n);
                }
                Ok(())
            }
            "reload" => {
                p.load(&app.api);
                Ok(())
            }
            _ => Ok(()),
        },

        Page::Services(p) => match cmd {
            "reload" => p.reload(&app.api),
            "mine" => {
                if !p.toggle_my_services(&app.api)? {
                    anyhow::bail!("the my-services toggle is not available here");
                }
                Ok(())
            }
            "search" => p.set_search(&app.api, rest),
            "publish" => p.create(&app.api),
            "edit" => {
                let id: i64 = rest
                    .parse()
                    .with_context(|| format!("not a service id: {:?}", rest))?;
                p.open_manage(&app.api, id)
            }
            "save" => {
                if p.manage().is_none() {
                    anyhow::bail!("no service is open; use `edit <id>` first");
                }
                p.update(&app.api)
            }
            "delete" => {
                if !p.request_delete() {
                    anyhow::bail!("no service is open; use `edit <id>` first");
                }
                Ok(())
            }
            "cancel" => {
                p.cancel_manage();
                Ok(())
            }
            field => {
                if p.manage().is_none() && !p.create_visible() {
                    anyhow::bail!("Your role cannot publish services.");
                }
                edit_form_field(p, field, rest)
            }
        },
    }
}

fn edit_form_field(
    page: &mut ServicesPage<FileStore, SystemClock>,
    field: &str,
    value: &str,
) -> Result<()> {
    let all = page.categories().to_vec();
    let form = page.active_form_mut();
    match field {
        "title" => form.title = value.to_string(),
        "desc" => form.description = value.to_string(),
        "price" => form.price = value.to_string(),
        "cat" => {
            if !form.picker.select_by_name(&all, value) {
                anyhow::bail!("unknown category {:?}", value);
            }
        }
        "uncat" => {
            let Some(id) = form
                .picker
                .selected()
                .iter()
                .find(|c| names_match(&c.name, value))
                .map(|c| c.id)
            else {
                anyhow::bail!("{:?} is not selected", value);
            };
            form.picker.remove(id);
        }
        other => anyhow::bail!("unknown command `{}`", other),
    }
    form.error = None;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/tui_shell/dispatch_tests.rs"]
mod tests;
