use super::{CommandDef, Page};

const fn global(
    name: &'static str,
    aliases: &'static [&'static str],
    usage: &'static str,
    help: &'static str,
) -> CommandDef {
    CommandDef {
        name,
        aliases,
        usage,
        help,
        global: true,
    }
}

const fn local(
    name: &'static str,
    aliases: &'static [&'static str],
    usage: &'static str,
    help: &'static str,
) -> CommandDef {
    CommandDef {
        name,
        aliases,
        usage,
        help,
        global: false,
    }
}

const GLOBAL: &[CommandDef] = &[
    global("help", &["h", "?"], "help", "Show commands for this page"),
    global("login", &[], "login", "Go to the login page"),
    global("register", &[], "register", "Go to the registration page"),
    global("landing", &["home"], "landing", "Browse categories"),
    global("services", &["s"], "services [category]", "Open the services page"),
    global("logout", &[], "logout", "Close the session"),
    global("close", &[], "close", "Dismiss the notification"),
    global("quit", &["q"], "quit", "Exit"),
];

const LOGIN: &[CommandDef] = &[
    local("signin", &["si"], "signin <email> <password>", "Log in"),
    local(
        "probe",
        &[],
        "probe <client|freelancer|admin>",
        "Call a role-protected section",
    ),
];

const REGISTER: &[CommandDef] = &[local(
    "signup",
    &[],
    "signup <email> <password> [client|freelancer]",
    "Create an account",
)];

const LANDING: &[CommandDef] = &[
    local("open", &["o"], "open <n>", "Show services of category n"),
    local("reload", &["r"], "reload", "Reload categories"),
];

const SERVICES: &[CommandDef] = &[
    local("reload", &["r"], "reload", "Reload the listing"),
    local("mine", &[], "mine", "Toggle my published services"),
    local("search", &["/"], "search [text]", "Filter by text (empty clears)"),
    local("title", &[], "title <text>", "Set the form title"),
    local("desc", &[], "desc <text>", "Set the form description"),
    local("price", &[], "price <amount>", "Set the form price"),
    local("cat", &[], "cat <name>", "Add a category (Tab completes)"),
    local("uncat", &[], "uncat <name>", "Remove a category"),
    local("publish", &[], "publish", "Create a service from the form"),
    local("edit", &["e"], "edit <id>", "Manage one of your services"),
    local("save", &[], "save", "Save the managed service"),
    local("delete", &[], "delete", "Delete the managed service"),
    local("cancel", &[], "cancel", "Stop managing"),
];

pub(super) fn command_defs(page: &Page) -> Vec<CommandDef> {
    let local = match page {
        Page::Login(_) => LOGIN,
        Page::Register(_) => REGISTER,
        Page::Landing(_) => LANDING,
        Page::Services(_) => SERVICES,
    };
    local.iter().chain(GLOBAL).copied().collect()
}

/// Resolves a typed word (name or alias) to its command name.
pub(super) fn canonical(page: &Page, word: &str) -> Option<&'static str> {
    command_defs(page)
        .into_iter()
        .find(|d| d.name == word || d.aliases.contains(&word))
        .map(|d| d.name)
}

/// Masks the password argument of `signin`/`signup` lines.
pub(super) fn redact(line: &str) -> String {
    let mut parts: Vec<&str> = line.split_whitespace().collect();
    if matches!(parts.first(), Some(&"signin" | &"si" | &"signup")) && parts.len() > 2 {
        parts[2] = "****";
    }
    parts.join(" ")
}
