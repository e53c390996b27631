use clap::Subcommand;

pub(crate) mod catalog;
pub(crate) mod session;
pub(crate) mod settings;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Log in and store the session token
    Login(session::LoginArgs),

    /// Log out (clear the stored session token)
    Logout,

    /// Create an account
    Register(session::RegisterArgs),

    /// Show the current session
    Whoami(session::WhoamiArgs),

    /// Call a role-protected section with the current session
    Probe(session::ProbeArgs),

    /// List service categories
    Categories(catalog::CategoriesArgs),

    /// Browse and manage services
    Services {
        #[command(subcommand)]
        command: catalog::ServicesCommands,
    },

    /// Show or change the client configuration
    Config {
        #[command(subcommand)]
        command: settings::ConfigCommands,
    },
}
