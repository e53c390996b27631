use clap::{Args, ValueEnum};

use redfreelance::api::ProbeTarget;
use redfreelance::token::Role;

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum RoleArg {
    Client,
    Freelancer,
}

impl From<RoleArg> for Role {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::Client => Role::Client,
            RoleArg::Freelancer => Role::Freelancer,
        }
    }
}

#[derive(Args)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: String,
    #[arg(long, value_enum, default_value = "client")]
    pub(crate) role: RoleArg,
}

#[derive(Args)]
pub(crate) struct WhoamiArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum ProbeArg {
    ClientDashboard,
    FreelancerProfile,
    AdminPanel,
}

impl From<ProbeArg> for ProbeTarget {
    fn from(p: ProbeArg) -> Self {
        match p {
            ProbeArg::ClientDashboard => ProbeTarget::ClientDashboard,
            ProbeArg::FreelancerProfile => ProbeTarget::FreelancerProfile,
            ProbeArg::AdminPanel => ProbeTarget::AdminPanel,
        }
    }
}

#[derive(Args)]
pub(crate) struct ProbeArgs {
    #[arg(value_enum)]
    pub(crate) target: ProbeArg,
}
