use clap::{Args, Subcommand};

#[derive(Args)]
pub(crate) struct CategoriesArgs {
    /// Show the landing overview (categories with sample services)
    #[arg(long)]
    pub(crate) landing: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Subcommand)]
pub(crate) enum ServicesCommands {
    /// List services
    List {
        /// Only services published by the current user
        #[arg(long, conflicts_with = "category")]
        mine: bool,
        /// Only services in this category (by name)
        #[arg(long)]
        category: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one service
    Show {
        id: i64,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Publish a new service
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, allow_negative_numbers = true)]
        price: String,
        /// Category name; repeat for several
        #[arg(long = "category", required = true)]
        categories: Vec<String>,
    },
    /// Edit one of your services
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        price: Option<String>,
        /// Replace the categories; repeat for several
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Delete one of your services
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
