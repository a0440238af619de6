use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lfsd",
    about = "Metadata control plane for a sharded large-file store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file; flags and environment override its values.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the admin HTTP surface
    Serve(ServeArgs),
    /// Rebuild object records from the content tree
    Refresh(RefreshArgs),
    /// List object records
    Objects(StoreArgs),
    /// Manage users
    Users(UsersArgs),
}

/// Location of the metadata database.
#[derive(Args, Debug, Default)]
pub struct StoreArgs {
    #[arg(long, env = "LFS_METADB")]
    pub meta_db: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "LFS_LISTEN")]
    pub listen: Option<SocketAddr>,
    #[arg(long, env = "LFS_CONTENTPATH")]
    pub content_path: Option<PathBuf>,
    #[command(flatten)]
    pub store: StoreArgs,
    #[arg(long, env = "LFS_ADMINUSER")]
    pub admin_user: Option<String>,
    #[arg(long, env = "LFS_ADMINPASS", hide_env_values = true)]
    pub admin_pass: Option<String>,
}

#[derive(Args, Debug)]
pub struct RefreshArgs {
    #[arg(long, env = "LFS_CONTENTPATH")]
    pub content_path: Option<PathBuf>,
    #[command(flatten)]
    pub store: StoreArgs,
    /// Records upserted per store write.
    #[arg(long)]
    pub batch_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: Option<UsersAction>,
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// List users (default)
    List,
    /// Add a user
    Add {
        name: String,
        #[arg(short, long)]
        password: String,
    },
    /// Delete a user
    Del { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from([
            "lfsd",
            "serve",
            "--listen",
            "0.0.0.0:9000",
            "--content-path",
            "/srv/lfs",
            "--meta-db",
            "/srv/lfs.db",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.listen, Some("0.0.0.0:9000".parse().unwrap()));
            assert_eq!(args.content_path, Some(PathBuf::from("/srv/lfs")));
            assert_eq!(args.store.meta_db, Some(PathBuf::from("/srv/lfs.db")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve_rejects_bad_address() {
        assert!(Cli::try_parse_from(["lfsd", "serve", "--listen", "nowhere"]).is_err());
    }

    #[test]
    fn parse_refresh_batch_size() {
        let cli = Cli::try_parse_from(["lfsd", "refresh", "--batch-size", "64"]).unwrap();
        if let Command::Refresh(args) = cli.command {
            assert_eq!(args.batch_size, Some(64));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_objects() {
        let cli = Cli::try_parse_from(["lfsd", "objects"]).unwrap();
        assert!(matches!(cli.command, Command::Objects(_)));
    }

    #[test]
    fn parse_users_default_lists() {
        let cli = Cli::try_parse_from(["lfsd", "users"]).unwrap();
        if let Command::Users(args) = cli.command {
            assert!(args.action.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_users_add() {
        let cli = Cli::try_parse_from(["lfsd", "users", "add", "alice", "-p", "pw"]).unwrap();
        if let Command::Users(args) = cli.command {
            assert!(matches!(
                args.action,
                Some(UsersAction::Add { ref name, ref password }) if name == "alice" && password == "pw"
            ));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_users_add_requires_password() {
        assert!(Cli::try_parse_from(["lfsd", "users", "add", "alice"]).is_err());
    }

    #[test]
    fn parse_users_del() {
        let cli = Cli::try_parse_from(["lfsd", "users", "del", "alice"]).unwrap();
        if let Command::Users(args) = cli.command {
            assert!(matches!(args.action, Some(UsersAction::Del { ref name }) if name == "alice"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli =
            Cli::try_parse_from(["lfsd", "objects", "--verbose", "--format", "json", "-c", "lfsd.toml"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("lfsd.toml")));
    }
}
