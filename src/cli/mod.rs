use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use portfolio::{
    auth::TokenGate,
    server::{CtxBuilder, DEFAULT_PORT},
    storage::{
        fs::FsStore,
        mongo::{MongoStore, DEFAULT_COLLECTION, DEFAULT_DATABASE},
        Store,
    },
};

#[derive(clap::Parser)]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: Cmd,
}

impl Args {
    pub fn run(self) -> Result<(), anyhow::Error> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt().with_env_filter(filter).init();

        match self.cmd {
            Cmd::Serve(cmd) => cmd.run(),
            Cmd::Token(cmd) => cmd.run(),
        }
    }
}

#[derive(clap::Subcommand)]
pub enum Cmd {
    /// Run the web server.
    Serve(CmdServe),
    /// Print a fresh credential for the `api_token` cookie.
    Token(CmdToken),
}

#[derive(clap::Parser)]
pub struct CmdServe {
    #[clap(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory of the file store. Ignored when a MongoDB URI is given.
    #[clap(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[clap(long, env = "MONGODB_URI")]
    mongodb_uri: Option<String>,

    #[clap(long, env = "MONGODB_DATABASE", default_value = DEFAULT_DATABASE)]
    mongodb_database: String,

    #[clap(long, env = "MONGODB_COLLECTION", default_value = DEFAULT_COLLECTION)]
    mongodb_collection: String,

    /// Secret that cookie credentials are verified against.
    #[clap(long, env = "APP_PASSWORD", hide_env_values = true)]
    app_password: Option<String>,

    /// Directory served under /static.
    #[clap(long, env = "STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,
}

impl CmdServe {
    #[tokio::main]
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let store: Store = match &self.mongodb_uri {
            Some(uri) => {
                MongoStore::connect(uri, &self.mongodb_database, &self.mongodb_collection)
                    .await?
                    .into()
            }
            None => {
                tracing::info!(data_dir = %self.data_dir.display(), "using file store");
                FsStore::new(self.data_dir)?.into()
            }
        };

        let static_dir = Some(self.static_dir).filter(|dir| dir.is_dir());

        CtxBuilder::new(store)
            .app_password(self.app_password)
            .static_dir(static_dir)
            .build()
            .run_server(self.port)
            .await?;

        Ok(())
    }
}

#[derive(clap::Parser)]
pub struct CmdToken {
    #[clap(long, env = "APP_PASSWORD", hide_env_values = true)]
    app_password: String,
}

impl CmdToken {
    pub fn run(self) -> Result<(), anyhow::Error> {
        let credential = TokenGate::new(Some(self.app_password)).issue()?;
        println!("{credential}");
        Ok(())
    }
}
