//! Serve command - run the depreciation HTTP endpoint

use crate::server::{self, Config};
use clap::Args;
use std::net::SocketAddr;

#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to listen on (overrides ASSETBOOK_LISTEN_ADDR)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

impl ServeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut config = Config::from_env()?;
        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(server::run(config))
    }
}
