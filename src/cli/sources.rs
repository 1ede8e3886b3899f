//! Sources command implementation

use crate::config::Config;
use crate::http::ReqwestFetcher;
use crate::mentions::{SourceDirectory, EPL_SOURCES};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Search queries used for discovery
    #[arg(long = "seed")]
    pub seeds: Vec<String>,

    /// Number of sources to list
    #[arg(short, default_value = "5")]
    pub k: usize,

    /// Rank discovered sources only, ignoring the curated list
    #[arg(long)]
    pub discover: bool,
}

impl SourcesArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        if self.seeds.is_empty() && !self.discover {
            for source in &config.mentions.sources {
                println!("{}", source);
            }
            return Ok(());
        }

        let http = Arc::new(ReqwestFetcher::new(&config.http)?);
        let directory = SourceDirectory::new(http, config.mentions.discovery_base_url.clone());

        let sources = if self.discover {
            directory.discover(&self.seeds, self.k).await
        } else {
            directory.pick(EPL_SOURCES, &self.seeds, self.k).await
        };

        for source in sources {
            println!("{}", source);
        }
        Ok(())
    }
}
