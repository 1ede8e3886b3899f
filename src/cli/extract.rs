//! Extract command implementation

use crate::config::Config;
use crate::extract::{EntityExtractor, TermStrategy};
use clap::Args;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Market question
    pub question: String,

    /// Use keyword extraction instead of the configured strategy
    #[arg(long)]
    pub keywords: bool,
}

impl ExtractArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let extractor = EntityExtractor::from_config(&config.extractor);
        let strategy = if self.keywords {
            TermStrategy::Keywords
        } else {
            config.mentions.term_strategy
        };

        let terms = extractor.terms(&self.question, strategy);
        if terms.is_empty() {
            println!("(no entity found)");
        }
        for term in terms {
            println!("{}", term);
        }
        Ok(())
    }
}
