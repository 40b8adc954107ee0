use clap::Subcommand;
use flow_core::Config;

use super::print_json;

#[derive(Subcommand)]
pub enum TagsAction {
    /// List the tags sessions can be recorded under
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TagsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = config.tag_catalog();

    match action {
        TagsAction::List { json } => {
            if json {
                print_json(&catalog.tags())?;
            } else {
                for tag in catalog.tags() {
                    println!("{:<10} {}", tag.name, tag.color);
                }
            }
        }
    }
    Ok(())
}
