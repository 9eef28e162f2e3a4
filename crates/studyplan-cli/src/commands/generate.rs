use clap::Args;

use studyplan_core::{ApiClient, Config};

use super::input::{runtime, token_or_env};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Id of the assignment to plan study sessions for
    pub assignment_id: String,
    /// Bearer token (defaults to STUDYPLAN_API_TOKEN)
    #[arg(long)]
    pub token: Option<String>,
}

pub fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let client = ApiClient::new(config.api, token_or_env(args.token))?;
    runtime()?.block_on(client.generate_schedule(&args.assignment_id))?;
    println!("schedule requested for assignment {}", args.assignment_id.trim());
    Ok(())
}
