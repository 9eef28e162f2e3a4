use clap::Subcommand;

use studyplan_core::{ApiClient, Config};

use super::input::{runtime, token_or_env};

#[derive(Subcommand)]
pub enum FetchAction {
    /// Fetch the signed-in student's events
    Events {
        /// Bearer token (defaults to STUDYPLAN_API_TOKEN)
        #[arg(long)]
        token: Option<String>,
    },
    /// Fetch the student's courses
    Courses {
        #[arg(long)]
        token: Option<String>,
    },
    /// Fetch recurring time-blockers
    Timeblockers {
        #[arg(long)]
        token: Option<String>,
    },
    /// Fetch the student's open assignments
    Assignments {
        #[arg(long)]
        token: Option<String>,
    },
}

pub fn run(action: FetchAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let token = token_or_env(match &action {
        FetchAction::Events { token }
        | FetchAction::Courses { token }
        | FetchAction::Timeblockers { token }
        | FetchAction::Assignments { token } => token.clone(),
    });

    let client = ApiClient::new(config.api, token)?;
    let rt = runtime()?;

    let json = rt.block_on(async {
        let value = match action {
            FetchAction::Events { .. } => serde_json::to_value(client.try_fetch_events().await?)?,
            FetchAction::Courses { .. } => serde_json::to_value(client.try_fetch_courses().await?)?,
            FetchAction::Timeblockers { .. } => {
                serde_json::to_value(client.try_fetch_timeblockers().await?)?
            }
            FetchAction::Assignments { .. } => {
                serde_json::to_value(client.try_fetch_assignments().await?)?
            }
        };
        Ok::<_, Box<dyn std::error::Error>>(value)
    })?;

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
