use std::io::{self, Write};

use hcp_dashboard::models::SearchFilters;
use hcp_dashboard::{
    ApiClient, ApiClientConfig, DashboardController, InMemorySessionStore, ViewState, terms,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = ApiClientConfig::from_env();
    info!("Dashboard session starting against relay {}", config.relay_url);

    let api = ApiClient::new(config);
    let sessions = Arc::new(InMemorySessionStore::new());
    let controller = DashboardController::new(api, sessions);

    loop {
        if controller.current_session().await?.is_none() && !sign_in(&controller).await? {
            break;
        }

        match search_loop(&controller).await? {
            LoopExit::Logout => {
                controller.logout().await?;
                continue;
            }
            LoopExit::Quit => break,
        }
    }

    info!("Session ended");
    Ok(())
}

enum LoopExit {
    Logout,
    Quit,
}

/// Prompt for credentials until a login succeeds. Returns false when the
/// input stream closes.
async fn sign_in(controller: &DashboardController) -> anyhow::Result<bool> {
    info!("Sign in (demo credentials: demo_provider / demo123)");

    loop {
        let Some(username) = prompt("username> ")? else {
            return Ok(false);
        };
        if username.is_empty() {
            continue;
        }
        let Some(password) = prompt("password> ")? else {
            return Ok(false);
        };

        match controller.login(&username, &password).await {
            Ok(profile) => {
                let specialty = profile
                    .specialty
                    .as_deref()
                    .map(|s| format!(" - {}", s))
                    .unwrap_or_default();
                info!("Signed in as {} ({}{})", profile.username, profile.role, specialty);
                return Ok(true);
            }
            Err(e) => error!("{}", e.user_message()),
        }
    }
}

async fn search_loop(controller: &DashboardController) -> anyhow::Result<LoopExit> {
    info!("Enter a search, or 'logout' / 'quit'");

    loop {
        let Some(line) = prompt("search> ")? else {
            return Ok(LoopExit::Quit);
        };

        match line.as_str() {
            "" => continue,
            "quit" | "exit" => return Ok(LoopExit::Quit),
            "logout" => return Ok(LoopExit::Logout),
            query => {
                let suggestions = terms::suggest(query);
                if !suggestions.is_empty() {
                    info!("Related: {}", suggestions.join(" | "));
                }

                match controller.search(query, &SearchFilters::default()).await {
                    Ok(state) => render(&state),
                    Err(e) => error!("Search failed: {}", e.user_message()),
                }
            }
        }
    }
}

fn render(state: &ViewState) {
    if let Some(summary) = &state.ai_summary {
        info!("AI Summary: {}", summary);
    }

    info!("Found {} results", state.results.len());
    for (i, result) in state.results.iter().enumerate() {
        info!(
            "{}. {} ({}, {}) relevance {:.0}%",
            i + 1,
            result.title,
            result.journal,
            result.publication_date,
            result.relevance_score * 100.0
        );
    }

    if let Some(risk) = &state.risk {
        info!(
            "Risk: {} ({:.0}%), factors: {}",
            risk.risk_level,
            risk.risk_score * 100.0,
            risk.risk_factors.join(", ")
        );
    }
    if let Some(cost) = &state.cost {
        info!(
            "Cost: ${:.0}, efficiency {}",
            cost.estimated_cost, cost.cost_efficiency
        );
    }
    if let Some(population) = &state.population {
        info!(
            "Population: average age {:.0}, distribution {:?}",
            population.average_age, population.risk_distribution
        );
    }
}

/// Read one trimmed line from stdin. Returns `None` at end of input.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
