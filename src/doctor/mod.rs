//! Doctor command for deployment diagnostics
//!
//! Checks that the model server, the configured model, the catalog export
//! and the prompt templates are all usable before the shop goes live.

use colored::Colorize;

use crate::catalog::InMemoryCatalog;
use crate::config::Config;
use crate::llm::OllamaClient;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
}

impl Doctor {
    /// Create a new doctor instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = Vec::new();

        match OllamaClient::from_config(&self.config.ollama) {
            Ok(client) => {
                checks.push(self.check_ollama_api(&client).await);
                checks.push(self.check_model_available(&client).await);
            }
            Err(e) => checks.push(HealthCheck::new(
                "Ollama API",
                HealthStatus::Fail(format!("Cannot build HTTP client: {}", e)),
            )),
        }
        checks.push(self.check_catalog());
        checks.push(self.check_prompts());

        checks
    }

    /// Check 1: Ollama API reachable
    async fn check_ollama_api(&self, client: &OllamaClient) -> HealthCheck {
        if client.health_check().await {
            HealthCheck::new("Ollama API", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "Ollama API",
                HealthStatus::Fail(format!("Ollama not reachable at {}", client.base_url())),
            )
        }
    }

    /// Check 2: Configured model installed
    async fn check_model_available(&self, client: &OllamaClient) -> HealthCheck {
        let wanted = client.model();

        match client.list_models().await {
            Ok(models) if models.iter().any(|m| model_matches(m, wanted)) => {
                HealthCheck::new("Model", HealthStatus::Pass)
            }
            Ok(models) if models.is_empty() => {
                HealthCheck::new("Model", HealthStatus::Fail("No models installed".to_string()))
            }
            Ok(_) => HealthCheck::new(
                "Model",
                HealthStatus::Fail(format!("'{}' not installed; run: ollama pull {}", wanted, wanted)),
            ),
            Err(e) => HealthCheck::new(
                "Model",
                HealthStatus::Fail(format!("Cannot check models: {}", e)),
            ),
        }
    }

    /// Check 3: Catalog export loads
    fn check_catalog(&self) -> HealthCheck {
        match InMemoryCatalog::from_path(&self.config.catalog.path) {
            Ok(catalog) if catalog.is_empty() => HealthCheck::new(
                "Catalog",
                HealthStatus::Warn("Catalog is empty; every question gets the fallback".to_string()),
            ),
            Ok(_) => HealthCheck::new("Catalog", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Catalog", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 4: Prompt templates carry their placeholders
    fn check_prompts(&self) -> HealthCheck {
        let missing = self.config.prompts.missing_placeholders();
        if missing.is_empty() {
            return HealthCheck::new("Prompts", HealthStatus::Pass);
        }

        let list: Vec<String> = missing
            .iter()
            .map(|(template, placeholder)| format!("{} lacks {}", template, placeholder))
            .collect();
        HealthCheck::new("Prompts", HealthStatus::Warn(list.join(", ")))
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "StoreBuddy Diagnostics".bold());
        println!("{:<12} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let status = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("{} {}", "WARN:".yellow(), msg),
                HealthStatus::Fail(msg) => format!("{} {}", "FAIL:".red(), msg),
            };

            println!("{:<12} {}", check.name, status);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

/// Ollama reports `llama3:latest` for a model configured as `llama3`
fn model_matches(installed: &str, wanted: &str) -> bool {
    installed == wanted || (!wanted.contains(':') && installed == format!("{}:latest", wanted))
}
