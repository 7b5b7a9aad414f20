use crate::config::AppConfig;
use crate::domain::scenario::scraper::ScenarioScraper;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub scraper: ScenarioScraper,
}
