pub mod budget;
pub mod directory;
pub mod employee;
pub mod payroll;
pub mod preview;
pub mod scenario;
pub mod tax_rate;

#[cfg(test)]
pub mod tests {
    use std::time::Duration;

    use actix_web::web;
    use wiremock::MockServer;

    use crate::auth::jwt::tests::token_for;
    use crate::client::BackendClient;
    use crate::config::Config;
    use crate::model::role::Role;
    use crate::models::TokenType;
    use crate::utils::query_cache::QueryCache;

    /// Client, cache and config pointed at a mock backend.
    pub fn backend_app_data(
        server: &MockServer,
    ) -> (web::Data<BackendClient>, web::Data<QueryCache>, web::Data<Config>) {
        let config = Config::for_tests(&server.uri());
        let client = BackendClient::new(&config.backend_url, Duration::from_secs(5)).unwrap();
        let cache = QueryCache::new(Duration::from_secs(60), 100);
        (web::Data::new(client), web::Data::new(cache), web::Data::new(config))
    }

    pub fn bearer(user_id: u64, role: Role) -> (&'static str, String) {
        let token = token_for(user_id, role, TokenType::Access, "test-secret");
        ("Authorization", format!("Bearer {token}"))
    }
}
