//! Global search view-model
//!
//! Matches a query against every entity type, scores each hit by the
//! fields it matched, and keeps a short history of recent queries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CleoResult;
use crate::models::{Animal, Client, Prestation, Service};
use crate::storage::AppRepository;

use super::{Store, ViewModel};

const RECENT_SEARCHES_LIMIT: usize = 10;
const SUGGESTIONS_LIMIT: usize = 5;
const SUGGESTION_MIN_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Client(Client),
    Animal(Animal),
    Service(Service),
    Prestation(Prestation),
}

fn contains(field: &str, term: &str) -> bool {
    field.to_lowercase().contains(term)
}

fn weight(field: &str, term: &str, points: u32) -> u32 {
    if contains(field, term) {
        points
    } else {
        0
    }
}

impl SearchResult {
    /// Field-weighted relevance for a lower-cased `term`
    pub fn relevance_score(&self, term: &str) -> u32 {
        match self {
            Self::Client(c) => {
                weight(&c.first_name, term, 10)
                    + weight(&c.last_name, term, 10)
                    + weight(&c.email, term, 5)
                    + weight(&c.phone, term, 3)
            }
            Self::Animal(a) => weight(&a.name, term, 10) + weight(&a.breed, term, 5),
            Self::Service(s) => weight(&s.name, term, 10) + weight(&s.description, term, 5),
            Self::Prestation(p) => weight(&p.notes, term, 5) + weight(p.status.name(), term, 3),
        }
    }

    /// Tie-break order between entity types
    pub fn type_order(&self) -> u8 {
        match self {
            Self::Client(_) => 1,
            Self::Animal(_) => 2,
            Self::Service(_) => 3,
            Self::Prestation(_) => 4,
        }
    }

    /// Short label for listings
    pub fn title(&self) -> String {
        match self {
            Self::Client(c) => c.full_name(),
            Self::Animal(a) => a.full_name(),
            Self::Service(s) => s.to_string(),
            Self::Prestation(p) => {
                format!("{} {}", p.start_date.format("%Y-%m-%d %H:%M"), p.status)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Client(_) => "Client",
            Self::Animal(_) => "Animal",
            Self::Service(_) => "Service",
            Self::Prestation(_) => "Prestation",
        }
    }
}

/// Entity types a search covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFilters {
    pub include_clients: bool,
    pub include_animals: bool,
    pub include_services: bool,
    pub include_prestations: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            include_clients: true,
            include_animals: true,
            include_services: true,
            include_prestations: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_count: usize,
    pub client_count: usize,
    pub animal_count: usize,
    pub service_count: usize,
    pub prestation_count: usize,
}

impl SearchResults {
    /// Sort `results` by descending relevance, then entity type, and count them
    pub fn ranked(query: &str, mut results: Vec<SearchResult>) -> Self {
        let term = query.trim().to_lowercase();
        results.sort_by(|a, b| {
            b.relevance_score(&term)
                .cmp(&a.relevance_score(&term))
                .then(a.type_order().cmp(&b.type_order()))
        });

        let count = |order: u8| results.iter().filter(|r| r.type_order() == order).count();
        Self {
            query: query.to_string(),
            total_count: results.len(),
            client_count: count(1),
            animal_count: count(2),
            service_count: count(3),
            prestation_count: count(4),
            results,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: SearchResults,
    pub is_searching: bool,
    pub filters: SearchFilters,
    /// Most recent first, without duplicates
    pub recent_searches: Vec<String>,
    pub suggestions: Vec<String>,
    pub selected_result: Option<SearchResult>,
}

impl SearchState {
    /// Put `query` at the front of the history
    fn remember(&mut self, query: &str) {
        self.recent_searches.retain(|q| q != query);
        self.recent_searches.insert(0, query.to_string());
        self.recent_searches.truncate(RECENT_SEARCHES_LIMIT);
    }
}

#[derive(Debug, Clone)]
pub enum SearchEvent {
    Search(String),
    ClearSearch,
    SetFilters(SearchFilters),
    ClearFilters,
    SelectResult(SearchResult),
    AddToRecentSearches(String),
    ClearRecentSearches,
    LoadSuggestions(String),
}

pub struct SearchViewModel {
    repository: Arc<dyn AppRepository>,
    store: Store<SearchState>,
}

impl SearchViewModel {
    pub fn new(repository: Arc<dyn AppRepository>) -> Self {
        Self {
            repository,
            store: Store::new(SearchState::default()),
        }
    }

    async fn collect(&self, term: &str, filters: SearchFilters) -> CleoResult<Vec<SearchResult>> {
        let mut results = Vec::new();

        if filters.include_clients {
            let clients = self.repository.clients().get_all().await?;
            results.extend(
                clients
                    .into_iter()
                    .filter(|c| {
                        contains(&c.first_name, term)
                            || contains(&c.last_name, term)
                            || contains(&c.email, term)
                            || contains(&c.phone, term)
                            || contains(&c.address, term)
                    })
                    .map(SearchResult::Client),
            );
        }

        if filters.include_animals {
            let animals = self.repository.animals().get_all().await?;
            results.extend(
                animals
                    .into_iter()
                    .filter(|a| {
                        contains(&a.name, term)
                            || contains(&a.breed, term)
                            || contains(a.species.name(), term)
                    })
                    .map(SearchResult::Animal),
            );
        }

        if filters.include_services {
            let services = self.repository.services().get_all().await?;
            results.extend(
                services
                    .into_iter()
                    .filter(|s| contains(&s.name, term) || contains(&s.description, term))
                    .map(SearchResult::Service),
            );
        }

        if filters.include_prestations {
            let prestations = self.repository.prestations().get_all().await?;
            results.extend(
                prestations
                    .into_iter()
                    .filter(|p| contains(&p.notes, term) || contains(p.status.name(), term))
                    .map(SearchResult::Prestation),
            );
        }

        Ok(results)
    }

    /// Run the current query with the current filters
    async fn refresh_results(&self) {
        let (query, filters) = self.store.read(|s| (s.query.clone(), s.filters));
        if query.trim().is_empty() {
            self.store.update(|s| s.results = SearchResults::default());
            return;
        }

        self.store.update(|s| s.is_searching = true);
        self.store
            .run(async {
                let term = query.trim().to_lowercase();
                let results = SearchResults::ranked(&query, self.collect(&term, filters).await?);
                tracing::debug!(query = %query, hits = results.total_count, "search finished");
                self.store.update(|s| s.results = results);
                Ok(())
            })
            .await;
        self.store.update(|s| s.is_searching = false);
    }

    async fn search(&self, query: String) {
        self.store.update(|s| {
            if !query.trim().is_empty() {
                s.remember(&query);
            }
            s.query = query;
        });
        self.refresh_results().await;
    }

    async fn load_suggestions(&self, query: String) {
        if query.chars().count() < SUGGESTION_MIN_CHARS {
            return;
        }
        let term = query.to_lowercase();

        self.store
            .run(async {
                let mut candidates: Vec<String> = self.store.read(|s| s.recent_searches.clone());
                candidates.extend(
                    self.repository
                        .clients()
                        .get_all()
                        .await?
                        .iter()
                        .map(Client::full_name),
                );
                candidates.extend(
                    self.repository
                        .animals()
                        .get_all()
                        .await?
                        .into_iter()
                        .map(|a| a.name),
                );
                candidates.extend(
                    self.repository
                        .services()
                        .get_all()
                        .await?
                        .into_iter()
                        .map(|s| s.name),
                );

                let mut suggestions: Vec<String> = Vec::new();
                for candidate in candidates {
                    if contains(&candidate, &term) && !suggestions.contains(&candidate) {
                        suggestions.push(candidate);
                    }
                    if suggestions.len() == SUGGESTIONS_LIMIT {
                        break;
                    }
                }
                self.store.update(|s| s.suggestions = suggestions);
                Ok(())
            })
            .await;
    }
}

#[async_trait]
impl ViewModel for SearchViewModel {
    type State = SearchState;
    type Event = SearchEvent;

    fn store(&self) -> &Store<SearchState> {
        &self.store
    }

    async fn handle_event(&self, event: SearchEvent) {
        match event {
            SearchEvent::Search(query) => self.search(query).await,
            SearchEvent::ClearSearch => self.store.update(|s| {
                s.query.clear();
                s.results = SearchResults::default();
            }),
            SearchEvent::SetFilters(filters) => {
                self.store.update(|s| s.filters = filters);
                self.refresh_results().await
            }
            SearchEvent::ClearFilters => {
                self.store.update(|s| s.filters = SearchFilters::default());
                self.refresh_results().await
            }
            SearchEvent::SelectResult(result) => {
                self.store.update(|s| s.selected_result = Some(result))
            }
            SearchEvent::AddToRecentSearches(query) => {
                if !query.trim().is_empty() {
                    self.store.update(|s| s.remember(&query))
                }
            }
            SearchEvent::ClearRecentSearches => self.store.update(|s| s.recent_searches.clear()),
            SearchEvent::LoadSuggestions(query) => self.load_suggestions(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Species};
    use crate::storage::MockAppRepository;
    use crate::viewmodel::testing::sample_repo;

    #[tokio::test]
    async fn test_name_hit_outranks_breed_hit() {
        let repo = Arc::new(MockAppRepository::empty());
        let mut rex = Animal::new("Rex", Species::Dog);
        rex.breed = "Bulldog".into();
        repo.animals().insert(rex).await.unwrap();
        repo.services()
            .insert(Service::new("Dog Walker", 60, Money::from_euros(20)))
            .await
            .unwrap();

        let vm = SearchViewModel::new(repo);
        vm.handle_event(SearchEvent::Search("dog".into())).await;

        let results = vm.state().results;
        assert_eq!(results.total_count, 2);
        assert_eq!(results.service_count, 1);
        assert_eq!(results.animal_count, 1);
        assert!(matches!(&results.results[0], SearchResult::Service(s) if s.name == "Dog Walker"));
        assert!(matches!(&results.results[1], SearchResult::Animal(a) if a.name == "Rex"));
    }

    #[tokio::test]
    async fn test_results_sorted_by_score() {
        let vm = SearchViewModel::new(sample_repo());
        // the service matches on name and description, the prestation on notes only
        vm.handle_event(SearchEvent::Search("Promenade".into()))
            .await;
        let results = vm.state().results;
        assert_eq!(results.service_count, 1);
        assert_eq!(results.prestation_count, 1);
        assert_eq!(results.results[0].kind(), "Service");
        assert_eq!(results.results[1].kind(), "Prestation");
    }

    #[tokio::test]
    async fn test_filters_exclude_types() {
        let vm = SearchViewModel::new(sample_repo());
        vm.handle_event(SearchEvent::Search("marie".into())).await;
        assert_eq!(vm.state().results.client_count, 1);

        vm.handle_event(SearchEvent::SetFilters(SearchFilters {
            include_clients: false,
            ..SearchFilters::default()
        }))
        .await;
        assert_eq!(vm.state().results.total_count, 0);

        vm.handle_event(SearchEvent::ClearFilters).await;
        assert_eq!(vm.state().results.client_count, 1);
    }

    #[tokio::test]
    async fn test_client_address_matches_but_scores_zero() {
        let vm = SearchViewModel::new(sample_repo());
        vm.handle_event(SearchEvent::Search("rue de la paix".into()))
            .await;
        let results = vm.state().results;
        assert_eq!(results.client_count, 1);
        assert_eq!(results.results[0].relevance_score("rue de la paix"), 0);
    }

    #[tokio::test]
    async fn test_blank_query_clears_results() {
        let vm = SearchViewModel::new(sample_repo());
        vm.handle_event(SearchEvent::Search("buddy".into())).await;
        assert_eq!(vm.state().results.total_count, 1);

        vm.handle_event(SearchEvent::Search("   ".into())).await;
        let state = vm.state();
        assert_eq!(state.results, SearchResults::default());
        assert_eq!(state.recent_searches, vec!["buddy"]);
    }

    #[tokio::test]
    async fn test_recent_searches_unique_and_capped() {
        let vm = SearchViewModel::new(sample_repo());
        for i in 0..12 {
            vm.handle_event(SearchEvent::AddToRecentSearches(format!("q{i}")))
                .await;
        }
        vm.handle_event(SearchEvent::AddToRecentSearches("q5".into()))
            .await;

        let recent = vm.state().recent_searches;
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0], "q5");
        assert_eq!(recent.iter().filter(|q| *q == "q5").count(), 1);

        vm.handle_event(SearchEvent::ClearRecentSearches).await;
        assert!(vm.state().recent_searches.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions() {
        let vm = SearchViewModel::new(sample_repo());
        vm.handle_event(SearchEvent::LoadSuggestions("m".into())).await;
        assert!(vm.state().suggestions.is_empty());

        vm.handle_event(SearchEvent::AddToRecentSearches("marie dupont".into()))
            .await;
        vm.handle_event(SearchEvent::LoadSuggestions("ma".into())).await;
        assert_eq!(
            vm.state().suggestions,
            vec!["marie dupont", "Marie Dupont", "Jean Martin"]
        );
    }
}
