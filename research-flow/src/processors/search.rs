use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::{
    error::{FlowError, Result},
    processor::{BatchOutcome, BatchProcessor},
    services::{KeywordLogic, LiteratureSearch, SearchField, SearchQuery},
    session::Session,
    status::PaperStatus,
};

/// Runs one literature search over the session's keywords and appends the
/// hits as pending papers. Earlier results are kept, so searches accumulate.
pub struct SearchProcessor {
    search: Arc<dyn LiteratureSearch>,
    max_results: usize,
}

impl SearchProcessor {
    pub fn new(search: Arc<dyn LiteratureSearch>, max_results: usize) -> Self {
        Self {
            search,
            max_results,
        }
    }
}

#[async_trait]
impl BatchProcessor for SearchProcessor {
    fn id(&self) -> &str {
        "search"
    }

    fn start_message(&self) -> String {
        "Searching PubMed...".to_string()
    }

    fn precondition(&self, session: &Session) -> Result<()> {
        if session.keyword_list().is_empty() {
            return Err(FlowError::EmptyKeywords);
        }
        Ok(())
    }

    async fn run(&self, session: &mut Session) -> Result<BatchOutcome> {
        let query = SearchQuery {
            keywords: session.keyword_list(),
            logic: KeywordLogic::All,
            field: SearchField::TitleAndAbstract,
            max_results: self.max_results,
        };

        let mut found = self
            .search
            .search(&query)
            .await
            .map_err(|e| FlowError::service("Literature search", format!("{:#}", e)))?;

        for paper in &mut found {
            paper.status = PaperStatus::Pending;
        }

        let added = session.append_papers(found);
        let total = session.papers().len();
        info!(added, total, "Search results appended");

        let mut outcome = BatchOutcome::new(self.id(), 1);
        outcome.succeeded = added;
        Ok(outcome.finish(format!("Found {} new papers. Total: {}", added, total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Paper;
    use crate::processors::mocks::ScriptedSearch;

    fn hit(title: &str, doi: &str, pmid: &str) -> Paper {
        Paper::new(title, doi).with_pmid(pmid)
    }

    #[tokio::test]
    async fn results_are_appended_after_existing_papers() {
        let mut stale = hit("New 2", "10.9/2", "2");
        stale.status = PaperStatus::Ready;
        let search = Arc::new(ScriptedSearch::returning(vec![hit("New 1", "10.9/1", "1"), stale]));
        let processor = SearchProcessor::new(search.clone(), 15);

        let mut session = Session::new();
        session.add_dois("10.1/a\n10.1/b\n10.1/c").unwrap();
        let second = session.papers().as_slice()[1].id;
        session
            .update_paper(second, |p| {
                p.status = PaperStatus::Downloaded;
                p.local_path = Some("/tmp/b.pdf".into());
            })
            .unwrap();
        let original = session.papers().to_vec();
        session.set_keywords("x, y");

        let outcome = session.run(&processor).await.unwrap();

        let papers = session.papers().as_slice();
        assert_eq!(papers.len(), 5);
        assert_eq!(&papers[..3], original.as_slice());
        assert_eq!(papers[3].title, "New 1");
        assert_eq!(papers[4].status, PaperStatus::Pending);
        assert_eq!(papers[4].pmid.as_deref(), Some("2"));
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(session.status_message(), "Found 2 new papers. Total: 5");
    }

    #[tokio::test]
    async fn query_uses_all_keywords_over_title_and_abstract() {
        let search = Arc::new(ScriptedSearch::returning(vec![]));
        let processor = SearchProcessor::new(search.clone(), 15);
        let mut session = Session::new();
        session.set_keywords(" CRISPR, , off-target ,CRISPR");

        session.run(&processor).await.unwrap();

        let queries = search.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].keywords, vec!["CRISPR", "off-target", "CRISPR"]);
        assert_eq!(queries[0].logic, KeywordLogic::All);
        assert_eq!(queries[0].field, SearchField::TitleAndAbstract);
        assert_eq!(queries[0].max_results, 15);
    }

    #[tokio::test]
    async fn failed_search_appends_nothing() {
        let processor = SearchProcessor::new(Arc::new(ScriptedSearch::failing("503")), 15);
        let mut session = Session::new();
        session.add_dois("10.1/a").unwrap();
        session.set_keywords("x");

        let err = session.run(&processor).await.unwrap_err();

        assert!(matches!(err, FlowError::ServiceFailed { .. }));
        assert_eq!(session.papers().len(), 1);
    }

    #[tokio::test]
    async fn blank_keywords_are_rejected_without_a_call() {
        let search = Arc::new(ScriptedSearch::returning(vec![hit("A", "10.1/a", "1")]));
        let processor = SearchProcessor::new(search.clone(), 15);
        let mut session = Session::new();
        session.set_keywords(" , ");

        let err = session.run(&processor).await.unwrap_err();

        assert!(matches!(err, FlowError::EmptyKeywords));
        assert!(err.is_precondition());
        assert_eq!(search.calls(), 0);
        assert!(session.papers().is_empty());
    }
}
