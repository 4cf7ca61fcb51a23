use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use bonchan::{
    application::{
        listing::{ApplyOutcome, ListingStatus, ListingVariant, ListingView},
        repos::{ListingQuery, ListingSource, SourceError},
        session::ListingSession,
    },
    domain::entities::Category,
};
use serde_json::{Value, json};
use tokio::sync::oneshot;

/// Serves one post per requested page. Pages with a gate announce that they started and
/// then wait until the test releases them.
#[derive(Default)]
struct GatedSource {
    gates: Mutex<HashMap<u32, Gate>>,
}

struct Gate {
    started: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

struct GateHandle {
    started: oneshot::Receiver<()>,
    release: oneshot::Sender<()>,
}

impl GatedSource {
    fn gate(&self, page: u32) -> GateHandle {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.gates.lock().expect("gates lock").insert(
            page,
            Gate {
                started: started_tx,
                release: release_rx,
            },
        );
        GateHandle {
            started: started_rx,
            release: release_tx,
        }
    }
}

fn page_body(page: u32) -> Value {
    json!({ "data": { "items": [{
        "postId": page,
        "postStatus": "Approved",
        "pet": {
            "petId": page,
            "petName": format!("page-{page}"),
            "adoptionStatus": "Available",
            "categoryName": "Chó"
        }
    }]}})
}

#[async_trait]
impl ListingSource for GatedSource {
    async fn fetch_listing(&self, query: &ListingQuery) -> Result<Value, SourceError> {
        let page = query.page_number.unwrap_or(1);
        let gate = self.gates.lock().expect("gates lock").remove(&page);
        if let Some(Gate { started, release }) = gate {
            let _ = started.send(());
            release
                .await
                .map_err(|_| SourceError::unreachable("gate dropped"))?;
        }
        Ok(page_body(page))
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError> {
        Ok(vec![Category::new(1, "Chó")])
    }
}

async fn visible_post_ids<S: ListingSource>(session: &ListingSession<S>) -> Vec<i64> {
    session
        .snapshot()
        .await
        .records
        .iter()
        .filter_map(|record| record.post_id())
        .collect()
}

#[tokio::test]
async fn earlier_fetch_resolving_last_is_discarded() {
    let source = GatedSource::default();
    let gate_a = source.gate(1);
    let session = ListingSession::new(source, ListingView::new(ListingVariant::Gallery));

    let (outcome_a, outcome_b) = tokio::join!(
        session.load_records_with(ListingQuery::page(1, 6)),
        async {
            gate_a.started.await.expect("fetch A started");
            let outcome = session.load_records_with(ListingQuery::page(2, 6)).await;
            gate_a.release.send(()).expect("fetch A still waiting");
            outcome
        }
    );

    assert_eq!(outcome_b, ApplyOutcome::Applied);
    assert_eq!(outcome_a, ApplyOutcome::Discarded);
    assert_eq!(visible_post_ids(&session).await, vec![2]);
    assert_eq!(session.snapshot().await.status, ListingStatus::Ready);
}

#[tokio::test]
async fn in_order_responses_both_apply_and_last_wins() {
    let session = ListingSession::new(
        GatedSource::default(),
        ListingView::new(ListingVariant::Gallery),
    );

    assert_eq!(
        session.load_records_with(ListingQuery::page(1, 6)).await,
        ApplyOutcome::Applied
    );
    assert_eq!(
        session.load_records_with(ListingQuery::page(2, 6)).await,
        ApplyOutcome::Applied
    );
    assert_eq!(visible_post_ids(&session).await, vec![2]);
}

#[tokio::test]
async fn view_stays_loading_while_the_latest_fetch_is_in_flight() {
    let source = GatedSource::default();
    let gate_b = source.gate(2);
    let session = ListingSession::new(source, ListingView::new(ListingVariant::Gallery));

    session.load_records_with(ListingQuery::page(1, 6)).await;

    let (outcome_b, ()) = tokio::join!(
        session.load_records_with(ListingQuery::page(2, 6)),
        async {
            gate_b.started.await.expect("fetch B started");
            assert_eq!(session.snapshot().await.status, ListingStatus::Loading);
            gate_b.release.send(()).expect("fetch B still waiting");
        }
    );

    assert_eq!(outcome_b, ApplyOutcome::Applied);
    assert_eq!(visible_post_ids(&session).await, vec![2]);
}

#[test]
fn stale_categories_are_discarded() {
    let mut view = ListingView::new(ListingVariant::HomeCarousel);
    let first = view.begin_categories_fetch();
    let second = view.begin_categories_fetch();

    assert_eq!(
        view.apply_categories(second, Ok(vec![Category::new(2, "Mèo")])),
        ApplyOutcome::Applied
    );
    assert_eq!(
        view.apply_categories(first, Ok(vec![Category::new(1, "Chó")])),
        ApplyOutcome::Discarded
    );
    assert_eq!(view.categories().id_for_name("Mèo"), Some(2));
    assert_eq!(view.categories().id_for_name("Chó"), None);
}
