use std::sync::Arc;

use async_trait::async_trait;
use bonchan::{
    application::{
        categories::{CategoryOptionValue, CategoryResolver},
        filter::{CategorySelection, FilterEngine, FilterState},
        listing::{ListingStatus, ListingVariant, ListingView},
        normalize::RecordNormalizer,
        pagination::PageState,
        repos::{ListingQuery, ListingSource, SourceError},
        session::ListingSession,
    },
    domain::entities::{AdoptionRecord, Category, RecordKey},
    presentation::views::ListingPageView,
};
use serde_json::{Value, json};

struct StaticSource {
    posts: Value,
    categories: Vec<Category>,
}

#[async_trait]
impl ListingSource for StaticSource {
    async fn fetch_listing(&self, _query: &ListingQuery) -> Result<Value, SourceError> {
        Ok(self.posts.clone())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError> {
        Ok(self.categories.clone())
    }
}

fn post(post_id: i64, adoption_status: &str, post_status: &str, category: &str) -> Value {
    json!({
        "postId": post_id,
        "postStatus": post_status,
        "city": "Hà Nội",
        "pet": {
            "petId": 100 + post_id,
            "petName": format!("Bé {post_id}"),
            "adoptionStatus": adoption_status,
            "categoryName": category,
            "gender": "Đực",
            "age": 2,
            "ageUnit": "năm"
        }
    })
}

fn categories() -> Vec<Category> {
    vec![Category::new(1, "Chó"), Category::new(2, "Mèo")]
}

fn ids(records: &[Arc<AdoptionRecord>]) -> Vec<i64> {
    records.iter().map(|record| record.key.id()).collect()
}

#[test]
fn every_envelope_normalizes_to_the_same_records() {
    let items = json!([
        post(1, "Available", "Approved", "Chó"),
        post(2, "Có thể nhận nuôi", "Pending", "Mèo"),
        post(3, "Adopted", "Approved", "Mèo"),
    ]);
    let normalizer = RecordNormalizer::default();

    let outputs: Vec<Vec<Arc<AdoptionRecord>>> = [
        items.clone(),
        json!({ "data": items.clone() }),
        json!({ "data": { "items": items.clone(), "pageNumber": 1 } }),
    ]
    .iter()
    .map(|body| normalizer.normalize(body).expect("known envelope"))
    .collect();

    assert_eq!(ids(&outputs[0]), vec![1, 2]);
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[0], outputs[2]);
}

#[test]
fn unlistable_records_never_survive_public_normalization() {
    let statuses = ["Available", "Có sẵn", "Adopted", "Pending", "Đã nhận nuôi", ""];
    let post_statuses = ["Approved", "Pending", "Rejected", "rejected"];

    let mut posts = Vec::new();
    let mut next_id = 0;
    for adoption_status in statuses {
        for post_status in post_statuses {
            next_id += 1;
            posts.push(post(next_id, adoption_status, post_status, "Chó"));
        }
    }

    for body in [json!(posts.clone()), json!({ "data": { "items": posts.clone() } })] {
        let records = RecordNormalizer::default()
            .normalize(&body)
            .expect("normalized");
        assert!(!records.is_empty());
        for record in &records {
            assert!(!record.is_rejected(), "{}", record.key);
            assert!(record.adoption_status.is_available(), "{}", record.key);
        }
    }
}

#[test]
fn changing_category_returns_to_first_page() {
    let posts: Vec<Value> = (1..=20)
        .map(|id| post(id, "Available", "Approved", if id % 4 == 0 { "Mèo" } else { "Chó" }))
        .collect();
    let mut view = ListingView::with_page_size(
        ListingVariant::HomeCarousel,
        std::num::NonZeroUsize::new(6).expect("non-zero page size"),
    );
    let ticket = view.begin_categories_fetch();
    view.apply_categories(ticket, Ok(categories()));
    let ticket = view.begin_records_fetch();
    view.apply_records(ticket, Ok(json!(posts)));

    view.go_to(3);
    assert_eq!(view.page_state().current_page, 3);
    assert_eq!(view.page_state().total_pages, 4);

    view.select_category(CategoryOptionValue::Id(2));

    assert_eq!(
        view.page_state(),
        PageState {
            current_page: 1,
            page_size: 6,
            total_pages: 1,
        }
    );
    assert_eq!(ids(view.current_page_records()), vec![4, 8, 12, 16, 20]);
}

#[test]
fn three_record_scenario_end_to_end() {
    let body = json!([
        post(1, "Available", "Approved", "Chó"),
        post(2, "Adopted", "Approved", "Mèo"),
        post(3, "Available", "Rejected", "Chó"),
    ]);

    let records = RecordNormalizer::default()
        .normalize(&body)
        .expect("normalized");
    assert_eq!(ids(&records), vec![1]);

    let resolver = CategoryResolver::new(categories());
    let by_name = FilterState {
        category: CategorySelection::Name("Chó".to_string()),
        ..Default::default()
    };
    let by_id = FilterState {
        category: CategorySelection::Id(1),
        ..Default::default()
    };

    assert_eq!(
        ids(&FilterEngine::apply(&records, &by_name, &resolver)),
        vec![1]
    );
    assert_eq!(ids(&FilterEngine::apply(&records, &by_id, &resolver)), vec![1]);
    assert_eq!(
        ids(&FilterEngine::apply(
            &records,
            &FilterState::default(),
            &resolver
        )),
        vec![1]
    );
}

#[tokio::test]
async fn session_renders_cards_for_the_current_page() {
    let source = StaticSource {
        posts: json!({ "data": [
            post(1, "Available", "Approved", "Chó"),
            post(2, "Available", "Approved", "Mèo"),
            post(3, "Adopted", "Approved", "Mèo"),
        ]}),
        categories: categories(),
    };
    let session = ListingSession::new(source, ListingView::new(ListingVariant::Gallery));

    session.refresh().await;
    session
        .update(|view| {
            let selection = view.category_selection(CategoryOptionValue::Id(2));
            assert_eq!(selection, CategorySelection::Name("Mèo".to_string()));
            view.update_filter(|filters| filters.category = selection);
        })
        .await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.status, ListingStatus::Ready);

    let page = ListingPageView::from_snapshot(&snapshot);
    assert_eq!(page.cards.len(), 1);
    let card = &page.cards[0];
    assert_eq!(card.navigation_key, RecordKey::Post(2));
    assert_eq!(card.badge_text, "Mèo");
    assert_eq!(card.age_location_text, "2 tuổi");
    assert_eq!(card.area_text, "Hà Nội");
    assert_eq!(card.detail_path(), "/pets/2");
    assert_eq!((page.current_page, page.total_pages), (1, 1));
}

#[tokio::test]
async fn staff_table_keeps_adopted_pets_for_status_filtering() {
    let source = StaticSource {
        posts: json!([
            post(1, "Available", "Approved", "Chó"),
            post(2, "Adopted", "Approved", "Mèo"),
            post(3, "Available", "Rejected", "Chó"),
        ]),
        categories: categories(),
    };
    let session = ListingSession::new(source, ListingView::new(ListingVariant::StaffTable));
    session.refresh().await;

    let adopted = session
        .update(|view| {
            view.update_filter(|filters| {
                filters.status = bonchan::application::filter::Selection::Only(
                    bonchan::domain::types::AdoptionStatus::Adopted,
                );
            });
            ids(view.current_page_records())
        })
        .await;

    assert_eq!(adopted, vec![2]);
}
