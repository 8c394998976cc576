mod common;

use local_chef_bazaar::{
    client::screens::{
        home::{HOME_MEALS_PAGE_SIZE, HomeScreen},
        meals::{MEALS_PAGE_SIZE, MealBrowser},
    },
    dto::params::{MealListQuery, Pagination, SortOrder, total_pages},
};

#[test]
fn total_pages_rounds_up() {
    assert_eq!(total_pages(0, 9), 0);
    assert_eq!(total_pages(1, 9), 1);
    assert_eq!(total_pages(9, 9), 1);
    assert_eq!(total_pages(10, 9), 2);
    assert_eq!(total_pages(12, 6), 2);
}

#[test]
fn pagination_is_normalized() {
    assert_eq!(Pagination::default().normalize(), (1, 10, 0));
    assert_eq!(Pagination::new(0, 500).normalize(), (1, 100, 0));
    assert_eq!(Pagination::new(3, 9).normalize(), (3, 9, 18));
    assert_eq!(
        Pagination::new(i64::MAX, 9).normalize(),
        (i64::MAX, 9, i64::MAX)
    );
    assert_eq!(total_pages(i64::MAX, 2), i64::MAX / 2 + 1);
}

#[test]
fn browser_resets_page_when_filters_change() {
    let mut browser = MealBrowser::new();
    browser.next_page();
    browser.next_page();
    assert_eq!(browser.page(), 3);

    browser.set_search("  pasta ");
    assert_eq!(browser.page(), 1);
    assert_eq!(
        browser.query(),
        MealListQuery {
            page: Some(1),
            limit: Some(MEALS_PAGE_SIZE),
            search: Some("pasta".to_string()),
            sort: None,
        }
    );

    browser.go_to(4);
    browser.set_sort(Some(SortOrder::Desc));
    assert_eq!(browser.page(), 1);
    browser.previous_page();
    assert_eq!(browser.page(), 1);
}

#[tokio::test]
async fn pages_search_and_sort_come_from_the_backend() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    for i in 1..=12 {
        common::create_meal(&chef, &format!("Meal {i:02}"), 100 + i).await;
    }
    common::create_meal(&chef, "Pasta Alfredo", 250).await;

    let visitor = common::client(&server).await;
    let mut browser = MealBrowser::new();

    let first = browser.load(&visitor).await.into_ready().expect("first page");
    assert_eq!(first.items.len(), 9);
    assert_eq!(first.total, 13);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next);

    browser.next_page();
    let second = browser.load(&visitor).await.into_ready().expect("second page");
    assert_eq!(second.items.len(), 4);
    assert!(!second.has_next);
    assert!(second.has_previous);

    browser.go_to(7);
    let beyond = browser.load(&visitor).await.into_ready().expect("empty page");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 13);
    assert_eq!(beyond.total_pages, 2);

    let far = visitor
        .meals(MealListQuery {
            page: Some(i64::MAX),
            limit: Some(MEALS_PAGE_SIZE),
            ..Default::default()
        })
        .await?;
    assert!(far.items.is_empty());
    assert_eq!(far.total, 13);
    assert!(!far.has_next());

    browser.set_search("PASTA");
    let found = browser.load(&visitor).await.into_ready().expect("search");
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].name, "Pasta Alfredo");

    browser.set_search("");
    browser.set_sort(Some(SortOrder::Asc));
    let cheapest = browser.load(&visitor).await.into_ready().expect("sorted");
    assert_eq!(cheapest.items[0].price, 101);

    browser.set_sort(Some(SortOrder::Desc));
    let dearest = browser.load(&visitor).await.into_ready().expect("sorted");
    assert_eq!(dearest.items[0].price, 250);

    let home = HomeScreen::load(&visitor).await;
    assert_eq!(
        home.meals.ready().map(Vec::len),
        Some(HOME_MEALS_PAGE_SIZE as usize)
    );
    assert_eq!(home.recent_reviews.ready().map(Vec::len), Some(0));
    Ok(())
}
