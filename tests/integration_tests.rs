use regex::Regex;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use task_manager_e2e::browser::{BrowserOptions, BrowserSession, DialogPolicy};
use task_manager_e2e::expect::TextMatcher;
use task_manager_e2e::locator::ElementState;
use task_manager_e2e::pages::{Locate, TaskManagerPage, Text};
use task_manager_e2e::scenarios::{self, Scenario};
use task_manager_e2e::{expect, PollConfig, WaitError};

async fn launch_test_browser(dialogs: DialogPolicy) -> BrowserSession {
    let options = BrowserOptions {
        no_sandbox: true,
        dialogs,
        ..BrowserOptions::default()
    };
    BrowserSession::launch(&options)
        .await
        .expect("Failed to launch browser")
}

fn fixture_url(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = PathBuf::from(manifest_dir).join("fixtures").join(name);
    format!("file://{}", path.display())
}

async fn open_task_manager(session: &BrowserSession) -> TaskManagerPage {
    TaskManagerPage::open(
        session,
        &fixture_url("task_manager.html"),
        PollConfig::default(),
    )
    .await
    .expect("Task manager page should load")
}

// ── Page Object Tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_cards_resolve_by_title() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    expect(&page.heading())
        .to_have_text(Text::TaskManager.as_str())
        .await
        .unwrap();
    let titles = [
        (page.daily_tip_card.card().title(), Text::DailyTip),
        (page.add_new_task_card.card().title(), Text::AddNewTask),
        (page.task_list_card.card().title(), Text::TaskList),
        (page.completed_tasks_card.card().title(), Text::CompletedTasks),
    ];
    for (title, text) in titles {
        assert_eq!(title.text_content().await.unwrap().trim(), text.as_str());
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_daily_tip_replaces_loading_text() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;
    let tip = page.daily_tip_card.tip_text();

    assert_eq!(
        tip.inner_text().await.unwrap(),
        Text::LoadingYourDailyTip.as_str()
    );
    expect(&tip)
        .with_timeout(Duration::from_millis(3000))
        .to_have_text(Text::StayFocusedAndPrioritize.as_str())
        .await
        .unwrap();

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_daily_tip_short_timeout_reports_last_text() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    let err = expect(&page.daily_tip_card.tip_text())
        .with_timeout(Duration::from_millis(300))
        .to_have_text(Text::StayFocusedAndPrioritize.as_str())
        .await
        .unwrap_err();

    match err {
        WaitError::Timeout {
            description,
            elapsed,
            ..
        } => {
            assert!(description.contains("Loading your daily tip..."), "{}", description);
            assert!(elapsed >= Duration::from_millis(300));
        }
        other => panic!("expected timeout, got {:?}", other),
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_daily_tip_partial_and_pattern_matches() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;
    let tip = page.daily_tip_card.tip_text();

    expect(&tip)
        .with_timeout(Duration::from_millis(3000))
        .to_contain_text("prioritize")
        .await
        .unwrap();
    expect(&tip)
        .to_match_text(&Regex::new(r"^Stay focused").unwrap())
        .await
        .unwrap();

    let err = expect(&tip)
        .with_timeout(Duration::from_millis(200))
        .to_match_text(&Regex::new(r"^Loading").unwrap())
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(err.to_string().contains("matching /^Loading/"), "{}", err);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_new_tasks_are_listed_first() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;
    let card = &page.add_new_task_card;
    let list = page.task_list_card.task_list();

    card.add_task("first", None).await.unwrap();
    card.add_task("second", None).await.unwrap();
    expect(&list.items()).to_have_count(2).await.unwrap();

    let tasks = list.tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].text().await.unwrap(), "second");
    assert_eq!(tasks[1].text().await.unwrap(), "first");
    assert!(!tasks[0].checkbox().is_checked().await.unwrap());
    assert_eq!(card.input_field().input_value().await.unwrap(), "");

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_priority_is_applied() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    page.add_new_task_card
        .add_task("urgent", Some("high"))
        .await
        .unwrap();

    let first = page.task_list_card.task_list().first_task();
    expect(first.root())
        .to_have_attribute("data-priority", "high")
        .await
        .unwrap();

    let err = page
        .add_new_task_card
        .priority()
        .select_option("critical")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No option with value critical"));

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_checking_a_task_strikes_it_through() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;
    page.add_new_task_card.add_task("water plants", None).await.unwrap();

    let task = page.task_list_card.task_list().task_with_text("water plants");
    assert!(!task.is_text_line_through().await.unwrap());

    task.checkbox().check().await.unwrap();
    expect(task.checkbox().root()).to_be_checked().await.unwrap();
    expect(&task.text_elem())
        .to_have_attribute("style", TextMatcher::Contains("line-through".into()))
        .await
        .unwrap();

    task.checkbox().uncheck().await.unwrap();
    expect(task.checkbox().root()).to_be_unchecked().await.unwrap();
    assert!(!task.is_text_line_through().await.unwrap());

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_delete_accepts_confirm_dialog() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    scenarios::delete_task(&session, &page, "throwaway")
        .await
        .unwrap();

    let dialog = session.dialogs().last().await.expect("confirm was recorded");
    assert_eq!(dialog.kind, "confirm");
    assert!(dialog.accepted);
    assert!(dialog.message.contains("delete this task"));
    expect(&page.task_list_card.task_list().items())
        .to_have_count(0)
        .await
        .unwrap();

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_dismissed_confirm_keeps_task() {
    let session = launch_test_browser(DialogPolicy::Dismiss).await;
    let page = open_task_manager(&session).await;
    page.add_new_task_card.add_task("keep me", None).await.unwrap();

    let task = page.task_list_card.task_list().task_with_text("keep me");
    task.delete_button().click().await.unwrap();

    let dialog = session.dialogs().last().await.expect("confirm was recorded");
    assert!(!dialog.accepted);
    expect(task.root()).to_be_visible().await.unwrap();

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_show_completed_tasks() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    scenarios::show_completed(&page, "done already").await.unwrap();
    assert_eq!(
        page.completed_tasks_card.completed_texts().await.unwrap(),
        vec!["done already".to_string()]
    );

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_blank_task_is_ignored() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    scenarios::add_task(&page, " ", PollConfig::default())
        .await
        .unwrap();
    assert_eq!(page.task_list_card.task_list().task_count().await.unwrap(), 0);

    session.close().await.unwrap();
}

// ── Wait Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_locate_waiting_times_out_on_missing_element() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    let start = Instant::now();
    let err = page
        .root()
        .locate_waiting(".//table", Duration::from_millis(300))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(err.to_string().contains("element with xpath"));
    assert!(start.elapsed() >= Duration::from_millis(300));

    let immediate = page
        .root()
        .locate_waiting(".//table", Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(immediate.count().await.unwrap(), 0);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_locate_waiting_finds_dynamic_element() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    let add = page.add_new_task_card.clone();
    let adder = async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        add.add_task("late arrival", None).await
    };
    let task_list = page.task_list_card.task_list();
    let (found, added) = tokio::join!(
        task_list
            .root()
            .locate_waiting(".//li", Duration::from_millis(3000)),
        adder
    );
    added.unwrap();
    assert_eq!(found.unwrap().count().await.unwrap(), 1);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_malformed_xpath_fails_without_retry() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;

    let broken = page.locate("//[");
    let start = Instant::now();
    let err = broken
        .wait_for_within(ElementState::Attached, PollConfig::from_millis(5000, 100).unwrap())
        .await
        .unwrap_err();
    assert!(!err.is_timeout(), "{:?}", err);
    assert!(start.elapsed() < Duration::from_millis(2000));

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_hidden_list_waits() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let page = open_task_manager(&session).await;
    let completed = page.completed_tasks_card.completed_list();

    completed.wait_for(ElementState::Hidden).await.unwrap();
    assert!(!completed.is_visible().await.unwrap());
    page.completed_tasks_card.show_completed().check().await.unwrap();
    completed.wait_for(ElementState::Visible).await.unwrap();

    session.close().await.unwrap();
}

// ── Suite Tests ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_suite_passes_on_fixture() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let report = scenarios::run(
        &session,
        &fixture_url("task_manager.html"),
        PollConfig::default(),
        &[
            Scenario::AddTask,
            Scenario::CompleteTask,
            Scenario::DeleteTask,
            Scenario::ShowCompleted,
        ],
    )
    .await;

    assert!(report.is_success(), "{:#?}", report);
    assert_eq!(report.outcomes.len(), 11);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_daily_tip_fails_only_below_load_delay() {
    let session = launch_test_browser(DialogPolicy::Accept).await;
    let report = scenarios::run(
        &session,
        &fixture_url("task_manager.html"),
        PollConfig::default(),
        &[Scenario::DailyTip],
    )
    .await;

    let failed: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| !o.passed())
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(failed, vec!["daily-tip[1000ms]"]);

    session.close().await.unwrap();
}
