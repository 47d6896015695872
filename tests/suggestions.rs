//! Debounced suggestion behaviour. All tests run on a paused clock.

mod support;

use std::sync::Arc;
use std::time::Duration;

use github_finder::suggest::QUIET_PERIOD;
use github_finder::{ApiError, LookupOutcome};
use reqwest::StatusCode;
use support::{finder, settle, FakeApi};

const JUST_BEFORE: Duration = Duration::from_millis(299);

async fn wait_out_quiet_period() {
    tokio::time::sleep(QUIET_PERIOD + Duration::from_millis(1)).await;
    settle().await;
}

#[tokio::test(start_paused = true)]
async fn short_input_schedules_nothing() {
    let api = Arc::new(FakeApi::default().with_search("ab", &["abby"]));
    let finder = finder(&api);

    finder.edit("ab");
    wait_out_quiet_period().await;
    finder.edit("  ab  ");
    wait_out_quiet_period().await;

    assert!(api.search_calls().is_empty());
    assert_eq!(finder.suggestions(), None);
}

#[tokio::test(start_paused = true)]
async fn quiet_period_issues_exactly_one_fetch() {
    let api = Arc::new(FakeApi::default().with_search("abc", &["abc", "abcde"]));
    let finder = finder(&api);

    finder.edit("abc");
    tokio::time::sleep(JUST_BEFORE).await;
    settle().await;
    assert!(api.search_calls().is_empty());

    wait_out_quiet_period().await;
    assert_eq!(api.search_calls(), vec!["abc".to_owned()]);

    let list = finder.suggestions().expect("dropdown is shown");
    assert_eq!(list.query, "abc");
    let logins: Vec<&str> = list.users.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, ["abc", "abcde"]);
}

#[tokio::test(start_paused = true)]
async fn typing_within_the_window_reschedules() {
    let api = Arc::new(
        FakeApi::default()
            .with_search("abc", &["abc"])
            .with_search("abcd", &["abcd"]),
    );
    let finder = finder(&api);

    finder.edit("abc");
    tokio::time::sleep(Duration::from_millis(200)).await;
    finder.edit("abcd");
    wait_out_quiet_period().await;

    assert_eq!(api.search_calls(), vec!["abcd".to_owned()]);
    assert_eq!(finder.suggestions().map(|l| l.query), Some("abcd".to_owned()));
}

#[tokio::test(start_paused = true)]
async fn search_failure_is_swallowed() {
    let api = Arc::new(FakeApi::default().with_search_error(
        "abc",
        ApiError::Status {
            status: StatusCode::FORBIDDEN,
        },
    ));
    let finder = finder(&api);

    finder.edit("abc");
    wait_out_quiet_period().await;

    assert_eq!(api.search_calls(), vec!["abc".to_owned()]);
    assert_eq!(finder.suggestions(), None);
    assert_eq!(finder.view().error_message(), None);
}

#[tokio::test(start_paused = true)]
async fn empty_result_shows_no_dropdown() {
    let api = Arc::new(FakeApi::default().with_search("zzzzzz", &[]));
    let finder = finder(&api);

    finder.edit("zzzzzz");
    wait_out_quiet_period().await;

    assert_eq!(finder.suggestions(), None);
}

#[tokio::test(start_paused = true)]
async fn at_most_five_candidates() {
    let api = Arc::new(
        FakeApi::default().with_search("dev", &["dev1", "dev2", "dev3", "dev4", "dev5", "dev6"]),
    );
    let finder = finder(&api);

    finder.edit("dev");
    wait_out_quiet_period().await;

    assert_eq!(finder.suggestions().map(|l| l.users.len()), Some(5));
}

#[tokio::test(start_paused = true)]
async fn selecting_a_suggestion_runs_one_lookup() {
    let api = Arc::new(
        FakeApi::default()
            .with_search("octo", &["octocat", "octokit"])
            .with_user("octokit", Vec::new()),
    );
    let finder = finder(&api);

    finder.edit("octo");
    wait_out_quiet_period().await;

    let handle = finder.select_suggestion(1).expect("entry exists");
    assert_eq!(finder.query(), "octokit");
    assert_eq!(finder.suggestions(), None);

    assert_eq!(handle.await.unwrap(), LookupOutcome::Shown);
    assert_eq!(api.user_calls(), vec!["octokit".to_owned()]);
    assert_eq!(finder.location().user().as_deref(), Some("octokit"));
}

#[tokio::test(start_paused = true)]
async fn selecting_outside_the_list_does_nothing() {
    let api = Arc::new(FakeApi::default().with_search("octo", &["octocat"]));
    let finder = finder(&api);

    finder.edit("octo");
    wait_out_quiet_period().await;

    assert!(finder.select_suggestion(3).is_none());
    assert!(finder.suggestions().is_some());
    assert!(api.user_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn outside_click_dismisses() {
    let api = Arc::new(FakeApi::default().with_search("octo", &["octocat"]));
    let finder = finder(&api);

    finder.edit("octo");
    wait_out_quiet_period().await;
    assert!(finder.suggestions().is_some());

    finder.dismiss_suggestions();
    assert_eq!(finder.suggestions(), None);
}

#[tokio::test(start_paused = true)]
async fn shortening_the_input_removes_the_dropdown() {
    let api = Arc::new(FakeApi::default().with_search("octo", &["octocat"]));
    let finder = finder(&api);

    finder.edit("octo");
    wait_out_quiet_period().await;
    finder.edit("oc");

    assert_eq!(finder.suggestions(), None);
}

#[tokio::test(start_paused = true)]
async fn late_response_cannot_resurrect_dropdown_after_submit() {
    let api = Arc::new(
        FakeApi::default()
            .with_search("octo", &["octocat"])
            .with_delay("octo", Duration::from_millis(1000))
            .with_user("octo", Vec::new()),
    );
    let finder = finder(&api);

    finder.edit("octo");
    wait_out_quiet_period().await;
    assert_eq!(api.search_calls(), vec!["octo".to_owned()]);

    finder.submit().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    settle().await;

    assert_eq!(finder.suggestions(), None);
}

#[tokio::test(start_paused = true)]
async fn late_response_for_an_older_query_is_dropped() {
    let api = Arc::new(
        FakeApi::default()
            .with_search("octo", &["octocat"])
            .with_delay("octo", Duration::from_millis(1000)),
    );
    let finder = finder(&api);

    finder.edit("octo");
    wait_out_quiet_period().await;
    finder.edit("oc");
    tokio::time::sleep(Duration::from_millis(1500)).await;
    settle().await;

    assert_eq!(finder.suggestions(), None);
}
