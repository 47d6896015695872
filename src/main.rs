#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use slint::{Color, ModelRc, SharedString, Timer, TimerMode, VecModel};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use github_finder::forward::forward_changes;
use github_finder::models::SuggestionList;
use github_finder::render::{
    self, format_count, CountUp, ProfileStats, RepoListView, COUNT_UP_TICK,
};
use github_finder::share::Sharer;
use github_finder::{Config, Finder, GitHubApi, GitHubClient, Location, ViewState};

slint::include_modules!();

/// Look up a GitHub user and their latest repositories.
#[derive(Debug, Parser)]
#[command(name = "github-finder", version)]
struct Cli {
    /// Page URL with a `user` parameter, or a bare username, to open with.
    location: Option<String>,
}

thread_local! {
    // One running stat animation at a time; restarting replaces it.
    static STAT_TIMER: Timer = Timer::default();
}

fn main() -> Result<()> {
    // Load .env variables
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load();

    // Background tokio runtime for async HTTP
    let rt = Runtime::new().context("Failed to start the async runtime")?;

    // Shared HTTP Client
    let client = GitHubClient::from_config(&config)?;
    let http = client.http().clone();
    let api: Arc<dyn GitHubApi> = Arc::new(client);

    let location = Location::from_launch(config.page_url.clone(), cli.location.as_deref());
    info!(location = %location.current(), "starting");
    let finder = Arc::new(Finder::new(
        api,
        location,
        Sharer::default(),
        rt.handle().clone(),
    ));

    // Create the UI
    let app = AppWindow::new()?;

    // =============================================
    //  CALLBACKS: search box
    // =============================================
    {
        let finder = Arc::clone(&finder);
        app.on_search_requested(move |query| {
            finder.search(query.as_str());
        });
    }
    {
        let finder = Arc::clone(&finder);
        app.on_query_edited(move |text| finder.edit(text.as_str()));
    }

    // =============================================
    //  CALLBACKS: suggestion dropdown
    // =============================================
    {
        let finder = Arc::clone(&finder);
        let app_weak = app.as_weak();
        app.on_suggestion_selected(move |index| {
            let Ok(index) = usize::try_from(index) else {
                return;
            };
            let Some(user) = finder
                .suggestions()
                .and_then(|list| list.users.get(index).cloned())
            else {
                return;
            };
            if let Some(app) = app_weak.upgrade() {
                app.set_search_query(user.login.as_str().into());
                app.set_show_suggestions(false);
            }
            finder.select_suggestion(index);
        });
    }
    {
        let finder = Arc::clone(&finder);
        let app_weak = app.as_weak();
        app.on_dismiss_suggestions(move || {
            finder.dismiss_suggestions();
            if let Some(app) = app_weak.upgrade() {
                app.set_show_suggestions(false);
            }
        });
    }

    // =============================================
    //  CALLBACKS: profile actions
    // =============================================
    {
        let finder = Arc::clone(&finder);
        app.on_share_clicked(move || {
            let outcome = finder.share();
            debug!(?outcome, "share");
        });
    }
    app.on_profile_clicked(|url| open_link(url.as_str()));
    app.on_repo_clicked(|url| open_link(url.as_str()));

    // =============================================
    //  STATE FORWARDING: flows -> window
    // =============================================
    forward_view(&rt, &app, http.clone(), finder.subscribe_view());
    forward_suggestions(&rt, &app, &finder, http, finder.subscribe_suggestions());
    forward_toast(&rt, &app, finder.subscribe_toast());

    // A `user` parameter in the launch location triggers a lookup.
    if let Some(user) = finder.location().user() {
        app.set_search_query(user.as_str().into());
        finder.restore();
    }

    // Run the Slint event loop
    app.run()?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("github_finder=info"));
    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        // No subscriber to log through.
        eprintln!("tracing init failed: {e}");
    }
}

fn open_link(url: &str) {
    // Open the raw URL in the native Web Browser
    if let Err(e) = open::that(url) {
        warn!(%url, error = %e, "failed to open link");
    }
}

fn forward_view(
    rt: &Runtime,
    app: &AppWindow,
    http: reqwest::Client,
    rx: watch::Receiver<ViewState>,
) {
    let app_weak = app.as_weak();
    let handle = rt.handle().clone();
    forward_changes(rt.handle(), rx, move |state| {
        let avatar = state
            .as_showing()
            .map(|showing| (showing.profile.login.clone(), showing.profile.avatar_url.clone()));

        let weak = app_weak.clone();
        let posted = slint::invoke_from_event_loop(move || {
            if let Some(app) = weak.upgrade() {
                apply_view(&app, &state);
            }
        });
        if posted.is_err() {
            return false;
        }

        if let Some((login, url)) = avatar {
            let http = http.clone();
            let weak = app_weak.clone();
            handle.spawn(async move {
                let pixels = download_avatar_pixels(&http, &url, 128).await;
                let _ = slint::invoke_from_event_loop(move || {
                    let Some(app) = weak.upgrade() else { return };
                    // Only if the same profile is still on screen.
                    if app.get_show_profile() && app.get_login_name().as_str() == login {
                        app.set_avatar(to_image(pixels));
                    }
                });
            });
        }
        true
    });
}

fn apply_view(app: &AppWindow, state: &ViewState) {
    let panels = state.panels();
    app.set_is_loading(panels.loader);
    app.set_show_error(panels.error);
    app.set_show_profile(panels.profile);
    app.set_error_message(state.error_message().unwrap_or_default().into());

    let Some(showing) = state.as_showing() else {
        return;
    };

    let profile = render::profile_view(&showing.profile);
    app.set_avatar(slint::Image::default());
    app.set_avatar_alt(profile.avatar_alt.into());
    app.set_display_name(profile.display_name.into());
    app.set_login_name(profile.login.into());
    app.set_bio(profile.bio.into());
    app.set_has_location(profile.location.is_some());
    app.set_location_text(profile.location.unwrap_or_default().into());
    app.set_has_company(profile.company.is_some());
    app.set_company_text(profile.company.unwrap_or_default().into());
    app.set_profile_url(profile.profile_url.into());
    animate_stats(app, profile.stats);

    app.set_repos_notice(showing.repos_notice.unwrap_or_default().into());
    let items: Vec<RepoItem> = match render::repo_list_view(&showing.repos) {
        RepoListView::Placeholder(text) => {
            app.set_repos_placeholder(text.into());
            Vec::new()
        }
        RepoListView::Cards(cards) => {
            app.set_repos_placeholder(SharedString::default());
            cards
                .into_iter()
                .map(|card| RepoItem {
                    name: card.name.into(),
                    url: card.url.into(),
                    description: card.description.into(),
                    has_language: card.language.is_some(),
                    language_color: card
                        .language
                        .as_ref()
                        .map_or_else(Color::default, |badge| hex_color(badge.color)),
                    language: card.language.map(|badge| badge.name).unwrap_or_default().into(),
                    stars: format_count(card.stars).into(),
                    forks: format_count(card.forks).into(),
                    has_issues: card.open_issues.is_some(),
                    issues: card.open_issues.map(format_count).unwrap_or_default().into(),
                })
                .collect()
        }
    };
    app.set_repo_list(ModelRc::new(VecModel::from(items)));
}

/// Counts the four stat fields up from zero, one frame per tick.
fn animate_stats(app: &AppWindow, stats: ProfileStats) {
    let mut counters = stats.as_array().map(CountUp::new);
    set_stats(app, [0; 4]);

    let app_weak = app.as_weak();
    STAT_TIMER.with(|timer| {
        timer.start(TimerMode::Repeated, COUNT_UP_TICK, move || {
            let Some(app) = app_weak.upgrade() else {
                STAT_TIMER.with(Timer::stop);
                return;
            };
            let frame: [u64; 4] = std::array::from_fn(|i| {
                let counter = &mut counters[i];
                counter.next().unwrap_or(counter.target())
            });
            set_stats(&app, frame);
            if counters.iter().all(CountUp::is_finished) {
                STAT_TIMER.with(Timer::stop);
            }
        });
    });
}

fn set_stats(app: &AppWindow, [repos, followers, following, gists]: [u64; 4]) {
    app.set_repos(format_count(repos).into());
    app.set_followers(format_count(followers).into());
    app.set_following(format_count(following).into());
    app.set_gists(format_count(gists).into());
}

fn forward_suggestions(
    rt: &Runtime,
    app: &AppWindow,
    finder: &Arc<Finder>,
    http: reqwest::Client,
    rx: watch::Receiver<Option<SuggestionList>>,
) {
    let app_weak = app.as_weak();
    let finder = Arc::clone(finder);
    let handle = rt.handle().clone();
    forward_changes(rt.handle(), rx, move |list| {
        let Some(list) = list else {
            let weak = app_weak.clone();
            return slint::invoke_from_event_loop(move || {
                if let Some(app) = weak.upgrade() {
                    app.set_show_suggestions(false);
                }
            })
            .is_ok();
        };

        let http = http.clone();
        let weak = app_weak.clone();
        let finder = Arc::clone(&finder);
        handle.spawn(async move {
            // Download all avatar thumbnails in parallel
            let handles: Vec<_> = list
                .users
                .iter()
                .map(|user| {
                    let http = http.clone();
                    let url = user.avatar_url.clone();
                    tokio::spawn(async move { download_avatar_pixels(&http, &url, 32).await })
                })
                .collect();
            let mut avatars = Vec::with_capacity(handles.len());
            for handle in handles {
                avatars.push(handle.await.ok().flatten());
            }

            let _ = slint::invoke_from_event_loop(move || {
                let Some(app) = weak.upgrade() else { return };
                // The dropdown may have been dismissed or replaced while avatars loaded.
                if finder.suggestions().as_ref() != Some(&list) {
                    return;
                }
                let items: Vec<UserItem> = list
                    .users
                    .iter()
                    .zip(avatars)
                    .map(|(user, pixels)| UserItem {
                        login: user.login.as_str().into(),
                        avatar: to_image(pixels),
                    })
                    .collect();
                app.set_suggestions(ModelRc::new(VecModel::from(items)));
                app.set_show_suggestions(true);
            });
        });
        true
    });
}

fn forward_toast(rt: &Runtime, app: &AppWindow, rx: watch::Receiver<Option<String>>) {
    let app_weak = app.as_weak();
    forward_changes(rt.handle(), rx, move |message| {
        let weak = app_weak.clone();
        slint::invoke_from_event_loop(move || {
            if let Some(app) = weak.upgrade() {
                app.set_show_toast(message.is_some());
                app.set_toast_message(message.unwrap_or_default().into());
            }
        })
        .is_ok()
    });
}

type Pixels = (Vec<u8>, u32, u32);

/// Upper bound on one avatar download; a stalled image just stays blank.
const AVATAR_TIMEOUT: Duration = Duration::from_secs(10);

fn to_image(pixels: Option<Pixels>) -> slint::Image {
    let Some((px, w, h)) = pixels else {
        return slint::Image::default();
    };
    let buf = slint::SharedPixelBuffer::<slint::Rgba8Pixel>::clone_from_slice(&px, w, h);
    slint::Image::from_rgba8(buf)
}

fn hex_color(hex: &str) -> Color {
    let rgb = u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or_default();
    let [_, r, g, b] = rgb.to_be_bytes();
    Color::from_rgb_u8(r, g, b)
}

/// Downloads avatar image bytes and decodes them into raw RGBA pixels.
async fn download_avatar_pixels(client: &reqwest::Client, url: &str, size: u32) -> Option<Pixels> {
    let mut sized_url = reqwest::Url::parse(url).ok()?;
    sized_url.query_pairs_mut().append_pair("s", &size.to_string());

    let bytes = client
        .get(sized_url)
        .timeout(AVATAR_TIMEOUT)
        .send()
        .await
        .map_err(|e| debug!(%url, error = %e, "avatar request failed"))
        .ok()?
        .bytes()
        .await
        .ok()?;
    let dynamic_image = image::load_from_memory(&bytes)
        .map_err(|e| debug!(%url, error = %e, "avatar decode failed"))
        .ok()?;

    // GitHub sometimes ignores the size hint for cached avatars.
    let resized = dynamic_image.thumbnail_exact(size, size);
    let rgba = resized.to_rgba8();
    let (w, h) = rgba.dimensions();

    Some((rgba.into_raw(), w, h))
}
