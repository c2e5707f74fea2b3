//! Dispatch site lifecycle: placeholder, re-render, failure and teardown.

use futures::StreamExt;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tessera::{
    Domain, EntryStatus, LoadError, LoadState, Loadable, LoaderConfig, RenderContext, Rendered,
    RetryPolicy, SitePhase, TypeKey, rerender_channel, testing::ScriptedSource,
};

mod common;
use common::{dashboard, dashboard_with, settle};

#[tokio::test]
async fn test_device_selector_end_to_end() {
    let source = Arc::new(ScriptedSource::new().manual("ha-selector-device"));
    let dashboard = dashboard(&source);
    let (notify, mut rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Selector, notify);
    assert_eq!(site.phase(), SitePhase::Idle);

    let raw = json!({ "device": { "integration": "hue", "multiple": false } });
    let ctx = RenderContext::new().with_show_advanced(true);

    let rendered = site.render(&raw, &ctx);
    assert!(matches!(rendered, Rendered::Placeholder { ref key } if key == "device"));
    assert_eq!(site.phase(), SitePhase::Placeholder);
    assert!(site.is_watching());

    assert!(source.complete("ha-selector-device"));
    assert_eq!(rerender.next().await, Some(site.id()));

    let rendered = site.refresh().unwrap();
    assert_eq!(site.phase(), SitePhase::Ready);
    assert!(!site.is_watching());
    match rendered {
        Rendered::Ready { key, element, view } => {
            assert_eq!(key, "device");
            assert_eq!(element, "ha-selector-device");
            assert_eq!(
                view["props"],
                json!({
                    "type": "device",
                    "options": { "filter": { "integration": "hue" }, "multiple": false },
                    "config": {}
                })
            );
        }
        other => panic!("expected a ready rendering, got {other:?}"),
    }

    // Exactly one notification.
    let more = tokio::time::timeout(Duration::from_millis(20), rerender.next()).await;
    assert!(more.is_err());
    assert_eq!(source.fetch_count("ha-selector-device"), 1);
    assert_eq!(source.factory("ha-selector-device").created(), 1);
}

#[tokio::test]
async fn test_repeated_renders_while_loading_notify_once() {
    let source = Arc::new(ScriptedSource::new().manual("hui-map-card"));
    let dashboard = dashboard(&source);
    let (notify, mut rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Card, notify);
    let ctx = RenderContext::new();

    for zoom in 1..=3 {
        let rendered = site.render(&json!({ "type": "map", "default_zoom": zoom }), &ctx);
        assert!(rendered.is_placeholder());
    }
    assert!(source.complete("hui-map-card"));
    assert_eq!(rerender.next().await, Some(site.id()));

    let rendered = site.refresh().unwrap();
    assert_eq!(rendered.view().unwrap()["props"]["config"], json!({ "default_zoom": 3 }));

    let more = tokio::time::timeout(Duration::from_millis(20), rerender.next()).await;
    assert!(more.is_err());
}

#[tokio::test]
async fn test_instance_is_updated_then_replaced() {
    let source = Arc::new(
        ScriptedSource::new()
            .with_bundled("hui-tile-card")
            .with_bundled("hui-entities-card"),
    );
    let dashboard = dashboard(&source);
    let (notify, _rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Card, notify);
    let ctx = RenderContext::new();
    let tile = source.factory("hui-tile-card");
    let entities = source.factory("hui-entities-card");

    assert!(site.render(&json!({ "type": "tile", "entity": "light.a" }), &ctx).is_ready());
    assert!(site.render(&json!({ "type": "TILE", "entity": "light.b" }), &ctx).is_ready());
    assert_eq!(tile.created(), 1);
    assert_eq!(tile.updates(), 1);
    assert_eq!(site.key().map(TypeKey::as_str), Some("tile"));

    let rendered = site.render(&json!({ "type": "entities", "entities": [] }), &ctx);
    assert!(rendered.is_ready());
    assert_eq!(entities.created(), 1);
    assert_eq!(site.key().map(TypeKey::as_str), Some("entities"));
    assert_eq!(tile.created(), 1);
}

#[tokio::test]
async fn test_fallbacks_do_not_touch_the_loader() {
    let source = Arc::new(ScriptedSource::new());
    let dashboard = dashboard(&source);
    let (notify, _rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Card, notify);
    let ctx = RenderContext::new();

    let rendered = site.render(&json!({ "title": "no type" }), &ctx);
    assert!(matches!(
        rendered,
        Rendered::Fallback { element: Some("hui-error-card"), .. }
    ));
    assert_eq!(site.phase(), SitePhase::Error);

    let rendered = site.render(&json!({ "type": "custom:button-card" }), &ctx);
    assert!(rendered.is_error());
    assert_eq!(site.phase(), SitePhase::Error);
    assert_eq!(source.total_fetches(), 0);
}

#[tokio::test]
async fn test_theme_failure_is_reattempted() {
    let source = Arc::new(ScriptedSource::new().manual("ha-selector-theme"));
    let dashboard = dashboard(&source);
    let (notify, mut rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Selector, notify);
    let ctx = RenderContext::new();

    assert!(site.render(&json!({ "theme": {} }), &ctx).is_placeholder());
    assert!(source.fail("ha-selector-theme", "network down"));
    assert_eq!(rerender.next().await, Some(site.id()));

    let rendered = site.refresh().unwrap();
    assert!(matches!(
        rendered,
        Rendered::Failed { error: LoadError::Fetch { .. }, .. }
    ));
    assert_eq!(site.phase(), SitePhase::Error);
    assert_eq!(source.fetch_count("ha-selector-theme"), 1);

    // An independent request starts a new load.
    source.succeed("ha-selector-theme");
    let loader = dashboard.selectors().loader();
    let handle = loader.ensure_loaded(&TypeKey::new("theme")).unwrap();
    let factory = handle.await.unwrap();
    assert_eq!(factory.element(), "ha-selector-theme");
    assert_eq!(source.fetch_count("ha-selector-theme"), 2);

    assert!(site.render(&json!({ "theme": {} }), &ctx).is_ready());
}

#[tokio::test]
async fn test_render_after_failure_starts_a_new_load() {
    let source = Arc::new(ScriptedSource::new().manual("ha-selector-theme"));
    let dashboard = dashboard(&source);
    let (notify, mut rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Selector, notify);
    let ctx = RenderContext::new();

    assert!(site.render(&json!({ "theme": {} }), &ctx).is_placeholder());
    assert!(source.fail("ha-selector-theme", "network down"));
    assert_eq!(rerender.next().await, Some(site.id()));

    // A new config arrives before the site refreshes.
    assert!(site.render(&json!({ "theme": {} }), &ctx).is_placeholder());
    assert_eq!(source.fetch_count("ha-selector-theme"), 2);
    assert!(site.is_watching());

    assert!(source.complete("ha-selector-theme"));
    assert_eq!(rerender.next().await, Some(site.id()));
    let rendered = site.refresh().unwrap();
    assert!(matches!(rendered, Rendered::Ready { ref key, .. } if key == "theme"));
}

#[tokio::test]
async fn test_theme_failure_is_sticky() {
    let source = Arc::new(ScriptedSource::new().manual("ha-selector-theme"));
    let dashboard =
        dashboard_with(&source, LoaderConfig::new().with_retry(RetryPolicy::Sticky));
    let (notify, mut rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Selector, notify);
    let ctx = RenderContext::new();

    assert!(site.render(&json!({ "theme": {} }), &ctx).is_placeholder());
    assert!(source.fail("ha-selector-theme", "network down"));
    assert_eq!(rerender.next().await, Some(site.id()));
    assert!(site.refresh().unwrap().is_error());

    source.succeed("ha-selector-theme");
    let loader = dashboard.selectors().loader();
    let handle = loader.ensure_loaded(&TypeKey::new("theme")).unwrap();
    assert_eq!(handle.state(), LoadState::Failed);
    assert!(handle.await.is_err());

    assert!(site.render(&json!({ "theme": {} }), &ctx).is_error());
    assert_eq!(source.fetch_count("ha-selector-theme"), 1);
}

#[tokio::test]
async fn test_teardown_stops_listening_but_not_loading() {
    let source = Arc::new(ScriptedSource::new().manual("ha-selector-location"));
    let dashboard = dashboard(&source);
    let (notify, mut rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Selector, notify);

    assert!(site.render(&json!({ "location": {} }), &RenderContext::new()).is_placeholder());
    drop(site);

    assert!(source.complete("ha-selector-location"));
    let registry = dashboard.selectors().loader().registry();
    assert!(settle(|| registry.status("location") == Some(EntryStatus::Loaded)).await);

    // Every sender is gone and nothing was sent.
    assert_eq!(rerender.next().await, None);
}

#[tokio::test]
async fn test_switching_type_while_loading_watches_the_new_load() {
    let source = Arc::new(
        ScriptedSource::new()
            .manual("ha-selector-date")
            .manual("ha-selector-time"),
    );
    let dashboard = dashboard(&source);
    let (notify, mut rerender) = rerender_channel();
    let mut site = dashboard.site(Domain::Selector, notify);
    let ctx = RenderContext::new();

    assert!(site.render(&json!({ "date": {} }), &ctx).is_placeholder());
    assert!(site.render(&json!({ "time": {} }), &ctx).is_placeholder());

    // The abandoned load still completes, silently.
    assert!(source.complete("ha-selector-date"));
    let registry = dashboard.selectors().loader().registry();
    assert!(settle(|| registry.status("date") == Some(EntryStatus::Loaded)).await);
    let early = tokio::time::timeout(Duration::from_millis(20), rerender.next()).await;
    assert!(early.is_err());

    assert!(source.complete("ha-selector-time"));
    assert_eq!(rerender.next().await, Some(site.id()));
    let rendered = site.refresh().unwrap();
    assert!(matches!(rendered, Rendered::Ready { ref key, .. } if key == "time"));
}
