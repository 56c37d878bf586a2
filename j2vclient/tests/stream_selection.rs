use j2vclient::{AppEvent, VidfeedApp};
use j2vfeed::{Error, FeedLayout, Listing};
use j2vplayer::{EngineCall, HeadlessEngineFactory};

const MOUNT: &str = "video_player";

fn new_app() -> (VidfeedApp<HeadlessEngineFactory>, HeadlessEngineFactory) {
    let factory = HeadlessEngineFactory::new();
    let app = VidfeedApp::with_layout(factory.clone(), FeedLayout::default(), MOUNT);
    (app, factory)
}

fn resets(factory: &HeadlessEngineFactory) -> Vec<(String, String)> {
    factory
        .probes()
        .iter()
        .flat_map(|probe| probe.calls())
        .filter_map(|call| match call {
            EngineCall::Initialize {
                mount_point, url, ..
            } => Some((mount_point, url)),
            _ => None,
        })
        .collect()
}

#[test]
fn first_listing_selects_first_stream() {
    let (mut app, factory) = new_app();
    let events = app.subscribe();

    let report = app
        .apply_refresh(Listing::from_json(r#"{"x":{"dir":"cam1","title":"Cam 1"}}"#))
        .unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(app.catalog().len(), 1);
    let current = app.current().unwrap();
    assert_eq!(current.id(), "cam1");
    assert_eq!(current.title.as_deref(), Some("Cam 1"));
    assert_eq!(current.description, None);
    assert_eq!(
        resets(&factory),
        vec![(MOUNT.to_string(), "vidfeed/cam1/stream.mpd".to_string())]
    );

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert!(matches!(received[0], AppEvent::CatalogRefreshed { total: 1, .. }));
    assert_eq!(
        received[1],
        AppEvent::SelectionChanged {
            id: "cam1".to_string(),
            manifest_url: "vidfeed/cam1/stream.mpd".to_string(),
        }
    );
}

#[test]
fn later_listing_updates_in_place_without_reselecting() {
    let (mut app, factory) = new_app();
    app.apply_refresh(Listing::from_json(
        r#"{"x":{"dir":"cam1","title":"Cam 1","desc":"porch"}}"#,
    ));

    let report = app
        .apply_refresh(Listing::from_json(
            r#"{"x":{"dir":"cam1","desc":"front porch"},"y":{"dir":"cam2"}}"#,
        ))
        .unwrap();

    assert_eq!((report.added, report.updated), (1, 1));
    let ids: Vec<_> = app.catalog().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec!["cam1", "cam2"]);
    let current = app.current().unwrap();
    assert_eq!(current.title.as_deref(), Some("Cam 1"));
    assert_eq!(current.description.as_deref(), Some("front porch"));
    assert_eq!(factory.created(), 1);
}

#[test]
fn empty_listing_selects_nothing() {
    let (mut app, factory) = new_app();

    app.apply_refresh(Listing::from_json("{}"));
    app.apply_refresh(Listing::from_json(r#"{"bad":{"title":"no dir"}}"#));

    assert!(app.catalog().is_empty());
    assert_eq!(app.selection().current_id(), None);
    assert_eq!(factory.created(), 0);
}

#[test]
fn user_selection_resets_player_exactly_once() {
    let (mut app, factory) = new_app();
    app.apply_refresh(Listing::from_json(
        r#"[{"dir":"cam1"},{"dir":"cam2","title":"Yard"}]"#,
    ));

    app.select("cam2").unwrap();

    assert_eq!(
        resets(&factory),
        vec![
            (MOUNT.to_string(), "vidfeed/cam1/stream.mpd".to_string()),
            (MOUNT.to_string(), "vidfeed/cam2/stream.mpd".to_string()),
        ]
    );
    assert!(factory.probes()[0].is_reset());
    assert_eq!(app.current().unwrap().title.as_deref(), Some("Yard"));

    app.apply_refresh(Listing::from_json(r#"[{"dir":"cam3"}]"#));
    assert_eq!(app.selection().current_id(), Some("cam2"));
    assert_eq!(factory.created(), 2);
}

#[test]
fn failed_refresh_keeps_catalog_and_playback() {
    let (mut app, factory) = new_app();
    app.apply_refresh(Listing::from_json(r#"{"x":{"dir":"cam1"}}"#));

    assert_eq!(app.apply_refresh(Err(Error::HttpStatus(500))), None);
    assert_eq!(app.apply_refresh(Listing::from_json("not json")), None);
    assert_eq!(app.apply_refresh(Listing::from_json("42")), None);

    assert_eq!(app.catalog().len(), 1);
    assert_eq!(app.player().url(), Some("vidfeed/cam1/stream.mpd"));
    assert!(!factory.latest().unwrap().is_reset());
}

#[test]
fn unknown_stream_cannot_be_selected() {
    let (mut app, factory) = new_app();

    assert!(matches!(app.select("cam1"), Err(Error::StreamNotFound(_))));
    assert_eq!(factory.created(), 0);
    assert!(!app.player().has_session());
}
