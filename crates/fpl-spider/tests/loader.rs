mod common;

use common::{fixture, FixtureFetcher, BASE};
use fpl_spider::{ErrorKind, Loader, Params, Resource};
use serde_json::{json, Value};

fn rows(table: &fpl_spider::Table) -> Value {
    Value::Array(table.rows.iter().cloned().map(Value::Object).collect())
}

#[tokio::test]
async fn standings_scenario() {
    let fetcher = FixtureFetcher::new().with(
        "leagues-classic/741068/standings/",
        &json!({"standings": {"results": [{"entry": 1, "total": 50}, {"entry": 2, "total": 42}]}}),
    );
    let loader = Loader::new(fetcher);

    let table = loader
        .load(Resource::Standings.descriptor(), &Params::new().league(741068))
        .await
        .unwrap();

    assert_eq!(table.columns, ["entry", "total", "league_id"]);
    assert_eq!(
        rows(&table),
        json!([
            {"entry": 1, "total": 50, "league_id": 741068},
            {"entry": 2, "total": 42, "league_id": 741068}
        ])
    );
    assert_eq!(loader.fetcher().request_count(), 1);
}

#[tokio::test]
async fn total_players_scenario() {
    let fetcher =
        FixtureFetcher::new().with("bootstrap-static/", &json!({"total_players": 8823456}));
    let loader = Loader::new(fetcher);

    let table = loader
        .load(Resource::TotalPlayers.descriptor(), &Params::new())
        .await
        .unwrap();

    assert_eq!(rows(&table), json!([{"total_players": 8823456}]));
}

#[tokio::test]
async fn row_counts_match_fixtures() {
    let standings = fixture("standings.json").await;
    let history = fixture("entry_history.json").await;
    let picks = fixture("picks.json").await;
    let summary = fixture("element_summary.json").await;
    let bootstrap = fixture("bootstrap_static.json").await;

    let fetcher = FixtureFetcher::new()
        .with("leagues-classic/741068/standings/", &standings)
        .with("entry/1001/history/", &history)
        .with("entry/1001/event/7/picks/", &picks)
        .with("element-summary/355/", &summary)
        .with("bootstrap-static/", &bootstrap);
    let loader = Loader::new(fetcher);
    let params = Params::new().league(741068).entry(1001).event(7).element(355);

    for resource in Resource::ALL {
        let descriptor = resource.descriptor();
        let source = match resource {
            Resource::Standings => &standings,
            Resource::EntryHistory => &history,
            Resource::Picks => &picks,
            Resource::ElementFixtures | Resource::ElementHistory => &summary,
            _ => &bootstrap,
        };
        let expected = descriptor
            .key
            .iter()
            .fold(source, |json, key| &json[*key])
            .as_array()
            .map_or(1, Vec::len);

        let table = loader.load(descriptor, &params).await.unwrap();
        assert_eq!(table.len(), expected, "{resource}");
    }
}

#[tokio::test]
async fn enrichment_on_every_row() {
    let fetcher = FixtureFetcher::new()
        .with("entry/1001/event/7/picks/", &fixture("picks.json").await)
        .with("element-summary/355/", &fixture("element_summary.json").await);
    let loader = Loader::new(fetcher);

    let picks = loader
        .load(
            Resource::Picks.descriptor(),
            &Params::new().entry(1001).event(7),
        )
        .await
        .unwrap();
    assert_eq!(picks.len(), 4);
    assert!(picks.column("entry").all(|value| value == &json!(1001)));
    assert!(picks.column("event").all(|value| value == &json!(7)));
    assert_eq!(
        picks.columns,
        ["element", "position", "multiplier", "is_captain", "is_vice_captain", "entry", "event"]
    );

    let fixtures = loader
        .load(
            Resource::ElementFixtures.descriptor(),
            &Params::new().element(355),
        )
        .await
        .unwrap();
    assert_eq!(fixtures.len(), 2);
    assert!(fixtures.column("element_id").all(|value| value == &json!(355)));
}

#[tokio::test]
async fn same_response_same_table() {
    let fetcher =
        FixtureFetcher::new().with("bootstrap-static/", &fixture("bootstrap_static.json").await);
    let loader = Loader::new(fetcher);

    let first = loader
        .load(Resource::Elements.descriptor(), &Params::new())
        .await
        .unwrap();
    let second = loader
        .load(Resource::Elements.descriptor(), &Params::new())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    // `news` is only on the second element; the first gets null
    assert_eq!(first.rows[0]["news"], Value::Null);
}

#[tokio::test]
async fn missing_key_is_malformed_not_transport() {
    let fetcher = FixtureFetcher::new().with(
        "entry/1001/history/",
        &json!({"past": [], "chips": []}),
    );
    let loader = Loader::new(fetcher);

    let err = loader
        .load(Resource::EntryHistory.descriptor(), &Params::new().entry(1001))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn unparsable_body_is_malformed() {
    let fetcher = FixtureFetcher::new().with_raw("bootstrap-static/", "<html>The game is being updated.</html>");
    let loader = Loader::new(fetcher);

    let err = loader
        .load(Resource::Teams.descriptor(), &Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn unreachable_server_is_transport() {
    let loader = Loader::new(FixtureFetcher::new());

    let err = loader
        .load(Resource::Standings.descriptor(), &Params::new().league(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn missing_param_fails_before_request() {
    let loader = Loader::new(FixtureFetcher::new());

    let err = loader
        .load(Resource::EntryHistory.descriptor(), &Params::new().league(741068))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = loader
        .load(Resource::Picks.descriptor(), &Params::new().entry(0).event(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    assert_eq!(loader.fetcher().request_count(), 0);
}

#[tokio::test]
async fn custom_base_url() {
    let fetcher = FixtureFetcher::new();
    let loader = Loader::with_base_url(fetcher, "http://localhost:9000/api");

    let _ = loader
        .load(Resource::Teams.descriptor(), &Params::new())
        .await;
    assert_eq!(
        loader.fetcher().requests(),
        ["http://localhost:9000/api/bootstrap-static/"]
    );
    assert!(BASE.ends_with('/'));
}
