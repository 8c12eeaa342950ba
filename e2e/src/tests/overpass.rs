use httpmock::{Method::GET, MockServer};
use osm_api::{Bounds, ElementType, OverpassQuery};

use super::MockOsm;

#[tokio::test]
async fn configured_interpreters_are_used_in_order() {
    let overloaded = MockServer::start_async().await;
    let busy = overloaded
        .mock_async(|when, then| {
            when.method(GET).path("/api/interpreter");
            then.status(429).body("rate limited");
        })
        .await;

    let osm = MockOsm::start_with(&format!(
        "overpass_urls = [\"{}\", \"{}\"]",
        overloaded.url("/api/interpreter"),
        "http://127.0.0.1:9/api/interpreter",
    ))
    .await;
    let healthy_url = osm.server.url("/api/interpreter");
    let healthy = osm
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/interpreter");
            then.status(200).body("{}");
        })
        .await;

    let overpass = osm.api.overpass_client().unwrap();
    assert_eq!(overpass.endpoints().len(), 2);

    // Both configured interpreters fail, so the last error surfaces.
    let err = overpass.query("out;").await.unwrap_err();
    assert!(matches!(err, osm_api::Error::Transport(_)));
    busy.assert_async().await;
    healthy.assert_hits_async(0).await;

    let overpass = osm_api::OverpassClient::new(
        osm.api.client().clone(),
        vec![url::Url::parse(&healthy_url).unwrap()],
    )
    .unwrap();
    assert_eq!(overpass.query("out;").await.unwrap(), "{}");
}

#[tokio::test]
async fn tag_query_round_trip() {
    let osm = MockOsm::start().await;
    let query = OverpassQuery::new(
        ElementType::Way,
        Bounds::new(11.9, 57.69, 11.92, 57.71),
        25,
    )
    .tag("name")
    .tag_value("highway", "residential");
    let text = query.build().unwrap();
    assert_eq!(
        text,
        "[out:json][timeout:25];(way[name][highway=residential](57.69,11.9,57.71,11.92);<;);out meta;"
    );

    let interpreter = osm
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/overpass/interpreter")
                .query_param("data", text.as_str());
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"version":0.6,"elements":[{"type":"way","id":5,"tags":{"name":"Main"}}]}"#);
        })
        .await;

    let overpass = osm_api::OverpassClient::new(
        osm.api.client().clone(),
        vec![url::Url::parse(&osm.server.url("/overpass/interpreter")).unwrap()],
    )
    .unwrap();
    let json = overpass.run(&query).await.unwrap();

    interpreter.assert_async().await;
    assert_eq!(json["elements"][0]["id"], 5);
}
