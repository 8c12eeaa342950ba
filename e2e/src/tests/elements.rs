use httpmock::Method::{DELETE, GET, PUT};
use osm_api::{Bounds, Error, Node, OsmGeoKey, Tags, Way};

use super::MockOsm;

#[tokio::test]
async fn missing_node_is_none() {
    let osm = MockOsm::start().await;
    osm.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/0.6/node/999999999");
            then.status(404);
        })
        .await;
    osm.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/0.6/node/17");
            then.status(410);
        })
        .await;

    let reader = osm.api.non_auth_client();
    assert_eq!(reader.get_node(999_999_999).await.unwrap(), None);
    assert_eq!(reader.get_node(17).await.unwrap(), None);
}

#[tokio::test]
async fn multi_fetch_returns_only_existing() {
    let osm = MockOsm::start().await;
    osm.server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/0.6/nodes")
                .query_param("nodes", "1,999999999");
            then.status(200)
                .body(r#"<osm version="0.6"><node id="1" version="3" lat="1" lon="2"/></osm>"#);
        })
        .await;

    let nodes = osm
        .api
        .non_auth_client()
        .get_nodes(&[1, 999_999_999])
        .await
        .unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, Some(1));
}

#[tokio::test]
async fn multi_fetch_is_chunked() {
    let osm = MockOsm::start_with("multi_fetch_chunk_size = 2").await;
    let mut chunks = Vec::new();
    for ids in ["1,2", "3,4", "5"] {
        let body = ids
            .split(',')
            .map(|id| format!(r#"<node id="{id}" version="1" lat="0" lon="0"/>"#))
            .collect::<String>();
        chunks.push(
            osm.server
                .mock_async(|when, then| {
                    when.method(GET).path("/api/0.6/nodes").query_param("nodes", ids);
                    then.status(200).body(format!("<osm>{body}</osm>"));
                })
                .await,
        );
    }

    let reader = osm.api.non_auth_client();
    assert_eq!(reader.chunk_size(), 2);

    let mut ids: Vec<i64> = reader
        .get_nodes(&[1, 2, 3, 4, 5])
        .await
        .unwrap()
        .into_iter()
        .filter_map(|node| node.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    for chunk in &chunks {
        chunk.assert_hits_async(1).await;
    }
}

#[tokio::test]
async fn one_failing_chunk_fails_the_call() {
    let osm = MockOsm::start_with("multi_fetch_chunk_size = 1").await;
    osm.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/0.6/ways").query_param("ways", "1");
            then.status(200).body(r#"<osm><way id="1" version="1"/></osm>"#);
        })
        .await;
    osm.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/0.6/ways").query_param("ways", "2");
            then.status(404).body("Way 2 not found");
        })
        .await;

    let err = osm.api.non_auth_client().get_ways(&[1, 2]).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn mixed_keys_are_grouped_by_type() {
    let osm = MockOsm::start().await;
    let nodes = osm
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/0.6/nodes").query_param("nodes", "1,2");
            then.status(200).body(
                r#"<osm><node id="1" version="1" lat="0" lon="0"/><node id="2" version="1" lat="0" lon="0"/></osm>"#,
            );
        })
        .await;
    let relations = osm
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/0.6/relations")
                .query_param("relations", "7");
            then.status(200).body(r#"<osm><relation id="7" version="1"/></osm>"#);
        })
        .await;

    let elements = osm
        .api
        .non_auth_client()
        .get_elements(&[OsmGeoKey::node(1), OsmGeoKey::relation(7), OsmGeoKey::node(2)])
        .await
        .unwrap();

    assert_eq!(elements.len(), 3);
    nodes.assert_async().await;
    relations.assert_async().await;
}

#[tokio::test]
async fn map_bbox_is_locale_invariant() {
    let osm = MockOsm::start().await;
    let map = osm
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/0.6/map")
                .query_param("bbox", "-77.0371,38.9,-77.03,38.91");
            then.status(200).body(r#"<osm><bounds minlat="38.9" minlon="-77.0371" maxlat="38.91" maxlon="-77.03"/></osm>"#);
        })
        .await;

    osm.api
        .non_auth_client()
        .get_map(&Bounds::new(-77.0371, 38.9, -77.03, 38.91))
        .await
        .unwrap();
    map.assert_async().await;
}

#[tokio::test]
async fn versionless_writes_fail_before_sending() {
    let osm = MockOsm::start_authenticated().await;
    let any = osm
        .server
        .mock_async(|when, then| {
            when.path_contains("/api/0.6/");
            then.status(200).body("1");
        })
        .await;

    let client = osm.auth_client();
    let node = Node {
        id: Some(5),
        latitude: Some(1.0),
        longitude: Some(2.0),
        ..Node::default()
    };
    let way = Way {
        id: Some(6),
        nodes: vec![1, 2],
        ..Way::default()
    };

    assert!(matches!(
        client.update_element(10, node).await,
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        client.delete_element(10, way).await,
        Err(Error::InvalidArgument { .. })
    ));
    any.assert_hits_async(0).await;
}

#[tokio::test]
async fn update_and_delete_stamp_the_changeset() {
    let osm = MockOsm::start_authenticated().await;
    let update = osm
        .server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/0.6/node/5")
                .body_contains(r#"<node id="5" version="2" changeset="10""#);
            then.status(200).body("3");
        })
        .await;
    let delete = osm
        .server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/0.6/node/5")
                .body_contains(r#"<node id="5" version="3" changeset="10""#);
            then.status(200).body("4");
        })
        .await;

    let client = osm.auth_client();
    let mut node = Node {
        id: Some(5),
        version: Some(2),
        latitude: Some(1.0),
        longitude: Some(2.0),
        tags: Tags::from([("amenity", "bench")]),
        ..Node::default()
    };
    let version = client.update_element(10, node.clone()).await.unwrap();
    assert_eq!(version, 3);

    node.version = Some(version);
    assert_eq!(client.delete_element(10, node).await.unwrap(), 4);

    update.assert_async().await;
    delete.assert_async().await;
}
