use httpmock::Method::{DELETE, GET, POST};
use osm_api::{Bounds, DEFAULT_CLOSED_DAYS, DEFAULT_NOTES_LIMIT, GpxFile, NoteStatus, Visibility};

use super::MockOsm;

fn note(id: i64, status: &str, actions: &[&str]) -> String {
    let comments = actions
        .iter()
        .map(|action| {
            format!("<comment><date>2024-03-01 10:00:00 UTC</date><action>{action}</action></comment>")
        })
        .collect::<String>();
    format!(
        r#"<osm version="0.6"><note lon="13.4" lat="52.5"><id>{id}</id><date_created>2024-03-01 10:00:00 UTC</date_created><status>{status}</status><comments>{comments}</comments></note></osm>"#
    )
}

#[tokio::test]
async fn anonymous_note_lifecycle() {
    let osm = MockOsm::start().await;
    let create = osm
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/0.6/notes")
                .query_param("lat", "52.5")
                .query_param("lon", "13.4")
                .query_param_exists("text");
            then.status(200).body(note(7, "open", &["opened"]));
        })
        .await;
    let close = osm
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/0.6/notes/7/close");
            then.status(200).body(note(7, "closed", &["opened", "closed"]));
        })
        .await;
    let reopen = osm
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/0.6/notes/7/reopen")
                .query_param("text", "Confirmed");
            then.status(200)
                .body(note(7, "open", &["opened", "closed", "reopened"]));
        })
        .await;

    let reader = osm.api.non_auth_client();
    let created = reader.create_note(52.5, 13.4, "Bench is gone").await.unwrap();
    assert_eq!(created.id, Some(7));
    assert_eq!(created.status, Some(NoteStatus::Open));

    let closed = reader.close_note(7, None).await.unwrap();
    assert_eq!(closed.status, Some(NoteStatus::Closed));

    let reopened = reader.reopen_note(7, Some("Confirmed")).await.unwrap();
    assert_eq!(reopened.comments.len(), 3);

    create.assert_async().await;
    close.assert_async().await;
    reopen.assert_async().await;
}

#[tokio::test]
async fn notes_in_an_area_use_the_defaults() {
    let osm = MockOsm::start().await;
    let area = osm
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/0.6/notes")
                .query_param("bbox", "13.3,52.4,13.5,52.6")
                .query_param("limit", "100")
                .query_param("closed", "7");
            then.status(200).body(note(7, "open", &["opened"]));
        })
        .await;

    let notes = osm
        .api
        .non_auth_client()
        .get_notes(
            &Bounds::new(13.3, 52.4, 13.5, 52.6),
            DEFAULT_NOTES_LIMIT,
            DEFAULT_CLOSED_DAYS,
        )
        .await
        .unwrap();

    assert_eq!(notes.len(), 1);
    area.assert_async().await;
}

#[tokio::test]
async fn invalid_note_input_never_reaches_the_server() {
    let osm = MockOsm::start().await;
    let any = osm
        .server
        .mock_async(|when, then| {
            when.path_contains("/notes");
            then.status(200).body(note(1, "open", &[]));
        })
        .await;

    let reader = osm.api.non_auth_client();
    assert!(reader.create_note(91.0, 0.0, "Too far north").await.is_err());
    assert!(reader.create_note(10.0, 10.0, "   ").await.is_err());
    assert!(reader.comment_note(1, "").await.is_err());
    assert!(reader
        .get_notes(&Bounds::new(0.0, 2.0, 1.0, 1.0), DEFAULT_NOTES_LIMIT, 0)
        .await
        .is_err());
    assert!(reader
        .get_notes(&Bounds::new(0.0, 0.0, 1.0, 1.0), 0, 0)
        .await
        .is_err());

    any.assert_hits_async(0).await;
}

#[tokio::test]
async fn trace_lifecycle() {
    let osm = MockOsm::start_authenticated().await;
    let upload = osm
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/0.6/gpx/create")
                .header("authorization", "Bearer e2e-token")
                .body_contains("ride.gpx")
                .body_contains("Morning ride")
                .body_contains("bike,commute")
                .body_contains("identifiable");
            then.status(200).body("31");
        })
        .await;
    osm.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/0.6/gpx/31/data");
            then.status(200)
                .header("content-type", "application/gpx+xml")
                .header("content-disposition", r#"attachment; filename="31.gpx""#)
                .body("<gpx/>");
        })
        .await;
    let delete = osm
        .server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/0.6/gpx/31");
            then.status(200);
        })
        .await;

    let client = osm.auth_client();
    let trace = GpxFile {
        name: Some("ride.gpx".into()),
        description: Some("Morning ride".into()),
        visibility: Some(Visibility::Identifiable),
        tags: vec!["bike".into(), "commute".into()],
        ..GpxFile::default()
    };
    let id = client.create_trace(&trace, "<gpx/>").await.unwrap();
    assert_eq!(id, 31);

    let data = client.reader().get_trace_data(id).await.unwrap();
    assert_eq!(data.file_name.as_deref(), Some("31.gpx"));
    assert_eq!(data.content_type.as_deref(), Some("application/gpx+xml"));
    assert_eq!(&data.data[..], b"<gpx/>");

    client.delete_trace(id).await.unwrap();

    upload.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn trace_without_description_is_rejected() {
    let osm = MockOsm::start_authenticated().await;
    let upload = osm
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/0.6/gpx/create");
            then.status(200).body("1");
        })
        .await;

    let trace = GpxFile {
        name: Some("ride.gpx".into()),
        visibility: Some(Visibility::Public),
        ..GpxFile::default()
    };
    assert!(osm.auth_client().create_trace(&trace, "<gpx/>").await.is_err());
    upload.assert_hits_async(0).await;
}
