use bytes::Bytes;
use osm_common::{Bounds, GpxFile, Osm, TypedStream};
use reqwest::{
    Method,
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    multipart::{Form, Part},
};

use super::core::{AuthClient, NonAuthClient, first, xml_body};
use crate::{Error, Result, client::RequestBody, util::parse_number, validate};

impl NonAuthClient {
    /// Page `page` (from 0) of the public GPS points inside `bounds`, as a GPX document.
    pub async fn get_track_points(&self, bounds: &Bounds, page: u32) -> Result<Bytes> {
        validate::bounds(bounds)?;

        let mut url = self.url("0.6/trackpoints")?;
        if let Some(bbox) = bounds.to_bbox() {
            url.query_pairs_mut()
                .append_pair("bbox", &bbox)
                .append_pair("page", &page.to_string());
        }
        Ok(self.get(url).await?.body)
    }

    /// Metadata of trace `id`. Private traces need the owner's credentials.
    pub async fn get_trace_details(&self, id: i64) -> Result<GpxFile> {
        let osm = self
            .get_osm(self.url(&format!("0.6/gpx/{id}/details"))?)
            .await?;
        first(osm.gpx_files, "gpx_file")
    }

    /// The file uploaded as trace `id`, with the name and type the server reports.
    pub async fn get_trace_data(&self, id: i64) -> Result<TypedStream> {
        let response = self.get(self.url(&format!("0.6/gpx/{id}/data"))?).await?;
        let file_name = response
            .header(CONTENT_DISPOSITION.as_str())
            .and_then(TypedStream::file_name_from_disposition);
        let content_type = response.header(CONTENT_TYPE.as_str()).map(str::to_string);

        Ok(TypedStream {
            data: response.body,
            file_name,
            content_type,
        })
    }
}

impl AuthClient {
    /// Traces of the authenticated user.
    pub async fn get_traces(&self) -> Result<Vec<GpxFile>> {
        Ok(self.get_osm(self.url("0.6/user/gpx_files")?).await?.gpx_files)
    }

    /// Upload `data` as a new trace described by `trace` and return its id.
    ///
    /// `trace` must have a name, a description and a visibility; its tags are
    /// sent comma-separated.
    ///
    /// # Example
    /// ```no_run
    /// # use osm_api::{AuthClient, GpxFile, Visibility};
    /// # async fn run(client: AuthClient, gpx: Vec<u8>) -> osm_api::Result<()> {
    /// let trace = GpxFile {
    ///     name: Some("ride.gpx".into()),
    ///     description: Some("Morning ride".into()),
    ///     visibility: Some(Visibility::Trackable),
    ///     tags: vec!["bike".into()],
    ///     ..GpxFile::default()
    /// };
    /// let id = client.create_trace(&trace, gpx).await?;
    /// # Ok(()) }
    /// ```
    pub async fn create_trace(&self, trace: &GpxFile, data: impl Into<Bytes>) -> Result<i64> {
        let (name, description, visibility) = validate::trace_metadata(trace)?;

        let file = Part::stream(reqwest::Body::from(data.into()))
            .file_name(name.to_string())
            .mime_str("application/gpx+xml")
            .map_err(|err| Error::invalid(format!("cannot build trace upload: {err}")))?;
        let form = Form::new()
            .part("file", file)
            .text("description", description.to_string())
            .text("tags", trace.tags.join(","))
            .text("visibility", visibility.to_string());

        let url = self.url("0.6/gpx/create")?;
        let response = self
            .send(Method::POST, url, RequestBody::Multipart(form))
            .await?;
        parse_number(response.text()?)
    }

    /// Replace the metadata of an existing trace. Its `id` must be set.
    pub async fn update_trace(&self, trace: &GpxFile) -> Result<()> {
        let id = trace
            .id
            .ok_or_else(|| Error::invalid("trace must have an id"))?;

        let url = self.url(&format!("0.6/gpx/{id}"))?;
        let body = xml_body(&Osm {
            gpx_files: vec![trace.clone()],
            ..Osm::new()
        })?;
        self.send(Method::PUT, url, body).await?;
        Ok(())
    }

    /// Delete trace `id`.
    pub async fn delete_trace(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("0.6/gpx/{id}"))?;
        self.send(Method::DELETE, url, RequestBody::Empty).await?;
        Ok(())
    }
}
