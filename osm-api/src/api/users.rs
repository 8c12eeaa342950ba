use osm_common::{Permissions, Preference, Preferences, User};
use reqwest::Method;

use super::core::{AuthClient, NonAuthClient, first, xml_body};
use crate::{Error, Osm, Result, client::RequestBody, query::join_ids, validate};

/// Most preferences accepted in one bulk replacement.
pub const MAX_PREFERENCES: usize = 150;

impl NonAuthClient {
    /// Public profile of user `id`.
    pub async fn get_user(&self, id: i64) -> Result<User> {
        let osm = self.get_osm(self.url(&format!("0.6/user/{id}"))?).await?;
        first(osm.users, "user")
    }

    /// Public profiles of the users `ids`, in one request.
    pub async fn get_users(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut url = self.url("0.6/users")?;
        url.query_pairs_mut().append_pair("users", &join_ids(ids));
        Ok(self.get_osm(url).await?.users)
    }
}

impl AuthClient {
    /// Permissions granted to the credentials in use.
    pub async fn get_permissions(&self) -> Result<Permissions> {
        let osm = self.get_osm(self.url("0.6/permissions")?).await?;
        Ok(osm.permissions.unwrap_or_default())
    }

    /// Profile of the authenticated user, private fields included.
    pub async fn get_user_details(&self) -> Result<User> {
        let osm = self.get_osm(self.url("0.6/user/details")?).await?;
        first(osm.users, "user")
    }

    /// Every preference of the authenticated user.
    pub async fn get_user_preferences(&self) -> Result<Vec<Preference>> {
        let osm = self.get_osm(self.url("0.6/user/preferences")?).await?;
        Ok(osm
            .preferences
            .map(|preferences| preferences.preferences)
            .unwrap_or_default())
    }

    /// Value of preference `key`. An unset key is an `404` [`Error::Api`].
    pub async fn get_user_preference(&self, key: &str) -> Result<String> {
        validate::preference(key, "")?;

        let url = self.url_with_segment("0.6/user/preferences", key)?;
        let response = self.get(url).await?;
        response.into_text()
    }

    /// Set preference `key` to `value`.
    pub async fn set_user_preference(&self, key: &str, value: &str) -> Result<()> {
        validate::preference(key, value)?;

        let url = self.url_with_segment("0.6/user/preferences", key)?;
        self.send(Method::PUT, url, RequestBody::Text(value.to_string()))
            .await?;
        Ok(())
    }

    /// Replace all preferences with `preferences`.
    ///
    /// At most [`MAX_PREFERENCES`] entries, each key and value within the length limit.
    pub async fn set_user_preferences(&self, preferences: Vec<Preference>) -> Result<()> {
        if preferences.len() > MAX_PREFERENCES {
            return Err(Error::invalid(format!(
                "at most {MAX_PREFERENCES} preferences can be set at once, got {}",
                preferences.len()
            )));
        }
        for preference in &preferences {
            validate::preference(&preference.key, &preference.value)?;
        }

        let url = self.url("0.6/user/preferences")?;
        let body = xml_body(&Osm::with_preferences(Preferences::from(preferences)))?;
        self.send(Method::PUT, url, body).await?;
        Ok(())
    }

    /// Remove preference `key`.
    pub async fn delete_user_preference(&self, key: &str) -> Result<()> {
        validate::preference(key, "")?;

        let url = self.url_with_segment("0.6/user/preferences", key)?;
        self.send(Method::DELETE, url, RequestBody::Empty).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::{
        Method::{DELETE, GET, PUT},
        MockServer,
    };
    use url::Url;

    use super::*;
    use crate::{OAuth2, OsmHttpClient, StatusCode};

    fn reader(server: &MockServer) -> NonAuthClient {
        NonAuthClient::new(
            OsmHttpClient::new().unwrap(),
            Url::parse(&server.url("/api/")).unwrap(),
        )
    }

    fn writer(server: &MockServer) -> AuthClient {
        AuthClient::from_reader(reader(server), Arc::new(OAuth2::new("token")))
    }

    #[tokio::test]
    async fn users() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/0.6/user/1");
                then.status(200)
                    .body(r#"<osm><user id="1" display_name="alice"/></osm>"#);
            })
            .await;
        let many = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/0.6/users").query_param("users", "1,2");
                then.status(200).body(
                    r#"<osm><user id="1" display_name="alice"/><user id="2" display_name="bob"/></osm>"#,
                );
            })
            .await;

        let client = reader(&server);
        let user = client.get_user(1).await.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("alice"));

        let users = client.get_users(&[1, 2]).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(client.get_users(&[]).await.unwrap().is_empty());
        many.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn permissions_and_details() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/0.6/permissions")
                    .header("authorization", "Bearer token");
                then.status(200).body(
                    r#"<osm><permissions><permission name="allow_write_api"/></permissions></osm>"#,
                );
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/0.6/user/details");
                then.status(200)
                    .body(r#"<osm><user id="9" display_name="me"><languages><lang>en</lang></languages></user></osm>"#);
            })
            .await;

        let client = writer(&server);
        assert!(client.get_permissions().await.unwrap().contains("allow_write_api"));
        let me = client.get_user_details().await.unwrap();
        assert_eq!(me.id, Some(9));
    }

    #[tokio::test]
    async fn preferences_round_trip() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/0.6/user/preferences");
                then.status(200).body(
                    r#"<osm><preferences><preference k="theme" v="dark"/><preference k="lang" v="de"/></preferences></osm>"#,
                );
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/0.6/user/preferences/theme");
                then.status(200).body("dark");
            })
            .await;
        let set_one = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/0.6/user/preferences/theme")
                    .header("content-type", "text/plain; charset=utf-8")
                    .body("light");
                then.status(200);
            })
            .await;
        let set_all = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/0.6/user/preferences")
                    .body_contains(r#"<preference k="theme" v="light"/>"#);
                then.status(200);
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/0.6/user/preferences/theme");
                then.status(200);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/0.6/user/preferences/unset");
                then.status(404).body("Preference unset not found");
            })
            .await;

        let client = writer(&server);
        let all = client.get_user_preferences().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(client.get_user_preference("theme").await.unwrap(), "dark");

        client.set_user_preference("theme", "light").await.unwrap();
        client
            .set_user_preferences(vec![Preference::new("theme", "light")])
            .await
            .unwrap();
        client.delete_user_preference("theme").await.unwrap();

        set_one.assert_async().await;
        set_all.assert_async().await;
        delete.assert_async().await;

        let err = client.get_user_preference("unset").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn oversized_preferences_are_rejected_locally() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.path_contains("/api/0.6/user/preferences");
                then.status(200);
            })
            .await;

        let client = writer(&server);
        assert!(client.set_user_preference("k", &"v".repeat(256)).await.is_err());
        assert!(client.set_user_preference("", "v").await.is_err());

        let too_many = (0..=MAX_PREFERENCES)
            .map(|i| Preference::new(format!("k{i}"), "v"))
            .collect();
        assert!(matches!(
            client.set_user_preferences(too_many).await,
            Err(Error::InvalidArgument { .. })
        ));
        mock.assert_hits_async(0).await;
    }
}
