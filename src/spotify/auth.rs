use std::sync::Arc;

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use tracing::debug;

use super::{
    SpotifyClient,
    request::{self, FetchOptions},
    stats::RequestStatsRegistry,
};
use crate::{
    config::{ClientConfig, TokenPolicy},
    error::{Error, Result},
    types::{AccessToken, TokenResponse},
    utils,
};

type TokenRequest = Shared<BoxFuture<'static, std::result::Result<AccessToken, Arc<Error>>>>;

pub(crate) enum TokenState {
    Empty,
    /// A token request is in flight; every caller awaits this same future.
    Acquiring {
        generation: u64,
        request: TokenRequest,
    },
    Ready(AccessToken),
}

pub(crate) struct TokenSlot {
    state: TokenState,
    /// Bumped for every new token request, so a late failure can only
    /// reset the request it belongs to.
    generation: u64,
}

impl TokenSlot {
    pub(crate) fn new() -> Self {
        Self {
            state: TokenState::Empty,
            generation: 0,
        }
    }
}

impl SpotifyClient {
    /// Returns the client's access token, requesting one on first use.
    ///
    /// Concurrent callers that arrive while no token exists share a single
    /// client-credentials request. Once obtained, the token is kept for the
    /// life of the client under [`TokenPolicy::NeverRefresh`], even past its
    /// `expires_in`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] wrapping the token request's failure. Every
    /// caller that joined the failed request receives the same cause, and the
    /// next call starts a fresh request.
    pub async fn access_token(&self) -> Result<AccessToken> {
        let (generation, request) = {
            let mut guard = utils::lock(&self.token);
            let slot = &mut *guard;

            if let TokenState::Ready(token) = &slot.state {
                match self.config.token_policy {
                    TokenPolicy::NeverRefresh => return Ok(token.clone()),
                }
            }

            if let TokenState::Acquiring {
                generation,
                request,
            } = &slot.state
            {
                debug!(generation, "joining in-flight access token request");
                (*generation, request.clone())
            } else {
                slot.generation += 1;
                let generation = slot.generation;
                let request = self.token_request();
                slot.state = TokenState::Acquiring {
                    generation,
                    request: request.clone(),
                };
                debug!(generation, "requesting access token");
                (generation, request)
            }
        };

        let outcome = request.await;

        let mut slot = utils::lock(&self.token);
        match outcome {
            Ok(token) => {
                slot.state = TokenState::Ready(token.clone());
                Ok(token)
            }
            Err(cause) => {
                let current = matches!(
                    &slot.state,
                    TokenState::Acquiring { generation: g, .. } if *g == generation
                );
                if current {
                    slot.state = TokenState::Empty;
                }
                Err(Error::Auth(cause))
            }
        }
    }

    fn token_request(&self) -> TokenRequest {
        let http = self.http.clone();
        let config = Arc::clone(&self.config);
        let stats = Arc::clone(&self.request_stats);

        async move {
            request_access_token(&http, &stats, &config)
                .await
                .map_err(Arc::new)
        }
        .boxed()
        .shared()
    }
}

/// Performs the client-credentials grant against the token endpoint.
///
/// Goes through the regular dispatch path without a bearer token, so the
/// token endpoint gets its own stats bucket.
async fn request_access_token(
    http: &Client,
    stats: &RequestStatsRegistry,
    config: &ClientConfig,
) -> Result<AccessToken> {
    let basic = utils::basic_auth_header(&config.client_id, &config.client_secret);
    let basic = HeaderValue::from_str(&basic)
        .map_err(|_| Error::Config("client credentials are not valid header characters".into()))?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, basic);

    let options = FetchOptions::post_form(vec![(
        "grant_type".to_string(),
        "client_credentials".to_string(),
    )])
    .with_headers(headers);

    let body = request::dispatch(http, stats, &config.token_url, options, None).await?;
    let response: TokenResponse = serde_json::from_value(body)?;
    debug!(
        token_type = ?response.token_type,
        expires_in = ?response.expires_in,
        "received access token"
    );

    Ok(AccessToken::new(response.access_token))
}
