use grid_odata::{GridPage, GridRequest, GridSettings, PageWindow, build_query, normalize};
use url::Url;

use crate::config::AjaxOptions;
use crate::error::ClientError;
use crate::jsonp::unwrap_jsonp;
use crate::transport::{HyperTransport, Transport};

/// The grid-facing fetch client.
///
/// One [`fetch`](GridODataClient::fetch) call is one request/response
/// cycle: decode the grid's parameters, build the `OData` query, GET it,
/// normalize the payload. The returned future completing with `Ok` is the
/// grid's completion callback; on any failure the value is simply never
/// produced and the grid keeps its prior state.
///
/// Overlapping fetches are independent: nothing is cancelled, de-duplicated
/// or reordered here, and no state crosses cycles.
pub struct GridODataClient<T = HyperTransport> {
    transport: T,
    ajax: AjaxOptions,
}

impl GridODataClient<HyperTransport> {
    /// Client over the default hyper transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Tls`] if the native certificate store cannot
    /// be loaded.
    pub fn new() -> Result<Self, ClientError> {
        Ok(Self {
            transport: HyperTransport::new()?,
            ajax: AjaxOptions::default(),
        })
    }
}

impl<T: Transport> GridODataClient<T> {
    /// Client over a caller-supplied transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            ajax: AjaxOptions::default(),
        }
    }

    /// Attach caller pass-through options, merged into every request.
    #[must_use]
    pub fn ajax(mut self, ajax: AjaxOptions) -> Self {
        self.ajax = ajax;
        self
    }

    /// Run one fetch cycle against the service.
    ///
    /// `params` is the grid's native parameter sequence for this fetch;
    /// `settings` carries the column metadata and `OData` configuration.
    ///
    /// # Errors
    ///
    /// Returns the translation error for undecodable parameters or filter
    /// bounds, [`ClientError::InvalidUri`] for a bad service URL, a
    /// transport error or [`ClientError::HttpStatus`] for failed requests,
    /// and [`ClientError::Jsonp`]/[`ClientError::Json`]/payload errors for
    /// bodies that cannot be normalized.
    pub async fn fetch(
        &self,
        service_url: &str,
        params: &[(String, String)],
        settings: &GridSettings,
    ) -> Result<GridPage, ClientError> {
        let request =
            GridRequest::from_params(params.iter().map(|(n, v)| (n.as_str(), v.as_str())))?;
        let query = build_query(&request, settings)?;

        let mut url =
            Url::parse(service_url).map_err(|err| ClientError::InvalidUri {
                url: service_url.to_owned(),
                reason: err.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query.to_pairs() {
                pairs.append_pair(name, &value);
            }
            for (name, value) in self.ajax.query_extras() {
                pairs.append_pair(name, value);
            }
        }

        let mut headers = vec![
            ("accept".to_owned(), "application/json".to_owned()),
            // Always fresh: a cached page would show stale rows behind a
            // live pager.
            ("cache-control".to_owned(), "no-cache".to_owned()),
            ("pragma".to_owned(), "no-cache".to_owned()),
        ];
        headers.extend(
            self.ajax
                .header_extras()
                .map(|(name, value)| (name.to_owned(), value.to_owned())),
        );

        tracing::debug!(url = %url, "issuing OData fetch");
        let body = self.transport.get(url.as_str(), &headers).await?;

        let payload: serde_json::Value = match &query.callback {
            Some(callback) => {
                let text = std::str::from_utf8(&body)
                    .map_err(|err| ClientError::Jsonp(err.to_string()))?;
                serde_json::from_str(unwrap_jsonp(text, callback)?)?
            }
            None => serde_json::from_slice(&body)?,
        };

        normalize(&payload, PageWindow::from(&request)).map_err(Into::into)
    }
}
