//! Network actor - runs searches, details and poster loads in the Tokio runtime

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::constants::{CONNECTIVITY_INTERVAL, CONNECTIVITY_TIMEOUT, SEARCH_DEBOUNCE};
use crate::features::{GetMovieDetailsUseCase, SearchMoviesUseCase};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::image::{ImageLoader, ImageOptions};
use crate::network::monitor::run_monitor;
use crate::ui::PosterArt;

/// Everything the actor needs to serve commands
#[derive(Clone)]
pub struct Services {
    pub search: Arc<SearchMoviesUseCase>,
    pub details: Arc<GetMovieDetailsUseCase>,
    pub images: ImageLoader,
    /// Host probed by the connectivity monitor; `None` disables it
    pub probe: Option<(String, u16)>,
    pub debounce: Duration,
}

impl Services {
    pub fn new(
        search: Arc<SearchMoviesUseCase>,
        details: Arc<GetMovieDetailsUseCase>,
        images: ImageLoader,
        probe: Option<(String, u16)>,
    ) -> Self {
        Services {
            search,
            details,
            images,
            probe,
            debounce: SEARCH_DEBOUNCE,
        }
    }
}

/// Tracks an active request for cancellation
struct ActiveRequest {
    cancel_tx: oneshot::Sender<()>,
    poster_url: Option<String>,
}

/// Network actor that processes commands from the App layer
pub struct NetworkActor {
    services: Services,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<u64>,
    cancel_handles: HashMap<u64, ActiveRequest>,
    monitor_cancel: Option<oneshot::Sender<()>>,
}

impl NetworkActor {
    pub fn new(services: Services, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            services,
            response_tx,
            active_requests: JoinSet::new(),
            cancel_handles: HashMap::new(),
            monitor_cancel: None,
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        self.start_monitor();

        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.shutdown();
                            break;
                        }
                        Some(cmd) => self.handle(cmd),
                    }
                }

                Some(joined) = self.active_requests.join_next() => {
                    if let Ok(id) = joined {
                        self.cancel_handles.remove(&id);
                    }
                }
            }
        }
    }

    fn handle(&mut self, cmd: NetworkCommand) {
        match cmd {
            NetworkCommand::SearchMovies { id, query, page, debounce } => {
                let search = self.services.search.clone();
                let delay = if debounce { self.services.debounce } else { Duration::ZERO };
                self.spawn_cancellable(id, None, async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    tracing::info!(id, query = %query, page, "searching movies");
                    match search.execute(&query, page).await {
                        Ok(page) => NetworkResponse::SearchResults { id, query, page },
                        Err(error) => {
                            tracing::warn!(id, error = %error, "search failed");
                            NetworkResponse::Failed { id, error }
                        }
                    }
                });
            }

            NetworkCommand::FetchDetails { id, movie_id } => {
                let details = self.services.details.clone();
                self.spawn_cancellable(id, None, async move {
                    tracing::info!(id, movie_id, "fetching details");
                    match details.execute(movie_id).await {
                        Ok(details) => NetworkResponse::Details { id, details },
                        Err(error) => NetworkResponse::Failed { id, error },
                    }
                });
            }

            NetworkCommand::LoadPoster { id, url, width, height } => {
                let images = self.services.images.clone();
                let poster_url = url.clone();
                self.spawn_cancellable(id, Some(poster_url), async move {
                    load_poster(images, id, url, width, height).await
                });
            }

            NetworkCommand::PrefetchPosters { urls } => {
                if !urls.is_empty() {
                    tracing::debug!(count = urls.len(), "prefetching posters");
                    // Detached: prefetch results only land in the cache
                    drop(self.services.images.prefetch(urls, ImageOptions::default()));
                }
            }

            NetworkCommand::CancelRequest(id) => {
                if let Some(active) = self.cancel_handles.remove(&id) {
                    tracing::info!(id, "Cancelling request");
                    let _ = active.cancel_tx.send(());
                    if let Some(url) = active.poster_url {
                        let images = self.services.images.clone();
                        tokio::spawn(async move { images.cancel(&url).await });
                    }
                    let _ = self.response_tx.send(NetworkResponse::Cancelled { id });
                }
            }

            NetworkCommand::Shutdown => self.shutdown(),
        }
    }

    /// Run `work` unless `CancelRequest(id)` arrives first
    fn spawn_cancellable<F>(&mut self, id: u64, poster_url: Option<String>, work: F)
    where
        F: Future<Output = NetworkResponse> + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        self.cancel_handles.insert(id, ActiveRequest { cancel_tx, poster_url });
        let response_tx = self.response_tx.clone();

        self.active_requests.spawn(async move {
            tokio::select! {
                biased;
                _ = &mut cancel_rx => {
                    tracing::debug!(id, "request dropped after cancel");
                }
                response = work => {
                    let _ = response_tx.send(response);
                }
            }
            id
        });
    }

    fn start_monitor(&mut self) {
        let Some((host, port)) = self.services.probe.clone() else {
            return;
        };
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.monitor_cancel = Some(cancel_tx);
        tokio::spawn(run_monitor(
            host,
            port,
            CONNECTIVITY_INTERVAL,
            CONNECTIVITY_TIMEOUT,
            self.response_tx.clone(),
            cancel_rx,
        ));
    }

    fn shutdown(&mut self) {
        for (_, active) in self.cancel_handles.drain() {
            let _ = active.cancel_tx.send(());
        }
        if let Some(cancel) = self.monitor_cancel.take() {
            let _ = cancel.send(());
        }
        self.active_requests.abort_all();
    }
}

async fn load_poster(images: ImageLoader, id: u64, url: String, width: u16, height: u16) -> NetworkResponse {
    let response = match images.load(&url, &ImageOptions::default()).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(id, url = %url, error = %e, "poster load failed");
            return NetworkResponse::PosterFailed {
                id,
                message: e.to_string(),
            };
        }
    };

    let data = response.data;
    match tokio::task::spawn_blocking(move || PosterArt::decode(&data, width, height)).await {
        Ok(Ok(art)) => NetworkResponse::Poster { id, art },
        Ok(Err(e)) => NetworkResponse::PosterFailed {
            id,
            message: format!("Unreadable poster: {}", e),
        },
        Err(e) => NetworkResponse::PosterFailed {
            id,
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::testing::{executor, json, FakeClient};
    use crate::features::{RemoteDetailsRepository, RemoteSearchRepository};
    use crate::storage::JsonMovieCache;

    const RESULTS: &str = r#"{"page":1,"total_pages":1,"total_results":1,"results":[{"id":1,"title":"Alien"}]}"#;

    fn services(client: Arc<FakeClient>, dir: &std::path::Path) -> Services {
        let cache = Arc::new(JsonMovieCache::in_memory());
        let exec = executor(client);
        let search = RemoteSearchRepository::new(exec.clone(), cache.clone(), "en-US".into());
        let details = RemoteDetailsRepository::new(exec, cache, "en-US".into());
        let mut services = Services::new(
            Arc::new(SearchMoviesUseCase::new(Arc::new(search))),
            Arc::new(GetMovieDetailsUseCase::new(Arc::new(details))),
            ImageLoader::with_cache_dir(dir).unwrap(),
            None,
        );
        services.debounce = Duration::from_millis(50);
        services
    }

    #[tokio::test]
    async fn test_search_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::with(vec![json(200, RESULTS)]);
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(NetworkActor::new(services(client, dir.path()), resp_tx).run(cmd_rx));

        cmd_tx
            .send(NetworkCommand::SearchMovies {
                id: 7,
                query: "alien".into(),
                page: 1,
                debounce: false,
            })
            .unwrap();
        match resp_rx.recv().await {
            Some(NetworkResponse::SearchResults { id, page, .. }) => {
                assert_eq!(id, 7);
                assert_eq!(page.items.len(), 1);
            }
            other => panic!("unexpected response: {:?}", other),
        }

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_during_debounce_skips_request() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::with(vec![json(200, RESULTS)]);
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(
            NetworkActor::new(services(client.clone(), dir.path()), resp_tx).run(cmd_rx),
        );

        cmd_tx
            .send(NetworkCommand::SearchMovies {
                id: 1,
                query: "ali".into(),
                page: 1,
                debounce: true,
            })
            .unwrap();
        cmd_tx.send(NetworkCommand::CancelRequest(1)).unwrap();

        assert!(matches!(resp_rx.recv().await, Some(NetworkResponse::Cancelled { id: 1 })));
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(resp_rx.try_recv().is_err());
        assert!(client.urls().is_empty());

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_details_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::with(vec![json(404, "{}")]);
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(NetworkActor::new(services(client, dir.path()), resp_tx).run(cmd_rx));

        cmd_tx.send(NetworkCommand::FetchDetails { id: 3, movie_id: 9 }).unwrap();
        assert!(matches!(
            resp_rx.recv().await,
            Some(NetworkResponse::Failed {
                id: 3,
                error: crate::features::MovieError::NotFound
            })
        ));

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
