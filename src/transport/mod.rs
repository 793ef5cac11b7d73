//! Background transport
//!
//! A [`TransportSession`] owns uploads once they are enqueued. Each transfer
//! is written to a per-session spool directory before it is sent and removed
//! once a result exists, so a later process activation can reopen the
//! session by identifier and finish whatever the previous one left behind.
//!
//! Results are never returned synchronously. Every failure, including
//! unreachable network and non-2xx responses, reaches the completion handler.

mod request;
mod spool;

pub use request::{TransferBody, TransferFailure, TransferRequest, TransferResponse, TransferResult};
pub use spool::SpoolRecord;

use crate::config::Settings;
use crate::error::{Error, Result};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use spool::Spool;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Prefix of generated session identifiers
pub const SESSION_PREFIX: &str = "press-share.background.";

const USER_AGENT: &str = concat!("press-share/", env!("CARGO_PKG_VERSION"));

/// Configuration of one background session
///
/// Built once per share session and handed to the transport; nothing about
/// the session (token included) lives in global state.
#[derive(Clone)]
pub struct SessionConfig {
    /// Identifier used to find the session again after the process exits
    pub identifier: String,
    /// Base URL that request paths are resolved against
    pub api_base: Url,
    /// Bearer token attached to every request
    pub bearer_token: Option<String>,
    /// Root directory of the spool; the session uses `<spool_dir>/<identifier>`
    pub spool_dir: PathBuf,
    /// Per-request timeout
    pub timeout: Duration,
    /// Only spool enqueued transfers; they are sent by a later `resume_pending`
    pub deferred: bool,
}

impl SessionConfig {
    /// Session with a caller-chosen identifier
    pub fn background(identifier: impl Into<String>, settings: &Settings) -> Self {
        Self {
            identifier: identifier.into(),
            api_base: settings.api_base.clone(),
            bearer_token: None,
            spool_dir: settings.spool_dir.clone(),
            timeout: Duration::from_secs(settings.request_timeout_secs),
            deferred: false,
        }
    }

    /// Session with a fresh random identifier, so concurrent share sessions
    /// never collide
    pub fn background_with_randomized_identifier(settings: &Settings) -> Self {
        Self::background(format!("{SESSION_PREFIX}{}", Uuid::new_v4()), settings)
    }

    /// Attach the bearer token
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Record transfers without sending them
    #[must_use]
    pub const fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("identifier", &self.identifier)
            .field("api_base", &self.api_base.as_str())
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("spool_dir", &self.spool_dir)
            .field("timeout", &self.timeout)
            .field("deferred", &self.deferred)
            .finish()
    }
}

/// Receipt for an enqueued transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferHandle {
    /// Transfer id, also the spool record name
    pub id: Uuid,
    /// Session the transfer belongs to
    pub session_id: String,
}

/// Network session whose transfers outlive the caller
///
/// Cheap to clone; clones share the same transfers. Must be used from
/// within a Tokio runtime.
#[derive(Clone)]
pub struct TransportSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: SessionConfig,
    client: Client,
    spool: Spool,
    tasks: Mutex<Vec<(Uuid, JoinHandle<()>)>>,
}

impl TransportSession {
    /// Create (or reopen) the session described by `config`
    ///
    /// The identifier must be a single plain path segment, since it names
    /// the session's directory under the spool root.
    pub fn create(config: SessionConfig) -> Result<Self> {
        validate_identifier(&config.identifier)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let spool = Spool::open(config.spool_dir.join(&config.identifier))?;

        debug!(session = %config.identifier, "created transport session");
        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                client,
                spool,
                tasks: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Session identifier
    pub fn identifier(&self) -> &str {
        &self.inner.config.identifier
    }

    /// Directory holding this session's outstanding transfers
    pub fn spool_path(&self) -> &Path {
        self.inner.spool.dir()
    }

    /// Hand a request to the transport
    ///
    /// Returns as soon as the transfer is recorded and started. `on_complete`
    /// runs on the runtime once a result is known.
    ///
    /// A deferred session only records the transfer and drops `on_complete`;
    /// the outcome goes to whoever later calls
    /// [`resume_pending`](Self::resume_pending).
    pub fn enqueue<F>(&self, request: TransferRequest, on_complete: F) -> TransferHandle
    where
        F: FnOnce(TransferResult) + Send + 'static,
    {
        let record = SpoolRecord::new(request);
        match self.inner.spool.store(&record) {
            Ok(()) if self.inner.config.deferred => {
                debug!(transfer = %record.id, tag = %record.request.tag, "deferred transfer");
                return TransferHandle {
                    id: record.id,
                    session_id: self.inner.config.identifier.clone(),
                };
            }
            Ok(()) => {}
            // Still send it; it just cannot be resumed by a later activation
            Err(e) => warn!(transfer = %record.id, error = %e, "failed to spool transfer"),
        }
        debug!(transfer = %record.id, tag = %record.request.tag, "enqueued transfer");
        self.dispatch(record, on_complete)
    }

    /// Restart transfers a previous activation of this session left behind
    ///
    /// Transfers already running in this process are not started twice.
    pub fn resume_pending<F>(&self, on_complete: F) -> Result<Vec<TransferHandle>>
    where
        F: Fn(&TransferRequest, TransferResult) + Send + Sync + 'static,
    {
        let running: Vec<Uuid> = self
            .lock_tasks()
            .iter()
            .filter(|(_, task)| !task.is_finished())
            .map(|(id, _)| *id)
            .collect();

        let on_complete = Arc::new(on_complete);
        let handles = self
            .inner
            .spool
            .pending()?
            .into_iter()
            .filter(|record| !running.contains(&record.id))
            .map(|record| {
                debug!(transfer = %record.id, tag = %record.request.tag, "resuming transfer");
                let request = record.request.clone();
                let on_complete = Arc::clone(&on_complete);
                self.dispatch(record, move |result| on_complete(&request, result))
            })
            .collect();
        Ok(handles)
    }

    /// Number of transfers recorded as not yet completed
    pub fn pending_transfers(&self) -> Result<usize> {
        Ok(self.inner.spool.pending()?.len())
    }

    /// Remove the session's spool directory once nothing is outstanding
    ///
    /// Returns whether the directory was removed. A session with pending
    /// transfers is left untouched.
    pub fn discard_if_idle(&self) -> Result<bool> {
        if self.pending_transfers()? > 0 || !self.lock_tasks().iter().all(|(_, t)| t.is_finished()) {
            return Ok(false);
        }
        std::fs::remove_dir_all(self.inner.spool.dir())?;
        debug!(session = %self.inner.config.identifier, "discarded idle session");
        Ok(true)
    }

    /// Wait until every transfer started by this process has completed
    ///
    /// Only needed by callers that want to stay alive; transfers run whether
    /// or not anyone waits.
    pub async fn wait_idle(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.lock_tasks());
            if tasks.is_empty() {
                break;
            }
            for (id, task) in tasks {
                if let Err(e) = task.await {
                    warn!(transfer = %id, error = %e, "transfer task ended abnormally");
                }
            }
        }
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<(Uuid, JoinHandle<()>)>> {
        self.inner.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch<F>(&self, record: SpoolRecord, on_complete: F) -> TransferHandle
    where
        F: FnOnce(TransferResult) + Send + 'static,
    {
        let id = record.id;
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = inner.execute(&record.request).await;
            match &result {
                Ok(response) => debug!(transfer = %id, status = response.status, "transfer completed"),
                Err(failure) => debug!(transfer = %id, %failure, "transfer failed"),
            }
            if let Err(e) = inner.spool.remove(id) {
                warn!(transfer = %id, error = %e, "failed to clear spooled transfer");
            }
            on_complete(result);
        });

        let mut tasks = self.lock_tasks();
        tasks.retain(|(_, task)| !task.is_finished());
        tasks.push((id, task));

        TransferHandle {
            id,
            session_id: self.inner.config.identifier.clone(),
        }
    }
}

impl SessionInner {
    async fn execute(&self, request: &TransferRequest) -> TransferResult {
        let url = self
            .config
            .api_base
            .join(&request.path)
            .map_err(|e| TransferFailure::InvalidRequest(format!("{}: {e}", request.path)))?;

        let mut builder = self.client.post(url);
        if let Some(ref token) = self.config.bearer_token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            TransferBody::Json { value } => builder.json(value),
            TransferBody::File {
                field,
                location,
                mime,
            } => builder.multipart(Form::new().part(field.clone(), read_file_part(location, mime).await?)),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransferFailure::Unreachable(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransferFailure::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(TransferFailure::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(TransferResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

fn validate_identifier(identifier: &str) -> Result<()> {
    let mut components = Path::new(identifier).components();
    let single_segment = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single_segment && !identifier.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "invalid session identifier {identifier:?}"
        )))
    }
}

async fn read_file_part(location: &Url, mime: &str) -> std::result::Result<Part, TransferFailure> {
    let path = location
        .to_file_path()
        .map_err(|()| TransferFailure::Source(format!("{location} is not a local file")))?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| TransferFailure::Source(format!("{}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime)
        .map_err(|e| TransferFailure::InvalidRequest(format!("content type {mime}: {e}")))
}
