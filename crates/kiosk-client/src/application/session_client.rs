//! SessionClient: the kiosk's session life cycle and periodic polls.
//!
//! # How the client runs (for beginners)
//!
//! The client is a single-consumer *actor*.  Everything that can happen to it
//! arrives as a [`ClientEvent`] on one channel:
//!
//! - a timer tick ([`TimerKind`]) from the scheduler,
//! - a command from the UI ([`UiCommand`]),
//! - a reply from a network request the client started earlier ([`Reply`]).
//!
//! [`SessionClient::handle`] processes one event at a time and never blocks.
//! Network calls are started with `tokio::spawn`; when a call completes, the
//! spawned task posts a [`Reply`] back onto the same channel.  All state
//! (session, status, credentials) is therefore only touched from `handle`,
//! so no locks are needed around it.
//!
//! Replies from different timers may arrive in any order.  Two ticks of the
//! same timer may also have requests in flight at the same time; they are
//! neither merged nor cancelled.
//!
//! ```text
//!  Scheduler ──Tick──┐
//!  UI ───────Command─┼──► mpsc ──► SessionClient::handle ──spawn──► ApiTransport
//!  spawned task ─Reply┘                                               │
//!        ▲────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use bytes::Bytes;
use kiosk_core::protocol::response::{
    LoginResponse, LogoutResponse, RegisterNodeResponse, UserDataResponse, UserStatus,
};
use kiosk_core::{
    parse_response, Action, ApiRequest, Credentials, LogoutAction, NodeIdentity,
    RemoteDirectives, SessionMachine, SessionState, StatusTracker,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::application::connectivity::{choose_url, parse_urls};
use crate::application::dispatch_directives::DirectiveDispatcher;
use crate::application::events::{UiCommand, UiEvent};
use crate::application::ports::{
    ApiTransport, ConfigStore, EventSink, OsAction, OsActions, Scheduler, TimerKind,
    TransportError, WakeOnLanSender,
};
use crate::application::settings::{
    enabled_script, printers, SCRIPT_LOGIN_GROUP, SCRIPT_LOGOUT_GROUP,
    SESSION_CONNECTIVITY_URLS, SESSION_LOGGED_IN_USER,
};
use crate::application::upload_print_jobs::{PrintJob, PrintJobUploader};

// ── Events ────────────────────────────────────────────────────────────────────

/// Everything the client reacts to.
#[derive(Debug)]
pub enum ClientEvent {
    Tick(TimerKind),
    Command(UiCommand),
    Reply(Reply),
}

/// Completion of a request the client started.
#[derive(Debug)]
pub enum Reply {
    Registration(Result<Bytes, TransportError>),
    Login(Result<Bytes, TransportError>),
    Logout(Result<Bytes, TransportError>),
    UserData(Result<Bytes, TransportError>),
    /// Fire-and-forget management call; only the outcome class matters.
    Ignored(Action, Result<Bytes, TransportError>),
    Connectivity {
        url: String,
        result: Result<(), TransportError>,
    },
    PrintUpload {
        job: PrintJob,
        result: Result<(), TransportError>,
    },
}

// ── Collaborators ─────────────────────────────────────────────────────────────

/// Capabilities injected into the client.
#[derive(Clone)]
pub struct ClientDeps {
    pub transport: Arc<dyn ApiTransport>,
    pub config: Arc<dyn ConfigStore>,
    pub os: Arc<dyn OsActions>,
    pub wol: Arc<dyn WakeOnLanSender>,
    pub events: Arc<dyn EventSink>,
    pub scheduler: Arc<dyn Scheduler>,
}

// ── SessionClient ─────────────────────────────────────────────────────────────

pub struct SessionClient {
    identity: NodeIdentity,
    version: String,
    logout_action: LogoutAction,
    deps: ClientDeps,
    tx: UnboundedSender<ClientEvent>,
    session: SessionMachine,
    status: StatusTracker,
    dispatcher: DirectiveDispatcher,
    uploader: PrintJobUploader,
}

impl SessionClient {
    /// Creates a client.  `tx` must feed the receiver later passed to
    /// [`run`](Self::run); spawned requests post their replies through it.
    pub fn new(
        identity: NodeIdentity,
        version: impl Into<String>,
        logout_action: LogoutAction,
        deps: ClientDeps,
        tx: UnboundedSender<ClientEvent>,
    ) -> Self {
        let dispatcher = DirectiveDispatcher::new(
            Arc::clone(&deps.config),
            Arc::clone(&deps.os),
            Arc::clone(&deps.wol),
            Arc::clone(&deps.events),
        );
        Self {
            identity,
            version: version.into(),
            logout_action,
            deps,
            tx,
            session: SessionMachine::new(),
            status: StatusTracker::new(),
            dispatcher,
            uploader: PrintJobUploader::new(),
        }
    }

    /// Starts the two always-on schedules and asks for an immediate first
    /// tick of each (registration and connectivity check).
    pub fn start(&mut self) {
        info!(node = %self.identity.name, version = %self.version, "kiosk client starting");
        for kind in [TimerKind::Registration, TimerKind::Connectivity] {
            self.deps.scheduler.start(kind, kind.period());
            self.deps.scheduler.fire_once(kind);
        }
    }

    /// Processes events until the channel closes.
    pub async fn run(mut self, mut rx: UnboundedReceiver<ClientEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle(event);
        }
        info!("client event channel closed");
    }

    /// Processes one event.  Must be called from inside a tokio runtime.
    pub fn handle(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Tick(kind) => self.on_tick(kind),
            ClientEvent::Command(command) => self.on_command(command),
            ClientEvent::Reply(reply) => self.on_reply(reply),
        }
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    /// Last availability status reported by the server.
    pub fn client_status(&self) -> &str {
        self.status.current()
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    fn on_tick(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Registration => self.register_node(),
            TimerKind::Connectivity => self.check_connectivity(),
            TimerKind::UserData => {
                if let Some(credentials) = self.active_credentials() {
                    self.send_api(ApiRequest::get_user_data(&credentials), Reply::UserData);
                }
            }
            TimerKind::PrintUpload => self.upload_print_jobs(),
        }
    }

    fn on_command(&mut self, command: UiCommand) {
        debug!(?command, "UI command");
        match command {
            UiCommand::AttemptLogin { username, password } => {
                self.attempt_login(Credentials::new(username, password))
            }
            UiCommand::AttemptLogout => self.attempt_logout(),
            UiCommand::AcknowledgeReservation(reserved_for) => self.send_api(
                ApiRequest::acknowledge_reservation(&reserved_for),
                |result| Reply::Ignored(Action::AcknowledgeReservation, result),
            ),
            UiCommand::ClearMessage => match self.active_credentials() {
                Some(credentials) => self.send_api(
                    ApiRequest::clear_message(&credentials),
                    |result| Reply::Ignored(Action::ClearMessage, result),
                ),
                None => debug!("clear-message ignored: no active session"),
            },
        }
    }

    fn on_reply(&mut self, reply: Reply) {
        match reply {
            Reply::Registration(result) => self.on_registration_reply(result),
            Reply::Login(result) => self.on_login_reply(result),
            Reply::Logout(result) => self.on_logout_reply(result),
            Reply::UserData(result) => self.on_user_data_reply(result),
            Reply::Ignored(action, result) => {
                self.note_server_access(&result);
                debug!(%action, ok = result.is_ok(), "fire-and-forget request completed");
            }
            Reply::Connectivity { url, result } => self.on_connectivity_reply(&url, result),
            Reply::PrintUpload { job, result } => self.on_upload_reply(job, result),
        }
    }

    // ── Registration ──────────────────────────────────────────────────────────

    fn register_node(&self) {
        self.send_api(ApiRequest::register_node(&self.identity), Reply::Registration);
    }

    fn on_registration_reply(&mut self, result: Result<Bytes, TransportError>) {
        self.note_server_access(&result);
        let Ok(body) = result else {
            return;
        };
        let response: RegisterNodeResponse = match parse_response(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!("ignoring unparseable registration reply: {e}");
                return;
            }
        };
        if !response.registered {
            warn!(node = %self.identity.name, "server did not confirm node registration");
        }

        let directives = RemoteDirectives::from_response(&response);

        if let Some(unlock) = &directives.unlock {
            match self.session.unlock(&unlock.username, unlock.minutes) {
                Ok(credentials) => {
                    info!(username = %unlock.username, minutes = unlock.minutes, "server unlocked the station");
                    self.enter_active(credentials, unlock.minutes, 0);
                }
                Err(e) => debug!("unlock ignored: {e}"),
            }
        }

        self.dispatcher.apply(&directives, &mut self.status);
    }

    // ── Login ─────────────────────────────────────────────────────────────────

    fn attempt_login(&mut self, credentials: Credentials) {
        if let Err(e) = self.session.begin_login(credentials.clone()) {
            warn!("login attempt ignored: {e}");
            return;
        }
        info!(username = credentials.username(), "attempting login");
        self.send_api(ApiRequest::login(&credentials), Reply::Login);
    }

    fn on_login_reply(&mut self, result: Result<Bytes, TransportError>) {
        self.note_server_access(&result);
        if !matches!(self.session.state(), SessionState::Authenticating { .. }) {
            debug!(state = self.session.state().name(), "stale login reply dropped");
            return;
        }

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                warn!("login request failed: {e}");
                self.fail_login("NETWORK_ERROR");
                return;
            }
        };
        let response: LoginResponse = match parse_response(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!("unparseable login reply: {e}");
                self.fail_login("INVALID_RESPONSE");
                return;
            }
        };

        if !response.authenticated {
            self.fail_login(&response.error);
            return;
        }
        match self
            .session
            .login_succeeded(response.units, response.hold_items_count)
        {
            Ok(credentials) => {
                self.enter_active(credentials, response.units, response.hold_items_count)
            }
            Err(e) => warn!("login reply could not be applied: {e}"),
        }
    }

    fn fail_login(&mut self, code: &str) {
        if let Err(e) = self.session.login_failed() {
            debug!("{e}");
        }
        info!(code, "login failed");
        self.deps.events.emit(UiEvent::LoginFailed(code.to_string()));
    }

    /// Side effects of entering `Active`, for both login and unlock.
    fn enter_active(&mut self, credentials: Credentials, units: i64, hold_items_count: i64) {
        info!(username = credentials.username(), units, "session started");
        self.perform(OsAction::DesktopSessionOpened);

        for kind in [TimerKind::UserData, TimerKind::PrintUpload] {
            self.deps.scheduler.start(kind, kind.period());
        }

        self.deps
            .config
            .set(SESSION_LOGGED_IN_USER, credentials.username());
        self.sync_config();

        if let Some(script) = enabled_script(&*self.deps.config, SCRIPT_LOGIN_GROUP) {
            self.perform(OsAction::RunScript(script));
        }

        self.deps.events.emit(UiEvent::LoginSucceeded {
            username: credentials.username().to_string(),
            password: credentials.password().to_string(),
            units,
            hold_items_count,
        });
    }

    // ── Logout ────────────────────────────────────────────────────────────────

    /// Sends the logout request and ends the local session at once.  The
    /// reply only decides whether `LogoutFailed` is reported.
    fn attempt_logout(&mut self) {
        let credentials = match self.session.begin_logout() {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!("logout attempt ignored: {e}");
                return;
            }
        };
        self.stop_session_timers();
        info!(username = credentials.username(), "logging out");
        self.send_api(ApiRequest::logout(&credentials), Reply::Logout);

        if let Err(e) = self.session.finish_logout() {
            debug!("{e}");
        }
        self.logout_cleanup();
    }

    fn on_logout_reply(&mut self, result: Result<Bytes, TransportError>) {
        self.note_server_access(&result);
        let acknowledged = result
            .ok()
            .and_then(|body| parse_response::<LogoutResponse>(&body).ok())
            .is_some_and(|response| response.logged_out);
        if !acknowledged {
            warn!("server did not acknowledge logout; session already ended locally");
            self.deps.events.emit(UiEvent::LogoutFailed);
        }
    }

    /// Ends the session without asking the server.
    fn force_logout(&mut self, reason: &str) {
        info!(reason, "ending session");
        if let Err(e) = self.session.end_session() {
            warn!("cannot end session: {e}");
            return;
        }
        self.logout_cleanup();
    }

    fn logout_cleanup(&mut self) {
        self.stop_session_timers();

        self.deps.config.set(SESSION_LOGGED_IN_USER, "");
        self.sync_config();

        let printers = printers(&*self.deps.config);
        self.uploader.discard_spooled(&printers);

        self.perform(OsAction::DesktopSessionClosed);

        match self.logout_action {
            LogoutAction::None => {}
            LogoutAction::Logout => {
                self.deps.events.emit(UiEvent::AllowClose(true));
                self.perform(OsAction::EndDesktopSession);
            }
            LogoutAction::Reboot => {
                self.deps.events.emit(UiEvent::AllowClose(true));
                self.perform(OsAction::Restart);
            }
        }

        if let Some(script) = enabled_script(&*self.deps.config, SCRIPT_LOGOUT_GROUP) {
            self.perform(OsAction::RunScript(script));
        }

        info!("session ended");
        self.deps.events.emit(UiEvent::LogoutSucceeded);
    }

    fn stop_session_timers(&self) {
        self.deps.scheduler.stop(TimerKind::UserData);
        self.deps.scheduler.stop(TimerKind::PrintUpload);
    }

    // ── User data ─────────────────────────────────────────────────────────────

    fn on_user_data_reply(&mut self, result: Result<Bytes, TransportError>) {
        self.note_server_access(&result);
        if !self.session.is_active() {
            return;
        }
        let Ok(body) = result else {
            return;
        };
        let response: UserDataResponse = match parse_response(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!("ignoring unparseable user data reply: {e}");
                return;
            }
        };

        match response.user_status() {
            UserStatus::LoggedOut => self.force_logout("server reports the user logged out"),
            UserStatus::Kicked => self.force_logout("user kicked by the server"),
            UserStatus::LoggedIn => {
                for message in response.messages {
                    self.deps.events.emit(UiEvent::MessageReceived(message));
                }
                if let Some(units) = response.units {
                    if let Err(e) = self.session.update_units(units) {
                        debug!("{e}");
                    }
                    self.deps.events.emit(UiEvent::TimeUpdated(units));
                    if units < 1 {
                        self.force_logout("no time remaining");
                    }
                }
            }
            UserStatus::Other(status) => debug!(%status, "unrecognised user status"),
        }
    }

    // ── Connectivity ──────────────────────────────────────────────────────────

    fn check_connectivity(&self) {
        let raw = self
            .deps
            .config
            .get(SESSION_CONNECTIVITY_URLS)
            .unwrap_or_default();
        let urls = parse_urls(&raw);
        let Some(url) = choose_url(&urls, &mut rand::thread_rng()).map(str::to_string) else {
            debug!("no connectivity check URLs configured");
            return;
        };

        debug!(%url, "checking internet connectivity");
        let transport = Arc::clone(&self.deps.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = transport.probe(&url).await;
            post(&tx, Reply::Connectivity { url, result });
        });
    }

    fn on_connectivity_reply(&self, url: &str, result: Result<(), TransportError>) {
        match result {
            Ok(()) => {
                debug!(url, "connectivity check passed");
                self.deps
                    .events
                    .emit(UiEvent::InternetAccessWarning(String::new()));
            }
            Err(e) => {
                warn!(url, "connectivity check failed: {e}");
                self.deps
                    .events
                    .emit(UiEvent::InternetAccessWarning(e.description));
            }
        }
    }

    // ── Print jobs ────────────────────────────────────────────────────────────

    fn upload_print_jobs(&self) {
        let Some(credentials) = self.active_credentials() else {
            return;
        };
        let printers = printers(&*self.deps.config);
        if printers.is_empty() {
            return;
        }
        for job in self
            .uploader
            .collect(&printers, &self.identity.name, credentials.username())
        {
            self.spawn_upload(job);
        }
    }

    fn spawn_upload(&self, mut job: PrintJob) {
        job.begin_attempt();
        debug!(file = %job.claimed_path.display(), attempt = job.attempts, "uploading print job");
        let transport = Arc::clone(&self.deps.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = transport.upload(&job.upload).await;
            post(&tx, Reply::PrintUpload { job, result });
        });
    }

    fn on_upload_reply(&self, mut job: PrintJob, result: Result<(), TransportError>) {
        self.note_server_access(&result);
        match result {
            Ok(()) => {
                job.mark_delivered();
                info!(
                    file = %job.claimed_path.display(),
                    attempts = job.attempts,
                    "print job delivered"
                );
            }
            Err(e) => {
                job.mark_failed();
                warn!(file = %job.claimed_path.display(), attempt = job.attempts, "print upload failed, retrying: {e}");
                self.spawn_upload(job);
            }
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Starts a management request; `wrap` turns its outcome into a reply.
    fn send_api<F>(&self, request: ApiRequest, wrap: F)
    where
        F: FnOnce(Result<Bytes, TransportError>) -> Reply + Send + 'static,
    {
        debug!(?request, "sending request");
        let query = request.query_pairs(&self.identity, &self.version);
        let transport = Arc::clone(&self.deps.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = transport.get(&query).await;
            post(&tx, wrap(result));
        });
    }

    /// Every management exchange updates the server-access warning: empty on
    /// success, `code: description` on failure.
    fn note_server_access<T>(&self, result: &Result<T, TransportError>) {
        let warning = match result {
            Ok(_) => String::new(),
            Err(e) => {
                debug!("management server error: {e}");
                e.to_string()
            }
        };
        self.deps.events.emit(UiEvent::ServerAccessWarning(warning));
    }

    fn active_credentials(&self) -> Option<Credentials> {
        if self.session.is_active() {
            self.session.credentials().cloned()
        } else {
            None
        }
    }

    fn perform(&self, action: OsAction) {
        if let Err(e) = self.deps.os.perform(&action) {
            warn!(?action, "OS action failed: {e}");
        }
    }

    fn sync_config(&self) {
        if let Err(e) = self.deps.config.sync() {
            warn!("could not persist settings: {e}");
        }
    }
}

fn post(tx: &UnboundedSender<ClientEvent>, reply: Reply) {
    if tx.send(ClientEvent::Reply(reply)).is_err() {
        debug!("client stopped; reply dropped");
    }
}
