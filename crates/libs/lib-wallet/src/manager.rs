//! # Connection Manager
//!
//! Owns the wallet connection lifecycle and the connected identity.
//!
//! Every connect attempt takes a generation number. When an attempt resolves, its result is
//! applied only if no newer attempt (or disconnect) started in the meantime, so a slow silent
//! connect can never overwrite a state the user has since driven.
//!
//! Disconnecting clears the identity right away, then waits for the wallet to finish. No new
//! connect starts until it has, so a quick second click cannot race the pending disconnect.
//!
//! State lives behind a `parking_lot::Mutex` that is released before every `.await` and
//! before listeners run.

use lib_core::{AppError, ConnectionState, WalletIdentity};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::connector::{ConnectOptions, WalletConnector};

type Listener = Arc<dyn Fn(&ConnectionState) + Send + Sync + 'static>;

#[derive(Debug, Default)]
struct Inner {
    state: ConnectionState,
    identity: Option<WalletIdentity>,
    generation: u64,
    disconnecting: bool,
}

pub struct ConnectionManager<W> {
    wallet: W,
    network: String,
    inner: Mutex<Inner>,
    listeners: Mutex<Vec<Listener>>,
}

impl<W: WalletConnector> ConnectionManager<W> {
    /// `network` is the label reported alongside every connected address.
    pub fn new(wallet: W, network: impl Into<String>) -> Self {
        Self {
            wallet,
            network: network.into(),
            inner: Mutex::new(Inner::default()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state.clone()
    }

    /// Present only while connected.
    pub fn identity(&self) -> Option<WalletIdentity> {
        self.inner.lock().identity.clone()
    }

    /// Register an observer called after every state transition.
    pub fn on_transition(&self, listener: impl Fn(&ConnectionState) + Send + Sync + 'static) {
        self.listeners.lock().push(Arc::new(listener));
    }

    /// Reconnect without prompting if the wallet already trusts this site.
    ///
    /// Failures are swallowed: the state ends up `Disconnected` and no error is recorded.
    pub async fn attempt_silent_connect(&self) -> ConnectionState {
        let Some(generation) = self.begin_attempt(false) else {
            return self.state();
        };

        let result = self.wallet.connect(ConnectOptions::silent()).await;

        let outcome = match result {
            Ok(address) => {
                info!("Silently reconnected to {} ({})", self.wallet.name(), address);
                (ConnectionState::Connected, Some(WalletIdentity::new(address, &self.network)))
            }
            Err(err) => {
                debug!("Silent connect declined: {}", err);
                (ConnectionState::Disconnected, None)
            }
        };

        self.resolve(generation, outcome)
    }

    /// Act on the connect/disconnect button.
    ///
    /// - `Connected`: disconnect (or reset) and clear the identity.
    /// - `Disconnected` / `Failed`: interactive connect.
    /// - `Connecting`: ignored.
    pub async fn toggle_connect(&self) -> ConnectionState {
        let current = self.state();
        match current {
            ConnectionState::Connecting => {
                debug!("Connect already in progress, ignoring toggle");
                current
            }
            ConnectionState::Connected => self.disconnect().await,
            ConnectionState::Disconnected | ConnectionState::Failed(_) => self.connect().await,
        }
    }

    async fn connect(&self) -> ConnectionState {
        let Some(generation) = self.begin_attempt(true) else {
            return self.state();
        };
        self.notify(&ConnectionState::Connecting);

        let outcome = match self.wallet.connect(ConnectOptions::interactive()).await {
            Ok(address) => {
                info!("Connected to {} ({})", self.wallet.name(), address);
                (ConnectionState::Connected, Some(WalletIdentity::new(address, &self.network)))
            }
            Err(err) => {
                warn!("Wallet connection failed: {}", err);
                (ConnectionState::Failed(AppError::from(err)), None)
            }
        };

        self.resolve(generation, outcome)
    }

    async fn disconnect(&self) -> ConnectionState {
        {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.state = ConnectionState::Disconnected;
            inner.identity = None;
            inner.disconnecting = true;
        }
        self.notify(&ConnectionState::Disconnected);

        let result = if self.wallet.supports_disconnect() {
            self.wallet.disconnect().await
        } else {
            self.wallet.reset_state().await
        };
        self.inner.lock().disconnecting = false;
        if let Err(err) = result {
            warn!("{}", err);
        }

        info!("Disconnected from {}", self.wallet.name());
        self.state()
    }

    /// Take a generation for a new connect attempt, `None` if one may not start now.
    ///
    /// Interactive attempts also move to `Connecting`; the caller notifies.
    fn begin_attempt(&self, interactive: bool) -> Option<u64> {
        let mut inner = self.inner.lock();
        if !inner.state.accepts_connect() {
            return None;
        }
        if inner.disconnecting {
            debug!("Disconnect still in progress, ignoring connect");
            return None;
        }

        inner.generation += 1;
        if interactive {
            inner.state = ConnectionState::Connecting;
            inner.identity = None;
        }
        Some(inner.generation)
    }

    /// Apply an attempt's outcome if it is still the latest one.
    fn resolve(
        &self,
        generation: u64,
        (state, identity): (ConnectionState, Option<WalletIdentity>),
    ) -> ConnectionState {
        {
            let mut inner = self.inner.lock();
            if inner.generation != generation {
                debug!(
                    "Discarding stale connect result (attempt {}, current {})",
                    generation, inner.generation
                );
                return inner.state.clone();
            }
            inner.state = state.clone();
            inner.identity = identity;
        }
        self.notify(&state);
        state
    }

    fn notify(&self, state: &ConnectionState) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener(state);
        }
    }
}
