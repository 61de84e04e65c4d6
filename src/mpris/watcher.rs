//! MPRIS player watching and share-text emission

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info};
use zbus::fdo::DBusProxy;
use zbus::message::Type as MessageType;
use zbus::zvariant::OwnedValue;
use zbus::{Connection, MatchRule, MessageStream};

use crate::config::{Config, PlayerConfig, SharingConfig};
use crate::error::Result;
use crate::format;
use crate::output::ShareSink;
use crate::service;
use crate::store::TrackStore;
use crate::track::{TrackCoreElement, TrackInfo};

use super::{extract_string, parse_metadata, MPRIS_PATH, MPRIS_PLAYER_IFACE, MPRIS_PREFIX};

/// Events emitted by the MPRIS watcher
#[derive(Debug, Clone)]
enum MprisEvent {
    /// A new track's metadata arrived
    TrackChanged {
        player: String,
        core: TrackCoreElement,
    },
    /// Playback started
    Playing { player: String },
    /// Playback paused or stopped
    Paused { player: String },
    /// Player appeared on D-Bus
    PlayerAppeared { player: String },
    /// Player disappeared from D-Bus
    PlayerDisappeared { player: String },
}

/// Per-player state, keyed by unique bus name.
#[derive(Debug, Clone, Default)]
struct PlayerState {
    /// Player name (bus name suffix)
    player_name: Option<String>,

    /// Last metadata seen from this player
    core: TrackCoreElement,

    /// Whether currently playing
    is_playing: bool,

    /// The core element share text was last emitted for
    last_shared: Option<TrackCoreElement>,
}

/// MPRIS player watcher.
///
/// Tracks players on the session bus and emits rendered share text whenever
/// a new track starts playing.
pub struct ShareWatcher {
    connection: Connection,
    player_config: PlayerConfig,
    sharing_config: SharingConfig,
    sink: ShareSink,
    store: TrackStore,
    /// Map from unique bus name (e.g., `:1.500`) to player state
    players: Arc<RwLock<HashMap<String, PlayerState>>>,
    /// Map from unique bus name to well-known name (e.g., `org.mpris.MediaPlayer2.spotify`)
    bus_name_map: Arc<RwLock<HashMap<String, String>>>,
    /// Atomic flag for stop signaling
    running: Arc<AtomicBool>,
}

impl ShareWatcher {
    /// Create a new watcher on the session bus.
    pub async fn new(config: &Config) -> Result<Self> {
        let connection = Connection::session().await?;
        let store = TrackStore::new(&config.data_dir()?);

        Ok(Self {
            connection,
            player_config: config.players.clone(),
            sharing_config: config.sharing.clone(),
            sink: ShareSink::new(&config.output),
            store,
            players: Arc::new(RwLock::new(HashMap::new())),
            bus_name_map: Arc::new(RwLock::new(HashMap::new())),
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Start watching MPRIS players.
    pub async fn run(&self) -> Result<()> {
        info!("Starting MPRIS watcher...");

        self.discover_players().await?;

        // Set up message stream for D-Bus signals
        let rule = MatchRule::builder()
            .msg_type(MessageType::Signal)
            .build();

        let mut stream = MessageStream::for_match_rule(rule, &self.connection, Some(100)).await?;

        let (tx, mut rx) = mpsc::channel::<MprisEvent>(100);

        // Spawn signal handler
        tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                if let Ok(msg) = msg {
                    Self::handle_dbus_message(&msg, &tx).await;
                }
            }
        });

        loop {
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            tokio::select! {
                Some(event) = rx.recv() => {
                    self.handle_event(event).await;
                }
                _ = tokio::time::sleep(Duration::from_secs(1)) => {
                    // Periodic stop-flag check
                }
            }
        }

        info!("MPRIS watcher stopped");
        Ok(())
    }

    /// Stop the watcher.
    ///
    /// This method is synchronous as it only sets an atomic flag.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Discover existing MPRIS players
    async fn discover_players(&self) -> Result<()> {
        let dbus = DBusProxy::new(&self.connection).await?;
        let names = dbus.list_names().await?;

        for name in names {
            let name_str = name.as_str();
            if name_str.starts_with(MPRIS_PREFIX) && self.should_watch_player(name_str) {
                self.add_player(name_str).await?;
            }
        }

        Ok(())
    }

    /// Check if a player should be watched
    fn should_watch_player(&self, name: &str) -> bool {
        let player_id = name.strip_prefix(MPRIS_PREFIX).unwrap_or(name);

        // Check blacklist first
        if self
            .player_config
            .blacklist
            .iter()
            .any(|p| player_id.contains(p))
        {
            return false;
        }

        // If whitelist is empty, watch all
        if self.player_config.whitelist.is_empty() {
            return true;
        }

        self.player_config
            .whitelist
            .iter()
            .any(|p| player_id.contains(p))
    }

    /// Add a player to the watched set
    async fn add_player(&self, well_known_name: &str) -> Result<()> {
        // Get unique bus name for this well-known name
        let dbus = DBusProxy::new(&self.connection).await?;
        let bus_name = well_known_name
            .try_into()
            .map_err(|e| crate::error::Error::other(format!("Invalid bus name: {e}")))?;
        let unique_name = dbus.get_name_owner(bus_name).await?;
        let unique_name_str = unique_name.as_str().to_string();

        {
            let mut players = self.players.write().await;

            if players.contains_key(&unique_name_str) {
                return Ok(());
            }

            info!("Adding player: {}", well_known_name);

            let mut state = PlayerState {
                player_name: Some(
                    well_known_name
                        .strip_prefix(MPRIS_PREFIX)
                        .unwrap_or(well_known_name)
                        .to_string(),
                ),
                ..PlayerState::default()
            };

            if let Ok(metadata) = self.get_player_metadata(well_known_name).await {
                state.core = parse_metadata(&metadata);
            }

            if let Ok(status) = self.get_playback_status(well_known_name).await {
                state.is_playing = status == "Playing";
            }

            players.insert(unique_name_str.clone(), state);
        }

        self.bus_name_map
            .write()
            .await
            .insert(unique_name_str.clone(), well_known_name.to_string());

        // A player may already be mid-song when we attach
        self.share_if_new(&unique_name_str).await;

        Ok(())
    }

    /// Remove a player from the watched set by well-known name
    async fn remove_player(&self, well_known_name: &str) {
        let unique_name = {
            let map = self.bus_name_map.read().await;
            map.iter()
                .find(|(_, v)| *v == well_known_name)
                .map(|(k, _)| k.clone())
        };

        let Some(unique_name) = unique_name else {
            return;
        };

        if self.players.write().await.remove(&unique_name).is_some() {
            info!("Removing player: {}", well_known_name);
        }
        self.bus_name_map.write().await.remove(&unique_name);
    }

    /// Handle a D-Bus message
    async fn handle_dbus_message(msg: &zbus::Message, tx: &mpsc::Sender<MprisEvent>) {
        let header = msg.header();

        // Handle NameOwnerChanged (player appear/disappear)
        if header.interface().map(|i| i.as_str()) == Some("org.freedesktop.DBus")
            && header.member().map(|m| m.as_str()) == Some("NameOwnerChanged")
        {
            if let Ok((name, old_owner, new_owner)) =
                msg.body().deserialize::<(String, String, String)>()
            {
                if name.starts_with(MPRIS_PREFIX) {
                    if new_owner.is_empty() && !old_owner.is_empty() {
                        let _ = tx
                            .send(MprisEvent::PlayerDisappeared { player: name })
                            .await;
                    } else if !new_owner.is_empty() && old_owner.is_empty() {
                        let _ = tx.send(MprisEvent::PlayerAppeared { player: name }).await;
                    }
                }
            }
            return;
        }

        // Handle PropertiesChanged
        if header.interface().map(|i| i.as_str()) == Some("org.freedesktop.DBus.Properties")
            && header.member().map(|m| m.as_str()) == Some("PropertiesChanged")
        {
            let sender = header.sender().map(|s| s.as_str().to_string());

            if let Ok((iface, changed, _invalidated)) = msg.body().deserialize::<(
                String,
                HashMap<String, OwnedValue>,
                Vec<String>,
            )>() {
                if iface == MPRIS_PLAYER_IFACE {
                    if let Some(player) = sender {
                        if let Some(status) = changed.get("PlaybackStatus") {
                            if let Some(status_str) = extract_string(status) {
                                let event = match status_str.as_str() {
                                    "Playing" => MprisEvent::Playing {
                                        player: player.clone(),
                                    },
                                    "Paused" | "Stopped" => MprisEvent::Paused {
                                        player: player.clone(),
                                    },
                                    _ => return,
                                };
                                let _ = tx.send(event).await;
                            }
                        }

                        if let Some(metadata) = changed.get("Metadata") {
                            if let Ok(meta_map) =
                                HashMap::<String, OwnedValue>::try_from(metadata.clone())
                            {
                                let core = parse_metadata(&meta_map);
                                let _ = tx.send(MprisEvent::TrackChanged { player, core }).await;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Handle an MPRIS event
    async fn handle_event(&self, event: MprisEvent) {
        match event {
            MprisEvent::PlayerAppeared { player } => {
                if self.should_watch_player(&player) {
                    if let Err(e) = self.add_player(&player).await {
                        error!("Failed to add player {}: {}", player, e);
                    }
                }
            }

            MprisEvent::PlayerDisappeared { player } => {
                self.remove_player(&player).await;
            }

            MprisEvent::TrackChanged { player, core } => {
                {
                    let mut players = self.players.write().await;
                    let Some(state) = players.get_mut(&player) else {
                        return;
                    };
                    state.core = core;
                }
                self.share_if_new(&player).await;
            }

            MprisEvent::Playing { player } => {
                {
                    let mut players = self.players.write().await;
                    let Some(state) = players.get_mut(&player) else {
                        return;
                    };
                    state.is_playing = true;
                }
                self.share_if_new(&player).await;
            }

            MprisEvent::Paused { player } => {
                let mut players = self.players.write().await;
                if let Some(state) = players.get_mut(&player) {
                    state.is_playing = false;
                    debug!(
                        "[{}] Paused",
                        state.player_name.as_deref().unwrap_or(&player)
                    );
                }
            }
        }
    }

    /// Emit share text for a player's current track if it is playing and has
    /// not been shared yet.
    async fn share_if_new(&self, unique_name: &str) {
        let track = {
            let mut players = self.players.write().await;
            let Some(state) = players.get_mut(unique_name) else {
                return;
            };

            if !state.is_playing || state.last_shared.as_ref() == Some(&state.core) {
                return;
            }

            // The readiness gate re-checks this, but an incomplete core
            // should not burn the dedupe slot.
            if !state.core.is_all_present() {
                debug!(
                    "[{}] Track metadata incomplete, not sharing",
                    state.player_name.as_deref().unwrap_or(unique_name)
                );
                return;
            }

            state.last_shared = Some(state.core.clone());

            let service_url = if self.sharing_config.include_service_url {
                service::spotify_search_url(&state.core)
            } else {
                None
            };

            TrackInfo {
                core: state.core.clone(),
                player_app_name: state.player_name.clone(),
                service_url,
            }
        };

        let Some(text) = format::share_text(
            &self.sharing_config.template,
            &track,
            &self.sharing_config.modifiers,
        ) else {
            return;
        };

        info!(
            "Sharing: {} - {}",
            track.core.artist.as_deref().unwrap_or("Unknown"),
            track.core.title.as_deref().unwrap_or("Unknown")
        );

        if let Err(e) = self.sink.emit(&text) {
            error!("Failed to emit share text: {}", e);
        }
        if let Err(e) = self.store.save(&track) {
            error!("Failed to persist current track: {}", e);
        }
    }

    /// Get player metadata via D-Bus.
    ///
    /// Times out after 5 seconds to prevent hangs from misbehaving players.
    async fn get_player_metadata(&self, name: &str) -> Result<HashMap<String, OwnedValue>> {
        use zbus::names::InterfaceName;

        const DBUS_TIMEOUT: Duration = Duration::from_secs(5);

        let proxy = tokio::time::timeout(DBUS_TIMEOUT, async {
            zbus::fdo::PropertiesProxy::builder(&self.connection)
                .destination(name)?
                .path(MPRIS_PATH)?
                .build()
                .await
        })
        .await
        .map_err(|_| crate::error::Error::other("D-Bus proxy build timed out"))??;

        let iface = InterfaceName::try_from(MPRIS_PLAYER_IFACE)
            .map_err(|e| crate::error::Error::InvalidMetadata(e.to_string()))?;

        let metadata = tokio::time::timeout(DBUS_TIMEOUT, proxy.get(iface, "Metadata"))
            .await
            .map_err(|_| crate::error::Error::other("D-Bus metadata fetch timed out"))??;

        HashMap::<String, OwnedValue>::try_from(metadata)
            .map_err(|_| crate::error::Error::InvalidMetadata("Failed to parse metadata".into()))
    }

    /// Get playback status via D-Bus.
    ///
    /// Times out after 5 seconds to prevent hangs from misbehaving players.
    async fn get_playback_status(&self, name: &str) -> Result<String> {
        use zbus::names::InterfaceName;

        const DBUS_TIMEOUT: Duration = Duration::from_secs(5);

        let proxy = tokio::time::timeout(DBUS_TIMEOUT, async {
            zbus::fdo::PropertiesProxy::builder(&self.connection)
                .destination(name)?
                .path(MPRIS_PATH)?
                .build()
                .await
        })
        .await
        .map_err(|_| crate::error::Error::other("D-Bus proxy build timed out"))??;

        let iface = InterfaceName::try_from(MPRIS_PLAYER_IFACE)
            .map_err(|e| crate::error::Error::InvalidMetadata(e.to_string()))?;

        let status = tokio::time::timeout(DBUS_TIMEOUT, proxy.get(iface, "PlaybackStatus"))
            .await
            .map_err(|_| crate::error::Error::other("D-Bus status fetch timed out"))??;

        extract_string(&status)
            .ok_or_else(|| crate::error::Error::InvalidMetadata("Failed to get status".into()))
    }
}
