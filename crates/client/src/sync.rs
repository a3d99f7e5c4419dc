/// Per-record synchronization state tracked by the client store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    /// Created while the service was unreachable; carries a client-generated id.
    LocalOnly,
    /// Local change applied, request to the service in flight.
    Syncing,
    Synced,
    /// The service rejected or never received the last change. Local values are kept.
    SyncFailed,
}

/// Where `CatalogStore::initialize` got its products from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Server,
    Cache,
    Defaults,
}
