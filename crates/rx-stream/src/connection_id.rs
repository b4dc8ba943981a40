use chrono::Utc;
use uuid::Uuid;

/// Composite connection key: owning tenant + open timestamp + random token.
/// The tenant id leads, so broadcast can filter the registry by tenant
/// prefix; the timestamp/token tail makes every id unique and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId {
    tenant_id: Uuid,
    opened_at_ms: i64,
    token: u32,
}

impl ConnectionId {
    pub fn new(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            opened_at_ms: Utc::now().timestamp_millis(),
            token: rand::random(),
        }
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    /// Tenant-prefix check used by broadcast filtering
    pub fn belongs_to(&self, tenant_id: Uuid) -> bool {
        self.tenant_id == tenant_id
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{:08x}",
            self.tenant_id, self.opened_at_ms, self.token
        )
    }
}
